//! Rearrange planning.
//!
//! Turns a parsed pattern and a concrete shape into the ordered primitive
//! calls (split, expand, permute, reshape) that realize it.

mod composition;
mod plan;

pub use composition::{Composition, ElementaryAxis, flatten_side, permutation};
pub use plan::{RearrangePlan, RearrangeStep, create_plan};
