//! Rearrange pattern parsing and representation.
//!
//! Supports the full rearrange grammar:
//! - Reordering: `h w -> w h`
//! - Groups, nested to any depth: `(h w) c -> h w c`, `((a b) c) d -> a (b (c d))`
//! - Wildcard: `... h w -> ... (h w)`

mod axis;
mod groups;
mod parser;
mod pattern;

pub use axis::{AxisToken, GroupId, is_broadcast_sentinel};
pub use groups::{GroupExpander, GroupLeaves, GroupTable};
pub use parser::parse_rearrange;
pub use pattern::RearrangePattern;
