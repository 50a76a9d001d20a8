//! Axis size resolution.
//!
//! Binds every axis on the input side of a pattern to a concrete extent, using
//! caller lengths, the tensor shape and group products.

mod lengths;
mod resolver;

pub use lengths::KnownLengths;
pub use resolver::{AxisSizes, CapturedDims, element_count, resolve_axis_sizes};
