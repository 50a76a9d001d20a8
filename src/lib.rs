//! # CubeK Rearrange
//!
//! Pattern driven axis rearrangement for tensors.
//!
//! ## Features
//!
//! - Rearrange pattern parsing with nested groups and a `...` wildcard
//! - Axis length inference from shapes, group products and caller lengths
//! - Planning into split, broadcast, permute and reshape primitives
//! - Works on any tensor exposing [`TensorPrimitives`]
//!
//! ## Example
//!
//! ```ignore
//! use cubek_rearrange::{HostTensor, rearrange};
//!
//! // Split a flattened spatial axis
//! let x = HostTensor::from_fn(&[30, 3], |i| i as f32);
//! let y = rearrange(&x, "(h w) c -> h w c", [("h", 5)])?;
//!
//! // Flatten trailing axes, whatever the batch rank
//! let z = rearrange(&y, "... h w -> ... (h w)", KnownLengths::new())?;
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod backend;
pub mod error;
pub mod launch;
pub mod notation;
pub mod planning;
pub mod shape;

pub use backend::{HostTensor, TensorPrimitives};
pub use error::{ErrorKind, RearrangeError, RearrangeResult};
pub use launch::{RearrangeConfig, rearrange, rearrange_with_config, rearrange_with_pattern};
pub use notation::{AxisToken, GroupId, GroupTable, RearrangePattern, parse_rearrange};
pub use planning::{RearrangePlan, RearrangeStep, create_plan};
pub use shape::{AxisSizes, KnownLengths, resolve_axis_sizes};
