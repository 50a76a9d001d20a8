//! Rearrange execution engine.
//!
//! Orchestrates parsing, resolution, planning and primitive dispatch.

use tracing::{debug, trace};

use super::config::RearrangeConfig;
use crate::backend::TensorPrimitives;
use crate::error::{RearrangeError, RearrangeResult};
use crate::notation::{RearrangePattern, parse_rearrange};
use crate::planning::{RearrangePlan, RearrangeStep, create_plan};
use crate::shape::{KnownLengths, element_count};

/// Rearranges a tensor according to a pattern.
///
/// # Arguments
/// * `tensor` - The input tensor, left untouched
/// * `pattern` - Rearrange pattern (e.g., "(h w) c -> h w c")
/// * `lengths` - Axis lengths the shape alone cannot determine
///
/// # Example
///
/// ```ignore
/// let x = HostTensor::from_fn(&[30, 3], |i| i as f32);
/// let y = rearrange(&x, "(h w) c -> h w c", [("h", 5)])?;
/// assert_eq!(y.shape(), &[5, 6, 3]);
/// ```
pub fn rearrange<T: TensorPrimitives>(
    tensor: &T,
    pattern: &str,
    lengths: impl Into<KnownLengths>,
) -> RearrangeResult<T> {
    rearrange_with_config(tensor, pattern, lengths, &RearrangeConfig::default())
}

/// Rearranges a tensor with explicit configuration.
pub fn rearrange_with_config<T: TensorPrimitives>(
    tensor: &T,
    pattern: &str,
    lengths: impl Into<KnownLengths>,
    config: &RearrangeConfig,
) -> RearrangeResult<T> {
    let pattern = parse_rearrange(pattern)?;
    rearrange_with_pattern(tensor, &pattern, &lengths.into(), config)
}

/// Rearranges a tensor with a pre-parsed pattern.
///
/// Useful when the same pattern will be applied to many tensors.
pub fn rearrange_with_pattern<T: TensorPrimitives>(
    tensor: &T,
    pattern: &RearrangePattern,
    lengths: &KnownLengths,
    config: &RearrangeConfig,
) -> RearrangeResult<T> {
    let plan = create_plan(pattern, tensor.shape(), lengths, config)?;
    execute_plan(&plan, tensor)
}

/// Executes a plan against a tensor of the shape it was built for.
pub fn execute_plan<T: TensorPrimitives>(plan: &RearrangePlan, tensor: &T) -> RearrangeResult<T> {
    if tensor.shape() != plan.input_shape() {
        return Err(RearrangeError::inference(alloc::format!(
            "plan was built for shape {:?}, tensor has shape {:?}",
            plan.input_shape(),
            tensor.shape()
        )));
    }

    let mut current = tensor.clone();
    for step in plan.steps() {
        trace!(?step, shape = ?current.shape(), "executing {}", step.name());
        current = match step {
            RearrangeStep::Split { axis, sizes } => current.split_axis(*axis, sizes)?,
            RearrangeStep::Expand { axis, size } => current.expand_axis(*axis, *size)?,
            RearrangeStep::Permute { perm } => current.permute(perm)?,
            RearrangeStep::Reshape { shape } => reshape(&current, shape)?,
        };
    }

    debug!(output_shape = ?current.shape(), steps = plan.num_steps(), "rearranged tensor");
    Ok(current)
}

/// Runs the final reshape, reporting any rejection with element counts.
fn reshape<T: TensorPrimitives>(tensor: &T, shape: &[usize]) -> RearrangeResult<T> {
    tensor.reshape(shape).map_err(|err| {
        debug!(?err, ?shape, "reshape rejected");
        match (tensor.num_elements(), element_count(shape)) {
            (Some(from_elements), Some(to_elements)) => RearrangeError::Reshape {
                from_elements,
                to_elements,
                shape: shape.to_vec(),
            },
            _ => err,
        }
    })
}

impl RearrangePlan {
    /// Applies this plan to `tensor`; see [`execute_plan`].
    pub fn apply<T: TensorPrimitives>(&self, tensor: &T) -> RearrangeResult<T> {
        execute_plan(self, tensor)
    }
}
