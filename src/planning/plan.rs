//! Execution plan for rearrange operations.

use alloc::format;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use super::composition::{
    ElementaryAxis, ensure_unique, flatten_side, is_identity_permutation, permutation,
};
use crate::error::{RearrangeError, RearrangeResult};
use crate::launch::RearrangeConfig;
use crate::notation::{AxisToken, GroupExpander, RearrangePattern, is_broadcast_sentinel};
use crate::shape::{AxisSizes, KnownLengths, element_count, resolve_axis_sizes};

/// A single primitive invocation with concrete arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RearrangeStep {
    /// Replace dimension `axis` with `sizes`.
    Split { axis: usize, sizes: Vec<usize> },
    /// Repeat the size-1 dimension `axis` to `size`.
    Expand { axis: usize, size: usize },
    /// Reorder dimensions; output dimension `i` is input dimension `perm[i]`.
    Permute { perm: Vec<usize> },
    /// Merge into the final shape.
    Reshape { shape: Vec<usize> },
}

impl RearrangeStep {
    /// Name of the primitive this step invokes.
    pub fn name(&self) -> &'static str {
        match self {
            RearrangeStep::Split { .. } => "split_axis",
            RearrangeStep::Expand { .. } => "expand_axis",
            RearrangeStep::Permute { .. } => "permute",
            RearrangeStep::Reshape { .. } => "reshape",
        }
    }
}

/// Fully resolved sequence of primitives for one input shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RearrangePlan {
    /// Shape the plan was built for.
    input_shape: Vec<usize>,
    /// Shape after every step has run.
    output_shape: Vec<usize>,
    /// Steps to execute, in order.
    steps: Vec<RearrangeStep>,
}

impl RearrangePlan {
    #[inline]
    pub fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    #[inline]
    pub fn output_shape(&self) -> &[usize] {
        &self.output_shape
    }

    #[inline]
    pub fn steps(&self) -> &[RearrangeStep] {
        &self.steps
    }

    #[inline]
    pub fn num_steps(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the plan leaves the tensor as it is.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns true if some dimension is broadcast.
    pub fn broadcasts(&self) -> bool {
        self.steps
            .iter()
            .any(|step| matches!(step, RearrangeStep::Expand { .. }))
    }
}

/// Accumulates steps while tracking the shape they produce.
struct PlanBuilder<'c> {
    input_shape: Vec<usize>,
    shape: Vec<usize>,
    steps: Vec<RearrangeStep>,
    config: &'c RearrangeConfig,
}

impl<'c> PlanBuilder<'c> {
    fn new(shape: &[usize], config: &'c RearrangeConfig) -> RearrangeResult<Self> {
        let builder = Self {
            input_shape: shape.to_vec(),
            shape: shape.to_vec(),
            steps: Vec::new(),
            config,
        };
        builder.check_rank()?;
        Ok(builder)
    }

    fn split(&mut self, axis: usize, sizes: &[usize]) -> RearrangeResult<()> {
        if self.config.elide_noops && sizes.len() == 1 {
            return Ok(());
        }
        self.shape.splice(axis..=axis, sizes.iter().copied());
        self.check_rank()?;
        self.push(RearrangeStep::Split {
            axis,
            sizes: sizes.to_vec(),
        });
        Ok(())
    }

    fn expand(&mut self, axis: usize, size: usize) {
        if self.config.elide_noops && size == 1 {
            return;
        }
        self.shape[axis] = size;
        self.push(RearrangeStep::Expand { axis, size });
    }

    fn permute(&mut self, perm: Vec<usize>) {
        if self.config.elide_noops && is_identity_permutation(&perm) {
            return;
        }
        self.shape = perm.iter().map(|&i| self.shape[i]).collect();
        self.push(RearrangeStep::Permute { perm });
    }

    fn reshape(&mut self, shape: Vec<usize>) -> RearrangeResult<()> {
        let from_elements = counted(&self.shape)?;
        let to_elements = counted(&shape)?;
        if from_elements != to_elements {
            return Err(RearrangeError::Reshape {
                from_elements,
                to_elements,
                shape,
            });
        }
        if self.config.elide_noops && shape == self.shape {
            return Ok(());
        }
        self.shape.clone_from(&shape);
        self.check_rank()?;
        self.push(RearrangeStep::Reshape { shape });
        Ok(())
    }

    fn check_rank(&self) -> RearrangeResult<()> {
        match self.config.max_rank {
            Some(max_rank) if self.shape.len() > max_rank => {
                Err(RearrangeError::composition(format!(
                    "intermediate rank {} exceeds the configured maximum of {max_rank}",
                    self.shape.len()
                )))
            }
            _ => Ok(()),
        }
    }

    fn push(&mut self, step: RearrangeStep) {
        trace!(?step, shape = ?self.shape, "planned {}", step.name());
        self.steps.push(step);
    }

    fn finish(self) -> RearrangePlan {
        RearrangePlan {
            input_shape: self.input_shape,
            output_shape: self.shape,
            steps: self.steps,
        }
    }
}

/// Creates an execution plan realizing `pattern` on a tensor of `shape`.
///
/// This is the main entry point for planning. It:
/// 1. Resolves every input axis against the shape
/// 2. Splits input groups into their elementary axes
/// 3. Broadcasts `1` axes to caller lengths
/// 4. Permutes the elementary axes into output order
/// 5. Merges output groups into the final shape
pub fn create_plan(
    pattern: &RearrangePattern,
    shape: &[usize],
    known: &KnownLengths,
    config: &RearrangeConfig,
) -> RearrangeResult<RearrangePlan> {
    if config.reject_unused_lengths
        && let Some((axis, _)) = known.iter().find(|(axis, _)| !pattern.mentions(axis))
    {
        return Err(RearrangeError::inference(format!(
            "axis '{axis}' is not used in pattern '{pattern}'"
        )));
    }

    let sizes = resolve_axis_sizes(shape, pattern.input(), pattern.groups(), known)?;
    let mut expander = pattern.groups().expander();
    let mut builder = PlanBuilder::new(shape, config)?;

    // Split input groups, one physical dimension at a time.
    let mut input = Vec::with_capacity(shape.len());
    for token in pattern.input() {
        match token {
            AxisToken::Named(name) => input.push(ElementaryAxis::Named(name.as_str())),
            AxisToken::Group(id) => {
                let leaves = expander.expand(*id)?;
                let split_sizes = leaves
                    .iter()
                    .map(|leaf| resolved(&sizes, leaf))
                    .collect::<RearrangeResult<SmallVec<[usize; 8]>>>()?;
                builder.split(input.len(), &split_sizes)?;
                input.extend(leaves.iter().map(|&leaf| ElementaryAxis::Named(leaf)));
            }
            AxisToken::Wildcard => {
                input.extend((0..sizes.wildcard_rank()).map(ElementaryAxis::Captured));
            }
        }
    }

    let output = flatten_side(pattern.output(), &mut expander, &sizes)?;

    broadcast_sentinels(&mut builder, &mut input, &output, &sizes, known)?;

    if input.len() != output.len() {
        return Err(RearrangeError::composition(format!(
            "inconsistent number of dimensions: input has {} elementary axes, output has {}",
            input.len(),
            output.len()
        )));
    }
    ensure_unique(&input, "input")?;
    ensure_unique(&output, "output")?;

    builder.permute(permutation(&input, &output)?);

    let merged = merged_shape(pattern, &mut expander, &sizes)?;
    builder.reshape(merged)?;

    let plan = builder.finish();
    debug!(
        pattern = %pattern,
        input_shape = ?plan.input_shape(),
        output_shape = ?plan.output_shape(),
        steps = plan.num_steps(),
        "created rearrange plan"
    );
    Ok(plan)
}

/// Expands every input `1` to the caller length of the output axis at the same position.
fn broadcast_sentinels<'a>(
    builder: &mut PlanBuilder<'_>,
    input: &mut [ElementaryAxis<'a>],
    output: &[ElementaryAxis<'a>],
    sizes: &AxisSizes,
    known: &KnownLengths,
) -> RearrangeResult<()> {
    for (i, (source, target)) in input.iter_mut().zip(output).enumerate() {
        let ElementaryAxis::Named(name) = *source else {
            continue;
        };
        if !is_broadcast_sentinel(name) || *source == *target {
            continue;
        }

        let ElementaryAxis::Named(target_name) = *target else {
            return Err(RearrangeError::composition(format!(
                "cannot broadcast axis '1' at dimension {i} onto '{target}'"
            )));
        };
        let extent = resolved(sizes, name)?;
        if extent != 1 {
            return Err(RearrangeError::inference(format!(
                "axis '1' at dimension {i} has extent {extent}"
            )));
        }
        let length = known.get(target_name).filter(|&length| length > 0).ok_or_else(|| {
            RearrangeError::inference(format!(
                "broadcast to '{target_name}' needs a positive length for '{target_name}'"
            ))
        })?;

        builder.expand(i, length);
        *source = *target;
    }
    Ok(())
}

/// Computes the merged output shape from the output tokens.
fn merged_shape<'a>(
    pattern: &'a RearrangePattern,
    expander: &mut GroupExpander<'a>,
    sizes: &AxisSizes,
) -> RearrangeResult<Vec<usize>> {
    let mut shape = Vec::with_capacity(pattern.output().len());
    for token in pattern.output() {
        match token {
            AxisToken::Named(name) => shape.push(resolved(sizes, name)?),
            AxisToken::Group(id) => {
                let leaves = expander.expand(*id)?;
                shape.push(sizes.product_of(leaves.iter().copied())?);
            }
            AxisToken::Wildcard => {
                shape.extend_from_slice(sizes.wildcard().unwrap_or_default());
            }
        }
    }
    Ok(shape)
}

fn counted(shape: &[usize]) -> RearrangeResult<usize> {
    element_count(shape).ok_or_else(|| {
        RearrangeError::inference(format!("element count of shape {shape:?} overflows usize"))
    })
}

fn resolved(sizes: &AxisSizes, axis: &str) -> RearrangeResult<usize> {
    sizes
        .get(axis)
        .ok_or_else(|| RearrangeError::inference(format!("cannot determine size for axis '{axis}'")))
}
