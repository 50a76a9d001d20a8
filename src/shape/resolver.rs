//! Axis size inference from a concrete input shape.

use alloc::format;
use alloc::string::{String, ToString};
use hashbrown::HashMap;
use smallvec::SmallVec;
use tracing::trace;

use super::lengths::KnownLengths;
use crate::error::{RearrangeError, RearrangeResult};
use crate::notation::{AxisToken, GroupId, GroupTable};

/// Extents captured by `...`, in original order.
pub type CapturedDims = SmallVec<[usize; 4]>;

/// Resolved extent of every named axis, plus the dimensions captured by `...`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisSizes {
    sizes: HashMap<String, usize>,
    wildcard: Option<CapturedDims>,
}

impl AxisSizes {
    /// Seeds a table from caller lengths, which must all be positive.
    pub fn seeded(known: &KnownLengths) -> RearrangeResult<Self> {
        let mut sizes = HashMap::with_capacity(known.len());
        for (axis, length) in known.iter() {
            if length == 0 {
                return Err(RearrangeError::inference(format!(
                    "length of axis '{axis}' must be positive, got 0"
                )));
            }
            sizes.insert(axis.to_string(), length);
        }
        Ok(Self {
            sizes,
            wildcard: None,
        })
    }

    #[inline]
    pub fn get(&self, axis: &str) -> Option<usize> {
        self.sizes.get(axis).copied()
    }

    #[inline]
    pub fn contains(&self, axis: &str) -> bool {
        self.sizes.contains_key(axis)
    }

    pub fn insert(&mut self, axis: impl Into<String>, size: usize) {
        self.sizes.insert(axis.into(), size);
    }

    /// Returns the extents captured by `...`, if the input has one.
    #[inline]
    pub fn wildcard(&self) -> Option<&[usize]> {
        self.wildcard.as_deref()
    }

    /// Number of dimensions captured by `...` (0 without a wildcard).
    #[inline]
    pub fn wildcard_rank(&self) -> usize {
        self.wildcard.as_ref().map_or(0, |dims| dims.len())
    }

    /// Number of named axes with a known extent.
    #[inline]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.sizes.iter().map(|(axis, &size)| (axis.as_str(), size))
    }

    /// Product of the extents of `axes`; every axis must be resolved.
    pub fn product_of<'a>(&self, axes: impl IntoIterator<Item = &'a str>) -> RearrangeResult<usize> {
        let mut product = 1usize;
        for axis in axes {
            let size = self.get(axis).ok_or_else(|| {
                RearrangeError::inference(format!("cannot determine size for axis '{axis}'"))
            })?;
            product = product.checked_mul(size).ok_or_else(|| {
                RearrangeError::inference(format!("size product overflows at axis '{axis}'"))
            })?;
        }
        Ok(product)
    }
}

/// Resolves the extent of every axis on the input side against `shape`.
///
/// Caller lengths are seeded first and take precedence; the walk only fills
/// in axes that are still unknown, and checks known ones against the shape.
///
/// # Errors
///
/// Returns [`RearrangeError::ShapeInference`] when the rank does not fit the
/// pattern, a group has more than one unknown member, a group extent is not
/// divisible by its known members, or the resolved sizes disagree with the shape.
pub fn resolve_axis_sizes(
    shape: &[usize],
    input: &[AxisToken],
    groups: &GroupTable,
    known: &KnownLengths,
) -> RearrangeResult<AxisSizes> {
    let mut sizes = AxisSizes::seeded(known)?;

    let wildcards = input.iter().filter(|token| token.is_wildcard()).count();
    let explicit = input.len() - wildcards;
    let rank = shape.len();

    if wildcards > 1 {
        return Err(RearrangeError::inference(
            "input side may capture '...' only once",
        ));
    }
    if wildcards == 0 && rank != explicit {
        return Err(RearrangeError::inference(format!(
            "pattern expects {explicit} dimensions, tensor has {rank}"
        )));
    }

    let mut expander = groups.expander();
    let mut cursor = 0usize;

    for token in input {
        match token {
            AxisToken::Wildcard => {
                let captured = rank.checked_sub(explicit).ok_or_else(|| {
                    RearrangeError::inference(format!(
                        "not enough dimensions: pattern needs at least {explicit}, tensor has {rank}"
                    ))
                })?;
                sizes.wildcard = Some(CapturedDims::from_slice(&shape[cursor..cursor + captured]));
                cursor += captured;
            }
            AxisToken::Group(id) => {
                let extent = extent_at(shape, cursor)?;
                let leaves = expander.expand(*id)?;
                resolve_group(&mut sizes, *id, &leaves, extent)?;
                cursor += 1;
            }
            AxisToken::Named(name) => {
                let extent = extent_at(shape, cursor)?;
                match sizes.get(name) {
                    Some(size) if size != extent => {
                        return Err(RearrangeError::inference(format!(
                            "axis '{name}' has length {size} but dimension {cursor} has extent {extent}"
                        )));
                    }
                    Some(_) => {}
                    None => sizes.insert(name.as_str(), extent),
                }
                cursor += 1;
            }
        }
    }

    trace!(axes = sizes.len(), captured = sizes.wildcard_rank(), "resolved axis sizes");
    Ok(sizes)
}

/// Number of elements in a tensor of `shape`, or `None` if it overflows `usize`.
pub fn element_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |count, &dim| count.checked_mul(dim))
}

fn extent_at(shape: &[usize], cursor: usize) -> RearrangeResult<usize> {
    shape.get(cursor).copied().ok_or_else(|| {
        RearrangeError::inference(format!(
            "not enough dimensions: no extent for position {cursor} of a rank {} shape",
            shape.len()
        ))
    })
}

/// Infers at most one unknown member of a group and checks the group product.
fn resolve_group(
    sizes: &mut AxisSizes,
    id: GroupId,
    leaves: &[&str],
    extent: usize,
) -> RearrangeResult<()> {
    let mut known_product = 1usize;
    let mut unknown: Option<&str> = None;

    for &leaf in leaves {
        match sizes.get(leaf) {
            Some(size) => {
                known_product = known_product.checked_mul(size).ok_or_else(|| {
                    RearrangeError::inference(format!(
                        "size product of group {} overflows",
                        describe(leaves)
                    ))
                })?;
            }
            None if unknown.is_some() => {
                return Err(RearrangeError::inference(format!(
                    "multiple unknown axes in group {}",
                    describe(leaves)
                )));
            }
            None => unknown = Some(leaf),
        }
    }

    if let Some(axis) = unknown {
        if known_product == 0 || extent % known_product != 0 {
            return Err(RearrangeError::inference(format!(
                "cannot evenly divide group size {extent} by known product {known_product} in {}",
                describe(leaves)
            )));
        }
        let inferred = extent / known_product;
        trace!(axis, inferred, group = %id, "inferred axis length");
        sizes.insert(axis, inferred);
    }

    let actual = sizes.product_of(leaves.iter().copied())?;
    if actual != extent {
        return Err(RearrangeError::inference(format!(
            "group size mismatch for {}: expected {extent}, got {actual}",
            describe(leaves)
        )));
    }
    Ok(())
}

fn describe(leaves: &[&str]) -> String {
    format!("({})", leaves.join(" "))
}
