//! Flat axis compositions.

use alloc::format;
use alloc::vec::Vec;
use core::fmt;

use crate::error::{RearrangeError, RearrangeResult};
use crate::notation::{AxisToken, GroupExpander};
use crate::shape::AxisSizes;

/// One dimension of a tensor at some stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementaryAxis<'a> {
    /// A named elementary axis.
    Named(&'a str),
    /// The `i`-th dimension captured by `...`.
    Captured(usize),
}

impl fmt::Display for ElementaryAxis<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementaryAxis::Named(name) => f.write_str(name),
            ElementaryAxis::Captured(i) => write!(f, "...[{i}]"),
        }
    }
}

/// Elementary axes in dimension order; its length is the tensor's rank.
pub type Composition<'a> = Vec<ElementaryAxis<'a>>;

/// Expands one side of a pattern symbolically, groups flattened into their leaves.
pub fn flatten_side<'a>(
    tokens: &'a [AxisToken],
    expander: &mut GroupExpander<'a>,
    sizes: &AxisSizes,
) -> RearrangeResult<Composition<'a>> {
    let mut composition = Composition::with_capacity(tokens.len());
    for token in tokens {
        match token {
            AxisToken::Named(name) => composition.push(ElementaryAxis::Named(name.as_str())),
            AxisToken::Group(id) => {
                let leaves = expander.expand(*id)?;
                composition.extend(leaves.iter().map(|&leaf| ElementaryAxis::Named(leaf)));
            }
            AxisToken::Wildcard => {
                let captured = sizes.wildcard().ok_or_else(|| {
                    RearrangeError::composition("'...' on the output side has no match in the input")
                })?;
                composition.extend((0..captured.len()).map(ElementaryAxis::Captured));
            }
        }
    }
    Ok(composition)
}

/// Fails if an elementary axis occurs twice in `composition`.
pub fn ensure_unique(composition: &[ElementaryAxis<'_>], side: &str) -> RearrangeResult<()> {
    for (i, axis) in composition.iter().enumerate() {
        if composition[..i].contains(axis) {
            return Err(RearrangeError::composition(format!(
                "axis '{axis}' appears more than once on the {side} side"
            )));
        }
    }
    Ok(())
}

/// Maps every output axis to the index of the same axis in `input`.
pub fn permutation<'a>(
    input: &[ElementaryAxis<'a>],
    output: &[ElementaryAxis<'a>],
) -> RearrangeResult<Vec<usize>> {
    output
        .iter()
        .map(|axis| {
            input.iter().position(|candidate| candidate == axis).ok_or_else(|| {
                RearrangeError::composition(format!("output axis '{axis}' not found in input"))
            })
        })
        .collect()
}

#[inline]
pub fn is_identity_permutation(perm: &[usize]) -> bool {
    perm.iter().enumerate().all(|(i, &p)| i == p)
}
