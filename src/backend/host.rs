//! Host-side strided tensor.
//!
//! Permutations and broadcasts only rewrite strides; data is copied into a
//! contiguous buffer only when a reshape cannot be expressed on the current
//! strides.
//!
//! Every constructor and primitive checks that the element count fits in
//! `usize`, so [`HostTensor::len`] never overflows.

use alloc::format;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use super::TensorPrimitives;
use crate::error::{RearrangeError, RearrangeResult};
use crate::shape::element_count;

/// A strided tensor whose elements live in a shared host buffer.
#[derive(Clone)]
pub struct HostTensor<E> {
    data: Arc<[E]>,
    shape: Vec<usize>,
    strides: Vec<usize>,
}

impl<E: Copy> HostTensor<E> {
    /// Wraps `data` laid out row-major with `shape`.
    pub fn from_vec(data: Vec<E>, shape: &[usize]) -> RearrangeResult<Self> {
        let expected = element_count(shape).ok_or_else(|| {
            RearrangeError::primitive("from_vec", format!("shape {shape:?} is too large"))
        })?;
        if data.len() != expected {
            return Err(RearrangeError::primitive(
                "from_vec",
                format!("shape {shape:?} needs {expected} elements, got {}", data.len()),
            ));
        }
        Ok(Self {
            data: data.into(),
            shape: shape.to_vec(),
            strides: compute_strides(shape),
        })
    }

    /// Builds a tensor whose element at row-major position `i` is `f(i)`.
    ///
    /// # Panics
    ///
    /// Panics if the element count of `shape` overflows `usize`.
    pub fn from_fn(shape: &[usize], f: impl FnMut(usize) -> E) -> Self {
        let len: usize = shape.iter().product();
        Self {
            data: (0..len).map(f).collect(),
            shape: shape.to_vec(),
            strides: compute_strides(shape),
        }
    }

    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Returns true if the elements are laid out row-major without gaps or repeats.
    pub fn is_contiguous(&self) -> bool {
        self.strides == compute_strides(&self.shape) && self.data.len() == self.len()
    }

    /// Number of logical elements.
    ///
    /// Cannot overflow: every constructor and primitive rejects shapes whose
    /// element count does not fit in `usize`.
    #[inline]
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at a multi-dimensional index.
    pub fn get(&self, index: &[usize]) -> Option<E> {
        if index.len() != self.shape.len() || index.iter().zip(&self.shape).any(|(&i, &d)| i >= d) {
            return None;
        }
        let offset: usize = index.iter().zip(&self.strides).map(|(&i, &s)| i * s).sum();
        self.data.get(offset).copied()
    }

    /// Copies the elements out in logical row-major order.
    pub fn to_vec(&self) -> Vec<E> {
        let len = self.len();
        if len == 0 {
            return Vec::new();
        }
        if self.is_contiguous() {
            return self.data.to_vec();
        }

        let rank = self.shape.len();
        let mut out = Vec::with_capacity(len);
        let mut index = vec![0usize; rank];
        let mut offset = 0usize;

        for _ in 0..len {
            out.push(self.data[offset]);
            // Odometer increment, innermost dimension first.
            for dim in (0..rank).rev() {
                index[dim] += 1;
                offset += self.strides[dim];
                if index[dim] < self.shape[dim] {
                    break;
                }
                offset -= self.strides[dim] * self.shape[dim];
                index[dim] = 0;
            }
        }
        out
    }

    /// Returns a contiguous copy, or a cheap clone if already contiguous.
    pub fn to_contiguous(&self) -> Self {
        if self.is_contiguous() {
            return self.clone();
        }
        Self {
            data: self.to_vec().into(),
            shape: self.shape.clone(),
            strides: compute_strides(&self.shape),
        }
    }

    /// Strides that view the current elements as `shape` without copying.
    ///
    /// Walks both shapes from the innermost dimension, one chunk of
    /// stride-compatible source dimensions at a time; every chunk must be
    /// covered exactly by consecutive target dimensions. Returns `None` when
    /// some target dimension would straddle two chunks.
    fn view_strides(&self, shape: &[usize]) -> Option<Vec<usize>> {
        if self.is_empty() || self.shape.is_empty() {
            return None;
        }

        let mut strides = vec![0usize; shape.len()];
        let mut target = shape.len();
        let mut chunk_stride = self.strides[self.shape.len() - 1];
        let mut chunk_elements = 1usize;
        let mut view_elements = 1usize;

        for dim in (0..self.shape.len()).rev() {
            chunk_elements *= self.shape[dim];
            let chunk_ends = dim == 0
                || (self.shape[dim - 1] != 1
                    && self.strides[dim - 1] != chunk_elements * chunk_stride);
            if !chunk_ends {
                continue;
            }

            while target > 0 && (view_elements < chunk_elements || shape[target - 1] == 1) {
                target -= 1;
                strides[target] = view_elements * chunk_stride;
                view_elements *= shape[target];
            }
            if view_elements != chunk_elements {
                return None;
            }
            if dim > 0 {
                chunk_stride = self.strides[dim - 1];
                chunk_elements = 1;
                view_elements = 1;
            }
        }

        (target == 0).then_some(strides)
    }

    fn check_axis(&self, op: &'static str, axis: usize) -> RearrangeResult<()> {
        if axis >= self.shape.len() {
            return Err(RearrangeError::primitive(
                op,
                format!("axis {axis} out of range for rank {}", self.shape.len()),
            ));
        }
        Ok(())
    }
}

impl<E: Copy> TensorPrimitives for HostTensor<E> {
    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn split_axis(&self, axis: usize, sizes: &[usize]) -> RearrangeResult<Self> {
        self.check_axis("split_axis", axis)?;
        let extent = self.shape[axis];
        if sizes.is_empty() || element_count(sizes) != Some(extent) {
            return Err(RearrangeError::primitive(
                "split_axis",
                format!("cannot split axis {axis} of size {extent} into {sizes:?}"),
            ));
        }

        // The innermost part keeps the original stride, outer parts scale it.
        let mut split_strides = vec![0usize; sizes.len()];
        let mut stride = self.strides[axis];
        for (slot, &size) in split_strides.iter_mut().zip(sizes).rev() {
            *slot = stride;
            stride *= size;
        }

        let mut shape = Vec::with_capacity(self.shape.len() + sizes.len() - 1);
        shape.extend_from_slice(&self.shape[..axis]);
        shape.extend_from_slice(sizes);
        shape.extend_from_slice(&self.shape[axis + 1..]);

        let mut strides = Vec::with_capacity(shape.len());
        strides.extend_from_slice(&self.strides[..axis]);
        strides.extend_from_slice(&split_strides);
        strides.extend_from_slice(&self.strides[axis + 1..]);

        Ok(Self {
            data: self.data.clone(),
            shape,
            strides,
        })
    }

    fn expand_axis(&self, axis: usize, size: usize) -> RearrangeResult<Self> {
        self.check_axis("expand_axis", axis)?;
        if self.shape[axis] != 1 {
            return Err(RearrangeError::primitive(
                "expand_axis",
                format!("can only expand axes of size 1, got {}", self.shape[axis]),
            ));
        }

        let mut expanded = self.clone();
        expanded.shape[axis] = size;
        expanded.strides[axis] = 0;
        if element_count(&expanded.shape).is_none() {
            return Err(RearrangeError::primitive(
                "expand_axis",
                format!("expanding axis {axis} to {size} overflows the element count"),
            ));
        }
        Ok(expanded)
    }

    fn permute(&self, perm: &[usize]) -> RearrangeResult<Self> {
        let rank = self.shape.len();
        let mut seen = vec![false; rank];
        for &p in perm {
            if p >= rank || core::mem::replace(&mut seen[p], true) {
                return Err(RearrangeError::primitive(
                    "permute",
                    format!("{perm:?} is not a permutation of {rank} axes"),
                ));
            }
        }
        if perm.len() != rank {
            return Err(RearrangeError::primitive(
                "permute",
                format!("{perm:?} is not a permutation of {rank} axes"),
            ));
        }

        Ok(Self {
            data: self.data.clone(),
            shape: perm.iter().map(|&i| self.shape[i]).collect(),
            strides: perm.iter().map(|&i| self.strides[i]).collect(),
        })
    }

    fn reshape(&self, shape: &[usize]) -> RearrangeResult<Self> {
        let from_elements = self.len();
        let to_elements = element_count(shape).ok_or_else(|| {
            RearrangeError::primitive("reshape", format!("shape {shape:?} is too large"))
        })?;
        if from_elements != to_elements {
            return Err(RearrangeError::Reshape {
                from_elements,
                to_elements,
                shape: shape.to_vec(),
            });
        }

        if let Some(strides) = self.view_strides(shape) {
            return Ok(Self {
                data: self.data.clone(),
                shape: shape.to_vec(),
                strides,
            });
        }

        let contiguous = self.to_contiguous();
        Ok(Self {
            data: contiguous.data,
            shape: shape.to_vec(),
            strides: compute_strides(shape),
        })
    }
}

impl<E: Copy + PartialEq> PartialEq for HostTensor<E> {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.to_vec() == other.to_vec()
    }
}

impl<E: Copy + fmt::Debug> fmt::Debug for HostTensor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostTensor")
            .field("shape", &self.shape)
            .field("data", &self.to_vec())
            .finish()
    }
}

/// Computes strides for a given shape (row-major order).
fn compute_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1usize; shape.len()];
    for i in (0..shape.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}
