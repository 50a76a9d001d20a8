//! Tensor capability surface used by the executor.
//!
//! The rearrange engine never touches element storage itself; it drives a
//! tensor through the primitives below. [`HostTensor`] is a strided
//! implementation kept on the host.

mod host;

pub use host::HostTensor;

use crate::error::RearrangeResult;
use crate::shape::element_count;

/// Structural primitives a tensor must expose to be rearranged.
///
/// Every operation returns a new value and leaves `self` untouched, so a
/// failed rearrange never leaves a half-transformed tensor behind.
pub trait TensorPrimitives: Clone {
    /// Dimension extents, outermost first.
    fn shape(&self) -> &[usize];

    /// Replaces dimension `axis` with `sizes`, whose product must equal its extent.
    fn split_axis(&self, axis: usize, sizes: &[usize]) -> RearrangeResult<Self>;

    /// Repeats the size-1 dimension `axis` until it has extent `size`.
    fn expand_axis(&self, axis: usize, size: usize) -> RearrangeResult<Self>;

    /// Reorders dimensions so that output dimension `i` is input dimension `perm[i]`.
    fn permute(&self, perm: &[usize]) -> RearrangeResult<Self>;

    /// Reinterprets the tensor with `shape`, which must hold the same number of elements.
    fn reshape(&self, shape: &[usize]) -> RearrangeResult<Self>;

    /// Total number of elements, or `None` if the count overflows `usize`.
    fn num_elements(&self) -> Option<usize> {
        element_count(self.shape())
    }

    #[inline]
    fn rank(&self) -> usize {
        self.shape().len()
    }
}
