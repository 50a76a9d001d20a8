//! Caller-supplied axis lengths.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Axis lengths known to the caller before resolution, e.g. `h=5`.
///
/// Iteration is ordered by axis name, so errors about caller lengths always
/// name the same axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownLengths {
    lengths: BTreeMap<String, usize>,
}

impl KnownLengths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the length of `axis`.
    pub fn with(mut self, axis: impl Into<String>, length: usize) -> Self {
        self.insert(axis, length);
        self
    }

    pub fn insert(&mut self, axis: impl Into<String>, length: usize) -> Option<usize> {
        self.lengths.insert(axis.into(), length)
    }

    #[inline]
    pub fn get(&self, axis: &str) -> Option<usize> {
        self.lengths.get(axis).copied()
    }

    #[inline]
    pub fn contains(&self, axis: &str) -> bool {
        self.lengths.contains_key(axis)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.lengths.iter().map(|(axis, &length)| (axis.as_str(), length))
    }
}

impl<'a> FromIterator<(&'a str, usize)> for KnownLengths {
    fn from_iter<I: IntoIterator<Item = (&'a str, usize)>>(iter: I) -> Self {
        Self {
            lengths: iter
                .into_iter()
                .map(|(axis, length)| (axis.to_string(), length))
                .collect(),
        }
    }
}

impl<'a> From<&[(&'a str, usize)]> for KnownLengths {
    fn from(pairs: &[(&'a str, usize)]) -> Self {
        pairs.iter().copied().collect()
    }
}

impl<'a, const N: usize> From<[(&'a str, usize); N]> for KnownLengths {
    fn from(pairs: [(&'a str, usize); N]) -> Self {
        pairs.into_iter().collect()
    }
}
