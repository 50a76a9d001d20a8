//! Axis tokens for rearrange patterns.

use alloc::string::String;
use core::fmt;

/// Identifier of a parenthesized group, assigned in order of discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub usize);

impl GroupId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group_{}", self.0)
    }
}

/// A single token on one side of a rearrange pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AxisToken {
    /// A named elementary axis such as `h` or `batch_1`.
    Named(String),
    /// A reference to a parenthesized group in the [`GroupTable`](super::GroupTable).
    Group(GroupId),
    /// The `...` token capturing a run of dimensions.
    Wildcard,
}

impl AxisToken {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    #[inline]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, AxisToken::Wildcard)
    }

    /// Returns the identifier if this is a named axis.
    #[inline]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            AxisToken::Named(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the group id if this is a group reference.
    #[inline]
    pub fn as_group(&self) -> Option<GroupId> {
        match self {
            AxisToken::Group(id) => Some(*id),
            _ => None,
        }
    }
}

/// Returns true for the literal `1` axis, which marks a size-1 dimension to broadcast.
#[inline]
pub fn is_broadcast_sentinel(name: &str) -> bool {
    name == "1"
}
