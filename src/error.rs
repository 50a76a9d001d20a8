//! Error types for rearrange operations.

use alloc::string::String;
use alloc::vec::Vec;

/// Errors that can occur while parsing, resolving, planning or executing a rearrange.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum RearrangeError {
    /// Malformed pattern text.
    #[cfg_attr(feature = "std", error("pattern syntax error: {message}"))]
    PatternSyntax { message: String },

    /// Axis extents could not be inferred consistently from the shape.
    #[cfg_attr(feature = "std", error("shape inference error: {message}"))]
    ShapeInference { message: String },

    /// The input and output axis compositions cannot be matched.
    #[cfg_attr(feature = "std", error("composition error: {message}"))]
    Composition { message: String },

    /// The final merge changes the element count.
    #[cfg_attr(
        feature = "std",
        error("cannot reshape {from_elements} elements into shape {shape:?} ({to_elements} elements)")
    )]
    Reshape {
        from_elements: usize,
        to_elements: usize,
        shape: Vec<usize>,
    },

    /// A tensor primitive rejected its arguments.
    #[cfg_attr(feature = "std", error("{op} failed: {message}"))]
    Primitive { op: &'static str, message: String },
}

/// Coarse category of a [`RearrangeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    PatternSyntax,
    ShapeInference,
    Composition,
    Reshape,
    Primitive,
}

impl RearrangeError {
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::PatternSyntax {
            message: message.into(),
        }
    }

    pub fn inference(message: impl Into<String>) -> Self {
        Self::ShapeInference {
            message: message.into(),
        }
    }

    pub fn composition(message: impl Into<String>) -> Self {
        Self::Composition {
            message: message.into(),
        }
    }

    pub fn primitive(op: &'static str, message: impl Into<String>) -> Self {
        Self::Primitive {
            op,
            message: message.into(),
        }
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PatternSyntax { .. } => ErrorKind::PatternSyntax,
            Self::ShapeInference { .. } => ErrorKind::ShapeInference,
            Self::Composition { .. } => ErrorKind::Composition,
            Self::Reshape { .. } => ErrorKind::Reshape,
            Self::Primitive { .. } => ErrorKind::Primitive,
        }
    }
}

/// Result type for rearrange operations.
pub type RearrangeResult<T> = core::result::Result<T, RearrangeError>;
