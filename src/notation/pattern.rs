//! Complete rearrange pattern representation.

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use super::axis::AxisToken;
use super::groups::GroupTable;

/// A parsed `input -> output` rearrange pattern.
///
/// Both sides share one [`GroupTable`]; group ids keep counting across the arrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RearrangePattern {
    /// Tokens left of the arrow.
    input: Vec<AxisToken>,
    /// Tokens right of the arrow.
    output: Vec<AxisToken>,
    /// Group definitions referenced by either side.
    groups: GroupTable,
    /// Every distinct identifier seen while parsing.
    identifiers: BTreeSet<String>,
    /// Original pattern string (if available).
    original: Option<String>,
}

impl RearrangePattern {
    pub fn new(
        input: Vec<AxisToken>,
        output: Vec<AxisToken>,
        groups: GroupTable,
        identifiers: BTreeSet<String>,
    ) -> Self {
        Self {
            input,
            output,
            groups,
            identifiers,
            original: None,
        }
    }

    /// Sets the original pattern string.
    pub fn with_original(mut self, original: impl Into<String>) -> Self {
        self.original = Some(original.into());
        self
    }

    #[inline]
    pub fn input(&self) -> &[AxisToken] {
        &self.input
    }

    #[inline]
    pub fn output(&self) -> &[AxisToken] {
        &self.output
    }

    #[inline]
    pub fn groups(&self) -> &GroupTable {
        &self.groups
    }

    #[inline]
    pub fn identifiers(&self) -> &BTreeSet<String> {
        &self.identifiers
    }

    #[inline]
    pub fn original(&self) -> Option<&str> {
        self.original.as_deref()
    }

    /// Returns true if the input side captures dimensions with `...`.
    pub fn input_has_wildcard(&self) -> bool {
        self.input.iter().any(AxisToken::is_wildcard)
    }

    /// Returns true if the output side contains `...`.
    pub fn output_has_wildcard(&self) -> bool {
        self.output.iter().any(AxisToken::is_wildcard)
    }

    /// Returns true if `name` appears anywhere in the pattern.
    pub fn mentions(&self, name: &str) -> bool {
        self.identifiers.contains(name)
    }

    fn write_tokens(
        &self,
        f: &mut fmt::Formatter<'_>,
        tokens: &[AxisToken],
        depth: usize,
    ) -> fmt::Result {
        for (i, token) in tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match token {
                AxisToken::Named(name) => f.write_str(name)?,
                AxisToken::Wildcard => f.write_str("...")?,
                AxisToken::Group(id) => {
                    f.write_str("(")?;
                    // A well-formed table never nests deeper than its size.
                    match self.groups.get(*id) {
                        Some(members) if depth < self.groups.len() => {
                            self.write_tokens(f, members, depth + 1)?
                        }
                        _ => write!(f, "{id}")?,
                    }
                    f.write_str(")")?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for RearrangePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tokens(f, &self.input, 0)?;
        f.write_str(" -> ")?;
        self.write_tokens(f, &self.output, 0)
    }
}
