//! Rearrange pattern parser.
//!
//! Parses strings like "b (h w) c -> b h w c" into a structured [`RearrangePattern`].

use alloc::collections::BTreeSet;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use super::axis::AxisToken;
use super::groups::GroupTable;
use super::pattern::RearrangePattern;
use crate::error::{RearrangeError, RearrangeResult};

const ARROW: &str = "->";
const ELLIPSIS: &str = "...";
/// Characters of context shown on each side of an offending position.
const CONTEXT_RADIUS: usize = 10;

/// Parses a rearrange pattern string.
///
/// # Grammar
///
/// ```text
/// pattern     ::= side '->' side
/// side        ::= item*
/// item        ::= identifier | '(' item+ ')' | '...'
/// identifier  ::= [A-Za-z0-9_]+
/// ```
///
/// At most one `...` may appear on each side, and never inside parentheses.
///
/// # Examples
///
/// ```ignore
/// let pattern = parse_rearrange("(h w) c -> h w c")?;        // split
/// let pattern = parse_rearrange("... h w -> ... (h w)")?;    // merge trailing axes
/// let pattern = parse_rearrange("((a b) c) d -> a (b (c d))")?;
/// ```
pub fn parse_rearrange(pattern: &str) -> RearrangeResult<RearrangePattern> {
    let (input_str, output_str) = split_arrow(pattern)?;

    validate_single_ellipsis(input_str.trim())?;
    validate_single_ellipsis(output_str.trim())?;

    let mut parser = PatternParser::default();
    let input = parser.parse_side(input_str.trim(), 0)?;
    let output = parser.parse_side(output_str.trim(), 0)?;

    let PatternParser {
        groups,
        identifiers,
    } = parser;

    Ok(RearrangePattern::new(input, output, groups, identifiers).with_original(pattern))
}

fn split_arrow(pattern: &str) -> RearrangeResult<(&str, &str)> {
    match pattern.matches(ARROW).count() {
        0 => Err(RearrangeError::syntax(
            "missing arrow '->', pattern must be in format 'input -> output'",
        )),
        1 => Ok(pattern.split_once(ARROW).unwrap_or((pattern, ""))),
        _ => Err(RearrangeError::syntax(
            "multiple arrows '->' found, pattern must contain exactly one arrow",
        )),
    }
}

fn validate_single_ellipsis(side: &str) -> RearrangeResult<()> {
    if side.matches(ELLIPSIS).count() > 1 {
        return Err(RearrangeError::syntax(format!(
            "multiple ellipsis found in '{side}', only one '...' is allowed"
        )));
    }
    Ok(())
}

/// State shared by both sides of a single parse call.
#[derive(Default)]
struct PatternParser {
    groups: GroupTable,
    identifiers: BTreeSet<String>,
}

impl PatternParser {
    /// Parses one side (or the inside of a group at `depth > 0`) into tokens.
    fn parse_side(&mut self, expr: &str, depth: usize) -> RearrangeResult<Vec<AxisToken>> {
        let mut tokens = Vec::new();
        let mut i = 0;

        while i < expr.len() {
            let c = next_char(expr, i);

            if expr[i..].starts_with(ELLIPSIS) {
                if depth > 0 {
                    return Err(RearrangeError::syntax(format!(
                        "'...' is not allowed inside parentheses near '{}'",
                        context(expr, i)
                    )));
                }
                tokens.push(AxisToken::Wildcard);
                i += ELLIPSIS.len();
            } else if c == '(' {
                let close = find_matching_paren(expr, i)?;
                let members = self.parse_side(&expr[i + 1..close], depth + 1)?;
                if members.is_empty() {
                    return Err(RearrangeError::syntax(format!(
                        "empty group '{}'",
                        &expr[i..=close]
                    )));
                }
                let id = self.groups.push(members);
                tokens.push(AxisToken::Group(id));
                i = close + 1;
            } else if c == ')' {
                return Err(RearrangeError::syntax(format!(
                    "unmatched ')' near '{}'",
                    context(expr, i)
                )));
            } else if is_identifier_char(c) {
                let start = i;
                while i < expr.len() && is_identifier_char(next_char(expr, i)) {
                    i += next_char(expr, i).len_utf8();
                }
                let name = &expr[start..i];
                self.identifiers.insert(name.to_string());
                tokens.push(AxisToken::named(name));
            } else if c.is_whitespace() {
                i += c.len_utf8();
            } else {
                return Err(RearrangeError::syntax(format!(
                    "invalid character '{c}' near '{}'",
                    context(expr, i)
                )));
            }
        }

        Ok(tokens)
    }
}

#[inline]
fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Returns the char starting at byte offset `at`; `at` must be a char boundary.
#[inline]
fn next_char(expr: &str, at: usize) -> char {
    expr[at..].chars().next().unwrap_or('\0')
}

/// Returns the byte index of the `)` closing the `(` at `open`.
fn find_matching_paren(expr: &str, open: usize) -> RearrangeResult<usize> {
    let mut depth = 0usize;
    for (offset, byte) in expr.as_bytes()[open..].iter().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(open + offset);
                }
            }
            _ => {}
        }
    }
    Err(RearrangeError::syntax(format!(
        "unmatched parentheses near '{}'",
        context(expr, open)
    )))
}

/// Returns the text surrounding byte offset `at`, clamped to char boundaries.
fn context(expr: &str, at: usize) -> &str {
    let mut start = at.saturating_sub(CONTEXT_RADIUS);
    while !expr.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (at + CONTEXT_RADIUS + 1).min(expr.len());
    while !expr.is_char_boundary(end) {
        end += 1;
    }
    &expr[start..end]
}
