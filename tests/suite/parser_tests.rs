//! Parser tests for rearrange patterns.

use cubek_rearrange::notation::{AxisToken, GroupId, parse_rearrange};
use cubek_rearrange::ErrorKind;
use pretty_assertions::assert_eq;

#[test]
fn test_parse_basic_transpose() {
    let pattern = parse_rearrange("h w -> w h").unwrap();
    assert_eq!(pattern.input().len(), 2);
    assert!(!pattern.input_has_wildcard());
    assert!(pattern.groups().is_empty());
}

#[test]
fn test_parse_patch_extraction() {
    let pattern = parse_rearrange("b c (h p1) (w p2) -> b (h w) (p1 p2 c)").unwrap();
    assert_eq!(pattern.groups().len(), 4);
    assert_eq!(pattern.identifiers().len(), 6);
    assert_eq!(pattern.to_string(), "b c (h p1) (w p2) -> b (h w) (p1 p2 c)");
}

#[test]
fn test_group_ids_continue_across_the_arrow() {
    let pattern = parse_rearrange("(a b) c -> a (b c)").unwrap();
    assert_eq!(pattern.input()[0], AxisToken::Group(GroupId(0)));
    assert_eq!(pattern.output()[1], AxisToken::Group(GroupId(1)));
}

#[test]
fn test_parse_deep_nesting() {
    let pattern = parse_rearrange("(((a b) c) d) -> a b c d").unwrap();
    let leaves = pattern.groups().expand(GroupId(2)).unwrap();
    assert_eq!(leaves.as_slice(), &["a", "b", "c", "d"]);
}

#[test]
fn test_parse_empty_sides() {
    let pattern = parse_rearrange(" -> ").unwrap();
    assert!(pattern.input().is_empty());
    assert!(pattern.output().is_empty());
}

#[test]
fn test_parse_errors_are_syntax_errors() {
    for text in [
        "h w w h",
        "a -> b -> c",
        "... h ... w -> ... (h w)",
        "(h w -> h w",
        "h w) -> h w",
        "() h -> h",
        "h w -> h * w",
        "h w -> h .. w",
    ] {
        let err = parse_rearrange(text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PatternSyntax, "pattern {text:?}");
    }
}

#[test]
fn test_error_message_carries_context() {
    let err = parse_rearrange("batch height $ -> batch").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("'$'"), "{message}");
    assert!(message.contains("height"), "{message}");
}
