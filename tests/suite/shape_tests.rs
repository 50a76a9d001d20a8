//! Axis size resolution tests.

use cubek_rearrange::notation::parse_rearrange;
use cubek_rearrange::{ErrorKind, KnownLengths, RearrangeResult, AxisSizes, resolve_axis_sizes};
use pretty_assertions::assert_eq;

fn resolve(shape: &[usize], pattern: &str, known: KnownLengths) -> RearrangeResult<AxisSizes> {
    let pattern = parse_rearrange(pattern)?;
    resolve_axis_sizes(shape, pattern.input(), pattern.groups(), &known)
}

#[test]
fn test_patch_sizes_are_inferred() {
    let sizes = resolve(
        &[2, 3, 32, 32],
        "... (h ph) (w pw) -> ... h w (ph pw)",
        KnownLengths::new().with("ph", 8).with("pw", 8),
    )
    .unwrap();

    assert_eq!(sizes.get("h"), Some(4));
    assert_eq!(sizes.get("w"), Some(4));
    assert_eq!(sizes.wildcard(), Some(&[2, 3][..]));
}

#[test]
fn test_caller_lengths_are_kept_even_if_unused() {
    let sizes = resolve(&[3, 4], "a b -> b a", KnownLengths::new().with("z", 9)).unwrap();
    assert_eq!(sizes.get("z"), Some(9));
    assert_eq!(sizes.len(), 3);
}

#[test]
fn test_group_divisibility_error() {
    let err = resolve(&[2, 3, 30, 40], "... (h p) w -> ... h p w", KnownLengths::new().with("p", 7))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeInference);
    assert!(err.to_string().contains("30"), "{err}");
}

#[test]
fn test_wildcard_needs_enough_dimensions() {
    let err = resolve(&[5], "... a b c -> ... a b c", KnownLengths::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeInference);
}
