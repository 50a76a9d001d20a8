//! Behavioral properties that must hold for any valid rearrange.

use cubek_rearrange::{
    ErrorKind, HostTensor, KnownLengths, TensorPrimitives, rearrange,
};
use pretty_assertions::assert_eq;

fn arange(shape: &[usize]) -> HostTensor<i64> {
    HostTensor::from_fn(shape, |i| i as i64)
}

#[test]
fn test_element_count_is_preserved() {
    let cases: &[(&[usize], &str, &[(&str, usize)])] = &[
        (&[30, 3], "(h w) c -> h w c", &[("h", 5)]),
        (&[2, 3, 30, 40], "... h w -> ... (h w)", &[]),
        (&[2, 3, 4, 32, 32], "... (h ph) (w pw) -> ... h w (ph pw)", &[("ph", 8), ("pw", 8)]),
        (&[24, 5], "((a b) c) d -> a (b (c d))", &[("a", 2), ("b", 3)]),
        (&[2, 3, 4, 5], "b ... c -> c ... b", &[]),
    ];

    for &(shape, pattern, lengths) in cases {
        let x = arange(shape);
        let y = rearrange(&x, pattern, lengths).unwrap();
        assert_eq!(y.num_elements(), x.num_elements(), "{pattern}");
    }
}

#[test]
fn test_either_group_member_gives_same_result() {
    let x = arange(&[30, 3]);
    let from_h = rearrange(&x, "(h w) c -> h w c", [("h", 5)]).unwrap();
    let from_w = rearrange(&x, "(h w) c -> h w c", [("w", 6)]).unwrap();

    assert_eq!(from_h.shape(), &[5, 6, 3]);
    assert_eq!(from_h, from_w);
}

#[test]
fn test_transpose_round_trip() {
    let x = arange(&[3, 4]);
    let y = rearrange(&x, "h w -> w h", KnownLengths::new()).unwrap();
    assert_eq!(y.shape(), &[4, 3]);

    let back = rearrange(&y, "w h -> h w", KnownLengths::new()).unwrap();
    assert_eq!(back, x);
}

#[test]
fn test_split_and_merge_round_trip() {
    let x = arange(&[2, 3, 32, 32]);
    let patches = rearrange(
        &x,
        "b c (h ph) (w pw) -> b (h w) (ph pw c)",
        [("ph", 8), ("pw", 8)],
    )
    .unwrap();
    assert_eq!(patches.shape(), &[2, 16, 192]);

    let back = rearrange(
        &patches,
        "b (h w) (ph pw c) -> b c (h ph) (w pw)",
        [("h", 4), ("ph", 8), ("pw", 8)],
    )
    .unwrap();
    assert_eq!(back, x);
}

#[test]
fn test_wildcard_captures_any_rank() {
    let cases: &[(&[usize], &[usize])] = &[
        (&[30, 40], &[1200]),
        (&[2, 30, 40], &[2, 1200]),
        (&[2, 3, 30, 40], &[2, 3, 1200]),
    ];

    for &(shape, expected) in cases {
        let y = rearrange(&arange(shape), "... h w -> ... (h w)", KnownLengths::new()).unwrap();
        assert_eq!(y.shape(), expected);
    }
}

#[test]
fn test_nested_groups_resolve() {
    let y = rearrange(
        &arange(&[24, 5]),
        "((a b) c) d -> a (b (c d))",
        [("a", 2), ("b", 3), ("c", 4)],
    )
    .unwrap();
    assert_eq!(y.shape(), &[2, 60]);
    // Splitting then merging in the same order keeps row-major data.
    assert_eq!(y.to_vec(), (0..120).collect::<Vec<_>>());
}

#[test]
fn test_error_taxonomy() {
    let x = arange(&[2, 3, 30, 40]);

    let err = rearrange(&x, "... h ... w -> ... h w", KnownLengths::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PatternSyntax);

    let err = rearrange(&x, "... (h p) w -> ... h p w", [("p", 7)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeInference);

    let err = rearrange(&x, "... h w -> ... h", KnownLengths::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Composition);
}

#[test]
fn test_failures_leave_input_untouched() {
    let x = arange(&[2, 3]);
    let before = x.to_vec();
    assert!(rearrange(&x, "a b -> a", KnownLengths::new()).is_err());
    assert_eq!(x.to_vec(), before);
}
