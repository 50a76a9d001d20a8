//! Integration tests for cubek-rearrange.
//!
//! These tests run complete rearranges on host tensors.

use cubek_rearrange::{
    ErrorKind, HostTensor, KnownLengths, RearrangeConfig, RearrangeError, RearrangeStep,
    TensorPrimitives, create_plan, parse_rearrange, rearrange, rearrange_with_config,
    rearrange_with_pattern,
};
use pretty_assertions::assert_eq;

fn arange(shape: &[usize]) -> HostTensor<f32> {
    HostTensor::from_fn(shape, |i| i as f32)
}

fn none() -> KnownLengths {
    KnownLengths::new()
}

#[test]
fn test_split_group_with_known_height() {
    let x = arange(&[30, 3]);
    let y = rearrange(&x, "(h w) c -> h w c", [("h", 5)]).unwrap();
    assert_eq!(y.shape(), &[5, 6, 3]);
    // Pure split keeps row-major order.
    assert_eq!(y.to_vec(), x.to_vec());
}

#[test]
fn test_multiple_batch_dimensions() {
    let x = arange(&[2, 3, 4, 30, 40]);
    let y = rearrange(&x, "... h w -> ... (h w)", none()).unwrap();
    assert_eq!(y.shape(), &[2, 3, 4, 1200]);
}

#[test]
fn test_batch_with_patches() {
    let x = arange(&[2, 3, 4, 32, 32]);
    let y = rearrange(
        &x,
        "... (h ph) (w pw) -> ... h w (ph pw)",
        [("ph", 8), ("pw", 8)],
    )
    .unwrap();
    assert_eq!(y.shape(), &[2, 3, 4, 4, 4, 64]);
}

#[test]
fn test_ellipsis_with_grouping() {
    let x = arange(&[2, 3, 30, 40]);
    let y = rearrange(
        &x,
        "... (h1 w1) (h2 w2) -> ... (h1 h2) (w1 w2)",
        [("h1", 5), ("h2", 5)],
    )
    .unwrap();
    assert_eq!(y.shape(), &[2, 3, 25, 48]);

    let y = rearrange(
        &x,
        "... (h1 w1) (h2 w2) -> ... h1 h2 (w1 w2)",
        [("h1", 5), ("h2", 5)],
    )
    .unwrap();
    assert_eq!(y.shape(), &[2, 3, 5, 5, 48]);
}

#[test]
fn test_ellipsis_with_reordering() {
    let x = arange(&[2, 3, 30, 40]);
    let y = rearrange(&x, "... h w -> ... w h", none()).unwrap();
    assert_eq!(y.shape(), &[2, 3, 40, 30]);
    assert_eq!(y.get(&[1, 2, 7, 11]), x.get(&[1, 2, 11, 7]));

    let x = arange(&[2, 3, 4, 32, 32]);
    let y = rearrange(
        &x,
        "... c (h ph) (w pw) -> ... (h w) c (ph pw)",
        [("ph", 8), ("pw", 8)],
    )
    .unwrap();
    assert_eq!(y.shape(), &[2, 3, 16, 4, 64]);
}

#[test]
fn test_wildcard_in_leading_and_middle_positions() {
    let x = arange(&[2, 3, 4, 5]);
    let y = rearrange(&x, "b ... c -> c ... b", none()).unwrap();
    assert_eq!(y.shape(), &[5, 3, 4, 2]);
    assert_eq!(y.get(&[4, 2, 3, 1]), x.get(&[1, 2, 3, 4]));
}

#[test]
fn test_space_to_depth_values() {
    // 1 x 4 x 4 image, 2 x 2 blocks
    let x = arange(&[1, 4, 4]);
    let y = rearrange(&x, "c (h bh) (w bw) -> (bh bw c) h w", [("bh", 2), ("bw", 2)]).unwrap();
    assert_eq!(y.shape(), &[4, 2, 2]);
    assert_eq!(
        y.to_vec(),
        vec![
            0.0, 2.0, 8.0, 10.0, //
            1.0, 3.0, 9.0, 11.0, //
            4.0, 6.0, 12.0, 14.0, //
            5.0, 7.0, 13.0, 15.0,
        ]
    );
}

#[test]
fn test_numeric_expansion() {
    let x = arange(&[2, 1, 3]);
    let y = rearrange(&x, "a 1 c -> a b c", [("b", 3)]).unwrap();
    assert_eq!(y.shape(), &[2, 3, 3]);
    assert_eq!(y.get(&[1, 2, 0]), x.get(&[1, 0, 0]));
}

#[test]
fn test_broadcast_then_merge() {
    let x = arange(&[2, 1]);
    let y = rearrange(&x, "a 1 -> (a b)", [("b", 2)]).unwrap();
    assert_eq!(y.shape(), &[4]);
    assert_eq!(y.to_vec(), vec![0.0, 0.0, 1.0, 1.0]);
}

#[test]
fn test_error_cases() {
    let x = arange(&[2, 3, 30, 40]);

    let err = rearrange(&x, "... h w -> ... h w k", none()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Composition);

    let err = rearrange(&x, "... h w -> ... h", none()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Composition);

    let err = rearrange(&x, "... (h p) w -> ... h p w", [("p", 7)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeInference);

    let err = rearrange(&x, "... h ... w -> ... (h w)", none()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PatternSyntax);
}

#[test]
fn test_pattern_reuse_across_shapes() {
    let pattern = parse_rearrange("b (h w) -> b h w").unwrap();
    let known = KnownLengths::new().with("h", 2);
    let config = RearrangeConfig::default();

    for batch in 1..4 {
        let x = arange(&[batch, 10]);
        let y = rearrange_with_pattern(&x, &pattern, &known, &config).unwrap();
        assert_eq!(y.shape(), &[batch, 2, 5]);
    }
}

#[test]
fn test_strict_config_rejects_unused_lengths() {
    let x = arange(&[3, 4]);
    let err = rearrange_with_config(&x, "a b -> b a", [("c", 2)], &RearrangeConfig::strict())
        .unwrap_err();
    assert!(matches!(err, RearrangeError::ShapeInference { .. }));
}

#[test]
fn test_repeated_failure_reports_same_axis() {
    let x = arange(&[3, 4]);
    let lengths = [("t", 2), ("r", 2), ("p", 2), ("s", 2), ("q", 2)];

    let first = rearrange_with_config(&x, "a b -> b a", lengths, &RearrangeConfig::strict())
        .unwrap_err()
        .to_string();
    assert!(first.contains("'p'"), "{first}");

    for _ in 0..50 {
        let err = rearrange_with_config(&x, "a b -> b a", lengths, &RearrangeConfig::strict())
            .unwrap_err();
        assert_eq!(err.to_string(), first);
    }
}

#[test]
fn test_huge_shape_fails_without_panicking() {
    let pattern = parse_rearrange("a b -> b a").unwrap();
    let err = create_plan(
        &pattern,
        &[1 << 40, 1 << 40],
        &KnownLengths::new(),
        &RearrangeConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeInference);
}

#[test]
fn test_plan_can_be_built_once_and_applied() {
    let pattern = parse_rearrange("(h w) c -> c h w").unwrap();
    let plan = create_plan(
        &pattern,
        &[6, 2],
        &KnownLengths::from([("w", 3)]),
        &RearrangeConfig::default(),
    )
    .unwrap();

    assert_eq!(
        plan.steps(),
        &[
            RearrangeStep::Split {
                axis: 0,
                sizes: vec![2, 3]
            },
            RearrangeStep::Permute {
                perm: vec![2, 0, 1]
            },
        ]
    );

    let y = plan.apply(&arange(&[6, 2])).unwrap();
    assert_eq!(y.shape(), &[2, 2, 3]);
    assert_eq!(y.get(&[1, 1, 2]), Some(11.0));
}
