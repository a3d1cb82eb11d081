// Test intent: verifies axis canonicalization of arbitrary shapes, including collapsing and rejection.
use vkplan::{plan_axes, AxisLayout, ErrorKind, PlanError};

fn layout(shape: [usize; 4], skip: [bool; 3], ndim: usize) -> AxisLayout {
    AxisLayout { shape, skip, ndim }
}

#[test]
fn adjacent_batch_axes_collapse() {
    let l = plan_axes(&[4, 5, 6, 7], Some(&[2, 3]), None).unwrap();
    assert_eq!(l, layout([7, 6, 20, 1], [false, false, false], 2));
    assert_eq!(l.transformed_axes(), (42, 2));
}

#[test]
fn batch_runs_on_both_sides_collapse_separately() {
    // 8*9 in front of the transformed pair, 4*5 behind it.
    let l = plan_axes(&[4, 5, 6, 7, 8, 9], Some(&[2, 3]), None).unwrap();
    assert_eq!(l, layout([72, 7, 6, 20], [true, false, false], 3));
    assert_eq!(l.transformed_axes(), (42, 2));
    assert_eq!(l.shape.iter().product::<usize>(), 4 * 5 * 6 * 7 * 8 * 9);
}

#[test]
fn three_trailing_axes_of_a_4d_array() {
    let l = plan_axes(&[4, 5, 6, 7], Some(&[1, 2, 3]), None).unwrap();
    assert_eq!(l, layout([7, 6, 5, 4], [false; 3], 3));
    let by_ndim = plan_axes(&[4, 5, 6, 7], None, Some(3)).unwrap();
    assert_eq!(by_ndim, l);
}

#[test]
fn full_4d_transform_is_unsupported() {
    for (axes, ndim) in [(None, None), (None, Some(4)), (Some(&[0isize, 1, 2, 3][..]), None)] {
        let err = plan_axes(&[4, 5, 6, 7], axes, ndim).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedTransform);
        match err {
            PlanError::UnsupportedTransform {
                shape,
                collapsed,
                skip,
                ..
            } => {
                assert_eq!(shape, vec![4, 5, 6, 7]);
                assert_eq!(collapsed, vec![7, 6, 5, 4]);
                assert_eq!(skip, vec![false; 4]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}

#[test]
fn slowest_axis_only() {
    let l = plan_axes(&[4, 5, 6, 7], Some(&[0]), None).unwrap();
    assert_eq!(l, layout([210, 4, 1, 1], [true, false, false], 2));
    assert_eq!(l.transformed_axes(), (4, 1));
}

#[test]
fn gap_between_transformed_axes() {
    let l = plan_axes(&[3, 4, 5, 6, 7], Some(&[-1, -4]), None).unwrap();
    // 6*5 sits between the two transformed axes, 3 trails as batch.
    assert_eq!(l, layout([7, 30, 4, 3], [false, true, false], 3));
    assert!(plan_axes(&[3, 4, 5, 6, 7], Some(&[-1, -5]), None).is_ok());
    let err = plan_axes(&[3, 4, 5, 6, 7], Some(&[-1, -3, -5]), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedTransform);
}

#[test]
fn negative_and_positive_axes_agree() {
    let a = plan_axes(&[2, 3, 4], Some(&[-1, -2]), None).unwrap();
    let b = plan_axes(&[2, 3, 4], Some(&[2, 1]), None).unwrap();
    assert_eq!(a, b);
}

#[test]
fn invalid_requests() {
    assert_eq!(plan_axes(&[], None, None), Err(PlanError::EmptyShape));
    assert_eq!(
        plan_axes(&[4, 0], None, None),
        Err(PlanError::ZeroExtent { axis: 1 })
    );
    assert_eq!(
        plan_axes(&[4, 8], Some(&[-1]), Some(2)),
        Err(PlanError::AxisRankMismatch { axes: 1, ndim: 2 })
    );
    assert_eq!(
        plan_axes(&[4, 8], Some(&[2]), None),
        Err(PlanError::AxisOutOfRange { axis: 2, rank: 2 })
    );
    assert_eq!(
        plan_axes(&[4, 8], Some(&[-3]), None),
        Err(PlanError::AxisOutOfRange { axis: -3, rank: 2 })
    );
    assert_eq!(
        plan_axes(&[4, 8], Some(&[]), None),
        Err(PlanError::NoTransformAxes)
    );
    assert_eq!(
        plan_axes(&[4, 8], None, Some(3)),
        Err(PlanError::AxisOutOfRange { axis: -3, rank: 2 })
    );
}

#[test]
fn collapse_overflow_is_reported() {
    assert_eq!(
        plan_axes(&[usize::MAX, 2, 4], Some(&[-1]), None),
        Err(PlanError::ShapeOverflow)
    );
}
