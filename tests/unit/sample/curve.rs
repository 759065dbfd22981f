use super::*;
use crate::foundation::core::{Extent, LayerId};
use crate::layer::model::{BoxKeyframe, LayerKindTag};

fn zigzag() -> Vec<ControlPoint> {
    vec![
        ControlPoint::new(0.0, 0.0),
        ControlPoint::new(100.0, 50.0),
        ControlPoint::corner(200.0, 0.0),
        ControlPoint::new(300.0, 80.0),
        ControlPoint::new(400.0, 10.0),
    ]
}

const CURVED: [Interpolation; 4] = [
    Interpolation::Linear,
    Interpolation::Cardinal,
    Interpolation::CatmullRom,
    Interpolation::Basis,
];

#[test]
fn endpoints_are_preserved_for_curved_modes() {
    let pts = zigzag();
    let settings = SampleSettings::default();
    for mode in CURVED {
        for len in [None, Some(2), Some(17), Some(81)] {
            let out = sample_points(&pts, mode, 0.0, len, &settings);
            assert_eq!(out[0], pts[0].to_point(), "{mode:?} {len:?}");
            assert_eq!(*out.last().unwrap(), pts[4].to_point(), "{mode:?} {len:?}");
        }
    }
}

#[test]
fn default_count_uses_floor_and_per_point_density() {
    let settings = SampleSettings::default();
    let out = sample_points(&zigzag(), Interpolation::Cardinal, 0.0, None, &settings);
    assert_eq!(out.len(), 100);

    let many: Vec<ControlPoint> = (0..8)
        .map(|i| ControlPoint::new(f64::from(i) * 10.0, f64::from(i % 2) * 10.0))
        .collect();
    let out = sample_points(&many, Interpolation::Basis, 0.0, None, &settings);
    assert_eq!(out.len(), 160);
}

#[test]
fn requested_length_is_exact() {
    let settings = SampleSettings::default();
    for len in [0usize, 1, 5, 49] {
        let out = sample_points(&zigzag(), Interpolation::Cardinal, 0.0, Some(len), &settings);
        assert_eq!(out.len(), len);
    }
}

#[test]
fn sampling_is_deterministic() {
    let settings = SampleSettings::default();
    let a = sample_points(&zigzag(), Interpolation::Basis, 0.0, Some(33), &settings);
    let b = sample_points(&zigzag(), Interpolation::Basis, 0.0, Some(33), &settings);
    assert_eq!(a, b);
}

#[test]
fn linear_samples_are_equally_spaced() {
    let pts = vec![
        ControlPoint::new(0.0, 0.0),
        ControlPoint::new(30.0, 0.0),
        ControlPoint::new(30.0, 40.0),
    ];
    let out = sample_points(&pts, Interpolation::Linear, 0.0, Some(8), &SampleSettings::default());
    // Total length 70, seven equal steps of 10.
    for w in out.windows(2) {
        let d = (w[1] - w[0]).hypot();
        assert!(d <= 10.0 + 1e-6, "{d}");
    }
    assert!((out[3] - Point::new(30.0, 0.0)).hypot() < 1e-6);
}

#[test]
fn discrete_and_short_inputs_pass_through() {
    let settings = SampleSettings::default();
    let pts = zigzag();
    let out = sample_points(&pts, Interpolation::Points, 0.0, Some(100), &settings);
    assert_eq!(out, pts.iter().map(|p| p.to_point()).collect::<Vec<_>>());

    let one = vec![ControlPoint::new(1.0, 2.0)];
    assert_eq!(
        sample_points(&one, Interpolation::Cardinal, 0.0, Some(10), &settings),
        vec![Point::new(1.0, 2.0)]
    );
    assert!(sample_points(&[], Interpolation::Basis, 0.0, None, &settings).is_empty());
}

#[test]
fn coincident_points_do_not_panic() {
    let pts = vec![ControlPoint::new(5.0, 5.0); 3];
    let out = sample_points(&pts, Interpolation::Cardinal, 0.0, Some(4), &SampleSettings::default());
    assert_eq!(out, vec![Point::new(5.0, 5.0); 4]);
}

#[test]
fn corner_point_is_visited_by_cardinal_path() {
    let pts = zigzag();
    let corner = pts[2].to_point();
    let path = build_path(&pts, Interpolation::Cardinal, 0.0);
    assert_eq!(path.segments().count(), pts.len() - 1);
    assert!(
        path.segments()
            .any(|s| (s.end() - corner).hypot() < 1e-9)
    );
}

#[test]
fn corners_do_not_overshoot_the_vertex() {
    let pts = vec![
        ControlPoint::new(0.0, 0.0),
        ControlPoint::corner(100.0, 0.0),
        ControlPoint::new(100.0, 100.0),
    ];
    let settings = SampleSettings::default();
    for mode in [
        Interpolation::Cardinal,
        Interpolation::CatmullRom,
        Interpolation::Basis,
    ] {
        let out = sample_points(&pts, mode, 0.0, Some(400), &settings);
        let max_x = out.iter().map(|p| p.x).fold(f64::MIN, f64::max);
        let min_y = out.iter().map(|p| p.y).fold(f64::MAX, f64::min);
        assert!(max_x <= 100.0 + 1e-6, "{mode:?} max_x = {max_x}");
        assert!(min_y >= -1e-6, "{mode:?} min_y = {min_y}");
        assert!(
            out.iter()
                .any(|p| (*p - Point::new(100.0, 0.0)).hypot() < 1.0),
            "{mode:?} misses the corner"
        );
    }
}

#[test]
fn smooth_points_still_curve_through_neighbours() {
    let pts = vec![
        ControlPoint::new(0.0, 0.0),
        ControlPoint::new(100.0, 0.0),
        ControlPoint::new(100.0, 100.0),
    ];
    let out = sample_points(&pts, Interpolation::CatmullRom, 0.0, Some(400), &SampleSettings::default());
    let max_x = out.iter().map(|p| p.x).fold(f64::MIN, f64::max);
    assert!(max_x > 100.0 + 1.0);
}

#[test]
fn basis_path_has_tripled_endpoints() {
    let pts = zigzag();
    let path = build_path(&pts, Interpolation::Basis, 0.0);
    let segs: Vec<_> = path.segments().collect();
    assert_eq!(segs[0].start(), pts[0].to_point());
    assert!((segs.last().unwrap().end() - pts[4].to_point()).hypot() < 1e-9);
}

#[test]
fn sample_layer_maps_to_image_pixels() {
    let transform =
        CoordinateTransform::fit(Extent::new(800, 600), Some(Extent::new(1000, 500)), 0.0);
    let mut layer = Layer::new(LayerId(1), "Spline", LayerKindTag::Spline);
    if let Some(points) = layer.points_mut() {
        *points = vec![ControlPoint::new(0.0, 0.0), ControlPoint::new(1.0, 1.0)];
    }
    let out = sample_layer(&layer, &transform, Some(5), &SampleSettings::default());
    assert_eq!(out.len(), 5);
    assert_eq!(out[0], Point::new(0.0, 0.0));
    assert_eq!(out[4], Point::new(1000.0, 500.0));
}

#[test]
fn legacy_pixel_points_are_not_rescaled() {
    let transform =
        CoordinateTransform::fit(Extent::new(800, 600), Some(Extent::new(1000, 500)), 0.0);
    let mut layer = Layer::new(LayerId(1), "Spline", LayerKindTag::Spline);
    if let Some(points) = layer.points_mut() {
        *points = vec![ControlPoint::new(120.0, 80.0), ControlPoint::new(400.0, 300.0)];
    }
    let out = sample_layer(&layer, &transform, Some(5), &SampleSettings::default());
    assert_eq!(out[0], Point::new(120.0, 80.0));
    assert_eq!(out[4], Point::new(400.0, 300.0));
}

#[test]
fn legacy_box_positions_are_not_rescaled() {
    let transform =
        CoordinateTransform::fit(Extent::new(800, 600), Some(Extent::new(1000, 500)), 0.0);
    let mut layer = Layer::new(LayerId(1), "Box", LayerKindTag::Box);
    layer.set_keyframe(BoxKeyframe::new(1, Point::new(100.0, 50.0)));
    layer.set_keyframe(BoxKeyframe::new(3, Point::new(300.0, 150.0)));

    let out = sample_layer(&layer, &transform, None, &SampleSettings::default());
    assert_eq!(out, vec![
        Point::new(100.0, 50.0),
        Point::new(200.0, 100.0),
        Point::new(300.0, 150.0),
    ]);
}

#[test]
fn freehand_without_smoothing_is_verbatim() {
    let transform = CoordinateTransform::fit(Extent::new(100, 100), None, 0.0);
    let mut layer = Layer::new(LayerId(1), "Freehand", LayerKindTag::Freehand);
    if let Some(points) = layer.points_mut() {
        *points = vec![
            ControlPoint::new(0.1, 0.1),
            ControlPoint::new(0.2, 0.3),
            ControlPoint::new(0.4, 0.2),
        ];
    }
    let out = sample_layer(&layer, &transform, Some(50), &SampleSettings::default());
    assert_eq!(out.len(), 3);

    if let LayerKind::Freehand { smoothing, .. } = &mut layer.kind {
        *smoothing = true;
    }
    let out = sample_layer(&layer, &transform, Some(50), &SampleSettings::default());
    assert_eq!(out.len(), 50);
}

#[test]
fn box_layer_yields_one_center_per_frame() {
    let transform = CoordinateTransform::fit(Extent::new(100, 100), None, 0.0);
    let mut layer = Layer::new(LayerId(1), "Box", LayerKindTag::Box);
    layer.set_keyframe(BoxKeyframe::new(1, Point::new(0.0, 0.5)));
    layer.set_keyframe(BoxKeyframe::new(5, Point::new(1.0, 0.5)));

    let out = sample_layer(&layer, &transform, None, &SampleSettings::default());
    assert_eq!(out.len(), 5);
    assert_eq!(out[0], Point::new(0.0, 50.0));
    assert_eq!(out[2], Point::new(50.0, 50.0));
    assert_eq!(out[4], Point::new(100.0, 50.0));
}
