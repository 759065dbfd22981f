use super::*;
use crate::foundation::core::{LayerId, Point};
use crate::layer::model::LayerKindTag;

fn box_layer(id: u64, frames: &[u32]) -> Layer {
    let mut layer = Layer::new(LayerId(id), format!("Box_{id}"), LayerKindTag::Box);
    for (i, &f) in frames.iter().enumerate() {
        layer.set_keyframe(BoxKeyframe::new(f, Point::new(i as f64, 0.0)));
    }
    layer
}

fn frames(layer: &Layer) -> Vec<u32> {
    layer.keyframes().iter().map(|k| k.frame).collect()
}

#[test]
fn extending_keeps_keyframes() {
    let layers = vec![box_layer(1, &[1, 40, 81])];
    let out = retarget(&layers, 121, 81);
    assert_eq!(out.decision, RetargetDecision::Extend);
    assert_eq!(out.new_max_frames, 121);
    assert_eq!(frames(&out.layers[0]), vec![1, 40, 81]);
}

#[test]
fn shrinking_above_last_keyframe_keeps_keyframes() {
    let layers = vec![box_layer(1, &[1, 20, 30])];
    let out = retarget(&layers, 49, 81);
    assert_eq!(out.decision, RetargetDecision::Shrink);
    assert_eq!(out.new_max_frames, 49);
    assert_eq!(frames(&out.layers[0]), vec![1, 20, 30]);
}

#[test]
fn shrinking_past_last_keyframe_rescales() {
    let layers = vec![box_layer(1, &[1, 41, 81]), box_layer(2, &[10, 60])];
    let out = retarget(&layers, 41, 81);
    assert!(matches!(out.decision, RetargetDecision::Rescale { .. }));
    assert_eq!(out.new_max_frames, 41);
    // ratio 41/81: 1 -> 1 (0.506 rounds to 1), 41 -> 21, 81 -> 41
    assert_eq!(frames(&out.layers[0]), vec![1, 21, 41]);
    // 10 -> 5, 60 -> 30
    assert_eq!(frames(&out.layers[1]), vec![5, 30]);
}

#[test]
fn collisions_keep_the_later_keyframe() {
    let layers = vec![box_layer(1, &[1, 2, 3, 100])];
    let out = retarget(&layers, 10, 100);
    let kfs = out.layers[0].keyframes();
    assert_eq!(frames(&out.layers[0]), vec![1, 10]);
    // frames 1, 2 and 3 all land on 1; the keyframe from frame 3 wins.
    assert_eq!(kfs[0].position, Point::new(2.0, 0.0));
}

#[test]
fn results_stay_in_bounds_unique_and_sorted() {
    let layers = vec![box_layer(1, &[1, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37])];
    for target in 1..40u32 {
        let out = retarget(&layers, target, 37);
        for layer in &out.layers {
            let f = frames(layer);
            assert!(f.iter().all(|&x| (1..=target.max(1)).contains(&x)), "{target}: {f:?}");
            assert!(f.windows(2).all(|w| w[0] < w[1]), "{target}: {f:?}");
        }
    }
}

#[test]
fn retargeting_twice_is_idempotent() {
    let layers = vec![box_layer(1, &[1, 41, 81]), box_layer(2, &[10, 60])];
    for target in [20u32, 41, 81, 100] {
        let once = retarget(&layers, target, 81);
        let twice = retarget(&once.layers, target, once.new_max_frames);
        assert_eq!(twice.layers, once.layers, "{target}");
        assert_eq!(twice.new_max_frames, once.new_max_frames);
    }
}

#[test]
fn no_keyframes_is_a_no_op() {
    let layers = vec![
        Layer::new(LayerId(1), "Spline", LayerKindTag::Spline),
        box_layer(2, &[]),
    ];
    let out = retarget(&layers, 10, 81);
    assert_eq!(out.decision, RetargetDecision::Untouched);
    assert_eq!(out.new_max_frames, 81);
    assert_eq!(out.layers, layers);
}

#[test]
fn zero_target_is_treated_as_one() {
    let layers = vec![box_layer(1, &[5, 9])];
    let out = retarget(&layers, 0, 10);
    assert_eq!(out.new_max_frames, 1);
    assert_eq!(frames(&out.layers[0]), vec![1]);
}

#[test]
fn non_box_layers_pass_through() {
    let spline = Layer::new(LayerId(1), "Spline", LayerKindTag::Spline);
    let layers = vec![spline.clone(), box_layer(2, &[50])];
    let out = retarget(&layers, 10, 50);
    assert_eq!(out.layers[0], spline);
    assert_eq!(frames(&out.layers[1]), vec![10]);
}
