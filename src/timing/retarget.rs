//! Box keyframe rescaling when the output frame count changes.

use std::collections::BTreeMap;

use crate::layer::model::{BoxKeyframe, Layer, LayerKind};

/// Which branch [`retarget`] took.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RetargetDecision {
    /// No box layer carries keyframes; nothing changed.
    Untouched,
    /// Timeline grew; keyframes kept.
    Extend,
    /// Timeline shrank without cutting any keyframe; keyframes kept.
    Shrink,
    /// Timeline shrank past the last keyframe; frames scaled by `ratio`.
    Rescale {
        /// `target / current`.
        ratio: f64,
    },
}

/// Result of [`retarget`].
#[derive(Clone, Debug, PartialEq)]
pub struct RetargetOutcome {
    /// New timeline length.
    pub new_max_frames: u32,
    /// All input layers, box keyframes updated.
    pub layers: Vec<Layer>,
    /// Branch taken.
    pub decision: RetargetDecision,
}

/// Fit box keyframes to a new output length.
///
/// Growing, or shrinking without cutting any keyframe, keeps every frame
/// value. Shrinking past the last keyframe scales each frame by
/// `target / current`, rounds, clamps into `[1, target]`, and on collision
/// keeps the keyframe that came last in the original order. `target_frames`
/// below one is treated as one.
#[tracing::instrument(skip(layers), fields(layers = layers.len()))]
pub fn retarget(layers: &[Layer], target_frames: u32, current_max_frames: u32) -> RetargetOutcome {
    let target = target_frames.max(1);
    let max_keyframe = layers.iter().filter_map(Layer::max_keyframe).max();

    let Some(max_keyframe) = max_keyframe else {
        return RetargetOutcome {
            new_max_frames: current_max_frames,
            layers: layers.to_vec(),
            decision: RetargetDecision::Untouched,
        };
    };

    if target > current_max_frames || max_keyframe <= target {
        let decision = if target > current_max_frames {
            RetargetDecision::Extend
        } else {
            RetargetDecision::Shrink
        };
        tracing::debug!(?decision, target, "keyframes kept");
        return RetargetOutcome {
            new_max_frames: target,
            layers: layers.to_vec(),
            decision,
        };
    }

    let ratio = f64::from(target) / f64::from(current_max_frames);
    tracing::debug!(ratio, max_keyframe, "rescaling keyframes");
    let layers = layers
        .iter()
        .map(|layer| {
            let mut layer = layer.clone();
            if let LayerKind::Box { keyframes, .. } = &mut layer.kind {
                *keyframes = rescale_keyframes(keyframes, ratio, target);
            }
            layer
        })
        .collect();

    RetargetOutcome {
        new_max_frames: target,
        layers,
        decision: RetargetDecision::Rescale { ratio },
    }
}

fn rescale_keyframes(keyframes: &[BoxKeyframe], ratio: f64, target: u32) -> Vec<BoxKeyframe> {
    let mut by_frame = BTreeMap::new();
    for kf in keyframes {
        let scaled = (f64::from(kf.frame) * ratio).round();
        let frame = scaled.clamp(1.0, f64::from(target)) as u32;
        by_frame.insert(frame, BoxKeyframe { frame, ..*kf });
    }
    by_frame.into_values().collect()
}

#[cfg(test)]
#[path = "../../tests/unit/timing/retarget.rs"]
mod tests;
