use crate::{
    animation::ease::EaseMode,
    foundation::core::{ControlPoint, Point},
    layer::model::{BoxInterpolation, BoxKeyframe},
    transform::coords::{CoordinateTransform, looks_unnormalized},
};

/// Box transform at one output frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoxSample {
    /// 1-based frame index.
    pub frame: u32,
    /// Box center in normalized coordinates.
    pub position: Point,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Uniform scale factor.
    pub scale: f64,
}

/// Box transform for every frame in `1..=total_frames`.
///
/// Frames before the first keyframe hold it, as do frames after the last.
/// No keyframes yields no samples.
pub fn sample_box_track(
    keyframes: &[BoxKeyframe],
    mode: BoxInterpolation,
    total_frames: u32,
) -> Vec<BoxSample> {
    if keyframes.is_empty() {
        return Vec::new();
    }
    (1..=total_frames)
        .map(|frame| sample_box_at(keyframes, mode, frame))
        .collect()
}

/// [`sample_box_track`] with positions mapped to reference-image pixels.
/// Keyframes stored in legacy pixel space keep their positions.
pub(crate) fn sample_box_pixels(
    keyframes: &[BoxKeyframe],
    mode: BoxInterpolation,
    total_frames: u32,
    transform: &CoordinateTransform,
) -> Vec<BoxSample> {
    let positions: Vec<ControlPoint> = keyframes
        .iter()
        .map(|k| ControlPoint::new(k.position.x, k.position.y))
        .collect();
    let samples = sample_box_track(keyframes, mode, total_frames);
    if looks_unnormalized(&positions) {
        return samples;
    }
    samples
        .into_iter()
        .map(|s| BoxSample {
            position: transform.to_image_pixels(s.position),
            ..s
        })
        .collect()
}

/// Box transform at a single frame. `keyframes` must be non-empty and
/// sorted by frame.
pub fn sample_box_at(keyframes: &[BoxKeyframe], mode: BoxInterpolation, frame: u32) -> BoxSample {
    let idx = keyframes.partition_point(|k| k.frame <= frame);
    let hold = |k: &BoxKeyframe| BoxSample {
        frame,
        position: k.position,
        rotation: k.rotation,
        scale: k.scale,
    };

    if idx == 0 {
        return hold(&keyframes[0]);
    }
    if idx >= keyframes.len() {
        return hold(&keyframes[keyframes.len() - 1]);
    }

    let a = &keyframes[idx - 1];
    let b = &keyframes[idx];
    let denom = b.frame.saturating_sub(a.frame);
    if denom == 0 {
        return hold(a);
    }

    let t = f64::from(frame - a.frame) / f64::from(denom);
    let t = match mode {
        BoxInterpolation::Hold => return hold(a),
        BoxInterpolation::Linear => t,
        BoxInterpolation::Smooth => EaseMode::InOut.apply(t),
    };
    BoxSample {
        frame,
        position: a.position.lerp(b.position, t),
        rotation: a.rotation + (b.rotation - a.rotation) * t,
        scale: a.scale + (b.scale - a.scale) * t,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sample/box_track.rs"]
mod tests;
