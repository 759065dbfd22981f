//! Lays a sampled path onto output frames.

use crate::{animation::ease::EasingDescriptor, foundation::core::Point, layer::model::Layer};

/// Timing parameters of one layer, with any driver offset folded in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerTiming {
    /// Motion cycles (at least 1).
    pub repeat: u32,
    /// Start delay: the layer's own offset plus the inherited one.
    pub delay: i64,
    /// Frames held on the first point once the delay has elapsed.
    pub start_pause: u32,
    /// Frames held on the last point at the end.
    pub end_pause: u32,
    /// Progress easing.
    pub easing: EasingDescriptor,
}

impl LayerTiming {
    /// Timing of `layer` with `inherited_offset` added to its delay.
    pub fn from_layer(layer: &Layer, inherited_offset: i64) -> Self {
        Self {
            repeat: layer.repeat.max(1),
            delay: i64::from(layer.offset) + inherited_offset,
            start_pause: layer.start_pause,
            end_pause: layer.end_pause,
            easing: layer.easing,
        }
    }
}

/// Position of the path at each of `total_frames` frames.
///
/// Frames before the (non-negative part of the) delay and the start pause
/// hold the first sample; the end pause holds the last. The frames in
/// between are split into `repeat` cycles, each running the eased progress
/// from the first to the last sample.
pub fn frame_positions(samples: &[Point], timing: &LayerTiming, total_frames: usize) -> Vec<Point> {
    let (Some(&first), Some(&last)) = (samples.first(), samples.last()) else {
        return Vec::new();
    };

    let delay = usize::try_from(timing.delay.max(0)).unwrap_or(usize::MAX);
    let lead = delay.saturating_add(timing.start_pause as usize);
    let motion = total_frames
        .saturating_sub(lead)
        .saturating_sub(timing.end_pause as usize);
    let cycles = f64::from(timing.repeat.max(1));

    (0..total_frames)
        .map(|f| {
            if f < lead {
                return first;
            }
            let local = f - lead;
            if local >= motion {
                return last;
            }
            let u = if motion <= 1 {
                1.0
            } else {
                local as f64 / (motion - 1) as f64
            };
            let scaled = u * cycles;
            let p = if scaled >= cycles { 1.0 } else { scaled.fract() };
            point_at(samples, timing.easing.apply(p))
        })
        .collect()
}

/// Point at fractional progress `p` along the sample sequence.
pub fn point_at(samples: &[Point], p: f64) -> Point {
    match samples {
        [] => Point::ZERO,
        [only] => *only,
        _ => {
            let pos = p.clamp(0.0, 1.0) * (samples.len() - 1) as f64;
            let i = (pos.floor() as usize).min(samples.len() - 2);
            samples[i].lerp(samples[i + 1], pos - i as f64)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sample/timeline.rs"]
mod tests;
