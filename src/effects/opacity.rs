//! Rise/plateau/fall opacity curves for transition blending.

use crate::animation::ease::EaseMode;

/// Sampled opacity curve.
///
/// `y` is the raw curve, which the exponent remap may push slightly outside
/// `[0, 1]`; use [`OpacityCurve::y_clamped`] or [`OpacityCurve::to_renderer`]
/// before handing it to consumers that need that range.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpacityCurve {
    /// Frame indices `0..num_frames`.
    pub x: Vec<usize>,
    /// Opacity per frame.
    pub y: Vec<f64>,
    /// Start, end of rise, start of fall, last frame.
    pub key_frames: Vec<i64>,
    /// `y` at each key frame, clamped to `[0, 1]`; `0` for out-of-range keys.
    pub key_values: Vec<f64>,
}

impl OpacityCurve {
    /// `y` clamped to `[0, 1]`.
    pub fn y_clamped(&self) -> Vec<f64> {
        self.y.iter().map(|v| v.clamp(0.0, 1.0)).collect()
    }

    /// Copy with `y` clamped, for the downstream renderer.
    pub fn to_renderer(&self) -> Self {
        Self {
            y: self.y_clamped(),
            ..self.clone()
        }
    }
}

/// Symmetric rise/plateau/fall curve over `num_frames` frames.
///
/// `overlap` is clamped to `num_frames / 2`. The rise eases with `easing`,
/// the fall with its inverse, and both are raised to
/// `2^(-(remap_clamp - 0.5) * 2)`; `remap_clamp = 0.5` leaves them as is.
#[tracing::instrument]
pub fn generate(num_frames: usize, overlap: usize, easing: EaseMode, remap_clamp: f64) -> OpacityCurve {
    let n = num_frames;
    let requested = overlap;
    let overlap = overlap.min(n / 2);
    if overlap != requested {
        tracing::debug!(requested, overlap, "overlap clamped to half the frame count");
    }
    let remap_clamp = if remap_clamp.is_finite() {
        remap_clamp
    } else {
        0.5
    };
    let exponent = 2f64.powf(-((remap_clamp - 0.5) * 2.0));

    let mut y = vec![0.0; n];

    for i in 1..=overlap.min(n.saturating_sub(1)) {
        let progress = i as f64 / overlap as f64;
        y[i] = easing.apply(progress).powf(exponent);
    }

    for i in overlap..(n - overlap).max(overlap + 1) {
        if let Some(v) = y.get_mut(i) {
            *v = 1.0;
        }
    }

    let fall_start = n - overlap;
    if fall_start > overlap {
        let fall = easing.invert();
        for (i, v) in y.iter_mut().enumerate().skip(fall_start) {
            let progress = if overlap > 1 {
                (i - fall_start) as f64 / (overlap - 1) as f64
            } else {
                1.0
            };
            *v = (1.0 - fall.apply(progress)).powf(exponent);
        }
    }

    let key_frames = vec![0, overlap as i64, fall_start as i64, n as i64 - 1];
    let key_values = key_frames
        .iter()
        .map(|&k| {
            usize::try_from(k)
                .ok()
                .and_then(|k| y.get(k))
                .map_or(0.0, |v| v.clamp(0.0, 1.0))
        })
        .collect();

    OpacityCurve {
        x: (0..n).collect(),
        y,
        key_frames,
        key_values,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/opacity.rs"]
mod tests;
