//! Control points to dense, arc-length-uniform point sequences.

use kurbo::{ParamCurve, ParamCurveArclen, PathEl, PathSeg};

use crate::{
    foundation::core::{BezPath, ControlPoint, Point},
    layer::model::{Interpolation, Layer, LayerKind},
    sample::box_track::sample_box_pixels,
    transform::coords::CoordinateTransform,
};

/// Sampling configuration carried by a document.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SampleSettings {
    /// Lower bound on the default sample count.
    pub min_samples: usize,
    /// Default samples per control point.
    pub samples_per_point: usize,
    /// Accuracy passed to kurbo's arc-length routines.
    pub arclen_accuracy: f64,
    /// Default cardinal tension in `[0, 1]`; `0` is Catmull-Rom.
    pub cardinal_tension: f64,
}

impl Default for SampleSettings {
    fn default() -> Self {
        Self {
            min_samples: 100,
            samples_per_point: 20,
            arclen_accuracy: 1e-6,
            cardinal_tension: 0.0,
        }
    }
}

impl SampleSettings {
    /// Sample count used when the caller does not ask for a frame-aligned one.
    pub fn default_count(&self, point_count: usize) -> usize {
        self.min_samples
            .max(point_count.saturating_mul(self.samples_per_point))
    }
}

/// Sample a layer in reference-image pixel space.
///
/// Discrete splines and unsmoothed freehand strokes come back verbatim.
/// Curved layers are resampled at `output_length` points, or at
/// [`SampleSettings::default_count`] when `None`. Box layers yield one box
/// center per frame. Legacy pixel-space points are not rescaled.
pub fn sample_layer(
    layer: &Layer,
    transform: &CoordinateTransform,
    output_length: Option<usize>,
    settings: &SampleSettings,
) -> Vec<Point> {
    match &layer.kind {
        LayerKind::Spline {
            interpolation,
            tension,
            points,
        } => {
            let points = transform.to_image_space(points);
            let tension = tension.unwrap_or(settings.cardinal_tension);
            sample_points(&points, *interpolation, tension, output_length, settings)
        }
        LayerKind::Freehand { smoothing, points } => {
            let points = transform.to_image_space(points);
            let interpolation = if *smoothing {
                Interpolation::CatmullRom
            } else {
                Interpolation::Points
            };
            sample_points(&points, interpolation, 0.0, output_length, settings)
        }
        LayerKind::Box {
            box_interpolation,
            keyframes,
        } => {
            let frames = output_length
                .and_then(|n| u32::try_from(n).ok())
                .or_else(|| layer.max_keyframe())
                .unwrap_or(0);
            sample_box_pixels(keyframes, *box_interpolation, frames, transform)
                .into_iter()
                .map(|s| s.position)
                .collect()
        }
    }
}

/// Sample raw control points in whatever space they are given.
///
/// Fewer than two points, and the discrete [`Interpolation::Points`] mode,
/// return the input positions unchanged. The first and last samples are
/// exactly the first and last control points.
pub fn sample_points(
    points: &[ControlPoint],
    interpolation: Interpolation,
    tension: f64,
    output_length: Option<usize>,
    settings: &SampleSettings,
) -> Vec<Point> {
    if points.len() < 2 || interpolation == Interpolation::Points {
        return points.iter().map(|p| p.to_point()).collect();
    }

    let count = output_length.unwrap_or_else(|| settings.default_count(points.len()));
    let path = build_path(points, interpolation, tension);
    let mut out = resample(&path, count, settings.arclen_accuracy);

    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if let Some(p) = out.first_mut() {
            *p = first.to_point();
        }
        if count > 1
            && let Some(p) = out.last_mut()
        {
            *p = last.to_point();
        }
    }
    out
}

/// Continuous path through `points` for the given family.
///
/// Corner points split curved families into runs that each end on the
/// corner with clamped tangents, so the curve turns sharply on the vertex
/// without overshooting it.
pub fn build_path(points: &[ControlPoint], interpolation: Interpolation, tension: f64) -> BezPath {
    let mut path = BezPath::new();
    let Some(first) = points.first() else {
        return path;
    };
    path.move_to(first.to_point());

    match interpolation {
        Interpolation::Linear | Interpolation::Points => {
            for p in &points[1..] {
                path.line_to(p.to_point());
            }
        }
        Interpolation::Cardinal | Interpolation::CatmullRom => {
            let tension = if interpolation == Interpolation::CatmullRom {
                0.0
            } else {
                tension
            };
            for run in corner_runs(points) {
                cardinal_segments(&mut path, &run, tension);
            }
        }
        Interpolation::Basis => {
            for run in corner_runs(points) {
                basis_segments(&mut path, &run);
            }
        }
    }
    path
}

/// Split at interior corner points; each corner ends one run and starts
/// the next.
fn corner_runs(points: &[ControlPoint]) -> Vec<Vec<Point>> {
    let last = points.len().saturating_sub(1);
    let mut runs = Vec::new();
    let mut run = Vec::with_capacity(points.len());
    for (i, cp) in points.iter().enumerate() {
        run.push(cp.to_point());
        if cp.corner && i > 0 && i < last {
            runs.push(std::mem::replace(&mut run, vec![cp.to_point()]));
        }
    }
    if run.len() > 1 {
        runs.push(run);
    }
    runs
}

/// Cardinal spline as cubic Béziers; end tangents use the end points as
/// their own neighbours.
fn cardinal_segments(path: &mut BezPath, q: &[Point], tension: f64) {
    let k = (1.0 - tension.clamp(0.0, 1.0)) / 6.0;
    let at = |i: isize| q[i.clamp(0, q.len() as isize - 1) as usize];
    for i in 0..q.len().saturating_sub(1) {
        let i = i as isize;
        let (p0, p1, p2, p3) = (at(i - 1), at(i), at(i + 1), at(i + 2));
        let c1 = p1 + (p2 - p0) * k;
        let c2 = p2 - (p3 - p1) * k;
        path.curve_to(c1, c2, p2);
    }
}

/// Uniform cubic B-spline with tripled end points, so the curve starts and
/// ends on the first and last control points.
fn basis_segments(path: &mut BezPath, q: &[Point]) {
    let (Some(&first), Some(&last)) = (q.first(), q.last()) else {
        return;
    };
    let mut padded = Vec::with_capacity(q.len() + 4);
    padded.extend([first, first]);
    padded.extend_from_slice(q);
    padded.extend([last, last]);

    // Each window (b, c, d) continues from (a + 4b + c) / 6, where the
    // previous segment ended.
    for w in padded[1..].windows(3) {
        let (b, c, d) = (w[0].to_vec2(), w[1].to_vec2(), w[2].to_vec2());
        let c1 = (b * 2.0 + c) / 3.0;
        let c2 = (b + c * 2.0) / 3.0;
        let end = (b + c * 4.0 + d) / 6.0;
        path.curve_to(c1.to_point(), c2.to_point(), end.to_point());
    }
}

/// `count` points spaced equally by arc length along `path`.
pub fn resample(path: &BezPath, count: usize, accuracy: f64) -> Vec<Point> {
    let segs: Vec<PathSeg> = path.segments().collect();
    let start = match path.elements().first() {
        Some(PathEl::MoveTo(p)) => *p,
        _ => return Vec::new(),
    };
    if count == 0 {
        return Vec::new();
    }
    let accuracy = if accuracy.is_finite() && accuracy > 0.0 {
        accuracy
    } else {
        1e-6
    };

    let lens: Vec<f64> = segs.iter().map(|s| s.arclen(accuracy)).collect();
    let total: f64 = lens.iter().sum();
    if segs.is_empty() || total.is_nan() || total <= 0.0 {
        return vec![start; count];
    }
    if count == 1 {
        return vec![start];
    }

    let mut out = Vec::with_capacity(count);
    let mut seg = 0usize;
    let mut walked = 0.0;
    for k in 0..count {
        let target = total * (k as f64) / ((count - 1) as f64);
        while seg + 1 < segs.len() && target > walked + lens[seg] {
            walked += lens[seg];
            seg += 1;
        }
        let s = &segs[seg];
        let local = (target - walked).clamp(0.0, lens[seg]);
        let p = if lens[seg] <= f64::EPSILON {
            s.start()
        } else {
            s.eval(s.inv_arclen(local, accuracy))
        };
        out.push(p);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/sample/curve.rs"]
mod tests;
