//! Editor-space <-> unit-square coordinate mapping.
//!
//! The editor draws the reference image scaled and centered inside the
//! canvas. Stored control points are expressed relative to that image so
//! they survive canvas resizes and reference swaps.

use crate::foundation::core::{Affine, ControlPoint, Extent, Point, Vec2};

/// Points whose coordinates all have at least this magnitude are treated
/// as legacy pixel-space data by [`CoordinateTransform::denormalize`].
pub const LEGACY_PIXEL_THRESHOLD: f64 = 10.0;

/// Snapshot of the editor-to-image mapping for one document.
///
/// `scale` and `offset` are derived from the canvas, reference image and
/// margin; build a new snapshot with [`CoordinateTransform::fit`] whenever
/// any of those change. Normalize and denormalize calls are only mutually
/// inverse when made against the same snapshot.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateTransform {
    canvas: Extent,
    reference: Option<Extent>,
    margin: f64,
    scale: f64,
    offset: Vec2,
}

impl CoordinateTransform {
    /// Fit `reference` inside `canvas`, leaving `margin` pixels on each side,
    /// and center it.
    ///
    /// Zero canvas dimensions are clamped to one pixel. A missing or
    /// zero-sized reference yields canvas-relative normalization.
    pub fn fit(canvas: Extent, reference: Option<Extent>, margin: f64) -> Self {
        let canvas = canvas.clamped();
        let margin = if margin.is_finite() {
            margin.max(0.0)
        } else {
            0.0
        };

        let Some(reference) = reference.filter(|r| !r.is_degenerate()) else {
            if reference.is_some() {
                tracing::warn!(
                    ?reference,
                    "degenerate reference size, falling back to canvas-relative coordinates"
                );
            }
            return Self {
                canvas,
                reference: None,
                margin,
                scale: 1.0,
                offset: Vec2::ZERO,
            };
        };

        let avail_w = (canvas.w() - 2.0 * margin).max(1.0);
        let avail_h = (canvas.h() - 2.0 * margin).max(1.0);
        let scale = (avail_w / reference.w()).min(avail_h / reference.h());
        let offset = Vec2::new(
            (canvas.w() - reference.w() * scale) / 2.0,
            (canvas.h() - reference.h() * scale) / 2.0,
        );

        Self {
            canvas,
            reference: Some(reference),
            margin,
            scale,
            offset,
        }
    }

    /// Recompute for a new canvas size, keeping the reference image.
    pub fn recenter(&self, canvas: Extent, margin: f64) -> Self {
        Self::fit(canvas, self.reference, margin)
    }

    /// Recompute for a new (or removed) reference image, keeping the canvas.
    pub fn with_reference(&self, reference: Option<Extent>) -> Self {
        Self::fit(self.canvas, reference, self.margin)
    }

    /// Canvas the snapshot was computed for.
    pub fn canvas(&self) -> Extent {
        self.canvas
    }

    /// Reference image size, when image-relative.
    pub fn reference(&self) -> Option<Extent> {
        self.reference
    }

    /// Reference pixels to editor pixels.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Editor-space position of the reference image's top-left corner.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Margin the snapshot was fitted with.
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// `true` when coordinates are normalized against the reference image.
    pub fn is_image_relative(&self) -> bool {
        self.reference.is_some() && self.scale.is_finite() && self.scale > 0.0
    }

    /// Affine mapping reference-image pixels to editor pixels.
    pub fn image_to_editor(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Pixel extent that normalized coordinates are fractions of.
    pub fn basis(&self) -> Extent {
        match self.reference {
            Some(reference) if self.is_image_relative() => reference,
            _ => self.canvas,
        }
    }

    /// Editor-space point to unit-square point.
    pub fn normalize_point(&self, p: Point) -> Point {
        if self.is_image_relative() {
            let orig = self.image_to_editor().inverse() * p;
            let basis = self.basis();
            Point::new(orig.x / basis.w(), orig.y / basis.h())
        } else {
            Point::new(p.x / self.canvas.w(), p.y / self.canvas.h())
        }
    }

    /// Unit-square point to editor-space point.
    pub fn denormalize_point(&self, p: Point) -> Point {
        if self.is_image_relative() {
            let basis = self.basis();
            self.image_to_editor() * Point::new(p.x * basis.w(), p.y * basis.h())
        } else {
            Point::new(p.x * self.canvas.w(), p.y * self.canvas.h())
        }
    }

    /// Unit-square point to reference-image pixels (canvas pixels when no
    /// reference image is loaded).
    pub fn to_image_pixels(&self, p: Point) -> Point {
        let basis = self.basis();
        Point::new(p.x * basis.w(), p.y * basis.h())
    }

    /// Stored control points in reference-image pixels.
    ///
    /// Legacy pixel-space arrays (see [`looks_unnormalized`]) pass through
    /// unchanged.
    pub fn to_image_space(&self, points: &[ControlPoint]) -> Vec<ControlPoint> {
        if looks_unnormalized(points) {
            tracing::debug!(
                count = points.len(),
                "passing legacy pixel-space points through"
            );
            return points.to_vec();
        }
        points
            .iter()
            .map(|cp| cp.with_position(self.to_image_pixels(cp.to_point())))
            .collect()
    }

    /// Normalize editor-space control points.
    pub fn normalize(&self, points: &[ControlPoint]) -> Vec<ControlPoint> {
        points
            .iter()
            .map(|cp| cp.with_position(self.normalize_point(cp.to_point())))
            .collect()
    }

    /// Map unit-square control points back to editor space.
    ///
    /// Arrays whose coordinates all have magnitude of at least
    /// [`LEGACY_PIXEL_THRESHOLD`] predate normalization and pass through
    /// unchanged.
    pub fn denormalize(&self, points: &[ControlPoint]) -> Vec<ControlPoint> {
        if looks_unnormalized(points) {
            tracing::debug!(
                count = points.len(),
                "passing legacy pixel-space points through"
            );
            return points.to_vec();
        }
        points
            .iter()
            .map(|cp| cp.with_position(self.denormalize_point(cp.to_point())))
            .collect()
    }
}

/// Legacy detection heuristic used by [`CoordinateTransform::denormalize`].
pub fn looks_unnormalized(points: &[ControlPoint]) -> bool {
    !points.is_empty()
        && points.iter().all(|p| {
            p.x.abs() >= LEGACY_PIXEL_THRESHOLD && p.y.abs() >= LEGACY_PIXEL_THRESHOLD
        })
}

#[cfg(test)]
#[path = "../../tests/unit/transform/coords.rs"]
mod tests;
