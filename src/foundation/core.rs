pub use kurbo::{Affine, BezPath, Point, Vec2};

/// Stable identity of a layer within a document.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct LayerId(pub u64);

/// A user-placed control point.
///
/// Stored layers keep these in unit-square coordinates relative to the
/// reference image (or the canvas when no reference image is loaded).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ControlPoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Forces a hard transition at this point in curved paths.
    #[serde(default)]
    pub corner: bool,
}

impl ControlPoint {
    /// A smooth control point.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            corner: false,
        }
    }

    /// A control point flagged as a corner.
    pub fn corner(x: f64, y: f64) -> Self {
        Self { x, y, corner: true }
    }

    /// Position as a kurbo point.
    pub fn to_point(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Same flags, new position.
    pub fn with_position(self, p: Point) -> Self {
        Self {
            x: p.x,
            y: p.y,
            corner: self.corner,
        }
    }

    pub(crate) fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Pixel dimensions of a canvas or reference image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Extent {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Extent {
    /// Build an extent from raw dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Same extent with both dimensions raised to at least one pixel.
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.max(1),
            height: self.height.max(1),
        }
    }

    /// `true` when either dimension is zero.
    pub fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width as `f64`.
    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64`.
    pub fn h(self) -> f64 {
        f64::from(self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
