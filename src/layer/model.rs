use serde::{Deserialize, Deserializer};

use crate::{
    animation::ease::EasingDescriptor,
    foundation::core::{ControlPoint, LayerId, Point},
};

/// Path family used to connect spline control points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Straight segments between points.
    Linear,
    /// Cardinal spline through every point (tension from settings or layer).
    #[default]
    Cardinal,
    /// Cardinal spline with zero tension.
    CatmullRom,
    /// Clamped uniform cubic B-spline; approximates inner points.
    Basis,
    /// Discrete mode: the control points themselves, no resampling.
    Points,
}

impl Interpolation {
    /// Canonical lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Cardinal => "cardinal",
            Self::CatmullRom => "catmull_rom",
            Self::Basis => "basis",
            Self::Points => "points",
        }
    }
}

/// Blending between neighbouring box keyframes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxInterpolation {
    /// Component-wise linear blend.
    #[default]
    Linear,
    /// Hold the previous keyframe until the next one.
    Hold,
    /// In/out eased blend.
    Smooth,
}

impl BoxInterpolation {
    /// Canonical lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Hold => "hold",
            Self::Smooth => "smooth",
        }
    }
}

/// A frame-indexed box transform sample.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoxKeyframe {
    /// 1-based frame index.
    pub frame: u32,
    /// Box center in normalized coordinates.
    pub position: Point,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    /// Uniform scale factor.
    #[serde(default = "default_scale")]
    pub scale: f64,
}

impl BoxKeyframe {
    /// Keyframe at `frame` with identity rotation and scale.
    pub fn new(frame: u32, position: Point) -> Self {
        Self {
            frame,
            position,
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

/// Layer binding that inherits timing from another layer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DriverBinding {
    /// Name of the driving layer.
    pub layer: String,
    /// Disabled bindings are kept but contribute nothing.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl DriverBinding {
    /// Enabled binding to `layer`.
    pub fn new(layer: impl Into<String>) -> Self {
        Self {
            layer: layer.into(),
            enabled: true,
        }
    }
}

/// Variant-specific layer geometry.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum LayerKind {
    /// User-placed spline control points.
    Spline {
        /// Path family.
        #[serde(default)]
        interpolation: Interpolation,
        /// Per-layer cardinal tension override.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tension: Option<f64>,
        /// Control points in normalized coordinates.
        #[serde(default, deserialize_with = "lenient_points")]
        points: Vec<ControlPoint>,
    },
    /// Density-reduced points captured from a drawing gesture.
    Freehand {
        /// Resample the stroke as a smooth curve instead of verbatim.
        #[serde(default)]
        smoothing: bool,
        /// Captured points in normalized coordinates.
        #[serde(default, deserialize_with = "lenient_points")]
        points: Vec<ControlPoint>,
    },
    /// Keyframed box transform.
    Box {
        /// Blending between keyframes.
        #[serde(default)]
        box_interpolation: BoxInterpolation,
        /// Keyframes sorted by unique ascending frame.
        #[serde(default)]
        keyframes: Vec<BoxKeyframe>,
    },
}

/// Discriminant used when creating layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKindTag {
    /// [`LayerKind::Spline`].
    Spline,
    /// [`LayerKind::Freehand`].
    Freehand,
    /// [`LayerKind::Box`].
    Box,
}

impl LayerKindTag {
    /// Base name for new layers of this kind.
    pub fn base_name(self) -> &'static str {
        match self {
            Self::Spline => "Spline",
            Self::Freehand => "Freehand",
            Self::Box => "Box",
        }
    }

    fn empty_kind(self) -> LayerKind {
        match self {
            Self::Spline => LayerKind::Spline {
                interpolation: Interpolation::default(),
                tension: None,
                points: vec![ControlPoint::new(0.25, 0.5), ControlPoint::new(0.75, 0.5)],
            },
            Self::Freehand => LayerKind::Freehand {
                smoothing: false,
                points: Vec::new(),
            },
            Self::Box => LayerKind::Box {
                box_interpolation: BoxInterpolation::default(),
                keyframes: Vec::new(),
            },
        }
    }
}

/// One animated layer of a document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    /// Document-unique identity.
    pub id: LayerId,
    /// Document-unique display name.
    pub name: String,
    /// Hidden layers are not exported.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Render/serialize position.
    #[serde(default)]
    pub order: i32,
    /// Motion cycles across the timeline (at least 1).
    #[serde(default = "default_repeat")]
    pub repeat: u32,
    /// Start delay in frames; may be negative.
    #[serde(default)]
    pub offset: i32,
    /// Frames held on the first point before motion starts.
    #[serde(default)]
    pub start_pause: u32,
    /// Frames held on the last point after motion ends.
    #[serde(default)]
    pub end_pause: u32,
    /// Progress easing.
    #[serde(default)]
    pub easing: EasingDescriptor,
    /// Size multiplier consumed by the renderer.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Optional timing inheritance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<DriverBinding>,
    /// Geometry.
    #[serde(flatten)]
    pub kind: LayerKind,
}

impl Layer {
    /// Fresh layer with default timing and empty (or default) geometry.
    pub fn new(id: LayerId, name: impl Into<String>, tag: LayerKindTag) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
            order: 0,
            repeat: 1,
            offset: 0,
            start_pause: 0,
            end_pause: 0,
            easing: EasingDescriptor::default(),
            scale: 1.0,
            driver: None,
            kind: tag.empty_kind(),
        }
    }

    /// Discriminant of [`Layer::kind`].
    pub fn tag(&self) -> LayerKindTag {
        match self.kind {
            LayerKind::Spline { .. } => LayerKindTag::Spline,
            LayerKind::Freehand { .. } => LayerKindTag::Freehand,
            LayerKind::Box { .. } => LayerKindTag::Box,
        }
    }

    /// Control points; empty for box layers.
    pub fn points(&self) -> &[ControlPoint] {
        match &self.kind {
            LayerKind::Spline { points, .. } | LayerKind::Freehand { points, .. } => points,
            LayerKind::Box { .. } => &[],
        }
    }

    /// Mutable control points; `None` for box layers.
    pub fn points_mut(&mut self) -> Option<&mut Vec<ControlPoint>> {
        match &mut self.kind {
            LayerKind::Spline { points, .. } | LayerKind::Freehand { points, .. } => Some(points),
            LayerKind::Box { .. } => None,
        }
    }

    /// Box keyframes; empty for point layers.
    pub fn keyframes(&self) -> &[BoxKeyframe] {
        match &self.kind {
            LayerKind::Box { keyframes, .. } => keyframes,
            _ => &[],
        }
    }

    /// Highest keyframe frame, if any.
    pub fn max_keyframe(&self) -> Option<u32> {
        self.keyframes().iter().map(|k| k.frame).max()
    }

    /// Insert or replace the keyframe at `kf.frame`, keeping frames sorted
    /// and unique. Returns `false` for non-box layers.
    pub fn set_keyframe(&mut self, kf: BoxKeyframe) -> bool {
        let LayerKind::Box { keyframes, .. } = &mut self.kind else {
            return false;
        };
        let kf = BoxKeyframe {
            frame: kf.frame.max(1),
            ..kf
        };
        match keyframes.binary_search_by_key(&kf.frame, |k| k.frame) {
            Ok(i) => keyframes[i] = kf,
            Err(i) => keyframes.insert(i, kf),
        }
        true
    }

    /// Remove the keyframe at `frame`, returning it.
    pub fn remove_keyframe(&mut self, frame: u32) -> Option<BoxKeyframe> {
        let LayerKind::Box { keyframes, .. } = &mut self.kind else {
            return None;
        };
        let i = keyframes.binary_search_by_key(&frame, |k| k.frame).ok()?;
        Some(keyframes.remove(i))
    }

    /// Identifier of the path family reported to the renderer.
    pub fn interpolation_label(&self) -> &'static str {
        match &self.kind {
            LayerKind::Spline { interpolation, .. } => interpolation.as_str(),
            LayerKind::Freehand { smoothing, .. } => {
                if *smoothing {
                    Interpolation::CatmullRom.as_str()
                } else {
                    Interpolation::Points.as_str()
                }
            }
            LayerKind::Box {
                box_interpolation, ..
            } => box_interpolation.as_str(),
        }
    }

    /// Name of the bound driver when the binding is enabled.
    pub fn active_driver(&self) -> Option<&str> {
        self.driver
            .as_ref()
            .filter(|d| d.enabled)
            .map(|d| d.layer.as_str())
    }
}

fn default_true() -> bool {
    true
}

fn default_repeat() -> u32 {
    1
}

fn default_scale() -> f64 {
    1.0
}

/// Accepts an array of point records or a JSON string holding one.
/// Anything else, and any malformed entry, is dropped.
fn lenient_points<'de, D>(deserializer: D) -> Result<Vec<ControlPoint>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(points_from_value(raw))
}

pub(crate) fn points_from_value(raw: serde_json::Value) -> Vec<ControlPoint> {
    let raw = match raw {
        serde_json::Value::String(s) => match serde_json::from_str(&s) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(%err, "unreadable serialized point array, treating as empty");
                return Vec::new();
            }
        },
        other => other,
    };
    let serde_json::Value::Array(items) = raw else {
        return Vec::new();
    };

    let total = items.len();
    let points: Vec<ControlPoint> = items
        .into_iter()
        .filter_map(|v| serde_json::from_value::<ControlPoint>(v).ok())
        .filter(|p| p.is_finite())
        .collect();
    if points.len() != total {
        tracing::warn!(
            dropped = total - points.len(),
            "dropped malformed control points"
        );
    }
    points
}

#[cfg(test)]
#[path = "../../tests/unit/layer/model.rs"]
mod tests;
