//! Pathweave turns editor-drawn paths into per-frame motion data.
//!
//! A [`Document`] holds an ordered set of [`Layer`]s drawn over a reference
//! image: splines, freehand strokes and keyframed boxes. The crate keeps
//! their control points in image-relative coordinates, samples them into
//! dense arc-length-uniform point sequences, resolves timing inherited
//! between layers, and assembles the payload consumed by a downstream frame
//! renderer.
//!
//! # Pipeline overview
//!
//! 1. **Normalize**: editor pixels to unit-square coordinates via [`CoordinateTransform`]
//! 2. **Sample**: control points to reference-image pixels via [`sample_layer`]
//! 3. **Time**: driver offsets ([`resolve_driver`]) and per-frame positions ([`frame_positions`])
//! 4. **Export**: visible layers to an [`ExportPayload`] via [`export_layers`]
//!
//! [`retarget`] refits box keyframes when the output length changes, and
//! [`generate_opacity`] builds the rise/plateau/fall curve used for
//! transition blending.
//!
//! Every operation is a pure, synchronous function of its inputs. Malformed
//! input degrades to a documented default instead of failing; only JSON
//! parsing and explicit document edits return [`PathweaveError`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod effects;
mod export;
mod foundation;
mod layer;
mod sample;
mod timing;
mod transform;

pub use animation::ease::{EaseMode, EasingDescriptor, EasingPath};
pub use effects::opacity::{OpacityCurve, generate as generate_opacity};
pub use export::payload::{ExportPayload, LayerExport, export_layers};
pub use foundation::core::{Affine, BezPath, ControlPoint, Extent, LayerId, Point, Vec2};
pub use foundation::error::{PathweaveError, PathweaveResult};
pub use layer::document::Document;
pub use layer::model::{
    BoxInterpolation, BoxKeyframe, DriverBinding, Interpolation, Layer, LayerKind, LayerKindTag,
};
pub use sample::box_track::{BoxSample, sample_box_at, sample_box_track};
pub use sample::curve::{SampleSettings, build_path, resample, sample_layer, sample_points};
pub use sample::timeline::{LayerTiming, frame_positions, point_at};
pub use timing::driver::{DriverDiagnostic, DriverResolution, inherited_offset, resolve_driver};
pub use timing::retarget::{RetargetDecision, RetargetOutcome, retarget};
pub use transform::coords::{CoordinateTransform, LEGACY_PIXEL_THRESHOLD, looks_unnormalized};
