//! Outbound per-layer payload for the downstream frame renderer.

use crate::{
    foundation::core::Point,
    layer::{
        document::Document,
        model::{Layer, LayerKind},
    },
    sample::{
        box_track::{BoxSample, sample_box_pixels},
        curve::sample_layer,
        timeline::{LayerTiming, frame_positions},
    },
    timing::driver::{DriverDiagnostic, resolve_driver},
};

/// Exported record of one visible layer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerExport {
    /// Layer name.
    pub name: String,
    /// Path family identifier (see [`Layer::interpolation_label`]).
    pub interpolation: String,
    /// Motion cycles.
    pub repeat: u32,
    /// Own start delay.
    pub offset: i32,
    /// Frames held on the first point.
    pub start_pause: u32,
    /// Frames held on the last point.
    pub end_pause: u32,
    /// Whether an enabled driver binding is present.
    pub driven: bool,
    /// Bound driver name, enabled or not.
    pub driver_name: Option<String>,
    /// Start delay inherited from the driver; `0` when unresolved.
    pub inherited_offset: i64,
    /// Sampled path in reference-image pixels.
    pub coordinates: Vec<Point>,
    /// Path position at each output frame, for point layers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<Point>,
    /// Per-frame box transforms, positions in reference-image pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boxes: Option<Vec<BoxSample>>,
}

/// Everything exported from one document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    /// Output timeline length.
    pub max_frames: u32,
    /// Visible layers in document order.
    pub layers: Vec<LayerExport>,
    /// Driver bindings that could not be honored.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<DriverDiagnostic>,
}

/// Sample every visible layer of `doc`.
///
/// `output_length` fixes the sample count of curved layers (and the frame
/// count of box tracks); `None` uses the document's sample settings.
#[tracing::instrument(skip(doc), fields(layers = doc.layers().len()))]
pub fn export_layers(doc: &Document, output_length: Option<usize>) -> ExportPayload {
    let transform = doc.transform();
    let all = doc.layers();
    let mut diagnostics = Vec::new();

    let layers = all
        .iter()
        .filter(|l| l.visible)
        .map(|layer| {
            let resolution = resolve_driver(all, layer);
            if let Some(d) = resolution.diagnostic {
                diagnostics.push(d);
            }

            let coordinates = sample_layer(layer, &transform, output_length, &doc.settings);
            let (frames, boxes) = match &layer.kind {
                LayerKind::Box {
                    box_interpolation,
                    keyframes,
                } => {
                    let boxes =
                        sample_box_pixels(keyframes, *box_interpolation, doc.max_frames, &transform);
                    (Vec::new(), Some(boxes))
                }
                _ => {
                    let timing = LayerTiming::from_layer(layer, resolution.inherited_offset);
                    let frames = frame_positions(&coordinates, &timing, doc.max_frames as usize);
                    (frames, None)
                }
            };

            record(layer, resolution.inherited_offset, coordinates, frames, boxes)
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        exported = layers.len(),
        diagnostics = diagnostics.len(),
        "export assembled"
    );
    ExportPayload {
        max_frames: doc.max_frames,
        layers,
        diagnostics,
    }
}

fn record(
    layer: &Layer,
    inherited_offset: i64,
    coordinates: Vec<Point>,
    frames: Vec<Point>,
    boxes: Option<Vec<BoxSample>>,
) -> LayerExport {
    LayerExport {
        name: layer.name.clone(),
        interpolation: layer.interpolation_label().to_string(),
        repeat: layer.repeat.max(1),
        offset: layer.offset,
        start_pause: layer.start_pause,
        end_pause: layer.end_pause,
        driven: layer.active_driver().is_some(),
        driver_name: layer.driver.as_ref().map(|d| d.layer.clone()),
        inherited_offset,
        coordinates,
        frames,
        boxes,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/payload.rs"]
mod tests;
