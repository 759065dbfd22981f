use std::{fs::File, io::BufReader, io::Read, path::Path};

use crate::{
    foundation::core::{ControlPoint, Extent, LayerId},
    foundation::error::{PathweaveError, PathweaveResult},
    layer::model::{DriverBinding, Layer, LayerKindTag},
    sample::curve::SampleSettings,
    timing::retarget::{RetargetDecision, retarget},
    transform::coords::CoordinateTransform,
};

/// An editable set of layers over one reference image.
///
/// Layers are kept in document order; each layer's `order` field mirrors its
/// position. The active layer is held by identity and cleared or replaced
/// whenever the layer it names is removed.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Editor canvas size.
    pub canvas: Extent,
    /// Reference image size, when one is loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Extent>,
    /// Canvas margin kept around the fitted reference image.
    #[serde(default = "default_margin")]
    pub margin: f64,
    /// Output timeline length in frames.
    #[serde(default = "default_max_frames")]
    pub max_frames: u32,
    /// Sampling configuration.
    #[serde(default)]
    pub settings: SampleSettings,
    #[serde(default)]
    layers: Vec<Layer>,
    #[serde(default)]
    active: Option<LayerId>,
    /// Next id handed out; never reuses ids of removed layers.
    #[serde(default)]
    next_id: u64,
}

fn default_margin() -> f64 {
    20.0
}

fn default_max_frames() -> u32 {
    81
}

impl Document {
    /// Empty document over `canvas`.
    pub fn new(canvas: Extent) -> Self {
        Self {
            canvas,
            reference: None,
            margin: default_margin(),
            max_frames: default_max_frames(),
            settings: SampleSettings::default(),
            layers: Vec::new(),
            active: None,
            next_id: 1,
        }
    }

    /// Parse a document from JSON and normalize layer order.
    pub fn from_json(s: &str) -> PathweaveResult<Self> {
        let mut doc: Self = serde_json::from_str(s)?;
        doc.layers.sort_by_key(|l| l.order);
        doc.reindex();
        let floor = doc
            .layers
            .iter()
            .map(|l| l.id.0.saturating_add(1))
            .max()
            .unwrap_or(1);
        doc.next_id = doc.next_id.max(floor);
        Ok(doc)
    }

    /// Parse a document from a JSON reader.
    pub fn from_reader(mut r: impl Read) -> PathweaveResult<Self> {
        let mut s = String::new();
        r.read_to_string(&mut s)
            .map_err(|e| PathweaveError::serde(format!("read document JSON: {e}")))?;
        Self::from_json(&s)
    }

    /// Load a document from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> PathweaveResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PathweaveError::validation(format!("open document JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Pretty JSON for persistence.
    pub fn to_json(&self) -> PathweaveResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check document-level invariants.
    pub fn validate(&self) -> PathweaveResult<()> {
        let mut seen = std::collections::HashSet::new();
        let mut ids = std::collections::HashSet::new();
        for layer in &self.layers {
            if layer.name.trim().is_empty() {
                return Err(PathweaveError::validation("layer names must be non-empty"));
            }
            if !seen.insert(layer.name.as_str()) {
                return Err(PathweaveError::validation(format!(
                    "duplicate layer name '{}'",
                    layer.name
                )));
            }
            if !ids.insert(layer.id) {
                return Err(PathweaveError::validation(format!(
                    "duplicate layer id {}",
                    layer.id.0
                )));
            }
            if layer.repeat == 0 {
                return Err(PathweaveError::validation(format!(
                    "layer '{}' repeat must be >= 1",
                    layer.name
                )));
            }
            if !(layer.scale.is_finite() && layer.scale > 0.0) {
                return Err(PathweaveError::validation(format!(
                    "layer '{}' scale must be finite and > 0",
                    layer.name
                )));
            }
            if layer.active_driver() == Some(layer.name.as_str()) {
                return Err(PathweaveError::driver(format!(
                    "layer '{}' drives itself",
                    layer.name
                )));
            }
            if !layer.keyframes().windows(2).all(|w| w[0].frame < w[1].frame) {
                return Err(PathweaveError::validation(format!(
                    "layer '{}' keyframes must have unique ascending frames",
                    layer.name
                )));
            }
        }
        if let Some(id) = self.active
            && self.get(id).is_none()
        {
            return Err(PathweaveError::validation(format!(
                "active layer {} does not exist",
                id.0
            )));
        }
        Ok(())
    }

    /// Coordinate snapshot for the current canvas, reference and margin.
    pub fn transform(&self) -> CoordinateTransform {
        CoordinateTransform::fit(self.canvas, self.reference, self.margin)
    }

    /// Replace the reference image size.
    pub fn set_reference(&mut self, reference: Option<Extent>) {
        self.reference = reference;
    }

    /// Replace the canvas size.
    pub fn set_canvas(&mut self, canvas: Extent) {
        self.canvas = canvas;
    }

    /// Layers in document order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Look a layer up by identity.
    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Mutable lookup by identity.
    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// Look a layer up by name.
    pub fn find_by_name(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Append a new layer and make it active.
    ///
    /// `name` defaults to the kind's base name and is disambiguated against
    /// existing layers.
    pub fn add(&mut self, tag: LayerKindTag, name: Option<&str>) -> &Layer {
        let base = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(tag.base_name());
        let name = self.unique_name(base);
        let layer = Layer::new(self.fresh_id(), name, tag);
        let id = layer.id;
        self.layers.push(layer);
        self.reindex();
        self.active = Some(id);
        tracing::debug!(id = id.0, "added layer");
        let idx = self.layers.len() - 1;
        &self.layers[idx]
    }

    /// Deep-copy a layer under a fresh id and disambiguated name, insert it
    /// right after the source and make it active.
    pub fn duplicate(&mut self, source: LayerId) -> Option<&Layer> {
        let idx = self.index_of(source)?;
        let mut copy = self.layers[idx].clone();
        copy.id = self.fresh_id();
        copy.name = self.unique_name(&copy.name);
        let id = copy.id;
        self.layers.insert(idx + 1, copy);
        self.reindex();
        self.active = Some(id);
        Some(&self.layers[idx + 1])
    }

    /// Remove a layer. Unknown ids are a no-op.
    ///
    /// When the removed layer was active, the next visible layer after it
    /// becomes active, else the previous visible one, else any remaining
    /// layer; with no layers left the active pointer is cleared.
    pub fn remove(&mut self, id: LayerId) -> Option<Layer> {
        let idx = self.index_of(id)?;
        let removed = self.layers.remove(idx);
        self.reindex();

        if self.active == Some(id) {
            self.active = self.replacement_for(idx);
            tracing::debug!(
                removed = id.0,
                active = ?self.active.map(|a| a.0),
                "active layer removed"
            );
        }
        Some(removed)
    }

    fn replacement_for(&self, removed_idx: usize) -> Option<LayerId> {
        let after = self.layers[removed_idx.min(self.layers.len())..]
            .iter()
            .find(|l| l.visible);
        let before = self.layers[..removed_idx.min(self.layers.len())]
            .iter()
            .rev()
            .find(|l| l.visible);
        let any = self
            .layers
            .get(removed_idx)
            .or_else(|| self.layers.last());
        after.or(before).or(any).map(|l| l.id)
    }

    /// Set the active layer. Unknown ids leave the selection unchanged and
    /// return `false`.
    pub fn set_active(&mut self, id: Option<LayerId>) -> bool {
        match id {
            None => {
                self.active = None;
                true
            }
            Some(id) if self.get(id).is_some() => {
                self.active = Some(id);
                true
            }
            Some(_) => false,
        }
    }

    /// Currently active layer.
    pub fn get_active(&self) -> Option<&Layer> {
        self.active.and_then(|id| self.get(id))
    }

    /// Identity of the active layer.
    pub fn active_id(&self) -> Option<LayerId> {
        self.active
    }

    /// Control points of the active layer; empty when nothing is active.
    pub fn active_points(&self) -> &[ControlPoint] {
        self.get_active().map(Layer::points).unwrap_or(&[])
    }

    /// Rename a layer, disambiguating against the other layers. Enabled or
    /// disabled driver bindings naming the old name follow the rename.
    pub fn rename(&mut self, id: LayerId, name: &str) -> PathweaveResult<&str> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PathweaveError::validation("layer name must be non-empty"));
        }
        let idx = self
            .index_of(id)
            .ok_or_else(|| PathweaveError::validation(format!("unknown layer {}", id.0)))?;
        let old = self.layers[idx].name.clone();
        if old == name {
            return Ok(&self.layers[idx].name);
        }

        let new_name = self.unique_name_excluding(name, Some(id));
        for layer in &mut self.layers {
            if let Some(driver) = layer.driver.as_mut()
                && driver.layer == old
            {
                driver.layer = new_name.clone();
            }
        }
        self.layers[idx].name = new_name;
        Ok(&self.layers[idx].name)
    }

    /// Move a layer to `index` in document order (clamped to the end).
    pub fn move_layer(&mut self, id: LayerId, index: usize) -> bool {
        let Some(from) = self.index_of(id) else {
            return false;
        };
        let layer = self.layers.remove(from);
        let to = index.min(self.layers.len());
        self.layers.insert(to, layer);
        self.reindex();
        true
    }

    /// Show or hide a layer.
    pub fn set_visible(&mut self, id: LayerId, visible: bool) -> bool {
        match self.get_mut(id) {
            Some(layer) => {
                layer.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Bind `id` to the layer named `driver`.
    pub fn set_driver(&mut self, id: LayerId, driver: &str) -> PathweaveResult<()> {
        let target = self
            .find_by_name(driver)
            .ok_or_else(|| PathweaveError::driver(format!("no layer named '{driver}'")))?;
        if target.id == id {
            return Err(PathweaveError::driver(format!(
                "layer '{driver}' cannot drive itself"
            )));
        }
        let layer = self
            .get_mut(id)
            .ok_or_else(|| PathweaveError::validation(format!("unknown layer {}", id.0)))?;
        layer.driver = Some(DriverBinding::new(driver));
        Ok(())
    }

    /// Drop any driver binding on `id`.
    pub fn clear_driver(&mut self, id: LayerId) -> bool {
        match self.get_mut(id) {
            Some(layer) => layer.driver.take().is_some(),
            None => false,
        }
    }

    /// Change the output length to `target_frames`, fitting box keyframes
    /// into the new timeline.
    pub fn retarget(&mut self, target_frames: u32) -> RetargetDecision {
        let outcome = retarget(&self.layers, target_frames, self.max_frames);
        self.max_frames = outcome.new_max_frames;
        self.replace_layers(outcome.layers);
        outcome.decision
    }

    pub(crate) fn replace_layers(&mut self, layers: Vec<Layer>) {
        self.layers = layers;
        self.layers.sort_by_key(|l| l.order);
        self.reindex();
        if let Some(id) = self.active
            && self.get(id).is_none()
        {
            self.active = None;
        }
    }

    /// Name not used by any layer, derived from `base`.
    ///
    /// A taken `base` ending in `_<n>` continues counting from `n + 1`;
    /// otherwise `_1` is appended. Counting continues until a free name
    /// is found.
    pub fn unique_name(&self, base: &str) -> String {
        self.unique_name_excluding(base, None)
    }

    fn unique_name_excluding(&self, base: &str, skip: Option<LayerId>) -> String {
        let taken = |n: &str| {
            self.layers
                .iter()
                .any(|l| Some(l.id) != skip && l.name == n)
        };
        if !taken(base) {
            return base.to_string();
        }

        let (stem, mut n) = split_numeric_suffix(base)
            .map(|(stem, n)| (stem, n.saturating_add(1)))
            .unwrap_or((base, 1));
        loop {
            let candidate = format!("{stem}_{n}");
            if !taken(&candidate) {
                return candidate;
            }
            n = n.saturating_add(1);
        }
    }

    fn fresh_id(&mut self) -> LayerId {
        let mut id = self.next_id.max(1);
        if self.get(LayerId(id)).is_some() {
            id = self
                .layers
                .iter()
                .map(|l| l.id.0)
                .max()
                .and_then(|m| m.checked_add(1))
                .unwrap_or_else(|| self.smallest_unused_id());
        }
        self.next_id = id.saturating_add(1);
        LayerId(id)
    }

    fn smallest_unused_id(&self) -> u64 {
        let mut ids: Vec<u64> = self.layers.iter().map(|l| l.id.0).collect();
        ids.sort_unstable();
        let mut candidate = 1u64;
        for id in ids {
            if id == candidate {
                candidate = candidate.saturating_add(1);
            } else if id > candidate {
                break;
            }
        }
        candidate
    }

    fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    fn reindex(&mut self) {
        for (i, layer) in self.layers.iter_mut().enumerate() {
            layer.order = i as i32;
        }
    }
}

fn split_numeric_suffix(name: &str) -> Option<(&str, u64)> {
    let (stem, digits) = name.rsplit_once('_')?;
    if stem.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(|n| (stem, n))
}

#[cfg(test)]
#[path = "../../tests/unit/layer/document.rs"]
mod tests;
