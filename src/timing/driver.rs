//! Timing inheritance between layers ("driven" layers).

use crate::layer::model::Layer;

/// Why a driver binding contributed nothing.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DriverDiagnostic {
    /// The bound name matches no layer (renamed or deleted).
    DanglingDriverReference {
        /// Driven layer.
        layer: String,
        /// Name it is bound to.
        driver: String,
    },
    /// The layer is bound to itself.
    SelfReference {
        /// Offending layer.
        layer: String,
    },
}

/// Outcome of resolving one layer's driver binding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DriverResolution {
    /// Frames added to the layer's start delay.
    pub inherited_offset: i64,
    /// Set when an enabled binding could not be honored.
    pub diagnostic: Option<DriverDiagnostic>,
}

/// Resolve the start delay `layer` inherits from its driver.
///
/// The offset is the driver's `offset + startPause + endPause`. Only one hop
/// is followed: the driver's own binding is ignored. Disabled or missing
/// bindings inherit nothing; unresolvable ones inherit nothing and carry a
/// diagnostic.
pub fn resolve_driver(layers: &[Layer], layer: &Layer) -> DriverResolution {
    let Some(name) = layer.active_driver() else {
        return DriverResolution::default();
    };

    if name == layer.name {
        tracing::warn!(layer = %layer.name, "layer is bound to itself, ignoring driver");
        return DriverResolution {
            inherited_offset: 0,
            diagnostic: Some(DriverDiagnostic::SelfReference {
                layer: layer.name.clone(),
            }),
        };
    }

    match layers.iter().find(|l| l.name == name && l.id != layer.id) {
        Some(driver) => DriverResolution {
            inherited_offset: i64::from(driver.offset)
                + i64::from(driver.start_pause)
                + i64::from(driver.end_pause),
            diagnostic: None,
        },
        None => {
            tracing::warn!(
                layer = %layer.name,
                driver = %name,
                "driver layer not found, inheriting no offset"
            );
            DriverResolution {
                inherited_offset: 0,
                diagnostic: Some(DriverDiagnostic::DanglingDriverReference {
                    layer: layer.name.clone(),
                    driver: name.to_string(),
                }),
            }
        }
    }
}

/// Inherited start delay of `layer`; `0` when unresolvable.
pub fn inherited_offset(layers: &[Layer], layer: &Layer) -> i64 {
    resolve_driver(layers, layer).inherited_offset
}

#[cfg(test)]
#[path = "../../tests/unit/timing/driver.rs"]
mod tests;
