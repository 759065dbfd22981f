use std::str::FromStr;

use crate::foundation::error::{PathweaveError, PathweaveResult};

/// Easing functions used to map normalized progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EaseMode {
    /// Identity.
    #[default]
    Linear,
    /// Quadratic ease-in.
    In,
    /// Quadratic ease-out.
    Out,
    /// Quadratic ease-in/out, piecewise at `t = 0.5`.
    InOut,
    /// Ease-out into ease-in, piecewise at `t = 0.5`.
    OutIn,
}

impl EaseMode {
    /// Every mode, in declaration order.
    pub const ALL: [EaseMode; 5] = [
        EaseMode::Linear,
        EaseMode::In,
        EaseMode::Out,
        EaseMode::InOut,
        EaseMode::OutIn,
    ];

    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::In => t * t,
            Self::Out => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::OutIn => {
                if t < 0.5 {
                    0.5 * Self::Out.apply(2.0 * t)
                } else {
                    0.5 + 0.5 * Self::In.apply(2.0 * t - 1.0)
                }
            }
        }
    }

    /// Mirror mode used for falling edges: swaps `in` and `out`.
    pub fn invert(self) -> Self {
        match self {
            Self::In => Self::Out,
            Self::Out => Self::In,
            other => other,
        }
    }

    /// Canonical lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::In => "in",
            Self::Out => "out",
            Self::InOut => "in_out",
            Self::OutIn => "out_in",
        }
    }
}

impl FromStr for EaseMode {
    type Err = PathweaveError;

    fn from_str(s: &str) -> PathweaveResult<Self> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "linear" | "none" => Ok(Self::Linear),
            "in" | "ease_in" | "easein" => Ok(Self::In),
            "out" | "ease_out" | "easeout" => Ok(Self::Out),
            "in_out" | "ease_in_out" | "easeinout" | "inout" => Ok(Self::InOut),
            "out_in" | "ease_out_in" | "easeoutin" | "outin" => Ok(Self::OutIn),
            "" => Err(PathweaveError::validation("easing mode must be non-empty")),
            other => Err(PathweaveError::validation(format!(
                "unknown easing mode '{other}'"
            ))),
        }
    }
}

/// Portion of a motion cycle the easing applies to.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingPath {
    /// Ease the whole cycle.
    #[default]
    Full,
    /// Ease only progress inside `[start, end]`; linear elsewhere.
    Partial {
        /// Window start in `[0, 1]`.
        start: f64,
        /// Window end in `[0, 1]`.
        end: f64,
    },
}

/// Easing attached to a layer's motion.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EasingDescriptor {
    /// Curve shape.
    #[serde(default)]
    pub mode: EaseMode,
    /// Where along the cycle the curve applies.
    #[serde(default)]
    pub path: EasingPath,
    /// Blend from linear (`0`) to the full curve (`1`).
    #[serde(default = "default_strength")]
    pub strength: f64,
}

fn default_strength() -> f64 {
    1.0
}

impl Default for EasingDescriptor {
    fn default() -> Self {
        Self {
            mode: EaseMode::Linear,
            path: EasingPath::Full,
            strength: 1.0,
        }
    }
}

impl EasingDescriptor {
    /// Full-strength, full-path easing with `mode`.
    pub fn new(mode: EaseMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Map cycle progress `p` to eased progress.
    pub fn apply(&self, p: f64) -> f64 {
        let p = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 };
        let strength = if self.strength.is_finite() {
            self.strength.clamp(0.0, 1.0)
        } else {
            1.0
        };

        let eased = match self.path {
            EasingPath::Full => self.mode.apply(p),
            EasingPath::Partial { start, end } => {
                let (a, b) = window(start, end);
                if b - a <= f64::EPSILON || p < a || p > b {
                    p
                } else {
                    a + self.mode.apply((p - a) / (b - a)) * (b - a)
                }
            }
        };
        p + (eased - p) * strength
    }
}

fn window(start: f64, end: f64) -> (f64, f64) {
    let clamp = |v: f64| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
    let (a, b) = (clamp(start), clamp(end));
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
