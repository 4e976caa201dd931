//! Display colors and material definitions.

use serde::{Deserialize, Serialize};

/// The finishes used by the hardware in this library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Bare steel (bearings, nuts).
    Steel,
    /// Black rubber / polycarbonate (wheels).
    Rubber,
    /// Black anodized aluminum (rails, plates).
    Aluminum,
}

impl Color {
    /// Base color as `[r, g, b]` in `0.0..=1.0`.
    pub fn rgb(self) -> [f64; 3] {
        match self {
            Color::Steel => [0.7, 0.7, 0.7],
            Color::Rubber => [0.0, 0.0, 0.0],
            Color::Aluminum => [0.1, 0.1, 0.1],
        }
    }

    /// Material key used in documents and scenes.
    pub fn key(self) -> &'static str {
        match self {
            Color::Steel => "steel",
            Color::Rubber => "rubber",
            Color::Aluminum => "aluminum",
        }
    }

    /// Full material definition for this finish.
    pub fn material_def(self) -> MaterialDef {
        let (metallic, roughness, density) = match self {
            Color::Steel => (1.0, 0.35, Some(7850.0)),
            Color::Rubber => (0.0, 0.9, Some(1200.0)),
            Color::Aluminum => (1.0, 0.5, Some(2700.0)),
        };
        MaterialDef {
            name: self.key().to_string(),
            color: self.rgb(),
            metallic,
            roughness,
            density,
        }
    }
}

/// PBR material definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDef {
    /// Material name (e.g. "aluminum").
    pub name: String,
    /// Base color as `[r, g, b]` in 0.0..1.0.
    pub color: [f64; 3],
    /// Metallic factor (0.0 = dielectric, 1.0 = metal).
    pub metallic: f64,
    /// Roughness factor (0.0 = mirror, 1.0 = diffuse).
    pub roughness: f64,
    /// Density in kg/m^3.
    pub density: Option<f64>,
}
