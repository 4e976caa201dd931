#![warn(missing_docs)]

//! Part recipes for the vslot hardware library.
//!
//! This crate defines the declarative description of every part the library
//! can build: the part type, its constructor parameters and its placement.
//! Recipes are loaded from YAML parts configs (entry name → parameters) and
//! can be stored as JSON documents together with their material palette.
//!
//! The IR carries no geometry. Solids are built by the `vslot`
//! crate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

mod config;
mod hardware;
mod material;
mod placement;
mod spec;

pub use config::{ConfigEntry, PartsConfig};
pub use hardware::{BoltSize, HoleRadius, HOLE_TOLERANCE};
pub use material::{Color, MaterialDef};
pub use placement::{Align, Align2D, Align3D, Placement, Rotation};
pub use spec::{
    BearingSpec, EndCapSpec, GridSpec, LPlateSpec, PartSpec, PlateSpec, RailSpec, TNutSpec,
    WheelSpec,
};

/// Errors raised while reading or writing recipes.
#[derive(Debug, Error)]
pub enum IrError {
    /// The YAML text could not be parsed.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The JSON text could not be parsed or written.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Reading a config file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The top level of a parts config is not a mapping.
    #[error("parts config must be a mapping of entry names to parameters")]
    NotAMapping,
    /// A single config entry is malformed.
    #[error("entry `{name}`: {message}")]
    InvalidEntry {
        /// Entry name as written in the config.
        name: String,
        /// What is wrong with it.
        message: String,
    },
}

/// A named recipe inside a [`Document`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartEntry {
    /// Entry name (used for export file names).
    pub name: String,
    /// The recipe.
    pub spec: PartSpec,
    /// Key into [`Document::materials`].
    pub material: String,
}

/// A vslot document: a list of part recipes with their materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Format version string.
    pub version: String,
    /// Recipes in declaration order.
    pub parts: Vec<PartEntry>,
    /// Material definitions keyed by name.
    pub materials: BTreeMap<String, MaterialDef>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            parts: Vec::new(),
            materials: BTreeMap::new(),
        }
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a recipe, registering the material it refers to.
    pub fn push(&mut self, name: impl Into<String>, spec: PartSpec, color: Color) {
        let material = color.material_def();
        self.parts.push(PartEntry {
            name: name.into(),
            spec,
            material: material.name.clone(),
        });
        self.materials.insert(material.name.clone(), material);
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, IrError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, IrError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<&PartsConfig> for Document {
    fn from(config: &PartsConfig) -> Self {
        let mut doc = Document::new();
        for entry in &config.entries {
            doc.push(
                entry.name.clone(),
                entry.spec.clone(),
                entry.spec.default_color(),
            );
        }
        doc
    }
}
