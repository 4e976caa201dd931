//! YAML parts configuration.
//!
//! A parts config maps entry names to constructor parameters:
//!
//! ```yaml
//! VSlot2020Rail:
//!   length: 100
//!   c_beam: true
//! short_rail:
//!   type: VSlot2020Rail
//!   length: 20
//! Bearing625:
//! ```
//!
//! The entry name doubles as the part type unless the parameters carry an
//! explicit `type`. An empty entry builds the part with its defaults.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::placement::Placement;
use crate::spec::PartSpec;
use crate::IrError;

/// One named recipe from a parts config.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry {
    /// Entry name as written in the config.
    pub name: String,
    /// Parsed recipe.
    pub spec: PartSpec,
}

/// An ordered list of named recipes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PartsConfig {
    /// Entries in file order.
    pub entries: Vec<ConfigEntry>,
}

impl PartsConfig {
    /// Parse a config from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, IrError> {
        let root: Value = serde_yaml::from_str(yaml)?;
        let mapping = match root {
            Value::Mapping(m) => m,
            Value::Null => Mapping::new(),
            _ => return Err(IrError::NotAMapping),
        };

        let mut entries = Vec::with_capacity(mapping.len());
        for (key, params) in mapping {
            let name = match key {
                Value::String(s) => s,
                other => {
                    return Err(IrError::InvalidEntry {
                        name: format!("{other:?}"),
                        message: "entry names must be strings".to_string(),
                    })
                }
            };
            let spec = parse_entry(&name, params)?;
            entries.push(ConfigEntry { name, spec });
        }
        Ok(Self { entries })
    }

    /// Read and parse a config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, IrError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&ConfigEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the config has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_entry(name: &str, params: Value) -> Result<PartSpec, IrError> {
    let mut params = match params {
        Value::Mapping(m) => m,
        Value::Null => Mapping::new(),
        _ => {
            return Err(IrError::InvalidEntry {
                name: name.to_string(),
                message: "parameters must be a mapping".to_string(),
            })
        }
    };
    if !params.contains_key("type") {
        params.insert(Value::from("type"), Value::from(name));
    }
    check_parameters(name, &params)?;
    serde_yaml::from_value(Value::Mapping(params)).map_err(|e| IrError::InvalidEntry {
        name: name.to_string(),
        message: e.to_string(),
    })
}

/// Reject keys the part type does not take, so a misspelled parameter
/// fails instead of silently falling back to its default.
fn check_parameters(name: &str, params: &Mapping) -> Result<(), IrError> {
    let invalid = |message: String| IrError::InvalidEntry {
        name: name.to_string(),
        message,
    };
    let type_name = match params.get("type") {
        Some(Value::String(t)) => t.as_str(),
        _ => return Err(invalid("`type` must be a part type name".to_string())),
    };
    // Unknown types are reported by the recipe parser.
    let Some(known) = PartSpec::parameters(type_name) else {
        return Ok(());
    };
    for key in params.keys() {
        let Value::String(key) = key else {
            return Err(invalid(format!("parameter names must be strings, got {key:?}")));
        };
        let key = key.as_str();
        if key != "type" && !known.contains(&key) && !Placement::FIELDS.contains(&key) {
            return Err(invalid(format!("unknown parameter `{key}` for {type_name}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HoleRadius;

    #[test]
    fn entry_name_is_the_type() {
        let config = PartsConfig::from_yaml("VSlot2020Rail:\n  length: 100\n").unwrap();
        assert_eq!(config.len(), 1);
        assert_eq!(config.entries[0].name, "VSlot2020Rail");
        assert_eq!(config.entries[0].spec.type_name(), "VSlot2020Rail");
    }

    #[test]
    fn explicit_type_allows_several_of_a_kind() {
        let yaml = "\
long_rail:
  type: VSlot2020Rail
  length: 500
short_rail:
  type: VSlot2020Rail
  length: 20
";
        let config = PartsConfig::from_yaml(yaml).unwrap();
        let names: Vec<_> = config.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["long_rail", "short_rail"]);
        assert!(config
            .entries
            .iter()
            .all(|e| e.spec.type_name() == "VSlot2020Rail"));
    }

    #[test]
    fn null_parameters_mean_defaults() {
        let config = PartsConfig::from_yaml("VSlot2020Wheel:\nBearing105: null\n").unwrap();
        assert_eq!(
            config.get("Bearing105").map(|e| &e.spec),
            Some(&PartSpec::Bearing105(Placement::default()))
        );
    }

    #[test]
    fn bolt_size_and_raw_radius() {
        let yaml = "\
VSlot2020EndCap:
  thickness: 3
  num_x_holes: 2
  num_y_holes: 1
  hole_radius: M5
BuildPlate:
  thickness: 4
  num_x_holes: 5
  num_y_holes: 3
  hole_radius: 2.6
  corner_radius: 3
";
        let config = PartsConfig::from_yaml(yaml).unwrap();
        let Some(PartSpec::VSlot2020EndCap(cap)) = config.get("VSlot2020EndCap").map(|e| &e.spec)
        else {
            panic!("expected an end cap");
        };
        assert!((cap.hole_radius.resolve() - 2.55).abs() < 1e-12);

        let Some(PartSpec::BuildPlate(plate)) = config.get("BuildPlate").map(|e| &e.spec) else {
            panic!("expected a build plate");
        };
        assert_eq!(plate.hole_radius, HoleRadius::Radius(2.6));
        assert_eq!(plate.corner_radius, 3.0);
        assert_eq!(plate.chamfer_size, 0.0);
    }

    #[test]
    fn empty_document_is_empty_config() {
        assert!(PartsConfig::from_yaml("").unwrap().is_empty());
    }

    #[test]
    fn top_level_list_is_rejected() {
        let err = PartsConfig::from_yaml("- VSlot2020Rail\n").unwrap_err();
        assert!(matches!(err, IrError::NotAMapping));
    }

    #[test]
    fn unknown_type_names_the_entry() {
        let err = PartsConfig::from_yaml("Sprocket:\n  teeth: 20\n").unwrap_err();
        match err {
            IrError::InvalidEntry { name, .. } => assert_eq!(name, "Sprocket"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn misspelled_parameter_is_rejected() {
        let err = PartsConfig::from_yaml("VSlot2020Rail:\n  length: 100\n  num_x_rail: 3\n")
            .unwrap_err();
        match err {
            IrError::InvalidEntry { name, message } => {
                assert_eq!(name, "VSlot2020Rail");
                assert!(message.contains("num_x_rail"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn presets_take_no_dimensions() {
        let err = PartsConfig::from_yaml("VSlot2020Wheel:\n  outer_diameter: 40\n").unwrap_err();
        assert!(matches!(err, IrError::InvalidEntry { .. }));
    }

    #[test]
    fn placement_keys_are_accepted() {
        let yaml = "\
nut:
  type: VSlot2020SlidingTNut
  hole_radius: M4
  rotation: [0, 0, 90]
  align: center
Bearing625:
  align: [min, min, min]
";
        let config = PartsConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.len(), 2);
        assert_eq!(config.entries[0].spec.placement().rotation.z, 90.0);
    }

    #[test]
    fn scalar_parameters_are_rejected() {
        let err = PartsConfig::from_yaml("VSlot2020Rail: 100\n").unwrap_err();
        assert!(matches!(err, IrError::InvalidEntry { .. }));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = PartsConfig::from_path("/nonexistent/parts.yaml").unwrap_err();
        assert!(matches!(err, IrError::Io(_)));
    }
}
