//! Building parts from recipes.
//!
//! A [`PartSpec`] names a part type and its constructor parameters; this
//! module maps it onto the matching [`Component`] and applies the requested
//! placement.

use vslot_ir::{PartSpec, PartsConfig, RailSpec};
use vslot_kernel::Sketch;

use crate::bearings::Bearing;
use crate::nuts::VSlot2020SlidingTNut;
use crate::plates::{BuildPlate, BuildPlateProfile, LPlate, VSlot2020EndCap, VSlot2020EndCapProfile};
use crate::rails::{VSlot2020Rail, VSlotRail};
use crate::wheels::Wheel;
use crate::{invalid, CadError, Component, OccupancyGrid, Part, Profile};

/// The parts config shipped with the library: one entry per part type.
pub const DEFAULT_PARTS_YAML: &str = include_str!("../config/parts.yaml");

/// Parse [`DEFAULT_PARTS_YAML`].
pub fn default_config() -> Result<PartsConfig, CadError> {
    Ok(PartsConfig::from_yaml(DEFAULT_PARTS_YAML)?)
}

fn count(name: &'static str, value: u32) -> Result<usize, CadError> {
    if value == 0 {
        return Err(invalid(name, "must be at least 1"));
    }
    Ok(value as usize)
}

fn rail(spec: &RailSpec) -> Result<VSlot2020Rail, CadError> {
    if let Some(grid) = &spec.grid {
        return Ok(VSlot2020Rail::from_grid(
            spec.length,
            OccupancyGrid::from_rows(&grid.rows)?,
        ));
    }
    let nx = count("num_x_rails", spec.num_x_rails)?;
    let ny = count("num_y_rails", spec.num_y_rails)?;
    Ok(if spec.c_beam {
        VSlot2020Rail::c_beam(spec.length, nx, ny)
    } else {
        VSlot2020Rail::new(spec.length, nx, ny)
    })
}

/// The component a recipe describes.
pub fn component(spec: &PartSpec) -> Result<Box<dyn Component>, CadError> {
    let component: Box<dyn Component> = match spec {
        PartSpec::VSlot2020Rail(s) => Box::new(rail(s)?),
        PartSpec::VSlotRail(s) => Box::new(VSlotRail(rail(s)?)),
        PartSpec::VSlot2020EndCap(s) => Box::new(
            VSlot2020EndCap::new(
                s.thickness,
                count("num_x_holes", s.num_x_holes)?,
                count("num_y_holes", s.num_y_holes)?,
                s.hole_radius,
            )
            .with_corner_radius(s.corner_radius)
            .with_chamfer(s.chamfer_size),
        ),
        PartSpec::BuildPlate(s) => Box::new(
            BuildPlate::new(
                s.thickness,
                count("num_x_holes", s.num_x_holes)?,
                count("num_y_holes", s.num_y_holes)?,
                s.hole_radius,
            )
            .with_corner_radius(s.corner_radius)
            .with_chamfer(s.chamfer_size),
        ),
        PartSpec::LPlate(s) => Box::new(
            LPlate::new(
                s.thickness,
                count("num_x_holes", s.num_x_holes)?,
                count("num_y_holes", s.num_y_holes)?,
                count("num_z_holes", s.num_z_holes)?,
                s.hole_radius,
            )
            .with_corner_radius(s.corner_radius),
        ),
        PartSpec::Wheel(s) => Box::new(Wheel::new(
            s.outer_diameter,
            s.inner_diameter,
            s.outer_thickness,
            s.inner_thickness,
        )),
        PartSpec::VSlot2020Wheel(_) => Box::new(Wheel::vslot_2020()),
        PartSpec::VSlot2020MiniWheel(_) => Box::new(Wheel::vslot_2020_mini()),
        PartSpec::Bearing(s) => Box::new(Bearing::new(s.outer_diameter, s.inner_diameter, s.thickness)),
        PartSpec::Bearing625(_) => Box::new(Bearing::b625()),
        PartSpec::Bearing688(_) => Box::new(Bearing::b688()),
        PartSpec::Bearing105(_) => Box::new(Bearing::b105()),
        PartSpec::VSlot2020SlidingTNut(s) => Box::new(VSlot2020SlidingTNut::new(s.hole_radius)),
    };
    Ok(component)
}

/// Build and place the part a recipe describes.
pub fn build(spec: &PartSpec) -> Result<Part, CadError> {
    let part = component(spec)?.build()?;
    Ok(part.place(spec.placement()).with_spec(spec.clone()))
}

/// Build every entry of a config, naming each part after its entry.
pub fn build_config(config: &PartsConfig) -> Result<Vec<Part>, CadError> {
    config
        .entries
        .iter()
        .map(|entry| -> Result<Part, CadError> {
            tracing::debug!(entry = %entry.name, kind = entry.spec.type_name(), "building entry");
            Ok(build(&entry.spec)?.with_name(entry.name.clone()))
        })
        .collect()
}

/// The 2D profile behind a recipe, for parts that are a straight extrusion.
pub fn profile(spec: &PartSpec) -> Result<Option<Sketch>, CadError> {
    let sketch = match spec {
        PartSpec::VSlot2020Rail(s) => rail(s)?.profile()?.sketch()?,
        PartSpec::VSlotRail(s) => VSlotRail(rail(s)?).profile()?.sketch()?,
        PartSpec::VSlot2020EndCap(s) => VSlot2020EndCapProfile::new(
            count("num_x_holes", s.num_x_holes)?,
            count("num_y_holes", s.num_y_holes)?,
            s.hole_radius,
        )
        .with_corner_radius(s.corner_radius)
        .sketch()?,
        PartSpec::BuildPlate(s) => BuildPlateProfile::new(
            count("num_x_holes", s.num_x_holes)?,
            count("num_y_holes", s.num_y_holes)?,
            s.hole_radius,
        )
        .with_corner_radius(s.corner_radius)
        .sketch()?,
        _ => return Ok(None),
    };
    Ok(Some(sketch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vslot_ir::{Align, Align3D, Color};

    #[test]
    fn default_config_covers_every_type() {
        let config = default_config().unwrap();
        for name in PartSpec::TYPE_NAMES {
            assert!(
                config.entries.iter().any(|e| e.spec.type_name() == name),
                "{name} missing from the default config"
            );
        }
    }

    #[test]
    fn build_applies_placement() {
        let spec = spec_from_yaml(
            "type: VSlot2020Rail\nlength: 40\nalign: center\nrotation: [0, 90, 0]\n",
        );
        let part = build(&spec).unwrap();
        let (min, max) = part.bounding_box();
        // Centered, then the rail axis is turned onto X.
        assert!((min[0] + 20.0).abs() < 1e-9 && (max[0] - 20.0).abs() < 1e-9);
        assert!((max[2] - 10.0).abs() < 1e-9);
        assert_eq!(part.spec(), Some(&spec));
        assert_eq!(part.material(), Color::Aluminum);
    }

    #[test]
    fn build_config_names_parts_after_entries() {
        let config = PartsConfig::from_yaml(
            "short:\n  type: VSlot2020Rail\n  length: 20\nBearing625:\n",
        )
        .unwrap();
        let parts = build_config(&config).unwrap();
        let names: Vec<&str> = parts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["short", "Bearing625"]);
        assert_eq!(parts[1].material(), Color::Steel);
    }

    #[test]
    fn custom_grid_overrides_counts() {
        let spec = spec_from_yaml(
            "type: VSlot2020Rail\nlength: 10\nnum_x_rails: 5\ngrid: [[1, 1], [1, 0]]\n",
        );
        let part = build(&spec).unwrap();
        let (min, max) = part.bounding_box();
        assert!((max[0] - min[0] - 40.0).abs() < 1e-6);
        assert!((max[1] - min[1] - 40.0).abs() < 1e-6);
    }

    #[test]
    fn zero_counts_are_rejected() {
        let spec = spec_from_yaml(
            "type: BuildPlate\nthickness: 3\nnum_x_holes: 0\nnum_y_holes: 2\nhole_radius: M3\n",
        );
        let err = build(&spec).unwrap_err();
        assert!(matches!(err, CadError::InvalidParameter { name: "num_x_holes", .. }));
    }

    #[test]
    fn profiles_of_extrusions_only() {
        let rail = spec_from_yaml("type: VSlotRail\nlength: 10\n");
        let sketch = profile(&rail).unwrap().unwrap();
        let (min, max) = sketch.bounds().unwrap();
        assert!((min.x + 10.0).abs() < 1e-9 && (max.y - 10.0).abs() < 1e-9);

        let wheel = PartSpec::VSlot2020Wheel(vslot_ir::Placement {
            align: Some(Align3D::Uniform(Align::Min)),
            ..Default::default()
        });
        assert!(profile(&wheel).unwrap().is_none());
    }

    fn spec_from_yaml(yaml: &str) -> PartSpec {
        PartsConfig::from_yaml(&format!("entry:\n{}", indent(yaml)))
            .unwrap()
            .entries
            .remove(0)
            .spec
    }

    fn indent(yaml: &str) -> String {
        yaml.lines().map(|l| format!("  {l}\n")).collect()
    }
}
