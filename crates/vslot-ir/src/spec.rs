//! Part recipes.

use serde::{Deserialize, Serialize};

use crate::hardware::HoleRadius;
use crate::material::Color;
use crate::placement::Placement;

/// Occupancy grid given explicitly in a config.
///
/// Rows run along X, entries within a row along Y. Cells accept booleans
/// or numbers (non-zero is occupied), so `[[1, 1], [1, 0]]` works too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Vec<GridCell>>", into = "Vec<Vec<bool>>")]
pub struct GridSpec {
    /// Occupancy per cell, `rows[i][j]`.
    pub rows: Vec<Vec<bool>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GridCell {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl From<Vec<Vec<GridCell>>> for GridSpec {
    fn from(rows: Vec<Vec<GridCell>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| match cell {
                        GridCell::Bool(b) => b,
                        GridCell::Int(n) => n != 0,
                        GridCell::Float(f) => f != 0.0,
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }
}

impl From<GridSpec> for Vec<Vec<bool>> {
    fn from(grid: GridSpec) -> Self {
        grid.rows
    }
}

fn one() -> u32 {
    1
}

/// Extruded rail (`VSlot2020Rail` / `VSlotRail`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RailSpec {
    /// Extrusion length along Z.
    pub length: f64,
    /// Number of 20 mm cells along X.
    #[serde(default = "one")]
    pub num_x_rails: u32,
    /// Number of 20 mm cells along Y.
    #[serde(default = "one")]
    pub num_y_rails: u32,
    /// Use the C-beam layout instead of a filled box.
    #[serde(default)]
    pub c_beam: bool,
    /// Explicit occupancy grid, overriding the counts and `c_beam`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridSpec>,
    /// Placement of the built rail.
    #[serde(flatten)]
    pub placement: Placement,
}

/// End cap for 20 mm extrusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndCapSpec {
    /// Plate thickness.
    pub thickness: f64,
    /// Holes along X (one per 20 mm cell).
    pub num_x_holes: u32,
    /// Holes along Y.
    pub num_y_holes: u32,
    /// Hole radius or bolt size.
    pub hole_radius: HoleRadius,
    /// Outer corner radius.
    #[serde(default)]
    pub corner_radius: f64,
    /// Chamfer on the top outer edge.
    #[serde(default)]
    pub chamfer_size: f64,
    /// Placement of the built plate.
    #[serde(flatten)]
    pub placement: Placement,
}

/// Build plate with holes on a 10 mm grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateSpec {
    /// Plate thickness.
    pub thickness: f64,
    /// Holes along X.
    pub num_x_holes: u32,
    /// Holes along Y.
    pub num_y_holes: u32,
    /// Hole radius or bolt size.
    pub hole_radius: HoleRadius,
    /// Outer corner radius.
    #[serde(default)]
    pub corner_radius: f64,
    /// Chamfer on the top outer edge.
    #[serde(default)]
    pub chamfer_size: f64,
    /// Placement of the built plate.
    #[serde(flatten)]
    pub placement: Placement,
}

/// L-shaped bracket made of two build plates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LPlateSpec {
    /// Thickness of both legs.
    pub thickness: f64,
    /// Holes along X (shared by both legs).
    pub num_x_holes: u32,
    /// Holes along Y on the horizontal leg.
    pub num_y_holes: u32,
    /// Holes along Z on the vertical leg.
    pub num_z_holes: u32,
    /// Hole radius or bolt size.
    pub hole_radius: HoleRadius,
    /// Radius of the free corners.
    #[serde(default)]
    pub corner_radius: f64,
    /// Placement of the built bracket.
    #[serde(flatten)]
    pub placement: Placement,
}

/// Generic V-groove wheel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelSpec {
    /// Diameter at the tip of the V.
    pub outer_diameter: f64,
    /// Bore diameter.
    pub inner_diameter: f64,
    /// Width at the bore.
    pub outer_thickness: f64,
    /// Width at the tip of the V.
    pub inner_thickness: f64,
    /// Placement of the built wheel.
    #[serde(flatten)]
    pub placement: Placement,
}

/// Generic shielded ball bearing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BearingSpec {
    /// Outer race diameter.
    pub outer_diameter: f64,
    /// Bore diameter.
    pub inner_diameter: f64,
    /// Width.
    pub thickness: f64,
    /// Placement of the built bearing.
    #[serde(flatten)]
    pub placement: Placement,
}

/// Sliding T-nut for 2020 V-Slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TNutSpec {
    /// Threaded hole radius or bolt size.
    pub hole_radius: HoleRadius,
    /// Placement of the built nut.
    #[serde(flatten)]
    pub placement: Placement,
}

/// Every part the library can build, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
#[allow(missing_docs)]
pub enum PartSpec {
    VSlot2020Rail(RailSpec),
    VSlotRail(RailSpec),
    VSlot2020EndCap(EndCapSpec),
    BuildPlate(PlateSpec),
    LPlate(LPlateSpec),
    Wheel(WheelSpec),
    VSlot2020Wheel(Placement),
    VSlot2020MiniWheel(Placement),
    Bearing(BearingSpec),
    Bearing625(Placement),
    Bearing688(Placement),
    Bearing105(Placement),
    VSlot2020SlidingTNut(TNutSpec),
}

impl PartSpec {
    /// All type names accepted in the `type` field.
    pub const TYPE_NAMES: [&'static str; 13] = [
        "VSlot2020Rail",
        "VSlotRail",
        "VSlot2020EndCap",
        "BuildPlate",
        "LPlate",
        "Wheel",
        "VSlot2020Wheel",
        "VSlot2020MiniWheel",
        "Bearing",
        "Bearing625",
        "Bearing688",
        "Bearing105",
        "VSlot2020SlidingTNut",
    ];

    /// The `type` tag of this recipe.
    pub fn type_name(&self) -> &'static str {
        match self {
            PartSpec::VSlot2020Rail(_) => "VSlot2020Rail",
            PartSpec::VSlotRail(_) => "VSlotRail",
            PartSpec::VSlot2020EndCap(_) => "VSlot2020EndCap",
            PartSpec::BuildPlate(_) => "BuildPlate",
            PartSpec::LPlate(_) => "LPlate",
            PartSpec::Wheel(_) => "Wheel",
            PartSpec::VSlot2020Wheel(_) => "VSlot2020Wheel",
            PartSpec::VSlot2020MiniWheel(_) => "VSlot2020MiniWheel",
            PartSpec::Bearing(_) => "Bearing",
            PartSpec::Bearing625(_) => "Bearing625",
            PartSpec::Bearing688(_) => "Bearing688",
            PartSpec::Bearing105(_) => "Bearing105",
            PartSpec::VSlot2020SlidingTNut(_) => "VSlot2020SlidingTNut",
        }
    }

    /// Parameter names a recipe of type `type_name` accepts, besides
    /// `type` and the placement fields. `None` for unknown types.
    pub fn parameters(type_name: &str) -> Option<&'static [&'static str]> {
        const RAIL: &[&str] = &["length", "num_x_rails", "num_y_rails", "c_beam", "grid"];
        const PLATE: &[&str] = &[
            "thickness",
            "num_x_holes",
            "num_y_holes",
            "hole_radius",
            "corner_radius",
            "chamfer_size",
        ];
        let params: &'static [&'static str] = match type_name {
            "VSlot2020Rail" | "VSlotRail" => RAIL,
            "VSlot2020EndCap" | "BuildPlate" => PLATE,
            "LPlate" => &[
                "thickness",
                "num_x_holes",
                "num_y_holes",
                "num_z_holes",
                "hole_radius",
                "corner_radius",
            ],
            "Wheel" => &[
                "outer_diameter",
                "inner_diameter",
                "outer_thickness",
                "inner_thickness",
            ],
            "Bearing" => &["outer_diameter", "inner_diameter", "thickness"],
            "VSlot2020SlidingTNut" => &["hole_radius"],
            "VSlot2020Wheel" | "VSlot2020MiniWheel" | "Bearing625" | "Bearing688"
            | "Bearing105" => &[],
            _ => return None,
        };
        Some(params)
    }

    /// Placement requested for the built part.
    pub fn placement(&self) -> &Placement {
        match self {
            PartSpec::VSlot2020Rail(s) | PartSpec::VSlotRail(s) => &s.placement,
            PartSpec::VSlot2020EndCap(s) => &s.placement,
            PartSpec::BuildPlate(s) => &s.placement,
            PartSpec::LPlate(s) => &s.placement,
            PartSpec::Wheel(s) => &s.placement,
            PartSpec::Bearing(s) => &s.placement,
            PartSpec::VSlot2020SlidingTNut(s) => &s.placement,
            PartSpec::VSlot2020Wheel(p)
            | PartSpec::VSlot2020MiniWheel(p)
            | PartSpec::Bearing625(p)
            | PartSpec::Bearing688(p)
            | PartSpec::Bearing105(p) => p,
        }
    }

    /// Finish the part is rendered with.
    pub fn default_color(&self) -> Color {
        match self {
            PartSpec::VSlot2020Rail(_)
            | PartSpec::VSlotRail(_)
            | PartSpec::VSlot2020EndCap(_)
            | PartSpec::BuildPlate(_)
            | PartSpec::LPlate(_) => Color::Aluminum,
            PartSpec::Wheel(_) | PartSpec::VSlot2020Wheel(_) | PartSpec::VSlot2020MiniWheel(_) => {
                Color::Rubber
            }
            PartSpec::Bearing(_)
            | PartSpec::Bearing625(_)
            | PartSpec::Bearing688(_)
            | PartSpec::Bearing105(_)
            | PartSpec::VSlot2020SlidingTNut(_) => Color::Steel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Align, BoltSize};

    #[test]
    fn rail_defaults() {
        let spec: PartSpec = serde_yaml::from_str("type: VSlot2020Rail\nlength: 100\n").unwrap();
        let PartSpec::VSlot2020Rail(rail) = spec else {
            panic!("expected a rail");
        };
        assert_eq!(rail.length, 100.0);
        assert_eq!((rail.num_x_rails, rail.num_y_rails), (1, 1));
        assert!(!rail.c_beam);
        assert!(rail.grid.is_none());
        assert_eq!(rail.placement, Placement::default());
    }

    #[test]
    fn explicit_grid_accepts_numbers() {
        let spec: PartSpec =
            serde_yaml::from_str("type: VSlotRail\nlength: 50\ngrid: [[1, 1], [true, 0]]\n")
                .unwrap();
        let PartSpec::VSlotRail(rail) = spec else {
            panic!("expected a rail");
        };
        assert_eq!(
            rail.grid.unwrap().rows,
            vec![vec![true, true], vec![true, false]]
        );
    }

    #[test]
    fn placement_is_flattened() {
        let spec: PartSpec = serde_yaml::from_str(
            "type: VSlot2020SlidingTNut\nhole_radius: M5\nrotation: [0, 90, 0]\nalign: [min, center, max]\n",
        )
        .unwrap();
        assert_eq!(spec.type_name(), "VSlot2020SlidingTNut");
        assert_eq!(spec.placement().rotation.y, 90.0);
        assert_eq!(
            spec.placement().align.map(|a| a.axes()),
            Some([Align::Min, Align::Center, Align::Max])
        );
        let PartSpec::VSlot2020SlidingTNut(nut) = spec else {
            panic!("expected a nut");
        };
        assert_eq!(nut.hole_radius, HoleRadius::Bolt(BoltSize::M5));
    }

    #[test]
    fn preset_without_parameters() {
        let spec: PartSpec = serde_yaml::from_str("type: Bearing688\n").unwrap();
        assert_eq!(spec, PartSpec::Bearing688(Placement::default()));
        assert_eq!(spec.default_color(), Color::Steel);
    }

    #[test]
    fn missing_required_field_fails() {
        let result: Result<PartSpec, _> = serde_yaml::from_str("type: Wheel\nouter_diameter: 20\n");
        assert!(result.is_err());
    }

    #[test]
    fn type_names_are_complete() {
        for name in PartSpec::TYPE_NAMES {
            assert!(PartSpec::parameters(name).is_some(), "{name}");
        }
        assert!(PartSpec::parameters("Sprocket").is_none());
        let spec = PartSpec::VSlot2020MiniWheel(Placement::default());
        assert!(PartSpec::TYPE_NAMES.contains(&spec.type_name()));
        assert_eq!(spec.default_color(), Color::Rubber);
    }
}
