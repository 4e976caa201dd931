//! Ball bearings.

use vslot_ir::Color;
use vslot_kernel::{Point2, Solid, CIRCLE_SEGMENTS};

use crate::{invalid, positive, CadError, Component};

/// Chamfer on the exposed race and seal edges.
const EDGE_CHAMFER: f64 = 0.2;

/// Radial wall thickness of each race.
const RACE_WALL: f64 = 1.0;

/// A sealed ball bearing centered on the origin along Z.
///
/// Modeled as three nested rings: the outer race, the seal (slightly
/// thinner than the races) and the inner race.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bearing {
    name: &'static str,
    /// Outer race diameter.
    pub outer_diameter: f64,
    /// Bore diameter.
    pub inner_diameter: f64,
    /// Axial thickness.
    pub thickness: f64,
}

impl Bearing {
    /// A custom bearing.
    pub fn new(outer_diameter: f64, inner_diameter: f64, thickness: f64) -> Self {
        Self {
            name: "Bearing",
            outer_diameter,
            inner_diameter,
            thickness,
        }
    }

    /// 625 (16 × 5 × 5), used in 2020 V-Slot wheels.
    pub fn b625() -> Self {
        Self {
            name: "Bearing625",
            ..Self::new(16.0, 5.0, 5.0)
        }
    }

    /// 688 (16 × 8 × 5), used in 2020 V-Slot wheels.
    pub fn b688() -> Self {
        Self {
            name: "Bearing688",
            ..Self::new(16.0, 8.0, 5.0)
        }
    }

    /// 105 (10 × 5 × 4), used in 2020 V-Slot mini wheels.
    pub fn b105() -> Self {
        Self {
            name: "Bearing105",
            ..Self::new(10.0, 5.0, 4.0)
        }
    }

    /// `(r, z)` sections of the outer race, seal and inner race.
    pub fn sections(&self) -> Result<[Vec<Point2>; 3], CadError> {
        for (name, value) in [
            ("outer_diameter", self.outer_diameter),
            ("inner_diameter", self.inner_diameter),
            ("thickness", self.thickness),
        ] {
            positive(name, value)?;
        }
        let r_out = self.outer_diameter / 2.0;
        let r_in = self.inner_diameter / 2.0;
        let c = EDGE_CHAMFER;
        let w = RACE_WALL;
        if r_out - w - c <= r_in + w + c {
            return Err(invalid(
                "inner_diameter",
                format!(
                    "{} leaves no room for the seal inside {}",
                    self.inner_diameter, self.outer_diameter
                ),
            ));
        }
        if self.thickness <= 4.0 * c {
            return Err(invalid(
                "thickness",
                format!("{} is too thin for the edge chamfers", self.thickness),
            ));
        }

        let half = self.thickness / 2.0;
        let seal = (self.thickness - c) / 2.0;
        let outer = vec![
            Point2::new(r_out - w, -half),
            Point2::new(r_out - c, -half),
            Point2::new(r_out, -half + c),
            Point2::new(r_out, half - c),
            Point2::new(r_out - c, half),
            Point2::new(r_out - w, half),
        ];
        let seal = vec![
            Point2::new(r_in + w + c, -seal),
            Point2::new(r_out - w - c, -seal),
            Point2::new(r_out - w, -seal + c),
            Point2::new(r_out - w, seal - c),
            Point2::new(r_out - w - c, seal),
            Point2::new(r_in + w + c, seal),
            Point2::new(r_in + w, seal - c),
            Point2::new(r_in + w, -seal + c),
        ];
        let inner = vec![
            Point2::new(r_in + c, -half),
            Point2::new(r_in + w, -half),
            Point2::new(r_in + w, half),
            Point2::new(r_in + c, half),
            Point2::new(r_in, half - c),
            Point2::new(r_in, -half + c),
        ];
        Ok([outer, seal, inner])
    }
}

impl Component for Bearing {
    fn name(&self) -> &'static str {
        self.name
    }

    fn material(&self) -> Color {
        Color::Steel
    }

    fn solid(&self) -> Result<Solid, CadError> {
        let rings = self
            .sections()?
            .iter()
            .map(|section| Solid::revolve(section, CIRCLE_SEGMENTS))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Solid::compound(rings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        let b = Bearing::b688();
        assert_eq!((b.outer_diameter, b.inner_diameter, b.thickness), (16.0, 8.0, 5.0));
        assert_eq!(Bearing::b105().name(), "Bearing105");
    }

    #[test]
    fn three_rings() {
        let part = Bearing::b625().build().unwrap();
        assert_eq!(part.solid().shells().len(), 3);
        assert_eq!(part.material(), Color::Steel);
        let (min, max) = part.bounding_box();
        assert!((max[0] - 8.0).abs() < 1e-9 && (min[0] + 8.0).abs() < 1e-9);
        assert!((max[2] - 2.5).abs() < 1e-9 && (min[2] + 2.5).abs() < 1e-9);
    }

    #[test]
    fn volume_is_close_to_an_annulus() {
        // Chamfers and the recessed seal only shave a little off the ring.
        let part = Bearing::b625().build().unwrap();
        let annulus = std::f64::consts::PI * (8.0f64.powi(2) - 2.5f64.powi(2)) * 5.0;
        let v = part.volume();
        assert!(v < annulus && v > 0.95 * annulus, "volume: {v} vs {annulus}");
    }

    #[test]
    fn bore_too_large() {
        let err = Bearing::new(10.0, 8.0, 4.0).build().unwrap_err();
        assert!(matches!(err, CadError::InvalidParameter { name: "inner_diameter", .. }));
    }

    #[test]
    fn non_finite_dimensions() {
        let err = Bearing::new(f64::INFINITY, 5.0, 4.0).build().unwrap_err();
        assert!(matches!(err, CadError::InvalidParameter { name: "outer_diameter", .. }));
        let err = Bearing::new(16.0, 5.0, f64::NAN).build().unwrap_err();
        assert!(matches!(err, CadError::InvalidParameter { name: "thickness", .. }));
    }
}
