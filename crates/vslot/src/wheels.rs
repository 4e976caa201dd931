//! V-Slot wheels.

use vslot_ir::Color;
use vslot_kernel::{Point2, Solid, CIRCLE_SEGMENTS};

use crate::{invalid, positive, CadError, Component};

/// Chamfer on both edges of the center bore.
pub const BORE_CHAMFER: f64 = 0.3;

/// A wheel: a cylinder centered on the origin along Z, with chamfered rims
/// forming the V profile and a chamfered center bore.
///
/// The rim chamfer is `(outer_thickness - inner_thickness) / 2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wheel {
    name: &'static str,
    /// Diameter at the rim.
    pub outer_diameter: f64,
    /// Bore diameter.
    pub inner_diameter: f64,
    /// Axial thickness at the hub.
    pub outer_thickness: f64,
    /// Axial thickness at the rim, where the chamfers meet.
    pub inner_thickness: f64,
}

impl Wheel {
    /// A custom wheel.
    pub fn new(
        outer_diameter: f64,
        inner_diameter: f64,
        outer_thickness: f64,
        inner_thickness: f64,
    ) -> Self {
        Self {
            name: "Wheel",
            outer_diameter,
            inner_diameter,
            outer_thickness,
            inner_thickness,
        }
    }

    /// Standard 2020 V-Slot wheel; the axle sits about 20 mm from the rail
    /// center.
    pub fn vslot_2020() -> Self {
        Self {
            name: "VSlot2020Wheel",
            ..Self::new(23.9, 16.0, 10.2, 5.9)
        }
    }

    /// Mini 2020 V-Slot wheel; the axle sits about 15 mm from the rail
    /// center.
    pub fn vslot_2020_mini() -> Self {
        Self {
            name: "VSlot2020MiniWheel",
            ..Self::new(15.2, 10.0, 8.8, 5.8)
        }
    }

    /// Closed `(r, z)` half section, counter-clockwise.
    pub fn section(&self) -> Result<Vec<Point2>, CadError> {
        for (name, value) in [
            ("outer_diameter", self.outer_diameter),
            ("inner_diameter", self.inner_diameter),
            ("outer_thickness", self.outer_thickness),
            ("inner_thickness", self.inner_thickness),
        ] {
            positive(name, value)?;
        }
        if self.inner_thickness > self.outer_thickness {
            return Err(invalid(
                "inner_thickness",
                format!(
                    "{} exceeds the outer thickness {}",
                    self.inner_thickness, self.outer_thickness
                ),
            ));
        }

        let r_out = self.outer_diameter / 2.0;
        let r_in = self.inner_diameter / 2.0;
        let half = self.outer_thickness / 2.0;
        let c = (self.outer_thickness - self.inner_thickness) / 2.0;
        let h = BORE_CHAMFER;
        if r_out - c <= r_in + h {
            return Err(invalid(
                "inner_diameter",
                format!("bore {} leaves no material inside the rim", self.inner_diameter),
            ));
        }
        if half <= h {
            return Err(invalid(
                "outer_thickness",
                format!("{} is too thin for the bore chamfer", self.outer_thickness),
            ));
        }

        Ok(vec![
            Point2::new(r_in + h, -half),
            Point2::new(r_out - c, -half),
            Point2::new(r_out, -half + c),
            Point2::new(r_out, half - c),
            Point2::new(r_out - c, half),
            Point2::new(r_in + h, half),
            Point2::new(r_in, half - h),
            Point2::new(r_in, -half + h),
        ])
    }
}

impl Component for Wheel {
    fn name(&self) -> &'static str {
        self.name
    }

    fn material(&self) -> Color {
        Color::Rubber
    }

    fn solid(&self) -> Result<Solid, CadError> {
        Ok(Solid::revolve(&self.section()?, CIRCLE_SEGMENTS)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Area and centroid radius of a closed polygon.
    fn area_and_centroid_x(points: &[Point2]) -> (f64, f64) {
        let n = points.len();
        let (mut a, mut cx) = (0.0, 0.0);
        for k in 0..n {
            let (p, q) = (points[k], points[(k + 1) % n]);
            let cross = p.x * q.y - q.x * p.y;
            a += cross;
            cx += (p.x + q.x) * cross;
        }
        (a / 2.0, cx / (3.0 * a))
    }

    /// Ratio of an inscribed n-gon to its circle.
    fn faceting() -> f64 {
        let n = CIRCLE_SEGMENTS as f64;
        n * (std::f64::consts::TAU / n).sin() / std::f64::consts::TAU
    }

    #[test]
    fn section_is_counter_clockwise() {
        let (area, _) = area_and_centroid_x(&Wheel::vslot_2020().section().unwrap());
        assert!((area - 35.5775).abs() < 1e-9, "area: {area}");
    }

    #[test]
    fn volume_follows_pappus() {
        for wheel in [Wheel::vslot_2020(), Wheel::vslot_2020_mini()] {
            let (area, cx) = area_and_centroid_x(&wheel.section().unwrap());
            let pappus = std::f64::consts::TAU * cx * area * faceting();
            let volume = wheel.build().unwrap().volume();
            assert!(
                (volume - pappus).abs() / pappus < 1e-3,
                "{}: {volume} vs {pappus}",
                wheel.name()
            );
        }
    }

    #[test]
    fn wheel_bounds() {
        let part = Wheel::vslot_2020().build().unwrap();
        assert_eq!(part.name, "VSlot2020Wheel");
        assert_eq!(part.material(), Color::Rubber);
        let (min, max) = part.bounding_box();
        assert!((max[0] - 11.95).abs() < 1e-9 && (min[0] + 11.95).abs() < 1e-9);
        assert!((max[2] - 5.1).abs() < 1e-9 && (min[2] + 5.1).abs() < 1e-9);
        let com = part.center_of_mass();
        assert!(com.iter().all(|c| c.abs() < 1e-9), "com: {com:?}");
    }

    #[test]
    fn invalid_wheels() {
        let err = Wheel::new(20.0, 19.0, 8.0, 4.0).build().unwrap_err();
        assert!(matches!(err, CadError::InvalidParameter { name: "inner_diameter", .. }));
        let err = Wheel::new(20.0, 5.0, 4.0, 6.0).build().unwrap_err();
        assert!(matches!(err, CadError::InvalidParameter { name: "inner_thickness", .. }));
        let err = Wheel::new(-1.0, 5.0, 4.0, 2.0).build().unwrap_err();
        assert!(matches!(err, CadError::InvalidParameter { name: "outer_diameter", .. }));
        let err = Wheel::new(f64::INFINITY, 5.0, 4.0, 2.0).build().unwrap_err();
        assert!(matches!(err, CadError::InvalidParameter { name: "outer_diameter", .. }));
    }
}
