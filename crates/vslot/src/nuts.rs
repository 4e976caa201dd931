//! Sliding T-nuts.

use vslot_ir::{Color, HoleRadius};
use vslot_kernel::{circle_points, rounded_outline, Point2, Sketch, Solid, CIRCLE_SEGMENTS};

use crate::{invalid, CadError, Component};

/// Half length of the nut along the slot (X).
pub const HALF_LENGTH: f64 = 4.75;

/// Half widths across the slot (Y) by height: `(z0, z1, bottom, top)`.
///
/// The bottom layer is the tapered wedge that seats in the V, the middle
/// layer the flange behind the slot lips and the top layer the neck that
/// rides between them.
const LAYERS: [(f64, f64, f64, f64); 3] = [
    (0.0, 2.0, 2.75, 4.75),
    (2.0, 3.0, 4.75, 4.75),
    (3.0, 4.5, 3.1, 3.1),
];

/// A sliding T-nut for 2020 V-Slot rails.
///
/// The nut stands on Z = 0, is centered in X and Y and has a vertical
/// through hole for the bolt.
///
/// The hole must fit inside the narrow end of the wedge, which limits the
/// nut to M5 bolts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VSlot2020SlidingTNut {
    /// Bolt hole radius.
    pub hole_radius: HoleRadius,
}

impl VSlot2020SlidingTNut {
    /// A nut with a hole for the given bolt or radius.
    pub fn new(hole_radius: impl Into<HoleRadius>) -> Self {
        Self {
            hole_radius: hole_radius.into(),
        }
    }

    /// Height of the nut.
    pub fn height() -> f64 {
        LAYERS[LAYERS.len() - 1].1
    }

    fn layer(half_width: f64, hole: &[Point2]) -> Result<Sketch, CadError> {
        let outline = rounded_outline(2.0 * HALF_LENGTH, 2.0 * half_width, [0.0; 4], [0; 4])?;
        Ok(Sketch::with_holes(&outline, &[hole.to_vec()])?)
    }
}

impl Component for VSlot2020SlidingTNut {
    fn name(&self) -> &'static str {
        "VSlot2020SlidingTNut"
    }

    fn material(&self) -> Color {
        Color::Steel
    }

    fn solid(&self) -> Result<Solid, CadError> {
        let r = self.hole_radius.resolve();
        let narrowest = LAYERS[0].2;
        if !(r > 0.0 && r < narrowest) {
            return Err(invalid(
                "hole_radius",
                format!(
                    "must be in (0, {narrowest}) to stay inside the wedge (M5 at most), got {r}"
                ),
            ));
        }
        let hole = circle_points(Point2::origin(), r, CIRCLE_SEGMENTS);

        let mut layers = Vec::with_capacity(LAYERS.len());
        for (z0, z1, bottom, top) in LAYERS {
            let lower = Self::layer(bottom, &hole)?;
            let upper = Self::layer(top, &hole)?;
            layers.push(Solid::loft(&lower, &upper, z0, z1)?);
        }
        Ok(Solid::compound(layers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vslot_ir::BoltSize;

    fn hole_area(r: f64) -> f64 {
        let n = CIRCLE_SEGMENTS as f64;
        0.5 * n * r * r * (std::f64::consts::TAU / n).sin()
    }

    #[test]
    fn nut_volume() {
        let part = VSlot2020SlidingTNut::new(BoltSize::M5).build().unwrap();
        // Cross-section across the slot: wedge 15, flange 9.5, neck 9.3.
        let profile = 15.0 + 9.5 + 9.3;
        let expected = profile * 2.0 * HALF_LENGTH - hole_area(2.55) * 4.5;
        assert!((part.volume() - expected).abs() < 1e-9, "volume: {}", part.volume());
    }

    #[test]
    fn nut_bounds() {
        let part = VSlot2020SlidingTNut::new(BoltSize::M4).build().unwrap();
        let (min, max) = part.bounding_box();
        assert_eq!(min, [-4.75, -4.75, 0.0]);
        assert_eq!(max, [4.75, 4.75, 4.5]);
        assert_eq!(VSlot2020SlidingTNut::height(), 4.5);
        assert_eq!(part.solid().shells().len(), 3);
    }

    #[test]
    fn hole_must_fit_the_wedge() {
        assert!(VSlot2020SlidingTNut::new(BoltSize::M5).build().is_ok());
        for too_big in [HoleRadius::from(BoltSize::M6), HoleRadius::from(2.75)] {
            let err = VSlot2020SlidingTNut::new(too_big).build().unwrap_err();
            assert!(matches!(err, CadError::InvalidParameter { name: "hole_radius", .. }));
            assert!(err.to_string().contains("M5 at most"), "{err}");
        }
    }
}
