//! End caps, build plates and L-brackets.
//!
//! All plates are rectangles with a centered grid of bolt holes running
//! along Z. End caps use a 20 mm hole pitch matching the tapped holes in
//! rail ends; build plates use a 10 mm pitch with a 10 mm margin.

use vslot_ir::{Align2D, Color, HoleRadius};
use vslot_kernel::{
    circle_points, rounded_outline, Location, Point2, Sketch, Solid, ARC_SEGMENTS,
    CIRCLE_SEGMENTS,
};

use crate::grid::grid_locations;
use crate::{invalid, positive, CadError, Component, Profile};

/// Hole pitch of end caps (one hole per rail).
pub const END_CAP_HOLE_SPACING: f64 = 20.0;

/// Hole pitch of build plates and L-plates.
pub const PLATE_HOLE_SPACING: f64 = 10.0;

/// Corner radii of a plate: bottom-left, bottom-right, top-right, top-left.
type CornerRadii = [f64; 4];

/// Outline size and hole grid of a plate.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HolePattern {
    width: f64,
    height: f64,
    spacing: f64,
    nx: usize,
    ny: usize,
    hole_radius: f64,
}

impl HolePattern {
    fn end_cap(nx: usize, ny: usize, hole_radius: HoleRadius) -> Self {
        Self {
            width: END_CAP_HOLE_SPACING * nx as f64,
            height: END_CAP_HOLE_SPACING * ny as f64,
            spacing: END_CAP_HOLE_SPACING,
            nx,
            ny,
            hole_radius: hole_radius.resolve(),
        }
    }

    fn build_plate(nx: usize, ny: usize, hole_radius: HoleRadius) -> Self {
        Self {
            width: PLATE_HOLE_SPACING * (nx as f64 + 1.0),
            height: PLATE_HOLE_SPACING * (ny as f64 + 1.0),
            spacing: PLATE_HOLE_SPACING,
            nx,
            ny,
            hole_radius: hole_radius.resolve(),
        }
    }

    fn hole_centers(&self) -> Vec<Point2> {
        grid_locations(self.spacing, self.spacing, self.nx, self.ny, Align2D::CENTER)
            .into_iter()
            .map(|l| Point2::new(l.x, l.y))
            .collect()
    }

    /// Distance from `p` to the rounded outline, positive inside.
    fn clearance(&self, radii: CornerRadii, p: Point2) -> f64 {
        let (a, b) = (self.width / 2.0, self.height / 2.0);
        let corner = match (p.x >= 0.0, p.y >= 0.0) {
            (false, false) => radii[0],
            (true, false) => radii[1],
            (true, true) => radii[2],
            (false, true) => radii[3],
        };
        let (x, y) = (p.x.abs(), p.y.abs());
        let (cx, cy) = (a - corner, b - corner);
        if x > cx && y > cy {
            corner - (x - cx).hypot(y - cy)
        } else {
            (a - x).min(b - y)
        }
    }

    /// Smallest wall left between a hole and the outline.
    fn min_wall(&self, radii: CornerRadii) -> f64 {
        self.hole_centers()
            .into_iter()
            .map(|c| self.clearance(radii, c) - self.hole_radius)
            .fold(f64::INFINITY, f64::min)
    }

    fn validate(&self, radii: CornerRadii) -> Result<(), CadError> {
        if self.nx == 0 || self.ny == 0 {
            return Err(invalid(
                "hole count",
                format!("need at least one hole per axis, got {} x {}", self.nx, self.ny),
            ));
        }
        let r = self.hole_radius;
        if !(r > 0.0 && r < self.spacing / 2.0) {
            return Err(invalid(
                "hole_radius",
                format!("must be in (0, {}), got {r}", self.spacing / 2.0),
            ));
        }
        let max_radius = self.width.min(self.height) / 2.0;
        for r in radii {
            if !(0.0..=max_radius).contains(&r) {
                return Err(invalid(
                    "corner_radius",
                    format!("must be in [0, {max_radius}], got {r}"),
                ));
            }
        }
        if self.min_wall(radii) <= 0.0 {
            return Err(invalid(
                "corner_radius",
                format!("{radii:?} leaves no wall around the outer holes"),
            ));
        }
        Ok(())
    }

    /// Profile shrunk by `inset` on every side; holes are unchanged.
    ///
    /// Corners keep their segment count whatever the inset, so two profiles
    /// of the same pattern can always be lofted.
    fn sketch(&self, radii: CornerRadii, inset: f64) -> Result<Sketch, CadError> {
        let segments = radii.map(|r| if r > 0.0 { ARC_SEGMENTS } else { 0 });
        let outline = rounded_outline(
            self.width - 2.0 * inset,
            self.height - 2.0 * inset,
            radii.map(|r| (r - inset).max(0.0)),
            segments,
        )?;
        let holes: Vec<Vec<Point2>> = self
            .hole_centers()
            .into_iter()
            .map(|c| {
                let mut ring = circle_points(c, self.hole_radius, CIRCLE_SEGMENTS);
                ring.reverse();
                ring
            })
            .collect();
        Ok(Sketch::with_holes(&outline, &holes)?)
    }

    /// Extrude to `thickness`, chamfering the top outer edges by `chamfer`.
    fn plate(&self, radii: CornerRadii, thickness: f64, chamfer: f64) -> Result<Solid, CadError> {
        self.validate(radii)?;
        positive("thickness", thickness)?;
        let profile = self.sketch(radii, 0.0)?;
        if chamfer == 0.0 {
            return Ok(Solid::extrude(&profile, 0.0, thickness)?);
        }

        let limit = thickness.min(self.min_wall(radii));
        if !(chamfer > 0.0 && chamfer < limit) {
            return Err(invalid(
                "chamfer_size",
                format!("must be in [0, {limit}), got {chamfer}"),
            ));
        }
        let top = self.sketch(radii, chamfer)?;
        let base = Solid::extrude(&profile, 0.0, thickness - chamfer)?;
        let bevel = Solid::loft(&profile, &top, thickness - chamfer, thickness)?;
        Ok(base.union(bevel))
    }
}

/// End cap profile for 2020 V-Slot rails.
///
/// `20 · num_x_holes` by `20 · num_y_holes`, centered on the origin, with one
/// hole per rail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VSlot2020EndCapProfile {
    /// Holes (rails) along X.
    pub num_x_holes: usize,
    /// Holes (rails) along Y.
    pub num_y_holes: usize,
    /// Bolt hole radius.
    pub hole_radius: HoleRadius,
    /// Radius of the four corners.
    pub corner_radius: f64,
}

impl VSlot2020EndCapProfile {
    /// Sharp-cornered profile.
    pub fn new(num_x_holes: usize, num_y_holes: usize, hole_radius: impl Into<HoleRadius>) -> Self {
        Self {
            num_x_holes,
            num_y_holes,
            hole_radius: hole_radius.into(),
            corner_radius: 0.0,
        }
    }

    /// Round the corners.
    pub fn with_corner_radius(mut self, corner_radius: f64) -> Self {
        self.corner_radius = corner_radius;
        self
    }

    fn pattern(&self) -> HolePattern {
        HolePattern::end_cap(self.num_x_holes, self.num_y_holes, self.hole_radius)
    }
}

impl Profile for VSlot2020EndCapProfile {
    fn sketch(&self) -> Result<Sketch, CadError> {
        let radii = [self.corner_radius; 4];
        let pattern = self.pattern();
        pattern.validate(radii)?;
        pattern.sketch(radii, 0.0)
    }
}

/// End cap for 2020 V-Slot rails, extruded from `0` to `thickness`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VSlot2020EndCap {
    /// Plate thickness.
    pub thickness: f64,
    /// Outline and holes.
    pub profile: VSlot2020EndCapProfile,
    /// Chamfer on the top outer edges (0 for none).
    pub chamfer_size: f64,
}

impl VSlot2020EndCap {
    /// Sharp-cornered end cap without chamfer.
    pub fn new(
        thickness: f64,
        num_x_holes: usize,
        num_y_holes: usize,
        hole_radius: impl Into<HoleRadius>,
    ) -> Self {
        Self {
            thickness,
            profile: VSlot2020EndCapProfile::new(num_x_holes, num_y_holes, hole_radius),
            chamfer_size: 0.0,
        }
    }

    /// Round the corners.
    pub fn with_corner_radius(mut self, corner_radius: f64) -> Self {
        self.profile.corner_radius = corner_radius;
        self
    }

    /// Chamfer the top outer edges.
    pub fn with_chamfer(mut self, chamfer_size: f64) -> Self {
        self.chamfer_size = chamfer_size;
        self
    }
}

impl Component for VSlot2020EndCap {
    fn name(&self) -> &'static str {
        "VSlot2020EndCap"
    }

    fn material(&self) -> Color {
        Color::Aluminum
    }

    fn solid(&self) -> Result<Solid, CadError> {
        self.profile.pattern().plate(
            [self.profile.corner_radius; 4],
            self.thickness,
            self.chamfer_size,
        )
    }
}

/// Build plate profile: holes on a 10 mm grid with a 10 mm margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildPlateProfile {
    /// Holes along X.
    pub num_x_holes: usize,
    /// Holes along Y.
    pub num_y_holes: usize,
    /// Bolt hole radius.
    pub hole_radius: HoleRadius,
    /// Radius of the four corners.
    pub corner_radius: f64,
}

impl BuildPlateProfile {
    /// Sharp-cornered profile.
    pub fn new(num_x_holes: usize, num_y_holes: usize, hole_radius: impl Into<HoleRadius>) -> Self {
        Self {
            num_x_holes,
            num_y_holes,
            hole_radius: hole_radius.into(),
            corner_radius: 0.0,
        }
    }

    /// Round the corners.
    pub fn with_corner_radius(mut self, corner_radius: f64) -> Self {
        self.corner_radius = corner_radius;
        self
    }

    fn pattern(&self) -> HolePattern {
        HolePattern::build_plate(self.num_x_holes, self.num_y_holes, self.hole_radius)
    }
}

impl Profile for BuildPlateProfile {
    fn sketch(&self) -> Result<Sketch, CadError> {
        let radii = [self.corner_radius; 4];
        let pattern = self.pattern();
        pattern.validate(radii)?;
        pattern.sketch(radii, 0.0)
    }
}

/// Flat build plate with a grid of mounting holes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildPlate {
    /// Plate thickness.
    pub thickness: f64,
    /// Outline and holes.
    pub profile: BuildPlateProfile,
    /// Chamfer on the top outer edges (0 for none).
    pub chamfer_size: f64,
}

impl BuildPlate {
    /// Sharp-cornered plate without chamfer.
    pub fn new(
        thickness: f64,
        num_x_holes: usize,
        num_y_holes: usize,
        hole_radius: impl Into<HoleRadius>,
    ) -> Self {
        Self {
            thickness,
            profile: BuildPlateProfile::new(num_x_holes, num_y_holes, hole_radius),
            chamfer_size: 0.0,
        }
    }

    /// Round the corners.
    pub fn with_corner_radius(mut self, corner_radius: f64) -> Self {
        self.profile.corner_radius = corner_radius;
        self
    }

    /// Chamfer the top outer edges.
    pub fn with_chamfer(mut self, chamfer_size: f64) -> Self {
        self.chamfer_size = chamfer_size;
        self
    }
}

impl Component for BuildPlate {
    fn name(&self) -> &'static str {
        "BuildPlate"
    }

    fn material(&self) -> Color {
        Color::Aluminum
    }

    fn solid(&self) -> Result<Solid, CadError> {
        self.profile.pattern().plate(
            [self.profile.corner_radius; 4],
            self.thickness,
            self.chamfer_size,
        )
    }
}

/// L-shaped bracket: two build plates joined along the X axis.
///
/// The horizontal leg lies on XY (Y from 0, Z from 0 to `thickness`); the
/// vertical leg stands on XZ (Z from 0, Y from `-thickness` to 0). Both are
/// centered in X. `corner_radius` rounds the two free corners of each leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LPlate {
    /// Thickness of both legs.
    pub thickness: f64,
    /// Holes along X (both legs).
    pub num_x_holes: usize,
    /// Holes along Y (horizontal leg).
    pub num_y_holes: usize,
    /// Holes along Z (vertical leg).
    pub num_z_holes: usize,
    /// Bolt hole radius.
    pub hole_radius: HoleRadius,
    /// Radius of the free corners.
    pub corner_radius: f64,
}

impl LPlate {
    /// Sharp-cornered bracket.
    pub fn new(
        thickness: f64,
        num_x_holes: usize,
        num_y_holes: usize,
        num_z_holes: usize,
        hole_radius: impl Into<HoleRadius>,
    ) -> Self {
        Self {
            thickness,
            num_x_holes,
            num_y_holes,
            num_z_holes,
            hole_radius: hole_radius.into(),
            corner_radius: 0.0,
        }
    }

    /// Round the free corners.
    pub fn with_corner_radius(mut self, corner_radius: f64) -> Self {
        self.corner_radius = corner_radius;
        self
    }

    /// One leg, extruded from 0 to `thickness` with the bracket edge on X.
    fn leg(&self, rows: usize) -> Result<Solid, CadError> {
        let pattern = HolePattern::build_plate(self.num_x_holes, rows, self.hole_radius);
        let radii = [0.0, 0.0, self.corner_radius, self.corner_radius];
        let solid = pattern.plate(radii, self.thickness, 0.0)?;
        Ok(solid.translate(0.0, pattern.height / 2.0, 0.0))
    }
}

impl Component for LPlate {
    fn name(&self) -> &'static str {
        "LPlate"
    }

    fn material(&self) -> Color {
        Color::Aluminum
    }

    fn solid(&self) -> Result<Solid, CadError> {
        let horizontal = self.leg(self.num_y_holes)?;
        // A quarter turn about X maps the leg's +Y onto +Z and its
        // thickness onto -Y.
        let vertical = self
            .leg(self.num_z_holes)?
            .transformed(&Location::from_euler_degrees(90.0, 0.0, 0.0));
        Ok(horizontal.union(vertical))
    }
}
