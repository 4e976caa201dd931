//! V-Slot rail profiles and rails.
//!
//! A multi-rail cross-section is described by an [`OccupancyGrid`] of 20 mm
//! cells. Every occupied cell contributes a square with a center hole.
//! Each of its four sides either faces an empty neighbor, in which case a
//! V-slot is cut, or an occupied one, in which case two cavities are cut
//! along the shared side. The cavity shape depends on the cells next to
//! that side (see [`classify`]).

use vslot_ir::{Align, Align2D, Align3D, Color};
use vslot_kernel::{mirrored_polyline, Location, Point2, Sketch, Solid};

use crate::grid::{array_polar_locations, GridLocation, OccupancyGrid, DIRECTIONS};
use crate::{positive, CadError, Component, Joint, Profile};

/// Pitch of the rail grid.
pub const CELL_SIZE: f64 = 20.0;

/// Radius of the center hole of every cell.
pub const CENTER_HOLE_RADIUS: f64 = 2.1;

/// A feature cut into a cell side.
///
/// Outlines are drawn in the cell frame with the side in question along
/// +X (the cell spans `-10..10` on both axes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// V-slot on an open side.
    Slot,
    /// Cavity with occupied cells on both the side and the diagonal.
    CenterCavity,
    /// Cavity with an occupied side cell but an empty diagonal.
    CornerCavity,
    /// Cavity next to an empty side cell.
    EdgeCavity,
}

impl Feature {
    /// Closed outline in the cell frame.
    pub fn outline(self) -> Vec<Point2> {
        let pts = |coords: &[(f64, f64)]| -> Vec<Point2> {
            coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
        };
        match self {
            Feature::Slot => mirrored_polyline(&pts(&[
                (3.75, 0.0),
                (3.9, 0.15),
                (3.9, 2.84),
                (6.56, 5.5),
                (8.2, 5.5),
                (8.2, 3.125),
                (8.545, 3.125),
                (10.0, 4.58),
                (10.0, 0.0),
            ])),
            Feature::EdgeCavity => pts(&[
                (10.0, 0.0),
                (3.9, 0.0),
                (3.9, 3.16),
                (7.3, 6.56),
                (7.3, 8.2),
                (10.0, 8.2),
            ]),
            Feature::CornerCavity => pts(&[
                (10.0, 0.0),
                (3.9, 0.0),
                (3.9, 2.84),
                (9.26, 8.2),
                (10.0, 8.2),
            ]),
            Feature::CenterCavity => pts(&[
                (10.0, 0.0),
                (3.9, 0.0),
                (3.9, 2.84),
                (3.37, 3.37),
                (10.0, 10.0),
            ]),
        }
    }
}

/// A feature placed on a cell side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedFeature {
    /// What to cut.
    pub feature: Feature,
    /// Whether the outline is mirrored about the side axis before placing.
    pub mirrored: bool,
    /// Cell center and side direction (0°, 90°, 180° or 270°).
    pub location: GridLocation,
}

/// Cells and side features of a cross-section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CavityLayout {
    /// Centers of the cells that get a square (cells enclosed on all four
    /// sides are left out).
    pub squares: Vec<GridLocation>,
    /// Features to cut.
    pub features: Vec<PlacedFeature>,
}

impl CavityLayout {
    /// Number of placed features of one kind, mirrored or not.
    pub fn count(&self, feature: Feature) -> usize {
        self.features.iter().filter(|f| f.feature == feature).count()
    }

    /// Number of mirrored placements of one kind.
    pub fn count_mirrored(&self, feature: Feature) -> usize {
        self.features
            .iter()
            .filter(|f| f.feature == feature && f.mirrored)
            .count()
    }

    /// Locations of the V-slots.
    pub fn slots(&self) -> impl Iterator<Item = &GridLocation> {
        self.features
            .iter()
            .filter(|f| f.feature == Feature::Slot)
            .map(|f| &f.location)
    }
}

fn cavity(grid: &OccupancyGrid, side: (isize, isize), diagonal: (isize, isize)) -> Feature {
    if !grid.get(side.0, side.1) {
        Feature::EdgeCavity
    } else if grid.get(diagonal.0, diagonal.1) {
        Feature::CenterCavity
    } else {
        Feature::CornerCavity
    }
}

/// Decide the square and side features of every cell.
///
/// Cell `(i, j)` sits at `(20 i, 20 j)`. For side `n` (pointing along
/// [`DIRECTIONS`]`[n]`, rotated `90° · n`) an empty neighbor gets a slot.
/// An occupied neighbor gets two cavities: the plain one looks at the cell
/// on the side's local +Y (and the diagonal beyond it), the mirrored one at
/// the cell on its local -Y.
pub fn classify(grid: &OccupancyGrid) -> CavityLayout {
    let mut layout = CavityLayout::default();

    for (i, j) in grid.occupied() {
        let (i, j) = (i as isize, j as isize);
        if DIRECTIONS
            .iter()
            .all(|&(di, dj)| grid.get(i + di, j + dj))
        {
            continue;
        }

        let (x, y) = (CELL_SIZE * i as f64, CELL_SIZE * j as f64);
        layout.squares.push(GridLocation::at(x, y));

        for (n, &(di, dj)) in DIRECTIONS.iter().enumerate() {
            let location = GridLocation {
                x,
                y,
                angle: 90.0 * n as f64,
            };
            if !grid.get(i + di, j + dj) {
                layout.features.push(PlacedFeature {
                    feature: Feature::Slot,
                    mirrored: false,
                    location,
                });
                continue;
            }

            // Local +Y of direction n is direction n + 1.
            let (pi, pj) = DIRECTIONS[(n + 1) % 4];
            let plain = cavity(grid, (i + pi, j + pj), (i + di + pi, j + dj + pj));
            let mirrored = cavity(grid, (i - pi, j - pj), (i + di - pi, j + dj - pj));
            layout.features.push(PlacedFeature {
                feature: plain,
                mirrored: false,
                location,
            });
            layout.features.push(PlacedFeature {
                feature: mirrored,
                mirrored: true,
                location,
            });
        }
    }

    tracing::debug!(
        squares = layout.squares.len(),
        slots = layout.count(Feature::Slot),
        center = layout.count(Feature::CenterCavity),
        corner = layout.count(Feature::CornerCavity),
        edge = layout.count(Feature::EdgeCavity),
        "classified rail cross-section"
    );
    layout
}

/// 2D cross-section of a 2020 V-Slot rail of any cell layout.
#[derive(Debug, Clone, PartialEq)]
pub struct VSlot2020RailProfile {
    /// Cell occupancy.
    pub grid: OccupancyGrid,
    /// Bounding-box alignment; `None` keeps cell `(0, 0)` at the origin.
    pub align: Option<Align2D>,
}

impl VSlot2020RailProfile {
    /// Profile of an arbitrary grid.
    pub fn new(grid: OccupancyGrid) -> Self {
        Self { grid, align: None }
    }

    /// Box profile of `nx × ny` cells.
    pub fn box_profile(nx: usize, ny: usize) -> Result<Self, CadError> {
        Ok(Self::new(OccupancyGrid::filled(nx, ny)?))
    }

    /// C-beam profile (the classic one is 4 × 2).
    pub fn c_beam(nx: usize, ny: usize) -> Result<Self, CadError> {
        Ok(Self::new(OccupancyGrid::c_beam(nx, ny)?))
    }

    /// Set the alignment.
    pub fn with_align(mut self, align: Align2D) -> Self {
        self.align = Some(align);
        self
    }
}

fn place(sketch: &Sketch, location: &GridLocation) -> Sketch {
    sketch.rotate(location.angle).translate(location.x, location.y)
}

impl Profile for VSlot2020RailProfile {
    fn sketch(&self) -> Result<Sketch, CadError> {
        let layout = classify(&self.grid);

        let square = Sketch::rectangle(CELL_SIZE, CELL_SIZE)?;
        let hole = Sketch::circle(CENTER_HOLE_RADIUS)?;
        let squares: Vec<Sketch> = layout.squares.iter().map(|l| place(&square, l)).collect();
        let body = Sketch::union_all(&squares);

        let mut shapes = Vec::with_capacity(4);
        for feature in [
            Feature::Slot,
            Feature::CenterCavity,
            Feature::CornerCavity,
            Feature::EdgeCavity,
        ] {
            let plain = Sketch::polygon(&feature.outline())?;
            let mirrored = plain.mirrored_about_x();
            shapes.push((feature, plain, mirrored));
        }

        let mut cutters: Vec<Sketch> = layout.squares.iter().map(|l| place(&hole, l)).collect();
        for placed in &layout.features {
            if let Some((_, plain, mirrored)) = shapes.iter().find(|(f, _, _)| *f == placed.feature) {
                let shape = if placed.mirrored { mirrored } else { plain };
                cutters.push(place(shape, &placed.location));
            }
        }

        let profile = body.difference(&Sketch::union_all(&cutters));
        Ok(match self.align {
            Some(align) => align_sketch(&profile, align),
            None => profile,
        })
    }
}

fn align_sketch(sketch: &Sketch, align: Align2D) -> Sketch {
    let Some((min, max)) = sketch.bounds() else {
        return sketch.clone();
    };
    let [ax, ay] = align.axes();
    sketch.translate(ax.offset(min.x, max.x), ay.offset(min.y, max.y))
}

#[derive(Debug, Clone, PartialEq)]
enum RailLayout {
    Box(usize, usize),
    CBeam(usize, usize),
    Grid(OccupancyGrid),
}

/// A 2020 V-Slot rail: a rail profile extruded along +Z.
///
/// Joint `"A"` sits on the top face, joint `"B"` on the bottom face facing
/// down.
#[derive(Debug, Clone, PartialEq)]
pub struct VSlot2020Rail {
    /// Extrusion length.
    pub length: f64,
    layout: RailLayout,
}

impl VSlot2020Rail {
    /// Box rail of `nx × ny` cells.
    pub fn new(length: f64, num_x_rails: usize, num_y_rails: usize) -> Self {
        Self {
            length,
            layout: RailLayout::Box(num_x_rails, num_y_rails),
        }
    }

    /// C-beam rail.
    pub fn c_beam(length: f64, num_x_rails: usize, num_y_rails: usize) -> Self {
        Self {
            length,
            layout: RailLayout::CBeam(num_x_rails, num_y_rails),
        }
    }

    /// Rail with an arbitrary cell layout.
    pub fn from_grid(length: f64, grid: OccupancyGrid) -> Self {
        Self {
            length,
            layout: RailLayout::Grid(grid),
        }
    }

    /// Cell occupancy of the cross-section.
    pub fn grid(&self) -> Result<OccupancyGrid, CadError> {
        match &self.layout {
            RailLayout::Box(nx, ny) => OccupancyGrid::filled(*nx, *ny),
            RailLayout::CBeam(nx, ny) => OccupancyGrid::c_beam(*nx, *ny),
            RailLayout::Grid(grid) => Ok(grid.clone()),
        }
    }

    /// Cross-section profile.
    pub fn profile(&self) -> Result<VSlot2020RailProfile, CadError> {
        Ok(VSlot2020RailProfile::new(self.grid()?))
    }

    /// Slot openings on the outer faces, rotated to face outward.
    ///
    /// Useful for placing sliding T-nuts.
    pub fn slot_locations(&self) -> Result<Vec<GridLocation>, CadError> {
        array_polar_locations(
            CELL_SIZE,
            CELL_SIZE,
            &self.grid()?,
            None,
            true,
            CELL_SIZE / 2.0,
            true,
            Align2D::Uniform(Align::Min),
        )
    }

    fn extrude(&self, profile: VSlot2020RailProfile) -> Result<Solid, CadError> {
        positive("length", self.length)?;
        Ok(Solid::extrude(&profile.sketch()?, 0.0, self.length)?)
    }
}

impl Component for VSlot2020Rail {
    fn name(&self) -> &'static str {
        "VSlot2020Rail"
    }

    fn material(&self) -> Color {
        Color::Aluminum
    }

    fn solid(&self) -> Result<Solid, CadError> {
        self.extrude(self.profile()?)
    }

    fn joints(&self) -> Vec<Joint> {
        vec![
            Joint::new("A", Location::from_translation(0.0, 0.0, self.length)),
            Joint::new("B", Location::from_euler_degrees(180.0, 0.0, 0.0)),
        ]
    }
}

/// Centered rail variant without joints.
#[derive(Debug, Clone, PartialEq)]
pub struct VSlotRail(pub VSlot2020Rail);

impl VSlotRail {
    /// Centered profile of this rail.
    pub fn profile(&self) -> Result<VSlot2020RailProfile, CadError> {
        Ok(self.0.profile()?.with_align(Align2D::CENTER))
    }
}

impl Component for VSlotRail {
    fn name(&self) -> &'static str {
        "VSlotRail"
    }

    fn material(&self) -> Color {
        Color::Aluminum
    }

    fn solid(&self) -> Result<Solid, CadError> {
        self.0.extrude(self.profile()?)
    }

    fn default_align(&self) -> Option<Align3D> {
        Some(Align3D::CENTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vslot_kernel::{Vec3, CIRCLE_SEGMENTS};

    const SLOT_AREA: f64 = 53.613925;
    const EDGE_AREA: f64 = 38.664;
    const CENTER_AREA: f64 = 42.6759;

    fn hole_area() -> f64 {
        let n = CIRCLE_SEGMENTS as f64;
        0.5 * n * CENTER_HOLE_RADIUS.powi(2) * (std::f64::consts::TAU / n).sin()
    }

    fn grid(rows: &[&[u8]]) -> OccupancyGrid {
        let rows: Vec<Vec<bool>> = rows
            .iter()
            .map(|r| r.iter().map(|&c| c != 0).collect())
            .collect();
        OccupancyGrid::from_rows(&rows).unwrap()
    }

    #[test]
    fn single_cell_has_four_slots() {
        let layout = classify(&OccupancyGrid::filled(1, 1).unwrap());
        assert_eq!(layout.squares.len(), 1);
        assert_eq!(layout.count(Feature::Slot), 4);
        assert_eq!(layout.features.len(), 4);
        let angles: Vec<f64> = layout.slots().map(|l| l.angle).collect();
        assert_eq!(angles, [0.0, 90.0, 180.0, 270.0]);
    }

    #[test]
    fn one_by_two_has_edge_cavities() {
        let layout = classify(&OccupancyGrid::filled(1, 2).unwrap());
        assert_eq!(layout.count(Feature::Slot), 6);
        assert_eq!(layout.count(Feature::EdgeCavity), 4);
        assert_eq!(layout.count_mirrored(Feature::EdgeCavity), 2);
        assert_eq!(layout.count(Feature::CenterCavity), 0);
        assert_eq!(layout.count(Feature::CornerCavity), 0);
    }

    #[test]
    fn two_by_two_has_center_cavities() {
        let layout = classify(&OccupancyGrid::filled(2, 2).unwrap());
        assert_eq!(layout.squares.len(), 4);
        assert_eq!(layout.count(Feature::Slot), 8);
        assert_eq!(layout.count(Feature::EdgeCavity), 8);
        assert_eq!(layout.count(Feature::CenterCavity), 8);
        assert_eq!(layout.count_mirrored(Feature::CenterCavity), 4);
    }

    #[test]
    fn l_shape_has_corner_cavities() {
        let layout = classify(&grid(&[&[1, 1], &[1, 0]]));
        assert_eq!(layout.count(Feature::Slot), 8);
        assert_eq!(layout.count(Feature::EdgeCavity), 6);
        assert_eq!(layout.count(Feature::CornerCavity), 2);
        assert_eq!(layout.count_mirrored(Feature::CornerCavity), 1);
    }

    #[test]
    fn c_beam_classification() {
        let layout = classify(&OccupancyGrid::c_beam(4, 2).unwrap());
        assert_eq!(layout.squares.len(), 6);
        assert_eq!(layout.count(Feature::Slot), 14);
        assert_eq!(layout.count(Feature::EdgeCavity), 16);
        assert_eq!(layout.count(Feature::CornerCavity), 4);
        assert_eq!(layout.count(Feature::CenterCavity), 0);
    }

    #[test]
    fn enclosed_cell_is_hollow() {
        let layout = classify(&OccupancyGrid::filled(3, 3).unwrap());
        assert_eq!(layout.squares.len(), 8);
        assert!(!layout.squares.contains(&GridLocation::at(20.0, 20.0)));
        assert_eq!(layout.count(Feature::Slot), 12);
        assert_eq!(layout.count(Feature::CenterCavity), 24);
        assert_eq!(layout.count(Feature::EdgeCavity), 16);
    }

    #[test]
    fn slots_match_open_polar_locations() {
        let g = OccupancyGrid::c_beam(4, 2).unwrap();
        let layout = classify(&g);
        let open = array_polar_locations(
            CELL_SIZE,
            CELL_SIZE,
            &g,
            None,
            true,
            0.0,
            true,
            Align2D::Uniform(Align::Min),
        )
        .unwrap();
        let slots: Vec<GridLocation> = layout.slots().copied().collect();
        assert_eq!(slots, open);
    }

    #[test]
    fn feature_outlines_have_expected_area() {
        let area = |f: Feature| Sketch::polygon(&f.outline()).unwrap().area();
        assert_relative_eq!(area(Feature::Slot), SLOT_AREA, epsilon = 1e-9);
        assert_relative_eq!(area(Feature::EdgeCavity), EDGE_AREA, epsilon = 1e-9);
        assert_relative_eq!(area(Feature::CornerCavity), 35.6552, epsilon = 1e-9);
        assert_relative_eq!(area(Feature::CenterCavity), CENTER_AREA, epsilon = 1e-9);
    }

    #[test]
    fn single_profile_area() {
        let sketch = VSlot2020RailProfile::box_profile(1, 1)
            .unwrap()
            .sketch()
            .unwrap();
        let expected = 400.0 - hole_area() - 4.0 * SLOT_AREA;
        assert_relative_eq!(sketch.area(), expected, epsilon = 1e-2);
        assert_eq!(sketch.polygon_count(), 1);
        assert_eq!(sketch.hole_count(), 1);
        let (min, max) = sketch.bounds().unwrap();
        assert_relative_eq!(min, Point2::new(-10.0, -10.0), epsilon = 1e-6);
        assert_relative_eq!(max, Point2::new(10.0, 10.0), epsilon = 1e-6);
    }

    #[test]
    fn multi_cell_profile_areas() {
        let one_by_two = VSlot2020RailProfile::box_profile(1, 2)
            .unwrap()
            .sketch()
            .unwrap();
        let expected = 800.0 - 2.0 * hole_area() - 6.0 * SLOT_AREA - 4.0 * EDGE_AREA;
        assert_relative_eq!(one_by_two.area(), expected, epsilon = 2e-2);

        let two_by_two = VSlot2020RailProfile::box_profile(2, 2)
            .unwrap()
            .sketch()
            .unwrap();
        let expected =
            1600.0 - 4.0 * hole_area() - 8.0 * SLOT_AREA - 8.0 * EDGE_AREA - 8.0 * CENTER_AREA;
        assert_relative_eq!(two_by_two.area(), expected, epsilon = 5e-2);
    }

    #[test]
    fn centered_profile() {
        let sketch = VSlot2020RailProfile::c_beam(4, 2)
            .unwrap()
            .with_align(Align2D::CENTER)
            .sketch()
            .unwrap();
        let (min, max) = sketch.bounds().unwrap();
        assert_relative_eq!(min, Point2::new(-40.0, -20.0), epsilon = 1e-6);
        assert_relative_eq!(max, Point2::new(40.0, 20.0), epsilon = 1e-6);
    }

    #[test]
    fn rail_volume_and_joints() {
        let rail = VSlot2020Rail::new(100.0, 1, 1);
        let part = rail.build().unwrap();
        let area = rail.profile().unwrap().sketch().unwrap().area();
        assert_relative_eq!(part.volume(), area * 100.0, epsilon = 1e-6);

        let (min, max) = part.bounding_box();
        assert!((max[2] - 100.0).abs() < 1e-9 && min[2].abs() < 1e-9);

        let a = part.joint("A").unwrap();
        assert_eq!(a.location.translation(), Vec3::new(0.0, 0.0, 100.0));
        let b = part.joint("B").unwrap();
        let down = b.location.transform_vector(&Vec3::z());
        assert!((down - Vec3::new(0.0, 0.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn centered_rail_has_no_joints() {
        let part = VSlotRail(VSlot2020Rail::new(50.0, 2, 1)).build().unwrap();
        assert!(part.joints().is_empty());
        let (min, max) = part.bounding_box();
        for k in 0..3 {
            assert!((min[k] + max[k]).abs() < 1e-6, "axis {k} not centered");
        }
        assert!((max[0] - 20.0).abs() < 1e-6);
        assert!((max[2] - 25.0).abs() < 1e-6);
    }

    #[test]
    fn rail_slot_locations_face_outward() {
        let locs = VSlot2020Rail::new(10.0, 1, 1).slot_locations().unwrap();
        assert_eq!(locs.len(), 4);
        assert!(locs.contains(&GridLocation {
            x: 10.0,
            y: 0.0,
            angle: 0.0
        }));
        assert!(locs.contains(&GridLocation {
            x: 0.0,
            y: -10.0,
            angle: 270.0
        }));
    }

    #[test]
    fn invalid_rails() {
        assert!(matches!(
            VSlot2020Rail::new(0.0, 1, 1).build(),
            Err(CadError::InvalidParameter { name: "length", .. })
        ));
        assert!(matches!(
            VSlot2020Rail::new(f64::INFINITY, 1, 1).build(),
            Err(CadError::InvalidParameter { name: "length", .. })
        ));
        assert!(matches!(
            VSlot2020Rail::new(10.0, 0, 1).build(),
            Err(CadError::GridShape(_))
        ));
    }
}
