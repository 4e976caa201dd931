//! Planar regions.

use std::f64::consts::{FRAC_PI_2, PI};

use geo::algorithm::orient::{Direction, Orient};
use geo::{Area, BooleanOps, BoundingRect, Coord, LineString, MapCoords, MultiPolygon, Polygon};

use crate::{positive, KernelError, Point2, Result, CIRCLE_SEGMENTS};

/// A planar region: a set of polygons with holes.
///
/// Exteriors are kept counter-clockwise and holes clockwise, so an
/// extruded sketch always yields outward-facing shells.
#[derive(Debug, Clone, PartialEq)]
pub struct Sketch {
    region: MultiPolygon<f64>,
}

impl Default for Sketch {
    fn default() -> Self {
        Self {
            region: MultiPolygon::new(Vec::new()),
        }
    }
}

impl Sketch {
    /// A sketch with no area.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A simple polygon from its outline (either winding).
    pub fn polygon(points: &[Point2]) -> Result<Self> {
        Self::with_holes(points, &[])
    }

    /// A polygon with holes, taken as is (no boolean).
    ///
    /// Holes must lie inside the exterior and must not overlap.
    pub fn with_holes(exterior: &[Point2], holes: &[Vec<Point2>]) -> Result<Self> {
        let exterior = ring(exterior)?;
        let interiors = holes.iter().map(|h| ring(h)).collect::<Result<Vec<_>>>()?;
        Ok(Self::from_region(MultiPolygon::new(vec![Polygon::new(
            exterior, interiors,
        )])))
    }

    /// A `width` × `height` rectangle centered on the origin.
    pub fn rectangle(width: f64, height: f64) -> Result<Self> {
        Self::polygon(&rounded_outline(width, height, [0.0; 4], [0; 4])?)
    }

    /// A centered rectangle with all four corners rounded by `radius`.
    pub fn rounded_rectangle(width: f64, height: f64, radius: f64) -> Result<Self> {
        let segments = if radius > 0.0 { crate::ARC_SEGMENTS } else { 0 };
        Self::polygon(&rounded_outline(
            width,
            height,
            [radius; 4],
            [segments; 4],
        )?)
    }

    /// A circle of `radius` centered on the origin.
    pub fn circle(radius: f64) -> Result<Self> {
        positive("radius", radius)?;
        Self::polygon(&circle_points(Point2::origin(), radius, CIRCLE_SEGMENTS))
    }

    fn from_region(region: MultiPolygon<f64>) -> Self {
        Self {
            region: region.orient(Direction::Default),
        }
    }

    /// Region covered by either sketch.
    pub fn union(&self, other: &Sketch) -> Sketch {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        Self::from_region(self.region.union(&other.region))
    }

    /// Region of `self` not covered by `other`.
    pub fn difference(&self, other: &Sketch) -> Sketch {
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }
        Self::from_region(self.region.difference(&other.region))
    }

    /// Union of many sketches.
    ///
    /// Folded pairwise: the boolean engine uses the even-odd rule, so
    /// overlapping pieces must never share one multipolygon.
    pub fn union_all<'a>(sketches: impl IntoIterator<Item = &'a Sketch>) -> Sketch {
        sketches
            .into_iter()
            .fold(Sketch::empty(), |acc, s| acc.union(s))
    }

    /// Shifted copy.
    pub fn translate(&self, dx: f64, dy: f64) -> Sketch {
        Self {
            region: self.region.map_coords(|Coord { x, y }| Coord {
                x: x + dx,
                y: y + dy,
            }),
        }
    }

    /// Copy rotated counter-clockwise about the origin.
    pub fn rotate(&self, degrees: f64) -> Sketch {
        let (s, c) = sin_cos_degrees(degrees);
        Self {
            region: self.region.map_coords(|Coord { x, y }| Coord {
                x: c * x - s * y,
                y: s * x + c * y,
            }),
        }
    }

    /// Copy mirrored about the X axis (`y → -y`).
    pub fn mirrored_about_x(&self) -> Sketch {
        Self::from_region(
            self.region
                .map_coords(|Coord { x, y }| Coord { x, y: -y }),
        )
    }

    /// Copy moved so its bounding box is centered on the origin.
    pub fn centered(&self) -> Sketch {
        match self.bounds() {
            Some((min, max)) => self.translate(-(min.x + max.x) / 2.0, -(min.y + max.y) / 2.0),
            None => self.clone(),
        }
    }

    /// Enclosed area (holes subtracted).
    pub fn area(&self) -> f64 {
        self.region.unsigned_area()
    }

    /// Axis-aligned bounds as `(min, max)`, `None` when empty.
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        self.region.bounding_rect().map(|r| {
            (
                Point2::new(r.min().x, r.min().y),
                Point2::new(r.max().x, r.max().y),
            )
        })
    }

    /// Whether the sketch covers nothing.
    pub fn is_empty(&self) -> bool {
        self.region.0.is_empty()
    }

    /// The polygons making up the region.
    pub fn polygons(&self) -> &[Polygon<f64>] {
        &self.region.0
    }

    /// Number of disjoint polygons.
    pub fn polygon_count(&self) -> usize {
        self.region.0.len()
    }

    /// Total number of holes over all polygons.
    pub fn hole_count(&self) -> usize {
        self.region.0.iter().map(|p| p.interiors().len()).sum()
    }

    /// Every boundary ring (exteriors and holes) as open point lists.
    pub fn rings(&self) -> Vec<Vec<Point2>> {
        self.region
            .0
            .iter()
            .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors()))
            .map(open_ring)
            .collect()
    }
}

/// Ring points without the closing duplicate.
pub(crate) fn open_ring(ls: &LineString<f64>) -> Vec<Point2> {
    let mut points: Vec<Point2> = ls.coords().map(|c| Point2::new(c.x, c.y)).collect();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

fn ring(points: &[Point2]) -> Result<LineString<f64>> {
    let ls = LineString::from(points.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>());
    let poly = Polygon::new(ls, vec![]);
    if points.len() < 3 || poly.unsigned_area() <= f64::EPSILON {
        return Err(KernelError::Degenerate(format!(
            "ring of {} points has no area",
            points.len()
        )));
    }
    let (exterior, _) = poly.into_inner();
    Ok(exterior)
}

/// Sine and cosine of an angle in degrees, exact on quarter turns.
fn sin_cos_degrees(degrees: f64) -> (f64, f64) {
    let quarters = degrees / 90.0;
    if (quarters - quarters.round()).abs() < 1e-12 {
        match (quarters.round() as i64).rem_euclid(4) {
            0 => (0.0, 1.0),
            1 => (1.0, 0.0),
            2 => (0.0, -1.0),
            _ => (-1.0, 0.0),
        }
    } else {
        degrees.to_radians().sin_cos()
    }
}

/// `segments` points on a circle, counter-clockwise from the +X axis.
pub fn circle_points(center: Point2, radius: f64, segments: usize) -> Vec<Point2> {
    (0..segments)
        .map(|i| {
            let a = 2.0 * PI * i as f64 / segments as f64;
            Point2::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect()
}

/// Counter-clockwise outline of a centered rectangle with rounded corners.
///
/// Corners are ordered bottom-left, bottom-right, top-right, top-left. A
/// corner with `segments == 0` is sharp; otherwise it is a quarter arc of
/// `segments + 1` points, even when its radius is zero. Two outlines built
/// with the same `segments` therefore have the same vertex count and can be
/// lofted into each other.
pub fn rounded_outline(
    width: f64,
    height: f64,
    radii: [f64; 4],
    segments: [usize; 4],
) -> Result<Vec<Point2>> {
    positive("width", width)?;
    positive("height", height)?;
    let (hw, hh) = (width / 2.0, height / 2.0);
    for r in radii {
        if r < 0.0 || r > hw.min(hh) {
            return Err(KernelError::InvalidDimension {
                name: "corner radius",
                value: r,
            });
        }
    }

    // Corner position and the angle at which its arc starts.
    let corners = [
        (Point2::new(-hw, -hh), Point2::new(1.0, 1.0), PI),
        (Point2::new(hw, -hh), Point2::new(-1.0, 1.0), 3.0 * FRAC_PI_2),
        (Point2::new(hw, hh), Point2::new(-1.0, -1.0), 0.0),
        (Point2::new(-hw, hh), Point2::new(1.0, -1.0), FRAC_PI_2),
    ];

    let mut points = Vec::new();
    for (k, (corner, inward, start)) in corners.into_iter().enumerate() {
        let n = segments[k];
        if n == 0 {
            points.push(corner);
            continue;
        }
        let r = radii[k];
        let center = Point2::new(corner.x + inward.x * r, corner.y + inward.y * r);
        for i in 0..=n {
            let a = start + FRAC_PI_2 * i as f64 / n as f64;
            points.push(Point2::new(center.x + r * a.cos(), center.y + r * a.sin()));
        }
    }
    Ok(points)
}

/// Close a half outline drawn above the X axis by appending its mirror
/// image in reverse.
///
/// Endpoints lying on the axis are not duplicated.
pub fn mirrored_polyline(half: &[Point2]) -> Vec<Point2> {
    let mut points = half.to_vec();
    let mirrored = half
        .iter()
        .rev()
        .filter(|p| p.y.abs() > 1e-12)
        .map(|p| Point2::new(p.x, -p.y));
    points.extend(mirrored);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn rectangle_area_and_bounds() {
        let s = Sketch::rectangle(40.0, 20.0).unwrap();
        assert_relative_eq!(s.area(), 800.0, epsilon = 1e-9);
        let (min, max) = s.bounds().unwrap();
        assert_relative_eq!(min, p(-20.0, -10.0));
        assert_relative_eq!(max, p(20.0, 10.0));
    }

    #[test]
    fn circle_area_is_polygonal() {
        let s = Sketch::circle(2.1).unwrap();
        let n = CIRCLE_SEGMENTS as f64;
        let expected = 0.5 * n * 2.1 * 2.1 * (2.0 * PI / n).sin();
        assert_relative_eq!(s.area(), expected, epsilon = 1e-9);
    }

    #[test]
    fn difference_cuts_a_hole() {
        let square = Sketch::rectangle(20.0, 20.0).unwrap();
        let hole = Sketch::circle(2.0).unwrap();
        let cut = square.difference(&hole);
        assert_eq!(cut.polygon_count(), 1);
        assert_eq!(cut.hole_count(), 1);
        assert_relative_eq!(cut.area(), 400.0 - hole.area(), epsilon = 1e-3);
    }

    #[test]
    fn union_all_merges_overlaps() {
        let a = Sketch::rectangle(20.0, 20.0).unwrap();
        let b = a.translate(10.0, 0.0);
        let c = a.translate(20.0, 0.0);
        let merged = Sketch::union_all([&a, &b, &c]);
        assert_eq!(merged.polygon_count(), 1);
        assert_relative_eq!(merged.area(), 800.0, epsilon = 1e-3);
    }

    #[test]
    fn quarter_turn_is_exact() {
        let s = Sketch::polygon(&[p(1.0, 0.0), p(3.0, 0.0), p(3.0, 1.0)]).unwrap();
        let (min, max) = s.rotate(90.0).bounds().unwrap();
        assert_eq!(min, p(-1.0, 1.0));
        assert_eq!(max, p(0.0, 3.0));
    }

    #[test]
    fn mirror_keeps_area_and_winding() {
        let s = Sketch::polygon(&[p(0.0, 0.0), p(4.0, 0.0), p(0.0, 3.0)]).unwrap();
        let m = s.mirrored_about_x();
        assert_relative_eq!(m.area(), 6.0, epsilon = 1e-12);
        assert!(m.polygons()[0].signed_area() > 0.0);
        let (min, _) = m.bounds().unwrap();
        assert_eq!(min.y, -3.0);
    }

    #[test]
    fn clockwise_input_is_reoriented() {
        let s = Sketch::polygon(&[p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)]).unwrap();
        assert!(s.polygons()[0].signed_area() > 0.0);
    }

    #[test]
    fn holes_are_clockwise() {
        let outer = rounded_outline(20.0, 20.0, [0.0; 4], [0; 4]).unwrap();
        let hole = circle_points(p(0.0, 0.0), 2.0, 16);
        let s = Sketch::with_holes(&outer, &[hole]).unwrap();
        let hole_ring = &s.polygons()[0].interiors()[0];
        let hole_poly = Polygon::new(hole_ring.clone(), vec![]);
        assert!(hole_poly.signed_area() < 0.0);
    }

    #[test]
    fn rounded_outline_counts() {
        let sharp = rounded_outline(10.0, 10.0, [0.0; 4], [0; 4]).unwrap();
        assert_eq!(sharp.len(), 4);
        let rounded = rounded_outline(10.0, 10.0, [1.0, 0.0, 2.0, 2.0], [4; 4]).unwrap();
        assert_eq!(rounded.len(), 20);
        assert!(rounded_outline(10.0, 10.0, [6.0; 4], [4; 4]).is_err());
    }

    #[test]
    fn rounded_rectangle_area() {
        let s = Sketch::rounded_rectangle(20.0, 10.0, 2.0).unwrap();
        let full = 200.0 - (4.0 - PI) * 4.0;
        // Inscribed arcs lose a little area.
        assert!(s.area() < full && s.area() > full - 0.2);
    }

    #[test]
    fn mirrored_polyline_skips_axis_points() {
        let half = [p(0.0, 0.0), p(1.0, 1.0), p(2.0, 0.0)];
        let full = mirrored_polyline(&half);
        assert_eq!(
            full,
            vec![p(0.0, 0.0), p(1.0, 1.0), p(2.0, 0.0), p(1.0, -1.0)]
        );

        let half = [p(0.0, 1.0), p(2.0, 1.0)];
        let full = mirrored_polyline(&half);
        assert_eq!(full.len(), 4);
        assert_eq!(full[3], p(0.0, -1.0));
    }

    #[test]
    fn degenerate_rings_are_rejected() {
        assert!(Sketch::polygon(&[p(0.0, 0.0), p(1.0, 1.0)]).is_err());
        assert!(Sketch::polygon(&[p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0)]).is_err());
        assert!(Sketch::circle(0.0).is_err());
    }
}
