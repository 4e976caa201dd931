//! Closed triangle shells built from sketches.

use geo::{Area, Polygon, TriangulateEarcut};

use crate::mesh::TriangleMesh;
use crate::sketch::open_ring;
use crate::{positive, KernelError, Location, Point2, Point3, Result, Sketch, Vec3};

/// A closed, outward-oriented triangle surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shell {
    /// Triangles, counter-clockwise when seen from outside.
    pub triangles: Vec<[Point3; 3]>,
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb {
    /// Extent along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Center point.
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }
}

/// A solid body: a compound of closed shells.
///
/// Shells of a compound may touch on faces but never overlap, so volumes
/// and areas simply add up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solid {
    shells: Vec<Shell>,
}

impl Solid {
    /// A solid with no shells.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Extrude a sketch along +Z from `z0` to `z1`.
    pub fn extrude(sketch: &Sketch, z0: f64, z1: f64) -> Result<Self> {
        Self::loft(sketch, sketch, z0, z1)
    }

    /// Ruled solid between `bottom` at `z0` and `top` at `z1`.
    ///
    /// Both sketches must have the same polygons, holes and vertex counts;
    /// vertex `k` of a bottom ring is joined to vertex `k` of the matching
    /// top ring.
    pub fn loft(bottom: &Sketch, top: &Sketch, z0: f64, z1: f64) -> Result<Self> {
        if bottom.is_empty() || top.is_empty() {
            return Err(KernelError::EmptySketch);
        }
        positive("height", z1 - z0)?;
        if bottom.polygon_count() != top.polygon_count() {
            return Err(KernelError::LoftMismatch(format!(
                "{} polygons at the bottom, {} at the top",
                bottom.polygon_count(),
                top.polygon_count()
            )));
        }

        let mut shells = Vec::with_capacity(bottom.polygon_count());
        for (lower, upper) in bottom.polygons().iter().zip(top.polygons()) {
            let lower_rings = rings_of(lower);
            let upper_rings = rings_of(upper);
            if lower_rings.len() != upper_rings.len()
                || lower_rings
                    .iter()
                    .zip(&upper_rings)
                    .any(|(a, b)| a.len() != b.len())
            {
                return Err(KernelError::LoftMismatch(
                    "rings differ between bottom and top".to_string(),
                ));
            }

            let mut triangles = Vec::new();
            for (a, b) in lower_rings.iter().zip(&upper_rings) {
                let n = a.len();
                for k in 0..n {
                    let a0 = lift(a[k], z0);
                    let a1 = lift(a[(k + 1) % n], z0);
                    let b0 = lift(b[k], z1);
                    let b1 = lift(b[(k + 1) % n], z1);
                    triangles.push([a0, a1, b1]);
                    triangles.push([a0, b1, b0]);
                }
            }
            cap(lower, z0, false, &mut triangles);
            cap(upper, z1, true, &mut triangles);
            shells.push(Shell { triangles });
        }
        Ok(Self { shells })
    }

    /// Revolve a closed `(r, z)` section a full turn about the Z axis.
    ///
    /// Every point must have `r > 0`.
    pub fn revolve(section: &[Point2], segments: usize) -> Result<Self> {
        let mut points: Vec<Point2> = Vec::with_capacity(section.len());
        for p in section {
            if points.last() != Some(p) {
                points.push(*p);
            }
        }
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            return Err(KernelError::Degenerate(
                "revolve section needs three points".to_string(),
            ));
        }
        if points.iter().any(|p| p.x <= 0.0) {
            return Err(KernelError::AxisIntersection);
        }
        if segments < 3 {
            return Err(KernelError::InvalidDimension {
                name: "segments",
                value: segments as f64,
            });
        }
        let area = signed_area(&points);
        if area.abs() <= f64::EPSILON {
            return Err(KernelError::Degenerate(
                "revolve section has no area".to_string(),
            ));
        }
        if area < 0.0 {
            points.reverse();
        }

        let angles: Vec<(f64, f64)> = (0..segments)
            .map(|i| (std::f64::consts::TAU * i as f64 / segments as f64).sin_cos())
            .collect();
        let at = |p: Point2, i: usize| {
            let (s, c) = angles[i % segments];
            Point3::new(p.x * c, p.x * s, p.y)
        };

        let n = points.len();
        let mut triangles = Vec::with_capacity(2 * n * segments);
        for k in 0..n {
            let a = points[k];
            let b = points[(k + 1) % n];
            for i in 0..segments {
                let (a0, a1) = (at(a, i), at(a, i + 1));
                let (b0, b1) = (at(b, i), at(b, i + 1));
                triangles.push([a0, a1, b1]);
                triangles.push([a0, b1, b0]);
            }
        }
        Ok(Self {
            shells: vec![Shell { triangles }],
        })
    }

    /// Compound of both solids.
    pub fn union(mut self, other: Solid) -> Solid {
        self.shells.extend(other.shells);
        self
    }

    /// Compound of many solids.
    pub fn compound(solids: impl IntoIterator<Item = Solid>) -> Solid {
        solids.into_iter().fold(Solid::empty(), Solid::union)
    }

    /// Copy moved by a rigid placement.
    pub fn transformed(&self, location: &Location) -> Solid {
        Solid {
            shells: self
                .shells
                .iter()
                .map(|shell| Shell {
                    triangles: shell
                        .triangles
                        .iter()
                        .map(|t| t.map(|p| location.transform_point(&p)))
                        .collect(),
                })
                .collect(),
        }
    }

    /// Copy shifted by `(x, y, z)`.
    pub fn translate(&self, x: f64, y: f64, z: f64) -> Solid {
        self.transformed(&Location::from_translation(x, y, z))
    }

    /// The shells of this compound.
    pub fn shells(&self) -> &[Shell] {
        &self.shells
    }

    /// Whether the solid has no triangles.
    pub fn is_empty(&self) -> bool {
        self.shells.iter().all(|s| s.triangles.is_empty())
    }

    /// Total triangle count.
    pub fn num_triangles(&self) -> usize {
        self.shells.iter().map(|s| s.triangles.len()).sum()
    }

    fn triangles(&self) -> impl Iterator<Item = &[Point3; 3]> {
        self.shells.iter().flat_map(|s| s.triangles.iter())
    }

    /// Enclosed volume (divergence theorem).
    pub fn volume(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)))
            .sum::<f64>()
            / 6.0
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| (b - a).cross(&(c - a)).norm() / 2.0)
            .sum()
    }

    /// Bounding box, `None` for an empty solid.
    pub fn bounding_box(&self) -> Option<Aabb> {
        let mut points = self.triangles().flat_map(|t| t.iter());
        let first = *points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        });
        Some(Aabb { min, max })
    }

    /// Volume centroid, `None` for a solid without volume.
    pub fn center_of_mass(&self) -> Option<Point3> {
        let mut weighted = Vec3::zeros();
        let mut total = 0.0;
        for [a, b, c] in self.triangles() {
            let v = a.coords.dot(&b.coords.cross(&c.coords)) / 6.0;
            weighted += (a.coords + b.coords + c.coords) / 4.0 * v;
            total += v;
        }
        if total.abs() <= f64::EPSILON {
            return None;
        }
        Some(Point3::from(weighted / total))
    }

    /// Flat-shaded triangle mesh of all shells.
    pub fn to_mesh(&self) -> TriangleMesh {
        let mut mesh = TriangleMesh::new();
        for t in self.triangles() {
            mesh.push_triangle(t);
        }
        mesh
    }
}

fn lift(p: Point2, z: f64) -> Point3 {
    Point3::new(p.x, p.y, z)
}

fn rings_of(polygon: &Polygon<f64>) -> Vec<Vec<Point2>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(open_ring)
        .collect()
}

fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|k| {
            let (a, b) = (points[k], points[(k + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        / 2.0
}

/// Triangulate a polygon into a horizontal cap facing +Z (`up`) or -Z.
fn cap(polygon: &Polygon<f64>, z: f64, up: bool, out: &mut Vec<[Point3; 3]>) {
    for tri in polygon.earcut_triangles() {
        let [a, b, c] = [tri.v1(), tri.v2(), tri.v3()].map(|q| Point3::new(q.x, q.y, z));
        let ccw = tri.signed_area() > 0.0;
        if ccw == up {
            out.push([a, b, c]);
        } else {
            out.push([a, c, b]);
        }
    }
}
