//! Points, vectors and rigid placements.

use std::ops::Mul;

use nalgebra::{Isometry3, Translation3, UnitQuaternion};

/// 2D point in sketch coordinates.
pub type Point2 = nalgebra::Point2<f64>;
/// 3D point in model space.
pub type Point3 = nalgebra::Point3<f64>;
/// 3D vector.
pub type Vec3 = nalgebra::Vector3<f64>;

/// A rigid placement: rotation followed by translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    iso: Isometry3<f64>,
}

impl Default for Location {
    fn default() -> Self {
        Self::identity()
    }
}

impl Location {
    /// The identity placement.
    pub fn identity() -> Self {
        Self {
            iso: Isometry3::identity(),
        }
    }

    /// Pure translation.
    pub fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            iso: Isometry3::from_parts(Translation3::new(x, y, z), UnitQuaternion::identity()),
        }
    }

    /// Pure rotation from Euler angles in degrees, applied about X, then Y,
    /// then Z (fixed axes).
    pub fn from_euler_degrees(x: f64, y: f64, z: f64) -> Self {
        let rotation =
            UnitQuaternion::from_euler_angles(x.to_radians(), y.to_radians(), z.to_radians());
        Self {
            iso: Isometry3::from_parts(Translation3::identity(), rotation),
        }
    }

    /// Rotation (Euler degrees, X then Y then Z) followed by a translation.
    pub fn new(translation: Vec3, rotation_degrees: [f64; 3]) -> Self {
        let [rx, ry, rz] = rotation_degrees;
        Self::from_translation(translation.x, translation.y, translation.z)
            * Self::from_euler_degrees(rx, ry, rz)
    }

    /// The underlying isometry.
    pub fn isometry(&self) -> &Isometry3<f64> {
        &self.iso
    }

    /// Translation part.
    pub fn translation(&self) -> Vec3 {
        self.iso.translation.vector
    }

    /// Inverse placement.
    pub fn inverse(&self) -> Self {
        Self {
            iso: self.iso.inverse(),
        }
    }

    /// Map a point.
    pub fn transform_point(&self, p: &Point3) -> Point3 {
        self.iso.transform_point(p)
    }

    /// Map a direction (rotation only).
    pub fn transform_vector(&self, v: &Vec3) -> Vec3 {
        self.iso.transform_vector(v)
    }
}

impl Mul for Location {
    type Output = Location;

    /// `a * b` applies `b` first, then `a`.
    fn mul(self, rhs: Location) -> Location {
        Location {
            iso: self.iso * rhs.iso,
        }
    }
}
