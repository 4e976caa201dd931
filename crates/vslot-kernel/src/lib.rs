#![warn(missing_docs)]

//! Geometry kernel for vslot parts.
//!
//! Parts are modeled the way they are drawn: a planar [`Sketch`] (polygons
//! with holes, combined with 2D booleans) is turned into a [`Solid`] by
//! extruding it along Z, lofting it into a second sketch, or revolving an
//! (r, z) section about the Z axis. Solids are compounds of closed,
//! outward-oriented triangle shells and can be queried for volume, area and
//! bounds, transformed by a [`Location`], and flattened into a
//! [`TriangleMesh`] for export.
//!
//! There is no 3D boolean solver. Holes and cavities are cut in the sketch
//! before the sketch becomes a solid.

mod math;
mod mesh;
mod sketch;
mod solid;

pub use math::{Location, Point2, Point3, Vec3};
pub use mesh::TriangleMesh;
pub use sketch::{circle_points, mirrored_polyline, rounded_outline, Sketch};
pub use solid::{Aabb, Shell, Solid};

use thiserror::Error;

/// Number of segments used to approximate a full circle.
pub const CIRCLE_SEGMENTS: usize = 64;

/// Number of segments used to approximate a quarter-circle corner fillet.
pub const ARC_SEGMENTS: usize = 8;

/// Errors from sketch and solid construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    /// The sketch has no area.
    #[error("sketch is empty")]
    EmptySketch,

    /// An outline has too few distinct points or zero area.
    #[error("degenerate outline: {0}")]
    Degenerate(String),

    /// A dimension is non-positive or otherwise out of range.
    #[error("invalid {name}: {value}")]
    InvalidDimension {
        /// Dimension name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// The two sketches of a loft do not have the same ring structure.
    #[error("loft sketches do not match: {0}")]
    LoftMismatch(String),

    /// A revolve section touches or crosses the axis.
    #[error("revolve section touches the axis")]
    AxisIntersection,
}

/// Result alias for kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;

pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(KernelError::InvalidDimension { name, value })
    }
}
