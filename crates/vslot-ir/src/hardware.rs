//! Fastener sizes.

use serde::{Deserialize, Serialize};

/// Clearance added to a bolt's nominal radius when cutting a hole for it.
pub const HOLE_TOLERANCE: f64 = 0.05;

/// Standard metric bolt sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoltSize {
    /// M3, 1.5 mm radius.
    M3,
    /// M4, 2.0 mm radius.
    M4,
    /// M5, 2.5 mm radius.
    M5,
    /// M6, 3.0 mm radius.
    ///
    /// Its clearance hole is wider than the wedge of a 2020 sliding T-nut,
    /// so T-nuts take at most M5.
    M6,
}

impl BoltSize {
    /// Nominal radius in millimeters.
    pub fn radius(self) -> f64 {
        match self {
            BoltSize::M3 => 1.5,
            BoltSize::M4 => 2.0,
            BoltSize::M5 => 2.5,
            BoltSize::M6 => 3.0,
        }
    }

    /// Radius of a clearance hole for this bolt.
    pub fn clearance_radius(self) -> f64 {
        self.radius() + HOLE_TOLERANCE
    }
}

/// A hole radius given either as a bolt size or as a raw radius.
///
/// In YAML both `hole_radius: M5` and `hole_radius: 2.6` are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HoleRadius {
    /// Clearance hole for a standard bolt (nominal radius + [`HOLE_TOLERANCE`]).
    Bolt(BoltSize),
    /// Exact radius in millimeters, used as is.
    Radius(f64),
}

impl HoleRadius {
    /// The radius to cut, in millimeters.
    pub fn resolve(self) -> f64 {
        match self {
            HoleRadius::Bolt(size) => size.clearance_radius(),
            HoleRadius::Radius(radius) => radius,
        }
    }
}

impl From<BoltSize> for HoleRadius {
    fn from(size: BoltSize) -> Self {
        HoleRadius::Bolt(size)
    }
}

impl From<f64> for HoleRadius {
    fn from(radius: f64) -> Self {
        HoleRadius::Radius(radius)
    }
}
