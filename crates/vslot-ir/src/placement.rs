//! Alignment and rotation applied to a part after it is built.

use serde::{Deserialize, Serialize};

/// Where the origin sits relative to an object's bounding box on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Origin at the minimum of the bounding box.
    #[serde(alias = "MIN")]
    Min,
    /// Origin at the center of the bounding box.
    #[serde(alias = "CENTER")]
    Center,
    /// Origin at the maximum of the bounding box.
    #[serde(alias = "MAX")]
    Max,
}

impl Align {
    /// Offset that moves the `[min, max]` interval so the origin lands on
    /// the requested side.
    pub fn offset(self, min: f64, max: f64) -> f64 {
        match self {
            Align::Min => -min,
            Align::Center => -(min + max) / 2.0,
            Align::Max => -max,
        }
    }
}

/// Alignment of a sketch: one mode for both axes or one per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Align2D {
    /// Same mode on X and Y.
    Uniform(Align),
    /// `[x, y]` modes.
    PerAxis([Align; 2]),
}

impl Align2D {
    /// Both axes centered.
    pub const CENTER: Align2D = Align2D::Uniform(Align::Center);

    /// Mode per axis.
    pub fn axes(self) -> [Align; 2] {
        match self {
            Align2D::Uniform(a) => [a, a],
            Align2D::PerAxis(axes) => axes,
        }
    }
}

/// Alignment of a part: one mode for all axes or one per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Align3D {
    /// Same mode on X, Y and Z.
    Uniform(Align),
    /// `[x, y, z]` modes.
    PerAxis([Align; 3]),
}

impl Align3D {
    /// All axes centered.
    pub const CENTER: Align3D = Align3D::Uniform(Align::Center);

    /// Mode per axis.
    pub fn axes(self) -> [Align; 3] {
        match self {
            Align3D::Uniform(a) => [a, a, a],
            Align3D::PerAxis(axes) => axes,
        }
    }
}

/// Euler rotation in degrees, applied about X, then Y, then Z.
///
/// Serialized as a `[x, y, z]` triple.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Rotation {
    /// Rotation about X in degrees.
    pub x: f64,
    /// Rotation about Y in degrees.
    pub y: f64,
    /// Rotation about Z in degrees.
    pub z: f64,
}

impl Rotation {
    /// Create a rotation from angles in degrees.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Whether all angles are zero.
    pub fn is_identity(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

impl From<[f64; 3]> for Rotation {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Rotation> for [f64; 3] {
    fn from(r: Rotation) -> Self {
        [r.x, r.y, r.z]
    }
}

/// How a built part is positioned: aligned to its bounding box first,
/// then rotated about the origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Placement {
    /// Rotation applied after alignment.
    #[serde(default, skip_serializing_if = "Rotation::is_identity")]
    pub rotation: Rotation,
    /// Bounding-box alignment; `None` keeps the part's own origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align3D>,
}

impl Placement {
    /// Keys a recipe may carry for its placement.
    pub const FIELDS: [&'static str; 2] = ["rotation", "align"];
}
