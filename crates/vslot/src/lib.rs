#![warn(missing_docs)]

//! vslot: parametric V-Slot extrusion hardware.
//!
//! Rails, end caps, plates, wheels, bearings and nuts for 20 mm aluminum
//! extrusion, each built from a handful of dimensions. Multi-rail
//! cross-sections are generated from an occupancy grid.
//!
//! # Example
//!
//! ```rust,no_run
//! use vslot::rails::VSlot2020Rail;
//! use vslot::Component;
//!
//! let rail = VSlot2020Rail::c_beam(250.0, 4, 2).build().unwrap();
//! rail.write_stl("c_beam.stl").unwrap();
//! ```

use thiserror::Error;
use vslot_ir::{Align3D, Color, Document, IrError, PartSpec, Placement};
use vslot_kernel::{KernelError, Location, Solid, TriangleMesh};

pub mod bearings;
pub mod catalog;
mod component;
pub mod export;
pub mod grid;
pub mod nuts;
pub mod plates;
pub mod rails;
pub mod wheels;

pub use component::{Component, Profile};
pub use grid::{GridLocation, OccupancyGrid};
pub use vslot_ir as ir;
pub use vslot_kernel as kernel;

/// Errors returned by part construction and export.
#[derive(Error, Debug)]
pub enum CadError {
    /// An I/O error occurred during export.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The geometry is empty (no triangles).
    #[error("Empty geometry")]
    EmptyGeometry,
    /// Sketch or solid construction failed.
    #[error("geometry error: {0}")]
    Kernel(#[from] KernelError),
    /// A parts config could not be read.
    #[error("config error: {0}")]
    Config(#[from] IrError),
    /// A constructor argument is out of range.
    #[error("invalid {name}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },
    /// An occupancy grid is empty, ragged or of the wrong shape.
    #[error("invalid grid: {0}")]
    GridShape(String),
    /// A part has no joint with the given label.
    #[error("no joint named `{0}`")]
    JointNotFound(String),
}

pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> CadError {
    CadError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}

/// Accept a finite, strictly positive dimension.
pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64, CadError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(invalid(name, format!("must be positive and finite, got {value}")))
    }
}

/// A named rigid location on a part, used to connect parts together.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    /// Joint label (e.g. `"A"`).
    pub label: String,
    /// Joint frame in part coordinates.
    pub location: Location,
}

impl Joint {
    /// Create a joint.
    pub fn new(label: impl Into<String>, location: Location) -> Self {
        Self {
            label: label.into(),
            location,
        }
    }
}

/// A named part with geometry.
///
/// Parts are built by a [`Component`] (or from a recipe with
/// [`catalog::build`]) and then placed with [`Part::place`],
/// [`Part::translate`] or [`Part::rotate`]. Joints move with the part.
#[derive(Debug, Clone)]
pub struct Part {
    /// Human-readable name (used in export file names and scenes).
    pub name: String,
    solid: Solid,
    material: Color,
    joints: Vec<Joint>,
    spec: Option<PartSpec>,
}

impl Part {
    /// Wrap a solid.
    pub fn new(name: impl Into<String>, solid: Solid, material: Color) -> Self {
        Self {
            name: name.into(),
            solid,
            material,
            joints: Vec::new(),
            spec: None,
        }
    }

    /// Add a joint (in the part's current coordinates).
    pub fn with_joint(mut self, joint: Joint) -> Self {
        self.joints.push(joint);
        self
    }

    /// Attach the recipe this part was built from.
    pub fn with_spec(mut self, spec: PartSpec) -> Self {
        self.spec = Some(spec);
        self
    }

    /// Rename the part.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The underlying solid.
    pub fn solid(&self) -> &Solid {
        &self.solid
    }

    /// Display finish.
    pub fn material(&self) -> Color {
        self.material
    }

    /// All joints.
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// Look up a joint by label.
    pub fn joint(&self, label: &str) -> Option<&Joint> {
        self.joints.iter().find(|j| j.label == label)
    }

    /// The recipe, when built from one.
    pub fn spec(&self) -> Option<&PartSpec> {
        self.spec.as_ref()
    }

    // =========================================================================
    // Transforms
    // =========================================================================

    /// Apply a rigid placement to geometry and joints.
    pub fn transformed(&self, location: &Location) -> Self {
        Self {
            name: self.name.clone(),
            solid: self.solid.transformed(location),
            material: self.material,
            joints: self
                .joints
                .iter()
                .map(|j| Joint::new(j.label.clone(), *location * j.location))
                .collect(),
            spec: self.spec.clone(),
        }
    }

    /// Translate by `(x, y, z)`.
    pub fn translate(&self, x: f64, y: f64, z: f64) -> Self {
        self.transformed(&Location::from_translation(x, y, z))
    }

    /// Rotate about the origin by Euler angles in degrees (X, then Y, then Z).
    pub fn rotate(&self, x_deg: f64, y_deg: f64, z_deg: f64) -> Self {
        self.transformed(&Location::from_euler_degrees(x_deg, y_deg, z_deg))
    }

    /// Move the part so its bounding box is aligned to the origin.
    pub fn align(&self, align: Align3D) -> Self {
        let Some(bb) = self.solid.bounding_box() else {
            return self.clone();
        };
        let [ax, ay, az] = align.axes();
        self.translate(
            ax.offset(bb.min.x, bb.max.x),
            ay.offset(bb.min.y, bb.max.y),
            az.offset(bb.min.z, bb.max.z),
        )
    }

    /// Apply a placement: bounding-box alignment first, then rotation.
    pub fn place(&self, placement: &Placement) -> Self {
        let aligned = match placement.align {
            Some(align) => self.align(align),
            None => self.clone(),
        };
        let r = placement.rotation;
        if r.is_identity() {
            aligned
        } else {
            aligned.rotate(r.x, r.y, r.z)
        }
    }

    /// Compound of both parts, keeping this part's name, material and joints.
    pub fn union(&self, other: &Part) -> Self {
        Self {
            name: self.name.clone(),
            solid: self.solid.clone().union(other.solid.clone()),
            material: self.material,
            joints: self.joints.clone(),
            spec: None,
        }
    }

    /// Copy of `other` moved so that its `other_joint` coincides with this
    /// part's `joint`.
    pub fn connect_to(&self, joint: &str, other: &Part, other_joint: &str) -> Result<Part, CadError> {
        let target = self
            .joint(joint)
            .ok_or_else(|| CadError::JointNotFound(joint.to_string()))?;
        let source = other
            .joint(other_joint)
            .ok_or_else(|| CadError::JointNotFound(other_joint.to_string()))?;
        let motion = target.location * source.location.inverse();
        tracing::debug!(from = %other.name, to = %self.name, joint, other_joint, "connecting parts");
        Ok(other.transformed(&motion))
    }

    // =========================================================================
    // Queries and export
    // =========================================================================

    /// Check if this part has no geometry.
    pub fn is_empty(&self) -> bool {
        self.solid.is_empty()
    }

    /// Triangle mesh of the part.
    pub fn to_mesh(&self) -> TriangleMesh {
        self.solid.to_mesh()
    }

    /// Encode as binary STL.
    pub fn to_stl(&self) -> Result<Vec<u8>, CadError> {
        export::stl::to_stl_bytes(&self.name, &self.to_mesh())
    }

    /// Write a binary STL file.
    pub fn write_stl(&self, path: impl AsRef<std::path::Path>) -> Result<(), CadError> {
        export::stl::write_stl(&self.name, &self.to_mesh(), path)
    }

    /// Volume of the part.
    pub fn volume(&self) -> f64 {
        self.solid.volume()
    }

    /// Surface area of the part.
    pub fn surface_area(&self) -> f64 {
        self.solid.surface_area()
    }

    /// Axis-aligned bounding box as `(min, max)`; zeros for an empty part.
    pub fn bounding_box(&self) -> ([f64; 3], [f64; 3]) {
        match self.solid.bounding_box() {
            Some(bb) => (bb.min.coords.into(), bb.max.coords.into()),
            None => ([0.0; 3], [0.0; 3]),
        }
    }

    /// Volume-weighted center of mass; the origin for an empty part.
    pub fn center_of_mass(&self) -> [f64; 3] {
        self.solid
            .center_of_mass()
            .map(|p| p.coords.into())
            .unwrap_or([0.0; 3])
    }

    /// Number of triangles in the mesh.
    pub fn num_triangles(&self) -> usize {
        self.solid.num_triangles()
    }

    /// Recipe document for this part alone.
    pub fn to_document(&self) -> Document {
        let mut scene = Scene::new(self.name.clone());
        scene.add(self.clone());
        scene.to_document()
    }
}

// =============================================================================
// Scene (multi-part assembly with materials)
// =============================================================================

/// A scene node containing a part with its material assignment.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// The geometry for this node.
    pub part: Part,
    /// Material key for this node.
    pub material_key: String,
}

/// An assembly of parts that keeps each part separate.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Name of the scene.
    pub name: String,
    /// Ordered list of parts with their material assignments.
    pub nodes: Vec<SceneNode>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
        }
    }

    /// Add a part with its own material.
    pub fn add(&mut self, part: Part) {
        let material_key = part.material.key().to_string();
        self.nodes.push(SceneNode { part, material_key });
    }

    /// Get total number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if scene is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Recipe document for every part that was built from a recipe.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        for node in &self.nodes {
            if let Some(spec) = &node.part.spec {
                doc.push(node.part.name.clone(), spec.clone(), node.part.material);
            }
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vslot_ir::{Align, Rotation};
    use vslot_kernel::{Sketch, Vec3};

    fn block(x: f64, y: f64, z: f64) -> Part {
        let solid = Solid::extrude(&Sketch::rectangle(x, y).unwrap(), 0.0, z).unwrap();
        Part::new("block", solid, Color::Aluminum)
    }

    #[test]
    fn test_volume_and_area() {
        let part = block(10.0, 10.0, 10.0);
        assert!((part.volume() - 1000.0).abs() < 1e-9);
        assert!((part.surface_area() - 600.0).abs() < 1e-9);
        assert!(part.num_triangles() >= 12);
    }

    #[test]
    fn test_bounding_box() {
        let part = block(10.0, 20.0, 30.0);
        let (min, max) = part.bounding_box();
        assert_eq!(min, [-5.0, -10.0, 0.0]);
        assert_eq!(max, [5.0, 10.0, 30.0]);
    }

    #[test]
    fn test_center_of_mass() {
        let com = block(10.0, 10.0, 10.0).translate(1.0, 2.0, 3.0).center_of_mass();
        assert!((com[0] - 1.0).abs() < 1e-9, "cx: {}", com[0]);
        assert!((com[1] - 2.0).abs() < 1e-9, "cy: {}", com[1]);
        assert!((com[2] - 8.0).abs() < 1e-9, "cz: {}", com[2]);
    }

    #[test]
    fn test_align_min() {
        let part = block(10.0, 20.0, 30.0).align(Align3D::Uniform(Align::Min));
        let (min, max) = part.bounding_box();
        assert_eq!(min, [0.0, 0.0, 0.0]);
        assert_eq!(max, [10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_place_aligns_before_rotating() {
        let placement = Placement {
            rotation: Rotation::new(0.0, 0.0, 90.0),
            align: Some(Align3D::PerAxis([Align::Min, Align::Center, Align::Min])),
        };
        let (min, max) = block(10.0, 20.0, 30.0).place(&placement).bounding_box();
        // Aligned to x in [0, 10], y in [-10, 10]; a quarter turn about Z
        // maps that to x in [-10, 10], y in [0, 10].
        assert!((min[0] + 10.0).abs() < 1e-9 && (max[0] - 10.0).abs() < 1e-9);
        assert!(min[1].abs() < 1e-9 && (max[1] - 10.0).abs() < 1e-9);
        assert!(min[2].abs() < 1e-9 && (max[2] - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_joints_follow_transforms() {
        let part = block(2.0, 2.0, 10.0)
            .with_joint(Joint::new("top", Location::from_translation(0.0, 0.0, 10.0)))
            .translate(5.0, 0.0, 0.0);
        let top = part.joint("top").unwrap();
        assert_eq!(top.location.translation(), Vec3::new(5.0, 0.0, 10.0));
    }

    #[test]
    fn test_connect_to_stacks_parts() {
        let top = Location::from_translation(0.0, 0.0, 10.0);
        let bottom = Location::new(Vec3::zeros(), [180.0, 0.0, 0.0]);
        let a = block(2.0, 2.0, 10.0).with_joint(Joint::new("A", top));
        let b = block(2.0, 2.0, 10.0).with_joint(Joint::new("B", bottom));

        let moved = a.connect_to("A", &b, "B").unwrap();
        let (min, max) = moved.bounding_box();
        // B's frame points out of its bottom face, so the flipped copy
        // hangs from A's top joint.
        assert!((min[2] - 0.0).abs() < 1e-9, "min z: {}", min[2]);
        assert!((max[2] - 10.0).abs() < 1e-9, "max z: {}", max[2]);
        let joint = moved.joint("B").unwrap();
        assert!((joint.location.translation() - Vec3::new(0.0, 0.0, 10.0)).norm() < 1e-9);
    }

    #[test]
    fn test_connect_to_missing_joint() {
        let a = block(1.0, 1.0, 1.0);
        let err = a.connect_to("A", &a, "B").unwrap_err();
        assert!(matches!(err, CadError::JointNotFound(label) if label == "A"));
    }

    #[test]
    fn test_union_is_compound() {
        let a = block(1.0, 1.0, 1.0);
        let b = block(1.0, 1.0, 1.0).translate(0.0, 0.0, 1.0);
        let both = a.union(&b);
        assert!((both.volume() - 2.0).abs() < 1e-9);
        assert_eq!(both.solid().shells().len(), 2);
    }

    #[test]
    fn test_scene_document_skips_parts_without_recipe() {
        let mut scene = Scene::new("assembly");
        scene.add(block(1.0, 1.0, 1.0));
        scene.add(
            block(1.0, 1.0, 1.0)
                .with_name("bearing")
                .with_spec(PartSpec::Bearing625(Placement::default())),
        );
        assert_eq!(scene.len(), 2);
        let doc = scene.to_document();
        assert_eq!(doc.parts.len(), 1);
        assert_eq!(doc.parts[0].name, "bearing");
    }

    #[test]
    fn test_empty_part() {
        let part = Part::new("nothing", Solid::empty(), Color::Steel);
        assert!(part.is_empty());
        assert_eq!(part.bounding_box(), ([0.0; 3], [0.0; 3]));
        assert!(matches!(part.to_stl(), Err(CadError::EmptyGeometry)));
    }
}
