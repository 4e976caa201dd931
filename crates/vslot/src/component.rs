//! Common interface of the hardware parts.

use vslot_ir::{Align3D, Color};
use vslot_kernel::{Sketch, Solid};

use crate::{CadError, Joint, Part};

/// A parametric 3D part.
///
/// Implementors describe their geometry in [`Component::solid`]; the
/// provided [`Component::build`] wraps it into a [`Part`] with its joints,
/// finish and default alignment.
pub trait Component {
    /// Part name (the type name of the hardware).
    fn name(&self) -> &'static str;

    /// Display finish.
    fn material(&self) -> Color;

    /// Geometry in the part's own coordinates.
    fn solid(&self) -> Result<Solid, CadError>;

    /// Joints in the part's own coordinates.
    fn joints(&self) -> Vec<Joint> {
        Vec::new()
    }

    /// Alignment applied when a recipe does not request one.
    fn default_align(&self) -> Option<Align3D> {
        None
    }

    /// Build the part.
    fn build(&self) -> Result<Part, CadError> {
        let solid = self.solid()?;
        if solid.is_empty() {
            return Err(CadError::EmptyGeometry);
        }
        let part = self
            .joints()
            .into_iter()
            .fold(Part::new(self.name(), solid, self.material()), Part::with_joint);
        tracing::debug!(
            part = self.name(),
            triangles = part.num_triangles(),
            volume = part.volume(),
            "built part"
        );
        Ok(match self.default_align() {
            Some(align) => part.align(align),
            None => part,
        })
    }
}

/// A parametric 2D profile.
pub trait Profile {
    /// The profile region.
    fn sketch(&self) -> Result<Sketch, CadError>;
}
