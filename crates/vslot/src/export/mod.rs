//! File export: binary STL meshes and DXF profiles.

pub mod dxf;
pub mod stl;

pub use dxf::DxfDocument;
