//! Triangle meshes for export.

use crate::Point3;

/// Output triangle mesh for rendering and export.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, y1, z1, ...]` (f32).
    pub vertices: Vec<f32>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]` (u32).
    pub indices: Vec<u32>,
    /// Flat array of vertex normals: `[nx0, ny0, nz0, ...]` (f32). Same length as vertices.
    pub normals: Vec<f32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Append one flat-shaded triangle.
    pub fn push_triangle(&mut self, tri: &[Point3; 3]) {
        let n = (tri[1] - tri[0]).cross(&(tri[2] - tri[0]));
        let n = if n.norm() > 0.0 { n.normalize() } else { n };
        let base = self.num_vertices() as u32;
        for p in tri {
            self.vertices
                .extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
            self.normals
                .extend_from_slice(&[n.x as f32, n.y as f32, n.z as f32]);
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.num_vertices() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Vertex `i` as `[x, y, z]`.
    pub fn vertex(&self, i: u32) -> [f32; 3] {
        let k = i as usize * 3;
        [self.vertices[k], self.vertices[k + 1], self.vertices[k + 2]]
    }

    /// Iterate triangles as vertex triples.
    pub fn triangles(&self) -> impl Iterator<Item = [[f32; 3]; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [self.vertex(t[0]), self.vertex(t[1]), self.vertex(t[2])])
    }
}
