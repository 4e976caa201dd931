//! Binary STL export.
//!
//! Layout: an 80-byte header, a little-endian `u32` triangle count, then
//! 50 bytes per facet (normal, three vertices, `u16` attribute).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use vslot_kernel::TriangleMesh;

use crate::CadError;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Encode a mesh as binary STL. The header carries `name`.
pub fn to_stl_bytes(name: &str, mesh: &TriangleMesh) -> Result<Vec<u8>, CadError> {
    let count = mesh.num_triangles();
    if count == 0 {
        return Err(CadError::EmptyGeometry);
    }

    let mut buf = Vec::with_capacity(HEADER_LEN + 4 + FACET_LEN * count);
    let mut header = [0u8; HEADER_LEN];
    let text = format!("vslot {name}");
    let len = text.len().min(HEADER_LEN);
    header[..len].copy_from_slice(&text.as_bytes()[..len]);
    buf.extend_from_slice(&header);
    buf.extend_from_slice(&(count as u32).to_le_bytes());

    for (tri, idx) in mesh.triangles().zip(mesh.indices.chunks_exact(3)) {
        let k = idx[0] as usize * 3;
        let normal = mesh.normals.get(k..k + 3).unwrap_or(&[0.0; 3]);
        for c in normal {
            buf.extend_from_slice(&c.to_le_bytes());
        }
        for vertex in tri {
            for c in vertex {
                buf.extend_from_slice(&c.to_le_bytes());
            }
        }
        buf.extend_from_slice(&0u16.to_le_bytes());
    }
    Ok(buf)
}

/// Write a mesh to a binary STL file.
pub fn write_stl(name: &str, mesh: &TriangleMesh, path: impl AsRef<Path>) -> Result<(), CadError> {
    let path = path.as_ref();
    let bytes = to_stl_bytes(name, mesh)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    tracing::debug!(
        path = %path.display(),
        triangles = mesh.num_triangles(),
        "wrote STL"
    );
    Ok(())
}
