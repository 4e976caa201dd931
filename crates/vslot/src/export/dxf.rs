//! DXF export for 2D profiles.
//!
//! Writes DXF R12 with closed LWPOLYLINE entities, one per sketch ring, on
//! layer "0". Units are millimeters. Suitable for laser cutting end caps
//! and plates or for drawing rail cross-sections.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use vslot_kernel::{Point2, Sketch};

use crate::CadError;

/// DXF document builder.
///
/// Accumulates closed outlines and writes them as DXF R12.
#[derive(Debug, Clone, Default)]
pub struct DxfDocument {
    polylines: Vec<Vec<Point2>>,
}

impl DxfDocument {
    /// Create a new empty DXF document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every exterior and hole of a sketch.
    pub fn add_sketch(&mut self, sketch: &Sketch) {
        self.polylines.extend(sketch.rings());
    }

    /// Number of polylines.
    pub fn len(&self) -> usize {
        self.polylines.len()
    }

    /// Check if the document has no entities.
    pub fn is_empty(&self) -> bool {
        self.polylines.is_empty()
    }

    /// Write the document.
    pub fn write_to(&self, writer: &mut impl Write) -> std::io::Result<()> {
        // Header
        writeln!(writer, "0\nSECTION\n2\nHEADER")?;
        writeln!(writer, "9\n$ACADVER\n1\nAC1009")?; // DXF R12
        writeln!(writer, "9\n$INSUNITS\n70\n4")?; // Millimeters
        writeln!(writer, "0\nENDSEC")?;

        // Tables section (minimal)
        writeln!(writer, "0\nSECTION\n2\nTABLES\n0\nENDSEC")?;

        writeln!(writer, "0\nSECTION\n2\nENTITIES")?;
        for points in &self.polylines {
            write_polyline(writer, points)?;
        }
        writeln!(writer, "0\nENDSEC")?;

        writeln!(writer, "0\nEOF")?;
        Ok(())
    }

    /// The document as DXF text.
    pub fn to_dxf_string(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Export to a DXF file.
    pub fn export(&self, path: impl AsRef<Path>) -> Result<(), CadError> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        tracing::debug!(path = %path.display(), polylines = self.len(), "wrote DXF");
        Ok(())
    }
}

fn write_polyline(writer: &mut impl Write, points: &[Point2]) -> std::io::Result<()> {
    writeln!(writer, "0\nLWPOLYLINE")?;
    writeln!(writer, "8\n0")?; // Layer 0
    writeln!(writer, "90\n{}", points.len())?;
    writeln!(writer, "70\n1")?; // Closed polyline
    for p in points {
        writeln!(writer, "10\n{:.6}", p.x)?;
        writeln!(writer, "20\n{:.6}", p.y)?;
    }
    Ok(())
}
