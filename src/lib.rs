//! A tolerant decoder for ASCII PLY (Polygon File Format) triangle meshes.
//!
//! The header decides how many vertices and faces to read and which optional
//! vertex attributes (normals, colours, texture coordinates) are present.
//! Body lines that cannot be decoded are skipped and reported to a
//! [`DiagnosticSink`] instead of failing the whole parse. Only running out of
//! header, an empty input or zero declared vertices/faces are fatal, and a
//! failed parse never hands out a partially filled [`Mesh`].
//!
//! # Example
//!
//! ```rust
//! let ply_data = r#"ply
//! format ascii 1.0
//! element vertex 3
//! property float x
//! property float y
//! property float z
//! property uchar red
//! property uchar green
//! property uchar blue
//! element face 1
//! property list uchar int vertex_indices
//! end_header
//! 0 0 0 255 0 0
//! 1 0 0 0 255 0
//! 0 1 0 0 0 255
//! 3 0 1 2
//! "#;
//!
//! let mesh = ascii_ply_mesh::from_str(ply_data).unwrap();
//! assert_eq!(mesh.vertices.len(), 3);
//! assert_eq!(mesh.indices, vec![0, 1, 2]);
//! assert!(mesh.has_colours());
//! assert_eq!(mesh.vertices[0].colour, [1.0, 0.0, 0.0, 1.0]);
//! assert_eq!(mesh.y_range(), Some((0.0, 1.0)));
//! ```

pub mod diag;
pub mod face;
pub mod header;
pub mod scan;
pub mod vertex;

mod error;
mod mesh;
mod options;
mod parser;

pub use diag::{Diagnostic, DiagnosticKind, DiagnosticSink, Severity, SkipReason, TracingSink};
pub use error::{ParseStage, PlyError};
pub use header::HeaderInfo;
pub use mesh::Mesh;
pub use options::ParseOptions;
pub use parser::MeshParser;
pub use vertex::Vertex;

use std::io::Read;
use std::path::Path;

/// Parses a whole PLY file held in memory, reporting diagnostics via `tracing`.
pub fn from_bytes(bytes: &[u8]) -> Result<Mesh, PlyError> {
    MeshParser::new().parse(bytes)
}

/// Convenience function for parsing from a string
pub fn from_str(ply_str: &str) -> Result<Mesh, PlyError> {
    from_bytes(ply_str.as_bytes())
}

/// Reads `reader` to the end, then parses the buffer.
pub fn from_reader<R: Read>(mut reader: R) -> Result<Mesh, PlyError> {
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    from_bytes(&buffer)
}

/// Reads the file at `path`, then parses it.
pub fn from_path(path: impl AsRef<Path>) -> Result<Mesh, PlyError> {
    let buffer = std::fs::read(path)?;
    from_bytes(&buffer)
}
