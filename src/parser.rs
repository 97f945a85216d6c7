use std::collections::TryReserveError;

use tracing::debug;

use crate::{
    diag::{DiagnosticSink, TracingSink},
    face::decode_faces,
    header::decode_header,
    scan::Scanner,
    vertex::{decode_vertices, Vertex},
    Mesh, ParseOptions, PlyError,
};

fn allocate<T: Clone>(len: usize, value: T) -> Result<Vec<T>, TryReserveError> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len)?;
    buffer.resize(len, value);
    Ok(buffer)
}

/// Drives header, vertex and face decoding over one input buffer.
///
/// Diagnostics for skipped lines go to the sink, which defaults to
/// [`TracingSink`].
///
/// ```rust
/// use ascii_ply_mesh::{Diagnostic, MeshParser};
///
/// let ply = b"ply\nformat ascii 1.0\nelement vertex 3\nproperty float x\n\
///     property float y\nproperty float z\nelement face 1\n\
///     property list uchar int vertex_indices\nend_header\n\
///     0 0 0\n1 0 0\n0 1 0\n4 0 1 2 3\n3 0 1 2\n";
///
/// let mut parser = MeshParser::with_sink(Vec::<Diagnostic>::new());
/// let mesh = parser.parse(ply).unwrap();
///
/// assert_eq!(mesh.indices, vec![0, 1, 2]);
/// assert_eq!(parser.sink().len(), 1); // the quad
/// ```
#[derive(Debug, Clone, Default)]
pub struct MeshParser<S = TracingSink> {
    options: ParseOptions,
    sink: S,
}

impl MeshParser<TracingSink> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: DiagnosticSink> MeshParser<S> {
    pub fn with_sink(sink: S) -> Self {
        Self {
            options: ParseOptions::default(),
            sink,
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn parse(&mut self, bytes: &[u8]) -> Result<Mesh, PlyError> {
        let mut mesh = Mesh::new();
        self.parse_into(bytes, &mut mesh)?;
        Ok(mesh)
    }

    /// Parses into a caller-owned mesh.
    ///
    /// Whatever `mesh` held before is discarded. On error it is left empty,
    /// never partially filled.
    pub fn parse_into(&mut self, bytes: &[u8], mesh: &mut Mesh) -> Result<(), PlyError> {
        mesh.clear();
        let result = self.populate(bytes, mesh);
        if let Err(err) = &result {
            debug!(stage = %err.stage(), "PLY mesh parse failed: {err}");
            mesh.clear();
        }
        result
    }

    fn populate(&mut self, bytes: &[u8], mesh: &mut Mesh) -> Result<(), PlyError> {
        if bytes.is_empty() {
            return Err(PlyError::EmptyInput);
        }

        let mut scanner = Scanner::new(bytes);
        let header = decode_header(&mut scanner, &self.options, &mut self.sink)?;
        debug!(
            vertices = header.vertex_count,
            faces = header.face_count,
            normals = header.has_normals,
            colours = header.has_colours,
            texcoords = header.has_texcoords,
            "decoded PLY header"
        );

        if header.vertex_count == 0 || header.face_count == 0 {
            return Err(PlyError::NoElements {
                vertices: header.vertex_count,
                faces: header.face_count,
            });
        }

        let vertex_count = header.vertex_count as usize;
        mesh.vertices = allocate(vertex_count, Vertex::default()).map_err(|e| {
            PlyError::VertexData(format!("cannot allocate {vertex_count} vertices: {e}"))
        })?;
        let stats = decode_vertices(&mut scanner, &header, &mut mesh.vertices, &mut self.sink)?;
        mesh.parsed_vertices = stats.parsed;
        mesh.min_y = stats.min_y;
        mesh.max_y = stats.max_y;

        let index_count = (header.face_count as usize).checked_mul(3).ok_or_else(|| {
            PlyError::FaceData("face count overflows the index buffer".to_string())
        })?;
        mesh.indices = allocate(index_count, 0u32).map_err(|e| {
            PlyError::FaceData(format!("cannot allocate {index_count} indices: {e}"))
        })?;
        mesh.parsed_triangles = decode_faces(&mut scanner, &mut mesh.indices, &mut self.sink)?;

        mesh.header = header;
        Ok(())
    }
}
