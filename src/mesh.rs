use serde::{Deserialize, Serialize};

use crate::{header::HeaderInfo, vertex::Vertex};

/// A triangle mesh decoded from a PLY file.
///
/// `vertices` always has the declared vertex count and `indices` three times
/// the declared face count. When the body holds fewer usable records than
/// declared, the trailing entries keep their defaults; `parsed_vertices` and
/// `parsed_triangles` tell how many were actually read.
///
/// Index values are passed through as written and may exceed the vertex
/// count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub header: HeaderInfo,
    pub parsed_vertices: usize,
    pub parsed_triangles: usize,
    pub min_y: f32,
    pub max_y: f32,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            header: HeaderInfo::default(),
            parsed_vertices: 0,
            parsed_triangles: 0,
            min_y: f32::INFINITY,
            max_y: f32::NEG_INFINITY,
        }
    }

    /// Resets to the empty state, dropping all buffers.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    pub fn vertex_count(&self) -> u32 {
        self.header.vertex_count
    }

    pub fn triangle_count(&self) -> u32 {
        self.header.face_count
    }

    pub fn has_normals(&self) -> bool {
        self.header.has_normals
    }

    pub fn has_colours(&self) -> bool {
        self.header.has_colours
    }

    pub fn has_texcoords(&self) -> bool {
        self.header.has_texcoords
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|triangle| [triangle[0], triangle[1], triangle[2]])
    }

    /// Lowest and highest vertex Y, or `None` if no vertex was parsed.
    pub fn y_range(&self) -> Option<(f32, f32)> {
        (self.parsed_vertices > 0).then_some((self.min_y, self.max_y))
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
