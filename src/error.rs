use core::fmt;

use thiserror::Error;

/// The stage of a mesh parse that produced a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    Input,
    Header,
    VertexData,
    FaceData,
}

impl fmt::Display for ParseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseStage::Input => write!(f, "input"),
            ParseStage::Header => write!(f, "header"),
            ParseStage::VertexData => write!(f, "vertex data"),
            ParseStage::FaceData => write!(f, "face data"),
        }
    }
}

/// Fatal errors of a mesh parse.
///
/// Problems confined to a single body line never show up here; those are
/// skipped and reported through a [`DiagnosticSink`](crate::DiagnosticSink).
#[derive(Error, Debug)]
pub enum PlyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse input: buffer is empty")]
    EmptyInput,

    #[error("failed to parse header: missing 'end_header' after {lines} lines")]
    MissingEndHeader { lines: usize },

    #[error("failed to parse header: no vertices/triangles declared (vertex {vertices}, face {faces})")]
    NoElements { vertices: u32, faces: u32 },

    #[error("failed to parse vertex data: {0}")]
    VertexData(String),

    #[error("failed to parse face data: {0}")]
    FaceData(String),
}

impl PlyError {
    pub fn stage(&self) -> ParseStage {
        match self {
            PlyError::Io(_) | PlyError::EmptyInput => ParseStage::Input,
            PlyError::MissingEndHeader { .. } | PlyError::NoElements { .. } => ParseStage::Header,
            PlyError::VertexData(_) => ParseStage::VertexData,
            PlyError::FaceData(_) => ParseStage::FaceData,
        }
    }
}
