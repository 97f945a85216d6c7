//! Vertex block decoding.
//!
//! Vertex lines are read positionally: position, then normal, colour and
//! texture coordinate, each only if the header declared it. Colours carry no
//! usable type information, so each line is first tried as three floats in
//! `[0, 1]` and then as 8-bit integers with an optional alpha.

use serde::{Deserialize, Serialize};

use crate::{
    diag::{Diagnostic, DiagnosticKind, DiagnosticSink, SkipReason},
    header::HeaderInfo,
    scan::{Line, LineCursor, ScanError, Scanner},
    PlyError,
};

/// Default vertex colour, RGBA.
pub const OPAQUE_WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// A decoded vertex.
///
/// Attributes the header did not declare keep their defaults: zero for
/// position, normal and texture coordinate, opaque white for colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// RGBA in `[0, 1]`.
    pub colour: [f32; 4],
    pub tex_coord: [f32; 2],
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            normal: [0.0; 3],
            colour: OPAQUE_WHITE,
            tex_coord: [0.0; 2],
        }
    }
}

/// Summary of a vertex block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexStats {
    /// Number of slots filled from the body.
    pub parsed: usize,
    /// `f32::INFINITY` when nothing was parsed.
    pub min_y: f32,
    /// `f32::NEG_INFINITY` when nothing was parsed.
    pub max_y: f32,
}

fn parse_floats<const N: usize>(cursor: &mut LineCursor<'_>) -> Result<[f32; N], ScanError> {
    let mut attempt = *cursor;
    let mut values = [0.0; N];
    for value in &mut values {
        *value = attempt.parse_float()?;
    }
    *cursor = attempt;
    Ok(values)
}

fn parse_channel(cursor: &mut LineCursor<'_>) -> Option<u32> {
    let mut attempt = *cursor;
    let value = attempt.parse_uint().ok().filter(|&v| v <= 255)?;
    *cursor = attempt;
    Some(value)
}

/// Decodes an RGB(A) colour at the cursor.
///
/// Three floats all within `[0, 1]` win and get alpha 1. Otherwise the same
/// tokens are read as integers in `[0, 255]`, followed by an optional alpha
/// integer that defaults to 255. Returns `None`, without moving the cursor,
/// if neither reading works.
pub fn decode_colour(cursor: &mut LineCursor<'_>) -> Option<[f32; 4]> {
    let mut attempt = *cursor;
    if let Ok(rgb) = parse_floats::<3>(&mut attempt) {
        if rgb.iter().all(|c| (0.0..=1.0).contains(c)) {
            *cursor = attempt;
            return Some([rgb[0], rgb[1], rgb[2], 1.0]);
        }
    }

    let mut attempt = *cursor;
    let mut rgba = [255u32; 4];
    for channel in &mut rgba[..3] {
        *channel = parse_channel(&mut attempt)?;
    }
    if let Some(alpha) = parse_channel(&mut attempt) {
        rgba[3] = alpha;
    }

    *cursor = attempt;
    Some(rgba.map(|c| c as f32 / 255.0))
}

fn decode_vertex_line<S: DiagnosticSink>(
    line: &Line<'_>,
    header: &HeaderInfo,
    sink: &mut S,
) -> Result<Vertex, SkipReason> {
    let mut cursor = line.cursor();
    let mut vertex = Vertex {
        position: parse_floats(&mut cursor).map_err(SkipReason::Position)?,
        ..Vertex::default()
    };

    if header.has_normals {
        vertex.normal = parse_floats(&mut cursor).map_err(SkipReason::Normal)?;
    }

    if header.has_colours && !cursor.is_exhausted() {
        match decode_colour(&mut cursor) {
            Some(colour) => vertex.colour = colour,
            None => {
                // Texture coordinates sit behind the colour and cannot be located.
                sink.report(Diagnostic::new(
                    line.number,
                    DiagnosticKind::UndecodableColour,
                ));
                return Ok(vertex);
            }
        }
    }

    if header.has_texcoords {
        if let Ok(tex_coord) = parse_floats(&mut cursor) {
            vertex.tex_coord = tex_coord;
        }
    }

    Ok(vertex)
}

/// Fills `vertices` from consecutive non-blank body lines.
///
/// A malformed line is reported and skipped without using up a slot. If the
/// input runs out first, the remaining slots keep their defaults and the
/// block still succeeds.
pub fn decode_vertices<S: DiagnosticSink>(
    scanner: &mut Scanner<'_>,
    header: &HeaderInfo,
    vertices: &mut [Vertex],
    mut sink: S,
) -> Result<VertexStats, PlyError> {
    if vertices.is_empty() {
        return Err(PlyError::VertexData(
            "no vertices declared in header".to_string(),
        ));
    }

    let mut stats = VertexStats {
        parsed: 0,
        min_y: f32::INFINITY,
        max_y: f32::NEG_INFINITY,
    };

    while stats.parsed < vertices.len() {
        let Some(line) = scanner.next_line() else {
            break;
        };
        if line.is_blank() {
            continue;
        }

        match decode_vertex_line(&line, header, &mut sink) {
            Ok(vertex) => {
                let y = vertex.position[1];
                stats.min_y = stats.min_y.min(y);
                stats.max_y = stats.max_y.max(y);
                vertices[stats.parsed] = vertex;
                stats.parsed += 1;
            }
            Err(reason) => sink.report(Diagnostic::new(
                line.number,
                DiagnosticKind::SkippedVertex(reason),
            )),
        }
    }

    if stats.parsed < vertices.len() {
        sink.report(Diagnostic::new(
            scanner.lines_read(),
            DiagnosticKind::TruncatedBody {
                element: "vertex",
                declared: vertices.len(),
                parsed: stats.parsed,
            },
        ));
    }

    Ok(stats)
}
