//! Face block decoding. Only triangles are kept.

use crate::{
    diag::{Diagnostic, DiagnosticKind, DiagnosticSink, SkipReason},
    scan::{Line, Scanner},
    PlyError,
};

fn decode_face_line(line: &Line<'_>) -> Result<[u32; 3], SkipReason> {
    let mut cursor = line.cursor();
    let count = cursor.parse_uint().map_err(SkipReason::FaceArity)?;
    if count != 3 {
        return Err(SkipReason::NotTriangle(count));
    }

    let mut triangle = [0; 3];
    for index in &mut triangle {
        *index = cursor.parse_uint().map_err(SkipReason::Index)?;
    }
    Ok(triangle)
}

/// Fills `indices` with one triangle per accepted face line and returns the
/// number of triangles written.
///
/// Lines that are not `3 i0 i1 i2` are reported and skipped without using up
/// a slot. Indices are not checked against the vertex count.
pub fn decode_faces<S: DiagnosticSink>(
    scanner: &mut Scanner<'_>,
    indices: &mut [u32],
    mut sink: S,
) -> Result<usize, PlyError> {
    if indices.is_empty() || indices.len() % 3 != 0 {
        return Err(PlyError::FaceData(format!(
            "index buffer of length {} cannot hold triangles",
            indices.len()
        )));
    }

    let declared = indices.len() / 3;
    let mut triangles = 0;
    while triangles < declared {
        let Some(line) = scanner.next_line() else {
            break;
        };
        if line.is_blank() {
            continue;
        }

        match decode_face_line(&line) {
            Ok(triangle) => {
                let base = triangles * 3;
                indices[base..base + 3].copy_from_slice(&triangle);
                triangles += 1;
            }
            Err(reason) => sink.report(Diagnostic::new(
                line.number,
                DiagnosticKind::SkippedFace(reason),
            )),
        }
    }

    if triangles < declared {
        sink.report(Diagnostic::new(
            scanner.lines_read(),
            DiagnosticKind::TruncatedBody {
                element: "face",
                declared,
                parsed: triangles,
            },
        ));
    }

    Ok(triangles)
}
