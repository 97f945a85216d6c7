//! Header decoding: element counts and which optional vertex attributes exist.

use serde::{Deserialize, Serialize};

use crate::{
    diag::{Diagnostic, DiagnosticKind, DiagnosticSink},
    scan::{Line, LineCursor, Scanner},
    ParseOptions, PlyError,
};

/// What the header declared.
///
/// Normals count as present only if all of `nx`/`ny`/`nz` (or
/// `normal_x`/`normal_y`/`normal_z`) were declared on the vertex element,
/// colours only for all of `red`/`green`/`blue`, texture coordinates only
/// for both `u`/`texture_u` and `v`/`texture_v`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderInfo {
    pub vertex_count: u32,
    pub face_count: u32,
    pub has_normals: bool,
    pub has_colours: bool,
    pub has_texcoords: bool,
    pub comments: Vec<String>,
    pub obj_info: Vec<String>,
}

/// Bitset of the recognised vertex property names seen so far.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct SeenProperties(u8);

impl SeenProperties {
    const NX: u8 = 1 << 0;
    const NY: u8 = 1 << 1;
    const NZ: u8 = 1 << 2;
    const RED: u8 = 1 << 3;
    const GREEN: u8 = 1 << 4;
    const BLUE: u8 = 1 << 5;
    const U: u8 = 1 << 6;
    const V: u8 = 1 << 7;

    const NORMALS: u8 = Self::NX | Self::NY | Self::NZ;
    const COLOURS: u8 = Self::RED | Self::GREEN | Self::BLUE;
    const TEXCOORDS: u8 = Self::U | Self::V;

    fn record(&mut self, name: &[u8]) {
        let bit = match name {
            b"nx" | b"normal_x" => Self::NX,
            b"ny" | b"normal_y" => Self::NY,
            b"nz" | b"normal_z" => Self::NZ,
            b"red" => Self::RED,
            b"green" => Self::GREEN,
            b"blue" => Self::BLUE,
            b"u" | b"texture_u" => Self::U,
            b"v" | b"texture_v" => Self::V,
            _ => return,
        };
        self.0 |= bit;
    }

    fn has_all(self, mask: u8) -> bool {
        self.0 & mask == mask
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CurrentElement {
    None,
    Vertex,
    Face,
    Other,
}

struct HeaderDecoder<'o, S> {
    options: &'o ParseOptions,
    sink: S,
    info: HeaderInfo,
    seen: SeenProperties,
    current: CurrentElement,
}

impl<S: DiagnosticSink> HeaderDecoder<'_, S> {
    fn report(&mut self, line: &Line<'_>, kind: DiagnosticKind) {
        self.sink.report(Diagnostic::new(line.number, kind));
    }

    fn element_line(&mut self, line: &Line<'_>, mut cursor: LineCursor<'_>) {
        let name = match cursor.parse_token(usize::MAX) {
            Ok(name) => name,
            Err(error) => {
                let text = line.to_text().into_owned();
                self.report(line, DiagnosticKind::MalformedElement { text, error });
                self.current = CurrentElement::Other;
                return;
            }
        };

        self.current = match name {
            b"vertex" => CurrentElement::Vertex,
            b"face" => CurrentElement::Face,
            other => {
                let name = String::from_utf8_lossy(other).into_owned();
                self.report(line, DiagnosticKind::UnknownElement(name));
                CurrentElement::Other
            }
        };
        if self.current == CurrentElement::Other {
            return;
        }

        match cursor.parse_uint() {
            Ok(count) if self.current == CurrentElement::Vertex => self.info.vertex_count = count,
            Ok(count) => self.info.face_count = count,
            Err(error) => {
                let text = line.to_text().into_owned();
                self.report(line, DiagnosticKind::MalformedElement { text, error });
            }
        }
    }

    fn property_line(&mut self, line: &Line<'_>, mut cursor: LineCursor<'_>) {
        let max = self.options.max_token_length;
        let parsed = cursor.parse_token(max).and_then(|data_type| {
            if data_type == b"list" {
                // Count type, value type and name. The face list layout is
                // positional in the body, so none of them are kept.
                for _ in 0..3 {
                    cursor.parse_token(max)?;
                }
                Ok(None)
            } else {
                cursor.parse_token(max).map(Some)
            }
        });

        match parsed {
            Ok(Some(name)) => match self.current {
                CurrentElement::Vertex => self.seen.record(name),
                CurrentElement::None => {
                    let text = line.to_text().into_owned();
                    self.report(line, DiagnosticKind::PropertyOutsideElement(text));
                }
                CurrentElement::Face | CurrentElement::Other => {}
            },
            Ok(None) => {}
            Err(error) => {
                let text = line.to_text().into_owned();
                self.report(line, DiagnosticKind::MalformedProperty { text, error });
            }
        }
    }

    fn finish(mut self) -> HeaderInfo {
        self.info.has_normals = self.seen.has_all(SeenProperties::NORMALS);
        self.info.has_colours = self.seen.has_all(SeenProperties::COLOURS);
        self.info.has_texcoords = self.seen.has_all(SeenProperties::TEXCOORDS);
        self.info
    }
}

/// Consumes header lines up to and including `end_header`.
///
/// On success the scanner is left at the first body line. Lines that cannot
/// be understood are reported to `sink` and skipped; only running out of
/// input before `end_header` is an error.
pub fn decode_header<S: DiagnosticSink>(
    scanner: &mut Scanner<'_>,
    options: &ParseOptions,
    sink: S,
) -> Result<HeaderInfo, PlyError> {
    let mut decoder = HeaderDecoder {
        options,
        sink,
        info: HeaderInfo::default(),
        seen: SeenProperties::default(),
        current: CurrentElement::None,
    };

    while let Some(line) = scanner.next_line() {
        if line.is_blank() {
            continue;
        }

        let mut cursor = line.cursor();
        let keyword = cursor.parse_token(usize::MAX).unwrap_or_default();
        match keyword {
            b"end_header" => return Ok(decoder.finish()),
            b"element" => decoder.element_line(&line, cursor),
            b"property" => decoder.property_line(&line, cursor),
            b"comment" => {
                let text = String::from_utf8_lossy(cursor.rest()).into_owned();
                decoder.info.comments.push(text);
            }
            b"obj_info" => {
                let text = String::from_utf8_lossy(cursor.rest()).into_owned();
                decoder.info.obj_info.push(text);
            }
            b"format" => {
                if cursor.rest().starts_with(b"binary") {
                    let text = line.to_text().into_owned();
                    decoder.report(&line, DiagnosticKind::BinaryFormat(text));
                }
            }
            b"ply" => {}
            _ => {
                let text = line.to_text().into_owned();
                decoder.report(&line, DiagnosticKind::UnknownHeaderLine(text));
            }
        }
    }

    Err(PlyError::MissingEndHeader {
        lines: scanner.lines_read(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::ScanError;

    fn decode(text: &str) -> (Result<HeaderInfo, PlyError>, Vec<Diagnostic>, usize) {
        let mut scanner = Scanner::new(text.as_bytes());
        let mut diagnostics = Vec::new();
        let result = decode_header(&mut scanner, &ParseOptions::default(), &mut diagnostics);
        (result, diagnostics, scanner.position())
    }

    #[test]
    fn test_parse_simple_header() {
        let header_text = r#"ply
format ascii 1.0
comment A simple PLY file
element vertex 3
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
0 0 0
"#;

        let (result, diagnostics, position) = decode(header_text);
        let header = result.unwrap();

        assert_eq!(header.vertex_count, 3);
        assert_eq!(header.face_count, 1);
        assert!(!header.has_normals);
        assert!(!header.has_colours);
        assert!(!header.has_texcoords);
        assert_eq!(header.comments, vec!["A simple PLY file".to_string()]);
        assert!(diagnostics.is_empty());
        assert_eq!(&header_text[position..], "0 0 0\n");
    }

    #[test]
    fn test_attribute_flags_need_every_component() {
        let (result, _, _) = decode(
            "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\n\
             property float normal_x\nproperty float ny\nproperty float normal_z\n\
             property uchar red\nproperty uchar green\n\
             property float texture_u\nproperty float v\n\
             element face 1\nproperty list uchar int vertex_indices\nend_header\n",
        );
        let header = result.unwrap();

        assert!(header.has_normals);
        assert!(!header.has_colours);
        assert!(header.has_texcoords);
    }

    #[test]
    fn test_face_properties_do_not_set_vertex_flags() {
        let (result, diagnostics, _) = decode(
            "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\n\
             element face 1\nproperty list uchar int vertex_indices\n\
             property uchar red\nproperty uchar green\nproperty uchar blue\nend_header\n",
        );
        assert!(!result.unwrap().has_colours);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unknown_lines_are_reported_not_fatal() {
        let (result, diagnostics, _) = decode(
            "ply\nformat ascii 1.0\nwhatever this is\nelement edge 4\nproperty int vertex1\n\
             element vertex 2\nelement face 1\nend_header\n",
        );
        let header = result.unwrap();
        assert_eq!(header.vertex_count, 2);
        assert_eq!(header.face_count, 1);

        assert_eq!(
            diagnostics,
            vec![
                Diagnostic::new(
                    3,
                    DiagnosticKind::UnknownHeaderLine("whatever this is".to_string())
                ),
                Diagnostic::new(4, DiagnosticKind::UnknownElement("edge".to_string())),
            ]
        );
    }

    #[test]
    fn test_overlong_property_name_is_skipped() {
        let long_name = "n".repeat(40);
        let text = format!(
            "ply\nelement vertex 1\nproperty float {long_name}\nproperty float nx\n\
             property float ny\nproperty float nz\nelement face 1\nend_header\n"
        );
        let (result, diagnostics, _) = decode(&text);

        assert!(result.unwrap().has_normals);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 3);
        assert!(matches!(
            diagnostics[0].kind,
            DiagnosticKind::MalformedProperty {
                error: ScanError::TokenTooLong { max: 31 },
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_element_count() {
        let (result, diagnostics, _) =
            decode("ply\nelement vertex many\nelement face 2\nend_header\n");
        let header = result.unwrap();

        assert_eq!(header.vertex_count, 0);
        assert_eq!(header.face_count, 2);
        assert!(matches!(
            diagnostics[0].kind,
            DiagnosticKind::MalformedElement {
                error: ScanError::InvalidUInt(_),
                ..
            }
        ));
    }

    #[test]
    fn test_binary_format_is_flagged() {
        let (result, diagnostics, _) = decode(
            "ply\nformat binary_little_endian 1.0\nelement vertex 1\nelement face 1\nend_header\n",
        );
        assert!(result.is_ok());
        assert!(matches!(diagnostics[0].kind, DiagnosticKind::BinaryFormat(_)));
    }

    #[test]
    fn test_missing_end_header() {
        let (result, _, _) = decode("ply\nformat ascii 1.0\nelement vertex 3\n");
        assert!(matches!(
            result,
            Err(PlyError::MissingEndHeader { lines: 3 })
        ));
    }

    #[test]
    fn test_crlf_header() {
        let (result, diagnostics, _) = decode(
            "ply\r\nformat ascii 1.0\r\nelement vertex 1\r\nproperty float red\r\n\
             property float green\r\nproperty float blue\r\nelement face 1\r\nend_header\r\n",
        );
        let header = result.unwrap();
        assert!(header.has_colours);
        assert_eq!(header.vertex_count, 1);
        assert!(diagnostics.is_empty());
    }
}
