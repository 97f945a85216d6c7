//! Diagnostics reported while recovering from malformed input

use ascii_ply_mesh::{
    Diagnostic, DiagnosticKind, MeshParser, ParseOptions, Severity, SkipReason,
};

fn diagnostics_for(ply: &str) -> Vec<Diagnostic> {
    let mut parser = MeshParser::with_sink(Vec::<Diagnostic>::new());
    parser.parse(ply.as_bytes()).unwrap();
    parser.into_sink()
}

#[test]
fn test_clean_file_has_no_diagnostics() {
    let diagnostics = diagnostics_for(
        r#"ply
format ascii 1.0
comment nothing to see
obj_info generated by hand
element vertex 3
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
0 1 0
3 0 1 2
"#,
    );
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn test_unknown_header_line_includes_source_text() {
    let diagnostics = diagnostics_for(
        r#"ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
frobnicate the mesh
end_header
0 0 0
1 0 0
0 1 0
3 0 1 2
"#,
    );

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].line, 9);
    assert_eq!(diagnostics[0].severity(), Severity::Warning);
    assert!(diagnostics[0].to_string().contains("frobnicate the mesh"));
}

#[test]
fn test_body_recovery_is_reported_per_line() {
    let diagnostics = diagnostics_for(
        r#"ply
format ascii 1.0
element vertex 2
property float x
property float y
property float z
element face 2
property list uchar int vertex_indices
end_header
0 0
0 0 0
1 1 1
4 0 1 2 3
3 0 1
3 0 1 1
"#,
    );

    let kinds: Vec<_> = diagnostics.iter().map(|d| (d.line, d.kind.clone())).collect();
    assert_eq!(kinds.len(), 4);
    assert!(matches!(
        kinds[0],
        (10, DiagnosticKind::SkippedVertex(SkipReason::Position(_)))
    ));
    assert_eq!(
        kinds[1],
        (13, DiagnosticKind::SkippedFace(SkipReason::NotTriangle(4)))
    );
    assert!(matches!(
        kinds[2],
        (14, DiagnosticKind::SkippedFace(SkipReason::Index(_)))
    ));
    assert!(matches!(
        kinds[3].1,
        DiagnosticKind::TruncatedBody {
            element: "face",
            declared: 2,
            parsed: 1
        }
    ));
    assert!(diagnostics[..3]
        .iter()
        .all(|d| d.severity() == Severity::Note));
}

#[test]
fn test_token_length_is_configurable() {
    let ply_data = r#"ply
format ascii 1.0
element vertex 1
property float x
property float y
property float z
property float normal_x
property float normal_y
property float normal_z
element face 1
property list uchar int vertex_indices
end_header
0 0 0 0 0 1
3 0 0 0
"#;

    let mut parser = MeshParser::with_sink(Vec::<Diagnostic>::new()).with_options(ParseOptions {
        max_token_length: 8,
    });
    let mesh = parser.parse(ply_data.as_bytes()).unwrap();
    assert!(!mesh.has_normals());
    assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 0.0]);

    let truncated = parser
        .sink()
        .iter()
        .filter(|d| matches!(d.kind, DiagnosticKind::MalformedProperty { .. }))
        .count();
    // "normal_x" and friends are 8 bytes; "vertex_indices" is too.
    assert_eq!(truncated, 4);

    let mesh = ascii_ply_mesh::from_str(ply_data).unwrap();
    assert!(mesh.has_normals());
    assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
}

#[test]
fn test_tracing_sink_is_default() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mesh = ascii_ply_mesh::from_str(
            "ply\nmystery line\nelement vertex 1\nelement face 1\nend_header\n0 0 0\n3 0 0 0\n",
        )
        .unwrap();
        assert_eq!(mesh.indices, vec![0, 0, 0]);
    });
}
