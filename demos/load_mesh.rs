//! Loads a PLY file (or a built-in sample) and prints a summary.
//!
//! `cargo run --example load_mesh -- model.ply`

use ascii_ply_mesh::{Diagnostic, MeshParser};

const SAMPLE: &str = r#"ply
format ascii 1.0
comment Coloured quad, one face written as a polygon
element vertex 4
property float x
property float y
property float z
property uchar red
property uchar green
property uchar blue
element face 3
property list uchar int vertex_indices
end_header
0 0 0 255 0 0
1 0 0 0 255 0
1 1 0 0 0 255
0 1 0 255 255 255
4 0 1 2 3
3 0 1 2
3 0 2 3
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let bytes = match std::env::args().nth(1) {
        Some(path) => std::fs::read(path)?,
        None => SAMPLE.as_bytes().to_vec(),
    };

    let mut parser = MeshParser::with_sink(Vec::<Diagnostic>::new());
    let mesh = parser.parse(&bytes)?;

    println!(
        "{} vertices ({} parsed), {} triangles ({} parsed)",
        mesh.vertex_count(),
        mesh.parsed_vertices,
        mesh.triangle_count(),
        mesh.parsed_triangles
    );
    println!(
        "normals: {}, colours: {}, texcoords: {}",
        mesh.has_normals(),
        mesh.has_colours(),
        mesh.has_texcoords()
    );
    if let Some((min_y, max_y)) = mesh.y_range() {
        println!("y range: {min_y} .. {max_y}");
    }
    for (i, triangle) in mesh.triangles().enumerate().take(5) {
        println!("triangle {i}: {triangle:?}");
    }

    for diagnostic in parser.sink() {
        println!("warning: {diagnostic}");
    }

    Ok(())
}
