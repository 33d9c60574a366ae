//! Binary STL writer

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use mdlconv_core::Asset;
use stl_io::{Normal, Triangle, Vertex};

use crate::geometry::face_normal;

/// Write every triangle of every mesh node as binary STL to `path`
///
/// Polygons are fan-triangulated and facet normals are computed from the
/// winding. Materials, texture coordinates and node transforms are dropped.
///
/// # Errors
///
/// Returns error if a face references a missing vertex or the file cannot be
/// written.
pub fn write_stl<P: AsRef<Path>>(asset: &Asset, path: P) -> Result<()> {
    let path = path.as_ref();
    let triangles = collect_triangles(asset)?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create STL file: {}", path.display()))?;
    let mut out = BufWriter::new(file);
    stl_io::write_stl(&mut out, triangles.iter())
        .and_then(|()| out.flush())
        .with_context(|| format!("Failed to write STL file: {}", path.display()))?;

    log::debug!("wrote {} triangles to {}", triangles.len(), path.display());
    Ok(())
}

fn collect_triangles(asset: &Asset) -> Result<Vec<Triangle>> {
    let mut triangles = Vec::new();
    for (node, mesh) in asset.meshes() {
        for [a, b, c] in mesh.submeshes.iter().flat_map(|s| s.triangles()) {
            let corner = |index: u32| {
                let position = mesh.positions.get(index as usize).copied();
                position.with_context(|| {
                    format!(
                        "Mesh {:?} references vertex {index} but has {} vertices",
                        node.name,
                        mesh.positions.len()
                    )
                })
            };
            let vertices = [corner(a)?, corner(b)?, corner(c)?];
            triangles.push(Triangle {
                normal: Normal::new(face_normal(vertices[0], vertices[1], vertices[2])),
                vertices: vertices.map(Vertex::new),
            });
        }
    }
    Ok(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StlParser;
    use mdlconv_core::{Mesh, SceneNode, Submesh};

    fn quad_asset() -> Asset {
        let mesh = Mesh {
            positions: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            submeshes: vec![Submesh {
                indices: vec![0, 1, 2, 3],
                face_arities: vec![4],
                ..Submesh::default()
            }],
            ..Mesh::default()
        };
        let quad = SceneNode::mesh("Quad", mesh);
        Asset {
            nodes: vec![SceneNode::object("root").with_child(quad)],
            materials: Vec::new(),
        }
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_collect_triangles() {
        let triangles = collect_triangles(&quad_asset()).unwrap();
        assert_eq!(triangles.len(), 2);
        for triangle in &triangles {
            assert_eq!(triangle.normal[2], 1.0);
        }
    }

    #[test]
    fn test_out_of_range_index_fails() {
        let mut asset = quad_asset();
        if let mdlconv_core::NodeKind::Mesh(mesh) = &mut asset.nodes[0].children[0].kind {
            mesh.submeshes[0].indices[3] = 99;
        }
        let err = collect_triangles(&asset).unwrap_err();
        assert!(err.to_string().contains("vertex 99"));
    }

    #[test]
    fn test_write_binary_stl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.stl");

        write_stl(&quad_asset(), &path).unwrap();

        let size = std::fs::metadata(&path).unwrap().len();
        assert_eq!(size, 80 + 4 + 50 * 2, "binary STL layout");
        let reloaded = StlParser::parse_file(&path).unwrap();
        let (_, mesh) = reloaded.meshes().next().unwrap();
        assert_eq!(mesh.triangle_count(), 2);
    }
}
