//! STL file parser
//!
//! Parses STL files (both ASCII and binary) using the `stl_io` crate.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use mdlconv_core::{Asset, Mesh, SceneNode, Submesh};

/// STL parser
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StlParser;

impl StlParser {
    /// Parse STL file from path
    ///
    /// The asset holds one mesh node named after the file stem, with a single
    /// material-less submesh. STL facet normals are per triangle and are not
    /// carried over.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened or contains invalid STL data.
    #[must_use = "parsing produces a result that should be handled"]
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Asset> {
        let path = path.as_ref();
        let mut file = File::open(path)
            .with_context(|| format!("Failed to open STL file: {}", path.display()))?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unnamed");
        let asset = Self::parse_reader(&mut file, name)
            .with_context(|| format!("Failed to parse STL file: {}", path.display()))?;

        log::debug!("parsed STL {}", path.display());
        Ok(asset)
    }

    /// Parse STL data from a reader, naming the mesh node `name`
    ///
    /// # Errors
    ///
    /// Returns error if the data is not valid ASCII or binary STL.
    pub fn parse_reader<R: Read + Seek>(reader: &mut R, name: &str) -> Result<Asset> {
        let indexed = stl_io::read_stl(reader).context("Invalid STL data")?;

        let positions = indexed
            .vertices
            .iter()
            .map(|v| [v[0], v[1], v[2]])
            .collect::<Vec<_>>();
        let mut indices = Vec::with_capacity(indexed.faces.len() * 3);
        for face in &indexed.faces {
            for &vertex in &face.vertices {
                let index = u32::try_from(vertex).context("STL vertex index exceeds u32")?;
                indices.push(index);
            }
        }

        let mesh = Mesh {
            positions,
            submeshes: vec![Submesh {
                name: name.to_string(),
                indices,
                ..Submesh::default()
            }],
            ..Mesh::default()
        };
        Ok(Asset {
            nodes: vec![SceneNode::mesh(name, mesh)],
            materials: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SIMPLE_SQUARE: &str = r"solid test_square
  facet normal 0.0 0.0 1.0
    outer loop
      vertex 0.0 0.0 0.0
      vertex 1.0 0.0 0.0
      vertex 1.0 1.0 0.0
    endloop
  endfacet
  facet normal 0.0 0.0 1.0
    outer loop
      vertex 0.0 0.0 0.0
      vertex 1.0 1.0 0.0
      vertex 0.0 1.0 0.0
    endloop
  endfacet
endsolid test_square
";

    #[test]
    fn test_parse_reader() {
        let mut cursor = Cursor::new(SIMPLE_SQUARE.as_bytes());
        let asset = StlParser::parse_reader(&mut cursor, "square").unwrap();

        assert_eq!(asset.count(), 1);
        let (node, mesh) = asset.meshes().next().unwrap();
        assert_eq!(node.name, "square");
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 4, "shared corners are deduplicated");
        assert!(mesh.submeshes[0].material.is_none());
        assert!(asset.materials.is_empty());
    }

    #[test]
    fn test_parse_file_names_node_from_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bracket.stl");
        std::fs::write(&path, SIMPLE_SQUARE).unwrap();

        let asset = StlParser::parse_file(&path).unwrap();
        assert_eq!(asset.nodes[0].name, "bracket");
    }

    #[test]
    fn test_parse_garbage_fails() {
        let mut cursor = Cursor::new(b"this is not an stl file".to_vec());
        assert!(StlParser::parse_reader(&mut cursor, "bad").is_err());
    }

    #[test]
    fn test_parse_nonexistent_file() {
        assert!(StlParser::parse_file("/nonexistent/path/file.stl").is_err());
    }
}
