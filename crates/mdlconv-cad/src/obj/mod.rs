//! OBJ file format support
//!
//! Wavefront OBJ is a widely-used 3D geometry format that stores vertices, faces,
//! normals, texture coordinates, and material references into MTL libraries.
//! This module loads OBJ files into the core scene model and writes them back.

mod parser;
mod writer;

pub use parser::ObjParser;
pub use writer::write_obj;
