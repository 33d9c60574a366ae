//! GLTF/GLB 3D model format support
//!
//! Import only, for:
//! - GLTF 2.0 (JSON) - `.gltf` files, with external or data-URI buffers
//! - GLB (Binary glTF) - `.glb` files
//!
//! Images referenced by materials become texture samplers. External image
//! files display as their path; images stored in the file display as
//! `<model path>[<image name or index>]`.

mod parser;

pub use parser::GltfParser;
