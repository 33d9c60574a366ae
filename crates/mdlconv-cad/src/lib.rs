//! mdlconv-cad - asset library backed by pure-Rust 3D format crates
//!
//! [`CadLibrary`] implements [`mdlconv_core::AssetLibrary`] for:
//! - **OBJ** (Wavefront Object) - import and export, materials via MTL
//! - **STL** (`STereoLithography`) - import (ASCII or binary) and binary export
//! - **GLTF/GLB** (GL Transmission Format) - import, including embedded images
//!
//! Capability queries compare extensions case-insensitively. They are
//! independent of [`mdlconv_core::ModelFormat`]: `gltf` and `glb` are
//! importable even though the format table has no entry for them.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use mdlconv_cad::CadLibrary;
//! use mdlconv_core::{ops, LoadOptions};
//!
//! let library = CadLibrary::new();
//! ops::convert(&library, "part.stl", "part.obj", &LoadOptions::default())?;
//! # Ok::<(), mdlconv_core::ModelError>(())
//! ```

mod geometry;
pub mod gltf;
pub mod obj;
pub mod stl;
pub mod texture;

use std::path::Path;

use mdlconv_core::{extension_of, Asset, AssetLibrary, LoadOptions};

pub use gltf::GltfParser;
pub use obj::{write_obj, ObjParser};
pub use stl::{write_stl, StlParser};

/// Extensions [`CadLibrary`] can import
pub const IMPORT_EXTENSIONS: &[&str] = &["obj", "stl", "gltf", "glb"];

/// Extensions [`CadLibrary`] can export
pub const EXPORT_EXTENSIONS: &[&str] = &["obj", "stl"];

/// Asset library for OBJ, STL and glTF files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CadLibrary;

impl CadLibrary {
    /// Create the library
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn listed(extensions: &[&str], extension: &str) -> bool {
    extensions.iter().any(|e| e.eq_ignore_ascii_case(extension))
}

impl AssetLibrary for CadLibrary {
    fn can_import_extension(&self, extension: &str) -> bool {
        listed(IMPORT_EXTENSIONS, extension)
    }

    fn can_export_extension(&self, extension: &str) -> bool {
        listed(EXPORT_EXTENSIONS, extension)
    }

    fn import_extensions(&self) -> &[&'static str] {
        IMPORT_EXTENSIONS
    }

    fn export_extensions(&self) -> &[&'static str] {
        EXPORT_EXTENSIONS
    }

    fn load_asset(&self, path: &Path, options: &LoadOptions) -> anyhow::Result<Asset> {
        match extension_of(path).to_ascii_lowercase().as_str() {
            "obj" => ObjParser::parse_file(path, options.preserve_topology),
            "stl" => StlParser::parse_file(path),
            "gltf" | "glb" => GltfParser::parse_file(path),
            other => anyhow::bail!("No importer for extension {other:?}: {}", path.display()),
        }
    }

    fn load_textures(&self, asset: &mut Asset) -> usize {
        texture::load_textures(asset)
    }

    fn export_asset(&self, asset: &Asset, path: &Path) -> anyhow::Result<()> {
        match extension_of(path).to_ascii_lowercase().as_str() {
            "obj" => write_obj(asset, path),
            "stl" => write_stl(asset, path),
            other => anyhow::bail!("No exporter for extension {other:?}: {}", path.display()),
        }
    }
}
