//! mdlconv-core - format resolution and scene-graph introspection
//!
//! This crate holds the parts of mdlconv that do not depend on any particular
//! 3D file format:
//! - **Format resolution** - map a path's extension to a [`ModelFormat`] and ask
//!   an [`AssetLibrary`] whether it can import or export that extension
//! - **Scene model** - the in-memory [`Asset`] an asset library loads into
//! - **Model references** - a path plus its (optionally loaded) asset, see [`Model`]
//! - **Object graph printing** - the indented `[Type]name` tree, see [`graph`]
//! - **Orchestration** - capability-gated `graph` and `convert` operations, see [`ops`]
//!
//! Parsing and writing actual files is the job of an [`AssetLibrary`]
//! implementation such as `mdlconv-cad`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use mdlconv_core::{ops, LoadOptions};
//!
//! let library = mdlconv_cad::CadLibrary::new();
//! ops::convert(&library, "scene.obj", "scene.stl", &LoadOptions::default())?;
//! # Ok::<(), mdlconv_core::ModelError>(())
//! ```

pub mod error;
pub mod format;
pub mod graph;
pub mod library;
pub mod model;
pub mod ops;
pub mod scene;

pub use error::{ModelError, Result};
pub use format::{extension_of, ModelFormat};
pub use graph::print_tree;
pub use library::{AssetLibrary, LoadOptions};
pub use model::Model;
pub use scene::{
    Asset, Material, MaterialId, MaterialProperty, Mesh, NodeKind, PropertyType, PropertyValue,
    SceneNode, Submesh, Texture, TextureKind, TextureSampler, TextureSource,
};
