//! Asset library contract
//!
//! mdlconv does not parse or write 3D files itself. An [`AssetLibrary`]
//! answers per-extension capability queries and performs the actual load and
//! export. Any implementation satisfying this trait can stand in, which is
//! also how the orchestration tests count load/export calls.

use std::path::Path;

use crate::scene::Asset;

/// Options passed to [`AssetLibrary::load_asset`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadOptions {
    /// Keep polygons as authored instead of triangulating them
    pub preserve_topology: bool,
    /// Resolve texture samplers right after a successful load
    pub load_textures: bool,
}

impl Default for LoadOptions {
    #[inline]
    fn default() -> Self {
        Self {
            preserve_topology: true,
            load_textures: true,
        }
    }
}

impl LoadOptions {
    /// Builder-style toggle for eager texture loading
    #[inline]
    #[must_use]
    pub const fn with_textures(mut self, load_textures: bool) -> Self {
        self.load_textures = load_textures;
        self
    }
}

/// Capability oracle plus load/export backend
///
/// Capability queries are keyed by the raw extension string (no leading dot)
/// and must be pure: the same extension always gets the same answer. They are
/// independent of [`crate::ModelFormat`]; the two may disagree.
pub trait AssetLibrary {
    /// Whether `extension` can be loaded
    fn can_import_extension(&self, extension: &str) -> bool;

    /// Whether an asset can be written as `extension`
    fn can_export_extension(&self, extension: &str) -> bool;

    /// Extensions this library imports, for listings
    fn import_extensions(&self) -> &[&'static str];

    /// Extensions this library exports, for listings
    fn export_extensions(&self) -> &[&'static str];

    /// Load a model file into an asset
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    fn load_asset(&self, path: &Path, options: &LoadOptions) -> anyhow::Result<Asset>;

    /// Resolve the asset's texture samplers, returning how many resolved
    ///
    /// Samplers whose image cannot be read stay unresolved.
    fn load_textures(&self, asset: &mut Asset) -> usize;

    /// Write an asset to `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the asset cannot be encoded or the file cannot be written.
    fn export_asset(&self, asset: &Asset, path: &Path) -> anyhow::Result<()>;
}
