//! Model references
//!
//! A [`Model`] pairs a file path with the format resolved from it and, once
//! loaded, the in-memory [`Asset`]. The asset is reference counted so the
//! convert flow can hand the input's asset to the output model without
//! copying it; both models then share the same scene.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{ModelError, Result};
use crate::format::{extension_of, ModelFormat};
use crate::graph;
use crate::library::{AssetLibrary, LoadOptions};
use crate::scene::Asset;

/// A model file and, once loaded, its asset
#[derive(Debug, Clone)]
pub struct Model {
    path: PathBuf,
    format: ModelFormat,
    asset: Option<Rc<Asset>>,
}

impl Model {
    /// Reference a model file; nothing is read yet
    #[must_use]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let format = ModelFormat::from_path(&path);
        Self {
            path,
            format,
            asset: None,
        }
    }

    /// Path as given
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format resolved from the extension table
    #[inline]
    #[must_use]
    pub const fn format(&self) -> ModelFormat {
        self.format
    }

    /// Raw extension (empty if none)
    #[inline]
    #[must_use]
    pub fn extension(&self) -> &str {
        extension_of(&self.path)
    }

    /// Ask the library whether it can import this model's extension
    #[must_use]
    pub fn can_import<L: AssetLibrary + ?Sized>(&self, library: &L) -> bool {
        let supported = library.can_import_extension(self.extension());
        log::debug!(
            "import capability for {} ({:?}): {supported}",
            self.path.display(),
            self.extension()
        );
        supported
    }

    /// Ask the library whether it can export to this model's extension
    #[must_use]
    pub fn can_export<L: AssetLibrary + ?Sized>(&self, library: &L) -> bool {
        let supported = library.can_export_extension(self.extension());
        log::debug!(
            "export capability for {} ({:?}): {supported}",
            self.path.display(),
            self.extension()
        );
        supported
    }

    /// The loaded asset, if any
    #[inline]
    #[must_use]
    pub fn asset(&self) -> Option<&Asset> {
        self.asset.as_deref()
    }

    /// Whether an asset is present
    #[inline]
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.asset.is_some()
    }

    /// Whether this model and `other` hold the same asset
    #[must_use]
    pub fn shares_asset_with(&self, other: &Self) -> bool {
        match (&self.asset, &other.asset) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Load the model through `library`
    ///
    /// Texture samplers are resolved right after the load when
    /// `options.load_textures` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::AssetAlreadyLoaded`] if an asset is already
    /// present and [`ModelError::ImportFailed`] if the library fails.
    pub fn load<L: AssetLibrary + ?Sized>(
        &mut self,
        library: &L,
        options: &LoadOptions,
    ) -> Result<()> {
        if self.asset.is_some() {
            return Err(ModelError::AssetAlreadyLoaded {
                path: self.path.clone(),
            });
        }

        log::debug!("loading {} with {options:?}", self.path.display());
        let mut asset = library
            .load_asset(&self.path, options)
            .map_err(|source| {
                log::debug!("library failed to load {}: {source:#}", self.path.display());
                ModelError::ImportFailed {
                    path: self.path.clone(),
                    source,
                }
            })?;

        if options.load_textures {
            let resolved = library.load_textures(&mut asset);
            log::debug!("resolved {resolved} texture(s) for {}", self.path.display());
        }

        log::debug!(
            "loaded {}: {} top-level node(s), {} material(s)",
            self.path.display(),
            asset.count(),
            asset.materials.len()
        );
        self.asset = Some(Rc::new(asset));
        Ok(())
    }

    /// Take over the asset loaded by `source` without copying it
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingLoadedAsset`] if `source` has no asset.
    pub fn share_asset_from(&mut self, source: &Self) -> Result<()> {
        let asset = source
            .asset
            .as_ref()
            .ok_or_else(|| ModelError::MissingLoadedAsset {
                path: source.path.clone(),
            })?;
        self.asset = Some(Rc::clone(asset));
        Ok(())
    }

    /// Write the asset to this model's path through `library`
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingLoadedAsset`] if no asset is present and
    /// [`ModelError::ExportFailed`] if the library fails.
    pub fn export<L: AssetLibrary + ?Sized>(&self, library: &L) -> Result<()> {
        let asset = self.loaded()?;
        log::debug!("exporting {}", self.path.display());
        library.export_asset(asset, &self.path).map_err(|source| {
            log::debug!("library failed to export {}: {source:#}", self.path.display());
            ModelError::ExportFailed {
                path: self.path.clone(),
                source,
            }
        })
    }

    /// Print the asset's object graph to `out`
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingLoadedAsset`] if no asset is present and
    /// [`ModelError::Io`] if writing fails.
    pub fn print_object_tree<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        let asset = self.loaded()?;
        graph::print_tree(asset, &self.path, out)?;
        Ok(())
    }

    fn loaded(&self) -> Result<&Asset> {
        self.asset().ok_or_else(|| ModelError::MissingLoadedAsset {
            path: self.path.clone(),
        })
    }
}
