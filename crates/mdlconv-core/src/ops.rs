//! Capability-gated operations
//!
//! Both operations check every capability they need before touching the
//! file system, so an unsupported input or output never triggers a load.

use std::io::Write;
use std::path::PathBuf;

use crate::error::{ModelError, Result};
use crate::library::{AssetLibrary, LoadOptions};
use crate::model::Model;

/// Load `input` and print its object graph to `out`
///
/// # Errors
///
/// Returns [`ModelError::UnsupportedImportFormat`] if the library cannot
/// import the input's extension, [`ModelError::ImportFailed`] if loading
/// fails and [`ModelError::Io`] if writing to `out` fails.
pub fn graph<L, P, W>(library: &L, input: P, options: &LoadOptions, out: &mut W) -> Result<()>
where
    L: AssetLibrary + ?Sized,
    P: Into<PathBuf>,
    W: Write + ?Sized,
{
    let mut model = Model::new(input);
    ensure_importable(&model, library)?;

    model.load(library, options)?;
    model.print_object_tree(out)
}

/// Load `input` and write the same asset to `output`
///
/// The output model shares the input's asset; nothing is transformed in
/// between.
///
/// # Errors
///
/// Returns [`ModelError::UnsupportedImportFormat`] or
/// [`ModelError::UnsupportedExportFormat`] before any load if either side is
/// unsupported, then [`ModelError::ImportFailed`] or
/// [`ModelError::ExportFailed`] if the library fails.
pub fn convert<L, P, Q>(library: &L, input: P, output: Q, options: &LoadOptions) -> Result<()>
where
    L: AssetLibrary + ?Sized,
    P: Into<PathBuf>,
    Q: Into<PathBuf>,
{
    let mut source = Model::new(input);
    let mut target = Model::new(output);
    ensure_importable(&source, library)?;
    ensure_exportable(&target, library)?;

    source.load(library, options)?;
    target.share_asset_from(&source)?;
    target.export(library)?;

    log::info!(
        "converted {} ({}) to {} ({})",
        source.path().display(),
        source.format(),
        target.path().display(),
        target.format()
    );
    Ok(())
}

fn ensure_importable<L: AssetLibrary + ?Sized>(model: &Model, library: &L) -> Result<()> {
    if model.can_import(library) {
        return Ok(());
    }
    Err(ModelError::UnsupportedImportFormat {
        path: model.path().to_path_buf(),
        format: model.format(),
    })
}

fn ensure_exportable<L: AssetLibrary + ?Sized>(model: &Model, library: &L) -> Result<()> {
    if model.can_export(library) {
        return Ok(());
    }
    Err(ModelError::UnsupportedExportFormat {
        path: model.path().to_path_buf(),
        format: model.format(),
    })
}
