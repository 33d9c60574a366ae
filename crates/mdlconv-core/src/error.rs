//! Error types for model loading, export and printing.

use std::path::PathBuf;
use thiserror::Error;

use crate::format::ModelFormat;

/// Error types that can occur while resolving, loading, exporting or
/// printing a model.
///
/// Capability failures (`UnsupportedImportFormat`, `UnsupportedExportFormat`)
/// are reported before any load is attempted. Library failures
/// (`ImportFailed`, `ExportFailed`) keep the library's error as their source
/// for logging, but display a generic message.
///
/// # Examples
///
/// ```rust,ignore
/// use mdlconv_core::{ops, LoadOptions, ModelError};
///
/// match ops::convert(&library, "scene.xyz", "scene.stl", &LoadOptions::default()) {
///     Err(ModelError::UnsupportedImportFormat { path, format }) => {
///         eprintln!("cannot read {} ({format})", path.display());
///     }
///     Err(e) => eprintln!("{e}"),
///     Ok(()) => {}
/// }
/// ```
#[derive(Error, Debug)]
pub enum ModelError {
    /// The asset library cannot import the input's extension.
    #[error("Unable to import {}: import from {format} not supported", .path.display())]
    UnsupportedImportFormat {
        /// Input path as given
        path: PathBuf,
        /// Format resolved from the extension table (possibly `Unknown`)
        format: ModelFormat,
    },

    /// The asset library cannot export to the output's extension.
    #[error("Unable to export as {}: export to {format} not supported", .path.display())]
    UnsupportedExportFormat {
        /// Output path as given
        path: PathBuf,
        /// Format resolved from the extension table (possibly `Unknown`)
        format: ModelFormat,
    },

    /// The asset library reported an error while loading.
    #[error("Encountered error while loading {}", .path.display())]
    ImportFailed {
        /// Input path as given
        path: PathBuf,
        /// Library error detail
        #[source]
        source: anyhow::Error,
    },

    /// The asset library reported an error while exporting.
    #[error("Export to {} failed", .path.display())]
    ExportFailed {
        /// Output path as given
        path: PathBuf,
        /// Library error detail
        #[source]
        source: anyhow::Error,
    },

    /// Export or printing was attempted on a model with no loaded asset.
    #[error("Unable to export {}: no asset loaded", .path.display())]
    MissingLoadedAsset {
        /// Path of the model without an asset
        path: PathBuf,
    },

    /// A second load was attempted on a model that already holds an asset.
    #[error("Asset for {} is already loaded", .path.display())]
    AssetAlreadyLoaded {
        /// Path of the model
        path: PathBuf,
    },

    /// Writing printer output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ModelError {
    /// Check if this is a capability-check failure (no load was attempted)
    #[inline]
    #[must_use = "returns whether the error is a capability failure"]
    pub const fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedImportFormat { .. } | Self::UnsupportedExportFormat { .. }
        )
    }
}

/// Type alias for [`Result<T, ModelError>`].
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_unsupported_import_display() {
        let error = ModelError::UnsupportedImportFormat {
            path: PathBuf::from("scene.xyz"),
            format: ModelFormat::Unknown,
        };
        assert_eq!(
            error.to_string(),
            "Unable to import scene.xyz: import from unknown type not supported"
        );
        assert!(error.is_unsupported());
    }

    #[test]
    fn test_unsupported_export_display() {
        let error = ModelError::UnsupportedExportFormat {
            path: PathBuf::from("out.usdz"),
            format: ModelFormat::UniversalSceneDescriptionPackage,
        };
        assert_eq!(
            error.to_string(),
            "Unable to export as out.usdz: export to Universal Scene Description Package not supported"
        );
    }

    #[test]
    fn test_import_failed_hides_detail() {
        let error = ModelError::ImportFailed {
            path: PathBuf::from("broken.obj"),
            source: anyhow::anyhow!("unexpected token on line 3"),
        };
        let display = error.to_string();
        assert_eq!(display, "Encountered error while loading broken.obj");
        assert!(!display.contains("line 3"));
        assert!(error
            .source()
            .is_some_and(|source| source.to_string().contains("line 3")));
        assert!(!error.is_unsupported());
    }

    #[test]
    fn test_export_failed_display() {
        let error = ModelError::ExportFailed {
            path: PathBuf::from("out.stl"),
            source: anyhow::anyhow!("disk full"),
        };
        assert_eq!(error.to_string(), "Export to out.stl failed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let error: ModelError = io_err.into();
        assert!(matches!(error, ModelError::Io(_)));
        assert!(error.to_string().contains("pipe closed"));
    }
}
