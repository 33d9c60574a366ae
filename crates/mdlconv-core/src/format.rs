//! Model format identifiers
//!
//! This module defines the `ModelFormat` enum, the 3D interchange formats
//! mdlconv knows by name, and the extension lookup that derives one from a
//! file path.
//!
//! The lookup is a fixed table and is kept separate from an asset library's
//! own capability queries: a library may load extensions this table maps to
//! [`ModelFormat::Unknown`], and may refuse formats the table names.

use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::Path;

/// 3D interchange format derived from a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFormat {
    /// Alembic (.abc)
    #[serde(rename = "ABC")]
    Alembic,
    /// COLLADA (.dae)
    #[serde(rename = "DAE")]
    Collada,
    /// Universal Scene Description (.usd)
    #[serde(rename = "USD")]
    UniversalSceneDescription,
    /// Universal Scene Description, text encoding (.usda)
    #[serde(rename = "USDA")]
    UniversalSceneDescriptionText,
    /// Universal Scene Description, binary encoding (.usdc)
    #[serde(rename = "USDC")]
    UniversalSceneDescriptionBinary,
    /// Universal Scene Description package (.usdz)
    #[serde(rename = "USDZ")]
    UniversalSceneDescriptionPackage,
    /// Polygon File Format, aka Stanford Triangle Format (.ply)
    #[serde(rename = "PLY")]
    Polygon,
    /// Wavefront Object (.obj)
    #[serde(rename = "OBJ")]
    WavefrontObject,
    /// Standard Tessellation Language, aka Stereolithography (.stl)
    #[serde(rename = "STL")]
    StandardTessellationLanguage,
    /// Any extension not in the table
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl ModelFormat {
    /// Every named format, in table order (`Unknown` excluded)
    pub const ALL: [Self; 9] = [
        Self::Alembic,
        Self::Collada,
        Self::UniversalSceneDescription,
        Self::UniversalSceneDescriptionText,
        Self::UniversalSceneDescriptionBinary,
        Self::UniversalSceneDescriptionPackage,
        Self::Polygon,
        Self::WavefrontObject,
        Self::StandardTessellationLanguage,
    ];

    /// Look up a format by extension (no leading dot).
    ///
    /// The match is exact and case-sensitive: `"obj"` is a Wavefront Object,
    /// `"OBJ"` is `Unknown`. Never fails.
    #[inline]
    #[must_use = "detects format from file extension"]
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "abc" => Self::Alembic,
            "dae" => Self::Collada,
            "usd" => Self::UniversalSceneDescription,
            "usda" => Self::UniversalSceneDescriptionText,
            "usdc" => Self::UniversalSceneDescriptionBinary,
            "usdz" => Self::UniversalSceneDescriptionPackage,
            "ply" => Self::Polygon,
            "obj" => Self::WavefrontObject,
            "stl" => Self::StandardTessellationLanguage,
            _ => Self::Unknown,
        }
    }

    /// Resolve the format of a file path from its extension
    #[inline]
    #[must_use = "detects format from file path"]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self::from_extension(extension_of(path.as_ref()))
    }

    /// The table extension for this format, `None` for `Unknown`
    #[inline]
    #[must_use = "returns the file extension for this format"]
    pub const fn extension(&self) -> Option<&'static str> {
        match self {
            Self::Alembic => Some("abc"),
            Self::Collada => Some("dae"),
            Self::UniversalSceneDescription => Some("usd"),
            Self::UniversalSceneDescriptionText => Some("usda"),
            Self::UniversalSceneDescriptionBinary => Some("usdc"),
            Self::UniversalSceneDescriptionPackage => Some("usdz"),
            Self::Polygon => Some("ply"),
            Self::WavefrontObject => Some("obj"),
            Self::StandardTessellationLanguage => Some("stl"),
            Self::Unknown => None,
        }
    }

    /// Human-readable name used in user-facing messages
    #[inline]
    #[must_use = "returns the display name for this format"]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Alembic => "Alembic",
            Self::Collada => "Collada",
            Self::UniversalSceneDescription => "Universal Scene Description",
            Self::UniversalSceneDescriptionText => "Universal Scene Description Text",
            Self::UniversalSceneDescriptionBinary => "Universal Scene Description Binary",
            Self::UniversalSceneDescriptionPackage => "Universal Scene Description Package",
            Self::Polygon => "Polygon",
            Self::WavefrontObject => "Wavefront Object",
            Self::StandardTessellationLanguage => "Standard Tessellation Language",
            Self::Unknown => "unknown type",
        }
    }

    /// Check whether the extension table named this format
    #[inline]
    #[must_use = "returns whether the format is known"]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for ModelFormat {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Extension of the last path component, without the dot.
///
/// Returns an empty string when the file name has no extension or is not
/// valid UTF-8.
#[inline]
#[must_use]
pub fn extension_of(path: &Path) -> &str {
    path.extension().and_then(OsStr::to_str).unwrap_or("")
}
