//! Eager texture loading
//!
//! Resolves texture samplers by probing their images with the `image` crate.
//! Only the header is read, enough to learn the dimensions and to confirm the
//! file is a decodable image.

use anyhow::{Context, Result};
use image::{ImageFormat, ImageReader};
use std::io::Cursor;

use mdlconv_core::{Asset, Texture, TextureKind, TextureSource};

/// Resolve every sampler of `asset`, returning how many are resolved
///
/// Samplers that are already resolved are left alone and counted. Images
/// that cannot be read are logged and leave their sampler unresolved.
pub fn load_textures(asset: &mut Asset) -> usize {
    let mut resolved = 0;
    for sampler in asset.texture_samplers_mut() {
        if sampler.texture.is_some() {
            resolved += 1;
            continue;
        }
        match probe(&sampler.source) {
            Ok(texture) => {
                log::debug!(
                    "loaded texture {} ({}x{})",
                    sampler.display,
                    texture.width,
                    texture.height
                );
                sampler.texture = Some(texture);
                resolved += 1;
            }
            Err(e) => log::warn!("Unable to load texture {}: {e:#}", sampler.display),
        }
    }
    resolved
}

/// Read the image behind `source` far enough to learn its size
///
/// # Errors
///
/// Returns error if the image cannot be opened or its format is not
/// recognised.
pub fn probe(source: &TextureSource) -> Result<Texture> {
    match source {
        TextureSource::File(path) => {
            let (width, height) = image::image_dimensions(path)
                .with_context(|| format!("Failed to read image: {}", path.display()))?;
            Ok(Texture {
                kind: TextureKind::File,
                width,
                height,
            })
        }
        TextureSource::Embedded { bytes, mime_type } => {
            let cursor = Cursor::new(bytes.as_slice());
            let reader = match mime_type.as_deref().and_then(ImageFormat::from_mime_type) {
                Some(format) => ImageReader::with_format(cursor, format),
                None => ImageReader::new(cursor)
                    .with_guessed_format()
                    .context("Failed to detect embedded image format")?,
            };
            let (width, height) = reader
                .into_dimensions()
                .context("Failed to read embedded image")?;
            Ok(Texture {
                kind: TextureKind::Embedded,
                width,
                height,
            })
        }
    }
}
