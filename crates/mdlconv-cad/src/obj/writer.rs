//! OBJ file writer
//!
//! Writes every mesh node as an `o` group, faces per submesh with `usemtl`,
//! and a sibling `.mtl` library when the asset has materials. Polygons are
//! written as authored. Node transforms are not applied.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use mdlconv_core::{Asset, Material, PropertyValue, TextureSampler};

/// Write `asset` as Wavefront OBJ to `path`
///
/// # Errors
///
/// Returns error if the OBJ or MTL file cannot be written.
pub fn write_obj<P: AsRef<Path>>(asset: &Asset, path: P) -> Result<()> {
    let path = path.as_ref();

    let mtl_path = path.with_extension("mtl");
    let mtl_name = if asset.materials.is_empty() {
        None
    } else {
        write_mtl(&asset.materials, &mtl_path)?;
        mtl_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create OBJ file: {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_obj_to(asset, mtl_name.as_deref(), &mut out)
        .and_then(|()| out.flush())
        .with_context(|| format!("Failed to write OBJ file: {}", path.display()))?;

    log::debug!("wrote OBJ {}", path.display());
    Ok(())
}

fn write_obj_to<W: Write>(
    asset: &Asset,
    mtl_name: Option<&str>,
    out: &mut W,
) -> std::io::Result<()> {
    writeln!(out, "# mdlconv {}", env!("CARGO_PKG_VERSION"))?;
    if let Some(name) = mtl_name {
        writeln!(out, "mtllib {name}")?;
    }

    // OBJ indices are 1-based and global across the file
    let mut position_base = 1;
    let mut tex_coord_base = 1;
    let mut normal_base = 1;

    for (node, mesh) in asset.meshes() {
        writeln!(out, "o {}", node.name)?;
        for [x, y, z] in &mesh.positions {
            writeln!(out, "v {x} {y} {z}")?;
        }
        for [u, v] in &mesh.tex_coords {
            writeln!(out, "vt {u} {v}")?;
        }
        for [x, y, z] in &mesh.normals {
            writeln!(out, "vn {x} {y} {z}")?;
        }

        let has_uv = !mesh.tex_coords.is_empty();
        let has_normal = !mesh.normals.is_empty();
        for submesh in &mesh.submeshes {
            if let Some(material) = submesh.material.and_then(|id| asset.material(id)) {
                writeln!(out, "usemtl {}", material.name)?;
            }
            for face in submesh.faces() {
                write!(out, "f")?;
                for &index in face {
                    let index = index as usize;
                    let v = position_base + index;
                    match (has_uv, has_normal) {
                        (false, false) => write!(out, " {v}")?,
                        (true, false) => write!(out, " {v}/{}", tex_coord_base + index)?,
                        (false, true) => write!(out, " {v}//{}", normal_base + index)?,
                        (true, true) => write!(
                            out,
                            " {v}/{}/{}",
                            tex_coord_base + index,
                            normal_base + index
                        )?,
                    }
                }
                writeln!(out)?;
            }
        }

        position_base += mesh.positions.len();
        tex_coord_base += mesh.tex_coords.len();
        normal_base += mesh.normals.len();
    }
    Ok(())
}

fn write_mtl(materials: &[Material], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create MTL file: {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_mtl_to(materials, &mut out)
        .and_then(|()| out.flush())
        .with_context(|| format!("Failed to write MTL file: {}", path.display()))
}

fn write_mtl_to<W: Write>(materials: &[Material], out: &mut W) -> std::io::Result<()> {
    for (i, material) in materials.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "newmtl {}", material.name)?;
        for property in &material.properties {
            match &property.value {
                PropertyValue::Color([r, g, b, _]) => {
                    if let Some(key) = color_key(&property.name) {
                        writeln!(out, "{key} {r} {g} {b}")?;
                    }
                }
                PropertyValue::Float(value) => {
                    if property.name == "illum" {
                        writeln!(out, "illum {}", value.round())?;
                    } else if let Some(key) = scalar_key(&property.name) {
                        writeln!(out, "{key} {value}")?;
                    }
                }
                PropertyValue::Texture(sampler) => {
                    let Some(key) = map_key(&property.name) else {
                        continue;
                    };
                    match texture_reference(sampler) {
                        Some(reference) => writeln!(out, "{key} {reference}")?,
                        None => log::debug!(
                            "skipping embedded texture {} of material {}",
                            property.name,
                            material.name
                        ),
                    }
                }
                PropertyValue::String(value) if is_mtl_key(&property.name) => {
                    writeln!(out, "{} {value}", property.name)?;
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn color_key(name: &str) -> Option<&'static str> {
    match name {
        "ambient" => Some("Ka"),
        "baseColor" => Some("Kd"),
        "specular" => Some("Ks"),
        "emission" => Some("Ke"),
        _ => None,
    }
}

fn scalar_key(name: &str) -> Option<&'static str> {
    match name {
        "specularExponent" => Some("Ns"),
        "opacity" => Some("d"),
        "materialIndexOfRefraction" => Some("Ni"),
        "roughness" => Some("Pr"),
        "metallic" => Some("Pm"),
        _ => None,
    }
}

fn map_key(name: &str) -> Option<&'static str> {
    match name {
        "ambient" => Some("map_Ka"),
        "baseColor" => Some("map_Kd"),
        "specular" => Some("map_Ks"),
        "specularExponent" => Some("map_Ns"),
        "opacity" => Some("map_d"),
        "emission" => Some("map_Ke"),
        "tangentSpaceNormal" => Some("norm"),
        "roughness" => Some("map_Pr"),
        "metallic" => Some("map_Pm"),
        _ => None,
    }
}

/// Unrecognised MTL statements survive a round trip as string properties
fn is_mtl_key(name: &str) -> bool {
    !name.is_empty() && !name.contains(char::is_whitespace)
}

/// Image path to write into the MTL, absolute where possible so it still
/// resolves from the output directory
fn texture_reference(sampler: &TextureSampler) -> Option<String> {
    let url = sampler.url()?;
    let resolved = std::fs::canonicalize(url).unwrap_or_else(|_| url.into());
    Some(resolved.display().to_string())
}
