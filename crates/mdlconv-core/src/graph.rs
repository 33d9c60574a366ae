//! Object graph printer
//!
//! Prints a loaded asset as an indented tree, one `[Type]name` line per
//! entry and two spaces of indentation per level:
//!
//! ```text
//! [Mesh]Cube
//!   [Material]Mat1
//!     [texture]diffuse
//!       [FileTexture]textures/wood.png
//! ```
//!
//! Mesh nodes list their submeshes' materials before their children. Only
//! `texture` properties of a material are printed; other property types are
//! skipped to keep the tree readable.

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::Path;

use crate::scene::{Asset, Material, Mesh, PropertyType, SceneNode, TextureSampler};

const INDENT: &str = "  ";

/// Print every top-level node of `asset` at level 0
///
/// `source` is the path the asset was loaded from; it is stripped from
/// texture display strings that embed it, either as given or in its
/// canonical absolute form.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn print_tree<W: Write + ?Sized>(asset: &Asset, source: &Path, out: &mut W) -> io::Result<()> {
    let mut sources = vec![source.to_string_lossy().into_owned()];
    if let Ok(canonical) = source.canonicalize() {
        sources.push(canonical.to_string_lossy().into_owned());
    }
    let mut printer = GraphPrinter {
        asset,
        sources,
        out,
    };
    for node in &asset.nodes {
        printer.format_node(node, 0)?;
    }
    printer.out.flush()
}

struct GraphPrinter<'a, W: Write + ?Sized> {
    asset: &'a Asset,
    sources: Vec<String>,
    out: &'a mut W,
}

impl<W: Write + ?Sized> GraphPrinter<'_, W> {
    fn line(&mut self, level: usize, type_name: &str, name: &str) -> io::Result<()> {
        writeln!(self.out, "{}[{type_name}]{name}", INDENT.repeat(level))
    }

    fn format_node(&mut self, node: &SceneNode, level: usize) -> io::Result<()> {
        self.line(level, node.type_name(), &node.name)?;
        if let Some(mesh) = node.as_mesh() {
            self.format_mesh(mesh, level)?;
        }
        for child in &node.children {
            self.format_node(child, level + 1)?;
        }
        Ok(())
    }

    fn format_mesh(&mut self, mesh: &Mesh, level: usize) -> io::Result<()> {
        let asset = self.asset;
        for submesh in &mesh.submeshes {
            let Some(material) = submesh.material.and_then(|id| asset.material(id)) else {
                continue;
            };
            self.format_material(material, level + 1)?;
        }
        Ok(())
    }

    fn format_material(&mut self, material: &Material, level: usize) -> io::Result<()> {
        self.line(level, Material::TYPE_NAME, &material.name)?;
        for property in &material.properties {
            let property_type = property.property_type();
            if property_type != PropertyType::Texture {
                continue;
            }
            self.line(level + 1, &property_type.to_string(), &property.name)?;
            let Some(sampler) = property.texture_sampler() else {
                continue;
            };
            let display = property.string_value().unwrap_or_default();
            self.format_texture(sampler, display, property.url_value(), level + 2)?;
        }
        Ok(())
    }

    fn format_texture(
        &mut self,
        sampler: &TextureSampler,
        display: &str,
        url: Option<&Path>,
        level: usize,
    ) -> io::Result<()> {
        let Some(texture) = sampler.resolve() else {
            return Ok(());
        };
        let name = texture_name(display, url, &self.sources);
        self.line(level, texture.type_name(), &name)
    }
}

/// Display name of a texture: its display string with the first occurrence
/// of the first matching model path removed, falling back to the URL's file
/// name.
fn texture_name<'a>(display: &'a str, url: Option<&'a Path>, sources: &[String]) -> Cow<'a, str> {
    if display.is_empty() {
        return url
            .and_then(Path::file_name)
            .map_or(Cow::Borrowed(""), |name| name.to_string_lossy());
    }
    let source = sources
        .iter()
        .find(|s| !s.is_empty() && display.contains(s.as_str()));
    match source {
        Some(source) => Cow::Owned(display.replacen(source.as_str(), "", 1)),
        None => Cow::Borrowed(display),
    }
}
