//! GLTF/GLB file parser
//!
//! Loads GLTF 2.0 files (both .gltf JSON and .glb binary) with the gltf crate
//! and builds the core scene model: the node hierarchy of the default scene,
//! triangle primitives as submeshes, and PBR materials with their textures.

use anyhow::{Context, Result};
use base64::Engine as _;
use std::collections::HashSet;
use std::path::Path;

use mdlconv_core::{
    Asset, Material, MaterialId, MaterialProperty, Mesh, PropertyValue, SceneNode, Submesh,
    TextureSampler,
};

use crate::geometry::append_attribute;

/// GLTF parser
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GltfParser;

impl GltfParser {
    /// Parse GLTF/GLB file from path
    ///
    /// Uses the default scene, else the first scene, else every node that is
    /// nobody's child. Unnamed nodes are called `Node <index>` and unnamed
    /// materials `Material <index>`. Non-triangle primitives are skipped.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened, contains invalid GLTF data, or
    /// its buffers cannot be loaded.
    #[must_use = "parsing produces a result that should be handled"]
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Asset> {
        let path = path.as_ref();

        let gltf::Gltf { document, blob } = gltf::Gltf::open(path)
            .with_context(|| format!("Failed to parse GLTF file: {}", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let buffers = gltf::import_buffers(&document, Some(base_dir), blob)
            .with_context(|| format!("Failed to load GLTF buffers: {}", path.display()))?;

        let import = Import {
            source: path,
            base_dir,
            buffers: &buffers,
        };

        let mut asset = Asset::new();
        for material in document.materials() {
            let index = material.index().unwrap_or(asset.materials.len());
            asset.add_material(import.material(index, &material));
        }

        let scene = document.default_scene();
        let roots: Vec<gltf::Node<'_>> = match scene.or_else(|| document.scenes().next()) {
            Some(scene) => scene.nodes().collect(),
            None => {
                let children: HashSet<usize> = document
                    .nodes()
                    .flat_map(|node| node.children().map(|child| child.index()))
                    .collect();
                document
                    .nodes()
                    .filter(|node| !children.contains(&node.index()))
                    .collect()
            }
        };

        let mut ancestors = HashSet::new();
        for root in roots {
            let node = import.node(&root, &mut ancestors)?;
            asset.nodes.push(node);
        }

        log::debug!(
            "parsed GLTF {}: {} root node(s), {} material(s)",
            path.display(),
            asset.nodes.len(),
            asset.materials.len()
        );
        Ok(asset)
    }
}

/// Per-file state shared by the conversion helpers
struct Import<'a> {
    source: &'a Path,
    base_dir: &'a Path,
    buffers: &'a [gltf::buffer::Data],
}

impl Import<'_> {
    fn node(&self, node: &gltf::Node<'_>, ancestors: &mut HashSet<usize>) -> Result<SceneNode> {
        let index = node.index();
        if !ancestors.insert(index) {
            anyhow::bail!("GLTF node {index} is its own ancestor");
        }

        let name = node
            .name()
            .map_or_else(|| format!("Node {index}"), String::from);
        let mut scene_node = match node.mesh() {
            Some(mesh) => SceneNode::mesh(name, self.mesh(&mesh)?),
            None => SceneNode::object(name),
        };
        for child in node.children() {
            scene_node.children.push(self.node(&child, ancestors)?);
        }

        ancestors.remove(&index);
        Ok(scene_node)
    }

    fn mesh(&self, mesh: &gltf::Mesh<'_>) -> Result<Mesh> {
        let mut out = Mesh::default();
        for primitive in mesh.primitives() {
            if !matches!(primitive.mode(), gltf::mesh::Mode::Triangles) {
                log::debug!(
                    "skipping {:?} primitive {} of mesh {}",
                    primitive.mode(),
                    primitive.index(),
                    mesh.index()
                );
                continue;
            }

            let reader = primitive.reader(|buffer| self.buffer_data(&buffer));
            let Some(positions) = reader.read_positions() else {
                continue;
            };

            let base = out.positions.len();
            out.positions.extend(positions);
            let count = out.positions.len() - base;
            append_attribute(
                &mut out.normals,
                reader.read_normals().into_iter().flatten(),
                base,
                count,
            );
            append_attribute(
                &mut out.tex_coords,
                reader
                    .read_tex_coords(0)
                    .map(|coords| coords.into_f32())
                    .into_iter()
                    .flatten(),
                base,
                count,
            );

            let offset = u32::try_from(base).context("GLTF mesh is too large")?;
            let len = out.positions.len();
            let end = u32::try_from(len).context("GLTF mesh is too large")?;
            let indices = match reader.read_indices() {
                Some(indices) => indices
                    .into_u32()
                    .map(|i| i.checked_add(offset))
                    .collect::<Option<Vec<_>>>()
                    .context("GLTF primitive index exceeds u32")?,
                None => (offset..end).collect(),
            };

            out.submeshes.push(Submesh {
                name: format!("Primitive {}", primitive.index()),
                indices,
                face_arities: Vec::new(),
                material: primitive.material().index().map(MaterialId),
            });
        }
        Ok(out)
    }

    fn buffer_data(&self, buffer: &gltf::Buffer<'_>) -> Option<&[u8]> {
        let data = self.buffers.get(buffer.index())?;
        Some(data.0.as_slice())
    }

    fn material(&self, index: usize, material: &gltf::Material<'_>) -> Material {
        let name = material
            .name()
            .map_or_else(|| format!("Material {index}"), String::from);
        let pbr = material.pbr_metallic_roughness();

        let mut properties = Vec::new();
        let base_color = pbr
            .base_color_texture()
            .and_then(|info| self.texture(&info.texture()))
            .unwrap_or(PropertyValue::Color(pbr.base_color_factor()));
        properties.push(MaterialProperty::new("baseColor", base_color));
        properties.push(MaterialProperty::new(
            "metallic",
            PropertyValue::Float(pbr.metallic_factor()),
        ));
        properties.push(MaterialProperty::new(
            "roughness",
            PropertyValue::Float(pbr.roughness_factor()),
        ));

        let maps = [
            (
                "metallicRoughness",
                pbr.metallic_roughness_texture().map(|info| info.texture()),
            ),
            (
                "tangentSpaceNormal",
                material.normal_texture().map(|info| info.texture()),
            ),
            (
                "ambientOcclusion",
                material.occlusion_texture().map(|info| info.texture()),
            ),
        ];
        for (property, texture) in maps {
            if let Some(value) = texture.and_then(|texture| self.texture(&texture)) {
                properties.push(MaterialProperty::new(property, value));
            }
        }

        let [r, g, b] = material.emissive_factor();
        let emission = material
            .emissive_texture()
            .and_then(|info| self.texture(&info.texture()))
            .unwrap_or(PropertyValue::Color([r, g, b, 1.0]));
        properties.push(MaterialProperty::new("emission", emission));

        Material { name, properties }
    }

    /// Texture property for `texture`, `None` if its image is unusable
    fn texture(&self, texture: &gltf::Texture<'_>) -> Option<PropertyValue> {
        let image = texture.source();
        match self.sampler(&image) {
            Ok(sampler) => Some(PropertyValue::Texture(sampler)),
            Err(e) => {
                log::warn!("Skipping GLTF image {}: {e:#}", image.index());
                None
            }
        }
    }

    fn sampler(&self, image: &gltf::Image<'_>) -> Result<TextureSampler> {
        let label = image
            .name()
            .map_or_else(|| image.index().to_string(), String::from);
        let embedded_display = format!("{}[{label}]", self.source.display());

        match image.source() {
            gltf::image::Source::View { view, mime_type } => {
                let data = self
                    .buffers
                    .get(view.buffer().index())
                    .context("Image buffer view points at a missing buffer")?;
                let bytes = view
                    .offset()
                    .checked_add(view.length())
                    .and_then(|end| data.0.get(view.offset()..end))
                    .context("Image buffer view is out of range")?;
                Ok(TextureSampler::embedded(
                    embedded_display,
                    bytes.to_vec(),
                    Some(mime_type.to_string()),
                ))
            }
            gltf::image::Source::Uri { uri, mime_type } => {
                if let Some(data_uri) = uri.strip_prefix("data:") {
                    let (header, payload) = data_uri.split_once(',').context("Malformed data URI")?;
                    let bytes = if header.ends_with(";base64") {
                        base64::engine::general_purpose::STANDARD
                            .decode(payload)
                            .context("Invalid base64 in data URI")?
                    } else {
                        payload.as_bytes().to_vec()
                    };
                    let mime_type = mime_type.map(String::from).or_else(|| {
                        header
                            .split(';')
                            .next()
                            .filter(|mime| !mime.is_empty())
                            .map(String::from)
                    });
                    Ok(TextureSampler::embedded(embedded_display, bytes, mime_type))
                } else {
                    let path = self.base_dir.join(uri);
                    Ok(TextureSampler::file(path.display().to_string(), path))
                }
            }
        }
    }
}
