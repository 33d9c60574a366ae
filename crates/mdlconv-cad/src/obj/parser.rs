//! OBJ file parser
//!
//! Loads Wavefront OBJ files (and their MTL libraries) with the tobj crate
//! and builds the core scene model from them.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use mdlconv_core::{
    Asset, Material, MaterialId, MaterialProperty, Mesh, NodeKind, PropertyValue, SceneNode,
    Submesh, TextureSampler,
};

use crate::geometry::{append_attribute, chunked};

/// OBJ parser
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ObjParser;

impl ObjParser {
    /// Parse OBJ file from path
    ///
    /// Consecutive tobj models with the same name (tobj splits an object at
    /// every `usemtl`) become one mesh node with one submesh per material
    /// run. With `preserve_topology` polygons are kept as authored, otherwise
    /// they are triangulated.
    ///
    /// A missing or malformed MTL library is logged and the asset loads
    /// without materials.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened or contains invalid OBJ syntax.
    #[must_use = "parsing produces a result that should be handled"]
    pub fn parse_file<P: AsRef<Path>>(path: P, preserve_topology: bool) -> Result<Asset> {
        let path = path.as_ref();

        let load_options = tobj::LoadOptions {
            triangulate: !preserve_topology,
            single_index: true,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        };

        let (models, materials) = tobj::load_obj(path, &load_options)
            .with_context(|| format!("Failed to parse OBJ file: {}", path.display()))?;

        let materials = materials.unwrap_or_else(|e| {
            log::warn!(
                "Failed to load MTL materials for OBJ file {}: {e}",
                path.display()
            );
            Vec::new()
        });

        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let mut asset = Asset::new();
        for material in &materials {
            asset.add_material(convert_material(material, base_dir));
        }

        for model in &models {
            let material = model
                .mesh
                .material_id
                .filter(|&id| id < asset.materials.len())
                .map(MaterialId);
            let submesh_name = material
                .and_then(|id| asset.material(id))
                .map(|m| m.name.clone())
                .unwrap_or_default();
            let continues_previous = asset
                .nodes
                .last()
                .is_some_and(|node| node.name == model.name && node.as_mesh().is_some());
            if !continues_previous {
                let node = SceneNode::mesh(model.name.clone(), Mesh::default());
                asset.nodes.push(node);
            }
            if let Some(NodeKind::Mesh(mesh)) = asset.nodes.last_mut().map(|node| &mut node.kind) {
                append_model(mesh, &model.mesh, submesh_name, material)?;
            }
        }

        log::debug!(
            "parsed OBJ {}: {} model(s) into {} node(s), {} material(s)",
            path.display(),
            models.len(),
            asset.nodes.len(),
            asset.materials.len()
        );
        Ok(asset)
    }
}

fn append_model(
    mesh: &mut Mesh,
    source: &tobj::Mesh,
    name: String,
    material: Option<MaterialId>,
) -> Result<()> {
    let base = mesh.positions.len();
    let offset = u32::try_from(base).context("OBJ mesh is too large")?;
    let indices = offset_indices(&source.indices, offset)?;

    let count = source.positions.len() / 3;
    mesh.positions.extend(chunked::<3>(&source.positions));
    let normals = chunked::<3>(&source.normals);
    let tex_coords = chunked::<2>(&source.texcoords);
    append_attribute(&mut mesh.normals, normals, base, count);
    append_attribute(&mut mesh.tex_coords, tex_coords, base, count);

    mesh.submeshes.push(Submesh {
        name,
        indices,
        face_arities: source.face_arities.clone(),
        material,
    });
    Ok(())
}

/// Shift model-local indices past the vertices already in the mesh
fn offset_indices(indices: &[u32], offset: u32) -> Result<Vec<u32>> {
    indices
        .iter()
        .map(|&i| i.checked_add(offset))
        .collect::<Option<Vec<_>>>()
        .context("OBJ vertex index exceeds u32")
}

fn color(rgb: [f32; 3]) -> PropertyValue {
    PropertyValue::Color([rgb[0], rgb[1], rgb[2], 1.0])
}

/// Image path from an MTL map statement, which may carry options
/// (`-s 1 1 1 wood.png`) before the file name
fn map_file(statement: &str) -> &str {
    let statement = statement.trim();
    if statement.starts_with('-') {
        statement.split_whitespace().last().unwrap_or(statement)
    } else {
        statement
    }
}

fn texture(map: &str, base_dir: &Path) -> PropertyValue {
    let path: PathBuf = base_dir.join(map_file(map));
    PropertyValue::Texture(TextureSampler::file(path.display().to_string(), path))
}

/// Texture if the map is set, else the scalar/color value
fn texture_or(
    map: Option<&String>,
    value: Option<PropertyValue>,
    base_dir: &Path,
) -> Option<PropertyValue> {
    map.map(|map| texture(map, base_dir)).or(value)
}

fn convert_material(source: &tobj::Material, base_dir: &Path) -> Material {
    let mut material = Material::new(source.name.clone());
    let mut push = |name: &str, value: Option<PropertyValue>| {
        if let Some(value) = value {
            material.properties.push(MaterialProperty::new(name, value));
        }
    };

    push(
        "ambient",
        texture_or(
            source.ambient_texture.as_ref(),
            source.ambient.map(color),
            base_dir,
        ),
    );
    push(
        "baseColor",
        texture_or(
            source.diffuse_texture.as_ref(),
            source.diffuse.map(color),
            base_dir,
        ),
    );
    push(
        "specular",
        texture_or(
            source.specular_texture.as_ref(),
            source.specular.map(color),
            base_dir,
        ),
    );
    push(
        "specularExponent",
        texture_or(
            source.shininess_texture.as_ref(),
            source.shininess.map(PropertyValue::Float),
            base_dir,
        ),
    );
    push(
        "opacity",
        texture_or(
            source.dissolve_texture.as_ref(),
            source.dissolve.map(PropertyValue::Float),
            base_dir,
        ),
    );
    push(
        "tangentSpaceNormal",
        source
            .normal_texture
            .as_ref()
            .map(|map| texture(map, base_dir)),
    );
    push(
        "materialIndexOfRefraction",
        source.optical_density.map(PropertyValue::Float),
    );
    push(
        "illum",
        source
            .illumination_model
            .map(|model| PropertyValue::Float(f32::from(model))),
    );

    let mut unknown: Vec<(&String, &String)> = source.unknown_param.iter().collect();
    unknown.sort();
    for (key, value) in unknown {
        push(key.as_str(), Some(PropertyValue::String(value.clone())));
    }
    material
}
