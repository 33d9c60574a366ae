//! In-memory scene representation
//!
//! An [`Asset`] is what an asset library produces from a model file: an
//! ordered list of top-level [`SceneNode`] trees plus the materials their
//! submeshes reference.
//!
//! Nodes own their children exactly once, so the hierarchy cannot contain
//! cycles. Materials live in the asset and are referenced from submeshes by
//! [`MaterialId`], which lets several submeshes share one material.

use std::fmt;
use std::path::{Path, PathBuf};

/// Index of a material inside its [`Asset`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub usize);

/// A loaded scene
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Asset {
    /// Top-level nodes, in file order
    pub nodes: Vec<SceneNode>,
    /// Materials referenced by submeshes
    pub materials: Vec<Material>,
}

impl Asset {
    /// Create an empty asset
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of top-level nodes
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    /// Top-level node at `index`
    #[inline]
    #[must_use]
    pub fn node(&self, index: usize) -> Option<&SceneNode> {
        self.nodes.get(index)
    }

    /// Material referenced by `id`
    #[inline]
    #[must_use]
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    /// Add a material and return its id
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    /// Visit every node depth-first in pre-order, with its depth
    ///
    /// Top-level nodes have depth 0.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.nodes.iter().rev().map(|node| (0, node)).collect(),
        }
    }

    /// All mesh nodes in pre-order
    pub fn meshes(&self) -> impl Iterator<Item = (&SceneNode, &Mesh)> {
        self.walk()
            .filter_map(|(_, node)| node.as_mesh().map(|mesh| (node, mesh)))
    }

    /// Mutable access to every texture sampler of every material
    pub fn texture_samplers_mut(&mut self) -> impl Iterator<Item = &mut TextureSampler> {
        self.materials
            .iter_mut()
            .flat_map(|material| material.properties.iter_mut())
            .filter_map(|property| match &mut property.value {
                PropertyValue::Texture(sampler) => Some(sampler),
                _ => None,
            })
    }
}

/// Pre-order iterator over an asset's node trees
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<(usize, &'a SceneNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a SceneNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}

/// Runtime kind of a scene node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Transform-only node
    Object,
    /// Node carrying mesh geometry
    Mesh(Mesh),
}

/// A node of the scene hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    /// Node name (not guaranteed unique)
    pub name: String,
    /// What the node carries
    pub kind: NodeKind,
    /// Child nodes, in file order
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Create a plain object node
    #[must_use]
    pub fn object(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Object,
            children: Vec::new(),
        }
    }

    /// Create a mesh node
    #[must_use]
    pub fn mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Mesh(mesh),
            children: Vec::new(),
        }
    }

    /// Builder-style child append
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Mesh data if this is a mesh node
    #[inline]
    #[must_use]
    pub const fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            NodeKind::Object => None,
        }
    }

    /// Type name shown by the object graph printer
    #[inline]
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Object => "Object",
            NodeKind::Mesh(_) => "Mesh",
        }
    }
}

/// Vertex data shared by a mesh's submeshes
///
/// Attributes are single-indexed: `normals` and `tex_coords` are either empty
/// or as long as `positions`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates
    pub tex_coords: Vec<[f32; 2]>,
    /// Index ranges drawn with one material each
    pub submeshes: Vec<Submesh>,
}

impl Mesh {
    /// Number of vertices
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles across all submeshes after fan triangulation
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.triangles().count()).sum()
    }
}

/// A run of faces sharing at most one material
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submesh {
    /// Submesh name (may be empty)
    pub name: String,
    /// Vertex indices into the parent mesh, face after face
    pub indices: Vec<u32>,
    /// Vertices per face; empty means every face is a triangle
    pub face_arities: Vec<u32>,
    /// Material shared from the asset, if any
    pub material: Option<MaterialId>,
}

impl Submesh {
    /// Faces as index slices, polygons kept intact
    pub fn faces(&self) -> Box<dyn Iterator<Item = &[u32]> + '_> {
        if self.face_arities.is_empty() {
            return Box::new(self.indices.chunks_exact(3));
        }
        let mut rest = self.indices.as_slice();
        Box::new(self.face_arities.iter().map_while(move |&arity| {
            let arity = arity as usize;
            if arity > rest.len() {
                return None;
            }
            let (face, tail) = rest.split_at(arity);
            rest = tail;
            Some(face)
        }))
    }

    /// Faces fan-triangulated into index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.faces().flat_map(|face| {
            (1..face.len().saturating_sub(1)).map(move |i| [face[0], face[i], face[i + 1]])
        })
    }
}

/// A named, ordered list of material properties
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    /// Material name
    pub name: String,
    /// Properties, in definition order
    pub properties: Vec<MaterialProperty>,
}

impl Material {
    /// Type name shown by the object graph printer
    pub const TYPE_NAME: &'static str = "Material";

    /// Create a material without properties
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Builder-style property append
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.push(MaterialProperty::new(name, value));
        self
    }

    /// First property with the given name
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&MaterialProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// A named, typed material attribute
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialProperty {
    /// Property name (semantic, e.g. `baseColor`)
    pub name: String,
    /// Typed value
    pub value: PropertyValue,
}

impl MaterialProperty {
    /// Create a property
    #[must_use]
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Type tag of the value
    #[inline]
    #[must_use]
    pub const fn property_type(&self) -> PropertyType {
        self.value.property_type()
    }

    /// Texture sampler, for `texture` properties
    #[inline]
    #[must_use]
    pub const fn texture_sampler(&self) -> Option<&TextureSampler> {
        match &self.value {
            PropertyValue::Texture(sampler) => Some(sampler),
            _ => None,
        }
    }

    /// String form of the value, for `string` and `texture` properties
    #[must_use]
    pub fn string_value(&self) -> Option<&str> {
        match &self.value {
            PropertyValue::String(s) => Some(s),
            PropertyValue::Texture(sampler) => Some(&sampler.display),
            _ => None,
        }
    }

    /// Location of the value, for `URL` and file-backed `texture` properties
    #[must_use]
    pub fn url_value(&self) -> Option<&Path> {
        match &self.value {
            PropertyValue::Url(url) => Some(url),
            PropertyValue::Texture(sampler) => sampler.url(),
            _ => None,
        }
    }
}

/// Value of a material property
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// No value
    None,
    /// Free-form string
    String(String),
    /// File location
    Url(PathBuf),
    /// Texture lookup
    Texture(TextureSampler),
    /// RGBA color
    Color([f32; 4]),
    /// Scalar
    Float(f32),
    /// 2-component vector
    Float2([f32; 2]),
    /// 3-component vector
    Float3([f32; 3]),
    /// 4-component vector
    Float4([f32; 4]),
    /// Column-major 4x4 matrix
    Matrix44([[f32; 4]; 4]),
    /// Opaque bytes
    Buffer(Vec<u8>),
    /// A value kind this crate does not model
    Unknown,
}

impl PropertyValue {
    /// Type tag of this value
    #[must_use]
    pub const fn property_type(&self) -> PropertyType {
        match self {
            Self::None => PropertyType::None,
            Self::String(_) => PropertyType::String,
            Self::Url(_) => PropertyType::Url,
            Self::Texture(_) => PropertyType::Texture,
            Self::Color(_) => PropertyType::Color,
            Self::Float(_) => PropertyType::Float,
            Self::Float2(_) => PropertyType::Float2,
            Self::Float3(_) => PropertyType::Float3,
            Self::Float4(_) => PropertyType::Float4,
            Self::Matrix44(_) => PropertyType::Matrix44,
            Self::Buffer(_) => PropertyType::Buffer,
            Self::Unknown => PropertyType::Unknown,
        }
    }
}

/// Type tag of a material property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    None,
    String,
    Url,
    Texture,
    Color,
    Float,
    Float2,
    Float3,
    Float4,
    Matrix44,
    Buffer,
    Unknown,
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::String => "string",
            Self::Url => "URL",
            Self::Texture => "texture",
            Self::Color => "color",
            Self::Float => "float",
            Self::Float2 => "float2",
            Self::Float3 => "float3",
            Self::Float4 => "float4",
            Self::Matrix44 => "matrix44",
            Self::Buffer => "buffer",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Where a texture's image data comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureSource {
    /// Image file on disk
    File(PathBuf),
    /// Image bytes carried inside the model file
    Embedded {
        /// Encoded image bytes
        bytes: Vec<u8>,
        /// MIME type, when the model file declares one
        mime_type: Option<String>,
    },
}

/// Reference from a material property to a texture image
///
/// The sampler resolves to a [`Texture`] only once the image has been
/// loaded; see `AssetLibrary::load_textures`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureSampler {
    /// Display string, as the model file names the image
    pub display: String,
    /// Image location
    pub source: TextureSource,
    /// Loaded texture resource
    pub texture: Option<Texture>,
}

impl TextureSampler {
    /// Sampler for an image file
    #[must_use]
    pub fn file(display: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            display: display.into(),
            source: TextureSource::File(path.into()),
            texture: None,
        }
    }

    /// Sampler for embedded image bytes
    #[must_use]
    pub fn embedded(display: impl Into<String>, bytes: Vec<u8>, mime_type: Option<String>) -> Self {
        Self {
            display: display.into(),
            source: TextureSource::Embedded { bytes, mime_type },
            texture: None,
        }
    }

    /// Attach a loaded texture
    #[must_use]
    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    /// File location of the image, if file-backed
    #[inline]
    #[must_use]
    pub fn url(&self) -> Option<&Path> {
        match &self.source {
            TextureSource::File(path) => Some(path),
            TextureSource::Embedded { .. } => None,
        }
    }

    /// The loaded texture, if any
    #[inline]
    #[must_use]
    pub const fn resolve(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }
}

/// Kind of a loaded texture resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// Read from an image file
    File,
    /// Decoded from bytes inside the model file
    Embedded,
}

/// A loaded texture resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Texture {
    /// Where the image came from
    pub kind: TextureKind,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Texture {
    /// Type name shown by the object graph printer
    #[inline]
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self.kind {
            TextureKind::File => "FileTexture",
            TextureKind::Embedded => "EmbeddedTexture",
        }
    }
}
