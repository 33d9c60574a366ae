//! Orchestration Tests
//!
//! Exercises `ops::graph` and `ops::convert` against a recording library:
//! - Capability checks happen before any load or export
//! - Library failures map to the generic import/export errors
//! - The output model receives the loaded asset unchanged
//! - The extension table and the library's oracle may disagree

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use mdlconv_core::{
    ops, Asset, AssetLibrary, LoadOptions, Material, Mesh, Model, ModelError, ModelFormat,
    PropertyValue, SceneNode, Submesh, Texture, TextureKind, TextureSampler,
};

/// Library that answers from fixed extension lists and records every call
struct RecordingLibrary {
    imports: &'static [&'static str],
    exports: &'static [&'static str],
    fail_load: bool,
    fail_export: bool,
    asset: Asset,
    loads: Cell<usize>,
    exports_done: RefCell<Vec<(PathBuf, Asset)>>,
    texture_passes: Cell<usize>,
}

impl RecordingLibrary {
    fn new(imports: &'static [&'static str], exports: &'static [&'static str]) -> Self {
        Self {
            imports,
            exports,
            fail_load: false,
            fail_export: false,
            asset: cube_scene(),
            loads: Cell::new(0),
            exports_done: RefCell::new(Vec::new()),
            texture_passes: Cell::new(0),
        }
    }

    fn export_count(&self) -> usize {
        self.exports_done.borrow().len()
    }
}

impl AssetLibrary for RecordingLibrary {
    fn can_import_extension(&self, extension: &str) -> bool {
        self.imports.contains(&extension)
    }

    fn can_export_extension(&self, extension: &str) -> bool {
        self.exports.contains(&extension)
    }

    fn import_extensions(&self) -> &[&'static str] {
        self.imports
    }

    fn export_extensions(&self) -> &[&'static str] {
        self.exports
    }

    fn load_asset(&self, _path: &Path, _options: &LoadOptions) -> anyhow::Result<Asset> {
        self.loads.set(self.loads.get() + 1);
        if self.fail_load {
            anyhow::bail!("corrupt header at byte 12");
        }
        Ok(self.asset.clone())
    }

    fn load_textures(&self, asset: &mut Asset) -> usize {
        self.texture_passes.set(self.texture_passes.get() + 1);
        let mut resolved = 0;
        for sampler in asset.texture_samplers_mut() {
            sampler.texture = Some(Texture {
                kind: TextureKind::File,
                width: 2,
                height: 2,
            });
            resolved += 1;
        }
        resolved
    }

    fn export_asset(&self, asset: &Asset, path: &Path) -> anyhow::Result<()> {
        if self.fail_export {
            anyhow::bail!("read-only file system");
        }
        self.exports_done
            .borrow_mut()
            .push((path.to_path_buf(), asset.clone()));
        Ok(())
    }
}

/// One mesh `Cube` whose submesh uses `Mat1` with a `diffuse` texture
fn cube_scene() -> Asset {
    let mut asset = Asset::new();
    let material = asset.add_material(Material::new("Mat1").with_property(
        "diffuse",
        PropertyValue::Texture(TextureSampler::file(
            "scene.usdz[0/wood.png]",
            "scene.usdz",
        )),
    ));
    let mesh = Mesh {
        positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        submeshes: vec![Submesh {
            indices: vec![0, 1, 2],
            material: Some(material),
            ..Submesh::default()
        }],
        ..Mesh::default()
    };
    asset.nodes.push(SceneNode::mesh("Cube", mesh));
    asset
}

fn graph_output(library: &RecordingLibrary, input: &str) -> Result<String, ModelError> {
    let mut out = Vec::new();
    ops::graph(library, input, &LoadOptions::default(), &mut out)?;
    Ok(String::from_utf8(out).expect("printer writes UTF-8"))
}

// ============================================================================
// Convert
// ============================================================================

#[test]
fn test_convert_obj_to_usdz() {
    let library = RecordingLibrary::new(&["obj"], &["usdz"]);

    ops::convert(&library, "scene.obj", "scene.usdz", &LoadOptions::default())
        .expect("conversion succeeds");

    assert_eq!(library.loads.get(), 1);
    let exports = library.exports_done.borrow();
    assert_eq!(exports.len(), 1);
    assert_eq!(exports[0].0, PathBuf::from("scene.usdz"));
    assert_eq!(exports[0].1.nodes[0].name, "Cube");
}

#[test]
fn test_convert_passes_asset_through() {
    let library = RecordingLibrary::new(&["obj"], &["stl"]);
    ops::convert(&library, "in.obj", "out.stl", &LoadOptions::default()).unwrap();

    let mut expected = cube_scene();
    library.load_textures(&mut expected);
    assert_eq!(library.exports_done.borrow()[0].1, expected);
}

#[test]
fn test_convert_unknown_input_never_loads() {
    let library = RecordingLibrary::new(&["obj"], &["usdz"]);

    let err = ops::convert(&library, "scene.xyz", "scene.usdz", &LoadOptions::default())
        .unwrap_err();

    assert!(matches!(
        err,
        ModelError::UnsupportedImportFormat {
            format: ModelFormat::Unknown,
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "Unable to import scene.xyz: import from unknown type not supported"
    );
    assert_eq!(library.loads.get(), 0);
    assert_eq!(library.export_count(), 0);
}

#[test]
fn test_convert_unsupported_output_never_loads() {
    let library = RecordingLibrary::new(&["obj"], &["stl"]);

    let err = ops::convert(&library, "scene.obj", "scene.abc", &LoadOptions::default())
        .unwrap_err();

    assert!(err.is_unsupported());
    assert_eq!(
        err.to_string(),
        "Unable to export as scene.abc: export to Alembic not supported"
    );
    assert_eq!(library.loads.get(), 0);
    assert_eq!(library.export_count(), 0);
}

#[test]
fn test_convert_checks_import_first() {
    let library = RecordingLibrary::new(&[], &[]);
    let err = ops::convert(&library, "a.xyz", "b.qqq", &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, ModelError::UnsupportedImportFormat { .. }));
}

#[test]
fn test_convert_load_failure_hides_detail() {
    let mut library = RecordingLibrary::new(&["obj"], &["stl"]);
    library.fail_load = true;

    let err = ops::convert(&library, "broken.obj", "out.stl", &LoadOptions::default())
        .unwrap_err();

    assert!(matches!(err, ModelError::ImportFailed { .. }));
    assert_eq!(err.to_string(), "Encountered error while loading broken.obj");
    assert_eq!(library.loads.get(), 1);
    assert_eq!(library.export_count(), 0);
}

#[test]
fn test_convert_export_failure() {
    let mut library = RecordingLibrary::new(&["obj"], &["stl"]);
    library.fail_export = true;

    let err = ops::convert(&library, "in.obj", "locked/out.stl", &LoadOptions::default())
        .unwrap_err();

    assert!(matches!(err, ModelError::ExportFailed { .. }));
    assert_eq!(err.to_string(), "Export to locked/out.stl failed");
}

// ============================================================================
// Graph
// ============================================================================

#[test]
fn test_graph_prints_cube_tree() {
    let library = RecordingLibrary::new(&["usdz"], &[]);

    let output = graph_output(&library, "scene.usdz").unwrap();

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "[Mesh]Cube",
            "  [Material]Mat1",
            "    [texture]diffuse",
            "      [FileTexture][0/wood.png]",
        ]
    );
    assert_eq!(library.export_count(), 0);
}

#[test]
fn test_graph_without_texture_loading() {
    let library = RecordingLibrary::new(&["usdz"], &[]);
    let mut out = Vec::new();

    ops::graph(
        &library,
        "scene.usdz",
        &LoadOptions::default().with_textures(false),
        &mut out,
    )
    .unwrap();

    assert_eq!(library.texture_passes.get(), 0);
    let output = String::from_utf8(out).unwrap();
    assert!(output.ends_with("    [texture]diffuse\n"));
}

#[test]
fn test_graph_unknown_input_never_loads() {
    let library = RecordingLibrary::new(&["obj"], &[]);

    let err = graph_output(&library, "scene.xyz").unwrap_err();

    assert!(err.is_unsupported());
    assert_eq!(library.loads.get(), 0);
}

// ============================================================================
// Format table vs. library oracle
// ============================================================================

#[test]
fn test_oracle_accepts_extension_table_calls_unknown() {
    let library = RecordingLibrary::new(&["gltf"], &[]);
    let model = Model::new("scene.gltf");

    assert_eq!(model.format(), ModelFormat::Unknown);
    assert!(model.can_import(&library));
    assert!(graph_output(&library, "scene.gltf").is_ok());
}

#[test]
fn test_oracle_rejects_extension_table_knows() {
    let library = RecordingLibrary::new(&["obj"], &["stl"]);

    let err = ops::convert(&library, "scene.obj", "scene.dae", &LoadOptions::default())
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Unable to export as scene.dae: export to Collada not supported"
    );
}

#[test]
fn test_capability_queries_are_stable() {
    let library = RecordingLibrary::new(&["obj"], &["stl"]);
    for _ in 0..3 {
        assert!(Model::new("x.obj").can_import(&library));
        assert!(!Model::new("x.OBJ").can_import(&library));
        assert!(Model::new("x.stl").can_export(&library));
    }
    assert_eq!(library.loads.get(), 0);
}
