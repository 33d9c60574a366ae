//! Integration tests for the mdlconv binary
//!
//! Each test runs the real executable against files in a temporary directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a CLI command
fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mdlconv"))
}

const CUBE_OBJ: &str = "mtllib cube.mtl
o Cube
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
usemtl Wood
f 1/1 2/2 3/3 4/4
";

const CUBE_MTL: &str = "newmtl Wood
Kd 0.8 0.6 0.4
map_Kd wood.png
";

/// Write `cube.obj`, `cube.mtl` and a 2x2 `wood.png` into `dir`
fn write_cube(dir: &Path) {
    fs::write(dir.join("cube.obj"), CUBE_OBJ).unwrap();
    fs::write(dir.join("cube.mtl"), CUBE_MTL).unwrap();
    let texture = image::RgbaImage::new(2, 2);
    texture.save(dir.join("wood.png")).unwrap();
}

// ============ DEFAULT DISPATCH ============

#[test]
fn test_no_arguments_prints_help() {
    cli()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_three_files_prints_help() {
    cli()
        .args(["a.obj", "b.obj", "c.obj"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mdlconv"));
}

// ============ GRAPH COMMAND ============

#[test]
fn test_graph_single_file() {
    let dir = TempDir::new().unwrap();
    write_cube(dir.path());

    cli()
        .current_dir(dir.path())
        .arg("cube.obj")
        .assert()
        .success()
        .stdout(
            "[Mesh]Cube\n  [Material]Wood\n    [texture]baseColor\n      [FileTexture]wood.png\n",
        );
}

#[test]
fn test_graph_subcommand_matches_default() {
    let dir = TempDir::new().unwrap();
    write_cube(dir.path());

    let implicit = cli()
        .current_dir(dir.path())
        .arg("cube.obj")
        .output()
        .unwrap();
    let explicit = cli()
        .current_dir(dir.path())
        .args(["graph", "cube.obj"])
        .output()
        .unwrap();

    assert!(explicit.status.success());
    assert_eq!(implicit.stdout, explicit.stdout);
}

#[test]
fn test_graph_without_textures() {
    let dir = TempDir::new().unwrap();
    write_cube(dir.path());

    cli()
        .current_dir(dir.path())
        .args(["--no-textures", "cube.obj"])
        .assert()
        .success()
        .stdout("[Mesh]Cube\n  [Material]Wood\n    [texture]baseColor\n");
}

#[test]
fn test_graph_unknown_extension() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("scene.xyz");
    fs::write(&input, "not a model").unwrap();

    cli()
        .arg("graph")
        .arg(&input)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Unable to import"))
        .stderr(predicate::str::contains("import from unknown type not supported"));
}

#[test]
fn test_graph_broken_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.stl");
    fs::write(&input, "this is not an stl file").unwrap();

    cli()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Encountered error while loading"))
        .stderr(predicate::str::contains("Invalid STL data").not());
}

// ============ CONVERT COMMAND ============

#[test]
fn test_convert_obj_to_stl() {
    let dir = TempDir::new().unwrap();
    write_cube(dir.path());
    let output = dir.path().join("cube.stl");

    cli()
        .arg(dir.path().join("cube.obj"))
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    // one quad, two triangles
    let size = fs::metadata(&output).unwrap().len();
    assert_eq!(size, 84 + 50 * 2);
}

#[test]
fn test_convert_stl_to_obj_then_graph() {
    let dir = TempDir::new().unwrap();
    write_cube(dir.path());
    let stl = dir.path().join("cube.stl");
    let obj = dir.path().join("part.obj");

    cli()
        .arg("convert")
        .arg(dir.path().join("cube.obj"))
        .arg(&stl)
        .assert()
        .success();
    cli().arg("convert").arg(&stl).arg(&obj).assert().success();

    assert!(fs::read_to_string(&obj).unwrap().contains("o cube\n"));
    assert!(!dir.path().join("part.mtl").exists(), "STL has no materials");
    cli()
        .arg(&obj)
        .assert()
        .success()
        .stdout("[Mesh]cube\n");
}

#[test]
fn test_convert_unsupported_output() {
    let dir = TempDir::new().unwrap();
    write_cube(dir.path());
    let output = dir.path().join("cube.usdz");

    cli()
        .arg(dir.path().join("cube.obj"))
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unable to export as"))
        .stderr(predicate::str::contains(
            "export to Universal Scene Description Package not supported",
        ));

    assert!(!output.exists());
}

#[test]
fn test_convert_unknown_input() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.obj");

    cli()
        .arg(dir.path().join("scene.xyz"))
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unable to import"));

    assert!(!output.exists());
}

#[test]
fn test_convert_missing_input() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.stl");

    cli()
        .arg(dir.path().join("missing.obj"))
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Encountered error while loading"));

    assert!(!output.exists());
}

#[test]
fn test_global_flags_before_subcommand() {
    let dir = TempDir::new().unwrap();
    write_cube(dir.path());

    cli()
        .current_dir(dir.path())
        .args(["-v", "convert", "cube.obj", "cube.stl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:").not())
        .stderr(predicate::str::contains("Converted"));
    assert!(dir.path().join("cube.stl").exists());

    cli()
        .current_dir(dir.path())
        .args(["-q", "graph", "cube.obj"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[Mesh]Cube\n"));

    cli()
        .current_dir(dir.path())
        .args(["--no-textures", "graph", "cube.obj"])
        .assert()
        .success()
        .stdout("[Mesh]Cube\n  [Material]Wood\n    [texture]baseColor\n");
}

#[test]
fn test_quiet_and_verbose_conflict() {
    cli().args(["-q", "-v", "cube.obj"]).assert().failure();
}

// ============ FORMATS COMMAND ============

#[test]
fn test_formats_table() {
    cli()
        .arg("formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wavefront Object"))
        .stdout(predicate::str::contains("Library imports:"))
        .stdout(predicate::str::contains("gltf"));
}

#[test]
fn test_formats_json() {
    let output = cli().args(["formats", "--json"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let formats = json["formats"].as_array().unwrap();
    assert_eq!(formats.len(), 9);

    let obj = formats.iter().find(|f| f["extension"] == "obj").unwrap();
    assert_eq!(obj["id"], "OBJ");
    assert_eq!(obj["import"], true);
    assert_eq!(obj["export"], true);

    let ply = formats.iter().find(|f| f["extension"] == "ply").unwrap();
    assert_eq!(ply["import"], false);

    // the library loads glTF although the format table has no entry for it
    let imports = json["library"]["import"].as_array().unwrap();
    assert!(imports.iter().any(|e| e == "gltf"));
    assert!(!formats.iter().any(|f| f["extension"] == "gltf"));
}
