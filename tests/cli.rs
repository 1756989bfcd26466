use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn write_obj() -> NamedTempFile {
    let obj = r#"# unit quad split in two triangles
v -1 0 -1
v 1 0 -1
v 1 0 1
v -1 0 1
vn 0 1 0
f 1//1 3//1 2//1
f 1//1 4//1 3//1
"#;
    let mut tmp = NamedTempFile::new().expect("temp obj");
    tmp.write_all(obj.as_bytes()).expect("write obj");
    tmp
}

fn orbit_lab() -> Command {
    Command::cargo_bin("orbit-lab").expect("binary exists")
}

#[test]
fn summary_describes_the_default_scene() {
    orbit_lab()
        .arg("--summary-only")
        .assert()
        .success()
        .stdout(contains("Scene: primitive sphere, shader phong, wireframe off"))
        .stdout(contains(
            "Camera: eye (0.00, 0.00, 5.00) at (0.00, 0.00, 0.00) up (0.00, 1.00, 0.00) fovy 45.0",
        ))
        .stdout(contains("Lights: 1 of 3 active (1 uploaded)"))
        .stdout(contains("Draws: 3"))
        .stdout(contains(" - plane phong triangles"));
}

#[test]
fn summary_applies_shader_and_wireframe_flags() {
    orbit_lab()
        .args(["--summary-only", "--shader", "gouraud", "--wireframe"])
        .assert()
        .success()
        .stdout(contains("shader gouraud, wireframe on"))
        .stdout(contains(" - sphere gouraud lines"))
        .stdout(contains(" - sphere marker lines"))
        .stdout(contains("triangles").not());
}

#[test]
fn summary_loads_an_obj_model() {
    let obj = write_obj();
    orbit_lab()
        .arg("--mesh")
        .arg(obj.path())
        .arg("--summary-only")
        .assert()
        .success()
        .stdout(contains("Model: 4 vertices"))
        .stdout(contains("Scene: primitive model"))
        .stdout(contains(" - model phong triangles"));
}

#[test]
fn unreadable_model_falls_back_to_a_cube() {
    orbit_lab()
        .args(["--mesh", "does-not-exist.obj", "--summary-only"])
        .assert()
        .success()
        .stdout(contains("Model: cube fallback"));
}

#[test]
fn unknown_argument_prints_usage() {
    orbit_lab()
        .arg("--fullscreen")
        .assert()
        .failure()
        .stderr(contains("Unknown argument: --fullscreen"))
        .stderr(contains("Usage: orbit-lab"));
}
