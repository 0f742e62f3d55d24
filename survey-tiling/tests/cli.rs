//! Both binaries driven as a user would run them.

use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const NORMALIZE: &str = env!("CARGO_BIN_EXE_normalize-metadata");
const BUILD_TILESET: &str = env!("CARGO_BIN_EXE_build-tileset");

fn run(bin: &str, args: &[&Path]) -> Output {
    Command::new(bin)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn sensor_export(len: usize) -> Value {
    Value::Array(
        (0..len)
            .map(|i| {
                json!({
                    "ImageName": format!("gasse_{:04}.jpg", i + 1),
                    "X-Sensor": 401_200.0 + i as f64 * 2.0,
                    "Y-Sensor": 5_701_500.0 - i as f64 * 4.0,
                    "Z-Sensor": 58.0,
                    "H-Sensor": 190.0,
                    "P-Sensor": 0.0,
                    "R-Sensor": 0.0
                })
            })
            .collect(),
    )
}

#[test]
fn wrong_argument_count_prints_usage() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.json");
    let c = dir.path().join("c.json");

    for bin in [NORMALIZE, BUILD_TILESET] {
        for args in [vec![], vec![a.as_path()], vec![a.as_path(), b.as_path(), c.as_path()]] {
            let output = run(bin, &args);
            assert!(!output.status.success(), "{bin} {args:?} should fail");
            assert!(stderr(&output).contains("Usage"), "{}", stderr(&output));
        }
    }
}

#[test]
fn unsupported_record_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("raw.json");
    fs::write(&source, r#"[{"name": "img_000001.jpg"}]"#).unwrap();

    let destination = dir.path().join("canonical.json");
    let output = run(NORMALIZE, &[&source, &destination]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("not supported"), "{}", stderr(&output));
    assert!(!destination.exists());

    let tileset = dir.path().join("tileset.json");
    let output = Command::new(BUILD_TILESET)
        .arg("--raw")
        .args([&source, &tileset])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(!tileset.exists());
}

#[test]
fn normalize_then_tile() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("raw.json");
    fs::write(&source, sensor_export(30).to_string()).unwrap();

    let canonical = dir.path().join("canonical.json");
    let output = run(NORMALIZE, &[&source, &canonical]);
    assert!(output.status.success(), "{}", stderr(&output));
    let records: Value = serde_json::from_str(&fs::read_to_string(&canonical).unwrap()).unwrap();
    assert_eq!(records.as_array().unwrap().len(), 30);
    assert_eq!(records[0]["index"], 1);

    let tileset = dir.path().join("tileset.json");
    let output = run(BUILD_TILESET, &[&canonical, &tileset]);
    assert!(output.status.success(), "{}", stderr(&output));
    let document: Value = serde_json::from_str(&fs::read_to_string(&tileset).unwrap()).unwrap();
    assert_eq!(document["asset"]["version"], "1.0");
    assert_eq!(document["root"]["refine"], "ADD");
}

#[test]
fn invalid_utm_zone_is_rejected() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("raw.json");
    fs::write(&source, sensor_export(2).to_string()).unwrap();
    let destination = dir.path().join("canonical.json");

    let output = Command::new(NORMALIZE)
        .args(["--utm-zone", "61"])
        .args([&source, &destination])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("utm-zone"), "{}", stderr(&output));
    assert!(!destination.exists());
}
