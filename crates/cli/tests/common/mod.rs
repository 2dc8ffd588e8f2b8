//! Shared helpers for `labelgen` CLI tests.

#![allow(unreachable_pub)]

use std::path::PathBuf;
use std::process::Command;

use assert_cmd::cargo;
use tempfile::TempDir;

pub fn labelgen_cmd() -> Command {
    Command::new(cargo::cargo_bin!("labelgen"))
}

/// Write `contents` to `name` inside `dir` and return the full path.
#[allow(dead_code)]
pub fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write temp file");
    path
}

/// 50×30 mm label with one uppercase name field and a counter.
#[allow(dead_code)]
pub const NAME_DESIGN: &str = r#"{
  "width_mm": 50,
  "height_mm": 30,
  "elements": [
    {"id": "nombre", "type": "text", "x": 5, "y": 5, "width": 40, "height": 5,
     "binding": "{{MAYUS(nombre)}}", "font_size": 10},
    {"id": "serie", "type": "text", "x": 5, "y": 15, "width": 40, "height": 5,
     "binding": "{{CONTADOR(1, 1, 3)}}"}
  ]
}"#;

/// A design that trips an expression error, a layout warning and an info.
#[allow(dead_code)]
pub const BROKEN_DESIGN: &str = r#"{
  "width_mm": 40,
  "height_mm": 20,
  "elements": [
    {"id": "titulo", "type": "text", "x": 2, "y": 2, "width": 30, "height": 5,
     "binding": "{{MAYUSCULAS(nombre)}}"},
    {"id": "ancho", "type": "text", "x": 20, "y": 10, "width": 30, "height": 5,
     "binding": "nombre"},
    {"id": "vacio", "type": "qr", "x": 2, "y": 10, "width": 8, "height": 8}
  ]
}"#;

/// Field data of every `^FD…^FS` in `zpl`.
#[allow(dead_code)]
pub fn field_data(zpl: &str) -> Vec<&str> {
    zpl.split("^FD")
        .skip(1)
        .filter_map(|rest| rest.split_once("^FS").map(|(data, _)| data))
        .collect()
}
