#![allow(dead_code)]

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

/// Writes a completed case directory with its parameter record and tallies.
pub fn write_case(root: &Path, name: &str, params: Value, tallies: Option<Value>) {
    let dir = root.join("cases").join(name);
    fs::create_dir_all(&dir).expect("case dir");
    fs::write(
        dir.join("params.json"),
        serde_json::to_vec_pretty(&params).expect("params json"),
    )
    .expect("write params");
    if let Some(tallies) = tallies {
        fs::write(
            dir.join("tallies.json"),
            serde_json::to_vec(&tallies).expect("tallies json"),
        )
        .expect("write tallies");
    }
}

/// Two cases whose k values are 1.2 and 0.8.
pub fn seed_two_cases(root: &Path) {
    write_case(
        root,
        "case_0001",
        json!({"temp": 1, "pressure": 5}),
        Some(json!({"absorption": [1.0, 1.5], "fission": [0.5], "nu-fission": [1.5, 1.5]})),
    );
    write_case(
        root,
        "case_0002",
        json!({"temp": 2, "pressure": 5}),
        Some(json!({"absorption": [2.0, 3.0], "fission": [1.0], "nu-fission": [4.0]})),
    );
}
