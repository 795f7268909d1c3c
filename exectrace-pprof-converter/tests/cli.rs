// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use exectrace_pprof::pprof::{deserialize_compressed_pprof, deserialize_pprof};
use std::path::Path;
use std::process::Command;

const TRACE: &str = r#"{
    "start_unix_nanos": 1700000000000000000,
    "stop_unix_nanos": 1700000000500000000,
    "events": [
        {"kind": "GoCreate", "goroutine": 1, "timestamp": 5, "stack_id": 0},
        {"kind": "CpuSample", "goroutine": 7, "timestamp": 10, "stack_id": 1},
        {"kind": "CPUSample", "goroutine": 8, "timestamp": 20, "stack_id": 1},
        {"kind": "UserLog", "goroutine": 8, "timestamp": 25, "stack_id": 0}
    ],
    "stacks": {
        "1": [
            {"pc": 4198400, "function": "sort.insertionSort", "file": "sort.go", "line": 12},
            {"pc": 4202496, "function": "main.main.func1", "file": "main.go", "line": 48}
        ]
    }
}"#;

fn converter(dir: &Path) -> Command {
    let input = dir.join("trace.json");
    std::fs::write(&input, TRACE).unwrap();
    let mut command = Command::new(env!("CARGO_BIN_EXE_exectrace-pprof-converter"));
    command.arg("--input").arg(input).current_dir(dir);
    command
}

#[test]
fn writes_compressed_profile_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let status = converter(dir.path()).status().unwrap();
    assert!(status.success());

    let encoded = std::fs::read(dir.path().join("trace.pprof")).unwrap();
    let profile = deserialize_compressed_pprof(&encoded).unwrap();
    assert_eq!(1_700_000_000_000_000_000, profile.time_nanos);
    assert_eq!(500_000_000, profile.duration_nanos);
    assert_eq!(1, profile.samples.len());
    assert_eq!(vec![4198400, 4202496], profile.samples[0].location_ids);
    assert_eq!(vec![2], profile.samples[0].values);
    assert_eq!(2, profile.label_sets.len());
    assert_eq!(2, profile.functions.len());
}

#[test]
fn writes_uncompressed_profile_and_debug_dump() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("raw.pprof");
    let dump = dir.path().join("events.json");
    let status = converter(dir.path())
        .arg("-o")
        .arg(&output)
        .arg("--json")
        .arg(&dump)
        .arg("--uncompressed")
        .status()
        .unwrap();
    assert!(status.success());

    let profile = deserialize_pprof(&std::fs::read(&output).unwrap()).unwrap();
    assert_eq!(1, profile.samples.len());

    let events: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&dump).unwrap()).unwrap();
    let events = events.as_array().unwrap();
    assert_eq!(4, events.len());
    assert_eq!("GoCreate", events[0]["Type"]);
    assert_eq!("CPUSample", events[1]["Type"]);
    assert_eq!(7, events[1]["Goroutine"]);
    assert_eq!("sort.insertionSort", events[1]["Stack"][0]["Func"]);
    assert_eq!(48, events[1]["Stack"][1]["Line"]);
    assert_eq!("Unknown", events[3]["Type"]);
}

#[test]
fn bad_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.json");
    std::fs::write(&input, "{ not json").unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_exectrace-pprof-converter"))
        .arg("-i")
        .arg(&input)
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(!dir.path().join("trace.pprof").exists());
}
