use std::collections::HashMap;

use serde_json::Value;

use usermon::system::aggregate::{AggregateInput, aggregate};
use usermon::system::gpu::{GpuDeviceStats, GpuProcess};
use usermon::system::process::ProcessSample;
use usermon::system::sampler::HostStats;
use usermon::system::snapshot::Snapshot;

const MB: u64 = 1024 * 1024;

fn populated_snapshot() -> Snapshot {
    let mut gpu_processes = HashMap::new();
    gpu_processes.insert(
        10,
        GpuProcess {
            name: "trainer".to_string(),
            memory_mb: 2048,
        },
    );
    aggregate(&AggregateInput {
        processes: vec![ProcessSample {
            pid: 10,
            owner: Some("alice".to_string()),
            name: "trainer".to_string(),
            cpu_percent: 42.5,
            memory_bytes: 512 * MB,
        }],
        gpu_processes,
        host: HostStats {
            cpu_usage: 37.0,
            memory_used_bytes: 12 * 1024 * MB,
            memory_total_bytes: 64 * 1024 * MB,
            uptime_secs: 2 * 86_400 + 3 * 3_600 + 40 * 60,
        },
        cpu_temperature: Some(51.0),
        gpu_device: GpuDeviceStats {
            usage_percent: 73.0,
            temperature: Some(64.0),
        },
        timestamp: "2026-08-30T12:00:00+00:00".to_string(),
    })
}

fn field_names(value: &Value) -> Vec<&str> {
    let mut names: Vec<&str> = value
        .as_object()
        .expect("expected a JSON object")
        .keys()
        .map(String::as_str)
        .collect();
    names.sort_unstable();
    names
}

#[test]
fn snapshot_serializes_field_for_field() {
    let json = serde_json::to_value(populated_snapshot()).unwrap();

    assert_eq!(
        field_names(&json),
        vec![
            "active_user_count",
            "cpu",
            "gpu",
            "memory",
            "timestamp",
            "uptime",
            "users"
        ]
    );
    assert_eq!(field_names(&json["cpu"]), vec!["temperature", "usage"]);
    assert_eq!(field_names(&json["gpu"]), vec!["temperature", "usage"]);
    assert_eq!(
        field_names(&json["memory"]),
        vec!["display", "total", "used"]
    );

    let user = &json["users"][0];
    assert_eq!(
        field_names(user),
        vec!["cpu_usage", "memory_usage", "processes", "username"]
    );
    let process = &user["processes"][0];
    assert_eq!(
        field_names(process),
        vec!["cpu_percent", "memory_mb", "name", "pid"]
    );
}

#[test]
fn snapshot_serializes_expected_values() {
    let json = serde_json::to_value(populated_snapshot()).unwrap();

    assert_eq!(json["cpu"]["usage"], 37.0);
    assert_eq!(json["cpu"]["temperature"], "51.0°C");
    assert_eq!(json["gpu"]["usage"], 73.0);
    assert_eq!(json["gpu"]["temperature"], "64.0°C");
    assert_eq!(json["memory"]["display"], "12.0 / 64.0 GB");
    assert_eq!(json["active_user_count"], 1);
    assert_eq!(json["uptime"], "2d 3h 40m");
    assert_eq!(json["timestamp"], "2026-08-30T12:00:00+00:00");

    let process = &json["users"][0]["processes"][0];
    assert_eq!(process["pid"], 10);
    assert_eq!(process["name"], "trainer (GPU: 2048MB)");
    assert_eq!(process["cpu_percent"], 42.5);
    assert_eq!(process["memory_mb"], 512.0);
}

#[test]
fn empty_snapshot_has_the_same_shape() {
    let empty = serde_json::to_value(Snapshot::empty()).unwrap();
    let populated = serde_json::to_value(populated_snapshot()).unwrap();
    assert_eq!(field_names(&empty), field_names(&populated));
    assert_eq!(empty["users"], serde_json::json!([]));
}
