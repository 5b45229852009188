// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Integration tests for the meshscope binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const RECORDS: &str = r#"[
  [
    {"source": "web.frontend", "target": "api.gateway", "status": "200"},
    {"source": "api.gateway", "target": "orders.svc", "status": 200},
    {"source": "api.gateway", "target": "orders.svc", "status": "500"}
  ],
  [
    {"source": {"id": "orders.svc", "label": "Orders"}, "target": "api.gateway"},
    {"sourceId": "", "targetId": "nowhere"}
  ]
]"#;

const SPANS: &str = r#"[
  {"traceId": "t1", "spanId": "1", "service": "web", "operation": "GET /"},
  {"traceId": "t1", "spanId": "2", "parentSpanId": "1", "service": "api", "operation": "list", "status": "200"},
  {"traceId": "t1", "spanId": "3", "parentSpanId": "2", "service": "db", "operation": "query"}
]"#;

fn meshscope(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_meshscope"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("MESHSCOPE_LAYOUT")
        .env_remove("MESHSCOPE_WIDTH")
        .env_remove("MESHSCOPE_HEIGHT")
        .env_remove("MESHSCOPE_SPACING")
        .env_remove("MESHSCOPE_FORCE_ITERATIONS")
        .env_remove("MESHSCOPE_POLL_INTERVAL_MS")
        .output()
        .expect("failed to run meshscope")
}

fn write(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_render_records_to_file() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "records.json", RECORDS);
    let output = dir.path().join("out.json");
    let output_str = output.to_string_lossy().into_owned();

    let result = meshscope(&[
        "render", &input, "--layout", "grid", "--width", "400", "--height", "400", "-o",
        &output_str,
    ]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let body = fs::read_to_string(&output).unwrap();
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["layout"], "grid");
    assert_eq!(json["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(json["edges"].as_array().unwrap().len(), 3);
    assert_eq!(json["summary"]["totalConnections"], 4);
    assert_eq!(json["summary"]["circularEdges"], 2);

    let orders = json["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["id"] == "orders.svc")
        .unwrap();
    assert_eq!(orders["label"], "Orders");
    assert!(orders["x"].as_f64().unwrap().is_finite());

    let edge = json["edges"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["id"] == "api.gateway->orders.svc")
        .unwrap();
    assert_eq!(edge["connectionCount"], 2);
    assert_eq!(edge["statusCounts"]["200"], 1);
    assert_eq!(edge["statusCounts"]["500"], 1);
    assert_eq!(edge["isCircular"], true);
    assert_eq!(edge["trafficClass"], "cross-group");
}

#[test]
fn test_render_spans_to_stdout() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "spans.json", SPANS);

    let result = meshscope(&["render", &input, "--format", "spans", "--layout", "hierarchical"]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let json: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    let ids: Vec<&str> = json["edges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["web:GET /->api:list", "api:list->db:query"]);
}

#[test]
fn test_unknown_layout_fails() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "records.json", RECORDS);

    let result = meshscope(&["render", &input, "--layout", "spiral"]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("spiral"));
}

#[test]
fn test_malformed_input_fails() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "bad.json", r#"{"source": "a"}"#);

    let result = meshscope(&["stats", &input]);
    assert!(!result.status.success());
}

#[test]
fn test_stats_json() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "records.json", RECORDS);

    let result = meshscope(&["--json", "stats", &input]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let json: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(json["nodeCount"], 3);
    assert_eq!(json["edgeCount"], 3);
    assert_eq!(json["components"], 1);
    assert_eq!(json["circularEdges"], 2);
    assert_eq!(json["statusTotals"]["200"], 2);
}

#[test]
fn test_config_file_sets_layout() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "records.json", RECORDS);
    let config = write(
        dir.path(),
        "meshscope.toml",
        "[view]\nlayout = \"circular\"\nwidth = 500.0\nheight = 500.0\n",
    );

    let result = meshscope(&["--config", &config, "render", &input]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let json: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(json["layout"], "circular");
    assert_eq!(json["width"], 500.0);
}

#[test]
fn test_layouts_lists_all() {
    let result = meshscope(&["--json", "layouts"]);
    assert!(result.status.success());
    let names: Vec<String> = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(
        names,
        vec!["force", "hierarchical", "circular", "grid", "group-clustered", "degree-ranked"]
    );
}
