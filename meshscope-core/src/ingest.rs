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

//! JSON ingestion boundary
//!
//! Producers hand us records in several shapes: flat `sourceId`/`targetId`
//! keys, `source`/`target` as bare ids, or `source`/`target` as embedded node
//! objects. Everything is normalized into [`RawRecord`] here so the
//! aggregator only ever sees ids.

use crate::error::{MeshscopeError, Result};
use crate::model::RawRecord;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Edge endpoint as it appears on the wire
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EndpointRef {
    /// Bare node id
    Id(String),
    /// Embedded node object
    Node {
        id: String,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        group: Option<String>,
    },
}

impl EndpointRef {
    fn into_parts(self) -> (String, Option<String>, Option<String>) {
        match self {
            EndpointRef::Id(id) => (id, None, None),
            EndpointRef::Node { id, label, group } => (id, label, group),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum StatusValue {
    Text(String),
    Code(i64),
}

impl StatusValue {
    fn into_label(self) -> String {
        match self {
            StatusValue::Text(s) => s,
            StatusValue::Code(c) => c.to_string(),
        }
    }
}

/// Loosely-typed record accepted at the boundary
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRecord {
    #[serde(default)]
    source: Option<EndpointRef>,
    #[serde(default)]
    target: Option<EndpointRef>,
    #[serde(default)]
    source_id: Option<String>,
    #[serde(default)]
    target_id: Option<String>,
    #[serde(default)]
    source_label: Option<String>,
    #[serde(default)]
    target_label: Option<String>,
    #[serde(default)]
    source_group: Option<String>,
    #[serde(default)]
    target_group: Option<String>,
    #[serde(default)]
    status: Option<StatusValue>,
    #[serde(default, alias = "traceId")]
    correlation_id: Option<String>,
    #[serde(default)]
    latency_ms: Option<f64>,
}

impl WireRecord {
    /// Collapse every endpoint representation into ids plus labels/groups.
    /// Flat fields take priority over the embedded object's.
    pub fn normalize(self) -> RawRecord {
        let (source_id, source_label, source_group) =
            resolve_endpoint(self.source, self.source_id, self.source_label, self.source_group);
        let (target_id, target_label, target_group) =
            resolve_endpoint(self.target, self.target_id, self.target_label, self.target_group);

        RawRecord {
            source_id,
            target_id,
            source_label,
            target_label,
            source_group,
            target_group,
            status: self.status.map(StatusValue::into_label),
            correlation_id: self.correlation_id,
            latency_ms: self.latency_ms,
        }
    }
}

fn resolve_endpoint(
    endpoint: Option<EndpointRef>,
    flat_id: Option<String>,
    flat_label: Option<String>,
    flat_group: Option<String>,
) -> (String, String, Option<String>) {
    let (embedded_id, embedded_label, embedded_group) = endpoint
        .map(EndpointRef::into_parts)
        .unwrap_or_default();

    let id = flat_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(embedded_id);
    let label = flat_label
        .or(embedded_label)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| id.clone());
    let group = flat_group.or(embedded_group);

    (id, label, group)
}

/// Record batches decoded from a JSON document
#[derive(Debug, Clone, Default)]
pub struct ParsedBatches {
    pub batches: Vec<Vec<RawRecord>>,
    /// Records that could not be decoded and were dropped
    pub skipped: usize,
}

impl ParsedBatches {
    pub fn record_count(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }
}

/// Decode record batches from a JSON value.
///
/// Accepts either an array of batches (each an array of records) or a single
/// flat array of records. Anything that is not an array, or a batch list with
/// a non-array member, is rejected. Individual records that fail to decode are
/// skipped and counted.
pub fn parse_batches(value: &Value) -> Result<ParsedBatches> {
    let items = value
        .as_array()
        .ok_or_else(|| MeshscopeError::InvalidInput("expected a JSON array of records".into()))?;

    let mut parsed = ParsedBatches::default();

    if items.first().map(Value::is_array).unwrap_or(false) {
        for (idx, item) in items.iter().enumerate() {
            let batch = item.as_array().ok_or_else(|| {
                MeshscopeError::InvalidInput(format!("batch {} is not an array", idx))
            })?;
            let records = decode_batch(batch, &mut parsed.skipped);
            parsed.batches.push(records);
        }
    } else {
        let records = decode_batch(items, &mut parsed.skipped);
        parsed.batches.push(records);
    }

    Ok(parsed)
}

/// Decode record batches from JSON text
pub fn parse_batches_str(input: &str) -> Result<ParsedBatches> {
    let value: Value = serde_json::from_str(input)?;
    parse_batches(&value)
}

fn decode_batch(items: &[Value], skipped: &mut usize) -> Vec<RawRecord> {
    items
        .iter()
        .filter_map(|item| match WireRecord::deserialize(item) {
            Ok(wire) => Some(wire.normalize()),
            Err(e) => {
                *skipped += 1;
                debug!(error = %e, "Skipping undecodable record");
                None
            }
        })
        .collect()
}
