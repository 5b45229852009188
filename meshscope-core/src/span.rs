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

//! Span to record mapping
//!
//! Turns distributed-trace spans into caller→callee records. Each span with a
//! known parent yields one record from the parent's operation to its own.

use crate::error::Result;
use crate::model::RawRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One span of a distributed trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanRecord {
    pub trace_id: String,
    pub span_id: String,
    #[serde(default)]
    pub parent_span_id: Option<String>,
    pub service: String,
    pub operation: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub duration_ms: Option<f64>,
}

impl SpanRecord {
    /// Node id for this span's operation: `<service>:<operation>`
    pub fn node_id(&self) -> String {
        format!("{}:{}", self.service, self.operation)
    }
}

/// Map spans to parent→child records.
///
/// Parents are looked up within the same trace. Root spans and spans whose
/// parent is absent from the input produce nothing.
pub fn records_from_spans(spans: &[SpanRecord]) -> Vec<RawRecord> {
    let by_id: HashMap<(&str, &str), &SpanRecord> = spans
        .iter()
        .map(|s| ((s.trace_id.as_str(), s.span_id.as_str()), s))
        .collect();

    spans
        .iter()
        .filter_map(|child| {
            let parent_id = child.parent_span_id.as_deref().filter(|p| !p.is_empty())?;
            let parent = by_id.get(&(child.trace_id.as_str(), parent_id))?;

            Some(RawRecord {
                source_id: parent.node_id(),
                target_id: child.node_id(),
                source_label: parent.operation.clone(),
                target_label: child.operation.clone(),
                source_group: Some(parent.service.clone()),
                target_group: Some(child.service.clone()),
                status: child.status.clone(),
                correlation_id: Some(child.trace_id.clone()),
                latency_ms: child.duration_ms,
            })
        })
        .collect()
}

/// Decode a JSON array of spans
pub fn parse_spans_str(input: &str) -> Result<Vec<SpanRecord>> {
    Ok(serde_json::from_str(input)?)
}
