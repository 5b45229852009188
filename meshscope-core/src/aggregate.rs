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

//! Graph aggregation
//!
//! Folds batches of [`RawRecord`]s into one deduplicated [`Graph`]:
//! - nodes are keyed by id and updated in place, never cloned
//! - records sharing an ordered `(source, target)` pair fold into one bucket
//!   that tracks connection count, status histogram, correlation ids and latency
//! - edges are materialized once all records are folded, so the traffic class
//!   sees each endpoint's final group
//!
//! [`merge_graphs`] combines two already-aggregated graphs with the same
//! key-based fold, which is how live-poll results join an existing view.

use crate::classify::classify;
use crate::group::{merge_group, resolve_group};
use crate::model::{Edge, Graph, Node, RawRecord};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info, warn};

/// Counters describing one aggregation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationStats {
    /// Records offered to the aggregator
    pub records_seen: usize,
    /// Records folded into an edge bucket
    pub records_folded: usize,
    /// Records dropped for a missing source or target id
    pub skipped_records: usize,
}

/// Running totals for one ordered (source, target) pair
#[derive(Debug, Clone)]
struct EdgeBucket {
    source: String,
    target: String,
    connection_count: u64,
    status_counts: BTreeMap<String, u64>,
    correlation_ids: BTreeSet<String>,
    latency_sum_ms: f64,
    latency_samples: u64,
}

impl EdgeBucket {
    fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            connection_count: 0,
            status_counts: BTreeMap::new(),
            correlation_ids: BTreeSet::new(),
            latency_sum_ms: 0.0,
            latency_samples: 0,
        }
    }

    fn add_record(&mut self, record: &RawRecord) {
        self.connection_count += 1;
        if let Some(status) = record.status.as_deref().filter(|s| !s.is_empty()) {
            *self.status_counts.entry(status.to_string()).or_insert(0) += 1;
        }
        if let Some(id) = record.correlation_id.as_deref().filter(|s| !s.is_empty()) {
            self.correlation_ids.insert(id.to_string());
        }
        if let Some(latency) = record.latency_ms.filter(|l| l.is_finite()) {
            self.latency_sum_ms += latency;
            self.latency_samples += 1;
        }
    }

    fn avg_latency_ms(&self) -> Option<f64> {
        if self.latency_samples == 0 {
            None
        } else {
            Some(self.latency_sum_ms / self.latency_samples as f64)
        }
    }
}

/// Incremental aggregator. Feed it batches, then call [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct GraphAggregator {
    nodes: Vec<Node>,
    node_index: HashMap<String, usize>,
    buckets: Vec<EdgeBucket>,
    bucket_index: HashMap<(String, String), usize>,
    stats: AggregationStats,
}

impl GraphAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> AggregationStats {
        self.stats
    }

    /// Fold every record of a batch. Returns the number of records folded.
    pub fn ingest_batch(&mut self, batch: &[RawRecord]) -> usize {
        batch.iter().filter(|record| self.ingest(record)).count()
    }

    /// Fold a single record. Returns false if it was skipped.
    pub fn ingest(&mut self, record: &RawRecord) -> bool {
        self.stats.records_seen += 1;

        if !record.has_endpoints() {
            self.stats.skipped_records += 1;
            debug!(
                source_id = %record.source_id,
                target_id = %record.target_id,
                "Skipping record without both endpoint ids"
            );
            return false;
        }

        // Nodes first so every bucket's endpoints exist.
        self.register_node(
            &record.source_id,
            &record.source_label,
            record.source_group.as_deref(),
        );
        self.register_node(
            &record.target_id,
            &record.target_label,
            record.target_group.as_deref(),
        );

        let key = (record.source_id.clone(), record.target_id.clone());
        let idx = match self.bucket_index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.buckets
                    .push(EdgeBucket::new(&record.source_id, &record.target_id));
                self.bucket_index.insert(key, self.buckets.len() - 1);
                self.buckets.len() - 1
            }
        };
        self.buckets[idx].add_record(record);
        self.stats.records_folded += 1;
        true
    }

    fn register_node(&mut self, id: &str, label: &str, supplied_group: Option<&str>) {
        match self.node_index.get(id) {
            Some(&idx) => {
                let node = &mut self.nodes[idx];
                node.group = resolve_group(node.group.as_ref(), supplied_group, id);
                if !label.trim().is_empty() && label != id {
                    node.label = label.to_string();
                }
            }
            None => {
                let mut node = Node::new(id, label);
                node.group = resolve_group(None, supplied_group, id);
                self.node_index.insert(id.to_string(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    /// Materialize the canonical graph
    pub fn finish(self) -> Graph {
        let group_of: HashMap<&str, Option<&str>> = self
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), n.group_name()))
            .collect();

        let edges: Vec<Edge> = self
            .buckets
            .iter()
            .map(|bucket| {
                let source_group = group_of.get(bucket.source.as_str()).copied().flatten();
                let target_group = group_of.get(bucket.target.as_str()).copied().flatten();
                let mut edge = Edge::new(bucket.source.clone(), bucket.target.clone())
                    .with_traffic_class(classify(source_group, target_group));
                edge.connection_count = bucket.connection_count;
                edge.status_counts = bucket.status_counts.clone();
                edge.correlation_ids = bucket.correlation_ids.clone();
                edge.avg_latency_ms = bucket.avg_latency_ms();
                edge
            })
            .collect();

        info!(
            node_count = self.nodes.len(),
            edge_count = edges.len(),
            records_folded = self.stats.records_folded,
            skipped_records = self.stats.skipped_records,
            "Aggregated record batches"
        );

        Graph {
            nodes: self.nodes,
            edges,
        }
    }
}

/// Aggregate record batches into a fresh graph
pub fn aggregate(batches: &[Vec<RawRecord>]) -> Graph {
    let mut aggregator = GraphAggregator::new();
    for batch in batches {
        aggregator.ingest_batch(batch);
    }
    aggregator.finish()
}

/// Aggregate one batch and merge it into an existing graph
pub fn merge_batch(base: &mut Graph, batch: &[RawRecord]) -> AggregationStats {
    let mut aggregator = GraphAggregator::new();
    aggregator.ingest_batch(batch);
    let stats = aggregator.stats();
    if stats.records_folded > 0 {
        merge_graphs(base, aggregator.finish());
    }
    stats
}

/// Merge `incoming` into `base`.
///
/// Nodes are unioned by id: a later supplied label wins (an id fallback
/// never replaces a real label), groups follow
/// [`merge_group`], and an existing position is kept unless the incoming node
/// carries one. Edges are unioned by edge id: connection counts are summed,
/// status histograms merged bucket-wise and correlation ids unioned.
///
/// `avg_latency_ms` becomes the equal-weight mean of the two inputs, not a
/// running average weighted by connection count. Repeated merges therefore
/// drift toward the most recent batches.
///
/// Traffic classes are re-derived from the merged groups. Curve geometry is
/// left for the router to recompute.
pub fn merge_graphs(base: &mut Graph, incoming: Graph) {
    let mut node_index: HashMap<String, usize> = base
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.clone(), i))
        .collect();

    for node in incoming.nodes {
        match node_index.get(&node.id) {
            Some(&idx) => {
                let existing = &mut base.nodes[idx];
                if let Some(position) = node.position() {
                    existing.set_position(position);
                }
                existing.group = merge_group(existing.group.as_ref(), node.group.as_ref());
                if node.has_own_label() {
                    existing.label = node.label;
                }
            }
            None => {
                node_index.insert(node.id.clone(), base.nodes.len());
                base.nodes.push(node);
            }
        }
    }

    let mut edge_index: HashMap<String, usize> = base
        .edges
        .iter()
        .enumerate()
        .map(|(i, e)| (e.id.clone(), i))
        .collect();

    for edge in incoming.edges {
        if !node_index.contains_key(&edge.source) || !node_index.contains_key(&edge.target) {
            warn!(edge_id = %edge.id, "Dropping merged edge with unknown endpoint");
            continue;
        }
        match edge_index.get(&edge.id) {
            Some(&idx) => {
                let existing = &mut base.edges[idx];
                existing.connection_count += edge.connection_count;
                for (status, count) in edge.status_counts {
                    *existing.status_counts.entry(status).or_insert(0) += count;
                }
                existing.correlation_ids.extend(edge.correlation_ids);
                existing.avg_latency_ms = match (existing.avg_latency_ms, edge.avg_latency_ms) {
                    (Some(a), Some(b)) => Some((a + b) / 2.0),
                    (a, b) => a.or(b),
                };
            }
            None => {
                edge_index.insert(edge.id.clone(), base.edges.len());
                base.edges.push(edge);
            }
        }
    }

    let group_of: HashMap<&str, Option<&str>> = base
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), n.group_name()))
        .collect();
    for edge in &mut base.edges {
        let source_group = group_of.get(edge.source.as_str()).copied().flatten();
        let target_group = group_of.get(edge.target.as_str()).copied().flatten();
        edge.traffic_class = classify(source_group, target_group);
    }

    debug!(
        node_count = base.nodes.len(),
        edge_count = base.edges.len(),
        "Merged graph"
    );
}
