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

//! Canonical graph model
//!
//! A [`Graph`] is an ordered list of [`Node`]s plus an ordered list of
//! [`Edge`]s. Every edge endpoint must name a node that is already present;
//! [`Graph::add_edge`] enforces this and the aggregator registers nodes before
//! edges. Layout mutates node positions in place and routing mutates edge
//! geometry in place, so one graph instance lives across interactive drags.

use crate::error::{MeshscopeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// 2D point in canvas coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Traffic classification of an edge by the groups owning its endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrafficClass {
    SameGroup,
    CrossGroup,
    UnknownGroup,
}

impl TrafficClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficClass::SameGroup => "same-group",
            TrafficClass::CrossGroup => "cross-group",
            TrafficClass::UnknownGroup => "unknown-group",
        }
    }
}

/// Where a node's group assignment came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupSource {
    /// Supplied explicitly by the record producer
    Authoritative,
    /// Guessed from the node identifier's syntax
    Inferred,
}

/// Group (owning service / tenant) of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub source: GroupSource,
}

impl Group {
    pub fn authoritative(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: GroupSource::Authoritative,
        }
    }

    pub fn inferred(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: GroupSource::Inferred,
        }
    }

    pub fn is_authoritative(&self) -> bool {
        self.source == GroupSource::Authoritative
    }
}

/// Graph node (e.g. a service operation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<Group>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl Node {
    /// Create an unpositioned node. An empty label falls back to the id.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        let id = id.into();
        let mut label = label.into();
        if label.trim().is_empty() {
            label = id.clone();
        }
        Self {
            id,
            label,
            group: None,
            x: None,
            y: None,
        }
    }

    /// False while the label is still the id fallback from [`Node::new`]
    pub fn has_own_label(&self) -> bool {
        self.label != self.id
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.group = Some(group);
        self
    }

    pub fn group_name(&self) -> Option<&str> {
        self.group.as_ref().map(|g| g.name.as_str())
    }

    pub fn position(&self) -> Option<Point> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        }
    }

    pub fn set_position(&mut self, point: Point) {
        self.x = Some(point.x);
        self.y = Some(point.y);
    }
}

/// Build the identifier of an edge from its endpoints and optional qualifier
pub fn edge_id(source: &str, target: &str, qualifier: Option<&str>) -> String {
    match qualifier {
        Some(q) if !q.is_empty() => format!("{}->{}#{}", source, target, q),
        _ => format!("{}->{}", source, target),
    }
}

/// Directed relationship between two nodes, possibly folding many records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Distinguishes parallel edges sharing one ordered pair
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
    pub connection_count: u64,
    pub traffic_class: TrafficClass,
    #[serde(default)]
    pub status_counts: BTreeMap<String, u64>,
    #[serde(default)]
    pub correlation_ids: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_latency_ms: Option<f64>,
    /// Signed, in the pair's smaller-id-to-larger-id frame; 0 is straight
    #[serde(default)]
    pub curve_offset: f64,
    #[serde(default)]
    pub is_circular: bool,
    /// Curve control point computed by the router; `None` for straight edges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_point: Option<Point>,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: edge_id(&source, &target, None),
            source,
            target,
            qualifier: None,
            connection_count: 1,
            traffic_class: TrafficClass::UnknownGroup,
            status_counts: BTreeMap::new(),
            correlation_ids: BTreeSet::new(),
            avg_latency_ms: None,
            curve_offset: 0.0,
            is_circular: false,
            control_point: None,
        }
    }

    /// Attach a qualifier, re-deriving the edge id
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        let qualifier = qualifier.into();
        self.id = edge_id(&self.source, &self.target, Some(&qualifier));
        self.qualifier = Some(qualifier);
        self
    }

    pub fn with_traffic_class(mut self, class: TrafficClass) -> Self {
        self.traffic_class = class;
        self
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// Whether either endpoint is `node_id`
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// Total number of status observations in the histogram
    pub fn status_total(&self) -> u64 {
        self.status_counts.values().sum()
    }
}

/// Canonical node/edge set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Insert a node unless one with the same id exists. Returns true if inserted.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.contains_node(&node.id) {
            return false;
        }
        self.nodes.push(node);
        true
    }

    /// Append an edge after checking both endpoints are registered
    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        for endpoint in [&edge.source, &edge.target] {
            if !self.contains_node(endpoint) {
                return Err(MeshscopeError::DanglingEdge {
                    edge_id: edge.id.clone(),
                    node_id: endpoint.clone(),
                });
            }
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Map of node id to position for every positioned node
    pub fn positions(&self) -> HashMap<&str, Point> {
        self.nodes
            .iter()
            .filter_map(|n| n.position().map(|p| (n.id.as_str(), p)))
            .collect()
    }

    /// Check the structural invariants: unique node ids, unique edge ids,
    /// and every edge endpoint registered.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(MeshscopeError::InvalidInput(format!(
                    "duplicate node id {}",
                    node.id
                )));
            }
        }
        let mut edge_ids = HashSet::new();
        for edge in &self.edges {
            if !edge_ids.insert(edge.id.as_str()) {
                return Err(MeshscopeError::InvalidInput(format!(
                    "duplicate edge id {}",
                    edge.id
                )));
            }
            for endpoint in [&edge.source, &edge.target] {
                if !seen.contains(endpoint.as_str()) {
                    return Err(MeshscopeError::DanglingEdge {
                        edge_id: edge.id.clone(),
                        node_id: endpoint.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Input record produced by file parsers, live pollers or span adapters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default)]
    pub source_id: String,
    #[serde(default)]
    pub target_id: String,
    #[serde(default)]
    pub source_label: String,
    #[serde(default)]
    pub target_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
}

impl RawRecord {
    /// Record whose labels equal the ids
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        let source_id = source_id.into();
        let target_id = target_id.into();
        Self {
            source_label: source_id.clone(),
            target_label: target_id.clone(),
            source_id,
            target_id,
            ..Default::default()
        }
    }

    pub fn with_groups(
        mut self,
        source_group: Option<&str>,
        target_group: Option<&str>,
    ) -> Self {
        self.source_group = source_group.map(String::from);
        self.target_group = target_group.map(String::from);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn with_latency_ms(mut self, latency_ms: f64) -> Self {
        self.latency_ms = Some(latency_ms);
        self
    }

    /// Both endpoint ids are present and non-blank
    pub fn has_endpoints(&self) -> bool {
        !self.source_id.trim().is_empty() && !self.target_id.trim().is_empty()
    }
}
