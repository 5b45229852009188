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

//! Render boundary
//!
//! The flat shape handed to whatever draws the graph.

use crate::model::{Graph, Point, TrafficClass};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderNode {
    pub id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub connection_count: u64,
    pub traffic_class: TrafficClass,
    pub status_counts: BTreeMap<String, u64>,
    /// Signed offset in the node pair's canonical frame: along the normal of
    /// the chord from the smaller node id to the larger one, whichever way
    /// the edge points. 0 is straight.
    pub curve_offset: f64,
    pub is_circular: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_point: Option<Point>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderedGraph {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

impl RenderedGraph {
    /// Project a graph onto the render shape. Nodes without a position are
    /// left out, together with any edge that touches them.
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes: Vec<RenderNode> = graph
            .nodes
            .iter()
            .filter_map(|n| {
                let p = n.position()?;
                Some(RenderNode {
                    id: n.id.clone(),
                    label: n.label.clone(),
                    x: p.x,
                    y: p.y,
                    group: n.group_name().map(String::from),
                })
            })
            .collect();

        let placed: std::collections::HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

        let edges = graph
            .edges
            .iter()
            .filter(|e| placed.contains(e.source.as_str()) && placed.contains(e.target.as_str()))
            .map(|e| RenderEdge {
                id: e.id.clone(),
                source: e.source.clone(),
                target: e.target.clone(),
                connection_count: e.connection_count,
                traffic_class: e.traffic_class,
                status_counts: e.status_counts.clone(),
                curve_offset: e.curve_offset,
                is_circular: e.is_circular,
                control_point: e.control_point,
            })
            .collect();

        Self { nodes, edges }
    }
}
