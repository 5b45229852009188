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

//! Interactive repositioning
//!
//! Moving a node re-routes only the node pairs it takes part in. Every other
//! edge keeps its offset and control point exactly as they were.

use crate::routing::{pair_key, EdgeRouter, PairKey};
use meshscope_core::{Graph, MeshscopeError, Point, Result};
use std::collections::HashSet;
use tracing::debug;

/// Result of one drag step
#[derive(Debug, Clone, PartialEq)]
pub struct DragOutcome {
    pub position: Point,
    /// Edges whose geometry was recomputed
    pub rerouted: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RepositioningController {
    router: EdgeRouter,
}

impl RepositioningController {
    pub fn new(router: EdgeRouter) -> Self {
        Self { router }
    }

    /// Move `node_id` to an absolute position
    pub fn drag_to(&self, graph: &mut Graph, node_id: &str, to: Point) -> Result<DragOutcome> {
        if !to.is_finite() {
            return Err(MeshscopeError::InvalidInput(format!(
                "non-finite drag target for node '{}'",
                node_id
            )));
        }
        let node = graph
            .node_mut(node_id)
            .ok_or_else(|| MeshscopeError::NodeNotFound(node_id.to_string()))?;
        node.set_position(to);

        let touched: HashSet<PairKey> = graph
            .edges
            .iter()
            .filter(|e| e.touches(node_id))
            .map(pair_key)
            .collect();
        let indices: Vec<usize> = graph
            .edges
            .iter()
            .enumerate()
            .filter(|(_, e)| touched.contains(&pair_key(e)))
            .map(|(i, _)| i)
            .collect();

        self.router.route_subset(&graph.nodes, &mut graph.edges, &indices);

        debug!(
            node_id,
            x = to.x,
            y = to.y,
            rerouted = indices.len(),
            "Repositioned node"
        );
        Ok(DragOutcome {
            position: to,
            rerouted: indices.len(),
        })
    }

    /// Move `node_id` by a delta. An unpositioned node moves from the origin.
    pub fn drag_by(
        &self,
        graph: &mut Graph,
        node_id: &str,
        dx: f64,
        dy: f64,
    ) -> Result<DragOutcome> {
        let from = graph
            .node(node_id)
            .ok_or_else(|| MeshscopeError::NodeNotFound(node_id.to_string()))?
            .position()
            .unwrap_or_default();
        self.drag_to(graph, node_id, Point::new(from.x + dx, from.y + dy))
    }
}
