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

//! Layout engine
//!
//! Every algorithm shares one contract: read the node list and the edge list,
//! produce one position per node, touch nothing else. Algorithms return a
//! `Vec<Point>` aligned with the node slice and the engine writes it back, so
//! each one stays a pure function that is easy to test on its own.
//!
//! All algorithms accept an empty node list (no positions) and place a single
//! node at the canvas centre.

use crate::{force, grid, hierarchical, radial};
use meshscope_core::{Edge, Graph, LayoutKind, Node, Point, Result, ViewConfig};
use std::collections::HashMap;
use tracing::debug;

/// Smallest canvas dimension or spacing the engine will work with
const MIN_EXTENT: f64 = 1.0;

/// Canvas geometry and tuning shared by all algorithms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub width: f64,
    pub height: f64,
    /// Target node separation (force, group-clustered, degree-ranked)
    pub spacing: f64,
    /// Fixed step count of the force simulation
    pub iterations: usize,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self::from_view(&ViewConfig::default())
    }
}

impl LayoutParams {
    pub fn new(width: f64, height: f64, spacing: f64) -> Self {
        Self {
            width,
            height,
            spacing,
            iterations: ViewConfig::default().force_iterations,
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn from_view(view: &ViewConfig) -> Self {
        Self {
            width: view.width,
            height: view.height,
            spacing: view.spacing,
            iterations: view.force_iterations,
        }
    }

    /// Copy with non-finite or non-positive extents replaced by a minimum,
    /// so no algorithm divides by zero or propagates NaN.
    pub fn sanitized(&self) -> Self {
        let fix = |v: f64| if v.is_finite() && v >= MIN_EXTENT { v } else { MIN_EXTENT };
        Self {
            width: fix(self.width),
            height: fix(self.height),
            spacing: fix(self.spacing),
            iterations: self.iterations,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn min_extent(&self) -> f64 {
        self.width.min(self.height)
    }
}

/// Convert a count to f64 for layout math
#[inline]
pub(crate) fn f(n: usize) -> f64 {
    n as f64
}

/// Map node id to its index in the slice
pub(crate) fn node_index(nodes: &[Node]) -> HashMap<&str, usize> {
    nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect()
}

/// Edges resolved to `(source_idx, target_idx)`, skipping unknown endpoints
pub(crate) fn edge_indices(nodes: &[Node], edges: &[Edge]) -> Vec<(usize, usize)> {
    let index = node_index(nodes);
    edges
        .iter()
        .filter_map(|e| {
            let s = *index.get(e.source.as_str())?;
            let t = *index.get(e.target.as_str())?;
            Some((s, t))
        })
        .collect()
}

/// Point on a circle around `center`, angle in radians
pub(crate) fn on_circle(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// Compute positions without touching the nodes
pub fn compute_positions(
    kind: LayoutKind,
    nodes: &[Node],
    edges: &[Edge],
    params: &LayoutParams,
) -> Vec<Point> {
    let params = params.sanitized();
    match nodes.len() {
        0 => return Vec::new(),
        1 => return vec![params.center()],
        _ => {}
    }

    match kind {
        LayoutKind::Force => force::force_layout(nodes, edges, &params),
        LayoutKind::Hierarchical => hierarchical::hierarchical_layout(nodes, edges, &params),
        LayoutKind::Circular => radial::circular_layout(nodes, &params),
        LayoutKind::Grid => grid::grid_layout(nodes, &params),
        LayoutKind::GroupClustered => grid::group_clustered_layout(nodes, &params),
        LayoutKind::DegreeRanked => radial::degree_ranked_layout(nodes, edges, &params),
    }
}

/// Position `nodes` in place with the chosen algorithm. Edges are read-only.
pub fn layout(kind: LayoutKind, nodes: &mut [Node], edges: &[Edge], params: &LayoutParams) {
    let positions = compute_positions(kind, nodes, edges, params);
    for (node, point) in nodes.iter_mut().zip(positions) {
        node.set_position(point);
    }
    debug!(layout = %kind, node_count = nodes.len(), "Computed layout");
}

/// Like [`layout`], with the algorithm given by name.
///
/// Unknown names fail with `UnsupportedLayout` and leave the nodes untouched.
pub fn layout_named(
    name: &str,
    nodes: &mut [Node],
    edges: &[Edge],
    params: &LayoutParams,
) -> Result<()> {
    let kind: LayoutKind = name.parse()?;
    layout(kind, nodes, edges, params);
    Ok(())
}

/// Layout engine bound to one set of parameters
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    params: LayoutParams,
}

impl LayoutEngine {
    pub fn new(params: LayoutParams) -> Self {
        Self { params }
    }

    pub fn from_view(view: &ViewConfig) -> Self {
        Self::new(LayoutParams::from_view(view))
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    /// Position every node of `graph`
    pub fn apply(&self, kind: LayoutKind, graph: &mut Graph) {
        layout(kind, &mut graph.nodes, &graph.edges, &self.params);
    }
}
