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

//! Meshscope Layout
//!
//! Positions graph nodes on a canvas, bends parallel edges apart, and keeps
//! edge geometry consistent while nodes are dragged.
//!
//! ## Algorithms
//!
//! - Force-directed (Fruchterman-Reingold forces with centering and collision)
//! - Hierarchical (BFS levels from in-degree-zero roots)
//! - Circular, grid, group-clustered and degree-ranked (concentric)

mod force;
mod grid;
mod hierarchical;
mod radial;

pub mod engine;
pub mod interaction;
pub mod routing;

pub use engine::{compute_positions, layout, layout_named, LayoutEngine, LayoutParams};
pub use interaction::{DragOutcome, RepositioningController};
pub use radial::RING_CAPACITY;
pub use routing::{
    control_point, fan_offsets, mark_circular, pair_key, EdgeRouter, PairKey, RoutingStats,
};

use meshscope_core::{Graph, MeshscopeConfig};
use tracing::info;

/// Lay out and route `graph` with the configured layout and router settings
pub fn prepare_view(graph: &mut Graph, config: &MeshscopeConfig) -> RoutingStats {
    LayoutEngine::from_view(&config.view).apply(config.view.layout, graph);
    let stats = EdgeRouter::new(config.router.clone()).route_graph(graph);
    info!(
        layout = %config.view.layout,
        node_count = graph.node_count(),
        edge_count = graph.edge_count(),
        curved = stats.curved,
        "Prepared graph view"
    );
    stats
}
