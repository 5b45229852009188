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

//! Edge curve routing
//!
//! Runs after node positions are final. Three passes over the edge list:
//!
//! 1. Mark `is_circular` on every edge whose reverse also exists.
//! 2. Fan out edges sharing an unordered node pair with symmetric curve
//!    offsets. Offsets live in the pair's canonical frame (smaller id first,
//!    normal of the smaller→larger chord), so `A->B` and `B->A` get `+o` and
//!    `-o` and bow to opposite sides whatever their direction.
//! 3. Turn each offset into a quadratic control point at the chord midpoint,
//!    mirroring it when it lands within `min_separation` of a control point
//!    already placed for another pair in the same pass.
//!
//! Edges with coincident or unpositioned endpoints stay straight.

use meshscope_core::{Edge, Graph, Node, Point, RouterSettings};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Endpoints closer than this are treated as coincident
const DEGENERATE_CHORD: f64 = 1e-9;

/// Unordered node pair, smaller id first
pub type PairKey = (String, String);

pub fn pair_key(edge: &Edge) -> PairKey {
    if edge.source <= edge.target {
        (edge.source.clone(), edge.target.clone())
    } else {
        (edge.target.clone(), edge.source.clone())
    }
}

/// Counters from one routing pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoutingStats {
    pub routed: usize,
    pub curved: usize,
    pub mirrored: usize,
    pub straight: usize,
    pub circular: usize,
}

/// Set `is_circular` on every non-self-loop edge whose reverse exists.
/// Returns the number of circular edges.
pub fn mark_circular(edges: &mut [Edge]) -> usize {
    let directed: HashSet<(String, String)> = edges
        .iter()
        .map(|e| (e.source.clone(), e.target.clone()))
        .collect();

    let mut count = 0;
    for edge in edges.iter_mut() {
        edge.is_circular = !edge.is_self_loop()
            && directed.contains(&(edge.target.clone(), edge.source.clone()));
        if edge.is_circular {
            count += 1;
        }
    }
    count
}

/// Canonical-frame offsets for `n` edges of one pair, by rank.
///
/// One edge is straight. Even counts get `±step·k` with none on the axis;
/// odd counts put the middle rank on the axis. `step = max_offset / ceil(n/2)`.
pub fn fan_offsets(n: usize, max_offset: f64) -> Vec<f64> {
    if n <= 1 {
        return vec![0.0; n];
    }
    let half = n.div_ceil(2);
    let step = max_offset / half as f64;
    (0..n)
        .map(|rank| {
            if n % 2 == 1 {
                (n / 2) as f64 * step - rank as f64 * step
            } else if rank < n / 2 {
                (n / 2 - rank) as f64 * step
            } else {
                -((rank - n / 2 + 1) as f64) * step
            }
        })
        .collect()
}

/// Quadratic control point: chord midpoint pushed `offset` along the unit
/// normal `(-dy, dx)`. `None` for a zero offset or a degenerate chord.
pub fn control_point(source: Point, target: Point, offset: f64) -> Option<Point> {
    let dx = target.x - source.x;
    let dy = target.y - source.y;
    let len = (dx * dx + dy * dy).sqrt();
    if offset == 0.0 || len < DEGENERATE_CHORD || !len.is_finite() {
        return None;
    }
    let mid = source.midpoint(&target);
    Some(Point::new(mid.x - dy / len * offset, mid.y + dx / len * offset))
}

/// Parallel-edge router
#[derive(Debug, Clone, Default)]
pub struct EdgeRouter {
    settings: RouterSettings,
}

impl EdgeRouter {
    pub fn new(settings: RouterSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RouterSettings {
        &self.settings
    }

    /// Route every edge against the given node positions
    pub fn route(&self, nodes: &[Node], edges: &mut [Edge]) -> RoutingStats {
        let circular = mark_circular(edges);
        let all: Vec<usize> = (0..edges.len()).collect();
        let mut stats = self.route_subset(nodes, edges, &all);
        stats.circular = circular;

        debug!(
            edge_count = edges.len(),
            curved = stats.curved,
            mirrored = stats.mirrored,
            circular,
            "Routed edges"
        );
        stats
    }

    pub fn route_graph(&self, graph: &mut Graph) -> RoutingStats {
        self.route(&graph.nodes, &mut graph.edges)
    }

    /// Offsets and control points for the edges at `indices` only, with a
    /// collision set that starts empty. Pair ranks are counted among the
    /// given edges, so callers pass whole pairs. `is_circular` is untouched.
    pub fn route_subset(
        &self,
        nodes: &[Node],
        edges: &mut [Edge],
        indices: &[usize],
    ) -> RoutingStats {
        let positions: HashMap<&str, Point> = nodes
            .iter()
            .filter_map(|n| Some((n.id.as_str(), n.position()?)))
            .collect();

        // Rank within pair, in edge order
        let mut pair_of: Vec<usize> = Vec::with_capacity(indices.len());
        let mut rank_of: Vec<usize> = Vec::with_capacity(indices.len());
        let mut pair_sizes: Vec<usize> = Vec::new();
        let mut pair_ids: HashMap<PairKey, usize> = HashMap::new();
        for &i in indices {
            let next = pair_sizes.len();
            let pair = *pair_ids.entry(pair_key(&edges[i])).or_insert(next);
            if pair == next {
                pair_sizes.push(0);
            }
            rank_of.push(pair_sizes[pair]);
            pair_of.push(pair);
            pair_sizes[pair] += 1;
        }
        let fans: Vec<Vec<f64>> = pair_sizes
            .iter()
            .map(|&n| fan_offsets(n, self.settings.max_offset))
            .collect();

        let mut stats = RoutingStats::default();
        let mut placed: Vec<(usize, Point)> = Vec::new();

        for (k, &i) in indices.iter().enumerate() {
            let pair = pair_of[k];
            let edge = &mut edges[i];
            stats.routed += 1;

            let mut offset = fans[pair][rank_of[k]];

            // Canonical chord: smaller id to larger id
            let (low, high) = if edge.source <= edge.target {
                (edge.source.as_str(), edge.target.as_str())
            } else {
                (edge.target.as_str(), edge.source.as_str())
            };
            let ends = positions.get(low).zip(positions.get(high));
            let chord = ends
                .map(|(&s, &t)| (s, t))
                .filter(|(s, t)| s.distance(t) >= DEGENERATE_CHORD);
            let Some((source, target)) = chord else {
                edge.curve_offset = 0.0;
                edge.control_point = None;
                stats.straight += 1;
                continue;
            };

            let mut cp = control_point(source, target, offset);
            if let Some(point) = cp {
                let crowded = placed.iter().any(|(other, q)| {
                    *other != pair && q.distance(&point) < self.settings.min_separation
                });
                if crowded {
                    offset = -offset;
                    cp = control_point(source, target, offset);
                    stats.mirrored += 1;
                }
            }

            match cp {
                Some(point) => {
                    placed.push((pair, point));
                    stats.curved += 1;
                }
                None => stats.straight += 1,
            }
            edge.curve_offset = offset;
            edge.control_point = cp;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(id: &str, x: f64, y: f64) -> Node {
        let mut node = Node::new(id, id);
        node.set_position(Point::new(x, y));
        node
    }

    fn router() -> EdgeRouter {
        EdgeRouter::new(RouterSettings::default())
    }

    #[test]
    fn test_fan_offsets() {
        assert!(fan_offsets(0, 50.0).is_empty());
        assert_eq!(fan_offsets(1, 50.0), vec![0.0]);
        assert_eq!(fan_offsets(2, 50.0), vec![50.0, -50.0]);
        assert_eq!(fan_offsets(3, 50.0), vec![25.0, 0.0, -25.0]);
        assert_eq!(fan_offsets(4, 50.0), vec![50.0, 25.0, -25.0, -50.0]);
    }

    #[test]
    fn test_fan_offsets_symmetric() {
        for n in 2..10 {
            let offsets = fan_offsets(n, 50.0);
            let sum: f64 = offsets.iter().sum();
            assert!(sum.abs() < 1e-9, "n = {n}");
            assert!(offsets.iter().all(|o| o.abs() <= 50.0));
            assert_eq!(offsets.iter().filter(|o| **o == 0.0).count(), n % 2);
        }
    }

    #[test]
    fn test_control_point_normal() {
        let cp = control_point(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 20.0);
        assert_eq!(cp, Some(Point::new(50.0, 20.0)));
        assert_eq!(control_point(Point::new(1.0, 1.0), Point::new(1.0, 1.0), 20.0), None);
        assert_eq!(control_point(Point::new(0.0, 0.0), Point::new(9.0, 0.0), 0.0), None);
    }

    #[test]
    fn test_circular_marking() {
        let mut edges = vec![
            Edge::new("a", "b"),
            Edge::new("b", "a"),
            Edge::new("b", "c"),
            Edge::new("c", "c"),
        ];
        assert_eq!(mark_circular(&mut edges), 2);
        assert!(edges[0].is_circular);
        assert!(edges[1].is_circular);
        assert!(!edges[2].is_circular);
        assert!(!edges[3].is_circular);
    }

    #[test]
    fn test_single_edge_is_straight() {
        let nodes = vec![placed("a", 0.0, 0.0), placed("b", 100.0, 0.0)];
        let mut edges = vec![Edge::new("a", "b")];
        let stats = router().route(&nodes, &mut edges);

        assert_eq!(edges[0].curve_offset, 0.0);
        assert_eq!(edges[0].control_point, None);
        assert_eq!(stats.straight, 1);
    }

    #[test]
    fn test_two_parallel_edges_opposite_offsets() {
        let nodes = vec![placed("a", 0.0, 0.0), placed("b", 200.0, 0.0)];
        let mut edges = vec![
            Edge::new("a", "b").with_qualifier("http"),
            Edge::new("a", "b").with_qualifier("grpc"),
        ];
        router().route(&nodes, &mut edges);

        assert_eq!(edges[0].curve_offset, 50.0);
        assert_eq!(edges[1].curve_offset, -50.0);
        assert_eq!(edges[0].control_point, Some(Point::new(100.0, 50.0)));
        assert_eq!(edges[1].control_point, Some(Point::new(100.0, -50.0)));
    }

    #[test]
    fn test_three_parallel_edges_middle_straight() {
        let nodes = vec![placed("a", 0.0, 0.0), placed("b", 200.0, 0.0)];
        let mut edges: Vec<Edge> = ["x", "y", "z"]
            .iter()
            .map(|q| Edge::new("a", "b").with_qualifier(*q))
            .collect();
        router().route(&nodes, &mut edges);

        let offsets: Vec<f64> = edges.iter().map(|e| e.curve_offset).collect();
        assert_eq!(offsets, vec![25.0, 0.0, -25.0]);
        assert_eq!(edges[1].control_point, None);
    }

    #[test]
    fn test_reverse_edges_bow_apart() {
        let nodes = vec![placed("a", 0.0, 0.0), placed("b", 200.0, 0.0)];
        let mut edges = vec![Edge::new("a", "b"), Edge::new("b", "a")];
        router().route(&nodes, &mut edges);

        assert_eq!(edges[0].curve_offset, 50.0);
        assert_eq!(edges[1].curve_offset, -50.0);
        let upper = edges[0].control_point.unwrap();
        let lower = edges[1].control_point.unwrap();
        assert_eq!(upper, Point::new(100.0, 50.0));
        assert_eq!(lower, Point::new(100.0, -50.0));
        assert!(edges[0].is_circular && edges[1].is_circular);
    }

    #[test]
    fn test_reverse_pair_offsets_independent_of_direction() {
        let nodes = vec![placed("A", 0.0, 0.0), placed("B", 200.0, 0.0)];
        let mut edges = vec![Edge::new("B", "A"), Edge::new("A", "B")];
        router().route(&nodes, &mut edges);

        // Rank order gives B->A the first offset; sides follow the A->B normal
        assert_eq!(edges[0].curve_offset, 50.0);
        assert_eq!(edges[1].curve_offset, -50.0);
        assert_eq!(edges[0].control_point, Some(Point::new(100.0, 50.0)));
        assert_eq!(edges[1].control_point, Some(Point::new(100.0, -50.0)));
    }

    #[test]
    fn test_coincident_endpoints_straight() {
        let nodes = vec![placed("a", 10.0, 10.0), placed("b", 10.0, 10.0)];
        let mut edges = vec![
            Edge::new("a", "b").with_qualifier("1"),
            Edge::new("a", "b").with_qualifier("2"),
            Edge::new("a", "a"),
        ];
        let stats = router().route(&nodes, &mut edges);

        for edge in &edges {
            assert_eq!(edge.curve_offset, 0.0);
            assert_eq!(edge.control_point, None);
        }
        assert_eq!(stats.straight, 3);
    }

    #[test]
    fn test_unpositioned_endpoints_have_no_control_point() {
        let nodes = vec![placed("a", 0.0, 0.0), Node::new("b", "b")];
        let mut edges = vec![
            Edge::new("a", "b").with_qualifier("1"),
            Edge::new("a", "b").with_qualifier("2"),
        ];
        router().route(&nodes, &mut edges);
        assert!(edges.iter().all(|e| e.control_point.is_none()));
        assert!(edges.iter().all(|e| e.curve_offset == 0.0));
    }

    #[test]
    fn test_collision_mirrors_other_pair() {
        // Two pairs whose chords overlap: a-b and c-d share a midpoint area
        let nodes = vec![
            placed("a", 0.0, 0.0),
            placed("b", 200.0, 0.0),
            placed("c", 0.0, 10.0),
            placed("d", 200.0, 10.0),
        ];
        let mut edges = vec![
            Edge::new("a", "b").with_qualifier("1"),
            Edge::new("a", "b").with_qualifier("2"),
            Edge::new("c", "d").with_qualifier("1"),
            Edge::new("c", "d").with_qualifier("2"),
        ];
        let stats = router().route(&nodes, &mut edges);

        // c-d +50 lands at (100, 60), 10 away from a-b's (100, 50): mirrored
        assert_eq!(stats.mirrored, 2);
        assert_eq!(edges[2].curve_offset, -50.0);
        assert_eq!(edges[2].control_point, Some(Point::new(100.0, -40.0)));
        // -50 would sit 10 from a-b's (100, -50): mirrored back up
        assert_eq!(edges[3].curve_offset, 50.0);
        assert_eq!(edges[3].control_point, Some(Point::new(100.0, 60.0)));
    }

    #[test]
    fn test_own_pair_never_mirrors() {
        // Short chord: the pair's own control points sit close together
        let nodes = vec![placed("a", 0.0, 0.0), placed("b", 10.0, 0.0)];
        let mut edges: Vec<Edge> = (0..4)
            .map(|q| Edge::new("a", "b").with_qualifier(q.to_string()))
            .collect();
        let stats = router().route(&nodes, &mut edges);

        assert_eq!(stats.mirrored, 0);
        let offsets: Vec<f64> = edges.iter().map(|e| e.curve_offset).collect();
        assert_eq!(offsets, vec![50.0, 25.0, -25.0, -50.0]);
    }
}
