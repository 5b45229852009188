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

//! Ring-based layouts: circular and degree-ranked (concentric)

use crate::engine::{edge_indices, f, on_circle, LayoutParams};
use meshscope_core::{Edge, Node, Point};
use std::f64::consts::PI;

/// Circle radius as a fraction of the smaller canvas side
const CIRCLE_RADIUS_FACTOR: f64 = 0.3;
/// Nodes per ring in the degree-ranked layout
pub const RING_CAPACITY: usize = 8;
/// Outermost degree-ranked ring as a fraction of the smaller canvas side
const MAX_RING_FACTOR: f64 = 0.45;

/// Nodes on one circle in input order, first node at angle 0
pub(crate) fn circular_layout(nodes: &[Node], params: &LayoutParams) -> Vec<Point> {
    let n = nodes.len();
    let center = params.center();
    let radius = CIRCLE_RADIUS_FACTOR * params.min_extent();
    (0..n)
        .map(|i| on_circle(center, radius, 2.0 * PI * f(i) / f(n)))
        .collect()
}

/// Incident edge count per node; a self-loop counts twice
pub(crate) fn degrees(nodes: &[Node], edges: &[Edge]) -> Vec<usize> {
    let mut degree = vec![0usize; nodes.len()];
    for (s, t) in edge_indices(nodes, edges) {
        degree[s] += 1;
        degree[t] += 1;
    }
    degree
}

/// Highest-degree node at the centre, the rest on rings of
/// [`RING_CAPACITY`] in descending degree order. Ties keep input order.
pub(crate) fn degree_ranked_layout(
    nodes: &[Node],
    edges: &[Edge],
    params: &LayoutParams,
) -> Vec<Point> {
    let n = nodes.len();
    let degree = degrees(nodes, edges);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| degree[b].cmp(&degree[a]));

    let center = params.center();
    let outer = n - 1;
    let rings = outer.div_ceil(RING_CAPACITY).max(1);
    let ring_gap = params
        .spacing
        .min(MAX_RING_FACTOR * params.min_extent() / f(rings));

    let mut points = vec![center; n];
    for (rank, &idx) in order.iter().enumerate().skip(1) {
        let slot = rank - 1;
        let ring = slot / RING_CAPACITY;
        let in_ring = RING_CAPACITY.min(outer - ring * RING_CAPACITY);
        let pos = slot % RING_CAPACITY;
        let angle = 2.0 * PI * f(pos) / f(in_ring);
        points[idx] = on_circle(center, f(ring + 1) * ring_gap, angle);
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(n: usize) -> Vec<Node> {
        (0..n).map(|i| Node::new(format!("n{i}"), "")).collect()
    }

    fn close(a: Point, b: Point) -> bool {
        a.distance(&b) < 1e-9
    }

    #[test]
    fn test_circular_layout_four_nodes() {
        let params = LayoutParams::new(1000.0, 1000.0, 100.0);
        let points = circular_layout(&nodes(4), &params);

        // radius = 0.3 * 1000, angles 0, 90, 180, 270 degrees
        assert!(close(points[0], Point::new(800.0, 500.0)));
        assert!(close(points[1], Point::new(500.0, 800.0)));
        assert!(close(points[2], Point::new(200.0, 500.0)));
        assert!(close(points[3], Point::new(500.0, 200.0)));
    }

    #[test]
    fn test_circular_uses_smaller_side() {
        let params = LayoutParams::new(1000.0, 400.0, 100.0);
        let points = circular_layout(&nodes(3), &params);
        for p in points {
            assert!((p.distance(&params.center()) - 120.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_degree_ranked_hub_at_center() {
        let list = nodes(4);
        let edges = vec![
            Edge::new("n0", "n3"),
            Edge::new("n1", "n3"),
            Edge::new("n2", "n3"),
        ];
        let params = LayoutParams::new(600.0, 600.0, 100.0);
        let points = degree_ranked_layout(&list, &edges, &params);

        assert_eq!(points[3], params.center());
        for p in &points[..3] {
            assert!((p.distance(&params.center()) - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_degree_ranked_ring_capacity() {
        let list = nodes(1 + RING_CAPACITY + 2);
        let params = LayoutParams::new(2000.0, 2000.0, 100.0);
        let points = degree_ranked_layout(&list, &[], &params);
        let center = params.center();

        let first_ring = points
            .iter()
            .filter(|p| (p.distance(&center) - 100.0).abs() < 1e-9)
            .count();
        let second_ring = points
            .iter()
            .filter(|p| (p.distance(&center) - 200.0).abs() < 1e-9)
            .count();
        assert_eq!(first_ring, RING_CAPACITY);
        assert_eq!(second_ring, 2);
    }

    #[test]
    fn test_degree_ties_keep_input_order() {
        let list = nodes(3);
        let params = LayoutParams::new(600.0, 600.0, 100.0);
        let points = degree_ranked_layout(&list, &[], &params);
        assert_eq!(points[0], params.center());
    }

    #[test]
    fn test_degrees_ignore_unknown_endpoints() {
        let list = nodes(2);
        let edges = vec![Edge::new("n0", "n1"), Edge::new("n0", "ghost")];
        assert_eq!(degrees(&list, &edges), vec![1, 1]);
    }
}
