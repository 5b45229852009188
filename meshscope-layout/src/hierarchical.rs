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

//! Hierarchical layout
//!
//! Nodes with no incoming edge form level 0; a breadth-first walk gives each
//! node the level after the one it was first reached from. Nodes no root can
//! reach (pure cycles) start a fresh walk at level 0, in input order. Levels
//! stack top to bottom and each level spreads evenly across the width.

use crate::engine::{edge_indices, f, LayoutParams};
use meshscope_core::{Edge, Node, Point};
use std::collections::VecDeque;

/// Level of every node, indexed like `nodes`
pub(crate) fn assign_levels(nodes: &[Node], edges: &[Edge]) -> Vec<usize> {
    let n = nodes.len();
    let mut in_degree = vec![0usize; n];
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (s, t) in edge_indices(nodes, edges) {
        // A self-loop does not make its node a child
        if s == t {
            continue;
        }
        in_degree[t] += 1;
        outgoing[s].push(t);
    }

    let mut level: Vec<Option<usize>> = vec![None; n];
    let mut queue = VecDeque::new();

    let walk = |queue: &mut VecDeque<usize>, level: &mut Vec<Option<usize>>| {
        while let Some(u) = queue.pop_front() {
            let next = level[u].unwrap_or(0) + 1;
            for &v in &outgoing[u] {
                if level[v].is_none() {
                    level[v] = Some(next);
                    queue.push_back(v);
                }
            }
        }
    };

    for i in (0..n).filter(|&i| in_degree[i] == 0) {
        level[i] = Some(0);
        queue.push_back(i);
    }
    walk(&mut queue, &mut level);

    for i in 0..n {
        if level[i].is_none() {
            level[i] = Some(0);
            queue.push_back(i);
            walk(&mut queue, &mut level);
        }
    }

    level.into_iter().map(|l| l.unwrap_or(0)).collect()
}

pub(crate) fn hierarchical_layout(
    nodes: &[Node],
    edges: &[Edge],
    params: &LayoutParams,
) -> Vec<Point> {
    let levels = assign_levels(nodes, edges);
    let depth = levels.iter().copied().max().unwrap_or(0) + 1;

    let mut per_level = vec![0usize; depth];
    for &l in &levels {
        per_level[l] += 1;
    }

    let level_height = params.height / f(depth);
    let mut placed = vec![0usize; depth];
    levels
        .iter()
        .map(|&l| {
            let slot = placed[l];
            placed[l] += 1;
            let level_width = params.width / f(per_level[l]);
            Point::new(
                (f(slot) + 0.5) * level_width,
                (f(l) + 0.5) * level_height,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_list(ids: &[&str]) -> Vec<Node> {
        ids.iter().map(|id| Node::new(*id, *id)).collect()
    }

    #[test]
    fn test_levels_follow_bfs() {
        let nodes = node_list(&["root", "a", "b", "leaf"]);
        let edges = vec![
            Edge::new("root", "a"),
            Edge::new("root", "b"),
            Edge::new("a", "leaf"),
            Edge::new("b", "leaf"),
        ];
        assert_eq!(assign_levels(&nodes, &edges), vec![0, 1, 1, 2]);
    }

    #[test]
    fn test_first_reach_wins() {
        // leaf is reached from root at level 1 before the longer path via a
        let nodes = node_list(&["root", "a", "leaf"]);
        let edges = vec![
            Edge::new("root", "leaf"),
            Edge::new("root", "a"),
            Edge::new("a", "leaf"),
        ];
        assert_eq!(assign_levels(&nodes, &edges), vec![0, 1, 1]);
    }

    #[test]
    fn test_cycle_without_root_still_levelled() {
        let nodes = node_list(&["a", "b", "c"]);
        let edges = vec![Edge::new("a", "b"), Edge::new("b", "c"), Edge::new("c", "a")];
        assert_eq!(assign_levels(&nodes, &edges), vec![0, 1, 2]);
    }

    #[test]
    fn test_self_loop_keeps_root() {
        let nodes = node_list(&["a", "b"]);
        let edges = vec![Edge::new("a", "a"), Edge::new("a", "b")];
        assert_eq!(assign_levels(&nodes, &edges), vec![0, 1]);
    }

    #[test]
    fn test_hierarchical_positions() {
        let nodes = node_list(&["root", "a", "b"]);
        let edges = vec![Edge::new("root", "a"), Edge::new("root", "b")];
        let params = LayoutParams::new(400.0, 200.0, 50.0);
        let points = hierarchical_layout(&nodes, &edges, &params);

        assert_eq!(points[0], Point::new(200.0, 50.0));
        assert_eq!(points[1], Point::new(100.0, 150.0));
        assert_eq!(points[2], Point::new(300.0, 150.0));
    }
}
