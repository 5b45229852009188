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

//! Connected components and summary statistics

use crate::model::{Graph, TrafficClass};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Count connected components of the undirected projection of `graph`.
///
/// Iterative depth-first search rooted at each unvisited node in node order.
pub fn count_components(graph: &Graph) -> usize {
    let index: HashMap<&str, usize> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); graph.nodes.len()];
    for edge in &graph.edges {
        if let (Some(&s), Some(&t)) = (index.get(edge.source.as_str()), index.get(edge.target.as_str())) {
            adjacency[s].push(t);
            adjacency[t].push(s);
        }
    }

    let mut visited = vec![false; graph.nodes.len()];
    let mut components = 0;
    let mut stack = Vec::new();

    for root in 0..graph.nodes.len() {
        if visited[root] {
            continue;
        }
        components += 1;
        visited[root] = true;
        stack.push(root);
        while let Some(current) = stack.pop() {
            for &next in &adjacency[current] {
                if !visited[next] {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }
    }

    components
}

/// Summary statistics shown alongside a rendered graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub total_connections: u64,
    pub components: usize,
    pub circular_edges: usize,
    pub same_group_edges: usize,
    pub cross_group_edges: usize,
    pub unknown_group_edges: usize,
    pub status_totals: BTreeMap<String, u64>,
}

impl GraphSummary {
    pub fn from_graph(graph: &Graph) -> Self {
        let mut summary = GraphSummary {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            components: count_components(graph),
            ..Default::default()
        };

        for edge in &graph.edges {
            summary.total_connections += edge.connection_count;
            if edge.is_circular {
                summary.circular_edges += 1;
            }
            match edge.traffic_class {
                TrafficClass::SameGroup => summary.same_group_edges += 1,
                TrafficClass::CrossGroup => summary.cross_group_edges += 1,
                TrafficClass::UnknownGroup => summary.unknown_group_edges += 1,
            }
            for (status, count) in &edge.status_counts {
                *summary.status_totals.entry(status.clone()).or_insert(0) += count;
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::model::RawRecord;

    fn graph_of(pairs: &[(&str, &str)]) -> Graph {
        let batch = pairs.iter().map(|(s, t)| RawRecord::new(*s, *t)).collect();
        aggregate(&[batch])
    }

    #[test]
    fn test_empty_graph_has_no_components() {
        assert_eq!(count_components(&Graph::new()), 0);
    }

    #[test]
    fn test_two_disjoint_triangles() {
        let graph = graph_of(&[
            ("a", "b"),
            ("b", "c"),
            ("c", "a"),
            ("x", "y"),
            ("y", "z"),
            ("z", "x"),
        ]);
        assert_eq!(count_components(&graph), 2);
    }

    #[test]
    fn test_star_is_one_component() {
        let graph = graph_of(&[("hub", "a"), ("hub", "b"), ("c", "hub"), ("d", "hub")]);
        assert_eq!(graph.node_count(), 5);
        assert_eq!(count_components(&graph), 1);
    }

    #[test]
    fn test_direction_ignored_and_isolated_nodes_counted() {
        let mut graph = graph_of(&[("a", "b"), ("c", "b")]);
        graph.add_node(crate::model::Node::new("lonely", "lonely"));
        assert_eq!(count_components(&graph), 2);
    }

    #[test]
    fn test_summary_tallies() {
        let batch = vec![
            RawRecord::new("a", "b").with_groups(Some("g"), Some("g")).with_status("200"),
            RawRecord::new("a", "b").with_status("200"),
            RawRecord::new("b", "c").with_groups(None, Some("h")).with_status("500"),
            RawRecord::new("x", "y"),
        ];
        let graph = aggregate(&[batch]);
        let summary = GraphSummary::from_graph(&graph);

        assert_eq!(summary.node_count, 5);
        assert_eq!(summary.edge_count, 3);
        assert_eq!(summary.total_connections, 4);
        assert_eq!(summary.components, 2);
        assert_eq!(summary.same_group_edges, 1);
        assert_eq!(summary.cross_group_edges, 1);
        assert_eq!(summary.unknown_group_edges, 1);
        assert_eq!(summary.status_totals.get("200"), Some(&2));
        assert_eq!(summary.status_totals.get("500"), Some(&1));
    }
}
