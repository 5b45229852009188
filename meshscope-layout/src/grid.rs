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

//! Grid-based layouts: plain grid and group-clustered

use crate::engine::{f, on_circle, LayoutParams};
use meshscope_core::{Node, Point};
use std::collections::HashMap;
use std::f64::consts::PI;

/// Cluster radius cap as a fraction of the smaller cell side
const CLUSTER_FILL: f64 = 0.4;

/// Row-major cell grid with `ceil(sqrt(count))` columns
#[derive(Debug, Clone, Copy)]
struct Cells {
    cols: usize,
    cell_width: f64,
    cell_height: f64,
}

impl Cells {
    fn new(count: usize, params: &LayoutParams) -> Self {
        let cols = (f(count).sqrt().ceil() as usize).max(1);
        let rows = count.div_ceil(cols).max(1);
        Self {
            cols,
            cell_width: params.width / f(cols),
            cell_height: params.height / f(rows),
        }
    }

    fn center(&self, index: usize) -> Point {
        let row = index / self.cols;
        let col = index % self.cols;
        Point::new(
            (f(col) + 0.5) * self.cell_width,
            (f(row) + 0.5) * self.cell_height,
        )
    }
}

pub(crate) fn grid_layout(nodes: &[Node], params: &LayoutParams) -> Vec<Point> {
    let cells = Cells::new(nodes.len(), params);
    (0..nodes.len()).map(|i| cells.center(i)).collect()
}

/// Member indices per group in first-appearance order. Ungrouped nodes are
/// singleton groups.
pub(crate) fn clusters(nodes: &[Node]) -> Vec<Vec<usize>> {
    let mut clusters: Vec<Vec<usize>> = Vec::new();
    let mut by_name: HashMap<&str, usize> = HashMap::new();
    for (i, node) in nodes.iter().enumerate() {
        match node.group_name() {
            Some(name) => {
                let slot = *by_name.entry(name).or_insert_with(|| {
                    clusters.push(Vec::new());
                    clusters.len() - 1
                });
                clusters[slot].push(i);
            }
            None => clusters.push(vec![i]),
        }
    }
    clusters
}

/// Group centres on a grid; members on a circle whose chord between
/// neighbours is about `spacing`, shrunk to fit the cell.
pub(crate) fn group_clustered_layout(nodes: &[Node], params: &LayoutParams) -> Vec<Point> {
    let groups = clusters(nodes);
    let cells = Cells::new(groups.len(), params);
    let max_radius = CLUSTER_FILL * cells.cell_width.min(cells.cell_height);

    let mut points = vec![params.center(); nodes.len()];
    for (g, members) in groups.iter().enumerate() {
        let center = cells.center(g);
        let m = members.len();
        if m == 1 {
            points[members[0]] = center;
            continue;
        }
        let radius = (params.spacing / (2.0 * (PI / f(m)).sin())).min(max_radius);
        for (j, &idx) in members.iter().enumerate() {
            points[idx] = on_circle(center, radius, 2.0 * PI * f(j) / f(m));
        }
    }
    points
}
