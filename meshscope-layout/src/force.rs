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

//! Force-directed layout
//!
//! Fruchterman-Reingold style forces (repulsion `k²/d`, attraction `d²/k`, so
//! connected nodes settle near `k = spacing` apart) plus a pull toward the
//! canvas centre, velocity decay and a collision pass. The seed is a circle,
//! so identical input always yields identical output. Runs a fixed number of
//! steps; there is no convergence check.

use crate::engine::{edge_indices, on_circle, LayoutParams};
use meshscope_core::{Edge, Node, Point};
use std::f64::consts::PI;

/// Fraction of velocity kept between steps
const VELOCITY_RETENTION: f64 = 0.6;
/// Strength of the pull toward the canvas centre
const CENTER_GRAVITY: f64 = 0.05;
/// Collision radius as a fraction of the spacing
const COLLISION_FACTOR: f64 = 0.25;
/// Floor for distances, keeps forces finite
const MIN_DISTANCE: f64 = 0.01;
/// Final temperature as a fraction of the starting one
const FINAL_TEMPERATURE: f64 = 0.01;

/// Deterministic direction for separating coincident nodes
fn tie_break(i: usize, j: usize) -> (f64, f64) {
    let angle = (i * 31 + j * 17) as f64 * 0.618_033_988_75 * 2.0 * PI;
    (angle.cos(), angle.sin())
}

/// Unit vector from node `j` toward node `i` and their distance, never degenerate
fn separation(points: &[Point], i: usize, j: usize) -> (f64, f64, f64) {
    let dx = points[i].x - points[j].x;
    let dy = points[i].y - points[j].y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist < MIN_DISTANCE {
        let (ux, uy) = tie_break(i, j);
        (ux, uy, MIN_DISTANCE)
    } else {
        (dx / dist, dy / dist, dist)
    }
}

fn seed(n: usize, params: &LayoutParams) -> Vec<Point> {
    let center = params.center();
    // Circumference of about one spacing per node, kept on the canvas
    let radius = (params.spacing * n as f64 / (2.0 * PI))
        .min(0.4 * params.min_extent())
        .max(params.spacing.min(params.min_extent()) / 4.0);
    (0..n)
        .map(|i| on_circle(center, radius, 2.0 * PI * i as f64 / n as f64))
        .collect()
}

pub(crate) fn force_layout(nodes: &[Node], edges: &[Edge], params: &LayoutParams) -> Vec<Point> {
    let n = nodes.len();
    let mut points = seed(n, params);
    let links: Vec<(usize, usize)> = edge_indices(nodes, edges)
        .into_iter()
        .filter(|(s, t)| s != t)
        .collect();

    let center = params.center();
    let k = params.spacing;
    let k_squared = k * k;
    let collision = k * COLLISION_FACTOR;
    let steps = params.iterations;

    let mut temperature = params.min_extent() / 10.0;
    let cooling = if steps > 0 {
        FINAL_TEMPERATURE.powf(1.0 / steps as f64)
    } else {
        1.0
    };
    let mut velocity = vec![(0.0_f64, 0.0_f64); n];

    for _ in 0..steps {
        let mut forces = vec![(0.0_f64, 0.0_f64); n];

        // Repulsion between all pairs
        for i in 0..n {
            for j in (i + 1)..n {
                let (ux, uy, dist) = separation(&points, i, j);
                let force = k_squared / dist;
                forces[i].0 += ux * force;
                forces[i].1 += uy * force;
                forces[j].0 -= ux * force;
                forces[j].1 -= uy * force;
            }
        }

        // Attraction along edges
        for &(s, t) in &links {
            let (ux, uy, dist) = separation(&points, t, s);
            let force = dist * dist / k;
            forces[s].0 += ux * force;
            forces[s].1 += uy * force;
            forces[t].0 -= ux * force;
            forces[t].1 -= uy * force;
        }

        // Centering
        for (i, p) in points.iter().enumerate() {
            forces[i].0 += (center.x - p.x) * CENTER_GRAVITY;
            forces[i].1 += (center.y - p.y) * CENTER_GRAVITY;
        }

        for i in 0..n {
            let (fx, fy) = forces[i];
            let mag = (fx * fx + fy * fy).sqrt().max(MIN_DISTANCE);
            let capped = mag.min(temperature);
            velocity[i].0 = velocity[i].0 * VELOCITY_RETENTION + fx / mag * capped;
            velocity[i].1 = velocity[i].1 * VELOCITY_RETENTION + fy / mag * capped;

            let p = &mut points[i];
            p.x = (p.x + velocity[i].0).clamp(0.0, params.width);
            p.y = (p.y + velocity[i].1).clamp(0.0, params.height);
        }

        resolve_collisions(&mut points, collision, params);
        temperature *= cooling;
    }

    points
}

/// Push overlapping nodes apart until they sit `2 * radius` from each other
fn resolve_collisions(points: &mut [Point], radius: f64, params: &LayoutParams) {
    let min_dist = 2.0 * radius;
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let (ux, uy, dist) = separation(points, i, j);
            if dist >= min_dist {
                continue;
            }
            let push = (min_dist - dist) / 2.0;
            points[i].x = (points[i].x + ux * push).clamp(0.0, params.width);
            points[i].y = (points[i].y + uy * push).clamp(0.0, params.height);
            points[j].x = (points[j].x - ux * push).clamp(0.0, params.width);
            points[j].y = (points[j].y - uy * push).clamp(0.0, params.height);
        }
    }
}
