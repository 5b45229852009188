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

//! Meshscope Core
//!
//! Graph model and aggregation engine: turns relationship records into a
//! deduplicated node/edge graph with connection and status statistics.

pub mod aggregate;
pub mod classify;
pub mod components;
pub mod config;
pub mod error;
pub mod group;
pub mod ingest;
pub mod live;
pub mod model;
pub mod render;
pub mod span;

pub use aggregate::{aggregate, merge_batch, merge_graphs, AggregationStats, GraphAggregator};
pub use classify::classify;
pub use components::{count_components, GraphSummary};
pub use config::{LayoutKind, LiveSettings, MeshscopeConfig, RouterSettings, ViewConfig};
pub use error::{MeshscopeError, Result};
pub use group::{infer_group, merge_group, resolve_group};
pub use ingest::{parse_batches, parse_batches_str, EndpointRef, ParsedBatches, WireRecord};
pub use live::{
    shared, Clock, LivePoller, ManualClock, PollOutcome, RecordSource, SharedGraph, SystemClock,
};
pub use model::{edge_id, Edge, Graph, Group, GroupSource, Node, Point, RawRecord, TrafficClass};
pub use render::{RenderEdge, RenderNode, RenderedGraph};
pub use span::{parse_spans_str, records_from_spans, SpanRecord};
