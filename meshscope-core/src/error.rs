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

//! Meshscope error types

use thiserror::Error;

/// Result type for meshscope operations
pub type Result<T> = std::result::Result<T, MeshscopeError>;

/// Errors that can occur while building, laying out or routing a graph
#[derive(Debug, Error)]
pub enum MeshscopeError {
    /// Input document has the wrong overall shape (e.g. not an array of batches)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Layout name outside the supported set
    #[error("Unsupported layout: {0}")]
    UnsupportedLayout(String),

    /// Node id not present in the graph
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Edge endpoint references a node that was never registered
    #[error("Edge {edge_id} references unknown node {node_id}")]
    DanglingEdge { edge_id: String, node_id: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Live record source failed to produce a batch
    #[error("Record source error: {0}")]
    Source(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for MeshscopeError {
    fn from(e: serde_json::Error) -> Self {
        MeshscopeError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for MeshscopeError {
    fn from(e: toml::de::Error) -> Self {
        MeshscopeError::Config(e.to_string())
    }
}
