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

//! Meshscope configuration
//!
//! Settings come from, in increasing priority: built-in defaults, a TOML
//! file, and `MESHSCOPE_*` environment variables.
//!
//! ```toml
//! [view]
//! layout = "group-clustered"
//! width = 1600.0
//! height = 900.0
//! spacing = 140.0
//!
//! [router]
//! max_offset = 50.0
//! min_separation = 40.0
//!
//! [live]
//! poll_interval_ms = 5000
//! ```

use crate::error::{MeshscopeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

/// Layout algorithm selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LayoutKind {
    #[default]
    Force,
    Hierarchical,
    Circular,
    Grid,
    GroupClustered,
    DegreeRanked,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 6] = [
        LayoutKind::Force,
        LayoutKind::Hierarchical,
        LayoutKind::Circular,
        LayoutKind::Grid,
        LayoutKind::GroupClustered,
        LayoutKind::DegreeRanked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::Force => "force",
            LayoutKind::Hierarchical => "hierarchical",
            LayoutKind::Circular => "circular",
            LayoutKind::Grid => "grid",
            LayoutKind::GroupClustered => "group-clustered",
            LayoutKind::DegreeRanked => "degree-ranked",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutKind {
    type Err = MeshscopeError;

    /// Unknown names are an error rather than a silent fallback.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "force" | "force-directed" => Ok(LayoutKind::Force),
            "hierarchical" | "hierarchy" => Ok(LayoutKind::Hierarchical),
            "circular" | "circle" => Ok(LayoutKind::Circular),
            "grid" => Ok(LayoutKind::Grid),
            "group-clustered" | "clustered" | "group" => Ok(LayoutKind::GroupClustered),
            "degree-ranked" | "degree" | "concentric" => Ok(LayoutKind::DegreeRanked),
            _ => Err(MeshscopeError::UnsupportedLayout(s.to_string())),
        }
    }
}

impl TryFrom<String> for LayoutKind {
    type Error = MeshscopeError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<LayoutKind> for String {
    fn from(kind: LayoutKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Canvas and layout settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub layout: LayoutKind,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    /// Target node separation for force and group-clustered layouts
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    /// Fixed step count of the force simulation
    #[serde(default = "default_force_iterations")]
    pub force_iterations: usize,
}

fn default_width() -> f64 {
    1200.0
}

fn default_height() -> f64 {
    800.0
}

fn default_spacing() -> f64 {
    120.0
}

fn default_force_iterations() -> usize {
    300
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            layout: LayoutKind::default(),
            width: default_width(),
            height: default_height(),
            spacing: default_spacing(),
            force_iterations: default_force_iterations(),
        }
    }
}

/// Parallel-edge routing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterSettings {
    /// Largest curve offset assigned within one node pair
    #[serde(default = "default_max_offset")]
    pub max_offset: f64,
    /// Control points of unrelated edges closer than this get mirrored
    #[serde(default = "default_min_separation")]
    pub min_separation: f64,
}

fn default_max_offset() -> f64 {
    50.0
}

fn default_min_separation() -> f64 {
    40.0
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            max_offset: default_max_offset(),
            min_separation: default_min_separation(),
        }
    }
}

/// Live polling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveSettings {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    5_000
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshscopeConfig {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub router: RouterSettings,
    #[serde(default)]
    pub live: LiveSettings,
}

impl MeshscopeConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables over defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration with priority: env > file > defaults
    pub fn load(config_file: Option<PathBuf>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) if path.exists() => {
                info!("Loading configuration from file: {:?}", path);
                Self::from_file(&path)?
            }
            Some(path) => {
                warn!("Config file not found: {:?}, using defaults", path);
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from the process environment
    ///
    /// Supported environment variables:
    /// - MESHSCOPE_LAYOUT: layout name (unknown names are an error)
    /// - MESHSCOPE_WIDTH / MESHSCOPE_HEIGHT: canvas size
    /// - MESHSCOPE_SPACING: node spacing
    /// - MESHSCOPE_FORCE_ITERATIONS: force simulation steps
    /// - MESHSCOPE_POLL_INTERVAL_MS: live poll interval
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Same as [`apply_env`](Self::apply_env) with an injectable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(layout) = lookup("MESHSCOPE_LAYOUT") {
            self.view.layout = layout.parse()?;
        }
        if let Some(val) = parse_env(&lookup, "MESHSCOPE_WIDTH") {
            self.view.width = val;
        }
        if let Some(val) = parse_env(&lookup, "MESHSCOPE_HEIGHT") {
            self.view.height = val;
        }
        if let Some(val) = parse_env(&lookup, "MESHSCOPE_SPACING") {
            self.view.spacing = val;
        }
        if let Some(val) = parse_env(&lookup, "MESHSCOPE_FORCE_ITERATIONS") {
            self.view.force_iterations = val;
        }
        if let Some(val) = parse_env(&lookup, "MESHSCOPE_POLL_INTERVAL_MS") {
            self.live.poll_interval_ms = val;
        }
        self.validate()
    }

    /// Reject canvases and spacings the layouts cannot work with
    pub fn validate(&self) -> Result<()> {
        let view = &self.view;
        for (name, value) in [
            ("width", view.width),
            ("height", view.height),
            ("spacing", view.spacing),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(MeshscopeError::Config(format!(
                    "view.{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if !self.router.max_offset.is_finite() || self.router.max_offset < 0.0 {
            return Err(MeshscopeError::Config(
                "router.max_offset must be non-negative".into(),
            ));
        }
        if self.live.poll_interval_ms == 0 {
            return Err(MeshscopeError::Config(
                "live.poll_interval_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

fn parse_env<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(val) => Some(val),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable environment override");
            None
        }
    }
}
