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

//! Meshscope CLI
//!
//! Aggregates relationship records or trace spans into a service graph, lays
//! it out and writes the render-ready JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use meshscope_core::{
    aggregate, parse_batches_str, parse_spans_str, records_from_spans, Graph, GraphSummary,
    LayoutKind, MeshscopeConfig, RawRecord, RenderedGraph,
};
use meshscope_layout::{mark_circular, prepare_view};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meshscope")]
#[command(about = "Meshscope - service relationship graph builder", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,

    /// Output as JSON (machine-readable)
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// Relationship records (a batch or an array of batches)
    Records,
    /// Trace spans with parent links
    Spans,
}

#[derive(Subcommand)]
enum Commands {
    /// Build, lay out and route a graph, writing the render JSON
    Render {
        /// Input files, one or more batches each
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Input format
        #[arg(long, value_enum, default_value = "records")]
        format: InputFormat,

        /// Layout algorithm (overrides config)
        #[arg(long)]
        layout: Option<String>,

        /// Canvas width (overrides config)
        #[arg(long)]
        width: Option<f64>,

        /// Canvas height (overrides config)
        #[arg(long)]
        height: Option<f64>,

        /// Node spacing (overrides config)
        #[arg(long)]
        spacing: Option<f64>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print graph statistics
    Stats {
        /// Input files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Input format
        #[arg(long, value_enum, default_value = "records")]
        format: InputFormat,
    },

    /// List available layout algorithms
    Layouts,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderOutput {
    layout: LayoutKind,
    width: f64,
    height: f64,
    #[serde(flatten)]
    graph: RenderedGraph,
    summary: GraphSummary,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Read every input file into record batches, in argument order
fn read_batches(inputs: &[PathBuf], format: InputFormat) -> Result<Vec<Vec<RawRecord>>> {
    let mut batches = Vec::new();
    for path in inputs {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read input {}", path.display()))?;
        match format {
            InputFormat::Records => {
                let parsed = parse_batches_str(&text)
                    .with_context(|| format!("Invalid record input {}", path.display()))?;
                if parsed.skipped > 0 {
                    warn!(
                        path = %path.display(),
                        skipped = parsed.skipped,
                        "Skipped undecodable records"
                    );
                }
                debug!(path = %path.display(), records = parsed.record_count(), "Read records");
                batches.extend(parsed.batches);
            }
            InputFormat::Spans => {
                let spans = parse_spans_str(&text)
                    .with_context(|| format!("Invalid span input {}", path.display()))?;
                debug!(path = %path.display(), spans = spans.len(), "Read spans");
                batches.push(records_from_spans(&spans));
            }
        }
    }
    Ok(batches)
}

fn build_graph(inputs: &[PathBuf], format: InputFormat) -> Result<Graph> {
    let batches = read_batches(inputs, format)?;
    let graph = aggregate(&batches);
    graph.validate().context("Aggregated graph is inconsistent")?;
    Ok(graph)
}

fn write_output(output: Option<&Path>, body: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, body)
                .with_context(|| format!("Failed to write output {}", path.display()))?;
            info!(path = %path.display(), "Wrote render output");
        }
        None => println!("{}", body),
    }
    Ok(())
}

fn print_summary(summary: &GraphSummary) {
    println!("Meshscope Statistics");
    println!("====================");
    println!();
    println!("Nodes:        {}", summary.node_count);
    println!("Edges:        {}", summary.edge_count);
    println!("Connections:  {}", summary.total_connections);
    println!("Components:   {}", summary.components);
    println!("Circular:     {}", summary.circular_edges);
    println!();
    println!("Traffic:");
    println!("  same-group:    {}", summary.same_group_edges);
    println!("  cross-group:   {}", summary.cross_group_edges);
    println!("  unknown-group: {}", summary.unknown_group_edges);
    if !summary.status_totals.is_empty() {
        println!();
        println!("Statuses:");
        for (status, count) in &summary.status_totals {
            println!("  {:<8} {}", status, count);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config =
        MeshscopeConfig::load(cli.config.clone()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Render {
            inputs,
            format,
            layout,
            width,
            height,
            spacing,
            output,
        } => {
            if let Some(name) = layout {
                config.view.layout = name.parse()?;
            }
            if let Some(width) = width {
                config.view.width = width;
            }
            if let Some(height) = height {
                config.view.height = height;
            }
            if let Some(spacing) = spacing {
                config.view.spacing = spacing;
            }
            config.validate().context("Invalid layout options")?;

            let mut graph = build_graph(&inputs, format)?;
            prepare_view(&mut graph, &config);

            let rendered = RenderOutput {
                layout: config.view.layout,
                width: config.view.width,
                height: config.view.height,
                graph: RenderedGraph::from_graph(&graph),
                summary: GraphSummary::from_graph(&graph),
            };
            let body = serde_json::to_string_pretty(&rendered)?;
            write_output(output.as_deref(), &body)?;
        }

        Commands::Stats { inputs, format } => {
            let mut graph = build_graph(&inputs, format)?;
            mark_circular(&mut graph.edges);
            let summary = GraphSummary::from_graph(&graph);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }

        Commands::Layouts => {
            if cli.json {
                let names: Vec<&str> = LayoutKind::ALL.iter().map(LayoutKind::as_str).collect();
                println!("{}", serde_json::to_string(&names)?);
            } else {
                for kind in LayoutKind::ALL {
                    let marker = if kind == config.view.layout { "*" } else { " " };
                    println!("{} {}", marker, kind);
                }
            }
        }
    }

    Ok(())
}
