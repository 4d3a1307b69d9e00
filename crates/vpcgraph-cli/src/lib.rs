//! vpcgraph command-line interface.
//!
pub mod options;
pub mod output;
pub mod pipeline;

use std::path::PathBuf;

use tracing::info;

use vpcgraph_error::Result;
use vpcgraph_fetch::save_snapshot;
use vpcgraph_render::{RenderFormat, StyleConfig};

pub use options::{OutputOptions, SourceOptions};

/// Options for one vpcgraph run.
#[derive(Debug, Clone)]
pub struct VpcgraphOptions {
    pub output: PathBuf,
    pub source: SourceOptions,
    pub render: OutputOptions,
}

impl VpcgraphOptions {
    pub fn new(output: impl Into<PathBuf>, source: SourceOptions) -> Self {
        Self {
            output: output.into(),
            source,
            render: OutputOptions::default(),
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub format: RenderFormat,
    pub nodes: usize,
    pub edges: usize,
    pub skipped: usize,
}

/// Main entry point
pub fn run_main(opts: &VpcgraphOptions) -> Result<RunSummary> {
    // Style problems surface before any describe call is made.
    let style = match &opts.render.style {
        Some(path) => StyleConfig::from_toml_file(path)?,
        None => StyleConfig::default(),
    };
    let format = output::resolve_format(opts.render.format, &opts.output);

    let records = pipeline::fetch_records(&opts.source)?;
    if let Some(path) = &opts.render.dump {
        save_snapshot(path, &records)?;
        info!(path = %path.display(), "snapshot saved");
    }

    let (graph, report) = pipeline::build_graph(&records);
    let bytes = pipeline::render_graph(&graph, format, &style)?;
    output::write_output(&opts.output, &bytes)?;

    Ok(RunSummary {
        output: opts.output.clone(),
        format,
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        skipped: report.skipped.len(),
    })
}
