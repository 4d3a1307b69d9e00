//! Core pipeline: fetch → build graph → render.

use std::time::Instant;

use tracing::{info, warn};

use vpcgraph_core::{BuildReport, TopologyGraph, TopologyRecords, build_with_report};
use vpcgraph_error::Result;
use vpcgraph_fetch::{AwsCliFetcher, ResourceFetcher, SnapshotFetcher, fetch_topology};
use vpcgraph_render::{RenderFormat, StyleConfig};

use crate::options::SourceOptions;

/// Pick the fetcher for `source`: a snapshot when `--input` is given, the
/// AWS CLI otherwise.
pub fn open_fetcher(source: &SourceOptions) -> Result<Box<dyn ResourceFetcher>> {
    match &source.input {
        Some(path) => Ok(Box::new(SnapshotFetcher::open(path)?)),
        None => Ok(Box::new(AwsCliFetcher::new(source.aws_config()))),
    }
}

pub fn fetch_records(source: &SourceOptions) -> Result<TopologyRecords> {
    let fetch_start = Instant::now();
    let fetcher = open_fetcher(source)?;
    let records = fetch_topology(fetcher.as_ref())?;
    info!(
        "Fetching: {:.2}s ({} records)",
        fetch_start.elapsed().as_secs_f64(),
        records.total()
    );
    Ok(records)
}

pub fn build_graph(records: &TopologyRecords) -> (TopologyGraph, BuildReport) {
    let build_start = Instant::now();
    let (graph, report) = build_with_report(records);
    info!(
        "Graph building: {:.2}s ({} nodes, {} edges)",
        build_start.elapsed().as_secs_f64(),
        graph.node_count(),
        graph.edge_count()
    );
    log_build_report(&report);
    (graph, report)
}

fn log_build_report(report: &BuildReport) {
    for (category, count) in &report.accepted {
        info!("  {}: {count}", category.title());
    }
    if report.placeholders > 0 {
        info!("  placeholders for unfetched resources: {}", report.placeholders);
    }
    if report.duplicates > 0 {
        info!("  duplicate records merged: {}", report.duplicates);
    }
    if !report.skipped.is_empty() {
        warn!("skipped {} malformed records", report.skipped.len());
    }
}

pub fn render_graph(
    graph: &TopologyGraph,
    format: RenderFormat,
    style: &StyleConfig,
) -> Result<Vec<u8>> {
    let render_start = Instant::now();
    let bytes = format
        .renderer()
        .render(graph, style)
        .map_err(|e| {
            e.with_operation("pipeline::render_graph")
                .with_context("format", format.to_string())
        })?;
    info!(
        "Rendering {format}: {:.2}s ({} bytes)",
        render_start.elapsed().as_secs_f64(),
        bytes.len()
    );
    Ok(bytes)
}
