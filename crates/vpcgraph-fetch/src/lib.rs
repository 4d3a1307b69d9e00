//! Resource fetchers.
//!
//! A fetcher issues one describe call per resource category and returns the
//! records as untyped attribute maps. Two implementations are provided:
//!
//! - [`AwsCliFetcher`]: shells out to the AWS CLI for the configured region
//!   and profile (the CLI resolves credentials and pagination)
//! - [`SnapshotFetcher`]: replays records saved earlier with [`save_snapshot`]
//!
//! [`fetch_topology`] drives a fetcher over every category, in order.

mod aws_cli;
mod snapshot;

use std::time::Instant;

use tracing::info;

use vpcgraph_core::{Category, RawRecord, TopologyRecords};
use vpcgraph_error::Result;

pub use aws_cli::{AwsCliFetcher, AwsConfig, DEFAULT_CLI, classify_failure, parse_response};
pub use snapshot::{SnapshotFetcher, parse_snapshot, save_snapshot};

/// A source of resource records.
pub trait ResourceFetcher {
    /// Short description for log lines (e.g. `aws-cli region=eu-west-1`).
    fn describe_source(&self) -> String;

    /// Fetch every record of `category`. Pagination, if any, is resolved
    /// before returning.
    fn describe(&self, category: Category) -> Result<Vec<RawRecord>>;
}

/// Describe every fetched category in builder order.
///
/// Calls are sequential; the first error aborts the run and is returned with
/// the failing category in its context.
pub fn fetch_topology(fetcher: &dyn ResourceFetcher) -> Result<TopologyRecords> {
    info!("Fetching topology from {}", fetcher.describe_source());

    let mut records = TopologyRecords::new();
    for category in Category::FETCHED {
        let start = Instant::now();
        let batch = fetcher
            .describe(category)
            .map_err(|e| e.with_operation("fetch::fetch_topology"))?;
        info!(
            "  {}: {} records in {:.2}s",
            category.title(),
            batch.len(),
            start.elapsed().as_secs_f64()
        );
        records.insert(category, batch);
    }
    Ok(records)
}
