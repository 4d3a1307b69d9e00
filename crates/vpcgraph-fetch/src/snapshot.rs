//! Saved record sets.
//!
//! A snapshot is a JSON object mapping a category to its record list. Keys
//! may be the category name (`route_table`) as written by [`save_snapshot`],
//! or the EC2 response key (`RouteTables`), so concatenated
//! `aws ec2 describe-*` outputs load as well.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::Value;
use tracing::warn;

use vpcgraph_core::{Category, RawRecord, TopologyRecords};
use vpcgraph_error::{Error, ErrorKind, Result};

use crate::ResourceFetcher;

/// Serves records from a snapshot file instead of the provider.
#[derive(Debug, Clone)]
pub struct SnapshotFetcher {
    path: PathBuf,
    records: TopologyRecords,
}

impl SnapshotFetcher {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            let base = if err.kind() == std::io::ErrorKind::NotFound {
                Error::file_not_found(path.display().to_string())
            } else {
                Error::new(ErrorKind::IoFailed, "failed to read snapshot")
                    .with_context("path", path.display().to_string())
            };
            base.with_operation("snapshot::open").set_source(err)
        })?;
        let records = parse_snapshot(&text)
            .map_err(|e| e.with_context("path", path.display().to_string()))?;
        Ok(Self::from_records(path, records))
    }

    pub fn from_records(path: impl Into<PathBuf>, records: TopologyRecords) -> Self {
        Self {
            path: path.into(),
            records,
        }
    }

    pub fn records(&self) -> &TopologyRecords {
        &self.records
    }
}

impl ResourceFetcher for SnapshotFetcher {
    fn describe_source(&self) -> String {
        format!("snapshot {}", self.path.display())
    }

    fn describe(&self, category: Category) -> Result<Vec<RawRecord>> {
        Ok(self.records.get(category).to_vec())
    }
}

fn category_for_key(key: &str) -> Option<Category> {
    Category::from_str(key)
        .ok()
        .filter(|c| *c != Category::Unknown)
        .or_else(|| {
            Category::FETCHED
                .into_iter()
                .find(|c| c.response_key() == Some(key))
        })
}

/// Parse snapshot text into records. Unknown keys and non-object entries
/// are ignored with a warning.
pub fn parse_snapshot(text: &str) -> Result<TopologyRecords> {
    let value: Value = serde_json::from_str(text).map_err(|err| {
        Error::new(ErrorKind::DeserializationFailed, "snapshot is not valid JSON")
            .with_operation("snapshot::parse")
            .set_source(err)
    })?;
    let Value::Object(entries) = value else {
        return Err(Error::invalid_format("snapshot must be a JSON object")
            .with_operation("snapshot::parse"));
    };

    let mut records = TopologyRecords::new();
    for (key, value) in entries {
        let Some(category) = category_for_key(&key) else {
            warn!(key = %key, "ignoring unknown snapshot section");
            continue;
        };
        let Value::Array(items) = value else {
            return Err(Error::invalid_format(format!("section '{key}' is not a list"))
                .with_operation("snapshot::parse")
                .with_context("category", category.as_str()));
        };
        for (index, item) in items.into_iter().enumerate() {
            match item {
                Value::Object(map) => records.push(category, map),
                other => warn!(%category, index, value = %other, "ignoring non-object record"),
            }
        }
    }
    Ok(records)
}

/// Write `records` as a snapshot readable by [`SnapshotFetcher`].
pub fn save_snapshot(path: impl AsRef<Path>, records: &TopologyRecords) -> Result<()> {
    let path = path.as_ref();
    let text = serde_json::to_string_pretty(records).map_err(|err| {
        Error::new(ErrorKind::SerializationFailed, "failed to serialize records")
            .with_operation("snapshot::save")
            .set_source(err)
    })?;
    fs::write(path, text).map_err(|err| {
        Error::new(ErrorKind::IoFailed, "failed to write snapshot")
            .with_operation("snapshot::save")
            .with_context("path", path.display().to_string())
            .set_source(err)
    })
}
