//! Topology graph construction.
//!
//! Records are consumed category by category in [`Category::FETCHED`] order:
//! VPCs, subnets, route tables, ACLs, endpoints, then interfaces. Parents
//! therefore usually exist before anything points at them. When a reference
//! has no node yet, a placeholder of category `Unknown` is created so the
//! edge is kept; a record fetched later for the same id replaces it.

use tracing::{debug, trace, warn};

use crate::attrs::flatten_attributes;
use crate::category::Category;
use crate::graph::{Node, TopologyGraph, Upsert};
use crate::identity::{EdgeKey, NodeId};
use crate::record::{
    NetworkAclRecord, NetworkInterfaceRecord, RawRecord, ResourceRecord, RouteTableRecord,
    SubnetRecord, TopologyRecords, VpcEndpointRecord, VpcRecord, extract,
};

/// A record the builder could not use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub category: Category,
    /// Position in the category's record sequence.
    pub index: usize,
    /// Provider id, when the record had a readable one.
    pub id: Option<String>,
    pub reason: String,
}

/// What happened while building, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Records turned into nodes, per category in processing order.
    pub accepted: Vec<(Category, usize)>,
    pub skipped: Vec<SkippedRecord>,
    /// Placeholders created for dangling references.
    pub placeholders: usize,
    /// Placeholders later replaced by a fetched record.
    pub upgraded: usize,
    /// Records whose id had already been seen.
    pub duplicates: usize,
}

impl BuildReport {
    pub fn accepted_total(&self) -> usize {
        self.accepted.iter().map(|(_, n)| n).sum()
    }

    pub fn skipped_in(&self, category: Category) -> usize {
        self.skipped.iter().filter(|s| s.category == category).count()
    }

    fn count_accepted(&mut self, category: Category) {
        match self.accepted.iter_mut().find(|(c, _)| *c == category) {
            Some((_, n)) => *n += 1,
            None => self.accepted.push((category, 1)),
        }
    }
}

/// Incremental builder over one [`TopologyGraph`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: TopologyGraph,
    report: BuildReport,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed every category of `records`, in processing order.
    pub fn ingest(&mut self, records: &TopologyRecords) {
        for category in Category::FETCHED {
            let batch = records.get(category);
            if batch.is_empty() {
                continue;
            }
            debug!(%category, records = batch.len(), "adding category");
            match category {
                Category::Network => self.add_records::<VpcRecord>(batch),
                Category::Subnet => self.add_records::<SubnetRecord>(batch),
                Category::RouteTable => self.add_records::<RouteTableRecord>(batch),
                Category::AccessControlList => self.add_records::<NetworkAclRecord>(batch),
                Category::Endpoint => self.add_records::<VpcEndpointRecord>(batch),
                Category::Interface => self.add_records::<NetworkInterfaceRecord>(batch),
                Category::Unknown => {}
            }
        }
    }

    /// Add all records of one category.
    pub fn add_records<R: ResourceRecord>(&mut self, records: &[RawRecord]) {
        for (index, raw) in records.iter().enumerate() {
            match extract::<R>(raw) {
                Ok(record) => self.add_record(&record, raw),
                Err(err) => {
                    let id = NodeId::from_record(R::CATEGORY, raw).map(|id| id.to_string());
                    warn!(
                        category = %R::CATEGORY,
                        index,
                        id = id.as_deref().unwrap_or("<none>"),
                        reason = %err,
                        "skipping malformed record"
                    );
                    self.report.skipped.push(SkippedRecord {
                        category: R::CATEGORY,
                        index,
                        id,
                        reason: err.to_string(),
                    });
                }
            }
        }
    }

    fn add_record<R: ResourceRecord>(&mut self, record: &R, raw: &RawRecord) {
        let id = NodeId::new(record.id());
        let node = Node {
            label: record.name().unwrap_or(record.id()).to_string(),
            category: R::CATEGORY,
            attributes: flatten_attributes(raw),
            summary: record.summary(),
            placeholder: false,
            id: id.clone(),
        };

        let previous = self.graph.node(&id).map(|n| (n.category, n.placeholder));
        match self.graph.upsert_node(node) {
            Upsert::Inserted => {}
            Upsert::Upgraded => {
                trace!(%id, category = %R::CATEGORY, "placeholder resolved");
                self.report.upgraded += 1;
            }
            Upsert::Replaced => {
                self.report.duplicates += 1;
                match previous {
                    Some((category, _)) if category != R::CATEGORY => warn!(
                        %id,
                        previous = %category,
                        category = %R::CATEGORY,
                        "resource id seen under two categories; keeping the latest"
                    ),
                    _ => debug!(%id, category = %R::CATEGORY, "duplicate record, attributes replaced"),
                }
            }
        }
        self.report.count_accepted(R::CATEGORY);

        for link in record.links() {
            let target = NodeId::new(link.target);
            if self.graph.ensure_node(&target, link.expected) {
                debug!(
                    source = %id,
                    %target,
                    expected = %link.expected,
                    "dangling reference, created placeholder"
                );
                self.report.placeholders += 1;
            }
            self.graph
                .add_edge(EdgeKey::new(id.clone(), target, link.relation));
        }
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    pub fn finish(self) -> (TopologyGraph, BuildReport) {
        (self.graph, self.report)
    }
}

/// Build the topology graph of one fetch session.
///
/// Malformed records are skipped with a warning; empty input yields an
/// empty graph.
pub fn build(records: &TopologyRecords) -> TopologyGraph {
    build_with_report(records).0
}

/// Same as [`build`], also returning the [`BuildReport`].
pub fn build_with_report(records: &TopologyRecords) -> (TopologyGraph, BuildReport) {
    let mut builder = GraphBuilder::new();
    builder.ingest(records);
    builder.finish()
}
