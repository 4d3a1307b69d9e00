//! Topology graph model and builder for vpcgraph.
//!
//! - [`category`]: resource categories and their EC2 metadata
//! - [`record`]: raw records and the typed shape of each category
//! - [`identity`]: node ids, relations and edge keys
//! - [`graph`]: the insertion-ordered node/edge graph
//! - [`builder`]: turns fetched records into a graph

pub mod attrs;
pub mod builder;
pub mod category;
pub mod graph;
pub mod identity;
pub mod record;

pub use builder::{BuildReport, GraphBuilder, SkippedRecord, build, build_with_report};
pub use category::Category;
pub use graph::{Edge, Node, TopologyGraph};
pub use identity::{EdgeKey, NodeId, Relation};
pub use record::{RawRecord, TopologyRecords};
pub use vpcgraph_error::{Error, ErrorKind, Result};
