//! Node and edge identity.
//!
//! Node ids are the provider's own resource ids, used verbatim. Records of
//! different categories refer to each other by those ids (a subnet carries
//! its `VpcId`), so the same physical resource always lands on the same node.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::category::Category;
use crate::record::RawRecord;

/// Stable identifier of a graph node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read the id field of `category` from a raw record.
    ///
    /// Returns `None` when the field is absent, not a string, or empty.
    pub fn from_record(category: Category, record: &RawRecord) -> Option<Self> {
        let field = category.id_field()?;
        match record.get(field) {
            Some(Value::String(id)) if !id.is_empty() => Some(Self(id.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Kind of relation an edge expresses. Edges point from the dependent
/// resource to the one it refers to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Display,
    Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// subnet / route table / ACL / endpoint → VPC
    BelongsTo,
    /// route table → subnet
    AssociatedWith,
    /// ACL → subnet
    AppliedTo,
    /// ENI → subnet
    AttachedTo,
    /// endpoint → subnet
    ResidesIn,
    /// ENI → endpoint it was created for
    Serves,
    /// route table → ENI used as a route target
    RoutesVia,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}

/// Identity of an edge: insertion is idempotent on this triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub source: NodeId,
    pub target: NodeId,
    pub relation: Relation,
}

impl EdgeKey {
    pub fn new(source: NodeId, target: NodeId, relation: Relation) -> Self {
        Self {
            source,
            target,
            relation,
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.source, self.relation, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn node_id_uses_provider_id_verbatim() {
        let rec = record(json!({"SubnetId": "subnet-0a1b", "VpcId": "vpc-1"}));
        assert_eq!(
            NodeId::from_record(Category::Subnet, &rec),
            Some(NodeId::new("subnet-0a1b"))
        );
        assert_eq!(
            NodeId::from_record(Category::Network, &rec),
            Some(NodeId::new("vpc-1"))
        );
    }

    #[test]
    fn node_id_rejects_missing_empty_and_non_string() {
        let rec = record(json!({"VpcId": "", "SubnetId": 42}));
        assert_eq!(NodeId::from_record(Category::Network, &rec), None);
        assert_eq!(NodeId::from_record(Category::Subnet, &rec), None);
        assert_eq!(NodeId::from_record(Category::Interface, &rec), None);
        assert_eq!(NodeId::from_record(Category::Unknown, &rec), None);
    }

    #[test]
    fn edge_key_is_ordered_triple() {
        let a = EdgeKey::new("sub-1".into(), "net-1".into(), Relation::BelongsTo);
        let b = EdgeKey::new("net-1".into(), "sub-1".into(), Relation::BelongsTo);
        let c = EdgeKey::new("sub-1".into(), "net-1".into(), Relation::BelongsTo);
        assert_ne!(a, b);
        assert_eq!(a, c);
        assert_eq!(a.to_string(), "sub-1 -[belongs_to]-> net-1");
    }
}
