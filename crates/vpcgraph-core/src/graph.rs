use std::collections::{HashMap, HashSet};

use crate::category::Category;
use crate::identity::{EdgeKey, NodeId, Relation};

/// One network resource in the topology.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub category: Category,
    /// `Name` tag, or the id when unnamed.
    pub label: String,
    /// Raw field name → display string.
    pub attributes: Vec<(String, String)>,
    /// Category-specific tooltip lines.
    pub summary: Vec<String>,
    /// Materialized from a reference; no record for it was fetched.
    pub placeholder: bool,
}

impl Node {
    /// Placeholder for an id referenced as `expected` but never fetched.
    pub fn placeholder(id: NodeId, expected: Category) -> Self {
        Self {
            label: id.to_string(),
            attributes: vec![("referenced_as".to_string(), expected.to_string())],
            summary: vec![format!("Referenced as {} but not fetched", expected.title())],
            category: Category::Unknown,
            placeholder: true,
            id,
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Hover text: a header line, the summary, then every raw attribute.
    pub fn tooltip(&self) -> String {
        let mut lines = Vec::with_capacity(2 + self.summary.len() + self.attributes.len());
        lines.push(format!("{}: {}", self.category.title(), self.id));
        lines.extend(self.summary.iter().cloned());
        if !self.attributes.is_empty() {
            lines.push(String::new());
            lines.extend(
                self.attributes
                    .iter()
                    .map(|(key, value)| format!("{key}: {}", truncate(value, MAX_ATTRIBUTE_CHARS))),
            );
        }
        lines.join("\n")
    }
}

const MAX_ATTRIBUTE_CHARS: usize = 160;

fn truncate(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &value[..cut]),
        None => value.to_string(),
    }
}

/// A relation between two nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub key: EdgeKey,
    pub label: Option<String>,
}

impl Edge {
    pub fn source(&self) -> &NodeId {
        &self.key.source
    }

    pub fn target(&self) -> &NodeId {
        &self.key.target
    }

    pub fn relation(&self) -> Relation {
        self.key.relation
    }
}

/// Result of inserting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    /// A placeholder was replaced by the real record.
    Upgraded,
    /// A node from an earlier record was overwritten.
    Replaced,
}

/// Nodes and edges of one fetch session.
///
/// Both collections keep insertion order; lookups go through a hash index.
#[derive(Debug, Clone, Default)]
pub struct TopologyGraph {
    nodes: Vec<Node>,
    node_index: HashMap<NodeId, usize>,
    edges: Vec<Edge>,
    edge_keys: HashSet<EdgeKey>,
}

impl TopologyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn contains_edge(&self, key: &EdgeKey) -> bool {
        self.edge_keys.contains(key)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Outgoing edges of `id`, in insertion order.
    pub fn edges_from<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.source() == id)
    }

    /// Incoming edges of `id`, in insertion order.
    pub fn edges_to<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.target() == id)
    }

    /// Node count per category, in category order. Categories with no nodes
    /// are omitted.
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        let mut counts: Vec<(Category, usize)> = Vec::new();
        for node in &self.nodes {
            match counts.iter_mut().find(|(c, _)| *c == node.category) {
                Some((_, n)) => *n += 1,
                None => counts.push((node.category, 1)),
            }
        }
        counts.sort_by_key(|(c, _)| *c);
        counts
    }

    /// Insert `node`, or merge it into the node already holding its id.
    ///
    /// The existing slot keeps its position; category, label, attributes
    /// and summary come from the newer node.
    pub(crate) fn upsert_node(&mut self, node: Node) -> Upsert {
        if let Some(&idx) = self.node_index.get(&node.id) {
            let slot = &mut self.nodes[idx];
            let outcome = if slot.placeholder {
                Upsert::Upgraded
            } else {
                Upsert::Replaced
            };
            *slot = node;
            return outcome;
        }

        self.node_index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Upsert::Inserted
    }

    /// Make sure `id` exists, creating a placeholder if needed.
    /// Returns true when a placeholder was created.
    pub(crate) fn ensure_node(&mut self, id: &NodeId, expected: Category) -> bool {
        if self.node_index.contains_key(id) {
            return false;
        }
        self.upsert_node(Node::placeholder(id.clone(), expected));
        true
    }

    /// Add an edge unless its key is already present. Both endpoints must
    /// already be nodes.
    pub(crate) fn add_edge(&mut self, key: EdgeKey) -> bool {
        debug_assert!(self.contains_node(&key.source), "missing source {}", key.source);
        debug_assert!(self.contains_node(&key.target), "missing target {}", key.target);

        if self.edge_keys.contains(&key) {
            return false;
        }
        let label = Some(key.relation.to_string());
        self.edge_keys.insert(key.clone());
        self.edges.push(Edge { key, label });
        true
    }
}
