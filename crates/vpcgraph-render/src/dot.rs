//! Graphviz DOT output.
//!
//! Nodes owned by a VPC are grouped into one `"cluster_<vpc>"` subgraph;
//! edges follow after all clusters.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Write;

use vpcgraph_core::{Category, Node, NodeId, TopologyGraph};
use vpcgraph_error::Result;

use crate::Renderer;
use crate::style::StyleConfig;

/// Replace every non-alphanumeric character with an underscore.
pub fn sanitize_id(input: &str) -> String {
    input
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Escape quotes, backslashes and newlines for a quoted DOT string.
pub fn escape_label(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn indent(output: &mut String, level: usize) {
    output.extend(std::iter::repeat_n("  ", level));
}

/// Incremental writer for a `digraph`.
pub struct DotBuilder {
    output: String,
    depth: usize,
}

impl DotBuilder {
    pub fn new(name: &str) -> Self {
        let mut output = String::with_capacity(4096);
        let _ = writeln!(output, "digraph {} {{", sanitize_id(name));
        Self { output, depth: 1 }
    }

    /// `head [k="v", ...];` on its own line; the bracket is omitted when
    /// `attrs` is empty.
    fn statement(&mut self, head: &str, attrs: &[(&str, &str)]) -> &mut Self {
        indent(&mut self.output, self.depth);
        self.output.push_str(head);
        if !attrs.is_empty() {
            let list: Vec<String> = attrs
                .iter()
                .map(|(key, value)| format!("{key}=\"{}\"", escape_label(value)))
                .collect();
            let _ = write!(self.output, " [{}]", list.join(", "));
        }
        self.output.push_str(";\n");
        self
    }

    /// Graph-level attribute.
    pub fn attr(&mut self, key: &str, value: &str) -> &mut Self {
        let head = format!("{key}=\"{}\"", escape_label(value));
        self.statement(&head, &[])
    }

    /// Default attributes for `node` or `edge` statements.
    pub fn defaults(&mut self, target: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.statement(target, attrs)
    }

    pub fn blank(&mut self) -> &mut Self {
        self.output.push('\n');
        self
    }

    pub fn node(&mut self, id: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.statement(id, attrs)
    }

    pub fn edge(&mut self, from: &str, to: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.statement(&format!("{from} -> {to}"), attrs)
    }

    /// The subgraph id is quoted, so `vpc-1` and `vpc_1` stay separate clusters.
    pub fn start_cluster(&mut self, id: &str, label: &str) -> &mut Self {
        indent(&mut self.output, self.depth);
        let _ = writeln!(self.output, "subgraph \"cluster_{}\" {{", escape_label(id));
        self.depth += 1;
        self.attr("label", label)
    }

    pub fn end_cluster(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        indent(&mut self.output, self.depth);
        self.output.push_str("}\n\n");
        self
    }

    pub fn build(mut self) -> String {
        self.output.push_str("}\n");
        self.output
    }
}

/// Renders the graph as Graphviz source.
#[derive(Debug, Default, Clone, Copy)]
pub struct DotRenderer;

impl DotRenderer {
    pub fn render_string(&self, graph: &TopologyGraph, style: &StyleConfig) -> String {
        let mut dot = DotBuilder::new("topology");
        dot.attr("label", &style.title)
            .attr("bgcolor", &style.background)
            .attr("fontcolor", &style.font_color)
            .attr("rankdir", "BT");
        dot.defaults(
            "node",
            &[("style", "filled"), ("fontcolor", "#000000"), ("fontsize", "10")],
        );
        dot.defaults(
            "edge",
            &[
                ("color", style.edge_color.as_str()),
                ("fontcolor", style.font_color.as_str()),
                ("fontsize", "8"),
            ],
        );
        dot.blank();

        let (clusters, loose) = group_by_network(graph);
        for (network, members) in &clusters {
            let label = graph
                .node(network)
                .map(|n| n.label.as_str())
                .unwrap_or_else(|| network.as_str());
            dot.start_cluster(network.as_str(), label);
            dot.attr("color", &style.category(Category::Network).color);
            for node in members {
                write_node(&mut dot, node, style);
            }
            dot.end_cluster();
        }
        for node in &loose {
            write_node(&mut dot, node, style);
        }
        if !loose.is_empty() {
            dot.blank();
        }

        for edge in graph.edges() {
            let label = edge.label.as_deref().unwrap_or_else(|| edge.relation().as_str());
            dot.edge(
                &node_ref(edge.source()),
                &node_ref(edge.target()),
                &[("label", label)],
            );
        }
        dot.build()
    }
}

impl Renderer for DotRenderer {
    fn render(&self, graph: &TopologyGraph, style: &StyleConfig) -> Result<Vec<u8>> {
        Ok(self.render_string(graph, style).into_bytes())
    }
}

/// Node ids are quoted so `vpc-1` and `vpc_1` never collide.
fn node_ref(id: &NodeId) -> String {
    format!("\"{}\"", escape_label(id.as_str()))
}

fn write_node(dot: &mut DotBuilder, node: &Node, style: &StyleConfig) {
    let look = style.category(node.category);
    let tooltip = node.tooltip();
    let mut attrs = vec![
        ("label", node.label.as_str()),
        ("tooltip", tooltip.as_str()),
        ("fillcolor", look.color.as_str()),
        ("shape", look.shape.dot_shape()),
    ];
    if node.placeholder {
        attrs.push(("style", "filled,dashed"));
    }
    dot.node(&node_ref(&node.id), &attrs);
}

/// Split nodes into per-VPC groups (keyed by the VPC id) and nodes that no
/// chain of outgoing edges connects to a VPC. Each group keeps graph order.
fn group_by_network(graph: &TopologyGraph) -> (BTreeMap<NodeId, Vec<&Node>>, Vec<&Node>) {
    let mut parents: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
    for edge in graph.edges() {
        parents.entry(edge.source()).or_default().push(edge.target());
    }

    let mut clusters: BTreeMap<NodeId, Vec<&Node>> = BTreeMap::new();
    let mut loose = Vec::new();
    for node in graph.nodes() {
        match owning_network(graph, &parents, node) {
            Some(network) => clusters.entry(network).or_default().push(node),
            None => loose.push(node),
        }
    }
    (clusters, loose)
}

fn owning_network(
    graph: &TopologyGraph,
    parents: &HashMap<&NodeId, Vec<&NodeId>>,
    node: &Node,
) -> Option<NodeId> {
    let mut seen = HashSet::new();
    let mut stack = vec![&node.id];
    while let Some(current) = stack.pop() {
        if !seen.insert(current) {
            continue;
        }
        if graph.node(current).is_some_and(|n| n.category == Category::Network) {
            return Some(current.clone());
        }
        if let Some(targets) = parents.get(current) {
            stack.extend(targets.iter().copied());
        }
    }
    None
}
