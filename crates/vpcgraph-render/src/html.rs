//! Self-contained interactive HTML page.

use serde::Serialize;
use tracing::debug;

use vpcgraph_core::TopologyGraph;
use vpcgraph_error::{Error, ErrorKind, Result};

use crate::Renderer;
use crate::style::{NodeShape, StyleConfig};

const TEMPLATE: &str = include_str!("../assets/viewer.html");

#[derive(Debug, Serialize)]
struct ViewNode<'a> {
    id: &'a str,
    label: &'a str,
    category: &'static str,
    title: String,
    color: &'a str,
    shape: NodeShape,
    placeholder: bool,
}

#[derive(Debug, Serialize)]
struct ViewEdge<'a> {
    from: &'a str,
    to: &'a str,
    relation: &'static str,
}

#[derive(Debug, Serialize)]
struct LegendEntry<'a> {
    category: &'static str,
    title: &'static str,
    color: &'a str,
    shape: NodeShape,
    count: usize,
}

#[derive(Debug, Serialize)]
struct ViewOptions<'a> {
    node_size: u32,
    font_color: &'a str,
    edge_color: &'a str,
    physics: bool,
}

#[derive(Debug, Serialize)]
struct ViewData<'a> {
    nodes: Vec<ViewNode<'a>>,
    edges: Vec<ViewEdge<'a>>,
    legend: Vec<LegendEntry<'a>>,
    options: ViewOptions<'a>,
}

/// Renders the graph into a single HTML file with an embedded viewer.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn render_string(&self, graph: &TopologyGraph, style: &StyleConfig) -> Result<String> {
        let data = view_data(graph, style);
        let json = serde_json::to_string(&data).map_err(|err| {
            Error::new(ErrorKind::SerializationFailed, "failed to encode graph data")
                .with_operation("html::render")
                .set_source(err)
        })?;
        debug!(bytes = json.len(), "encoded graph payload");

        let title = escape_html(&style.title);
        fill_template(
            TEMPLATE,
            &[
                ("TITLE", title.as_str()),
                ("BACKGROUND", style.background.as_str()),
                ("FONT_COLOR", style.font_color.as_str()),
                ("GRAPH_DATA", script_safe(&json).as_str()),
            ],
        )
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, graph: &TopologyGraph, style: &StyleConfig) -> Result<Vec<u8>> {
        Ok(self.render_string(graph, style)?.into_bytes())
    }
}

fn view_data<'a>(graph: &'a TopologyGraph, style: &'a StyleConfig) -> ViewData<'a> {
    let nodes = graph
        .nodes()
        .iter()
        .map(|node| {
            let look = style.category(node.category);
            ViewNode {
                id: node.id.as_str(),
                label: &node.label,
                category: node.category.as_str(),
                title: node.tooltip(),
                color: &look.color,
                shape: look.shape,
                placeholder: node.placeholder,
            }
        })
        .collect();

    let edges = graph
        .edges()
        .iter()
        .map(|edge| ViewEdge {
            from: edge.source().as_str(),
            to: edge.target().as_str(),
            relation: edge.relation().as_str(),
        })
        .collect();

    let legend = graph
        .category_counts()
        .into_iter()
        .map(|(category, count)| {
            let look = style.category(category);
            LegendEntry {
                category: category.as_str(),
                title: category.title(),
                color: &look.color,
                shape: look.shape,
                count,
            }
        })
        .collect();

    ViewData {
        nodes,
        edges,
        legend,
        options: ViewOptions {
            node_size: style.node_size,
            font_color: &style.font_color,
            edge_color: &style.edge_color,
            physics: style.physics,
        },
    }
}

/// Make JSON safe to inline in a `<script>` element.
///
/// `<`, `>` and `&` only occur inside JSON strings, where the `\u` escapes
/// decode back to the same characters.
pub fn script_safe(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Substitute `{{NAME}}` markers in one pass; inserted values are never
/// rescanned. An unknown or unterminated marker is a render error.
fn fill_template(template: &str, values: &[(&str, &str)]) -> Result<String> {
    let mut out = String::with_capacity(template.len() + 1024);
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find("}}").ok_or_else(|| {
            Error::render_failed("unterminated template marker").with_operation("html::template")
        })?;
        let name = &after[..end];
        let value = values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| {
                Error::render_failed(format!("unknown template marker '{name}'"))
                    .with_operation("html::template")
            })?;
        out.push_str(value);
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    Ok(out)
}
