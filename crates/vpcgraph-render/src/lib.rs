//! Rendering of topology graphs.
//!
//! - [`html`]: single-file interactive viewer
//! - [`dot`]: Graphviz source, one cluster per VPC
//! - [`style`]: per-category colors and shapes, TOML overridable
//!
//! # Example
//!
//! ```
//! use vpcgraph_core::TopologyGraph;
//! use vpcgraph_render::{RenderFormat, Renderer, StyleConfig};
//!
//! let graph = TopologyGraph::new();
//! let bytes = RenderFormat::Dot
//!     .renderer()
//!     .render(&graph, &StyleConfig::default())
//!     .unwrap();
//! assert!(String::from_utf8(bytes).unwrap().starts_with("digraph topology {"));
//! ```

pub mod dot;
pub mod html;
pub mod style;

use std::path::Path;

use strum_macros::{Display, EnumString, IntoStaticStr};

use vpcgraph_core::TopologyGraph;
use vpcgraph_error::Result;

pub use dot::{DotBuilder, DotRenderer};
pub use html::HtmlRenderer;
pub use style::{CategoryStyle, NodeShape, StyleConfig};

/// Turns a finished graph into output bytes. Renderers only read the graph.
pub trait Renderer {
    fn render(&self, graph: &TopologyGraph, style: &StyleConfig) -> Result<Vec<u8>>;
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RenderFormat {
    #[default]
    Html,
    Dot,
}

impl RenderFormat {
    /// Format implied by an output file extension (`.dot`/`.gv` → DOT,
    /// `.html`/`.htm` → HTML).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "dot" | "gv" => Some(RenderFormat::Dot),
            "html" | "htm" => Some(RenderFormat::Html),
            _ => None,
        }
    }

    pub fn renderer(&self) -> Box<dyn Renderer> {
        match self {
            RenderFormat::Html => Box::new(HtmlRenderer),
            RenderFormat::Dot => Box::new(DotRenderer),
        }
    }
}
