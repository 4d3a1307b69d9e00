//! Visual style per resource category.
//!
//! Defaults reproduce the classic palette (VPC orange, subnet cyan, ...).
//! A TOML file can override any part of it:
//!
//! ```toml
//! background = "#101010"
//! node_size = 24
//!
//! [category.subnet]
//! color = "#00AA88"
//! shape = "box"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, IntoStaticStr};

use vpcgraph_core::Category;
use vpcgraph_error::{Error, ErrorKind, Result};

/// Node outline drawn by the viewers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NodeShape {
    Dot,
    Box,
    Diamond,
    Triangle,
    Hexagon,
    Ellipse,
}

impl NodeShape {
    /// Graphviz shape name.
    pub fn dot_shape(&self) -> &'static str {
        match self {
            NodeShape::Dot => "circle",
            NodeShape::Box => "box",
            NodeShape::Diamond => "diamond",
            NodeShape::Triangle => "triangle",
            NodeShape::Hexagon => "hexagon",
            NodeShape::Ellipse => "ellipse",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStyle {
    pub color: String,
    pub shape: NodeShape,
}

impl CategoryStyle {
    fn new(color: &str, shape: NodeShape) -> Self {
        Self {
            color: color.to_string(),
            shape,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleConfig {
    pub title: String,
    pub background: String,
    pub font_color: String,
    pub edge_color: String,
    pub node_size: u32,
    /// Start the HTML viewer with the force simulation running.
    pub physics: bool,
    categories: BTreeMap<Category, CategoryStyle>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        let categories = BTreeMap::from([
            (Category::Network, CategoryStyle::new("#FF9900", NodeShape::Hexagon)),
            (Category::Subnet, CategoryStyle::new("#1EC9E8", NodeShape::Box)),
            (Category::RouteTable, CategoryStyle::new("#FF5252", NodeShape::Diamond)),
            (Category::AccessControlList, CategoryStyle::new("#7B35BA", NodeShape::Triangle)),
            (Category::Endpoint, CategoryStyle::new("#FB8C00", NodeShape::Ellipse)),
            (Category::Interface, CategoryStyle::new("#9CCC65", NodeShape::Dot)),
            (Category::Unknown, CategoryStyle::new("#FFFFFF", NodeShape::Dot)),
        ]);
        Self {
            title: "AWS network topology".to_string(),
            background: "#222222".to_string(),
            font_color: "#FFFFFF".to_string(),
            edge_color: "#888888".to_string(),
            node_size: 20,
            physics: true,
            categories,
        }
    }
}

impl StyleConfig {
    pub fn category(&self, category: Category) -> &CategoryStyle {
        // Every category is seeded in `Default` and overrides never remove one.
        &self.categories[&category]
    }

    pub fn categories(&self) -> impl Iterator<Item = (Category, &CategoryStyle)> {
        self.categories.iter().map(|(c, s)| (*c, s))
    }

    /// Defaults with the overrides of a TOML style file applied.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            Error::from(err)
                .with_operation("style::from_toml_file")
                .with_context("path", path.display().to_string())
        })?;
        Self::from_toml_str(&text)
            .map_err(|e| e.with_context("path", path.display().to_string()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let overrides: StyleOverrides = toml::from_str(text).map_err(|err| {
            Error::new(ErrorKind::ConfigInvalid, "invalid style file")
                .with_operation("style::from_toml_str")
                .set_source(err)
        })?;
        let mut style = Self::default();
        style.apply(overrides)?;
        Ok(style)
    }

    fn apply(&mut self, overrides: StyleOverrides) -> Result<()> {
        if let Some(title) = overrides.title {
            self.title = title;
        }
        if let Some(color) = overrides.background {
            self.background = checked_color("background", color)?;
        }
        if let Some(color) = overrides.font_color {
            self.font_color = checked_color("font_color", color)?;
        }
        if let Some(color) = overrides.edge_color {
            self.edge_color = checked_color("edge_color", color)?;
        }
        if let Some(size) = overrides.node_size {
            if size == 0 {
                return Err(Error::config_invalid("node_size must be positive")
                    .with_operation("style::apply"));
            }
            self.node_size = size;
        }
        if let Some(physics) = overrides.physics {
            self.physics = physics;
        }
        for (category, patch) in overrides.category {
            let entry = self
                .categories
                .get_mut(&category)
                .ok_or_else(|| Error::config_invalid(format!("no style slot for '{category}'")))?;
            if let Some(color) = patch.color {
                entry.color = checked_color("color", color)?;
            }
            if let Some(shape) = patch.shape {
                entry.shape = shape;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StyleOverrides {
    title: Option<String>,
    background: Option<String>,
    font_color: Option<String>,
    edge_color: Option<String>,
    node_size: Option<u32>,
    physics: Option<bool>,
    #[serde(default)]
    category: BTreeMap<Category, CategoryOverride>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CategoryOverride {
    color: Option<String>,
    shape: Option<NodeShape>,
}

/// Accept `#RGB` and `#RRGGBB` hex colors only; the value ends up inside
/// generated HTML and DOT.
fn checked_color(field: &'static str, color: String) -> Result<String> {
    let hex = color.strip_prefix('#').unwrap_or("");
    let valid = matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(color)
    } else {
        Err(Error::config_invalid(format!("'{color}' is not a hex color"))
            .with_operation("style::apply")
            .with_context("field", field))
    }
}
