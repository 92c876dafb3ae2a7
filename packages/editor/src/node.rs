//! # Nodes
//!
//! One element of a region tree. Containers own an ordered `children` list
//! of ids; every other category is a leaf.
//!
//! The category is a tagged enum (`cat` on the wire) so that each category
//! carries exactly the attributes it understands:
//!
//! ```json
//! { "id": "a1", "title": "text-a1", "cat": "text", "value": "hi", "fontSize": 12 }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type NodeId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlexUnit {
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "px")]
    Px,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableGap {
    Compact,
    Normal,
    Loose,
}

/// Placement inside the parent box; shared by every category.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<HorizontalAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<VerticalAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wild_star: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_shrink: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_grow: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex_unit: Option<FlexUnit>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Padding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_left: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerAttrs {
    /// Ordered child ids; defines render and tab order
    #[serde(default)]
    pub children: Vec<NodeId>,
    #[serde(default)]
    pub direction: Direction,
    #[serde(flatten)]
    pub flex: FlexAttrs,
}

impl ContainerAttrs {
    pub fn new(direction: Direction) -> Self {
        Self {
            children: Vec::new(),
            direction,
            flex: FlexAttrs::default(),
        }
    }
}

/// Attributes of text and page-number nodes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAttrs {
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hyperlink: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyperlink_uri: Option<String>,
    #[serde(flatten)]
    pub padding: Padding,
    #[serde(flatten)]
    pub flex: FlexAttrs,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttrs {
    /// Image source (URL or data URI)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orig_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orig_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hyperlink: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyperlink_uri: Option<String>,
    #[serde(flatten)]
    pub flex: FlexAttrs,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub columns: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bindings: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding_columns: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<TableGap>,
    #[serde(flatten)]
    pub flex: FlexAttrs,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(flatten)]
    pub flex: FlexAttrs,
}

/// A node rendered by an externally registered plugin.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginAttrs {
    pub plugin_id: String,
    #[serde(default)]
    pub props: Map<String, Value>,
}

/// A category this crate does not know; attributes are kept verbatim.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomAttrs {
    pub category: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cat", rename_all = "kebab-case")]
pub enum Element {
    Container(ContainerAttrs),
    Text(TextAttrs),
    Image(ImageAttrs),
    Table(TableAttrs),
    Placeholder(PlaceholderAttrs),
    PageNumber(TextAttrs),
    /// Hard page break; may be reordered but never leaves its parent
    PageBreak,
    Plugin(PluginAttrs),
    Custom(CustomAttrs),
}

impl Element {
    /// Wire name of the category
    pub fn category(&self) -> &str {
        match self {
            Element::Container(_) => "container",
            Element::Text(_) => "text",
            Element::Image(_) => "image",
            Element::Table(_) => "table",
            Element::Placeholder(_) => "placeholder",
            Element::PageNumber(_) => "page-number",
            Element::PageBreak => "page-break",
            Element::Plugin(_) => "plugin",
            Element::Custom(custom) => &custom.category,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Element::Container(_))
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Element::PageBreak)
    }

    /// Whether the category has a primary `value` attribute
    pub fn has_value(&self) -> bool {
        matches!(
            self,
            Element::Text(_) | Element::PageNumber(_) | Element::Image(_) | Element::Table(_)
        )
    }

    /// Set the primary `value` attribute.
    ///
    /// Returns `false` for categories without one or when unchanged.
    pub fn set_value(&mut self, value: &str) -> bool {
        let slot = match self {
            Element::Text(attrs) | Element::PageNumber(attrs) => {
                if attrs.value == value {
                    return false;
                }
                attrs.value = value.to_string();
                return true;
            }
            Element::Image(attrs) => &mut attrs.value,
            Element::Table(attrs) => &mut attrs.value,
            _ => return false,
        };
        if slot.as_deref() == Some(value) {
            return false;
        }
        *slot = Some(value.to_string());
        true
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Element::Text(attrs) | Element::PageNumber(attrs) => Some(&attrs.value),
            Element::Image(attrs) => attrs.value.as_deref(),
            Element::Table(attrs) => attrs.value.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub element: Element,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, element: Element) -> Self {
        let id = id.into();
        let title = format!("{}-{}", element.category(), id);
        Self { id, title, element }
    }

    /// Empty container with the given id
    pub fn container(id: impl Into<NodeId>, direction: Direction) -> Self {
        Self::new(id, Element::Container(ContainerAttrs::new(direction)))
    }

    pub fn text(id: impl Into<NodeId>, value: impl Into<String>) -> Self {
        Self::new(
            id,
            Element::Text(TextAttrs {
                value: value.into(),
                ..TextAttrs::default()
            }),
        )
    }

    pub fn is_container(&self) -> bool {
        self.element.is_container()
    }

    /// Child ids; `None` for leaves
    pub fn children(&self) -> Option<&[NodeId]> {
        match &self.element {
            Element::Container(attrs) => Some(&attrs.children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match &mut self.element {
            Element::Container(attrs) => Some(&mut attrs.children),
            _ => None,
        }
    }

    /// Merge `props` into this node's attributes.
    ///
    /// Structural keys (`id`, `cat`, `children`) are ignored. Fails if the
    /// merged attributes no longer fit the category.
    pub fn merge_props(&self, props: &Map<String, Value>) -> Result<Node, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(fields) = &mut value {
            match &self.element {
                Element::Plugin(_) | Element::Custom(_) => {
                    let bag = if matches!(self.element, Element::Plugin(_)) {
                        "props"
                    } else {
                        "attributes"
                    };
                    let entry = fields
                        .entry(bag.to_string())
                        .or_insert_with(|| Value::Object(Map::new()));
                    if let Value::Object(bag) = entry {
                        for (key, prop) in props {
                            bag.insert(key.clone(), prop.clone());
                        }
                    }
                }
                _ => {
                    for (key, prop) in props {
                        if matches!(key.as_str(), "id" | "cat" | "children") {
                            continue;
                        }
                        fields.insert(key.clone(), prop.clone());
                    }
                }
            }
        }
        serde_json::from_value(value)
    }
}
