//! Drop payloads: templates for new nodes dragged in from a palette.

use crate::node::{
    ContainerAttrs, CustomAttrs, Element, ImageAttrs, Node, NodeId, PlaceholderAttrs,
    PluginAttrs, TableAttrs, TextAttrs,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// `{ category, attributes }` as supplied by the drag source
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DropPayload {
    #[serde(alias = "cat")]
    pub category: String,
    #[serde(default, alias = "attrs")]
    pub attributes: Map<String, Value>,
}

impl DropPayload {
    pub fn new(category: impl Into<String>, attributes: Map<String, Value>) -> Self {
        Self {
            category: category.into(),
            attributes,
        }
    }

    /// Build the node this payload describes under `id`.
    ///
    /// Known categories keep only the attributes their type declares;
    /// mistyped attributes fall back to the category defaults. A `pluginId`
    /// attribute turns the node into a plugin node carrying every attribute.
    /// Unknown categories keep all attributes verbatim.
    pub fn materialize(&self, id: NodeId) -> Node {
        let element = match self.plugin_id() {
            Some(plugin_id) => {
                let mut props = self.attributes.clone();
                props.remove("pluginId");
                Element::Plugin(PluginAttrs {
                    plugin_id: plugin_id.to_string(),
                    props,
                })
            }
            None => self.typed_element(),
        };

        let title = format!("{}-{}", self.category, id);
        Node { id, title, element }
    }

    fn plugin_id(&self) -> Option<&str> {
        self.attributes.get("pluginId").and_then(Value::as_str)
    }

    fn typed_element(&self) -> Element {
        match self.category.as_str() {
            "container" => {
                let mut attrs: ContainerAttrs = self.attrs_or_default();
                // Never adopt children from a template
                attrs.children.clear();
                Element::Container(attrs)
            }
            "text" => Element::Text(self.attrs_or_default::<TextAttrs>()),
            "page-number" => Element::PageNumber(self.attrs_or_default::<TextAttrs>()),
            "image" => Element::Image(self.attrs_or_default::<ImageAttrs>()),
            "table" => Element::Table(self.attrs_or_default::<TableAttrs>()),
            "placeholder" => Element::Placeholder(self.attrs_or_default::<PlaceholderAttrs>()),
            "page-break" => Element::PageBreak,
            other => Element::Custom(CustomAttrs {
                category: other.to_string(),
                attributes: self.attributes.clone(),
            }),
        }
    }

    fn attrs_or_default<T: DeserializeOwned + Default>(&self) -> T {
        match serde_json::from_value(Value::Object(self.attributes.clone())) {
            Ok(attrs) => attrs,
            Err(err) => {
                warn!(category = %self.category, error = %err, "Ignoring malformed drop attributes");
                T::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Direction;
    use serde_json::json;

    fn payload(category: &str, attributes: Value) -> DropPayload {
        DropPayload::new(category, attributes.as_object().cloned().unwrap_or_default())
    }

    #[test]
    fn test_text_payload_keeps_known_attributes_only() {
        let node = payload("text", json!({ "value": "hi", "fontSize": 14, "bogus": 1 }))
            .materialize("n1".into());

        assert_eq!(node.title, "text-n1");
        match node.element {
            Element::Text(attrs) => {
                assert_eq!(attrs.value, "hi");
                assert_eq!(attrs.font_size, Some(14.0));
            }
            other => panic!("unexpected element {:?}", other),
        }
    }

    #[test]
    fn test_text_value_defaults_to_empty() {
        let node = payload("text", json!({})).materialize("n".into());
        assert_eq!(node.element.value(), Some(""));
    }

    #[test]
    fn test_container_payload_starts_empty() {
        let node = payload(
            "container",
            json!({ "direction": "horizontal", "children": ["stolen"] }),
        )
        .materialize("c".into());

        match node.element {
            Element::Container(attrs) => {
                assert_eq!(attrs.direction, Direction::Horizontal);
                assert!(attrs.children.is_empty());
            }
            other => panic!("unexpected element {:?}", other),
        }
    }

    #[test]
    fn test_unknown_category_copies_attributes() {
        let node = payload("qr-code", json!({ "data": "abc", "size": 3 })).materialize("q".into());
        match node.element {
            Element::Custom(attrs) => {
                assert_eq!(attrs.category, "qr-code");
                assert_eq!(attrs.attributes["data"], "abc");
                assert_eq!(attrs.attributes["size"], 3);
            }
            other => panic!("unexpected element {:?}", other),
        }
    }

    #[test]
    fn test_plugin_payload_keeps_all_props() {
        let node = payload("table", json!({ "pluginId": "fancy-table", "rows": 4 }))
            .materialize("p".into());
        match node.element {
            Element::Plugin(attrs) => {
                assert_eq!(attrs.plugin_id, "fancy-table");
                assert_eq!(attrs.props["rows"], 4);
                assert!(!attrs.props.contains_key("pluginId"));
            }
            other => panic!("unexpected element {:?}", other),
        }
    }

    #[test]
    fn test_mistyped_attributes_fall_back_to_defaults() {
        let node = payload("image", json!({ "width": "wide" })).materialize("i".into());
        assert_eq!(node.element, Element::Image(ImageAttrs::default()));
    }

    #[test]
    fn test_payload_accepts_short_field_names() {
        let parsed: DropPayload =
            serde_json::from_value(json!({ "cat": "text", "attrs": { "value": "x" } })).unwrap();
        assert_eq!(parsed.category, "text");
        assert_eq!(parsed.attributes["value"], "x");
    }
}
