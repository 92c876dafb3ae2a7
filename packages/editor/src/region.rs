//! # Region Content
//!
//! Id → node map for one of header / body / footer of one page. Each region
//! has a fixed root container whose `children` is the top-level list.
//!
//! On the wire a region is an ordered list of `[id, node]` pairs rather than
//! a JSON object, so the snapshot stays neutral about map encodings.

use crate::node::{Direction, Node, NodeId};
use serde::de::{Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const PAGE_HEADER_ROOT_ID: &str = "page-header-root";
pub const PAGE_BODY_ROOT_ID: &str = "page-body-root";
pub const PAGE_FOOTER_ROOT_ID: &str = "page-footer-root";

/// Which region of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Header,
    #[default]
    Body,
    Footer,
}

impl Position {
    pub const ALL: [Position; 3] = [Position::Header, Position::Body, Position::Footer];

    /// Well-known root id of this region
    pub fn root_id(self) -> &'static str {
        match self {
            Position::Header => PAGE_HEADER_ROOT_ID,
            Position::Body => PAGE_BODY_ROOT_ID,
            Position::Footer => PAGE_FOOTER_ROOT_ID,
        }
    }

    /// Path segment used in patches
    pub fn key(self) -> &'static str {
        match self {
            Position::Header => "header",
            Position::Body => "body",
            Position::Footer => "footer",
        }
    }

    pub fn from_key(key: &str) -> Option<Position> {
        match key {
            "header" => Some(Position::Header),
            "body" => Some(Position::Body),
            "footer" => Some(Position::Footer),
            _ => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Whether `id` is the root of any region
pub fn is_region_root(id: &str) -> bool {
    Position::ALL.iter().any(|position| position.root_id() == id)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionContent {
    nodes: BTreeMap<NodeId, Node>,
}

impl RegionContent {
    /// Region holding only its (empty, vertical) root container
    pub fn new(position: Position) -> Self {
        let mut root = Node::container(position.root_id(), Direction::Vertical);
        root.title = String::new();
        let mut content = Self::default();
        content.insert(root);
        content
    }

    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        let mut content = Self::default();
        for node in nodes {
            content.insert(node);
        }
        content
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Insert or replace the node stored under its own id
    pub fn insert(&mut self, node: Node) -> Option<Node> {
        self.nodes.insert(node.id.clone(), node)
    }

    pub fn remove(&mut self, id: &str) -> Option<Node> {
        self.nodes.remove(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// The container whose `children` lists `id`
    pub fn parent_of(&self, id: &str) -> Option<&Node> {
        self.nodes.values().find(|node| {
            node.children()
                .map(|children| children.iter().any(|child| child == id))
                .unwrap_or(false)
        })
    }

    /// Child ids of `id`, empty for leaves and missing ids
    pub fn children_of(&self, id: &str) -> &[NodeId] {
        self.nodes
            .get(id)
            .and_then(|node| node.children())
            .unwrap_or(&[])
    }
}

impl Serialize for RegionContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.nodes.len()))?;
        for (id, node) in &self.nodes {
            seq.serialize_element(&(id, node))?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for RegionContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RegionContent;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of [id, node] pairs")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut nodes = BTreeMap::new();
                while let Some((id, mut node)) = seq.next_element::<(NodeId, Node)>()? {
                    // The pair key is authoritative
                    node.id = id.clone();
                    nodes.insert(id, node);
                }
                Ok(RegionContent { nodes })
            }
        }

        deserializer.deserialize_seq(EntriesVisitor)
    }
}
