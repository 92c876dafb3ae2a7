//! # Document
//!
//! The whole editable state: global config, ordered pages and the index of
//! the page being edited.
//!
//! A `Document` is plain data. It is only ever changed through
//! [`DocumentStore`](crate::DocumentStore), which diffs every candidate
//! state against the committed one to feed undo/redo.
//!
//! ## Lifecycle
//!
//! ```text
//! Snapshot → Document → Edit → Commit → Snapshot
//!    ↓          ↓         ↓       ↓         ↓
//!  JSON      pages    tree ops  patches   JSON
//! ```

use crate::page::Page;
use crate::region::{Position, RegionContent};
use crate::node::Node;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WatermarkOptions {
    pub watermark_enabled: bool,
    pub watermark_text: String,
    pub watermark_font_size: f64,
    pub watermark_font_color: String,
    pub watermark_opacity: f64,
    pub watermark_rotation: f64,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            watermark_enabled: false,
            watermark_text: "Watermark".to_string(),
            watermark_font_size: 24.0,
            watermark_font_color: "#cccccc".to_string(),
            watermark_opacity: 0.3,
            watermark_rotation: -45.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageNumberOptions {
    pub page_number_leading_enabled: bool,
    pub page_number_leading: u32,
    pub page_number_count_enabled: bool,
    pub page_number_count: u32,
}

/// Global (document-wide) attributes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub watermark: WatermarkOptions,
    pub page: PageNumberOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub config: DocumentConfig,
    pub pages: Vec<Page>,
    #[serde(default)]
    pub current_page_index: usize,
}

impl Default for Document {
    /// A single blank A4 portrait page
    fn default() -> Self {
        Self {
            config: DocumentConfig::default(),
            pages: vec![Page::blank("1")],
            current_page_index: 0,
        }
    }
}

impl Document {
    pub fn new(config: DocumentConfig, pages: Vec<Page>) -> Self {
        let mut doc = Self {
            config,
            pages,
            current_page_index: 0,
        };
        doc.clamp_page_index();
        doc
    }

    /// Clamp `current_page_index` into `[0, pages.len() - 1]`
    pub fn clamp_page_index(&mut self) {
        self.current_page_index = self.clamped_index(self.current_page_index);
    }

    pub fn clamped_index(&self, index: usize) -> usize {
        index.min(self.pages.len().saturating_sub(1))
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.pages.get(self.current_page_index)
    }

    pub fn current_page_mut(&mut self) -> Option<&mut Page> {
        self.pages.get_mut(self.current_page_index)
    }

    /// Region of the current page
    pub fn current_region(&self, position: Position) -> Option<&RegionContent> {
        self.current_page().map(|page| page.region(position))
    }

    pub fn current_region_mut(&mut self, position: Position) -> Option<&mut RegionContent> {
        self.current_page_mut().map(|page| page.region_mut(position))
    }

    /// Find a node on the current page (header, then body, then footer)
    pub fn find_node(&self, id: &str) -> Option<(Position, &Node)> {
        let page = self.current_page()?;
        Position::ALL
            .iter()
            .find_map(|&position| page.region(position).get(id).map(|node| (position, node)))
    }

    pub fn page_index_of(&self, page_id: &str) -> Option<usize> {
        self.pages.iter().position(|page| page.id == page_id)
    }

    /// Every page id and node id in the document, across all pages and regions
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|page| {
            std::iter::once(page.id.as_str()).chain(
                Position::ALL
                    .into_iter()
                    .flat_map(move |position| page.region(position).ids().map(String::as_str)),
            )
        })
    }
}
