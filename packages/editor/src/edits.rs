//! # Edits
//!
//! Serializable commands mirroring the store's mutating operations, so edit
//! scripts can be stored and replayed:
//!
//! ```json
//! [
//!   { "DropInsert": { "position": "body", "target_id": "page-body-root",
//!                     "payload": { "category": "text", "attributes": { "value": "hi" } } } },
//!   "Undo"
//! ]
//! ```

use crate::document::DocumentConfig;
use crate::node::NodeId;
use crate::page::{MarginSide, PageOrientation, PageRectangle};
use crate::payload::DropPayload;
use crate::region::{Position, RegionContent};
use crate::store::DocumentStore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Edit {
    /// Move a node to `dest_parent_id` at `dest_index` (append when absent)
    MoveNode {
        #[serde(default)]
        position: Position,
        node_id: NodeId,
        source_parent_id: NodeId,
        dest_parent_id: NodeId,
        #[serde(default)]
        dest_index: Option<usize>,
    },

    CopyNode {
        #[serde(default)]
        position: Position,
        node_id: NodeId,
    },

    DeleteNode {
        #[serde(default)]
        position: Position,
        node_id: NodeId,
    },

    DropInsert {
        #[serde(default)]
        position: Position,
        target_id: NodeId,
        payload: DropPayload,
    },

    UpdateTextValue {
        #[serde(default)]
        position: Position,
        node_id: NodeId,
        value: String,
    },

    UpdateNodeProps {
        #[serde(default)]
        position: Position,
        node_id: NodeId,
        props: Map<String, Value>,
    },

    SetCurrentPageIndex {
        index: usize,
    },

    ReplaceRegionContent {
        page_index: usize,
        position: Position,
        content: RegionContent,
    },

    UpdatePageName {
        page_index: usize,
        name: Option<String>,
    },

    UpdatePageRectangle {
        page_index: usize,
        rectangle: PageRectangle,
    },

    UpdatePageOrientation {
        page_index: usize,
        orientation: PageOrientation,
    },

    UpdatePageMargin {
        page_index: usize,
        side: MarginSide,
        value: f64,
    },

    UpdateRegionMargin {
        page_index: usize,
        position: Position,
        side: MarginSide,
        value: f64,
    },

    AddPageAfterCurrent,

    DeletePage {
        page_index: usize,
    },

    SetConfig {
        config: DocumentConfig,
    },

    Undo,

    Redo,

    BeginBatch,

    EndBatch,
}

/// Outcome of one [`Edit`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditResult {
    /// Store version after the edit
    pub version: u64,
    /// Whether the document changed
    pub applied: bool,
    /// Id of a node created by the edit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<NodeId>,
}

impl DocumentStore {
    /// Run one edit through the matching store operation
    pub fn apply(&mut self, edit: Edit) -> EditResult {
        let before = self.version();

        let created = match edit {
            Edit::MoveNode {
                position,
                node_id,
                source_parent_id,
                dest_parent_id,
                dest_index,
            } => {
                self.move_node(position, &node_id, &source_parent_id, &dest_parent_id, dest_index);
                None
            }
            Edit::CopyNode { position, node_id } => self.copy_node(position, &node_id),
            Edit::DeleteNode { position, node_id } => {
                self.delete_node(position, &node_id);
                None
            }
            Edit::DropInsert {
                position,
                target_id,
                payload,
            } => self.drop_insert(position, &target_id, &payload),
            Edit::UpdateTextValue {
                position,
                node_id,
                value,
            } => {
                self.update_text_value(position, &node_id, &value);
                None
            }
            Edit::UpdateNodeProps {
                position,
                node_id,
                props,
            } => {
                self.update_node_props(position, &node_id, &props);
                None
            }
            Edit::SetCurrentPageIndex { index } => {
                self.set_current_page_index(index);
                None
            }
            Edit::ReplaceRegionContent {
                page_index,
                position,
                content,
            } => {
                self.replace_region_content(page_index, position, content);
                None
            }
            Edit::UpdatePageName { page_index, name } => {
                self.update_page_name(page_index, name);
                None
            }
            Edit::UpdatePageRectangle {
                page_index,
                rectangle,
            } => {
                self.update_page_rectangle(page_index, rectangle);
                None
            }
            Edit::UpdatePageOrientation {
                page_index,
                orientation,
            } => {
                self.update_page_orientation(page_index, orientation);
                None
            }
            Edit::UpdatePageMargin {
                page_index,
                side,
                value,
            } => {
                self.update_page_margin(page_index, side, value);
                None
            }
            Edit::UpdateRegionMargin {
                page_index,
                position,
                side,
                value,
            } => {
                self.update_region_margin(page_index, position, side, value);
                None
            }
            Edit::AddPageAfterCurrent => {
                self.add_page_after_current();
                None
            }
            Edit::DeletePage { page_index } => {
                self.delete_page(page_index);
                None
            }
            Edit::SetConfig { config } => {
                self.set_config(config);
                None
            }
            Edit::Undo => {
                self.undo();
                None
            }
            Edit::Redo => {
                self.redo();
                None
            }
            Edit::BeginBatch => {
                self.begin_batch();
                None
            }
            Edit::EndBatch => {
                self.end_batch();
                None
            }
        };

        EditResult {
            version: self.version(),
            applied: self.version() != before,
            created,
        }
    }

    /// Apply edits in order
    pub fn apply_all(&mut self, edits: impl IntoIterator<Item = Edit>) -> Vec<EditResult> {
        edits.into_iter().map(|edit| self.apply(edit)).collect()
    }
}
