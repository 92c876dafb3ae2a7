//! # Document Store
//!
//! Owns one [`Document`] and its undo/redo history. Every change goes
//! through [`DocumentStore::commit_with`]:
//!
//! 1. Clone the committed document
//! 2. Run the mutator on the clone (an [`EditError`] rejects the call)
//! 3. Clamp `current_page_index`
//! 4. Diff committed vs. candidate
//! 5. Swap in the candidate and record the patch pair
//! 6. Notify subscribers
//!
//! An empty diff stops after step 4: nothing is recorded and nobody is
//! notified. Rejections are logged and leave the store untouched.
//!
//! The "current region" is always derived from `pages[current_page_index]`;
//! no second copy of any region is kept.

use crate::config::EditorConfig;
use crate::diff::DocValue;
use crate::document::{Document, DocumentConfig};
use crate::errors::{EditError, Result};
use crate::id_generator::IdGenerator;
use crate::node::{Node, NodeId};
use crate::page::{MarginSide, Page, PageOrientation, PageRectangle};
use crate::payload::DropPayload;
use crate::region::{Position, RegionContent};
use crate::snapshot;
use crate::tree::{self, TreeError};
use pagewright_history::{Diffable, HistoryOptions, TemporalHistory};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, info, instrument, warn};

pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&Document)>;

pub struct DocumentStore {
    document: Document,
    history: TemporalHistory<DocValue>,
    ids: IdGenerator,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
    /// Bumped on every observable change
    version: u64,
}

impl DocumentStore {
    pub fn new(document: Document) -> Self {
        Self::with_config(document, &EditorConfig::default())
    }

    pub fn with_config(mut document: Document, config: &EditorConfig) -> Self {
        document.clamp_page_index();
        let mut ids = IdGenerator::new(&config.id_seed);
        ids.skip_past(document.ids());
        Self {
            document,
            history: TemporalHistory::new(config.history.clone()),
            ids,
            listeners: Vec::new(),
            next_subscription: 0,
            version: 0,
        }
    }

    /// Store over a persisted snapshot; a malformed snapshot yields the
    /// default document
    pub fn from_snapshot(json: &str, config: &EditorConfig) -> Self {
        Self::with_config(snapshot::from_json_or_default(json), config)
    }

    // ----- funnel -----

    /// Commit a document change that needs no fresh ids
    pub fn commit<T>(
        &mut self,
        label: &'static str,
        mutate: impl FnOnce(&mut Document) -> std::result::Result<T, EditError>,
    ) -> Option<T> {
        self.commit_with(label, |document, _| mutate(document))
    }

    /// The only path by which the committed document changes (besides
    /// undo/redo and wholesale replacement).
    ///
    /// Returns the mutator's output, or `None` if it was rejected.
    #[instrument(level = "debug", skip(self, mutate), fields(version = self.version))]
    pub fn commit_with<T>(
        &mut self,
        label: &'static str,
        mutate: impl FnOnce(&mut Document, &mut IdGenerator) -> std::result::Result<T, EditError>,
    ) -> Option<T> {
        let mut next = self.document.clone();

        let output = match mutate(&mut next, &mut self.ids) {
            Ok(output) => output,
            Err(err) => {
                debug!(error = %err, "Edit rejected");
                return None;
            }
        };

        if next.pages.is_empty() {
            debug!("Edit rejected: document would have no pages");
            return None;
        }
        next.clamp_page_index();

        let patches = self.document.diff(&next);
        if patches.is_empty() {
            debug!("Edit produced no change");
            return Some(output);
        }

        debug!(
            forward = patches.forward.len(),
            inverse = patches.inverse.len(),
            "Committing edit"
        );
        self.document = next;
        self.history.commit(patches);
        self.changed();

        Some(output)
    }

    fn changed(&mut self) {
        self.version += 1;
        for (_, listener) in &mut self.listeners {
            listener(&self.document);
        }
    }

    fn commit_region<T>(
        &mut self,
        label: &'static str,
        position: Position,
        edit: impl FnOnce(&RegionContent, &mut IdGenerator) -> std::result::Result<(RegionContent, T), TreeError>,
    ) -> Option<T> {
        self.commit_with(label, |document, ids| {
            let index = document.current_page_index;
            let region = document
                .current_region_mut(position)
                .ok_or(EditError::PageNotFound(index))?;
            let (next, output) = edit(region, ids)?;
            *region = next;
            Ok(output)
        })
    }

    fn commit_node(
        &mut self,
        label: &'static str,
        position: Position,
        node_id: &str,
        edit: impl FnOnce(&mut Node) -> std::result::Result<(), EditError>,
    ) -> bool {
        self.commit(label, |document| {
            let index = document.current_page_index;
            let node = document
                .current_region_mut(position)
                .ok_or(EditError::PageNotFound(index))?
                .get_mut(node_id)
                .ok_or_else(|| TreeError::NodeNotFound(node_id.to_string()))?;
            edit(node)
        })
        .is_some()
    }

    fn commit_page(
        &mut self,
        label: &'static str,
        page_index: usize,
        edit: impl FnOnce(&mut Page),
    ) -> bool {
        self.commit(label, |document| {
            let page = document
                .pages
                .get_mut(page_index)
                .ok_or(EditError::PageNotFound(page_index))?;
            edit(page);
            Ok(())
        })
        .is_some()
    }

    // ----- tree operations (current page) -----

    pub fn move_node(
        &mut self,
        position: Position,
        node_id: &str,
        source_parent_id: &str,
        dest_parent_id: &str,
        dest_index: Option<usize>,
    ) -> bool {
        self.commit_region("move_node", position, |region, _| {
            let next = tree::move_node(region, node_id, source_parent_id, dest_parent_id, dest_index)?;
            Ok((next, ()))
        })
        .is_some()
    }

    /// Duplicate a subtree next to itself; returns the copy's root id
    pub fn copy_node(&mut self, position: Position, node_id: &str) -> Option<NodeId> {
        self.commit_region("copy_node", position, |region, ids| {
            tree::copy_node(region, node_id, ids)
        })
    }

    pub fn delete_node(&mut self, position: Position, node_id: &str) -> bool {
        self.commit_region("delete_node", position, |region, _| {
            Ok((tree::delete_node(region, node_id)?, ()))
        })
        .is_some()
    }

    /// Materialize `payload` inside container `target_id`; returns the new id
    pub fn drop_insert(
        &mut self,
        position: Position,
        target_id: &str,
        payload: &DropPayload,
    ) -> Option<NodeId> {
        self.commit_region("drop_insert", position, |region, ids| {
            tree::drop_insert(region, target_id, payload, ids)
        })
    }

    // ----- node attributes -----

    pub fn update_text_value(&mut self, position: Position, node_id: &str, value: &str) -> bool {
        self.commit_node("update_text_value", position, node_id, |node| {
            if !node.element.has_value() {
                return Err(EditError::InvalidAttributes {
                    node: node.id.clone(),
                    reason: format!("{} has no value", node.element.category()),
                });
            }
            node.element.set_value(value);
            Ok(())
        })
    }

    /// Merge attribute `props` into a node; keys the category does not know
    /// are dropped, mistyped values reject the whole update
    pub fn update_node_props(
        &mut self,
        position: Position,
        node_id: &str,
        props: &Map<String, Value>,
    ) -> bool {
        self.commit_node("update_node_props", position, node_id, |node| {
            *node = node.merge_props(props).map_err(|err| EditError::InvalidAttributes {
                node: node.id.clone(),
                reason: err.to_string(),
            })?;
            Ok(())
        })
    }

    // ----- pages -----

    pub fn set_current_page_index(&mut self, index: usize) -> bool {
        self.commit("set_current_page_index", |document| {
            document.current_page_index = document.clamped_index(index);
            Ok(())
        })
        .is_some()
    }

    /// Make `page_index` (clamped to the page list) current and replace one
    /// of its regions wholesale.
    ///
    /// The replacement must be a well-formed tree under the region's root.
    pub fn replace_region_content(
        &mut self,
        page_index: usize,
        position: Position,
        content: RegionContent,
    ) -> bool {
        self.commit("replace_region_content", |document| {
            tree::check_region(&content, position.root_id())?;
            let page_index = document.clamped_index(page_index);
            let page = document
                .pages
                .get_mut(page_index)
                .ok_or(EditError::PageNotFound(page_index))?;
            *page.region_mut(position) = content;
            document.current_page_index = page_index;
            Ok(())
        })
        .is_some()
    }

    pub fn update_page_name(&mut self, page_index: usize, name: Option<String>) -> bool {
        self.commit_page("update_page_name", page_index, |page| page.layout.name = name)
    }

    pub fn update_page_rectangle(&mut self, page_index: usize, rectangle: PageRectangle) -> bool {
        self.commit_page("update_page_rectangle", page_index, |page| {
            page.layout.rectangle = rectangle
        })
    }

    pub fn update_page_orientation(
        &mut self,
        page_index: usize,
        orientation: PageOrientation,
    ) -> bool {
        self.commit_page("update_page_orientation", page_index, |page| {
            page.layout.orientation = orientation
        })
    }

    pub fn update_page_margin(&mut self, page_index: usize, side: MarginSide, value: f64) -> bool {
        self.commit_page("update_page_margin", page_index, |page| {
            *page.layout.page_margin_mut(side) = value
        })
    }

    pub fn update_region_margin(
        &mut self,
        page_index: usize,
        position: Position,
        side: MarginSide,
        value: f64,
    ) -> bool {
        self.commit_page("update_region_margin", page_index, |page| {
            *page.layout.region_margin_mut(position, side) = value
        })
    }

    /// Insert `page` after `after_index` (clamped) and make it current;
    /// returns the new page's index
    pub fn add_page(&mut self, after_index: usize, page: Page) -> Option<usize> {
        self.commit("add_page", |document| {
            if document.page_index_of(&page.id).is_some() {
                return Err(EditError::DuplicatePage(page.id.clone()));
            }
            for position in Position::ALL {
                tree::check_region(page.region(position), position.root_id())?;
            }
            let index = document.clamped_index(after_index) + 1;
            document.pages.insert(index, page);
            document.current_page_index = index;
            Ok(index)
        })
    }

    /// New page with the current page's layout and empty regions
    pub fn add_page_after_current(&mut self) -> Option<usize> {
        let layout = self.document.current_page()?.layout.clone();
        let id = self.fresh_page_id();
        let after = self.document.current_page_index;
        self.add_page(after, Page::with_layout(id, layout))
    }

    /// Remove a page; the last remaining page is never removed
    pub fn delete_page(&mut self, page_index: usize) -> bool {
        self.commit("delete_page", |document| {
            if page_index >= document.pages.len() {
                return Err(EditError::PageNotFound(page_index));
            }
            if document.pages.len() == 1 {
                return Err(EditError::LastPage);
            }
            document.pages.remove(page_index);
            if document.current_page_index > page_index {
                document.current_page_index -= 1;
            }
            Ok(())
        })
        .is_some()
    }

    pub fn set_config(&mut self, config: DocumentConfig) -> bool {
        self.commit("set_config", |document| {
            document.config = config;
            Ok(())
        })
        .is_some()
    }

    /// Swap in a whole new document. History is cleared.
    pub fn replace_document(&mut self, mut document: Document) -> Result<()> {
        snapshot::validate(&document)?;
        document.clamp_page_index();
        info!(pages = document.pages.len(), "Replacing document");
        self.ids.skip_past(document.ids());
        self.document = document;
        self.history.clear();
        self.changed();
        Ok(())
    }

    fn fresh_page_id(&mut self) -> String {
        loop {
            let id = self.ids.new_id();
            if self.document.page_index_of(&id).is_none() {
                return id;
            }
        }
    }

    // ----- history -----

    pub fn undo(&mut self) -> bool {
        match self.history.undo(&mut self.document) {
            Ok(true) => {
                self.document.clamp_page_index();
                self.changed();
                true
            }
            Ok(false) => false,
            Err(err) => {
                warn!(error = %err, "Undo failed; entry discarded");
                false
            }
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(&mut self.document) {
            Ok(true) => {
                self.document.clamp_page_index();
                self.changed();
                true
            }
            Ok(false) => false,
            Err(err) => {
                warn!(error = %err, "Redo failed; entry discarded");
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_len(&self) -> usize {
        self.history.undo_len()
    }

    pub fn redo_len(&self) -> usize {
        self.history.redo_len()
    }

    pub fn history_options(&self) -> &HistoryOptions {
        self.history.options()
    }

    pub fn clear_history(&mut self) {
        info!("Clearing history");
        self.history.clear();
    }

    /// Group following commits into one undo step until [`end_batch`](Self::end_batch)
    pub fn begin_batch(&mut self) {
        self.history.begin_batch();
    }

    pub fn end_batch(&mut self) {
        self.history.end_batch();
    }

    // ----- subscriptions -----

    /// Call `listener` with the new document after every change
    pub fn subscribe(&mut self, listener: impl FnMut(&Document) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    // ----- selectors -----

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.document.current_page()
    }

    pub fn current_page_index(&self) -> usize {
        self.document.current_page_index
    }

    pub fn region_content(&self, position: Position) -> Option<&RegionContent> {
        self.document.current_region(position)
    }

    /// Node on the current page (header, then body, then footer)
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.locate(id).map(|(_, node)| node)
    }

    pub fn locate(&self, id: &str) -> Option<(Position, &Node)> {
        self.document.find_node(id)
    }

    /// Ids from the region root down to `id`
    pub fn node_path(&self, position: Position, id: &str) -> Option<Vec<NodeId>> {
        tree::node_path(self.region_content(position)?, position.root_id(), id)
    }

    pub fn to_json(&self) -> Result<String> {
        snapshot::to_json(&self.document)
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(Document::default())
    }
}

impl fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStore")
            .field("document", &self.document)
            .field("undo_len", &self.history.undo_len())
            .field("redo_len", &self.history.redo_len())
            .field("listeners", &self.listeners.len())
            .field("version", &self.version)
            .finish()
    }
}
