//! # Pagewright Editor
//!
//! Undo-aware content store for a multi-page document layout designer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ DocumentStore: the single mutation funnel   │
//! │  - selectors (current page, region, node)   │
//! │  - subscriptions                            │
//! └─────────────────────────────────────────────┘
//!          ↓ mutator                ↑ notify
//! ┌─────────────────────────────────────────────┐
//! │ tree: move / copy / delete / drop insert    │
//! │  pure functions over one region             │
//! └─────────────────────────────────────────────┘
//!          ↓ candidate document
//! ┌─────────────────────────────────────────────┐
//! │ diff: Document → forward + inverse patches  │
//! └─────────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────────┐
//! │ pagewright-history: bounded undo / redo     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **One writer**: every change goes through `DocumentStore::commit_with`
//! 2. **Rejections are no-ops**: invalid edits are logged, never thrown
//! 3. **No duplicated state**: the current region is computed, not stored
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagewright_editor::{DocumentStore, DropPayload, Position, PAGE_BODY_ROOT_ID};
//!
//! let mut store = DocumentStore::default();
//!
//! let payload = DropPayload::new("text", attributes);
//! let id = store.drop_insert(Position::Body, PAGE_BODY_ROOT_ID, &payload).unwrap();
//! store.copy_node(Position::Body, &id);
//!
//! store.undo();
//! let json = store.to_json()?;
//! ```

mod config;
mod diff;
mod document;
mod edits;
mod errors;
mod id_generator;
mod node;
mod page;
mod payload;
mod region;
pub mod snapshot;
mod store;
pub mod tree;

pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use diff::{DocPatch, DocPatchPair, DocValue};
pub use document::{Document, DocumentConfig, PageNumberOptions, WatermarkOptions};
pub use edits::{Edit, EditResult};
pub use errors::{EditError, EditorError, Result};
pub use id_generator::{seed_from, IdGenerator};
pub use node::{
    ContainerAttrs, CustomAttrs, Direction, Element, FlexAttrs, FlexUnit, HorizontalAlign,
    ImageAttrs, Node, NodeId, Padding, PlaceholderAttrs, PluginAttrs, TableAttrs, TableGap,
    TextAttrs, VerticalAlign,
};
pub use page::{MarginSide, Page, PageLayout, PageOrientation, PageRectangle};
pub use payload::DropPayload;
pub use region::{
    is_region_root, Position, RegionContent, PAGE_BODY_ROOT_ID, PAGE_FOOTER_ROOT_ID,
    PAGE_HEADER_ROOT_ID,
};
pub use store::{DocumentStore, SubscriptionId};
pub use tree::TreeError;

pub use pagewright_history::{Diffable, HistoryOptions, PatchError, PathKey};
