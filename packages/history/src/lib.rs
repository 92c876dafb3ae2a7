//! # Pagewright History
//!
//! Structural patches and a bounded undo/redo timeline.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Diffable state: old snapshot, new snapshot  │
//! └─────────────────────────────────────────────┘
//!                     ↓ diff
//! ┌─────────────────────────────────────────────┐
//! │ PatchPair: forward + inverse patch lists    │
//! └─────────────────────────────────────────────┘
//!                     ↓ filter (exclude / include)
//! ┌─────────────────────────────────────────────┐
//! │ TemporalHistory: undo stack / redo stack    │
//! │  - undo applies inverse patches             │
//! │  - redo applies forward patches             │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The crate knows nothing about documents. Any state type that can describe
//! the delta between two of its values as path-addressed patches (and apply
//! such patches back) can be tracked by implementing [`Diffable`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagewright_history::{HistoryOptions, TemporalHistory};
//!
//! let mut history = TemporalHistory::new(HistoryOptions::default());
//! let next = edit(&state);
//! history.commit(state.diff(&next));
//! state = next;
//!
//! history.undo(&mut state)?;
//! history.redo(&mut state)?;
//! ```

mod diffable;
mod filter;
mod patch;
mod temporal;

pub use diffable::Diffable;
pub use filter::{filter_patches, is_path_included};
pub use patch::{format_path, Patch, PatchError, PatchOp, PatchPair, PathKey};
pub use temporal::{HistoryOptions, TemporalHistory, DEFAULT_HISTORY_LIMIT};
