//! # Temporal History
//!
//! Bounded undo/redo stacks of patch pairs.
//!
//! ## Design
//!
//! - Each commit records the forward and inverse patches of one state change
//! - Undo applies the inverse patches and moves the entry to the redo stack
//! - Redo applies the forward patches and moves the entry back
//! - Every commit clears the redo stack, even one filtered down to nothing
//! - The oldest entry is evicted once the undo stack exceeds `limit`
//! - Patches under excluded paths never enter history
//! - Several commits can be grouped into one undo step with a batch

use crate::diffable::Diffable;
use crate::filter::filter_patches;
use crate::patch::{PatchError, PatchPair, PathKey};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

fn default_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

/// History tracking options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryOptions {
    /// Maximum number of undo levels (0 = unlimited)
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Path prefixes never recorded
    #[serde(default)]
    pub exclude: Vec<Vec<PathKey>>,

    /// When set, only paths under these prefixes are recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<Vec<PathKey>>>,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
            exclude: Vec::new(),
            include: None,
        }
    }
}

/// Undo/redo timeline over patch pairs of value type `V`
#[derive(Debug, Clone)]
pub struct TemporalHistory<V> {
    /// Applied entries (most recent last)
    undo_stack: Vec<PatchPair<V>>,

    /// Undone entries (most recent last)
    redo_stack: Vec<PatchPair<V>>,

    options: HistoryOptions,

    /// Entry being accumulated by an open batch
    current_batch: Option<PatchPair<V>>,
}

impl<V: Clone + std::fmt::Debug> TemporalHistory<V> {
    pub fn new(options: HistoryOptions) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            options,
            current_batch: None,
        }
    }

    /// Create a history with the default options and a custom limit
    pub fn with_limit(limit: usize) -> Self {
        Self::new(HistoryOptions {
            limit,
            ..HistoryOptions::default()
        })
    }

    pub fn options(&self) -> &HistoryOptions {
        &self.options
    }

    /// Record a committed state change.
    ///
    /// The redo stack is cleared even when nothing survives path filtering;
    /// in that case the undo stack is left untouched and `false` is returned.
    pub fn commit(&mut self, patches: PatchPair<V>) -> bool {
        // Any committed change invalidates the future
        self.redo_stack.clear();

        let filtered = filter_patches(
            patches,
            &self.options.exclude,
            self.options.include.as_deref(),
        );
        if filtered.is_empty() {
            debug!("All patches filtered out; nothing recorded");
            return false;
        }

        if let Some(batch) = &mut self.current_batch {
            batch.forward.extend(filtered.forward);
            // Inverses of later changes must run first
            let mut inverse = filtered.inverse;
            inverse.append(&mut batch.inverse);
            batch.inverse = inverse;
        } else {
            self.push_entry(filtered);
        }

        true
    }

    /// Start grouping commits into a single undo step
    pub fn begin_batch(&mut self) {
        if self.current_batch.is_none() {
            self.current_batch = Some(PatchPair::empty());
        }
    }

    /// Close the open batch and push it (if non-empty)
    pub fn end_batch(&mut self) {
        if let Some(batch) = self.current_batch.take() {
            if !batch.is_empty() {
                self.push_entry(batch);
            }
        }
    }

    pub fn is_batching(&self) -> bool {
        self.current_batch.is_some()
    }

    fn push_entry(&mut self, entry: PatchPair<V>) {
        let limit = self.options.limit;
        if limit > 0 {
            while self.undo_stack.len() >= limit {
                self.undo_stack.remove(0);
            }
        }
        self.undo_stack.push(entry);
        self.redo_stack.clear();
    }

    /// Roll `state` back by one entry.
    ///
    /// Returns `Ok(false)` when there is nothing to undo. If the inverse
    /// patches fail to apply, `state` is left untouched and the entry is
    /// discarded.
    pub fn undo<S>(&mut self, state: &mut S) -> Result<bool, PatchError>
    where
        S: Diffable<Value = V>,
    {
        self.end_batch();

        let Some(entry) = self.undo_stack.pop() else {
            return Ok(false);
        };

        *state = state.apply_patches(&entry.inverse)?;
        self.redo_stack.push(entry);
        Ok(true)
    }

    /// Roll `state` forward by one entry; mirror of [`undo`](Self::undo).
    pub fn redo<S>(&mut self, state: &mut S) -> Result<bool, PatchError>
    where
        S: Diffable<Value = V>,
    {
        self.end_batch();

        let Some(entry) = self.redo_stack.pop() else {
            return Ok(false);
        };

        *state = state.apply_patches(&entry.forward)?;
        self.undo_stack.push(entry);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo levels available
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redo levels available
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Entries on the undo stack, oldest first
    pub fn undo_entries(&self) -> &[PatchPair<V>] {
        &self.undo_stack
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }
}

impl<V: Clone + std::fmt::Debug> Default for TemporalHistory<V> {
    fn default() -> Self {
        Self::new(HistoryOptions::default())
    }
}
