//! # Document Diffing
//!
//! Structural diff between two [`Document`] values, expressed as patches
//! the history crate can replay in either direction.
//!
//! ## Paths
//!
//! | Path                              | Value           |
//! |-----------------------------------|-----------------|
//! | `config`                          | `Config`        |
//! | `currentPageIndex`                | `PageIndex`     |
//! | `pages/<i>`                       | `Page`          |
//! | `pages/<i>/layout`                | `Layout`        |
//! | `pages/<i>/<region>/<node id>`    | `Node`          |
//!
//! Region contents are diffed per map key, so editing one node produces a
//! single `Replace` rather than a copy of the page.
//!
//! Pages are matched by id. Pages shared at the front and back of the list
//! are diffed in place; the differing middle is removed and re-added.

use crate::document::{Document, DocumentConfig};
use crate::node::Node;
use crate::page::{Page, PageLayout};
use crate::region::{Position, RegionContent};
use pagewright_history::{
    format_path, path, Diffable, Patch, PatchError, PatchOp, PatchPair, PathKey,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const CONFIG: &str = "config";
const CURRENT_PAGE_INDEX: &str = "currentPageIndex";
const PAGES: &str = "pages";
const LAYOUT: &str = "layout";

/// Payload of a document patch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum DocValue {
    Config(DocumentConfig),
    PageIndex(usize),
    Page(Box<Page>),
    Layout(PageLayout),
    Node(Box<Node>),
}

pub type DocPatch = Patch<DocValue>;
pub type DocPatchPair = PatchPair<DocValue>;

impl Diffable for Document {
    type Value = DocValue;

    fn diff(&self, next: &Self) -> DocPatchPair {
        let mut pair = PatchPair::empty();

        if self.config != next.config {
            pair.push(
                Patch::replace(path![CONFIG], DocValue::Config(next.config.clone())),
                Patch::replace(path![CONFIG], DocValue::Config(self.config.clone())),
            );
        }

        diff_pages(&self.pages, &next.pages, &mut pair);

        if self.current_page_index != next.current_page_index {
            pair.push(
                Patch::replace(
                    path![CURRENT_PAGE_INDEX],
                    DocValue::PageIndex(next.current_page_index),
                ),
                Patch::replace(
                    path![CURRENT_PAGE_INDEX],
                    DocValue::PageIndex(self.current_page_index),
                ),
            );
        }

        pair
    }

    fn apply_patch(&mut self, patch: &DocPatch) -> Result<(), PatchError> {
        let not_found = || PatchError::PathNotFound(format_path(&patch.path));

        match patch.path.as_slice() {
            [PathKey::Key(key)] if key == CONFIG => {
                expect_op(patch, PatchOp::Replace)?;
                match patch.value()? {
                    DocValue::Config(config) => self.config = config.clone(),
                    _ => return Err(wrong_value(patch)),
                }
            }
            [PathKey::Key(key)] if key == CURRENT_PAGE_INDEX => {
                expect_op(patch, PatchOp::Replace)?;
                match patch.value()? {
                    DocValue::PageIndex(index) => self.current_page_index = *index,
                    _ => return Err(wrong_value(patch)),
                }
            }
            [PathKey::Key(key), PathKey::Index(index)] if key == PAGES => {
                self.apply_page_patch(*index, patch)?;
            }
            [PathKey::Key(key), PathKey::Index(index), PathKey::Key(field)]
                if key == PAGES && field == LAYOUT =>
            {
                expect_op(patch, PatchOp::Replace)?;
                let page = self.pages.get_mut(*index).ok_or_else(not_found)?;
                match patch.value()? {
                    DocValue::Layout(layout) => page.layout = layout.clone(),
                    _ => return Err(wrong_value(patch)),
                }
            }
            [PathKey::Key(key), PathKey::Index(index), PathKey::Key(region), PathKey::Key(id)]
                if key == PAGES =>
            {
                let position = Position::from_key(region).ok_or_else(not_found)?;
                let page = self.pages.get_mut(*index).ok_or_else(not_found)?;
                apply_node_patch(page.region_mut(position), id, patch)?;
            }
            _ => return Err(not_found()),
        }

        Ok(())
    }
}

impl Document {
    fn apply_page_patch(&mut self, index: usize, patch: &DocPatch) -> Result<(), PatchError> {
        let out_of_range = || PatchError::IndexOutOfRange {
            path: format_path(&patch.path),
            index,
        };

        match patch.op {
            PatchOp::Add => {
                if index > self.pages.len() {
                    return Err(out_of_range());
                }
                self.pages.insert(index, page_value(patch)?);
            }
            PatchOp::Remove => {
                if index >= self.pages.len() {
                    return Err(out_of_range());
                }
                self.pages.remove(index);
            }
            PatchOp::Replace => {
                let page = page_value(patch)?;
                let slot = self.pages.get_mut(index).ok_or_else(out_of_range)?;
                *slot = page;
            }
        }
        Ok(())
    }
}

fn page_value(patch: &DocPatch) -> Result<Page, PatchError> {
    match patch.value()? {
        DocValue::Page(page) => Ok(page.as_ref().clone()),
        _ => Err(wrong_value(patch)),
    }
}

fn apply_node_patch(
    content: &mut RegionContent,
    id: &str,
    patch: &DocPatch,
) -> Result<(), PatchError> {
    match patch.op {
        PatchOp::Remove => {
            content
                .remove(id)
                .ok_or_else(|| PatchError::PathNotFound(format_path(&patch.path)))?;
        }
        PatchOp::Replace if !content.contains(id) => {
            return Err(PatchError::PathNotFound(format_path(&patch.path)));
        }
        PatchOp::Add | PatchOp::Replace => {
            let DocValue::Node(node) = patch.value()? else {
                return Err(wrong_value(patch));
            };
            let mut node = node.as_ref().clone();
            node.id = id.to_string();
            content.insert(node);
        }
    }
    Ok(())
}

fn expect_op(patch: &DocPatch, op: PatchOp) -> Result<(), PatchError> {
    if patch.op == op {
        Ok(())
    } else {
        Err(PatchError::UnsupportedOp {
            path: format_path(&patch.path),
            op: patch.op,
        })
    }
}

fn wrong_value(patch: &DocPatch) -> PatchError {
    PatchError::UnexpectedValue(format_path(&patch.path))
}

fn diff_pages(old: &[Page], new: &[Page], pair: &mut DocPatchPair) {
    let shared = old.len().min(new.len());

    let prefix = old
        .iter()
        .zip(new)
        .take_while(|(a, b)| a.id == b.id)
        .count();
    let suffix = old
        .iter()
        .rev()
        .zip(new.iter().rev())
        .take(shared - prefix)
        .take_while(|(a, b)| a.id == b.id)
        .count();

    let mut forward = Vec::new();
    let mut inverse = Vec::new();

    for index in 0..prefix {
        let page_pair = diff_page(index, index, &old[index], &new[index]);
        forward.extend(page_pair.forward);
        inverse.extend(page_pair.inverse);
    }

    // Suffix patches address old indices going forward and new indices
    // going back; both run before the middle shifts anything.
    for k in 0..suffix {
        let old_index = old.len() - 1 - k;
        let new_index = new.len() - 1 - k;
        let page_pair = diff_page(old_index, new_index, &old[old_index], &new[new_index]);
        forward.extend(page_pair.forward);
        inverse.extend(page_pair.inverse);
    }

    let old_middle = prefix..old.len() - suffix;
    let new_middle = prefix..new.len() - suffix;

    for index in old_middle.clone().rev() {
        forward.push(Patch::remove(path![PAGES, index]));
    }
    for index in new_middle.clone() {
        forward.push(Patch::add(
            path![PAGES, index],
            DocValue::Page(Box::new(new[index].clone())),
        ));
    }

    for index in new_middle.rev() {
        inverse.push(Patch::remove(path![PAGES, index]));
    }
    for index in old_middle {
        inverse.push(Patch::add(
            path![PAGES, index],
            DocValue::Page(Box::new(old[index].clone())),
        ));
    }

    pair.forward.extend(forward);
    pair.inverse.extend(inverse);
}

/// Diff two versions of the same page. `old_index` addresses the page in the
/// forward direction, `new_index` in the inverse direction.
fn diff_page(old_index: usize, new_index: usize, old: &Page, new: &Page) -> DocPatchPair {
    let mut pair = PatchPair::empty();

    if old.layout != new.layout {
        pair.push(
            Patch::replace(
                path![PAGES, old_index, LAYOUT],
                DocValue::Layout(new.layout.clone()),
            ),
            Patch::replace(
                path![PAGES, new_index, LAYOUT],
                DocValue::Layout(old.layout.clone()),
            ),
        );
    }

    for position in Position::ALL {
        diff_region(
            old.region(position),
            new.region(position),
            |id| path![PAGES, old_index, position.key(), id],
            |id| path![PAGES, new_index, position.key(), id],
            &mut pair,
        );
    }

    pair
}

fn diff_region(
    old: &RegionContent,
    new: &RegionContent,
    forward_path: impl Fn(&str) -> Vec<PathKey>,
    inverse_path: impl Fn(&str) -> Vec<PathKey>,
    pair: &mut DocPatchPair,
) {
    let ids: BTreeSet<&String> = old.ids().chain(new.ids()).collect();

    for id in ids.into_iter().map(String::as_str) {
        match (old.get(id), new.get(id)) {
            (Some(before), None) => pair.push(
                Patch::remove(forward_path(id)),
                Patch::add(inverse_path(id), DocValue::Node(Box::new(before.clone()))),
            ),
            (None, Some(after)) => pair.push(
                Patch::add(forward_path(id), DocValue::Node(Box::new(after.clone()))),
                Patch::remove(inverse_path(id)),
            ),
            (Some(before), Some(after)) if before != after => pair.push(
                Patch::replace(forward_path(id), DocValue::Node(Box::new(after.clone()))),
                Patch::replace(inverse_path(id), DocValue::Node(Box::new(before.clone()))),
            ),
            _ => {}
        }
    }
}
