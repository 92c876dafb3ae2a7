//! Undo/redo and tree-shape properties over longer edit sequences
//!
//! This tests:
//! - N commits undone then redone reproduce the final document
//! - The undo stack never exceeds its limit
//! - Copies mirror the source shape with disjoint ids
//! - Deletes leave no trace of the subtree

use pagewright_editor::tree::collect_subtree;
use pagewright_editor::{
    Document, DocumentStore, DropPayload, EditorConfig, HistoryOptions, Position,
    RegionContent, PAGE_BODY_ROOT_ID,
};
use serde_json::{json, Map};
use std::collections::HashSet;

const ROOT: &str = PAGE_BODY_ROOT_ID;

fn container() -> DropPayload {
    DropPayload::new("container", Map::new())
}

fn text(value: &str) -> DropPayload {
    DropPayload::new("text", json!({ "value": value }).as_object().cloned().unwrap())
}

fn store_with_limit(limit: usize) -> DocumentStore {
    let config = EditorConfig {
        history: HistoryOptions {
            limit,
            ..HistoryOptions::default()
        },
        ..EditorConfig::default()
    };
    DocumentStore::with_config(Document::default(), &config)
}

fn body(store: &DocumentStore) -> &RegionContent {
    store.region_content(Position::Body).unwrap()
}

/// root ─┬─ a ─┬─ b ── leaf
///       │     └─ t1
///       └─ t2
fn build_nested(store: &mut DocumentStore) -> (String, String) {
    let a = store.drop_insert(Position::Body, ROOT, &container()).unwrap();
    let b = store.drop_insert(Position::Body, &a, &container()).unwrap();
    store.drop_insert(Position::Body, &b, &text("leaf")).unwrap();
    store.drop_insert(Position::Body, &a, &text("t1")).unwrap();
    store.drop_insert(Position::Body, ROOT, &text("t2")).unwrap();
    (a, b)
}

#[test]
fn test_undo_all_then_redo_all_round_trips() {
    let mut store = store_with_limit(0);
    let initial = store.document().clone();

    let (a, b) = build_nested(&mut store);

    let copy = store.copy_node(Position::Body, &a).unwrap();
    store.move_node(Position::Body, &b, &a, ROOT, Some(0));
    let horizontal = json!({ "direction": "horizontal" });
    store.update_node_props(Position::Body, &copy, horizontal.as_object().unwrap());
    store.delete_node(Position::Body, &copy);
    store.add_page_after_current();
    store.drop_insert(Position::Header, Position::Header.root_id(), &text("h"));
    store.set_current_page_index(0);

    let final_state = store.document().clone();
    let commits = store.undo_len();
    assert_eq!(commits, 12);

    for _ in 0..commits {
        assert!(store.undo());
    }
    assert_eq!(store.document(), &initial);
    assert!(!store.undo());

    for _ in 0..commits {
        assert!(store.redo());
    }
    assert_eq!(store.document(), &final_state);
    assert!(!store.redo());
}

#[test]
fn test_history_is_bounded_and_oldest_entries_are_lost() {
    let limit = 4;
    let k = 3;
    let mut store = store_with_limit(limit);

    let mut ids = Vec::new();
    for i in 0..limit + k {
        ids.push(store.drop_insert(Position::Body, ROOT, &text(&i.to_string())).unwrap());
        assert!(store.undo_len() <= limit);
    }
    assert_eq!(store.undo_len(), limit);

    while store.undo() {}

    // The first k inserts can no longer be undone
    assert_eq!(body(&store).children_of(ROOT), &ids[..k]);
}

#[test]
fn test_copy_keeps_shape_with_fresh_ids() {
    let mut store = DocumentStore::default();
    let (a, _) = build_nested(&mut store);

    let first = store.copy_node(Position::Body, &a).unwrap();
    let second = store.copy_node(Position::Body, &a).unwrap();

    let region = body(&store);
    let source = collect_subtree(region, &a);
    let mut seen: HashSet<String> = source.iter().cloned().collect();

    for copy in [&first, &second] {
        let cloned = collect_subtree(region, copy);
        assert_eq!(cloned.len(), source.len());
        for (src, dst) in source.iter().zip(&cloned) {
            assert_eq!(region.children_of(src).len(), region.children_of(dst).len());
            assert_eq!(
                region.get(src).unwrap().element.category(),
                region.get(dst).unwrap().element.category()
            );
        }
        for id in cloned {
            assert!(seen.insert(id), "id reused across copies");
        }
    }

    assert_eq!(region.children_of(ROOT)[..3], [a, second, first]);
}

#[test]
fn test_delete_removes_every_descendant() {
    let mut store = DocumentStore::default();
    let (a, _) = build_nested(&mut store);
    let doomed = collect_subtree(body(&store), &a);
    assert_eq!(doomed.len(), 4);

    assert!(store.delete_node(Position::Body, &a));

    let region = body(&store);
    for id in &doomed {
        assert!(!region.contains(id));
        assert!(region
            .nodes()
            .all(|node| !node.children().unwrap_or(&[]).contains(id)));
    }
    assert_eq!(region.len(), 2);
}

#[test]
fn test_moving_in_place_changes_nothing() {
    let mut store = DocumentStore::default();
    let (a, b) = build_nested(&mut store);
    let before = store.document().clone();
    let undo_len = store.undo_len();

    assert!(store.move_node(Position::Body, &b, &a, &a, Some(0)));
    assert!(store.move_node(Position::Body, &a, ROOT, ROOT, Some(0)));

    assert_eq!(store.document(), &before);
    assert_eq!(store.undo_len(), undo_len);
}
