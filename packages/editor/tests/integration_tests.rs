//! Integration tests for the editor crate

use pagewright_editor::{
    Document, DocumentStore, DropPayload, Edit, EditorConfig, Element, MarginSide, Page,
    PageOrientation, PageRectangle, Position, PAGE_BODY_ROOT_ID, PAGE_FOOTER_ROOT_ID,
};
use serde_json::{json, Map, Value};
use std::cell::Cell;
use std::rc::Rc;

fn attrs(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

fn root_children(store: &DocumentStore, position: Position) -> Vec<String> {
    store
        .region_content(position)
        .unwrap()
        .children_of(position.root_id())
        .to_vec()
}

#[test]
fn test_drop_copy_delete_then_undo_three_times() {
    let mut store = DocumentStore::default();
    assert!(root_children(&store, Position::Body).is_empty());

    let payload = DropPayload::new("text", attrs(json!({ "value": "hi" })));
    let x = store
        .drop_insert(Position::Body, PAGE_BODY_ROOT_ID, &payload)
        .unwrap();
    let y = store.copy_node(Position::Body, &x).unwrap();
    assert_ne!(x, y);
    assert_eq!(root_children(&store, Position::Body), [x.clone(), y.clone()]);
    assert_eq!(store.node(&y).unwrap().element.value(), Some("hi"));

    store.delete_node(Position::Body, &x);
    assert_eq!(root_children(&store, Position::Body), [y]);

    assert!(store.undo());
    assert!(store.undo());
    assert!(store.undo());
    assert!(root_children(&store, Position::Body).is_empty());
    assert_eq!(store.region_content(Position::Body).unwrap().len(), 1);
}

#[test]
fn test_document_lifecycle() {
    let mut store = DocumentStore::with_config(Document::default(), &EditorConfig::default());

    // Check initial state
    assert_eq!(store.version(), 0);
    assert!(!store.can_undo());
    assert_eq!(store.document().pages.len(), 1);

    store.update_page_rectangle(0, PageRectangle::Letter);
    store.update_page_orientation(0, PageOrientation::Landscape);
    store.update_region_margin(0, Position::Header, MarginSide::Bottom, 4.0);
    store.add_page_after_current().unwrap();

    let first = &store.document().pages[0].layout;
    assert_eq!(first.size_mm(), (279.4, 215.9));
    assert_eq!(first.m_bottom_header, 4.0);
    // New pages inherit the layout of the page they follow
    assert_eq!(store.current_page().unwrap().layout.rectangle, PageRectangle::Letter);

    assert_eq!(store.undo_len(), 4);
    while store.undo() {}
    assert_eq!(store.document(), &Document::default());
    while store.redo() {}
    assert_eq!(store.document().pages.len(), 2);
}

#[test]
fn test_cross_region_operations_stay_in_their_region() {
    let mut store = DocumentStore::default();
    let footer_text = store
        .drop_insert(
            Position::Footer,
            PAGE_FOOTER_ROOT_ID,
            &DropPayload::new("page-number", Map::new()),
        )
        .unwrap();

    // Node lives in the footer, so body operations cannot see it
    assert!(!store.delete_node(Position::Body, &footer_text));
    assert!(!store.move_node(
        Position::Body,
        &footer_text,
        PAGE_FOOTER_ROOT_ID,
        PAGE_BODY_ROOT_ID,
        None
    ));
    assert_eq!(store.locate(&footer_text).unwrap().0, Position::Footer);
}

#[test]
fn test_page_break_reorders_but_never_leaves_parent() {
    let mut store = DocumentStore::default();
    let boxed = store
        .drop_insert(
            Position::Body,
            PAGE_BODY_ROOT_ID,
            &DropPayload::new("container", Map::new()),
        )
        .unwrap();
    let page_break = store
        .drop_insert(
            Position::Body,
            PAGE_BODY_ROOT_ID,
            &DropPayload::new("page-break", Map::new()),
        )
        .unwrap();
    assert_eq!(store.node(&page_break).unwrap().element, Element::PageBreak);

    assert!(!store.move_node(Position::Body, &page_break, PAGE_BODY_ROOT_ID, &boxed, None));
    assert!(store.move_node(Position::Body, &page_break, PAGE_BODY_ROOT_ID, PAGE_BODY_ROOT_ID, Some(0)));
    assert_eq!(root_children(&store, Position::Body), [page_break, boxed]);
}

#[test]
fn test_drop_onto_leaf_is_a_no_op() {
    let mut store = DocumentStore::default();
    let leaf = store
        .drop_insert(
            Position::Body,
            PAGE_BODY_ROOT_ID,
            &DropPayload::new("image", Map::new()),
        )
        .unwrap();
    let version = store.version();

    let result = store.drop_insert(Position::Body, &leaf, &DropPayload::new("text", Map::new()));
    assert!(result.is_none());
    assert_eq!(store.version(), version);
}

#[test]
fn test_listener_and_edit_replay() {
    let mut store = DocumentStore::default();
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    store.subscribe(move |_| counter.set(counter.get() + 1));

    let edits: Vec<Edit> = serde_json::from_value(json!([
        "AddPageAfterCurrent",
        { "SetCurrentPageIndex": { "index": 0 } },
        "BeginBatch",
        { "UpdatePageMargin": { "page_index": 1, "side": "left", "value": 3.5 } },
        { "UpdatePageName": { "page_index": 1, "name": "Appendix" } },
        "EndBatch",
        "Undo"
    ]))
    .unwrap();
    let results = store.apply_all(edits);

    assert!(results.iter().take(2).all(|result| result.applied));
    assert_eq!(store.undo_len(), 2);
    assert_eq!(store.document().pages[1].layout.name, None);
    assert_eq!(store.document().pages[1].layout.m_left, 40.0);
    assert_eq!(calls.get(), 5);
}

#[test]
fn test_add_page_with_content() {
    let mut store = DocumentStore::default();
    let mut page = Page::blank("cover");
    page.layout.name = Some("Cover".into());

    assert_eq!(store.add_page(0, page), Some(1));
    assert_eq!(store.current_page().unwrap().id, "cover");
    assert!(store.delete_page(1));
    assert_eq!(store.current_page_index(), 0);
}
