use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pagewright_editor::{Diffable, Document, DocumentStore, DropPayload, Position, PAGE_BODY_ROOT_ID};
use serde_json::{json, Map};

fn text(value: &str) -> DropPayload {
    DropPayload::new("text", json!({ "value": value }).as_object().cloned().unwrap())
}

/// Body with `rows` containers of `cols` text nodes each
fn populated_store(rows: usize, cols: usize) -> DocumentStore {
    let mut store = DocumentStore::default();
    for row in 0..rows {
        let container = store
            .drop_insert(
                Position::Body,
                PAGE_BODY_ROOT_ID,
                &DropPayload::new("container", Map::new()),
            )
            .unwrap();
        for col in 0..cols {
            store.drop_insert(Position::Body, &container, &text(&format!("{}:{}", row, col)));
        }
    }
    store.clear_history();
    store
}

fn diff_single_node_edit(c: &mut Criterion) {
    let store = populated_store(50, 20);
    let before = store.document().clone();
    let mut after = before.clone();
    let body = after.current_region_mut(Position::Body).unwrap();
    let target = body.children_of(PAGE_BODY_ROOT_ID)[0].clone();
    body.get_mut(&target).unwrap().title = "renamed".into();

    c.bench_function("diff_single_node_edit", |b| {
        b.iter(|| black_box(&before).diff(black_box(&after)))
    });
}

fn commit_and_undo_copy(c: &mut Criterion) {
    let mut store = populated_store(50, 20);
    let target = store
        .region_content(Position::Body)
        .unwrap()
        .children_of(PAGE_BODY_ROOT_ID)[0]
        .clone();

    c.bench_function("commit_and_undo_copy", |b| {
        b.iter(|| {
            store.copy_node(Position::Body, black_box(&target));
            store.undo();
        })
    });
}

fn snapshot_round_trip(c: &mut Criterion) {
    let document: Document = populated_store(20, 10).document().clone();

    c.bench_function("snapshot_round_trip", |b| {
        b.iter(|| {
            let json = serde_json::to_string(black_box(&document)).unwrap();
            serde_json::from_str::<Document>(&json).unwrap()
        })
    });
}

criterion_group!(benches, diff_single_node_edit, commit_and_undo_copy, snapshot_round_trip);
criterion_main!(benches);
