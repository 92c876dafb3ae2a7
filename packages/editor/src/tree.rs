//! # Tree Mutations
//!
//! Structural operations on one region's node tree. Every operation is a
//! pure function: it reads the given region and returns a new one, or a
//! [`TreeError`] explaining why the request was rejected. The caller treats a
//! rejection as a no-op.
//!
//! ## Semantics
//!
//! ### Move
//! - Same parent: classic array move; the index counts positions after the
//!   node has been taken out
//! - Different parent: insert at index (clamped) or append when absent
//! - Fails if the destination is the node itself or one of its descendants
//! - Page breaks may be reordered but never change parent
//!
//! ### Copy
//! - Deep clone with a fresh id for every node in the subtree
//! - The clone lands right after the source in the same parent
//!
//! ### Delete
//! - Removes the node and all descendants
//! - Region roots cannot be deleted
//!
//! ### Drop insert
//! - Materializes a payload as the last child of a container
//! - Dropping onto a leaf is rejected

use crate::id_generator::IdGenerator;
use crate::node::NodeId;
use crate::payload::DropPayload;
use crate::region::{is_region_root, RegionContent};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Node {0} is not a container")]
    NotAContainer(String),

    #[error("Node {node} is not a child of {parent}")]
    NotAChild { node: String, parent: String },

    #[error("Node {0} has no parent")]
    NoParent(String),

    #[error("Region root {0} cannot be moved, copied or deleted")]
    RegionRoot(String),

    #[error("Would create cycle moving {node} into {parent}")]
    CycleDetected { node: String, parent: String },

    #[error("Protected node {0} cannot leave its parent")]
    ProtectedNode(String),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

/// Move `node_id` from `source_parent_id` into `dest_parent_id`.
pub fn move_node(
    content: &RegionContent,
    node_id: &str,
    source_parent_id: &str,
    dest_parent_id: &str,
    dest_index: Option<usize>,
) -> Result<RegionContent, TreeError> {
    let node = content
        .get(node_id)
        .ok_or_else(|| TreeError::NodeNotFound(node_id.to_string()))?;
    if is_region_root(node_id) {
        return Err(TreeError::RegionRoot(node_id.to_string()));
    }

    let source_children = container_children(content, source_parent_id)?;
    container_children(content, dest_parent_id)?;

    let from = source_children
        .iter()
        .position(|child| child == node_id)
        .ok_or_else(|| TreeError::NotAChild {
            node: node_id.to_string(),
            parent: source_parent_id.to_string(),
        })?;

    if source_parent_id != dest_parent_id {
        if node.element.is_protected() {
            return Err(TreeError::ProtectedNode(node_id.to_string()));
        }
        if dest_parent_id == node_id || is_descendant(content, node_id, dest_parent_id) {
            return Err(TreeError::CycleDetected {
                node: node_id.to_string(),
                parent: dest_parent_id.to_string(),
            });
        }
    }

    let mut next = content.clone();

    let moved = children_mut(&mut next, source_parent_id)?.remove(from);
    let dest = children_mut(&mut next, dest_parent_id)?;
    let index = dest_index.unwrap_or(dest.len()).min(dest.len());
    dest.insert(index, moved);

    Ok(next)
}

/// Deep-copy the subtree at `node_id`; returns the new region and the
/// clone's root id.
pub fn copy_node(
    content: &RegionContent,
    node_id: &str,
    ids: &mut IdGenerator,
) -> Result<(RegionContent, NodeId), TreeError> {
    if !content.contains(node_id) {
        return Err(TreeError::NodeNotFound(node_id.to_string()));
    }
    if is_region_root(node_id) {
        return Err(TreeError::RegionRoot(node_id.to_string()));
    }
    let parent_id = content
        .parent_of(node_id)
        .map(|parent| parent.id.clone())
        .ok_or_else(|| TreeError::NoParent(node_id.to_string()))?;

    let subtree = collect_subtree(content, node_id);

    let mut remap: HashMap<&str, NodeId> = HashMap::with_capacity(subtree.len());
    for id in &subtree {
        let mut fresh = ids.fresh_id(content);
        while remap.values().any(|taken| *taken == fresh) {
            fresh = ids.fresh_id(content);
        }
        remap.insert(id.as_str(), fresh);
    }

    let mut next = content.clone();
    for id in &subtree {
        let Some(source) = content.get(id) else {
            continue;
        };
        let mut clone = source.clone();
        clone.id = remap[id.as_str()].clone();
        if let Some(children) = clone.children_mut() {
            for child in children.iter_mut() {
                if let Some(mapped) = remap.get(child.as_str()) {
                    *child = mapped.clone();
                }
            }
        }
        next.insert(clone);
    }

    let new_id = remap[node_id].clone();
    let siblings = children_mut(&mut next, &parent_id)?;
    let at = siblings
        .iter()
        .position(|child| child == node_id)
        .map(|index| index + 1)
        .unwrap_or(siblings.len());
    siblings.insert(at, new_id.clone());

    Ok((next, new_id))
}

/// Remove `node_id` and its whole subtree.
pub fn delete_node(content: &RegionContent, node_id: &str) -> Result<RegionContent, TreeError> {
    if !content.contains(node_id) {
        return Err(TreeError::NodeNotFound(node_id.to_string()));
    }
    if is_region_root(node_id) {
        return Err(TreeError::RegionRoot(node_id.to_string()));
    }

    let subtree = collect_subtree(content, node_id);
    let mut next = content.clone();

    let parents: Vec<NodeId> = next
        .nodes()
        .filter(|node| {
            node.children()
                .map(|children| children.iter().any(|child| child == node_id))
                .unwrap_or(false)
        })
        .map(|node| node.id.clone())
        .collect();
    for parent_id in parents {
        if let Some(children) = next.get_mut(&parent_id).and_then(|node| node.children_mut()) {
            children.retain(|child| child != node_id);
        }
    }

    for id in &subtree {
        next.remove(id);
    }

    Ok(next)
}

/// Append a node built from `payload` to container `target_id`; returns the
/// new region and the new node's id.
pub fn drop_insert(
    content: &RegionContent,
    target_id: &str,
    payload: &DropPayload,
    ids: &mut IdGenerator,
) -> Result<(RegionContent, NodeId), TreeError> {
    let target = content
        .get(target_id)
        .ok_or_else(|| TreeError::NodeNotFound(target_id.to_string()))?;
    if !target.is_container() {
        return Err(TreeError::NotAContainer(target_id.to_string()));
    }

    let new_id = ids.fresh_id(content);
    let node = payload.materialize(new_id.clone());

    let mut next = content.clone();
    children_mut(&mut next, target_id)?.push(new_id.clone());
    next.insert(node);

    Ok((next, new_id))
}

/// Whether `candidate` sits somewhere below `ancestor_id`
pub fn is_descendant(content: &RegionContent, ancestor_id: &str, candidate: &str) -> bool {
    let mut stack: Vec<&str> = content
        .children_of(ancestor_id)
        .iter()
        .map(String::as_str)
        .collect();
    let mut seen = HashSet::new();

    while let Some(id) = stack.pop() {
        if id == candidate {
            return true;
        }
        if seen.insert(id) {
            stack.extend(content.children_of(id).iter().map(String::as_str));
        }
    }
    false
}

/// `node_id` followed by all of its descendants, depth first.
pub fn collect_subtree(content: &RegionContent, node_id: &str) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    let mut stack = vec![node_id.to_string()];

    while let Some(id) = stack.pop() {
        if !seen.insert(id.clone()) {
            continue;
        }
        for child in content.children_of(&id).iter().rev() {
            stack.push(child.clone());
        }
        out.push(id);
    }
    out
}

/// Ids from `root_id` down to `node_id` (inclusive), if reachable
pub fn node_path(content: &RegionContent, root_id: &str, node_id: &str) -> Option<Vec<NodeId>> {
    fn walk(
        content: &RegionContent,
        current: &str,
        target: &str,
        path: &mut Vec<NodeId>,
        seen: &mut HashSet<NodeId>,
    ) -> bool {
        if !seen.insert(current.to_string()) {
            return false;
        }
        path.push(current.to_string());
        if current == target {
            return true;
        }
        for child in content.children_of(current) {
            if walk(content, child, target, path, seen) {
                return true;
            }
        }
        path.pop();
        false
    }

    if !content.contains(root_id) {
        return None;
    }
    let mut path = Vec::new();
    let mut seen = HashSet::new();
    walk(content, root_id, node_id, &mut path, &mut seen).then_some(path)
}

/// Check the structural invariants of a region rooted at `root_id`:
/// the root is a container, every child reference resolves, every other
/// node has exactly one parent, and everything is reachable from the root.
pub fn check_region(content: &RegionContent, root_id: &str) -> Result<(), TreeError> {
    let root = content
        .get(root_id)
        .ok_or_else(|| TreeError::InvalidStructure(format!("missing root {}", root_id)))?;
    if !root.is_container() {
        return Err(TreeError::NotAContainer(root_id.to_string()));
    }

    let mut parents: HashMap<&str, usize> = HashMap::new();
    for node in content.nodes() {
        if let Some(children) = node.children() {
            for child in children {
                if !content.contains(child) {
                    return Err(TreeError::InvalidStructure(format!(
                        "{} lists missing child {}",
                        node.id, child
                    )));
                }
                *parents.entry(child.as_str()).or_default() += 1;
            }
        }
    }

    for id in content.ids() {
        let count = parents.get(id.as_str()).copied().unwrap_or(0);
        let expected = if id == root_id { 0 } else { 1 };
        if count != expected {
            return Err(TreeError::InvalidStructure(format!(
                "{} is referenced {} times",
                id, count
            )));
        }
    }

    let reachable = collect_subtree(content, root_id).len();
    if reachable != content.len() {
        return Err(TreeError::InvalidStructure(format!(
            "{} of {} nodes reachable from {}",
            reachable,
            content.len(),
            root_id
        )));
    }

    Ok(())
}

fn container_children<'a>(
    content: &'a RegionContent,
    parent_id: &str,
) -> Result<&'a [NodeId], TreeError> {
    let parent = content
        .get(parent_id)
        .ok_or_else(|| TreeError::ParentNotFound(parent_id.to_string()))?;
    parent
        .children()
        .ok_or_else(|| TreeError::NotAContainer(parent_id.to_string()))
}

fn children_mut<'a>(
    content: &'a mut RegionContent,
    parent_id: &str,
) -> Result<&'a mut Vec<NodeId>, TreeError> {
    let parent = content
        .get_mut(parent_id)
        .ok_or_else(|| TreeError::ParentNotFound(parent_id.to_string()))?;
    parent
        .children_mut()
        .ok_or_else(|| TreeError::NotAContainer(parent_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Direction, Element, Node};
    use crate::region::{Position, PAGE_BODY_ROOT_ID};
    use serde_json::json;

    const ROOT: &str = PAGE_BODY_ROOT_ID;

    /// root ─┬─ a
    ///       ├─ box ─┬─ b
    ///       │       └─ inner ── c
    ///       └─ pb (page break)
    fn sample() -> RegionContent {
        let mut content = RegionContent::new(Position::Body);
        let mut boxed = Node::container("box", Direction::Horizontal);
        boxed.children_mut().unwrap().extend(["b".to_string(), "inner".to_string()]);
        let mut inner = Node::container("inner", Direction::Vertical);
        inner.children_mut().unwrap().push("c".into());

        content.insert(Node::text("a", "A"));
        content.insert(boxed);
        content.insert(Node::text("b", "B"));
        content.insert(inner);
        content.insert(Node::text("c", "C"));
        content.insert(Node::new("pb", Element::PageBreak));
        content
            .get_mut(ROOT)
            .unwrap()
            .children_mut()
            .unwrap()
            .extend(["a".to_string(), "box".to_string(), "pb".to_string()]);
        content
    }

    fn children(content: &RegionContent, id: &str) -> Vec<String> {
        content.children_of(id).to_vec()
    }

    #[test]
    fn test_sample_is_valid() {
        check_region(&sample(), ROOT).unwrap();
    }

    #[test]
    fn test_move_within_parent_uses_post_removal_index() {
        let next = move_node(&sample(), "a", ROOT, ROOT, Some(2)).unwrap();
        assert_eq!(children(&next, ROOT), ["box", "pb", "a"]);

        let next = move_node(&sample(), "pb", ROOT, ROOT, Some(0)).unwrap();
        assert_eq!(children(&next, ROOT), ["pb", "a", "box"]);
        check_region(&next, ROOT).unwrap();
    }

    #[test]
    fn test_move_to_same_position_is_identity() {
        let content = sample();
        let next = move_node(&content, "box", ROOT, ROOT, Some(1)).unwrap();
        assert_eq!(next, content);
    }

    #[test]
    fn test_move_across_parents() {
        let next = move_node(&sample(), "a", ROOT, "inner", Some(0)).unwrap();
        assert_eq!(children(&next, ROOT), ["box", "pb"]);
        assert_eq!(children(&next, "inner"), ["a", "c"]);
        check_region(&next, ROOT).unwrap();
    }

    #[test]
    fn test_move_without_index_appends_and_clamps() {
        let next = move_node(&sample(), "a", ROOT, "box", None).unwrap();
        assert_eq!(children(&next, "box"), ["b", "inner", "a"]);

        let next = move_node(&sample(), "a", ROOT, "box", Some(99)).unwrap();
        assert_eq!(children(&next, "box"), ["b", "inner", "a"]);
    }

    #[test]
    fn test_move_into_own_descendant_is_rejected() {
        let err = move_node(&sample(), "box", ROOT, "inner", Some(0)).unwrap_err();
        assert!(matches!(err, TreeError::CycleDetected { .. }));

        let err = move_node(&sample(), "box", ROOT, "box", None).unwrap_err();
        assert!(matches!(err, TreeError::CycleDetected { .. }));
    }

    #[test]
    fn test_page_break_cannot_change_parent() {
        let err = move_node(&sample(), "pb", ROOT, "box", None).unwrap_err();
        assert_eq!(err, TreeError::ProtectedNode("pb".into()));
    }

    #[test]
    fn test_move_missing_references_fail() {
        let content = sample();
        assert!(matches!(
            move_node(&content, "zz", ROOT, ROOT, None),
            Err(TreeError::NodeNotFound(_))
        ));
        assert!(matches!(
            move_node(&content, "a", "zz", ROOT, None),
            Err(TreeError::ParentNotFound(_))
        ));
        assert!(matches!(
            move_node(&content, "a", ROOT, "zz", None),
            Err(TreeError::ParentNotFound(_))
        ));
        assert!(matches!(
            move_node(&content, "a", ROOT, "b", None),
            Err(TreeError::NotAContainer(_))
        ));
        assert!(matches!(
            move_node(&content, "b", ROOT, "box", None),
            Err(TreeError::NotAChild { .. })
        ));
    }

    #[test]
    fn test_copy_subtree_gets_disjoint_ids_and_same_shape() {
        let content = sample();
        let mut ids = IdGenerator::from_seed("t".into());
        let (next, copy_id) = copy_node(&content, "box", &mut ids).unwrap();

        assert_eq!(children(&next, ROOT), ["a", "box", copy_id.as_str(), "pb"]);
        assert_eq!(next.len(), content.len() + 4);

        let original = collect_subtree(&next, "box");
        let copied = collect_subtree(&next, &copy_id);
        assert_eq!(original.len(), copied.len());
        for (src, dst) in original.iter().zip(&copied) {
            assert_ne!(src, dst);
            assert_eq!(children(&next, src).len(), children(&next, dst).len());
            assert_eq!(next.get(src).unwrap().element.value(), next.get(dst).unwrap().element.value());
        }
        let original: HashSet<_> = original.into_iter().collect();
        assert!(copied.iter().all(|id| !original.contains(id)));
        check_region(&next, ROOT).unwrap();
    }

    #[test]
    fn test_copy_twice_never_collides() {
        let mut ids = IdGenerator::from_seed("t".into());
        let (once, first) = copy_node(&sample(), "inner", &mut ids).unwrap();
        let (twice, second) = copy_node(&once, "inner", &mut ids).unwrap();
        assert_ne!(first, second);
        assert_eq!(twice.len(), sample().len() + 4);
        assert_eq!(children(&twice, "box"), ["b", "inner", second.as_str(), first.as_str()]);
        check_region(&twice, ROOT).unwrap();
    }

    #[test]
    fn test_copy_root_or_missing_is_rejected() {
        let mut ids = IdGenerator::from_seed("t".into());
        assert!(matches!(
            copy_node(&sample(), ROOT, &mut ids),
            Err(TreeError::RegionRoot(_))
        ));
        assert!(matches!(
            copy_node(&sample(), "zz", &mut ids),
            Err(TreeError::NodeNotFound(_))
        ));

        let mut orphaned = sample();
        orphaned.insert(Node::text("loose", ""));
        assert!(matches!(
            copy_node(&orphaned, "loose", &mut ids),
            Err(TreeError::NoParent(_))
        ));
    }

    #[test]
    fn test_delete_removes_whole_subtree() {
        let next = delete_node(&sample(), "box").unwrap();
        for id in ["box", "b", "inner", "c"] {
            assert!(!next.contains(id));
            assert!(next.nodes().all(|node| !node.children().unwrap_or(&[]).iter().any(|c| c == id)));
        }
        assert_eq!(children(&next, ROOT), ["a", "pb"]);
        check_region(&next, ROOT).unwrap();
    }

    #[test]
    fn test_delete_root_or_missing_is_rejected() {
        assert!(matches!(delete_node(&sample(), ROOT), Err(TreeError::RegionRoot(_))));
        assert!(matches!(delete_node(&sample(), "zz"), Err(TreeError::NodeNotFound(_))));
    }

    #[test]
    fn test_drop_insert_appends_to_container() {
        let mut ids = IdGenerator::from_seed("t".into());
        let payload: DropPayload =
            serde_json::from_value(json!({ "category": "image", "attributes": { "width": 40 } }))
                .unwrap();
        let (next, new_id) = drop_insert(&sample(), "inner", &payload, &mut ids).unwrap();

        assert_eq!(children(&next, "inner"), ["c", new_id.as_str()]);
        assert_eq!(next.get(&new_id).unwrap().element.category(), "image");
        check_region(&next, ROOT).unwrap();
    }

    #[test]
    fn test_drop_onto_leaf_is_rejected() {
        let mut ids = IdGenerator::from_seed("t".into());
        let payload = DropPayload::new("text", Default::default());
        assert_eq!(
            drop_insert(&sample(), "a", &payload, &mut ids).unwrap_err(),
            TreeError::NotAContainer("a".into())
        );
    }

    #[test]
    fn test_node_path_from_root() {
        let content = sample();
        assert_eq!(
            node_path(&content, ROOT, "c").unwrap(),
            [ROOT, "box", "inner", "c"]
        );
        assert_eq!(node_path(&content, ROOT, ROOT).unwrap(), [ROOT]);
        assert!(node_path(&content, ROOT, "zz").is_none());
    }

    #[test]
    fn test_check_region_detects_double_parent() {
        let mut content = sample();
        content.get_mut("box").unwrap().children_mut().unwrap().push("a".into());
        assert!(matches!(
            check_region(&content, ROOT),
            Err(TreeError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_check_region_detects_detached_cycle() {
        let mut content = sample();
        let mut x = Node::container("x", Direction::Vertical);
        x.children_mut().unwrap().push("y".into());
        let mut y = Node::container("y", Direction::Vertical);
        y.children_mut().unwrap().push("x".into());
        content.insert(x);
        content.insert(y);
        assert!(check_region(&content, ROOT).is_err());
    }
}
