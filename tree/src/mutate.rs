//! Pure tree transformations. Each function leaves its input untouched
//! and returns a new [`Tree`], so callers can diff old against new.

use crate::node::{NodeId, Tree};

/// Returns a copy of `tree` with the expansion state of `node_id` set to
/// `expanded`. Unknown ids leave the tree unchanged.
pub fn update_node_expansion(tree: &Tree, node_id: &str, expanded: bool) -> Tree {
    let mut next = tree.clone();
    if let Some(index) = next.find(node_id) {
        next.nodes[index].expanded = expanded;
    }
    next
}

/// Expands every ancestor of `node_id` so that it becomes reachable in
/// the flattened view. The target's own expansion state is untouched.
pub fn expand_path(tree: &Tree, node_id: &str) -> Tree {
    let mut next = tree.clone();
    let mut current = next.find(node_id).and_then(|index| next.nodes[index].parent);
    while let Some(index) = current {
        next.nodes[index].expanded = true;
        current = next.nodes[index].parent;
    }
    next
}

/// Case-insensitive name filter. A node stays visible when its own name
/// contains the needle or any descendant does; descendants of a matching
/// node are not kept on that basis alone. A blank query restores full
/// visibility.
pub fn filter_tree(tree: &Tree, query: &str) -> Tree {
    let mut next = tree.clone();
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        for node in &mut next.nodes {
            node.visible = true;
        }
        return next;
    }
    let roots = next.roots.clone();
    for root in roots {
        apply_filter(&mut next, root, &needle);
    }
    next
}

fn apply_filter(tree: &mut Tree, id: NodeId, needle: &str) -> bool {
    let children = tree.nodes[id].children.clone();
    let mut any_child_visible = false;
    for child in children {
        any_child_visible |= apply_filter(tree, child, needle);
    }
    let node = &mut tree.nodes[id];
    node.visible = any_child_visible || node.name.to_lowercase().contains(needle);
    node.visible
}
