use crate::node::{NodeId, NodePayload, Tree};
use serde::Serialize;

/// Recipe rows render slightly taller than tag rows.
pub const RECIPE_HEIGHT_FACTOR: f32 = 1.2;

/// One row of the virtualized list: a visible node plus the geometry a
/// renderer needs to place it without walking the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VirtualItem {
    pub id: String,
    pub node: NodeId,
    pub level: u32,
    pub index: usize,
    pub height: f32,
    pub offset_top: f32,
}

/// Depth-first projection of the visible, expanded portion of `tree`
/// into render order. Children of a collapsed node are skipped entirely,
/// as is the whole subtree of an invisible node.
pub fn flatten(tree: &Tree, base_height: f32) -> Vec<VirtualItem> {
    let mut items = Vec::new();
    let mut offset_top = 0.0;
    let mut stack: Vec<NodeId> = tree.roots.iter().rev().copied().collect();

    while let Some(id) = stack.pop() {
        let node = &tree.nodes[id];
        if !node.visible {
            continue;
        }
        let height = match node.payload {
            NodePayload::Recipe(_) => base_height * RECIPE_HEIGHT_FACTOR,
            NodePayload::Tag(_) => base_height,
        };
        items.push(VirtualItem {
            id: node.id.clone(),
            node: id,
            level: node.level,
            index: items.len(),
            height,
            offset_top,
        });
        offset_top += height;
        if node.expanded {
            stack.extend(node.children.iter().rev());
        }
    }
    items
}
