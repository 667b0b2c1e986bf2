use search::Recipe;
use serde::Serialize;

/// Index of a node within its tree's arena.
pub type NodeId = usize;

pub fn tag_node_id(id: i64) -> String {
    format!("tag-{id}")
}

pub fn recipe_node_id(id: i64) -> String {
    format!("recipe-{id}")
}

/// Payload of a tag node: its hierarchy position plus the recipe total of
/// its whole subtree and the name path from the root down to it.
#[derive(Debug, Clone, Serialize)]
pub struct TagData {
    pub id: i64,
    pub parent_tag_id: Option<i64>,
    pub recipe_count: usize,
    pub path: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodePayload {
    Tag(TagData),
    Recipe(Recipe),
}

/// One node of the rendered hierarchy. `visible` controls inclusion in
/// flattening; `expanded` controls whether children are traversed. The
/// two are independent.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    /// Type-prefixed key, `"tag-<id>"` or `"recipe-<id>"`.
    pub id: String,
    pub name: String,
    /// Root = 0.
    pub level: u32,
    pub expanded: bool,
    pub visible: bool,
    /// Score from the originating search result; 0 when not search-driven.
    pub match_score: f32,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub payload: NodePayload,
}

impl TreeNode {
    pub fn is_tag(&self) -> bool {
        matches!(self.payload, NodePayload::Tag(_))
    }

    pub fn is_recipe(&self) -> bool {
        matches!(self.payload, NodePayload::Recipe(_))
    }
}

/// Arena-backed tree: nodes live in a flat vector and reference children
/// and parents by index. Rebuilt wholesale on every build; cloning is a
/// flat copy, which is what keeps the mutation helpers cheap.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
    pub roots: Vec<NodeId>,
}

impl Tree {
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    pub fn find(&self, node_id: &str) -> Option<NodeId> {
        self.nodes.iter().position(|node| node.id == node_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
