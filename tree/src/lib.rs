//! Projects the flat recipe/tag relations (optionally constrained by live
//! search results) into an orderable, partially-expanded tree, and
//! flattens it into an offset-annotated sequence for windowed rendering.

pub mod builder;
pub mod flatten;
pub mod mutate;
pub mod node;
pub mod relations;

pub use builder::{TreeBuilder, TreeOptions, DEFAULT_MAX_DEPTH};
pub use flatten::{flatten, VirtualItem, RECIPE_HEIGHT_FACTOR};
pub use mutate::{expand_path, filter_tree, update_node_expansion};
pub use node::{recipe_node_id, tag_node_id, NodeId, NodePayload, TagData, Tree, TreeNode};
pub use relations::{creates_cycle, RelationMaps};
