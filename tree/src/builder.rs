use crate::node::{recipe_node_id, tag_node_id, NodeId, NodePayload, TagData, Tree, TreeNode};
use crate::relations::RelationMaps;
use search::{DocKind, Recipe, SearchResult, Tag};
use std::collections::{HashMap, HashSet};

/// Tag recursion is bounded; tags nested deeper than this are omitted.
pub const DEFAULT_MAX_DEPTH: u32 = 8;

#[derive(Debug, Clone)]
pub struct TreeOptions {
    /// When present, the tree is restricted to recipes/tags the results
    /// reference (plus tag ancestors); when absent, the full hierarchy is
    /// built.
    pub search_results: Option<Vec<SearchResult>>,
    /// Node ids (`"tag-<id>"` / `"recipe-<id>"`) the caller has expanded.
    pub expanded: HashSet<String>,
    pub max_depth: u32,
    pub show_empty_tags: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            search_results: None,
            expanded: HashSet::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            show_empty_tags: false,
        }
    }
}

#[derive(Default)]
struct Constraint {
    tag_ids: HashSet<i64>,
    recipe_ids: HashSet<i64>,
    /// Node id -> score from the originating search result.
    scores: HashMap<String, f32>,
    /// Tags that matched the search directly; they survive empty-pruning.
    matched_tags: HashSet<i64>,
}

/// A subtree under construction. Nodes are only committed to the arena
/// once pruning decisions are final, so pruned branches never leave
/// orphans behind.
struct Built {
    node: TreeNode,
    children: Vec<Built>,
    recipe_count: usize,
}

/// Turns the tag hierarchy plus a recipe set into a [`Tree`], rebuilt
/// wholesale on every call.
pub struct TreeBuilder<'a> {
    relations: &'a RelationMaps,
    tag_by_id: HashMap<i64, &'a Tag>,
    recipe_by_id: HashMap<i64, &'a Recipe>,
    children_by_parent: HashMap<Option<i64>, Vec<&'a Tag>>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(tags: &'a [Tag], recipes: &'a [Recipe], relations: &'a RelationMaps) -> Self {
        let mut tag_by_id = HashMap::new();
        let mut children_by_parent: HashMap<Option<i64>, Vec<&'a Tag>> = HashMap::new();
        for tag in tags {
            if let Some(id) = tag.id {
                tag_by_id.insert(id, tag);
                children_by_parent.entry(tag.parent_tag_id).or_default().push(tag);
            }
        }
        let recipe_by_id = recipes
            .iter()
            .filter_map(|recipe| recipe.id.map(|id| (id, recipe)))
            .collect();
        Self { relations, tag_by_id, recipe_by_id, children_by_parent }
    }

    pub fn build(&self, opts: &TreeOptions) -> Tree {
        let tree = match &opts.search_results {
            None => self.build_hierarchy(opts, None),
            Some(results) => {
                let mut constraint = self.constraint_from(results);
                if constraint.tag_ids.is_empty() && !constraint.recipe_ids.is_empty() {
                    // No tag associations at all: fall back to a flat
                    // recipe list rather than showing nothing.
                    self.build_flat(&constraint, opts)
                } else {
                    self.add_ancestors(&mut constraint.tag_ids);
                    self.build_hierarchy(opts, Some(&constraint))
                }
            }
        };
        tracing::debug!(nodes = tree.nodes.len(), roots = tree.roots.len(), "tree built");
        tree
    }

    fn constraint_from(&self, results: &[SearchResult]) -> Constraint {
        let mut constraint = Constraint::default();
        for result in results {
            match result.key.kind {
                DocKind::Recipe => {
                    constraint.recipe_ids.insert(result.key.id);
                    constraint.scores.insert(recipe_node_id(result.key.id), result.score);
                    for &tag_id in self.relations.tags_for_recipe(result.key.id) {
                        constraint.tag_ids.insert(tag_id);
                    }
                }
                DocKind::Tag => {
                    constraint.tag_ids.insert(result.key.id);
                    constraint.matched_tags.insert(result.key.id);
                    constraint.scores.insert(tag_node_id(result.key.id), result.score);
                    for &recipe_id in self.relations.recipes_for_tag(result.key.id) {
                        constraint.recipe_ids.insert(recipe_id);
                    }
                }
            }
        }
        constraint
    }

    /// Extend the relevant-tag set with every transitive ancestor so each
    /// matched tag stays reachable from a root. Guarded against parent
    /// cycles in the input.
    fn add_ancestors(&self, tag_ids: &mut HashSet<i64>) {
        let seeds: Vec<i64> = tag_ids.iter().copied().collect();
        for seed in seeds {
            let mut seen = HashSet::new();
            let mut current = self.tag_by_id.get(&seed).and_then(|tag| tag.parent_tag_id);
            while let Some(parent_id) = current {
                if !seen.insert(parent_id) || !tag_ids.insert(parent_id) {
                    break;
                }
                current = self.tag_by_id.get(&parent_id).and_then(|tag| tag.parent_tag_id);
            }
        }
    }

    fn build_hierarchy(&self, opts: &TreeOptions, constraint: Option<&Constraint>) -> Tree {
        let mut visiting = HashSet::new();
        let mut path = Vec::new();
        let built_roots: Vec<Built> = self
            .child_tags(None, constraint)
            .into_iter()
            .filter_map(|tag| {
                self.build_tag(tag, 0, &mut path, &mut visiting, opts, constraint)
            })
            .collect();

        let mut tree = Tree::default();
        for built in built_roots {
            let root = commit(&mut tree, built, None);
            tree.roots.push(root);
        }
        tree
    }

    fn build_tag(
        &self,
        tag: &Tag,
        level: u32,
        path: &mut Vec<String>,
        visiting: &mut HashSet<i64>,
        opts: &TreeOptions,
        constraint: Option<&Constraint>,
    ) -> Option<Built> {
        let tag_id = tag.id?;
        // Backstop against parent cycles that survived validation.
        if !visiting.insert(tag_id) {
            return None;
        }
        path.push(tag.name.clone());

        let mut children = Vec::new();
        if level + 1 < opts.max_depth {
            for child in self.child_tags(Some(tag_id), constraint) {
                if let Some(built) =
                    self.build_tag(child, level + 1, path, visiting, opts, constraint)
                {
                    children.push(built);
                }
            }
        }

        let mut direct: Vec<&Recipe> = self
            .relations
            .recipes_for_tag(tag_id)
            .iter()
            .filter(|&&recipe_id| {
                constraint.is_none_or(|c| c.recipe_ids.contains(&recipe_id))
            })
            .filter_map(|recipe_id| self.recipe_by_id.get(recipe_id).copied())
            .collect();
        direct.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));

        let recipe_count =
            direct.len() + children.iter().map(|c| c.recipe_count).sum::<usize>();
        for recipe in direct {
            children.push(self.recipe_leaf(recipe, level + 1, opts, constraint));
        }

        let node_path = path.clone();
        path.pop();
        visiting.remove(&tag_id);

        let directly_matched =
            constraint.is_some_and(|c| c.matched_tags.contains(&tag_id));
        if recipe_count == 0 && !opts.show_empty_tags && !directly_matched {
            return None;
        }

        let node_id = tag_node_id(tag_id);
        // Search-constrained trees expand the whole path to each match.
        let expanded = constraint.is_some() || opts.expanded.contains(&node_id);
        let match_score = constraint
            .and_then(|c| c.scores.get(&node_id).copied())
            .unwrap_or(0.0);
        Some(Built {
            node: TreeNode {
                id: node_id,
                name: tag.name.clone(),
                level,
                expanded,
                visible: true,
                match_score,
                children: Vec::new(),
                parent: None,
                payload: NodePayload::Tag(TagData {
                    id: tag_id,
                    parent_tag_id: tag.parent_tag_id,
                    recipe_count,
                    path: node_path,
                }),
            },
            children,
            recipe_count,
        })
    }

    fn recipe_leaf(
        &self,
        recipe: &Recipe,
        level: u32,
        opts: &TreeOptions,
        constraint: Option<&Constraint>,
    ) -> Built {
        let node_id = recipe.id.map(recipe_node_id).unwrap_or_default();
        let match_score = constraint
            .and_then(|c| c.scores.get(&node_id).copied())
            .unwrap_or(0.0);
        Built {
            node: TreeNode {
                id: node_id.clone(),
                name: recipe.title.clone(),
                level,
                expanded: opts.expanded.contains(&node_id),
                visible: true,
                match_score,
                children: Vec::new(),
                parent: None,
                payload: NodePayload::Recipe(recipe.clone()),
            },
            children: Vec::new(),
            recipe_count: 1,
        }
    }

    /// Child tags of `parent` (None = roots), restricted to the relevant
    /// set when search-constrained, in stable alphabetical order.
    fn child_tags(&self, parent: Option<i64>, constraint: Option<&Constraint>) -> Vec<&'a Tag> {
        let mut tags: Vec<&'a Tag> = self
            .children_by_parent
            .get(&parent)
            .map(|children| {
                children
                    .iter()
                    .copied()
                    .filter(|tag| {
                        tag.id.is_some_and(|id| {
                            constraint.is_none_or(|c| c.tag_ids.contains(&id))
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        tags.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        tags
    }

    /// Flat, recipe-only tree: score descending, then name.
    fn build_flat(&self, constraint: &Constraint, opts: &TreeOptions) -> Tree {
        let mut recipes: Vec<&Recipe> = constraint
            .recipe_ids
            .iter()
            .filter_map(|recipe_id| self.recipe_by_id.get(recipe_id).copied())
            .collect();
        recipes.sort_by(|a, b| {
            let score = |recipe: &Recipe| {
                recipe
                    .id
                    .and_then(|id| constraint.scores.get(&recipe_node_id(id)).copied())
                    .unwrap_or(0.0)
            };
            score(b)
                .total_cmp(&score(a))
                .then_with(|| a.title.cmp(&b.title))
        });

        let mut tree = Tree::default();
        for recipe in recipes {
            let built = self.recipe_leaf(recipe, 0, opts, Some(constraint));
            let root = commit(&mut tree, built, None);
            tree.roots.push(root);
        }
        tree
    }
}

/// Pre-order arena insertion of a finished subtree.
fn commit(tree: &mut Tree, built: Built, parent: Option<NodeId>) -> NodeId {
    let index = tree.nodes.len();
    let mut node = built.node;
    node.parent = parent;
    tree.nodes.push(node);
    for child in built.children {
        let child_index = commit(tree, child, Some(index));
        tree.nodes[index].children.push(child_index);
    }
    index
}
