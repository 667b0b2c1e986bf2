use search::{Recipe, Tag};
use std::collections::{HashMap, HashSet};

/// Derived lookup tables over the tag/recipe junction relation, built once
/// per dataset load. Both directions are deduplicated and sorted so tree
/// builds are deterministic.
#[derive(Debug, Clone, Default)]
pub struct RelationMaps {
    pub tag_to_recipes: HashMap<i64, Vec<i64>>,
    pub recipe_to_tags: HashMap<i64, Vec<i64>>,
}

impl RelationMaps {
    pub fn build(recipes: &[Recipe], tags: &[Tag]) -> Self {
        let mut maps = Self::default();
        for tag in tags {
            if let Some(tag_id) = tag.id {
                maps.tag_to_recipes
                    .entry(tag_id)
                    .or_default()
                    .extend(&tag.recipe_ids);
                for &recipe_id in &tag.recipe_ids {
                    maps.recipe_to_tags.entry(recipe_id).or_default().push(tag_id);
                }
            }
        }
        for recipe in recipes {
            let Some(recipe_id) = recipe.id else { continue };
            let tag_ids = maps.recipe_to_tags.entry(recipe_id).or_default();
            for tag in &recipe.tags {
                if let Some(tag_id) = tag.id {
                    tag_ids.push(tag_id);
                    // The junction is symmetric; recipes carry the
                    // denormalized side, so back-fill the tag direction.
                    maps.tag_to_recipes.entry(tag_id).or_default().push(recipe_id);
                }
            }
        }
        for ids in maps.tag_to_recipes.values_mut() {
            ids.sort_unstable();
            ids.dedup();
        }
        for ids in maps.recipe_to_tags.values_mut() {
            ids.sort_unstable();
            ids.dedup();
        }
        maps
    }

    pub fn recipes_for_tag(&self, tag_id: i64) -> &[i64] {
        self.tag_to_recipes.get(&tag_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tags_for_recipe(&self, recipe_id: i64) -> &[i64] {
        self.recipe_to_tags.get(&recipe_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Whether re-parenting `tag_id` under `new_parent` would close a cycle.
/// Walks the full ancestor chain, not just the immediate parent; a chain
/// that revisits any tag also counts as cyclic.
pub fn creates_cycle(tags: &[Tag], tag_id: i64, new_parent: Option<i64>) -> bool {
    let parents: HashMap<i64, Option<i64>> = tags
        .iter()
        .filter_map(|tag| tag.id.map(|id| (id, tag.parent_tag_id)))
        .collect();
    let mut seen = HashSet::new();
    let mut current = new_parent;
    while let Some(ancestor) = current {
        if ancestor == tag_id || !seen.insert(ancestor) {
            return true;
        }
        current = parents.get(&ancestor).copied().flatten();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backfills_tag_direction_from_recipes() {
        let tag = Tag::new(1, "soup", None);
        let mut recipe = Recipe::new(10, "Chicken Soup");
        recipe.tags = vec![tag.clone()];
        let maps = RelationMaps::build(&[recipe], &[tag]);
        assert_eq!(maps.recipes_for_tag(1), &[10]);
        assert_eq!(maps.tags_for_recipe(10), &[1]);
    }

    #[test]
    fn backfills_recipe_direction_from_tags() {
        let mut tag = Tag::new(3, "soup", None);
        tag.recipe_ids = vec![10];
        let recipe = Recipe::new(10, "Chicken Soup");
        let maps = RelationMaps::build(&[recipe], &[tag]);
        assert_eq!(maps.tags_for_recipe(10), &[3]);
    }

    #[test]
    fn merges_and_dedupes_both_sources() {
        let mut tag = Tag::new(1, "soup", None);
        tag.recipe_ids = vec![10, 11];
        let mut recipe = Recipe::new(10, "Chicken Soup");
        recipe.tags = vec![tag.clone()];
        let maps = RelationMaps::build(&[recipe], &[tag]);
        assert_eq!(maps.recipes_for_tag(1), &[10, 11]);
    }

    #[test]
    fn detects_self_parent() {
        let tags = vec![Tag::new(1, "a", None)];
        assert!(creates_cycle(&tags, 1, Some(1)));
    }

    #[test]
    fn detects_transitive_cycle() {
        // a -> b -> c; re-parenting a under c closes the loop.
        let tags = vec![
            Tag::new(1, "a", None),
            Tag::new(2, "b", Some(1)),
            Tag::new(3, "c", Some(2)),
        ];
        assert!(creates_cycle(&tags, 1, Some(3)));
        assert!(!creates_cycle(&tags, 3, Some(1)));
    }
}
