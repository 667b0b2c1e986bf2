use crate::index::{DocKey, Document, Index};
use crate::models::{Recipe, Tag};
use crate::tokenizer::{tokenize_field, Token};
use anyhow::Result;
use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use std::sync::Arc;

/// Recipes are indexed in fixed-size chunks; progress is logged per chunk.
pub const CHUNK_SIZE: usize = 1000;

pub const WEIGHT_TITLE: f32 = 3.0;
pub const WEIGHT_TAGS: f32 = 2.5;
pub const WEIGHT_INGREDIENTS: f32 = 2.0;
pub const WEIGHT_DESCRIPTION: f32 = 1.5;
/// Tags are single-field documents; there is no field competition.
pub const WEIGHT_TAG_NAME: f32 = 1.0;

pub struct IndexBuilder;

impl IndexBuilder {
    /// Build a fresh index from the full dataset. Items without an id are
    /// silently skipped; a rebuild is the only supported way to update the
    /// index (there is no incremental add/remove).
    pub fn build(recipes: &[Recipe], tags: &[Tag]) -> Result<Index> {
        let mut index = Index::new();
        for chunk in recipes.chunks(CHUNK_SIZE) {
            for recipe in chunk {
                index_recipe(&mut index, recipe);
            }
            tracing::debug!(indexed = index.total_documents, "indexed recipe chunk");
        }
        for tag in tags {
            index_tag(&mut index, tag);
        }
        tracing::info!(
            num_docs = index.total_documents,
            num_terms = index.inverted.len(),
            "index build complete"
        );
        Ok(index)
    }
}

fn index_recipe(index: &mut Index, recipe: &Recipe) {
    let Some(id) = recipe.id else { return };
    let tag_names = recipe
        .tags
        .iter()
        .map(|tag| tag.name.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let fields: [(&str, f32); 4] = [
        (recipe.title.as_str(), WEIGHT_TITLE),
        (tag_names.as_str(), WEIGHT_TAGS),
        (recipe.ingredients.as_str(), WEIGHT_INGREDIENTS),
        (recipe.description.as_deref().unwrap_or(""), WEIGHT_DESCRIPTION),
    ];
    let mut tokens = Vec::new();
    for (text, weight) in fields {
        tokens.extend(tokenize_field(text, weight));
    }
    insert_document(index, DocKey::recipe(id), &recipe.title, tokens);
}

fn index_tag(index: &mut Index, tag: &Tag) {
    let Some(id) = tag.id else { return };
    let tokens = tokenize_field(&tag.name, WEIGHT_TAG_NAME);
    insert_document(index, DocKey::tag(id), &tag.name, tokens);
}

fn insert_document(index: &mut Index, key: DocKey, title: &str, tokens: Vec<Token>) {
    let terms: Vec<String> = tokens.iter().map(|t| t.term.clone()).collect();
    let len = terms.len();
    index.documents.insert(
        key,
        Document { key, title: title.to_string(), tokens: terms, len },
    );
    index.total_documents += 1;
    for token in &tokens {
        index.insert_token(key, token);
    }
}

/// Shared, cloneable handle to the live index. Readers take the read lock;
/// `rebuild` constructs a fresh index off to the side and swaps it in
/// atomically, so a partially-built index is never observable. The build
/// gate serializes rebuilds: later calls queue behind the one in flight.
#[derive(Clone, Default)]
pub struct IndexHandle {
    index: Arc<RwLock<Index>>,
    build_gate: Arc<Mutex<()>>,
}

impl IndexHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Index> {
        self.index.read()
    }

    pub fn rebuild(&self, recipes: &[Recipe], tags: &[Tag]) -> Result<()> {
        let _gate = self.build_gate.lock();
        let fresh = IndexBuilder::build(recipes, tags)?;
        *self.index.write() = fresh;
        Ok(())
    }
}
