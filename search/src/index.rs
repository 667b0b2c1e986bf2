use crate::tokenizer::{is_ngram_term, Token};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Which entity type a document was projected from. Recipe and tag ids
/// come from separate sequences in the data layer, so the index keys every
/// id-indexed map by (kind, id) rather than assuming the two spaces never
/// collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    Recipe,
    Tag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DocKey {
    pub kind: DocKind,
    pub id: i64,
}

impl DocKey {
    pub fn recipe(id: i64) -> Self {
        Self { kind: DocKind::Recipe, id }
    }

    pub fn tag(id: i64) -> Self {
        Self { kind: DocKind::Tag, id }
    }
}

/// Index-internal projection of a recipe or tag. Created once per indexed
/// item during a build and discarded wholesale on the next rebuild.
#[derive(Debug, Clone)]
pub struct Document {
    pub key: DocKey,
    pub title: String,
    /// Every term actually indexed for this document, words and trigrams,
    /// in emission order.
    pub tokens: Vec<String>,
    /// Token count; the TF denominator.
    pub len: usize,
}

/// Per-term record of which documents contain it, at what accumulated
/// field weight, and at what word positions.
#[derive(Debug, Clone, Default)]
pub struct PostingList {
    /// Document -> accumulated weighted occurrence count. Each occurrence
    /// contributes its field weight, not 1.
    pub term_frequency: HashMap<DocKey, f32>,
    /// Count of distinct documents with a non-zero weighted frequency.
    pub document_frequency: u32,
    /// Document -> word positions, kept for highlight spans only.
    pub positions: HashMap<DocKey, Vec<u32>>,
}

/// The in-memory index: inverted term index (words and fenced n-grams),
/// the n-gram fast path for fuzzy search, and the document store.
#[derive(Debug, Default)]
pub struct Index {
    pub inverted: HashMap<String, PostingList>,
    pub ngrams: HashMap<String, HashSet<DocKey>>,
    pub documents: HashMap<DocKey, Document>,
    pub total_documents: u32,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.inverted.clear();
        self.ngrams.clear();
        self.documents.clear();
        self.total_documents = 0;
    }

    pub fn posting(&self, term: &str) -> Option<&PostingList> {
        self.inverted.get(term)
    }

    pub fn document(&self, key: DocKey) -> Option<&Document> {
        self.documents.get(&key)
    }

    /// Fold one emitted token into the posting lists. The document
    /// frequency bump must happen while the previous frequency is still
    /// observable: it is incremented exactly once, on the document's first
    /// contribution to the term.
    pub(crate) fn insert_token(&mut self, key: DocKey, token: &Token) {
        let list = self.inverted.entry(token.term.clone()).or_default();
        let prev = list.term_frequency.get(&key).copied().unwrap_or(0.0);
        if prev == 0.0 {
            list.document_frequency += 1;
        }
        list.term_frequency.insert(key, prev + token.weight);
        list.positions.entry(key).or_default().push(token.position);
        if is_ngram_term(&token.term) {
            self.ngrams.entry(token.term.clone()).or_default().insert(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(term: &str, weight: f32, position: u32) -> Token {
        Token { term: term.to_string(), weight, position }
    }

    #[test]
    fn document_frequency_counts_documents_once() {
        let mut index = Index::new();
        let key = DocKey::recipe(1);
        index.insert_token(key, &token("chicken", 3.0, 0));
        index.insert_token(key, &token("chicken", 2.0, 4));
        let list = index.posting("chicken").unwrap();
        assert_eq!(list.document_frequency, 1);
        assert_eq!(list.term_frequency[&key], 5.0);
        assert_eq!(list.positions[&key], vec![0, 4]);
    }

    #[test]
    fn ngram_terms_also_land_in_ngram_index() {
        let mut index = Index::new();
        let key = DocKey::recipe(1);
        index.insert_token(key, &token("#chi#", 1.5, 0));
        assert!(index.ngrams["#chi#"].contains(&key));
        assert!(index.posting("#chi#").is_some());
    }

    #[test]
    fn recipe_and_tag_ids_never_collide() {
        let mut index = Index::new();
        index.insert_token(DocKey::recipe(7), &token("soup", 3.0, 0));
        index.insert_token(DocKey::tag(7), &token("soup", 1.0, 0));
        assert_eq!(index.posting("soup").unwrap().document_frequency, 2);
    }
}
