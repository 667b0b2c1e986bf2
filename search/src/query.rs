use crate::builder::IndexHandle;
use crate::index::{DocKey, Index};
use crate::tokenizer::{is_ngram_term, normalize, tokenize_query, trigrams, NGRAM_MIN_WORD_LEN};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

/// Queries under this many characters return no results.
pub const MIN_QUERY_LEN: usize = 2;
/// Prefix-stage scores use the matched term's TF-IDF, discounted.
pub const PREFIX_PENALTY: f32 = 0.8;
/// Flat score added per (trigram, document) hit in the fuzzy stage. The
/// fuzzy stage is deliberately cruder: no IDF weighting.
pub const FUZZY_HIT_SCORE: f32 = 0.3;
/// Query tokens shorter than this never fuzzy-match.
pub const FUZZY_MIN_TOKEN_LEN: usize = NGRAM_MIN_WORD_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Prefix,
    Fuzzy,
}

/// Word positions of one matched term, for highlight spans in the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub term: String,
    pub positions: Vec<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub key: DocKey,
    pub score: f32,
    pub match_type: MatchType,
    pub highlights: Vec<Highlight>,
}

/// Runs staged searches and suggestion lookups against the shared index.
#[derive(Clone)]
pub struct QueryEngine {
    handle: IndexHandle,
}

impl QueryEngine {
    pub fn new(handle: IndexHandle) -> Self {
        Self { handle }
    }

    /// Three-stage search: exact, then prefix, then fuzzy, each stage
    /// running only while the running result set is under `max_results`.
    /// Stage order does not imply priority once merged; when a document
    /// appears in two stages the higher-scoring entry wins, match type
    /// included.
    pub fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        if query.trim().chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }
        let tokens = tokenize_query(query);
        if tokens.is_empty() {
            return Vec::new();
        }

        let index = self.handle.read();
        let mut merged: HashMap<DocKey, SearchResult> = HashMap::new();
        merge(&mut merged, exact_stage(&index, &tokens));
        if merged.len() < max_results {
            merge(&mut merged, prefix_stage(&index, &tokens));
        }
        if merged.len() < max_results {
            merge(&mut merged, fuzzy_stage(&index, &tokens));
        }

        let mut results: Vec<SearchResult> = merged.into_values().collect();
        results.sort_by(|a, b| {
            b.score.total_cmp(&a.score).then_with(|| a.key.cmp(&b.key))
        });
        results.truncate(max_results);
        results
    }

    /// Alphabetical, deduplicated terms starting with the partial query.
    /// N-gram terms never surface here; stopwords were already filtered
    /// out at indexing time.
    pub fn suggestions(&self, partial: &str, max: usize) -> Vec<String> {
        let needle = normalize(partial.trim());
        if needle.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }
        let index = self.handle.read();
        let mut terms: Vec<String> = index
            .inverted
            .keys()
            .filter(|term| !is_ngram_term(term) && term.starts_with(&needle))
            .cloned()
            .collect();
        terms.sort();
        terms.dedup();
        terms.truncate(max);
        terms
    }
}

/// TF-IDF contribution of one term to one document. A lookup miss simply
/// contributes nothing. `idf` goes negative once a term appears in most
/// documents; that is accepted, not clamped, and naturally downweights
/// near-ubiquitous terms.
pub fn tf_idf(index: &Index, term: &str, key: DocKey) -> f32 {
    let Some(list) = index.posting(term) else { return 0.0 };
    let Some(&weight) = list.term_frequency.get(&key) else { return 0.0 };
    let Some(doc) = index.document(key) else { return 0.0 };
    if doc.len == 0 {
        return 0.0;
    }
    let tf = weight / doc.len as f32;
    let idf = (index.total_documents as f32 / (list.document_frequency as f32 + 1.0)).ln();
    tf * idf
}

fn highlight_for(index: &Index, term: &str, key: DocKey) -> Option<Highlight> {
    let positions = index.posting(term)?.positions.get(&key)?;
    Some(Highlight { term: term.to_string(), positions: positions.clone() })
}

/// Boolean AND over all query tokens: a document must contain every one.
fn exact_stage(index: &Index, tokens: &[String]) -> Vec<SearchResult> {
    let mut candidates: Option<HashSet<DocKey>> = None;
    for token in tokens {
        let Some(list) = index.posting(token) else { return Vec::new() };
        let keys: HashSet<DocKey> = list.term_frequency.keys().copied().collect();
        candidates = Some(match candidates.take() {
            None => keys,
            Some(prev) => prev.intersection(&keys).copied().collect(),
        });
        if candidates.as_ref().is_some_and(HashSet::is_empty) {
            return Vec::new();
        }
    }

    candidates
        .unwrap_or_default()
        .into_iter()
        .map(|key| {
            let mut score = 0.0;
            let mut highlights = Vec::new();
            for token in tokens {
                score += tf_idf(index, token, key);
                if let Some(highlight) = highlight_for(index, token, key) {
                    highlights.push(highlight);
                }
            }
            SearchResult { key, score, match_type: MatchType::Exact, highlights }
        })
        .collect()
}

/// Scan the inverted index for terms starting with each query token,
/// scoring with the matched term's TF-IDF times the prefix penalty and
/// keeping the best score per document.
fn prefix_stage(index: &Index, tokens: &[String]) -> Vec<SearchResult> {
    let mut best: HashMap<DocKey, (f32, String)> = HashMap::new();
    for token in tokens {
        for (term, list) in &index.inverted {
            if is_ngram_term(term) || !term.starts_with(token.as_str()) {
                continue;
            }
            for &key in list.term_frequency.keys() {
                let score = tf_idf(index, term, key) * PREFIX_PENALTY;
                match best.entry(key) {
                    Entry::Vacant(entry) => {
                        entry.insert((score, term.clone()));
                    }
                    Entry::Occupied(mut entry) => {
                        if score > entry.get().0 {
                            entry.insert((score, term.clone()));
                        }
                    }
                }
            }
        }
    }

    best.into_iter()
        .map(|(key, (score, term))| SearchResult {
            key,
            score,
            match_type: MatchType::Prefix,
            highlights: highlight_for(index, &term, key).into_iter().collect(),
        })
        .collect()
}

/// Re-derive each long-enough query token's trigrams and look them up in
/// the n-gram index, accumulating a flat score per hit. Tokens that exist
/// verbatim in the inverted index are skipped: fuzzy matching is for
/// fragments and typos, and letting a known term's own trigrams pile up
/// flat scores would outvote its exact-stage TF-IDF in the merge.
fn fuzzy_stage(index: &Index, tokens: &[String]) -> Vec<SearchResult> {
    let mut scores: HashMap<DocKey, f32> = HashMap::new();
    for token in tokens {
        if token.chars().count() < FUZZY_MIN_TOKEN_LEN || index.posting(token).is_some() {
            continue;
        }
        for trigram in trigrams(token) {
            if let Some(keys) = index.ngrams.get(&trigram) {
                for &key in keys {
                    *scores.entry(key).or_insert(0.0) += FUZZY_HIT_SCORE;
                }
            }
        }
    }

    scores
        .into_iter()
        .map(|(key, score)| SearchResult {
            key,
            score,
            match_type: MatchType::Fuzzy,
            highlights: Vec::new(),
        })
        .collect()
}

/// Union by document key, keeping the higher-scoring entry.
fn merge(into: &mut HashMap<DocKey, SearchResult>, stage: Vec<SearchResult>) {
    for result in stage {
        match into.entry(result.key) {
            Entry::Vacant(entry) => {
                entry.insert(result);
            }
            Entry::Occupied(mut entry) => {
                if result.score > entry.get().score {
                    entry.insert(result);
                }
            }
        }
    }
}
