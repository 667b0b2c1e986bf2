use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Words shorter than this are never indexed.
pub const MIN_INDEX_TOKEN_LEN: usize = 3;
/// Query tokens shorter than this are dropped.
pub const MIN_QUERY_TOKEN_LEN: usize = 2;
/// Words at least this long also emit character trigrams.
pub const NGRAM_MIN_WORD_LEN: usize = 4;
pub const NGRAM_LEN: usize = 3;
/// N-gram terms are fenced with this marker on both sides so they can
/// never collide with a real word in the inverted index.
pub const NGRAM_SENTINEL: char = '#';
/// Trigrams carry half the weight of the word they came from.
const NGRAM_WEIGHT_FACTOR: f32 = 0.5;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"(?u)\w+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "about", "after", "all", "also", "and", "any", "are", "but", "can",
            "for", "from", "had", "has", "have", "her", "his", "how", "into",
            "its", "just", "more", "not", "off", "once", "only", "our", "out",
            "over", "she", "some", "than", "that", "the", "their", "them",
            "then", "there", "they", "this", "very", "was", "were", "what",
            "when", "which", "will", "with", "you", "your",
        ];
        words.iter().copied().collect()
    };
}

/// One indexable term: a word or a sentinel-wrapped trigram, with the field
/// weight it contributes and its 0-based word position within the field.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub term: String,
    pub weight: f32,
    pub position: u32,
}

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Whether a term is a sentinel-wrapped n-gram rather than a plain word.
pub fn is_ngram_term(term: &str) -> bool {
    term.starts_with(NGRAM_SENTINEL)
}

/// NFKC-normalize and lowercase, matching what the index stores.
pub fn normalize(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

/// Every contiguous 3-char window of `word`, each fenced as `#xyz#`.
pub fn trigrams(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars
        .windows(NGRAM_LEN)
        .map(|window| {
            let mut term = String::with_capacity(NGRAM_LEN + 2);
            term.push(NGRAM_SENTINEL);
            term.extend(window);
            term.push(NGRAM_SENTINEL);
            term
        })
        .collect()
}

/// Tokenize one weighted field into word tokens plus trigram tokens.
///
/// Positions are word indices counted over all words in the field,
/// including ones dropped as stopwords or too short. Trigrams share the
/// position of the word they came from, at half the field weight; this one
/// pass feeds both the exact/prefix index and the fuzzy n-gram index.
pub fn tokenize_field(text: &str, weight: f32) -> Vec<Token> {
    let normalized = normalize(text);
    let mut tokens = Vec::new();
    for (pos, mat) in WORD_RE.find_iter(&normalized).enumerate() {
        let word = mat.as_str();
        let len = word.chars().count();
        if len < MIN_INDEX_TOKEN_LEN || is_stopword(word) {
            continue;
        }
        tokens.push(Token {
            term: word.to_string(),
            weight,
            position: pos as u32,
        });
        if len >= NGRAM_MIN_WORD_LEN {
            for term in trigrams(word) {
                tokens.push(Token {
                    term,
                    weight: weight * NGRAM_WEIGHT_FACTOR,
                    position: pos as u32,
                });
            }
        }
    }
    tokens
}

/// Tokenize a query: word tokens only, stopwords and tokens under 2 chars
/// dropped. The shorter minimum (vs. indexing) lets short tokens reach the
/// prefix stage.
pub fn tokenize_query(query: &str) -> Vec<String> {
    let normalized = normalize(query);
    WORD_RE
        .find_iter(&normalized)
        .map(|mat| mat.as_str())
        .filter(|word| word.chars().count() >= MIN_QUERY_TOKEN_LEN && !is_stopword(word))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_stopwords_and_short_words() {
        let tokens = tokenize_field("The ox and some more", 1.0);
        assert!(tokens.is_empty());
    }

    #[test]
    fn positions_count_dropped_words() {
        let tokens = tokenize_field("the chicken", 1.0);
        let chicken = tokens.iter().find(|t| t.term == "chicken").unwrap();
        assert_eq!(chicken.position, 1);
    }

    #[test]
    fn short_words_emit_no_trigrams() {
        let tokens = tokenize_field("egg", 2.0);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].term, "egg");
    }

    #[test]
    fn trigrams_are_fenced_and_half_weight() {
        let tokens = tokenize_field("stew", 2.0);
        let terms: Vec<&str> = tokens.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(terms, vec!["stew", "#ste#", "#tew#"]);
        assert_eq!(tokens[1].weight, 1.0);
        assert_eq!(tokens[1].position, tokens[0].position);
    }

    #[test]
    fn normalizes_unicode() {
        let tokens = tokenize_field("Café", 1.0);
        assert_eq!(tokens[0].term, "café");
    }

    #[test]
    fn query_tokens_keep_two_char_words() {
        let toks = tokenize_query("ox chicken the");
        assert_eq!(toks, vec!["ox".to_string(), "chicken".to_string()]);
    }
}
