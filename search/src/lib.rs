//! In-memory search engine for the recipe catalogue: tokenization,
//! inverted/trigram indexing, and staged exact/prefix/fuzzy querying.

pub mod builder;
pub mod index;
pub mod models;
pub mod query;
pub mod tokenizer;

pub use builder::{IndexBuilder, IndexHandle};
pub use index::{DocKey, DocKind, Document, Index, PostingList};
pub use models::{Recipe, Tag};
pub use query::{Highlight, MatchType, QueryEngine, SearchResult};
