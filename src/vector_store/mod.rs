//! Vector store abstraction for the catalog index.
//!
//! Provides a trait-based interface for different vector database backends.

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Metadata key holding the catalog title of a document.
pub const TITLE_KEY: &str = "title";

/// A catalog entry stored in the vector database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID.
    pub id: Uuid,
    /// Descriptive text that is embedded and shown to the model.
    pub page_content: String,
    /// Arbitrary string metadata; always contains `title`.
    pub metadata: BTreeMap<String, String>,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// When this document was indexed.
    pub indexed_at: DateTime<Utc>,
}

impl Document {
    /// Create a new document. The title is recorded under the `title` metadata key.
    pub fn new(
        title: impl Into<String>,
        page_content: impl Into<String>,
        mut metadata: BTreeMap<String, String>,
        embedding: Vec<f32>,
    ) -> Self {
        metadata.insert(TITLE_KEY.to_string(), title.into());
        Self {
            id: Uuid::new_v4(),
            page_content: page_content.into(),
            metadata,
            embedding,
            indexed_at: Utc::now(),
        }
    }

    /// Catalog title, or an empty string for documents indexed without one.
    pub fn title(&self) -> &str {
        self.metadata.get(TITLE_KEY).map(String::as_str).unwrap_or_default()
    }
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched document.
    pub document: Document,
    /// Cosine similarity score (higher is better).
    pub score: f32,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Store a document with its embedding.
    async fn upsert(&self, doc: &Document) -> Result<()>;

    /// Bulk upsert documents.
    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize>;

    /// Return at most `limit` documents ranked by similarity, best first.
    /// Equal scores keep insertion order.
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>>;

    /// Remove every document. Returns the number removed.
    async fn clear(&self) -> Result<usize>;

    /// Swap the whole contents for `docs` in one step. Returns the number removed.
    ///
    /// On error the previous contents stay in place.
    async fn replace_all(&self, docs: &[Document]) -> Result<usize>;

    /// Get total document count.
    async fn document_count(&self) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Score documents against a query and keep the best `limit`.
pub(crate) fn rank<I>(query_embedding: &[f32], docs: I, limit: usize) -> Vec<SearchResult>
where
    I: IntoIterator<Item = Document>,
{
    let mut results: Vec<SearchResult> = docs
        .into_iter()
        .map(|doc| {
            let score = cosine_similarity(query_embedding, &doc.embedding);
            SearchResult { document: doc, score }
        })
        .collect();

    // sort_by is stable, so ties stay in insertion order
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(limit);
    results
}
