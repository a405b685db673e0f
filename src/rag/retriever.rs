//! Top-K similarity retriever over the vector store.

use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::{Document, SearchResult, VectorStore};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Embeds a query and fetches the `k` most similar documents.
pub struct Retriever {
    vector_store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    k: usize,
}

impl Retriever {
    /// Create a new retriever returning at most `k` documents.
    pub fn new(vector_store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>, k: usize) -> Self {
        Self {
            vector_store,
            embedder,
            k,
        }
    }

    /// Number of documents returned per query.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Retrieve documents with their similarity scores, best first.
    #[instrument(skip(self), fields(k = self.k))]
    pub async fn retrieve_scored(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedder.embed(query).await?;
        let results = self.vector_store.search(&query_embedding, self.k).await?;
        debug!("Retrieved {} documents", results.len());
        Ok(results)
    }

    /// Retrieve documents, best first.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<Document>> {
        Ok(self
            .retrieve_scored(query)
            .await?
            .into_iter()
            .map(|r| r.document)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{catalog_store, KeywordEmbedder};

    #[tokio::test]
    async fn test_best_match_first() {
        let retriever = Retriever::new(catalog_store().await, Arc::new(KeywordEmbedder), 3);

        let docs = retriever.retrieve("a space adventure").await.unwrap();
        assert_eq!(docs[0].title(), "Space Sweepers");
    }

    #[tokio::test]
    async fn test_never_more_than_k() {
        let retriever = Retriever::new(catalog_store().await, Arc::new(KeywordEmbedder), 3);
        let docs = retriever.retrieve("comedy crime space heist").await.unwrap();
        assert_eq!(docs.len(), 3);

        let retriever = Retriever::new(catalog_store().await, Arc::new(KeywordEmbedder), 1);
        let docs = retriever.retrieve("comedy").await.unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[tokio::test]
    async fn test_scores_descend() {
        let retriever = Retriever::new(catalog_store().await, Arc::new(KeywordEmbedder), 3);
        let results = retriever.retrieve_scored("crime heist").await.unwrap();
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
