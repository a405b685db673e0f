//! In-memory vector store implementation.
//!
//! Useful for testing and small catalogs.

use super::{rank, Document, SearchResult, VectorStore};
use crate::error::{RagError, Result};
use async_trait::async_trait;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory vector store.
pub struct MemoryVectorStore {
    documents: RwLock<Vec<Document>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Document>>> {
        self.documents
            .read()
            .map_err(|e| RagError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Document>>> {
        self.documents
            .write()
            .map_err(|e| RagError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    fn insert(docs: &mut Vec<Document>, doc: &Document) {
        match docs.iter_mut().find(|d| d.id == doc.id) {
            Some(existing) => *existing = doc.clone(),
            None => docs.push(doc.clone()),
        }
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert(&self, doc: &Document) -> Result<()> {
        let mut docs = self.write()?;
        Self::insert(&mut docs, doc);
        Ok(())
    }

    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize> {
        let mut store = self.write()?;
        for doc in docs {
            Self::insert(&mut store, doc);
        }
        Ok(docs.len())
    }

    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let docs = self.read()?;
        Ok(rank(query_embedding, docs.iter().cloned(), limit))
    }

    async fn clear(&self) -> Result<usize> {
        let mut docs = self.write()?;
        let removed = docs.len();
        docs.clear();
        Ok(removed)
    }

    async fn replace_all(&self, docs: &[Document]) -> Result<usize> {
        let mut store = self.write()?;
        let removed = store.len();
        store.clear();
        for doc in docs {
            Self::insert(&mut store, doc);
        }
        Ok(removed)
    }

    async fn document_count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_memory_vector_store() {
        let store = MemoryVectorStore::new();

        let doc1 = Document::new("Bird Box", "Post-apocalyptic thriller", BTreeMap::new(), vec![1.0, 0.0, 0.0]);
        let doc2 = Document::new("Klaus", "Animated Christmas story", BTreeMap::new(), vec![0.0, 1.0, 0.0]);

        store.upsert_batch(&[doc1, doc2]).await.unwrap();

        assert_eq!(store.document_count().await.unwrap(), 2);

        let results = store.search(&[1.0, 0.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].score > results[1].score);
        assert_eq!(results[0].document.title(), "Bird Box");
    }

    #[tokio::test]
    async fn test_upsert_replaces_same_id() {
        let store = MemoryVectorStore::new();
        let mut doc = Document::new("Okja", "A girl and her super-pig", BTreeMap::new(), vec![1.0]);
        store.upsert(&doc).await.unwrap();

        doc.page_content = "Updated".to_string();
        store.upsert(&doc).await.unwrap();

        assert_eq!(store.document_count().await.unwrap(), 1);
        let results = store.search(&[1.0], 1).await.unwrap();
        assert_eq!(results[0].document.page_content, "Updated");
    }

    #[tokio::test]
    async fn test_clear() {
        let store = MemoryVectorStore::new();
        store
            .upsert(&Document::new("Mank", "Hollywood drama", BTreeMap::new(), vec![1.0]))
            .await
            .unwrap();
        assert_eq!(store.clear().await.unwrap(), 1);
        assert_eq!(store.document_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_replace_all() {
        let store = MemoryVectorStore::new();
        store
            .upsert(&Document::new("Mank", "Hollywood drama", BTreeMap::new(), vec![1.0]))
            .await
            .unwrap();

        let removed = store
            .replace_all(&[Document::new("Okja", "A girl and her super-pig", BTreeMap::new(), vec![1.0])])
            .await
            .unwrap();

        assert_eq!(removed, 1);
        let results = store.search(&[1.0], 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.title(), "Okja");
    }
}
