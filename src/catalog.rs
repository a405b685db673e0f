//! Catalog loading and indexing.
//!
//! Turns a JSON export of the Netflix catalog into embedded documents in the
//! vector store. Each title becomes exactly one document.

use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::vector_store::{Document, VectorStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, instrument};

/// One row of the catalog export.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogEntry {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub cast: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub release_year: Option<u32>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub listed_in: Option<String>,
}

impl CatalogEntry {
    /// Optional fields as (label, metadata key, value), in display order.
    fn fields(&self) -> Vec<(&'static str, &'static str, String)> {
        let mut fields = Vec::new();
        let mut push = |label, key, value: Option<String>| {
            if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
                fields.push((label, key, v.trim().to_string()));
            }
        };

        push("Type", "type", self.kind.clone());
        push("Genres", "listed_in", self.listed_in.clone());
        push("Director", "director", self.director.clone());
        push("Cast", "cast", self.cast.clone());
        push("Country", "country", self.country.clone());
        push("Release year", "release_year", self.release_year.map(|y| y.to_string()));
        push("Rating", "rating", self.rating.clone());
        push("Duration", "duration", self.duration.clone());
        fields
    }

    /// Text that gets embedded and shown to the model.
    pub fn page_content(&self) -> String {
        let mut lines = vec![format!("Title: {}", self.title.trim())];
        for (label, _, value) in self.fields() {
            lines.push(format!("{}: {}", label, value));
        }
        if !self.description.trim().is_empty() {
            lines.push(format!("Description: {}", self.description.trim()));
        }
        lines.join("\n")
    }

    /// Metadata carried alongside the document. `title` is added by [`Document::new`].
    pub fn metadata(&self) -> BTreeMap<String, String> {
        self.fields()
            .into_iter()
            .map(|(_, key, value)| (key.to_string(), value))
            .collect()
    }
}

/// Read a catalog export: a JSON array of entries.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogEntry>> {
    let content = std::fs::read_to_string(path)?;
    let entries: Vec<CatalogEntry> = serde_json::from_str(&content)?;

    if let Some(pos) = entries.iter().position(|e| e.title.trim().is_empty()) {
        return Err(RagError::InvalidInput(format!(
            "Catalog entry {} has an empty title",
            pos
        )));
    }

    Ok(entries)
}

/// Result of indexing a catalog.
#[derive(Debug)]
pub struct IndexResult {
    /// Number of documents written.
    pub documents_indexed: usize,
    /// Number of documents removed beforehand.
    pub documents_removed: usize,
}

/// Embed catalog entries and write them to the store.
///
/// With `replace`, the index ends up matching the file exactly. Embedding
/// failures leave the existing index untouched.
#[instrument(skip_all, fields(entries = entries.len(), replace = replace))]
pub async fn index_catalog(
    entries: &[CatalogEntry],
    embedder: &dyn Embedder,
    vector_store: &dyn VectorStore,
    replace: bool,
) -> Result<IndexResult> {
    let documents = if entries.is_empty() {
        Vec::new()
    } else {
        let texts: Vec<String> = entries.iter().map(CatalogEntry::page_content).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        if embeddings.len() != entries.len() {
            return Err(RagError::Embedding(format!(
                "Expected {} embeddings, got {}",
                entries.len(),
                embeddings.len()
            )));
        }

        entries
            .iter()
            .zip(texts)
            .zip(embeddings)
            .map(|((entry, text), embedding)| {
                Document::new(entry.title.trim(), text, entry.metadata(), embedding)
            })
            .collect::<Vec<Document>>()
    };

    // The store is only touched once every embedding is in hand.
    let (documents_indexed, documents_removed) = if replace {
        let removed = vector_store.replace_all(&documents).await?;
        (documents.len(), removed)
    } else if documents.is_empty() {
        (0, 0)
    } else {
        (vector_store.upsert_batch(&documents).await?, 0)
    };
    info!("Indexed {} catalog documents", documents_indexed);

    Ok(IndexResult {
        documents_indexed,
        documents_removed,
    })
}
