//! Deterministic fakes shared by unit tests.

use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::generation::Generator;
use crate::vector_store::{Document, MemoryVectorStore, VectorStore};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

const VOCABULARY: &[&str] = &[
    "space", "comedy", "crime", "heist", "drama", "animated", "romance", "horror",
];

/// Small catalog used across tests: (title, page content).
pub const CATALOG: &[(&str, &str)] = &[
    ("Space Sweepers", "Space Sweepers: a space adventure about a crew collecting space debris."),
    ("Red Notice", "Red Notice: an action comedy about an art crime and a daring heist."),
    ("Roma", "Roma: a black-and-white drama set in Mexico City."),
    ("Klaus", "Klaus: an animated comedy about a postman and a toymaker."),
    ("Army of Thieves", "Army of Thieves: a heist comedy prequel set in Europe."),
];

/// Embeds text as keyword counts over a fixed vocabulary.
pub struct KeywordEmbedder;

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lower = text.to_lowercase();
        Ok(VOCABULARY
            .iter()
            .map(|word| lower.matches(word).count() as f32)
            .collect())
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    fn dimensions(&self) -> usize {
        VOCABULARY.len()
    }
}

/// Embedder that always fails, standing in for an unreachable API.
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(RagError::Embedding("connection refused".to_string()))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(RagError::Embedding("connection refused".to_string()))
    }

    fn dimensions(&self) -> usize {
        VOCABULARY.len()
    }
}

/// Generator that answers with the prompt it was given.
pub struct EchoGenerator;

#[async_trait]
impl Generator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
    }

    fn model(&self) -> &str {
        "echo"
    }
}

/// Generator that replies with whitespace only.
pub struct BlankGenerator;

#[async_trait]
impl Generator for BlankGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok("  \n".to_string())
    }

    fn model(&self) -> &str {
        "blank"
    }
}

/// Generator that always fails.
pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(RagError::Generation("model unavailable".to_string()))
    }

    fn model(&self) -> &str {
        "failing"
    }
}

/// In-memory store holding [`CATALOG`] embedded with [`KeywordEmbedder`].
pub async fn catalog_store() -> Arc<dyn VectorStore> {
    let store = MemoryVectorStore::new();
    for (title, content) in CATALOG {
        let embedding = KeywordEmbedder.embed(content).await.unwrap();
        store
            .upsert(&Document::new(*title, *content, BTreeMap::new(), embedding))
            .await
            .unwrap();
    }
    Arc::new(store)
}
