//! Pipeline builder.
//!
//! Wires the embedder, vector store, retriever, prompt and generation model
//! into one [`RagPipeline`] at process start. The pipeline is immutable after
//! construction and is shared across requests behind an `Arc`.

use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{RagError, Result};
use crate::generation::{Generator, OpenAIGenerator};
use crate::openai::create_client_with;
use crate::rag::{AnswerChain, AnswerResult, Retriever};
use crate::vector_store::{SearchResult, SqliteVectorStore, VectorStore};
use std::sync::Arc;
use tracing::{info, instrument};

/// Build the configured embedder.
pub fn build_embedder(settings: &Settings) -> Result<Arc<dyn Embedder>> {
    let client = create_client_with(&settings.openai)?;
    Ok(Arc::new(OpenAIEmbedder::new(client, &settings.embedding)))
}

/// Build the configured generation model.
pub fn build_generator(settings: &Settings) -> Result<Arc<dyn Generator>> {
    let client = create_client_with(&settings.openai)?;
    Ok(Arc::new(OpenAIGenerator::new(client, &settings.generation)))
}

/// The assembled question-answering pipeline.
pub struct RagPipeline {
    vector_store: Arc<dyn VectorStore>,
    retriever: Arc<Retriever>,
    chain: AnswerChain,
}

impl RagPipeline {
    /// Build the pipeline from settings, opening the pre-populated index on disk.
    pub fn build(settings: &Settings) -> Result<Self> {
        info!("Initializing RAG pipeline...");

        let embedder = build_embedder(settings)?;
        info!(model = %settings.embedding.model, "Embeddings model loaded");

        let vector_store: Arc<dyn VectorStore> =
            Arc::new(SqliteVectorStore::open_existing(&settings.vector_store_path())?);
        info!(path = ?settings.vector_store_path(), "Vector store connected");

        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let generator = build_generator(settings)?;
        info!(model = %settings.generation.model, "LLM model loaded");

        let pipeline = Self::with_components(
            embedder,
            vector_store,
            generator,
            prompts,
            settings.retrieval.top_k,
        );

        info!("RAG pipeline ready");
        Ok(pipeline)
    }

    /// Assemble a pipeline from existing components.
    pub fn with_components(
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
        generator: Arc<dyn Generator>,
        prompts: Prompts,
        top_k: usize,
    ) -> Self {
        let retriever = Arc::new(Retriever::new(vector_store.clone(), embedder, top_k));
        info!(k = top_k, "Retriever initialized");

        let chain = AnswerChain::new(retriever.clone(), generator, prompts);
        info!("RAG chain created");

        Self {
            vector_store,
            retriever,
            chain,
        }
    }

    /// Get a reference to the vector store.
    pub fn vector_store(&self) -> Arc<dyn VectorStore> {
        self.vector_store.clone()
    }

    /// Get a reference to the retriever.
    pub fn retriever(&self) -> Arc<Retriever> {
        self.retriever.clone()
    }

    /// Get a reference to the answer chain.
    pub fn chain(&self) -> &AnswerChain {
        &self.chain
    }

    /// Answer a question and report the titles of the documents used.
    ///
    /// Documents are retrieved once and the same set grounds the answer and
    /// populates `sources`.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn ask(&self, question: &str) -> Result<AnswerResult> {
        let question = question.trim();
        if question.is_empty() {
            return Err(RagError::InvalidInput("question must not be empty".to_string()));
        }

        let docs = self.retriever.retrieve(question).await?;
        let answer = self.chain.invoke_with_documents(question, &docs).await?;

        Ok(AnswerResult {
            answer,
            sources: docs.iter().map(|d| d.title().to_string()).collect(),
        })
    }

    /// Retrieve the top documents with scores, without generating an answer.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.retriever.retrieve_scored(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{catalog_store, EchoGenerator, FailingEmbedder, FailingGenerator, KeywordEmbedder};

    async fn pipeline(generator: Arc<dyn Generator>) -> RagPipeline {
        RagPipeline::with_components(
            Arc::new(KeywordEmbedder),
            catalog_store().await,
            generator,
            Prompts::default(),
            3,
        )
    }

    #[tokio::test]
    async fn test_ask_returns_answer_and_sources() {
        let pipeline = pipeline(Arc::new(EchoGenerator)).await;
        let result = pipeline.ask("Any good space movies?").await.unwrap();

        assert_eq!(result.sources.first().map(String::as_str), Some("Space Sweepers"));
        assert!(result.sources.len() <= 3);
        assert!(!result.answer.is_empty());
    }

    #[tokio::test]
    async fn test_sources_match_context() {
        let pipeline = pipeline(Arc::new(EchoGenerator)).await;
        let result = pipeline.ask("a heist comedy").await.unwrap();

        // EchoGenerator returns the prompt, so every source must appear in it.
        for title in &result.sources {
            assert!(result.answer.contains(title.as_str()), "missing {}", title);
        }
    }

    #[tokio::test]
    async fn test_repeated_question_same_sources() {
        let pipeline = pipeline(Arc::new(EchoGenerator)).await;
        let first = pipeline.ask("crime heist").await.unwrap();
        let second = pipeline.ask("crime heist").await.unwrap();
        assert_eq!(first.sources, second.sources);
    }

    #[tokio::test]
    async fn test_blank_question_rejected() {
        let pipeline = pipeline(Arc::new(EchoGenerator)).await;
        let err = pipeline.ask("   ").await.unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_backend_failures_propagate() {
        let pipeline = pipeline(Arc::new(FailingGenerator)).await;
        assert!(matches!(pipeline.ask("space").await, Err(RagError::Generation(_))));

        let pipeline = RagPipeline::with_components(
            Arc::new(FailingEmbedder),
            catalog_store().await,
            Arc::new(EchoGenerator),
            Prompts::default(),
            3,
        );
        assert!(matches!(pipeline.ask("space").await, Err(RagError::Embedding(_))));
    }

    #[test]
    fn test_build_requires_index() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.vector_store.path = Some(dir.path().join("missing.db").display().to_string());

        assert!(matches!(RagPipeline::build(&settings), Err(RagError::VectorStore(_))));
    }
}
