//! Answer chain: context formatting, prompt rendering and generation.

use super::Retriever;
use crate::config::Prompts;
use crate::error::{RagError, Result};
use crate::generation::Generator;
use crate::vector_store::Document;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Join document contents into a single context block.
pub fn format_documents(docs: &[Document], separator: &str) -> String {
    docs.iter()
        .map(|doc| doc.page_content.as_str())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Question in, answer out: retrieve, format, render, generate.
pub struct AnswerChain {
    retriever: Arc<Retriever>,
    generator: Arc<dyn Generator>,
    prompts: Prompts,
}

impl AnswerChain {
    /// Bind a retriever, a prompt set and a generation model into a chain.
    pub fn new(retriever: Arc<Retriever>, generator: Arc<dyn Generator>, prompts: Prompts) -> Self {
        Self {
            retriever,
            generator,
            prompts,
        }
    }

    /// Answer a question, retrieving context on the way.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn invoke(&self, question: &str) -> Result<String> {
        let docs = self.retriever.retrieve(question).await?;
        self.invoke_with_documents(question, &docs).await
    }

    /// Answer a question from already retrieved documents.
    pub async fn invoke_with_documents(&self, question: &str, docs: &[Document]) -> Result<String> {
        let prompt = self.render_prompt(question, docs);
        debug!("Rendered prompt with {} context documents", docs.len());

        let answer = self.generator.generate(&prompt).await?.trim().to_string();
        if answer.is_empty() {
            return Err(RagError::Generation(format!(
                "Model {} returned an empty answer",
                self.generator.model()
            )));
        }

        info!(model = self.generator.model(), "Generated answer");
        Ok(answer)
    }

    /// Render the prompt for a question and its context documents.
    pub fn render_prompt(&self, question: &str, docs: &[Document]) -> String {
        let mut vars = HashMap::new();
        vars.insert(
            "context".to_string(),
            format_documents(docs, &self.prompts.rag.separator),
        );
        vars.insert("question".to_string(), question.to_string());

        self.prompts.render_with_custom(&self.prompts.rag.template, &vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{catalog_store, BlankGenerator, EchoGenerator, FailingGenerator, KeywordEmbedder};
    use std::collections::BTreeMap;

    async fn chain_with(generator: Arc<dyn Generator>) -> AnswerChain {
        let retriever = Arc::new(Retriever::new(catalog_store().await, Arc::new(KeywordEmbedder), 3));
        AnswerChain::new(retriever, generator, Prompts::default())
    }

    #[test]
    fn test_format_documents_separator() {
        let docs = vec![
            Document::new("A", "first", BTreeMap::new(), vec![]),
            Document::new("B", "second", BTreeMap::new(), vec![]),
        ];
        assert_eq!(format_documents(&docs, "\n\n---\n\n"), "first\n\n---\n\nsecond");
        assert_eq!(format_documents(&[], "\n\n---\n\n"), "");
    }

    #[tokio::test]
    async fn test_prompt_contains_context_and_question() {
        let chain = chain_with(Arc::new(EchoGenerator)).await;
        let docs = vec![
            Document::new("Roma", "Roma: drama in Mexico City", BTreeMap::new(), vec![]),
            Document::new("Klaus", "Klaus: animated holiday film", BTreeMap::new(), vec![]),
        ];

        let prompt = chain.render_prompt("Which film is animated?", &docs);
        assert!(prompt.starts_with("You are a Netflix movie expert."));
        assert!(prompt.contains("Roma: drama in Mexico City\n\n---\n\nKlaus: animated holiday film"));
        assert!(prompt.contains("Question: Which film is animated?"));
        assert!(prompt.trim_end().ends_with("Answer:"));
    }

    #[tokio::test]
    async fn test_invoke_returns_generated_text() {
        let chain = chain_with(Arc::new(EchoGenerator)).await;
        let answer = chain.invoke("space adventure").await.unwrap();
        assert!(answer.contains("Question: space adventure"));
        assert!(answer.contains("Space Sweepers"));
    }

    #[tokio::test]
    async fn test_generator_failure_propagates() {
        let chain = chain_with(Arc::new(FailingGenerator)).await;
        assert!(chain.invoke("space").await.is_err());
    }

    #[tokio::test]
    async fn test_blank_answer_is_generation_error() {
        let chain = chain_with(Arc::new(BlankGenerator)).await;
        let result = chain.invoke("space").await;
        assert!(matches!(result, Err(RagError::Generation(_))));
    }
}
