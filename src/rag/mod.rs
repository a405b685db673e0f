//! RAG (Retrieval-Augmented Generation) for catalog question answering.
//!
//! A question flows through the [`Retriever`] (top-K similar documents) and
//! the [`AnswerChain`] (context formatting, prompt rendering, generation).

mod chain;
mod retriever;

pub use chain::{format_documents, AnswerChain};
pub use retriever::Retriever;

use serde::{Deserialize, Serialize};

/// Default number of documents retrieved per question.
pub const DEFAULT_TOP_K: usize = 3;

/// Answer to a single question, with the titles of the documents it was grounded on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    /// The generated answer.
    pub answer: String,
    /// Titles of the retrieved documents, best match first.
    pub sources: Vec<String>,
}
