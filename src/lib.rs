//! Netflix RAG - question answering over a Netflix movie catalog
//!
//! A small HTTP service that answers natural-language questions about a fixed
//! movie catalog with retrieval-augmented generation.
//!
//! # Overview
//!
//! For each question the service:
//! - embeds the question and retrieves the three most similar catalog entries
//! - joins their text into a context block and renders it into a prompt
//! - asks a text-generation model for an answer grounded in that context
//! - returns the answer together with the titles of the retrieved entries
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector index abstraction (SQLite on disk, in-memory)
//! - `generation` - Text generation models
//! - `rag` - Retriever and answer chain
//! - `catalog` - Loading and indexing the catalog export
//! - `pipeline` - One-time wiring of all of the above
//! - `cli` - Command line interface and HTTP server
//!
//! # Example
//!
//! ```rust,no_run
//! use netflix_rag::config::Settings;
//! use netflix_rag::pipeline::RagPipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = RagPipeline::build(&settings)?;
//!
//!     let result = pipeline.ask("What heist comedies are on Netflix?").await?;
//!     println!("{}", result.answer);
//!     println!("Sources: {}", result.sources.join(", "));
//!
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod openai;
pub mod pipeline;
pub mod rag;
pub mod vector_store;

#[cfg(test)]
mod testing;

pub use error::{RagError, Result};
