//! Search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::build_embedder;
use crate::rag::Retriever;
use crate::vector_store::{SqliteVectorStore, VectorStore};
use anyhow::Result;
use std::sync::Arc;

/// Run the search command.
pub async fn run_search(query: &str, limit: Option<usize>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Search, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let vector_store: Arc<dyn VectorStore> =
        Arc::new(SqliteVectorStore::open_existing(&settings.vector_store_path())?);
    let embedder = build_embedder(&settings)?;

    let limit = limit.unwrap_or(settings.retrieval.top_k).max(1);
    let retriever = Retriever::new(vector_store, embedder, limit);

    let spinner = Output::spinner("Searching...");
    let results = retriever.retrieve_scored(query).await;
    spinner.finish_and_clear();

    match results {
        Ok(results) => {
            if results.is_empty() {
                Output::warning("The catalog index is empty.");
            } else {
                Output::success(&format!("Found {} results", results.len()));

                for (i, result) in results.iter().enumerate() {
                    Output::search_result(
                        i + 1,
                        result.document.title(),
                        result.score,
                        &result.document.page_content,
                    );
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
