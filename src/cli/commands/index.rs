//! Index command implementation.

use crate::catalog::{index_catalog, load_catalog};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::build_embedder;
use crate::vector_store::SqliteVectorStore;
use anyhow::Result;
use std::path::Path;

/// Run the index command.
pub async fn run_index(catalog: &str, replace: bool, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Index, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let entries = load_catalog(Path::new(catalog))?;
    Output::info(&format!("Loaded {} catalog entries from {}", entries.len(), catalog));

    let store_path = settings.vector_store_path();
    let vector_store = SqliteVectorStore::create(&store_path)?;
    let embedder = build_embedder(&settings)?;

    let spinner = Output::spinner("Generating embeddings and indexing...");
    let result = index_catalog(&entries, embedder.as_ref(), &vector_store, replace).await;
    spinner.finish_and_clear();

    match result {
        Ok(result) => {
            if result.documents_removed > 0 {
                Output::info(&format!("Removed {} existing documents", result.documents_removed));
            }
            Output::success(&format!(
                "Indexed {} documents into {}",
                result.documents_indexed,
                store_path.display()
            ));
        }
        Err(e) => {
            Output::error(&format!("Indexing failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
