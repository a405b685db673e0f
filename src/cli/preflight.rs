//! Pre-flight checks before commands that call the model API.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail on the first request.

use crate::config::Settings;
use crate::error::{RagError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Serving requires API access and an existing index.
    Serve,
    /// Asking questions requires API access and an existing index.
    Ask,
    /// Search requires embeddings and an existing index.
    Search,
    /// Indexing requires embeddings only.
    Index,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    check_api_key(settings)?;
    match operation {
        Operation::Serve | Operation::Ask | Operation::Search => check_index(settings)?,
        Operation::Index => {}
    }
    Ok(())
}

/// Check if an OpenAI API key is configured.
///
/// A custom `openai.base_url` usually points at a local server that needs no key.
fn check_api_key(settings: &Settings) -> Result<()> {
    if settings.openai.base_url.as_deref().is_some_and(|u| !u.is_empty()) {
        return Ok(());
    }
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(RagError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(RagError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check that the vector index file exists.
fn check_index(settings: &Settings) -> Result<()> {
    let path = settings.vector_store_path();
    if path.exists() {
        Ok(())
    } else {
        Err(RagError::Config(format!(
            "No vector index at {}. Run 'netflix-rag index <catalog.json>' first.",
            path.display()
        )))
    }
}
