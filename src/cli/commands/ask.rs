//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::RagPipeline;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(question: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'netflix-rag doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let pipeline = RagPipeline::build(&settings)?;

    let spinner = Output::spinner("Searching the catalog...");

    match pipeline.ask(question).await {
        Ok(result) => {
            spinner.finish_and_clear();

            println!("\n{}\n", result.answer);

            if !result.sources.is_empty() {
                Output::header("Sources");
                for title in &result.sources {
                    Output::list_item(title);
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
