//! CLI module.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Netflix RAG - question answering over a Netflix movie catalog
///
/// Retrieves the catalog entries most similar to a question and grounds a
/// language model's answer in them.
#[derive(Parser, Debug)]
#[command(name = "netflix-rag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "NETFLIX_RAG_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server and web client
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask a question about the catalog
    Ask {
        /// The question to ask
        question: String,
    },

    /// Show the catalog entries most similar to a query
    Search {
        /// Search query
        query: String,

        /// Maximum number of results (defaults to retrieval.top_k)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Build the vector index from a JSON catalog export
    Index {
        /// Path to a JSON array of catalog entries
        catalog: String,

        /// Remove existing documents before indexing
        #[arg(long)]
        replace: bool,
    },

    /// Check configuration, API access and the vector index
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["netflix-rag", "-vv", "serve", "--port", "8080"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host, None);
                assert_eq!(port, Some(8080));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_index() {
        let cli = Cli::try_parse_from(["netflix-rag", "index", "titles.json", "--replace"]).unwrap();
        assert!(matches!(cli.command, Commands::Index { replace: true, .. }));
    }
}
