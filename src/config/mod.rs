//! Configuration module.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, RagPrompts};
pub use settings::{
    EmbeddingSettings, GeneralSettings, GenerationSettings, OpenAISettings, PromptSettings,
    RetrievalSettings, ServerSettings, Settings, VectorStoreSettings,
};
