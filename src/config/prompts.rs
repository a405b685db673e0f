//! Prompt templates for the answer chain.
//!
//! The template can be customized by placing a `rag.toml` file in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub rag: RagPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompt and context formatting for RAG answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    /// Template with `{{context}}` and `{{question}}` placeholders.
    pub template: String,
    /// Separator placed between retrieved documents in `{{context}}`.
    pub separator: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            template: r#"You are a Netflix movie expert. Answer ONLY questions about Netflix movies based on the context below.
If the question is not about Netflix movies, say you can only help with Netflix movie questions.
Be direct and concise.

Context: 
{{context}}

Question: {{question}}

Answer:
"#
            .to_string(),
            separator: "\n\n---\n\n".to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let rag_path = custom_path.join("rag.toml");
            if rag_path.exists() {
                let content = std::fs::read_to_string(&rag_path)?;
                prompts.rag = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Values are substituted in a single left-to-right pass, so placeholder
    /// text inside a substituted value (a question containing `{{context}}`)
    /// is left alone.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => {
                    let key = &after[..end];
                    match vars.get(key) {
                        Some(value) => result.push_str(value),
                        None => {
                            result.push_str("{{");
                            result.push_str(key);
                            result.push_str("}}");
                        }
                    }
                    rest = &after[end + 2..];
                }
                None => {
                    result.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        result.push_str(rest);
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.rag.template.contains("{{context}}"));
        assert!(prompts.rag.template.contains("{{question}}"));
        assert_eq!(prompts.rag.separator, "\n\n---\n\n");
    }

    #[test]
    fn test_default_template_layout() {
        let template = Prompts::default().rag.template;
        assert!(template.ends_with(
            "Be direct and concise.\n\nContext: \n{{context}}\n\nQuestion: {{question}}\n\nAnswer:\n"
        ));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_render_does_not_expand_placeholders_in_values() {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "what is {{context}}?".to_string());
        vars.insert("context".to_string(), "SECRET".to_string());

        let result = Prompts::render("Q: {{question}}", &vars);
        assert_eq!(result, "Q: what is {{context}}?");
    }

    #[test]
    fn test_render_keeps_unknown_placeholders() {
        let result = Prompts::render("{{missing}} and {{", &HashMap::new());
        assert_eq!(result, "{{missing}} and {{");
    }

    #[test]
    fn test_custom_variables_are_overridden_by_call_variables() {
        let mut custom = HashMap::new();
        custom.insert("persona".to_string(), "critic".to_string());
        custom.insert("question".to_string(), "ignored".to_string());
        let prompts = Prompts::load(None, Some(&custom)).unwrap();

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "Best thriller?".to_string());

        let result = prompts.render_with_custom("{{persona}}: {{question}}", &vars);
        assert_eq!(result, "critic: Best thriller?");
    }

    #[test]
    fn test_load_custom_rag_prompt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("rag.toml"),
            "template = \"Q={{question}} C={{context}}\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.rag.template, "Q={{question}} C={{context}}");
        assert_eq!(prompts.rag.separator, "\n\n---\n\n");
    }
}
