//! Doctor command - verify configuration, API access and the vector index.

use crate::cli::Output;
use crate::config::Settings;
use crate::vector_store::{SqliteVectorStore, VectorStore};
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

fn print_section(title: &str, checks: &[CheckResult]) {
    println!("{}", style(title).bold());
    for check in checks {
        check.print();
    }
    println!();
}

/// Run all diagnostic checks.
pub async fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Netflix RAG Doctor");
    println!();
    println!("Checking configuration and vector index...\n");

    let mut checks = Vec::new();

    let api_checks = vec![check_api_access(settings)];
    print_section("API Configuration", &api_checks);
    checks.extend(api_checks);

    let config_checks = vec![check_config_file(), check_settings(settings)];
    print_section("Configuration", &config_checks);
    checks.extend(config_checks);

    let index_checks = check_vector_index(settings).await;
    print_section("Vector Index", &index_checks);
    checks.extend(index_checks);

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before serving questions.",
            errors
        ));
        anyhow::bail!("{} doctor check(s) failed", errors);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Ready to answer questions.");
    }

    Ok(())
}

/// Check that the model API is reachable in principle: a key, or a custom base URL.
fn check_api_access(settings: &Settings) -> CheckResult {
    if let Some(base_url) = settings.openai.base_url.as_deref().filter(|u| !u.is_empty()) {
        return CheckResult::ok("API base URL", &format!("{} (custom)", base_url));
    }

    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if key.starts_with("sk-") && key.chars().count() > 20 => {
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", mask_key(&key)))
        }
        Ok(key) if key.is_empty() => CheckResult::error(
            "OPENAI_API_KEY",
            "empty",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Ok(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        Err(_) => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...' or configure openai.base_url",
        ),
    }
}

/// Keep the first 7 and last 4 characters of a key.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 11 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            &format!("Create {} to override defaults", config_path.display()),
        )
    }
}

/// Check that the loaded settings are usable.
fn check_settings(settings: &Settings) -> CheckResult {
    match settings.validate() {
        Ok(()) => CheckResult::ok(
            "Settings",
            &format!(
                "top_k={}, embedding={}, generation={}",
                settings.retrieval.top_k, settings.embedding.model, settings.generation.model
            ),
        ),
        Err(e) => CheckResult::error("Settings", &e.to_string(), "Fix the value in your config file"),
    }
}

/// Check the on-disk vector index.
async fn check_vector_index(settings: &Settings) -> Vec<CheckResult> {
    let path = settings.vector_store_path();

    if !path.exists() {
        return vec![CheckResult::error(
            "Index file",
            &format!("{} (not found)", path.display()),
            "Build it with: netflix-rag index <catalog.json>",
        )];
    }

    let size = std::fs::metadata(&path)
        .map(|m| format_size(m.len()))
        .unwrap_or_else(|_| "unknown size".to_string());
    let mut results = vec![CheckResult::ok(
        "Index file",
        &format!("{} ({})", path.display(), size),
    )];

    let count = match SqliteVectorStore::open_existing(&path) {
        Ok(store) => store.document_count().await,
        Err(e) => Err(e),
    };

    results.push(match count {
        Ok(0) => CheckResult::warning(
            "Documents",
            "index is empty",
            "Populate it with: netflix-rag index <catalog.json>",
        ),
        Ok(n) => CheckResult::ok("Documents", &format!("{} indexed", n)),
        Err(e) => CheckResult::error("Documents", &e.to_string(), "The index file may be corrupt"),
    });

    results
}

/// Format file size in human-readable format.
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("sk-proj-abcdefghijklmnop1234"), "sk-proj...1234");
        assert_eq!(mask_key("sk-é€abcdefghijklmnop€ü12"), "sk-é€ab...€ü12");
        assert_eq!(mask_key("short"), "*****");
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
    }

    #[test]
    fn test_custom_base_url_skips_key_check() {
        let mut settings = Settings::default();
        settings.openai.base_url = Some("http://localhost:8000/v1".to_string());
        assert_eq!(check_api_access(&settings).status, CheckStatus::Ok);
    }

    #[tokio::test]
    async fn test_missing_index_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.vector_store.path = Some(dir.path().join("catalog.db").display().to_string());

        let checks = check_vector_index(&settings).await;
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].status, CheckStatus::Error);
    }

    #[tokio::test]
    async fn test_empty_index_is_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        SqliteVectorStore::create(&path).unwrap();

        let mut settings = Settings::default();
        settings.vector_store.path = Some(path.display().to_string());

        let checks = check_vector_index(&settings).await;
        assert_eq!(checks[1].status, CheckStatus::Warning);
    }
}
