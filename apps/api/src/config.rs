use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default so the service boots with no env at all.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub llm_provider: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub llm_timeout_secs: u64,
    pub analysis_store_path: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm_provider: std::env::var("LLM_PROVIDER")
                .unwrap_or_else(|_| "local".to_string())
                .trim()
                .to_lowercase(),
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .unwrap_or_default()
                .trim()
                .to_string(),
            openai_model: env_or("OPENAI_MODEL", "gpt-4o-mini"),
            llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a number of seconds")?
                .max(5),
            analysis_store_path: env_or("ANALYSIS_STORE_PATH", "data/resume-analysis-store.json"),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (10 * 1024 * 1024).to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
        })
    }

    /// True when the OpenAI enhancement pass should run.
    pub fn use_openai(&self) -> bool {
        self.llm_provider == "openai" && api_key_is_usable(&self.openai_api_key)
    }

    pub fn llm_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.llm_timeout_secs)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

const PLACEHOLDER_KEY_MARKERS: &[&str] =
    &["your_", "change-me", "placeholder", "dummy", "example"];

/// Keys copied straight out of a sample .env must not switch the provider on.
fn api_key_is_usable(key: &str) -> bool {
    if key.is_empty() {
        return false;
    }
    let lowered = key.to_lowercase();
    !PLACEHOLDER_KEY_MARKERS.iter().any(|m| lowered.contains(m))
}
