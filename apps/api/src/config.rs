use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// The LLM credential is optional at startup; calls fail with a configuration
/// error until it is provided, and `/api/health` reports it as not configured.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub app_env: String,
    pub port: u16,
    /// Maximum accepted upload size in bytes.
    pub max_file_size: usize,
    /// Lowercase extensions without the leading dot.
    pub allowed_extensions: Vec<String>,
    /// `*` or a comma-separated list of origins.
    pub cors_origins: String,
    pub pipeline_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; `from_env` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let or_default =
            |key: &str, default: &str| optional(key).unwrap_or_else(|| default.to_string());

        let anthropic_api_key =
            optional("ANTHROPIC_API_KEY").or_else(|| optional("CLAUDE_API_KEY"));

        Ok(Config {
            anthropic_api_key,
            app_env: or_default("APP_ENV", "production"),
            port: or_default("PORT", "5000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            max_file_size: or_default("MAX_FILE_SIZE", "5242880")
                .parse::<usize>()
                .context("MAX_FILE_SIZE must be a byte count")?,
            allowed_extensions: parse_extensions(&or_default(
                "ALLOWED_EXTENSIONS",
                "pdf,docx,txt",
            )),
            cors_origins: or_default("CORS_ORIGINS", "*"),
            pipeline_timeout_secs: or_default("PIPELINE_TIMEOUT_SECS", "300")
                .parse::<u64>()
                .context("PIPELINE_TIMEOUT_SECS must be a whole number of seconds")?,
            rust_log: or_default("RUST_LOG", "info"),
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }
}

fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

#[cfg(test)]
impl Config {
    /// Configuration used by route tests: no credential, default limits.
    pub fn for_tests() -> Self {
        Config {
            anthropic_api_key: None,
            app_env: "test".to_string(),
            port: 0,
            max_file_size: 5 * 1024 * 1024,
            allowed_extensions: parse_extensions("pdf,docx,txt"),
            cors_origins: "*".to_string(),
            pipeline_timeout_secs: 300,
            rust_log: "info".to_string(),
        }
    }
}
