use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable required"))
                .and_then(|key| {
                    if key.trim().is_empty() {
                        anyhow::bail!("OPENAI_API_KEY cannot be empty");
                    }
                    Ok(key)
                })?,
            openai_base_url: parse_base_url(
                &std::env::var("OPENAI_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            )?,
            openai_model: std::env::var("OPENAI_MODEL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
        };

        // Log successful configuration load (without the API key)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Completion API: {}", config.openai_base_url);
        tracing::debug!("Model: {}", config.openai_model);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

/// Validates an API root URL and strips any trailing slash.
pub fn parse_base_url(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        anyhow::bail!("OPENAI_BASE_URL cannot be empty");
    }

    let url = url::Url::parse(raw)
        .map_err(|e| anyhow::anyhow!("OPENAI_BASE_URL is not a valid URL: {}", e))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("OPENAI_BASE_URL must start with http:// or https://");
    }

    Ok(raw.trim_end_matches('/').to_string())
}
