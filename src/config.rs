use std::fmt;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    /// Partner endpoint that receives sanitized leads.
    pub partner_api_url: String,
    /// Static bearer token for the partner endpoint.
    pub partner_api_token: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("partner_api_url", &self.partner_api_url)
            .field("partner_api_token", &"<redacted>")
            .finish()
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: parse_port(std::env::var("PORT").ok())?,
            partner_api_url: std::env::var("PARTNER_API_URL")
                .map_err(|_| anyhow::anyhow!("PARTNER_API_URL environment variable required"))
                .and_then(|url| validate_partner_url(&url))?,
            partner_api_token: std::env::var("PARTNER_API_TOKEN")
                .map_err(|_| anyhow::anyhow!("PARTNER_API_TOKEN environment variable required"))
                .and_then(|token| {
                    if token.trim().is_empty() {
                        anyhow::bail!("PARTNER_API_TOKEN cannot be empty");
                    }
                    Ok(token)
                })?,
        };

        // Log successful configuration load (without the token)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Partner API URL: {}", config.partner_api_url);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

fn parse_port(raw: Option<String>) -> anyhow::Result<u16> {
    raw.unwrap_or_else(|| "3000".to_string())
        .parse()
        .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))
}

fn validate_partner_url(raw: &str) -> anyhow::Result<String> {
    if raw.trim().is_empty() {
        anyhow::bail!("PARTNER_API_URL cannot be empty");
    }

    let parsed = url::Url::parse(raw)
        .map_err(|e| anyhow::anyhow!("PARTNER_API_URL is not a valid URL: {}", e))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("PARTNER_API_URL must start with http:// or https://");
    }

    Ok(raw.to_string())
}
