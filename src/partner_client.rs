use crate::config::Config;
use crate::errors::AppError;
use crate::lead_pipeline::PartnerPayload;

/// Status code the partner answers with when it accepts a lead.
pub const PARTNER_ACCEPTED: u16 = 201;

/// Client for the downstream partner lead endpoint.
///
/// Holds a single pooled `reqwest::Client`; cloning is cheap and shares the
/// pool.
#[derive(Clone)]
pub struct PartnerClient {
    client: reqwest::Client,
    url: String,
    token: String,
}

/// Raw partner answer. Interpretation is left to the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PartnerReply {
    pub status: u16,
    pub body: String,
}

impl PartnerReply {
    pub fn is_accepted(&self) -> bool {
        self.status == PARTNER_ACCEPTED
    }
}

impl PartnerClient {
    /// Creates a new `PartnerClient`.
    ///
    /// No request timeout is set; the client's defaults apply.
    pub fn new(url: String, token: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create partner client: {}", e))
            })?;

        Ok(Self { client, url, token })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.partner_api_url.clone(),
            config.partner_api_token.clone(),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Posts a lead to the partner, exactly once.
    ///
    /// Any HTTP status is a reply, including 4xx/5xx. Only transport
    /// failures (connect, TLS, reading the body) are returned as
    /// `AppError::ExternalApiError`.
    pub async fn submit_lead(&self, payload: &PartnerPayload) -> Result<PartnerReply, AppError> {
        tracing::info!("Forwarding lead to partner: {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(payload)
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Partner request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to read partner response: {}", e))
        })?;

        tracing::info!("Partner answered with status {}", status);
        Ok(PartnerReply { status, body })
    }
}
