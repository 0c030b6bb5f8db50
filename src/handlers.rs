use crate::config::Config;
use crate::errors::AppError;
use crate::lead_models::Lead;
use crate::lead_pipeline::{self, LeadOutcome};
use crate::partner_client::PartnerClient;
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Client for the downstream partner API.
    pub partner: PartnerClient,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let partner = PartnerClient::from_config(config)?;
        Ok(Self { partner })
    }
}

/// Health check endpoint.
///
/// Returns the service status and version.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /receive-lead
///
/// Validates a lead, forwards it to the partner if it passes the region and
/// ownership filters, and relays the partner's answer.
///
/// Schema failures are answered with the extractor's 4xx status and an
/// `{"error": ...}` body. Every business outcome is a JSON object with a
/// `status` of `skipped`, `success` or `error`.
pub async fn receive_lead(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Lead>, JsonRejection>,
) -> Result<(StatusCode, Json<LeadOutcome>), AppError> {
    let Json(lead) = payload?;

    tracing::info!(
        "Received lead: postcode={}, product={}",
        lead.postcode,
        lead.product_name
    );

    let outcome = lead_pipeline::process_lead(lead, &state.partner).await?;

    Ok((outcome.http_status(), Json(outcome)))
}
