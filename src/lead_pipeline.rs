//! Lead intake pipeline.
//!
//! Runs in strict order: region filter, ownership filter, offer-type
//! sanitization, numeric coercion, payload assembly, one partner call and
//! response mapping. The filters short-circuit with [`LeadOutcome::Skipped`]
//! before anything is sent.

use axum::http::StatusCode;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::lead_models::{Lead, LeadAttributes, NumericValue, SolarOwner};
use crate::partner_client::{PartnerClient, PartnerReply};

/// Only postcodes in this region are forwarded.
pub const REGION_PREFIX: &str = "66";

/// Offer types the partner understands. Anything else is dropped.
pub const VALID_OFFER_TYPES: [&str; 3] = ["Beides interessant", "Mieten", "Kaufen"];

pub const UNREACHABLE_REASON: &str = "partner unreachable";

/// Why a lead was not forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    OutsideRegion,
    NotHomeowner,
}

impl SkipReason {
    /// Stable code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            SkipReason::OutsideRegion => "outside_region",
            SkipReason::NotHomeowner => "not_homeowner",
        }
    }

    /// Text sent back to the caller.
    pub fn message(&self) -> &'static str {
        match self {
            SkipReason::OutsideRegion => "postcode not in region 66",
            SkipReason::NotHomeowner => "not a homeowner",
        }
    }
}

impl Serialize for SkipReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

/// Result of one `POST /receive-lead`, serialized with a `status` tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LeadOutcome {
    Skipped { reason: SkipReason },
    Success { client_response: Value },
    Error(PartnerFailure),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PartnerFailure {
    /// Partner answered with anything but 201. Status and body are relayed verbatim.
    Rejected {
        client_status: u16,
        client_response: String,
    },
    /// Partner could not be reached at all.
    Unreachable {
        reason: &'static str,
        detail: String,
    },
}

impl LeadOutcome {
    pub fn http_status(&self) -> StatusCode {
        match self {
            LeadOutcome::Error(PartnerFailure::Unreachable { .. }) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::OK,
        }
    }
}

/// Body posted to the partner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerPayload {
    pub lead: LeadContact,
    pub product: Product,
    pub lead_attributes: Map<String, Value>,
    pub meta_attributes: Map<String, Value>,
}

/// Contact block. Absent values are sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadContact {
    pub phone: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub street: Option<String>,
    pub housenumber: Option<String>,
    pub postcode: String,
    pub city: Option<String>,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub name: String,
}

/// Region and ownership filters.
pub fn screen(lead: &Lead) -> Result<(), SkipReason> {
    if !lead.postcode.starts_with(REGION_PREFIX) {
        return Err(SkipReason::OutsideRegion);
    }

    if lead.lead_attributes.solar_owner != SolarOwner::Yes {
        return Err(SkipReason::NotHomeowner);
    }

    Ok(())
}

pub fn sanitize_offer_type(attributes: &mut LeadAttributes) {
    if let Some(offer) = attributes.solar_offer_type.take() {
        if VALID_OFFER_TYPES.contains(&offer.as_str()) {
            attributes.solar_offer_type = Some(offer);
        } else {
            tracing::debug!("Dropping unknown solar_offer_type '{}'", offer);
        }
    }
}

/// Replaces every numeric attribute with its float value, or with nothing
/// if it does not parse. Never fails.
pub fn coerce_numeric_fields(attributes: &mut LeadAttributes) {
    for (name, slot) in attributes.numeric_fields_mut() {
        let Some(raw) = slot.take() else {
            continue;
        };

        match raw.to_finite() {
            Some(value) => *slot = Some(NumericValue::Number(value)),
            None => tracing::debug!("Dropping non-numeric {}: {:?}", name, raw),
        }
    }
}

pub fn normalize(attributes: &mut LeadAttributes) {
    sanitize_offer_type(attributes);
    coerce_numeric_fields(attributes);
}

/// Serializes `value` to a JSON object and drops every `null` entry.
pub fn without_nulls<T: Serialize>(value: &T) -> Result<Map<String, Value>, AppError> {
    match serde_json::to_value(value)? {
        Value::Object(mut map) => {
            map.retain(|_, v| !v.is_null());
            Ok(map)
        }
        other => Err(AppError::InternalError(format!(
            "Expected a JSON object, got {}",
            other
        ))),
    }
}

pub fn build_partner_payload(lead: Lead) -> Result<PartnerPayload, AppError> {
    let Lead {
        phone,
        email,
        first_name,
        last_name,
        street,
        housenumber,
        postcode,
        city,
        country,
        product_name,
        lead_attributes,
        meta_attributes,
    } = lead;

    Ok(PartnerPayload {
        lead: LeadContact {
            phone,
            email,
            first_name,
            last_name,
            street,
            housenumber,
            postcode,
            city,
            country,
        },
        product: Product { name: product_name },
        lead_attributes: without_nulls(&lead_attributes)?,
        meta_attributes: without_nulls(&meta_attributes)?,
    })
}

pub fn map_partner_reply(reply: PartnerReply) -> LeadOutcome {
    if !reply.is_accepted() {
        tracing::warn!("Partner rejected lead with status {}", reply.status);
        return LeadOutcome::Error(PartnerFailure::Rejected {
            client_status: reply.status,
            client_response: reply.body,
        });
    }

    let parsed = serde_json::from_str::<Value>(&reply.body);
    let client_response = match parsed {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Partner accepted lead but body is not JSON: {}", e);
            Value::String(reply.body)
        }
    };

    LeadOutcome::Success { client_response }
}

/// Runs the whole pipeline for one lead.
///
/// Skipped leads never reach the partner. Transport failures are reported as
/// [`PartnerFailure::Unreachable`] instead of failing the request.
pub async fn process_lead(mut lead: Lead, partner: &PartnerClient) -> Result<LeadOutcome, AppError> {
    if let Err(reason) = screen(&lead) {
        tracing::info!(
            "Skipping lead (postcode={}): {}",
            lead.postcode,
            reason.code()
        );
        return Ok(LeadOutcome::Skipped { reason });
    }

    normalize(&mut lead.lead_attributes);
    let payload = build_partner_payload(lead)?;

    match partner.submit_lead(&payload).await {
        Ok(reply) => Ok(map_partner_reply(reply)),
        Err(e) => {
            tracing::error!("Partner unreachable: {}", e);
            Ok(LeadOutcome::Error(PartnerFailure::Unreachable {
                reason: UNREACHABLE_REASON,
                detail: e.to_string(),
            }))
        }
    }
}
