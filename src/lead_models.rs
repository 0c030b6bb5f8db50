use serde::{Deserialize, Serialize};

/// Lead submitted to `POST /receive-lead`.
///
/// Required fields are plain `String`s so that a missing or `null` value is
/// rejected by the JSON extractor before the pipeline runs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Lead {
    pub phone: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub street: Option<String>,
    pub housenumber: Option<String>,
    pub postcode: String,
    pub city: Option<String>,
    pub country: String,
    pub product_name: String,

    /// Solar interest details
    pub lead_attributes: LeadAttributes,

    /// Landing page / tracking details
    pub meta_attributes: LeadMeta,
}

/// Homeowner status as reported by the landing page form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum SolarOwner {
    #[serde(rename = "Ja")]
    Yes,
    #[serde(rename = "Nein")]
    No,
    #[serde(rename = "In Auftrag")]
    Commissioned,
}

/// A numeric form field as it arrives on the wire.
///
/// Landing pages send these either as JSON numbers or as free text, so both
/// shapes are accepted and resolved later by [`NumericValue::to_finite`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum NumericValue {
    Number(f64),
    Text(String),
}

impl NumericValue {
    /// Resolve to a finite float, or `None` if the value is not a number.
    ///
    /// Text is trimmed and parsed as a float literal (`"120"`, `" 3.5 "`,
    /// `"1e3"`, `"1_000"`). `NaN` and infinities are treated as invalid
    /// since they cannot be represented in the outbound JSON.
    pub fn to_finite(&self) -> Option<f64> {
        let value = match self {
            NumericValue::Number(n) => *n,
            NumericValue::Text(text) => strip_digit_separators(text.trim())?
                .parse::<f64>()
                .ok()?,
        };

        value.is_finite().then_some(value)
    }
}

/// Removes `_` separators, which are only valid with a digit on each side.
fn strip_digit_separators(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut digits = String::with_capacity(text.len());

    for (i, c) in text.char_indices() {
        if c != '_' {
            digits.push(c);
            continue;
        }

        let digit_before = i.checked_sub(1).is_some_and(|j| bytes[j].is_ascii_digit());
        let digit_after = bytes.get(i + 1).is_some_and(|b| b.is_ascii_digit());
        if !(digit_before && digit_after) {
            return None;
        }
    }

    Some(digits)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LeadAttributes {
    pub solar_owner: SolarOwner,
    pub solar_energy_consumption: Option<NumericValue>,
    pub solar_monthly_electricity_bill: Option<NumericValue>,
    pub solar_offer_type: Option<String>,
    pub solar_property_type: Option<String>,
    pub solar_area: Option<NumericValue>,
}

impl LeadAttributes {
    /// The attributes that are coerced to numbers before forwarding,
    /// paired with their wire names.
    pub fn numeric_fields_mut(&mut self) -> [(&'static str, &mut Option<NumericValue>); 3] {
        [
            (
                "solar_energy_consumption",
                &mut self.solar_energy_consumption,
            ),
            (
                "solar_monthly_electricity_bill",
                &mut self.solar_monthly_electricity_bill,
            ),
            ("solar_area", &mut self.solar_area),
        ]
    }
}

/// Tracking metadata. Forwarded untouched.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LeadMeta {
    pub landingpage_url: Option<String>,
    pub unique_id: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_source: Option<String>,
    pub ip: Option<String>,
    pub browser: Option<String>,
    #[serde(default)]
    pub optin: bool,
}
