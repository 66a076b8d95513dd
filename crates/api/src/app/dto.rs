use axum::body::Bytes;
use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use interviewselect_marketplace::MarketplaceListing;
use interviewselect_profiles::Profile;

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct DeleteUserQuery {
    pub email: Option<String>,
}

/// Decode a JSON request body.
///
/// An empty body and malformed JSON are both reported as 400, regardless of
/// the request's content type.
pub fn parse_json_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, axum::response::Response> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "missing_body",
            "missing request body",
        ));
    }
    serde_json::from_slice(body)
        .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, "invalid_body", e.to_string()))
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ProfileEnvelope {
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct ListingsEnvelope {
    pub profiles: &'static [MarketplaceListing],
}
