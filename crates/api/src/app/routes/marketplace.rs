use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, routing::get, Json, Router};

use crate::app::dto;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/profiles", get(list_profiles))
}

pub async fn list_profiles(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let profiles = services.marketplace_listings();
    tracing::debug!(count = profiles.len(), "marketplace listings served");
    (StatusCode::OK, Json(dto::ListingsEnvelope { profiles })).into_response()
}
