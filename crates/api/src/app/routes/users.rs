use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use interviewselect_profiles::{RegistrationInput, UpdateInput};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(register_user).put(update_user))
        .route("/:id", get(get_user).put(update_user_at).delete(delete_user))
}

pub async fn register_user(
    Extension(services): Extension<Arc<AppServices>>,
    body: Bytes,
) -> axum::response::Response {
    let input: RegistrationInput = match dto::parse_json_body(&body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.register_user(input).await {
        Ok(profile) => (StatusCode::CREATED, Json(dto::ProfileEnvelope { profile })).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.get_profile(&id).await {
        Ok(profile) => (StatusCode::OK, Json(dto::ProfileEnvelope { profile })).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    body: Bytes,
) -> axum::response::Response {
    update(services, None, body).await
}

pub async fn update_user_at(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Bytes,
) -> axum::response::Response {
    update(services, Some(id), body).await
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Query(query): Query<dto::DeleteUserQuery>,
) -> axum::response::Response {
    match services.delete_profile(&id, query.email.as_deref()).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

async fn update(services: Arc<AppServices>, path_id: Option<String>, body: Bytes) -> axum::response::Response {
    let mut input: UpdateInput = match dto::parse_json_body(&body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    // Body id wins; the path id only fills in when the body has none.
    let body_has_id = input.id.as_deref().is_some_and(|id| !id.trim().is_empty());
    if !body_has_id {
        input.id = path_id.or(input.id);
    }

    match services.update_profile(input).await {
        Ok(profile) => (StatusCode::OK, Json(dto::ProfileEnvelope { profile })).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
