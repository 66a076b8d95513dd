use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use interviewselect_auth::IdentityError;
use interviewselect_infra::StoreError;

use crate::app::services::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Validation(e) => json_error(StatusCode::BAD_REQUEST, e.code(), e.to_string()),
        ServiceError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", "profile not found"),
        ServiceError::Store(StoreError::Conflict(msg)) => json_error(StatusCode::CONFLICT, "conflict", msg),
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "profile store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
        ServiceError::Identity(IdentityError::AlreadyExists(_)) => json_error(
            StatusCode::CONFLICT,
            "account_exists",
            "an account already exists for this email",
        ),
        ServiceError::Identity(e) => {
            tracing::error!(error = %e, "identity provider failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "identity_error", e.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
