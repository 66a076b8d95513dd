use axum::Router;

pub mod marketplace;
pub mod system;
pub mod users;

/// Router for the user and marketplace endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/users", users::router())
        .nest("/marketplace", marketplace::router())
}
