use axum::Router;

pub mod expenses;
pub mod system;

/// Router for all expense endpoints.
pub fn router() -> Router {
    Router::new().nest("/expenses", expenses::router())
}
