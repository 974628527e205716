use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notifications;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(notifications::enqueue))
        .route("/templates", get(notifications::templates))
        .route("/preview", post(notifications::preview))
}
