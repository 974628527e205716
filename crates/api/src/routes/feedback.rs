use axum::routing::{get, post};
use axum::Router;

use crate::handlers::feedback;
use crate::state::AppState;

/// Routes mounted at `/feedback`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(feedback::create))
        .route("/videos/{video_id}", get(feedback::list_for_video))
}
