use axum::routing::{get, post};
use axum::Router;

use crate::handlers::campaigns;
use crate::state::AppState;

/// Routes mounted at `/campaigns`.
///
/// ```text
/// GET  /                    list_all
/// POST /                    create
/// GET  /stats               stats
/// GET  /packages            packages
/// POST /quote               quote
/// GET  /regions/{region}    list_region
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(campaigns::list_all).post(campaigns::create))
        .route("/stats", get(campaigns::stats))
        .route("/packages", get(campaigns::packages))
        .route("/quote", post(campaigns::quote))
        .route("/regions/{region}", get(campaigns::list_region))
}

/// Routes mounted at `/revenue`.
///
/// ```text
/// GET  /                    revenue
/// GET  /monthly             monthly_revenue
/// GET  /regions/{region}    region_revenue
/// ```
pub fn revenue_router() -> Router<AppState> {
    Router::new()
        .route("/", get(campaigns::revenue))
        .route("/monthly", get(campaigns::monthly_revenue))
        .route("/regions/{region}", get(campaigns::region_revenue))
}
