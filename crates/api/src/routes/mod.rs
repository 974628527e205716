pub mod campaigns;
pub mod feedback;
pub mod health;
pub mod notifications;
pub mod regions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /regions                        registry status per region (GET)
///
/// /campaigns                      list across regions (GET), create in regions (POST)
/// /campaigns/stats                counts by region and status (GET)
/// /campaigns/packages             package price list (GET)
/// /campaigns/quote                price a campaign (POST)
/// /campaigns/regions/{region}     list one region (GET)
///
/// /revenue                        confirmed revenue by region (GET)
/// /revenue/monthly                confirmed revenue by month (GET)
/// /revenue/regions/{region}       confirmed revenue of one region (GET)
///
/// /feedback                       store video feedback (POST)
/// /feedback/videos/{video_id}     feedback on one video (GET)
///
/// /notifications                  enqueue an event (POST)
/// /notifications/templates        template catalog (GET)
/// /notifications/preview          render a template (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/regions", regions::router())
        .nest("/campaigns", campaigns::router())
        .nest("/revenue", campaigns::revenue_router())
        .nest("/feedback", feedback::router())
        .nest("/notifications", notifications::router())
}
