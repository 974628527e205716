//! Handlers for the `/regions` resource.

use axum::extract::State;
use axum::Json;
use cnec_db::RegionStatus;

use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/regions
///
/// Availability of every region. Reads settings only; no client is built.
pub async fn status(State(state): State<AppState>) -> Json<DataResponse<Vec<RegionStatus>>> {
    Json(DataResponse {
        data: state.registry.status(),
    })
}
