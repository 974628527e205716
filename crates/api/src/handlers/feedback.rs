//! Handlers for the `/feedback` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cnec_core::feedback::{FeedbackBox, VideoFeedback};
use cnec_db::repositories::FeedbackRepo;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /feedback`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFeedbackRequest {
    #[validate(length(min = 1))]
    pub video_id: String,
    /// Playback position in seconds.
    pub timestamp_secs: f64,
    /// Area drawn on the frame, normalized to `[0, 1]`.
    #[serde(rename = "box")]
    pub region: Option<FeedbackBox>,
    #[validate(length(min = 1, max = 2000))]
    pub comment: String,
    #[validate(length(max = 100))]
    pub author: Option<String>,
}

/// POST /api/v1/feedback
///
/// Boxes too small on either axis are dropped and the feedback is stored
/// as timestamp-only.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateFeedbackRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Value>>)> {
    input.validate()?;

    let feedback = VideoFeedback::new(
        input.video_id,
        input.timestamp_secs,
        input.region,
        &input.comment,
        input.author.as_deref(),
    )?;
    let row = FeedbackRepo::create(&state.registry, &feedback).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

/// GET /api/v1/feedback/videos/{video_id}
pub async fn list_for_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Value>>>> {
    let rows = FeedbackRepo::list_for_video(&state.registry, &video_id).await?;
    Ok(Json(DataResponse { data: rows }))
}
