//! Video feedback, stored in the `biz` project.

use cnec_core::feedback::VideoFeedback;
use cnec_core::region::Region;
use serde_json::Value;

use crate::backend::SelectQuery;
use crate::models::feedback::feedback_row;
use crate::registry::RegionRegistry;

use super::RegionQueryError;

const TABLE: &str = "video_feedbacks";

/// Provides video feedback operations.
pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Store validated feedback and return the stored row.
    pub async fn create(
        registry: &RegionRegistry,
        feedback: &VideoFeedback,
    ) -> Result<Value, RegionQueryError> {
        let client = registry.client_for(Region::Biz)?;
        let row = client.insert(TABLE, &feedback_row(feedback)).await?;
        tracing::debug!(video_id = %feedback.video_id, "Video feedback stored");
        Ok(row)
    }

    /// Feedback on one video, in playback order.
    pub async fn list_for_video(
        registry: &RegionRegistry,
        video_id: &str,
    ) -> Result<Vec<Value>, RegionQueryError> {
        let client = registry.client_for(Region::Biz)?;
        let query = SelectQuery::all()
            .eq("video_id", video_id)
            .order_asc("timestamp");
        Ok(client.select(TABLE, &query).await?)
    }
}
