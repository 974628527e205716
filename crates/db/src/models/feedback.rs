//! `video_feedbacks` rows.

use cnec_core::feedback::VideoFeedback;
use serde_json::{json, Value};

/// Row inserted into `video_feedbacks`. A timestamp-only comment stores
/// null box columns.
pub fn feedback_row(feedback: &VideoFeedback) -> Value {
    let b = feedback.region;
    json!({
        "video_id": feedback.video_id,
        "timestamp": feedback.timestamp_secs,
        "box_x": b.map(|b| b.x),
        "box_y": b.map(|b| b.y),
        "box_width": b.map(|b| b.width),
        "box_height": b.map(|b| b.height),
        "comment": feedback.comment,
        "author": feedback.author,
    })
}

#[cfg(test)]
mod tests {
    use cnec_core::feedback::FeedbackBox;

    use super::*;

    #[test]
    fn box_columns_are_flattened() {
        let feedback = VideoFeedback::new(
            "v-9",
            12.5,
            Some(FeedbackBox {
                x: 0.25,
                y: 0.5,
                width: 0.25,
                height: 0.125,
            }),
            "logo too small",
            None,
        )
        .unwrap();

        assert_eq!(
            feedback_row(&feedback),
            json!({
                "video_id": "v-9",
                "timestamp": 12.5,
                "box_x": 0.25,
                "box_y": 0.5,
                "box_width": 0.25,
                "box_height": 0.125,
                "comment": "logo too small",
                "author": "익명",
            })
        );
    }

    #[test]
    fn timestamp_only_feedback_has_null_box() {
        let feedback = VideoFeedback::new("v-9", 1.0, None, "intro too long", Some("PD")).unwrap();
        let row = feedback_row(&feedback);
        assert!(row["box_x"].is_null());
        assert!(row["box_height"].is_null());
        assert_eq!(row["author"], "PD");
    }
}
