//! Video feedback annotations: a timestamp, an optional box on the frame,
//! a comment and its author.
//!
//! Box coordinates are normalized to `[0, 1]` relative to the rendered
//! frame so annotations survive player resizes.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A drawn box must exceed this size (normalized units) on both axes to be
/// kept. Anything smaller is treated as a stray click.
pub const MIN_BOX_SIZE: f64 = 0.01;

/// Author recorded when none is given.
pub const ANONYMOUS_AUTHOR: &str = "익명";

/// A rectangle drawn on the frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedbackBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FeedbackBox {
    /// Flip negative sizes and clamp the box inside the frame.
    pub fn normalized(self) -> Self {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };

        let x = x.clamp(0.0, 1.0);
        let y = y.clamp(0.0, 1.0);
        Self {
            x,
            y,
            width: width.min(1.0 - x),
            height: height.min(1.0 - y),
        }
    }

    /// Whether the box is large enough on both axes to mean anything.
    pub fn is_drawn(&self) -> bool {
        self.width > MIN_BOX_SIZE && self.height > MIN_BOX_SIZE
    }

    fn is_finite(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// A reviewer's comment pinned to a moment of a submitted video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoFeedback {
    pub video_id: String,
    pub timestamp_secs: f64,
    #[serde(rename = "box", default, skip_serializing_if = "Option::is_none")]
    pub region: Option<FeedbackBox>,
    pub comment: String,
    pub author: String,
}

impl VideoFeedback {
    /// Build validated feedback.
    ///
    /// The box is normalized and dropped unless [`FeedbackBox::is_drawn`];
    /// the comment and author are trimmed, and a blank author becomes
    /// [`ANONYMOUS_AUTHOR`].
    pub fn new(
        video_id: impl Into<String>,
        timestamp_secs: f64,
        region: Option<FeedbackBox>,
        comment: &str,
        author: Option<&str>,
    ) -> Result<Self, CoreError> {
        if let Some(b) = &region {
            if !b.is_finite() {
                return Err(CoreError::Validation(
                    "Feedback box coordinates must be finite numbers".into(),
                ));
            }
        }

        let author = author
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(ANONYMOUS_AUTHOR);

        let feedback = Self {
            video_id: video_id.into(),
            timestamp_secs,
            region: region.map(FeedbackBox::normalized).filter(FeedbackBox::is_drawn),
            comment: comment.trim().to_string(),
            author: author.to_string(),
        };
        feedback.validate()?;
        Ok(feedback)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.video_id.trim().is_empty() {
            return Err(CoreError::Validation("Feedback video id is empty".into()));
        }
        if !self.timestamp_secs.is_finite() || self.timestamp_secs < 0.0 {
            return Err(CoreError::Validation(format!(
                "Feedback timestamp must be a non-negative number, got {}",
                self.timestamp_secs
            )));
        }
        if self.comment.trim().is_empty() {
            return Err(CoreError::Validation("Feedback comment is empty".into()));
        }
        Ok(())
    }
}
