//! Handlers for the `/notifications` resource.
//!
//! Sending is asynchronous: the handler publishes to the event bus and the
//! background dispatcher delivers. A gateway outage therefore never fails
//! the request.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cnec_core::alimtalk::{self, AlimtalkTemplate, NotificationEvent};
use cnec_events::MarketplaceEvent;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Body of `POST /notifications/preview`. Exactly one of `template` and
/// `event` must be given.
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    /// Free-form text with `#{key}` placeholders.
    pub template: Option<String>,
    /// Catalog event whose registered body is rendered.
    pub event: Option<NotificationEvent>,
    #[serde(default)]
    pub params: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub content: String,
}

/// Body of `POST /notifications`.
#[derive(Debug, Deserialize, Validate)]
pub struct SendNotificationRequest {
    pub event: NotificationEvent,
    #[validate(length(min = 1))]
    pub receiver_num: Option<String>,
    pub receiver_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    pub params: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct QueuedNotification {
    pub event: NotificationEvent,
    pub template_code: &'static str,
    pub queued: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications/templates
pub async fn templates() -> Json<DataResponse<&'static [AlimtalkTemplate]>> {
    Json(DataResponse {
        data: alimtalk::catalog(),
    })
}

/// POST /api/v1/notifications/preview
pub async fn preview(
    Json(input): Json<PreviewRequest>,
) -> AppResult<Json<DataResponse<PreviewResponse>>> {
    let response = match (input.template, input.event) {
        (Some(text), None) => PreviewResponse {
            template_code: None,
            subject: None,
            content: alimtalk::render(&text, &input.params),
        },
        (None, Some(event)) => {
            let template = alimtalk::template_for(event);
            let values: HashMap<String, String> = alimtalk::bind(template, &input.params)?
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect();
            PreviewResponse {
                template_code: Some(template.code),
                subject: Some(alimtalk::render(template.subject, &values)),
                content: alimtalk::render(template.body, &values),
            }
        }
        _ => {
            return Err(AppError::BadRequest(
                "Provide exactly one of 'template' or 'event'".into(),
            ))
        }
    };

    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/notifications
///
/// Checks the template parameters, then hands the event to the dispatcher
/// and responds 202 without waiting for delivery.
pub async fn enqueue(
    State(state): State<AppState>,
    Json(input): Json<SendNotificationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<QueuedNotification>>)> {
    input.validate()?;
    if input.receiver_num.is_none() && input.email.is_none() {
        return Err(AppError::BadRequest(
            "At least one of 'receiver_num' or 'email' is required".into(),
        ));
    }

    let template = alimtalk::template_for(input.event);
    alimtalk::bind(template, &input.params)?;

    let mut event = MarketplaceEvent::new(input.event).with_params(input.params);
    event.receiver_num = input.receiver_num;
    event.receiver_name = input.receiver_name;
    event.email = input.email;

    tracing::info!(event = ?event.event, template_code = template.code, "Notification queued");
    state.event_bus.publish(event);

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: QueuedNotification {
                event: input.event,
                template_code: template.code,
                queued: true,
            },
        }),
    ))
}
