//! Tests for `AppError` to HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server is
//! involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use cnec_api::error::AppError;
use cnec_core::error::CoreError;
use cnec_core::region::Region;
use cnec_db::{BackendError, RegionUnavailable};
use http_body_util::BodyExt;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn core_validation_returns_400() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Validation("bad price".into()))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "bad price");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("invalid field value".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid field value");
}

#[tokio::test]
async fn unknown_region_returns_404() {
    let (status, json) =
        error_to_response(AppError::Region(RegionUnavailable::UnknownRegion("eu".into()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "UNKNOWN_REGION");
    assert_eq!(json["error"], "Unknown region 'eu'");
}

#[tokio::test]
async fn unconfigured_region_returns_503() {
    let (status, json) =
        error_to_response(AppError::Region(RegionUnavailable::NotConfigured(Region::Us))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "REGION_UNAVAILABLE");
}

#[tokio::test]
async fn provider_rejection_returns_502_with_message() {
    let err = AppError::Backend(BackendError::Api {
        status: 400,
        message: "column \"foo\" does not exist".into(),
    });
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"], "UPSTREAM_ERROR");
    assert_eq!(json["error"], "column \"foo\" does not exist");
}

#[tokio::test]
async fn decode_failure_is_sanitized() {
    let err = AppError::Backend(BackendError::Decode("secret internals".into()));
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "Regional backend request failed");
}
