//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use cnec_core::region::Region;
use cnec_db::RegionBackend;
use common::{body_json, get, MemoryRegion};
use tower::ServiceExt;

#[tokio::test]
async fn health_check_reports_configured_regions() {
    let app = common::build_test_app(vec![
        (Region::Japan, MemoryRegion::with_rows(vec![]) as Arc<dyn RegionBackend>),
        (Region::Biz, MemoryRegion::with_rows(vec![]) as Arc<dyn RegionBackend>),
    ]);
    let response = get(app.router, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    // biz holds no campaigns and is not counted.
    assert_eq!(json["regions_configured"], 1);
}

#[tokio::test]
async fn health_check_is_degraded_without_regions() {
    let response = get(common::build_empty_app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["regions_configured"], 0);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let response = get(common::build_empty_app(), "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let response = get(common::build_empty_app(), "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36, "x-request-id should be a UUID string");
}

#[tokio::test]
async fn cors_preflight_returns_correct_headers() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/campaigns")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = common::build_empty_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .expect("Missing Access-Control-Allow-Origin header")
            .to_str()
            .unwrap(),
        "http://localhost:5173"
    );
    let allow_methods = headers
        .get("access-control-allow-methods")
        .expect("Missing Access-Control-Allow-Methods header")
        .to_str()
        .unwrap();
    assert!(allow_methods.contains("POST"), "got: {allow_methods}");
}

#[tokio::test]
async fn regions_endpoint_lists_every_region_with_reason() {
    let app = common::build_test_app(vec![(
        Region::Korea,
        MemoryRegion::with_rows(vec![]) as Arc<dyn RegionBackend>,
    )]);
    let response = get(app.router, "/api/v1/regions").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let regions = json["data"].as_array().unwrap();
    assert_eq!(regions.len(), 5);
    assert_eq!(regions[0]["region"], "korea");
    assert_eq!(regions[0]["configured"], true);
    assert!(regions[0].get("reason").is_none());
    assert_eq!(regions[1]["region"], "japan");
    assert_eq!(regions[1]["configured"], false);
    assert_eq!(
        regions[1]["reason"],
        "Backend client not configured for region japan"
    );
}
