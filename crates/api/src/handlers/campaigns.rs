//! Handlers for the `/campaigns` and `/revenue` resources.

use std::collections::{BTreeSet, HashMap};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cnec_core::alimtalk::NotificationEvent;
use cnec_core::campaign::{
    self, CampaignStats, MonthlyRevenue, PackageInfo, PackageTier, Quote, RegionRevenue,
    RevenueSummary,
};
use cnec_core::error::CoreError;
use cnec_core::region::Region;
use cnec_core::types::{Row, Won};
use cnec_db::models::campaign::RegionOutcome;
use cnec_db::repositories::{outcome_counts, CampaignRepo};
use cnec_events::MarketplaceEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Body of `POST /campaigns`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCampaignRequest {
    /// Row inserted verbatim into every region.
    pub campaign: Row,
    #[validate(length(min = 1, message = "at least one region is required"))]
    pub regions: Vec<String>,
    /// Ask for an admin review once the campaign is stored.
    #[validate(nested)]
    pub notify: Option<ReviewNotification>,
}

/// Recipient of the `campaign_review_requested` notification.
#[derive(Debug, Deserialize, Validate)]
pub struct ReviewNotification {
    #[validate(length(min = 1))]
    pub receiver_num: String,
    #[validate(length(min = 1))]
    pub receiver_name: String,
    #[validate(email)]
    pub email: Option<String>,
    /// Template values. `캠페인명` defaults to the campaign title.
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// Result of `POST /campaigns`.
#[derive(Debug, Serialize)]
pub struct CreateCampaignResponse {
    pub results: Vec<RegionOutcome>,
    pub succeeded: usize,
    pub failed: usize,
}

/// Body of `POST /campaigns/quote`.
#[derive(Debug, Deserialize, Validate)]
pub struct QuoteRequest {
    pub package: PackageTier,
    #[validate(length(min = 1, message = "at least one region is required"))]
    pub regions: Vec<String>,
    pub featured_price: Option<Won>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/campaigns
pub async fn list_all(State(state): State<AppState>) -> Json<DataResponse<Vec<Value>>> {
    let campaigns = CampaignRepo::list_all_regions(&state.registry).await;
    Json(DataResponse { data: campaigns })
}

/// POST /api/v1/campaigns
///
/// Writes the campaign to every requested region. Responds 201 when all
/// regions succeeded and 207 otherwise; the body lists each region's
/// outcome. Nothing is rolled back.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCampaignRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CreateCampaignResponse>>)> {
    input.validate()?;

    let payload = Value::Object(input.campaign.clone());
    let results = CampaignRepo::create_in_regions(&state.registry, &payload, &input.regions).await;
    let (succeeded, failed) = outcome_counts(&results);

    tracing::info!(succeeded, failed, "Campaign fan-out complete");

    if let Some(notify) = input.notify {
        if succeeded > 0 {
            state
                .event_bus
                .publish(review_requested_event(notify, &input.campaign));
        }
    }

    let status = if failed == 0 {
        StatusCode::CREATED
    } else {
        StatusCode::MULTI_STATUS
    };

    Ok((
        status,
        Json(DataResponse {
            data: CreateCampaignResponse {
                results,
                succeeded,
                failed,
            },
        }),
    ))
}

/// GET /api/v1/campaigns/stats
pub async fn stats(State(state): State<AppState>) -> Json<DataResponse<CampaignStats>> {
    Json(DataResponse {
        data: CampaignRepo::stats_all_regions(&state.registry).await,
    })
}

/// GET /api/v1/revenue
pub async fn revenue(State(state): State<AppState>) -> Json<DataResponse<RevenueSummary>> {
    Json(DataResponse {
        data: CampaignRepo::revenue_all_regions(&state.registry).await,
    })
}

/// GET /api/v1/revenue/monthly
pub async fn monthly_revenue(State(state): State<AppState>) -> Json<DataResponse<MonthlyRevenue>> {
    Json(DataResponse {
        data: CampaignRepo::monthly_revenue_all_regions(&state.registry).await,
    })
}

/// GET /api/v1/revenue/regions/{region}
///
/// An unknown region is a 404; an unavailable one reads as zero.
pub async fn region_revenue(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> AppResult<Json<DataResponse<RegionRevenue>>> {
    let revenue = CampaignRepo::revenue_region(&state.registry, &region).await?;
    Ok(Json(DataResponse { data: revenue }))
}

/// GET /api/v1/campaigns/packages
pub async fn packages() -> Json<DataResponse<Vec<PackageInfo>>> {
    Json(DataResponse {
        data: campaign::packages(),
    })
}

/// GET /api/v1/campaigns/regions/{region}
pub async fn list_region(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Value>>>> {
    let campaigns = CampaignRepo::list_region(&state.registry, &region).await?;
    Ok(Json(DataResponse { data: campaigns }))
}

/// POST /api/v1/campaigns/quote
///
/// Duplicate regions (including aliases of one region) are charged once.
pub async fn quote(Json(input): Json<QuoteRequest>) -> AppResult<Json<DataResponse<Quote>>> {
    input.validate()?;

    let mut regions = BTreeSet::new();
    for key in &input.regions {
        let region = Region::parse(key)
            .ok_or_else(|| CoreError::Validation(format!("Unknown region '{key}'")))?;
        regions.insert(region);
    }

    let quote = campaign::quote(input.package, regions.len(), input.featured_price)?;
    Ok(Json(DataResponse { data: quote }))
}

// ---- private helpers ----

fn review_requested_event(notify: ReviewNotification, campaign: &Row) -> MarketplaceEvent {
    let mut params = notify.params;
    if let Some(title) = campaign.get("title").and_then(Value::as_str) {
        params
            .entry("캠페인명".to_string())
            .or_insert_with(|| title.to_string());
    }
    params
        .entry("회사명".to_string())
        .or_insert_with(|| notify.receiver_name.clone());

    let mut event = MarketplaceEvent::new(NotificationEvent::CampaignReviewRequested)
        .to(notify.receiver_num, notify.receiver_name)
        .with_params(params);
    if let Some(email) = notify.email {
        event = event.with_email(email);
    }
    event
}
