//! Campaign lifecycle, package pricing, and cross-region aggregates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::region::Region;
use crate::types::{Timestamp, Won};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a campaign row (`pending -> active -> completed`).
///
/// Regions are written by independent clients, so unexpected values are
/// kept verbatim in [`CampaignStatus::Other`] rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CampaignStatus {
    Pending,
    Active,
    Completed,
    Other(String),
}

impl CampaignStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CampaignStatus::Pending => "pending",
            CampaignStatus::Active => "active",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Other(s) => s,
        }
    }

    /// Read a status column value. A missing or null status counts as
    /// `pending`.
    pub fn from_column(value: Option<&str>) -> Self {
        match value {
            None => CampaignStatus::Pending,
            Some(s) => CampaignStatus::from(s.to_string()),
        }
    }
}

impl From<String> for CampaignStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => CampaignStatus::Pending,
            "active" => CampaignStatus::Active,
            "completed" => CampaignStatus::Completed,
            _ => CampaignStatus::Other(value),
        }
    }
}

impl From<CampaignStatus> for String {
    fn from(value: CampaignStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Status of a creator's application to a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Selected,
    Filming,
    VideoSubmitted,
    RevisionRequested,
    Approved,
    Completed,
    Cancelled,
}

impl ApplicationStatus {
    /// Whether the creator is still expected to deliver a video.
    pub fn awaits_video(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Selected
                | ApplicationStatus::Filming
                | ApplicationStatus::RevisionRequested
        )
    }
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// Campaign package tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageTier {
    Basic,
    Standard,
    Premium,
    /// Four consecutive weekly videos.
    Monthly,
}

impl PackageTier {
    pub const ALL: [PackageTier; 4] = [
        PackageTier::Basic,
        PackageTier::Standard,
        PackageTier::Premium,
        PackageTier::Monthly,
    ];

    /// List price per region.
    pub fn price(&self) -> Won {
        match self {
            PackageTier::Basic => 200_000,
            PackageTier::Standard => 300_000,
            PackageTier::Premium => 400_000,
            PackageTier::Monthly => 600_000,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PackageTier::Basic => "기본형",
            PackageTier::Standard => "스탠다드",
            PackageTier::Premium => "프리미엄",
            PackageTier::Monthly => "4주 연속",
        }
    }

    /// Number of revision rounds included in the package.
    pub fn included_revisions(&self) -> u32 {
        match self {
            PackageTier::Basic => 0,
            PackageTier::Standard => 1,
            PackageTier::Premium | PackageTier::Monthly => 2,
        }
    }
}

/// One row of the package price list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageInfo {
    pub package: PackageTier,
    pub label: &'static str,
    pub price: Won,
    pub included_revisions: u32,
}

/// The price list, cheapest tier first.
pub fn packages() -> Vec<PackageInfo> {
    PackageTier::ALL
        .into_iter()
        .map(|package| PackageInfo {
            package,
            label: package.label(),
            price: package.price(),
            included_revisions: package.included_revisions(),
        })
        .collect()
}

/// Price breakdown for a campaign placed in one or more regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub package: PackageTier,
    pub base_price: Won,
    pub region_count: usize,
    pub total: Won,
}

/// Price a campaign: each region is charged the full base price.
///
/// `featured_price` replaces the list price when a featured creator with
/// their own rate was picked.
pub fn quote(
    package: PackageTier,
    region_count: usize,
    featured_price: Option<Won>,
) -> Result<Quote, CoreError> {
    if region_count == 0 {
        return Err(CoreError::Validation(
            "At least one region must be selected".into(),
        ));
    }
    if let Some(price) = featured_price {
        if price <= 0 {
            return Err(CoreError::Validation(format!(
                "Featured price must be positive, got {price}"
            )));
        }
    }

    let base_price = featured_price.unwrap_or_else(|| package.price());
    let total = base_price
        .checked_mul(region_count as Won)
        .ok_or_else(|| CoreError::Validation("Quote total overflows".into()))?;

    Ok(Quote {
        package,
        base_price,
        region_count,
        total,
    })
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Campaign counts merged across regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignStats {
    pub total: usize,
    /// Only regions that answered appear here.
    pub by_region: BTreeMap<Region, usize>,
    pub by_status: BTreeMap<String, usize>,
}

impl Default for CampaignStats {
    fn default() -> Self {
        let by_status = [
            CampaignStatus::Active,
            CampaignStatus::Completed,
            CampaignStatus::Pending,
        ]
        .into_iter()
        .map(|s| (String::from(s), 0))
        .collect();

        Self {
            total: 0,
            by_region: BTreeMap::new(),
            by_status,
        }
    }
}

impl CampaignStats {
    /// Fold one region's status column into the totals.
    pub fn record_region<'a, I>(&mut self, region: Region, statuses: I)
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut count = 0;
        for status in statuses {
            let status = CampaignStatus::from_column(status);
            *self.by_status.entry(status.into()).or_insert(0) += 1;
            count += 1;
        }
        self.by_region.insert(region, count);
        self.total += count;
    }
}

/// Confirmed-payment revenue of one region.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegionRevenue {
    pub revenue: Won,
    pub count: usize,
    /// The region's confirmed campaigns as read, untagged.
    pub campaigns: Vec<Value>,
}

impl RegionRevenue {
    /// Sum `cost` over `campaigns`. Rows without a usable cost count toward
    /// `count` with zero revenue. The sum saturates at the `Won` range.
    pub fn from_campaigns<F>(campaigns: Vec<Value>, cost: F) -> Self
    where
        F: Fn(&Value) -> Option<Won>,
    {
        let revenue = campaigns
            .iter()
            .fold(0 as Won, |sum, row| sum.saturating_add(cost(row).unwrap_or(0)));
        Self {
            revenue,
            count: campaigns.len(),
            campaigns,
        }
    }
}

/// Confirmed-payment revenue merged across regions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevenueSummary {
    pub total: Won,
    pub by_region: BTreeMap<Region, RegionRevenue>,
    /// Every region's campaigns, tagged with their region, in record order.
    pub campaigns: Vec<Value>,
}

impl RevenueSummary {
    /// Fold one region's revenue into the totals.
    pub fn record_region(&mut self, region: Region, revenue: RegionRevenue) {
        self.total = self.total.saturating_add(revenue.revenue);
        self.campaigns
            .extend(revenue.campaigns.iter().cloned().map(|row| region.tag(row)));
        self.by_region.insert(region, revenue);
    }
}

/// Revenue confirmed within one calendar month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthRevenue {
    pub total: Won,
    pub by_region: BTreeMap<Region, Won>,
}

/// Confirmed revenue bucketed by `YYYY-MM` of the payment confirmation,
/// serialized as a map from month key to [`MonthRevenue`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MonthlyRevenue {
    pub months: BTreeMap<String, MonthRevenue>,
}

impl MonthlyRevenue {
    /// Add one confirmed campaign. A missing cost still opens the month and
    /// region buckets.
    pub fn record(&mut self, region: Region, confirmed_at: Timestamp, cost: Option<Won>) {
        let cost = cost.unwrap_or(0);
        let month = self.months.entry(month_key(confirmed_at)).or_default();
        month.total = month.total.saturating_add(cost);
        let by_region = month.by_region.entry(region).or_insert(0);
        *by_region = by_region.saturating_add(cost);
    }
}

/// `YYYY-MM` of a UTC timestamp.
pub fn month_key(at: Timestamp) -> String {
    at.format("%Y-%m").to_string()
}
