//! Cross-region access to the `campaigns` table.
//!
//! Writes fan out to the requested regions and reads fan in from
//! [`Region::CAMPAIGN_REGIONS`]. Both run every region concurrently and
//! capture each region's failure on its own: a slow or failing region never
//! aborts the others, and nothing is rolled back.

use std::sync::Arc;

use cnec_core::campaign::{CampaignStats, MonthlyRevenue, RegionRevenue, RevenueSummary};
use cnec_core::region::Region;
use futures::future::join_all;
use serde_json::Value;

use crate::backend::{BackendError, RegionBackend, SelectQuery};
use crate::config::RegionUnavailable;
use crate::models::campaign::{estimated_cost, parse_timestamp, RegionOutcome};
use crate::registry::RegionRegistry;

const TABLE: &str = "campaigns";

/// Columns read for revenue aggregation.
const REVENUE_COLUMNS: [&str; 6] = [
    "id",
    "title",
    "estimated_cost",
    "payment_status",
    "created_at",
    "company_email",
];

/// Why a single-region read failed.
#[derive(Debug, thiserror::Error)]
pub enum RegionQueryError {
    #[error(transparent)]
    Unavailable(#[from] RegionUnavailable),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Provides cross-region campaign operations.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Insert `payload` into every region in `regions`.
    ///
    /// Returns one outcome per requested key, in input order. Unknown or
    /// unconfigured keys and provider errors become failed outcomes; the
    /// call itself cannot fail. Duplicate keys are written twice.
    pub async fn create_in_regions<S>(
        registry: &RegionRegistry,
        payload: &Value,
        regions: &[S],
    ) -> Vec<RegionOutcome>
    where
        S: AsRef<str> + Sync,
    {
        let writes = regions.iter().map(|key| async move {
            let key = key.as_ref();
            let client = match registry.client(key) {
                Ok(client) => client,
                Err(e) => {
                    tracing::warn!(region = key, error = %e, "Campaign not written: region unavailable");
                    return RegionOutcome::failed(key, e.to_string());
                }
            };

            match client.insert(TABLE, payload).await {
                Ok(row) => {
                    tracing::debug!(region = key, "Campaign written");
                    RegionOutcome::succeeded(key, row)
                }
                Err(e) => {
                    tracing::warn!(region = key, error = %e, "Campaign write failed");
                    RegionOutcome::failed(key, e.to_string())
                }
            }
        });

        join_all(writes).await
    }

    /// Every campaign from every configured campaign region, newest first
    /// within each region, each tagged with a `region` field.
    pub async fn list_all_regions(registry: &RegionRegistry) -> Vec<Value> {
        let query = SelectQuery::all().order_desc("created_at");

        Self::fan_in(registry, &query)
            .await
            .into_iter()
            .flat_map(|(region, rows)| rows.into_iter().map(move |row| region.tag(row)))
            .collect()
    }

    /// Campaign counts by region and by status.
    pub async fn stats_all_regions(registry: &RegionRegistry) -> CampaignStats {
        let query = SelectQuery::all().columns(["status"]);

        let mut stats = CampaignStats::default();
        for (region, rows) in Self::fan_in(registry, &query).await {
            stats.record_region(
                region,
                rows.iter().map(|row| row.get("status").and_then(Value::as_str)),
            );
        }
        stats
    }

    /// Revenue of confirmed-payment campaigns by region, with the
    /// campaigns themselves.
    pub async fn revenue_all_regions(registry: &RegionRegistry) -> RevenueSummary {
        let mut summary = RevenueSummary::default();
        for (region, rows) in Self::fan_in(registry, &Self::revenue_query()).await {
            summary.record_region(region, RegionRevenue::from_campaigns(rows, estimated_cost));
        }
        summary
    }

    /// Confirmed revenue of a single region.
    ///
    /// Only an unrecognized key is an error. An unconfigured or failing
    /// region reads as zero revenue.
    pub async fn revenue_region(
        registry: &RegionRegistry,
        key: &str,
    ) -> Result<RegionRevenue, RegionUnavailable> {
        let region =
            Region::parse(key).ok_or_else(|| RegionUnavailable::UnknownRegion(key.to_string()))?;
        let client = match registry.client_for(region) {
            Ok(client) => client,
            Err(e) => {
                tracing::debug!(%region, reason = %e, "No revenue: region unavailable");
                return Ok(RegionRevenue::default());
            }
        };

        match client.select(TABLE, &Self::revenue_query()).await {
            Ok(rows) => Ok(RegionRevenue::from_campaigns(rows, estimated_cost)),
            Err(e) => {
                tracing::warn!(%region, error = %e, "Error reading revenue from region");
                Ok(RegionRevenue::default())
            }
        }
    }

    /// Confirmed revenue by month of `payment_confirmed_at`, per region.
    /// Rows whose confirmation time does not parse are skipped.
    pub async fn monthly_revenue_all_regions(registry: &RegionRegistry) -> MonthlyRevenue {
        let query = SelectQuery::all()
            .columns(["estimated_cost", "payment_confirmed_at"])
            .eq("payment_status", "confirmed")
            .not_null("payment_confirmed_at");

        let mut monthly = MonthlyRevenue::default();
        for (region, rows) in Self::fan_in(registry, &query).await {
            for row in &rows {
                let confirmed_at = row
                    .get("payment_confirmed_at")
                    .and_then(Value::as_str)
                    .and_then(parse_timestamp);
                match confirmed_at {
                    Some(at) => monthly.record(region, at, estimated_cost(row)),
                    None => tracing::debug!(%region, "Skipping campaign with unreadable payment_confirmed_at"),
                }
            }
        }
        monthly
    }

    /// Campaigns of a single region, newest first, tagged with the region.
    pub async fn list_region(
        registry: &RegionRegistry,
        key: &str,
    ) -> Result<Vec<Value>, RegionQueryError> {
        let region =
            Region::parse(key).ok_or_else(|| RegionUnavailable::UnknownRegion(key.to_string()))?;
        let client = registry.client_for(region)?;
        let rows = client
            .select(TABLE, &SelectQuery::all().order_desc("created_at"))
            .await?;
        Ok(rows.into_iter().map(|row| region.tag(row)).collect())
    }

    // ---- private helpers ----

    fn revenue_query() -> SelectQuery {
        SelectQuery::all()
            .columns(REVENUE_COLUMNS)
            .eq("payment_status", "confirmed")
            .order_desc("created_at")
    }

    /// Run `query` against every campaign region, returning the regions
    /// that answered in iteration order.
    async fn fan_in(registry: &RegionRegistry, query: &SelectQuery) -> Vec<(Region, Vec<Value>)> {
        let clients: Vec<(Region, Arc<dyn RegionBackend>)> = Region::CAMPAIGN_REGIONS
            .into_iter()
            .filter_map(|region| match registry.client_for(region) {
                Ok(client) => Some((region, client)),
                Err(e) => {
                    tracing::debug!(%region, reason = %e, "Skipping region");
                    None
                }
            })
            .collect();

        let reads = clients.into_iter().map(|(region, client)| async move {
            (region, client.select(TABLE, query).await)
        });

        join_all(reads)
            .await
            .into_iter()
            .filter_map(|(region, result)| match result {
                Ok(rows) => Some((region, rows)),
                Err(e) => {
                    tracing::warn!(%region, error = %e, "Error reading campaigns from region");
                    None
                }
            })
            .collect()
    }
}

/// Count `(succeeded, failed)` outcomes.
pub fn outcome_counts(outcomes: &[RegionOutcome]) -> (usize, usize) {
    let succeeded = outcomes.iter().filter(|o| o.success).count();
    (succeeded, outcomes.len() - succeeded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_split_success_and_failure() {
        let outcomes = vec![
            RegionOutcome::succeeded("japan", Value::Null),
            RegionOutcome::failed("us", "down"),
            RegionOutcome::failed("xx", "Unknown region 'xx'"),
        ];
        assert_eq!(outcome_counts(&outcomes), (1, 2));
        assert_eq!(outcome_counts(&[]), (0, 0));
    }
}
