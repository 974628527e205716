//! Campaign column readers and per-region write outcomes.

use chrono::{DateTime, NaiveDateTime, Utc};
use cnec_core::types::{Timestamp, Won};
use serde::Serialize;
use serde_json::Value;

/// Result of writing a campaign to one region.
///
/// Serializes as `{region, success, data}` or `{region, success, error}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionOutcome {
    /// The region key exactly as the caller supplied it.
    pub region: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RegionOutcome {
    pub fn succeeded(region: impl Into<String>, data: Value) -> Self {
        Self {
            region: region.into(),
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(region: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// The `estimated_cost` column of a campaign row, in won.
pub fn estimated_cost(row: &Value) -> Option<Won> {
    won_amount(row.get("estimated_cost")?)
}

/// Read an amount in won. PostgREST renders `numeric` columns as numbers
/// or strings depending on precision; fractions are truncated. Values that
/// are not finite or fall outside the `Won` range are rejected.
pub fn won_amount(value: &Value) -> Option<Won> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(won_from_f64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<Won>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(won_from_f64))
        }
        _ => None,
    }
}

fn won_from_f64(f: f64) -> Option<Won> {
    // `Won::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
    (f.is_finite() && f >= Won::MIN as f64 && f < Won::MAX as f64).then(|| f as Won)
}

/// Parse a timestamp column. Accepts RFC 3339 (`timestamptz`) and offset-less
/// `timestamp` values, the latter read as UTC.
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    let value = value.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_outcome_omits_error() {
        let outcome = RegionOutcome::succeeded("jp", json!({"id": 7}));
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"region": "jp", "success": true, "data": {"id": 7}})
        );
    }

    #[test]
    fn failed_outcome_omits_data() {
        let outcome = RegionOutcome::failed("us", "boom");
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"region": "us", "success": false, "error": "boom"})
        );
    }

    #[test]
    fn cost_accepts_numbers_and_numeric_strings() {
        assert_eq!(won_amount(&json!(300000)), Some(300_000));
        assert_eq!(won_amount(&json!(1500.9)), Some(1500));
        assert_eq!(won_amount(&json!("200000")), Some(200_000));
        assert_eq!(won_amount(&json!(" 12.5 ")), Some(12));
        assert_eq!(won_amount(&json!("abc")), None);
        assert_eq!(estimated_cost(&json!({"title": "x"})), None);
        assert_eq!(estimated_cost(&json!({"estimated_cost": 9})), Some(9));
    }

    #[test]
    fn cost_rejects_out_of_range_and_non_finite_values() {
        assert_eq!(won_amount(&json!("1e30")), None);
        assert_eq!(won_amount(&json!(1e30)), None);
        assert_eq!(won_amount(&json!(-1e30)), None);
        assert_eq!(won_amount(&json!("NaN")), None);
        assert_eq!(won_amount(&json!("inf")), None);
        assert_eq!(won_amount(&json!(u64::MAX)), None);
        assert_eq!(won_amount(&json!(i64::MAX)), Some(i64::MAX));
    }

    #[test]
    fn timestamps_parse_with_and_without_offset() {
        let with_offset = parse_timestamp("2025-03-01T09:30:00+09:00").unwrap();
        assert_eq!(with_offset.to_rfc3339(), "2025-03-01T00:30:00+00:00");

        let naive = parse_timestamp("2025-03-01T09:30:00.123456").unwrap();
        assert_eq!(naive.format("%Y-%m-%d %H:%M").to_string(), "2025-03-01 09:30");

        assert!(parse_timestamp("2025-03-01 09:30:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
