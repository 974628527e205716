//! Region keys and their aliases.
//!
//! Every region is backed by an independent database project. A campaign
//! row in one region is unrelated at the storage level to a same-titled row
//! in another; only the application treats them as one replicated campaign.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// A deployment region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Korea,
    Japan,
    Us,
    Taiwan,
    /// Central project holding companies, quotations and contracts.
    Biz,
}

impl Region {
    /// Every region, including `biz`.
    pub const ALL: [Region; 5] = [
        Region::Korea,
        Region::Japan,
        Region::Us,
        Region::Taiwan,
        Region::Biz,
    ];

    /// Regions that hold campaign rows, in fan-in iteration order.
    pub const CAMPAIGN_REGIONS: [Region; 4] =
        [Region::Korea, Region::Japan, Region::Us, Region::Taiwan];

    /// Resolve a region key or alias. Case and surrounding whitespace are
    /// ignored. Returns `None` for anything outside the closed set.
    ///
    /// ```
    /// use cnec_core::region::Region;
    ///
    /// assert_eq!(Region::parse("kr"), Some(Region::Korea));
    /// assert_eq!(Region::parse(" USA "), Some(Region::Us));
    /// assert_eq!(Region::parse("mars"), None);
    /// ```
    pub fn parse(key: &str) -> Option<Region> {
        match key.trim().to_ascii_lowercase().as_str() {
            "korea" | "kr" => Some(Region::Korea),
            "japan" | "jp" => Some(Region::Japan),
            "us" | "usa" => Some(Region::Us),
            "taiwan" | "tw" => Some(Region::Taiwan),
            "biz" => Some(Region::Biz),
            _ => None,
        }
    }

    /// Canonical lowercase key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Korea => "korea",
            Region::Japan => "japan",
            Region::Us => "us",
            Region::Taiwan => "taiwan",
            Region::Biz => "biz",
        }
    }

    /// Upper-case fragment used in configuration variable names,
    /// e.g. `SUPABASE_KOREA_URL`.
    pub fn env_prefix(&self) -> &'static str {
        match self {
            Region::Korea => "KOREA",
            Region::Japan => "JAPAN",
            Region::Us => "US",
            Region::Taiwan => "TAIWAN",
            Region::Biz => "BIZ",
        }
    }

    /// Copy of `row` with a `region` field naming this region, replacing
    /// any existing one. Non-object rows are wrapped as
    /// `{"value": row, "region": ..}`.
    pub fn tag(self, row: Value) -> Value {
        let mut object = match row {
            Value::Object(map) => map,
            other => {
                let mut map = serde_json::Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        object.insert("region".to_string(), Value::String(self.as_str().to_string()));
        Value::Object(object)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::parse(s).ok_or_else(|| CoreError::Validation(format!("Unknown region '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_canonical_regions() {
        assert_eq!(Region::parse("korea"), Some(Region::Korea));
        assert_eq!(Region::parse("kr"), Some(Region::Korea));
        assert_eq!(Region::parse("jp"), Some(Region::Japan));
        assert_eq!(Region::parse("usa"), Some(Region::Us));
        assert_eq!(Region::parse("tw"), Some(Region::Taiwan));
        assert_eq!(Region::parse("BIZ"), Some(Region::Biz));
    }

    #[test]
    fn unknown_keys_are_absent_not_biz() {
        assert_eq!(Region::parse(""), None);
        assert_eq!(Region::parse("europe"), None);
        assert_eq!(Region::parse("k r"), None);
    }

    #[test]
    fn from_str_reports_the_rejected_key() {
        let err = "mars".parse::<Region>().unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: Unknown region 'mars'");
    }

    #[test]
    fn tag_overrides_existing_region_field() {
        let tagged = Region::Taiwan.tag(serde_json::json!({"id": 1, "region": "stale"}));
        assert_eq!(tagged, serde_json::json!({"id": 1, "region": "taiwan"}));
        assert_eq!(
            Region::Us.tag(serde_json::json!(7)),
            serde_json::json!({"value": 7, "region": "us"})
        );
    }

    #[test]
    fn as_str_round_trips_through_parse() {
        for region in Region::ALL {
            assert_eq!(Region::parse(region.as_str()), Some(region));
        }
    }

    #[test]
    fn campaign_regions_exclude_biz() {
        assert!(!Region::CAMPAIGN_REGIONS.contains(&Region::Biz));
        assert_eq!(Region::CAMPAIGN_REGIONS[0], Region::Korea);
    }

    #[test]
    fn serde_uses_lowercase_keys() {
        let json = serde_json::to_string(&Region::Taiwan).unwrap();
        assert_eq!(json, "\"taiwan\"");
        let back: Region = serde_json::from_str("\"us\"").unwrap();
        assert_eq!(back, Region::Us);
    }
}
