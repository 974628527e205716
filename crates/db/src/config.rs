//! Per-region backend settings.
//!
//! Each region is an independent Supabase project reached with a URL and an
//! anon key. A region with missing or malformed settings is not an error at
//! load time; it is reported as [`RegionUnavailable`] when looked up.

use std::collections::HashMap;

use cnec_core::region::Region;

/// Endpoint and credentials of one regional project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionConfig {
    pub url: String,
    pub anon_key: String,
}

/// Why a region has no usable client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegionUnavailable {
    /// The key is not one of the known regions or aliases.
    #[error("Unknown region '{0}'")]
    UnknownRegion(String),

    /// URL or key is missing.
    #[error("Backend client not configured for region {0}")]
    NotConfigured(Region),

    /// URL is present but not an absolute http(s) URL.
    #[error("Backend URL for region {region} is invalid: {url}")]
    InvalidUrl { region: Region, url: String },
}

/// Raw settings for every region, as loaded.
#[derive(Debug, Clone, Default)]
pub struct RegionSettings {
    regions: HashMap<Region, RegionConfig>,
}

impl RegionSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) one region's settings.
    pub fn with(mut self, region: Region, url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        self.regions.insert(
            region,
            RegionConfig {
                url: url.into(),
                anon_key: anon_key.into(),
            },
        );
        self
    }

    /// Load settings from environment variables.
    ///
    /// | Variable                      | Fallback                           |
    /// |-------------------------------|------------------------------------|
    /// | `SUPABASE_<REGION>_URL`       | `VITE_SUPABASE_<REGION>_URL`       |
    /// | `SUPABASE_<REGION>_ANON_KEY`  | `VITE_SUPABASE_<REGION>_ANON_KEY`  |
    ///
    /// `<REGION>` is `KOREA`, `JAPAN`, `US`, `TAIWAN` or `BIZ`. Empty values
    /// count as missing.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: String| {
            lookup(&name)
                .or_else(|| lookup(&format!("VITE_{name}")))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut settings = Self::new();
        for region in Region::ALL {
            let prefix = region.env_prefix();
            let url = read(format!("SUPABASE_{prefix}_URL"));
            let key = read(format!("SUPABASE_{prefix}_ANON_KEY"));
            if let (Some(url), Some(key)) = (url, key) {
                settings = settings.with(region, url, key);
            }
        }
        settings
    }

    /// Return the region's settings if they are usable.
    pub fn validate(&self, region: Region) -> Result<&RegionConfig, RegionUnavailable> {
        let config = self
            .regions
            .get(&region)
            .ok_or(RegionUnavailable::NotConfigured(region))?;

        if config.url.is_empty() || config.anon_key.is_empty() {
            return Err(RegionUnavailable::NotConfigured(region));
        }

        let valid = reqwest::Url::parse(&config.url)
            .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
            .unwrap_or(false);
        if !valid {
            return Err(RegionUnavailable::InvalidUrl {
                region,
                url: config.url.clone(),
            });
        }

        Ok(config)
    }
}
