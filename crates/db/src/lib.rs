//! Region data layer.
//!
//! Every deployment region is an independent PostgREST project. This crate
//! loads their settings, builds one client per region on demand
//! ([`RegionRegistry`]) and provides the cross-region campaign reads and
//! writes ([`repositories::CampaignRepo`]) along with video feedback
//! storage ([`repositories::FeedbackRepo`]).

pub mod backend;
pub mod config;
pub mod models;
pub mod postgrest;
pub mod registry;
pub mod repositories;

pub use backend::{BackendError, RegionBackend, SelectQuery};
pub use config::{RegionConfig, RegionSettings, RegionUnavailable};
pub use registry::{RegionRegistry, RegionStatus};
