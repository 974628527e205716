//! Repository layer.
//!
//! Repositories are zero-sized structs whose async methods take the
//! [`RegionRegistry`](crate::RegionRegistry) as their first argument.

pub mod campaign_repo;
pub mod feedback_repo;

pub use campaign_repo::{outcome_counts, CampaignRepo, RegionQueryError};
pub use feedback_repo::FeedbackRepo;
