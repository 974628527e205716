//! Domain logic for the CNEC campaign marketplace.
//!
//! Everything in this crate is pure: region keys, campaign and application
//! status, package pricing, the alimtalk template catalog, and video
//! feedback geometry. I/O lives in `cnec-db` and `cnec-events`.

pub mod alimtalk;
pub mod campaign;
pub mod error;
pub mod feedback;
pub mod region;
pub mod types;
