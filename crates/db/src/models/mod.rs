//! Row shapes and result types.
//!
//! Campaign rows are carried as JSON objects: each region owns its schema
//! and the data layer only relies on the few columns modelled here.

pub mod campaign;
pub mod feedback;
