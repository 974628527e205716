pub mod campaigns;
pub mod feedback;
pub mod notifications;
pub mod regions;
