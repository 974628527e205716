use std::sync::Arc;

use cnec_db::RegionRegistry;
use cnec_events::EventBus;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Per-region backend clients, built once at startup.
    pub registry: Arc<RegionRegistry>,
    /// Notifications are published here and delivered in the background.
    pub event_bus: Arc<EventBus>,
}
