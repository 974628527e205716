use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cnec_api::config::ServerConfig;
use cnec_api::router::build_app_router;
use cnec_api::state::AppState;
use cnec_db::{postgrest, RegionRegistry, RegionSettings};
use cnec_events::{
    AlimtalkConfig, EmailConfig, EmailDelivery, EventBus, KakaoAlimtalk, NotificationDispatcher,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cnec_api=debug,cnec_db=debug,cnec_events=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Region registry ---
    let http = postgrest::http_client().expect("Failed to build HTTP client");
    let registry = Arc::new(RegionRegistry::postgrest(RegionSettings::from_env(), http.clone()));
    for status in registry.status() {
        match &status.reason {
            None => tracing::info!(region = %status.region, "Region configured"),
            Some(reason) => tracing::warn!(region = %status.region, %reason, "Region unavailable"),
        }
    }

    // --- Event bus and notification dispatch ---
    let event_bus = Arc::new(EventBus::default());

    let mut dispatcher = NotificationDispatcher::new();
    match AlimtalkConfig::from_env() {
        Some(alimtalk) => {
            dispatcher = dispatcher.with_alimtalk(Arc::new(KakaoAlimtalk::with_client(http, alimtalk)));
            tracing::info!("Alimtalk delivery enabled");
        }
        None => tracing::warn!("KAKAO_SENDER_KEY not set, alimtalk delivery disabled"),
    }
    match EmailConfig::from_env() {
        Some(email) => {
            dispatcher = dispatcher.with_email(Arc::new(EmailDelivery::new(email)));
            tracing::info!("Email delivery enabled");
        }
        None => tracing::info!("SMTP_HOST not set, email delivery disabled"),
    }
    let dispatcher_handle = tokio::spawn(dispatcher.run(event_bus.subscribe()));

    // --- App state ---
    let state = AppState {
        registry,
        event_bus: Arc::clone(&event_bus),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, draining notifications");

    // Dropping the last sender closes the channel; the dispatcher drains
    // what is buffered and exits.
    drop(event_bus);
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(drain, dispatcher_handle).await.is_err() {
        tracing::warn!("Notification dispatcher did not finish in time");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
