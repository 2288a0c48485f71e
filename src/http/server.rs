//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Own the store and lifecycle driver shared by all handlers
//! - Seed preset patterns from configuration
//! - Create Axum Router with hook, command and admin handlers
//! - Wire up middleware (tracing, timeout, request ID, body limit)
//! - Serve until the shutdown signal fires

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::post,
    Router,
};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::setup_admin_router;
use crate::config::TamperConfig;
use crate::driver::LifecycleDriver;
use crate::error::Result;
use crate::http::hooks;
use crate::store::TamperStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<TamperStore>>,
    pub driver: Arc<LifecycleDriver>,
    pub config: Arc<TamperConfig>,
}

impl AppState {
    /// Build state from configuration, registering preset patterns in file
    /// order so the last one listed takes precedence.
    pub fn new(config: TamperConfig) -> Result<Self> {
        let mut store = TamperStore::new();
        for pattern in &config.patterns {
            store.add_pattern(pattern.clone())?;
        }
        if !config.patterns.is_empty() {
            tracing::info!(count = config.patterns.len(), "Preset patterns registered");
        }

        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            driver: Arc::new(LifecycleDriver::new(&config.engine)),
            config: Arc::new(config),
        })
    }

    /// Exclusive access to the store.
    ///
    /// Handlers hold the guard for their whole run so each interception event
    /// is processed to completion before the next one starts.
    pub fn lock_store(&self) -> MutexGuard<'_, TamperStore> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// HTTP bridge between the host and the engine.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: TamperConfig) -> Result<Self> {
        let state = AppState::new(config)?;
        let router = Self::build_router(&state);
        Ok(Self { router, state })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: &AppState) -> Router {
        let config = &state.config;

        let mut router = Router::new()
            .route("/hooks/intercept", post(hooks::intercept))
            .route("/hooks/headers-send", post(hooks::headers_send))
            .route("/hooks/headers-received", post(hooks::headers_received))
            .route("/command", post(hooks::command))
            .with_state(state.clone());

        if config.admin.enabled {
            router = router.merge(setup_admin_router(state.clone()));
        }

        router
            .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get("x-request-id")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("unknown");
                        tracing::info_span!(
                            "bridge",
                            method = %request.method(),
                            path = %request.uri().path(),
                            request_id = %request_id,
                        )
                    }))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> std::result::Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            admin = self.state.config.admin.enabled,
            "HTTP bridge starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP bridge stopped");
        Ok(())
    }
}
