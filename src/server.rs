pub mod errors;
pub mod handlers;
pub mod responses;

use std::path::Path;
use std::time::Instant;

use axum::http::{HeaderValue, Method, header::CONTENT_TYPE};
use axum::{
    Router,
    routing::{any, get, post},
};
use color_eyre::eyre::{Context, Result};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::{Config, CorsConfig};
use crate::game::GameService;

#[derive(Debug, Clone)]
pub struct AppState {
    pub game: GameService,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(game: GameService) -> Self {
        Self {
            game,
            started_at: Instant::now(),
        }
    }
}

pub struct Server {
    router: Router,
    listener: TcpListener,
}

impl Server {
    /// Binds the listener and builds the application router.
    ///
    /// Use port `0` to let the OS pick one, then read it back with [`Server::port`].
    pub async fn new(game: GameService, config: &Config) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(&addr)
            .await
            .wrap_err_with(|| format!("Failed to bind {addr}"))?;

        let router = build_router(AppState::new(game), config);
        Ok(Self { router, listener })
    }

    pub fn port(&self) -> u16 {
        self.listener
            .local_addr()
            .map(|addr| addr.port())
            .unwrap_or_default()
    }

    /// Serves requests until ctrl-c.
    pub async fn run(self) -> Result<()> {
        tracing::info!("Server running on port {}", self.port());
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .wrap_err("Server task failed")
    }
}

/// Builds the HTTP router: the JSON API, optional static frontend, CORS and tracing.
pub fn build_router(state: AppState, config: &Config) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &'_ axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            tracing::info_span!("request", method = %request.method(), uri)
        });

    let router = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/health", get(handlers::health::api_health))
        .route("/api/start", post(handlers::start::start_handler))
        .route("/api/answer", post(handlers::answer::answer_handler))
        .route("/api/status", get(handlers::status::status_handler))
        .route("/api/leaderboard", get(handlers::leaderboard::leaderboard_handler))
        .route("/api/debug", get(handlers::debug::debug_handler));

    let router = match &config.server.static_dir {
        Some(dir) => {
            tracing::info!(dir = %dir, "Serving static frontend");
            let index = Path::new(dir).join("index.html");
            router
                .route("/api/{*rest}", any(handlers::endpoint_not_found))
                .fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => router.fallback(handlers::endpoint_not_found),
    };

    router
        .layer(cors_layer(&config.cors))
        .layer(trace_layer)
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origin = if config.allows_any() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin: {e}");
                    None
                }
            })
            .collect();
        tracing::info!("Allowed CORS origins: {}", config.allowed_origins.join(", "));
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
