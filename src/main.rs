//! Option Signal Backend Server
//!
//! REST and WebSocket server for NSE option-chain signal scans.

use option_signal_backend::api::create_router;
use option_signal_backend::config::Config;
use option_signal_backend::state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use option_signal_backend::chain::{Row, ScanSide, Side};
use option_signal_backend::models::{
    BreakoutScanRequest, BreakoutScanResponse, ChainResponse, HealthResponse, ScanResult,
    ScanSummary, SpreadScanRequest, SpreadScanResponse, SuggestedResponse, SurgeScanRequest,
    SurgeScanResponse, SymbolSpreadMatches,
};
use option_signal_backend::signal::{Bias, BreakoutHit, StraddleInfo, Strategy};
use option_signal_backend::spread::SpreadMatch;
use option_signal_backend::surge::{Severity, SurgeEvent, SurgeKind};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        option_signal_backend::api::handlers::health_check,
        option_signal_backend::api::handlers::get_option_chain,
        option_signal_backend::api::handlers::breakout_scan,
        option_signal_backend::api::handlers::strategy_ltp_scan,
        option_signal_backend::api::handlers::premium_surge,
        option_signal_backend::api::handlers::suggested_symbols,
        option_signal_backend::api::websocket::ws_handler,
    ),
    components(
        schemas(
            HealthResponse,
            ChainResponse,
            Row,
            Side,
            ScanSide,
            BreakoutScanRequest,
            BreakoutScanResponse,
            ScanResult,
            ScanSummary,
            BreakoutHit,
            Strategy,
            Bias,
            StraddleInfo,
            SpreadScanRequest,
            SpreadScanResponse,
            SymbolSpreadMatches,
            SpreadMatch,
            SurgeScanRequest,
            SurgeScanResponse,
            SurgeEvent,
            Severity,
            SurgeKind,
            SuggestedResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Chain", description = "On-demand option chain access"),
        (name = "Scans", description = "Breakout, spread and surge scans"),
        (name = "Reference", description = "Static symbol reference data"),
        (name = "WebSocket", description = "Realtime scan push"),
    ),
    info(
        title = "Option Signal API",
        version = "0.1.0",
        description = "REST and WebSocket API for NSE option-chain signal scans",
        license(name = "MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; missing file means defaults
    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let mut config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path)?
    } else {
        warn!("Config file {} not found, using defaults", config_path);
        Config::default()
    };

    // Environment overrides for host/port
    if let Ok(host) = std::env::var("HOST") {
        config.server.host = host;
    }
    if let Ok(port) = std::env::var("PORT") {
        config.server.port = port.parse()?;
    }

    let host = config.server.host.clone();
    let port = config.server.port;

    // Create application state
    let state = Arc::new(AppState::from_config(config)?);

    // Warm up the upstream session so the first scan starts with cookies
    state.upstream.prime().await;

    info!("Starting Option Signal Backend on {}:{}", host, port);
    info!(
        "Swagger UI available at http://{}:{}/swagger-ui/",
        host, port
    );

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = create_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start the server
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
