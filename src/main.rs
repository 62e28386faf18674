use axum::{Extension, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

mod error;
mod handlers;
mod middleware;
mod openai_client;
mod settings;
mod youtube_client;

// AppState holds the settings snapshot read at startup. Clients are built
// per request from these values; nothing here is mutated after boot.
pub struct AppState {
    pub settings: settings::Settings,
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    let settings = settings::Settings::from_env();

    // Create the shared state
    let shared_state = Arc::new(AppState { settings });

    // Build our application with all routes and shared state
    let app = Router::new()
        .merge(handlers::youtube::youtube_routes())
        .merge(handlers::openai::openai_routes())
        .route("/api/status", axum::routing::get(api_status))
        .layer(axum::middleware::from_fn(middleware::logging::request_logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(Extension(shared_state));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .unwrap();
    tracing::info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}

// Production-grade logging configuration
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, fmt, EnvFilter, Layer};

    // Get log level from environment or default to INFO for production
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,metatube=trace,reqwest=info,hyper=info,tower=info".to_string()
        } else {
            "info,metatube=info,reqwest=warn,hyper=warn,tower=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log_level))?;

    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        // JSON logging for production (easier for log aggregation)
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed()
    } else {
        // Human-readable logging for development
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("📺 metatube starting up...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Build mode: {}",
        if cfg!(debug_assertions) { "development" } else { "production" }
    );
    tracing::info!("Log level: {}", log_level);

    Ok(())
}

// API Status endpoint
async fn api_status(
    Extension(state): Extension<Arc<AppState>>,
) -> axum::response::Json<serde_json::Value> {
    use serde_json::json;

    let youtube_read = if state.settings.youtube_api_key.is_empty() { "not_configured" } else { "configured" };
    let youtube_write = if state.settings.youtube_access_token.is_empty() { "not_configured" } else { "configured" };
    let openai = if state.settings.openai_api_key.is_empty() { "not_configured" } else { "configured" };

    axum::response::Json(json!({
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "youtube_data_api": youtube_read,
            "youtube_updates": youtube_write,
            "openai": openai
        },
        "openai_model": state.settings.openai_model,
        "endpoints": {
            "status": "/api/status",
            "youtube": "/api/youtube/*",
            "openai": "/api/openai/*"
        }
    }))
}
