use std::sync::{Arc, Mutex, RwLock};

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use frontdesk::config::AppConfig;
use frontdesk::db;
use frontdesk::handlers;
use frontdesk::services::ai::gemini::GeminiProvider;
use frontdesk::services::ai::AnswerProvider;
use frontdesk::services::mailer::smtp::SmtpMailer;
use frontdesk::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    if config.gemini_api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY not set, general queries will fall back to raw retrieved context");
    } else {
        tracing::info!("using Gemini answer provider (model: {})", config.gemini_model);
    }
    let llm: Box<dyn AnswerProvider> = Box::new(GeminiProvider::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    ));

    if config.smtp_username.is_empty() {
        tracing::warn!("SMTP credentials not set, confirmation emails will fail");
    }
    let mailer = SmtpMailer::new(
        config.smtp_host.clone(),
        config.smtp_port,
        config.smtp_username.clone(),
        config.smtp_password.clone(),
        config.smtp_from_name.clone(),
    );

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        llm,
        mailer: Box::new(mailer),
        rag: RwLock::new(None),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/chat", post(handlers::chat::post_message))
        .route(
            "/api/documents",
            post(handlers::documents::ingest).delete(handlers::documents::clear),
        )
        .route("/api/admin/bookings", get(handlers::admin::get_bookings))
        .route(
            "/api/admin/bookings/:id/cancel",
            post(handlers::admin::cancel_booking),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
