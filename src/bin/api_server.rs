// src/bin/api_server.rs

use book_tracker::infra::{config, logging};
use book_tracker::transport;
use book_tracker::{BookService, SqliteBookStore};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_dotenv();
    logging::init();

    let port = config::port()?;
    let db_path = config::db_path();
    let max_connections = config::db_max_connections()?;

    // --- Store Initialization ---
    tracing::info!(db_path = %db_path, max_connections, "opening book store");
    let store = SqliteBookStore::connect(&db_path, max_connections)
        .await
        .map_err(|e| anyhow::anyhow!("failed to initialise storage at {}: {}", db_path, e))?;

    let app_state = transport::http::AppState::new(BookService::new(Arc::new(store)));

    // --- API Server Initialization ---
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(transport::http::cors_layer());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("book tracker listening on http://0.0.0.0:{}", port);
    tracing::info!("API endpoints under http://localhost:{}{}", port, transport::http::API_PREFIX);
    tracing::info!("Swagger UI available at http://localhost:{}/swagger-ui", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("graceful shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received, draining connections");
}
