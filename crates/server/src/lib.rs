//! docbrief HTTP server
//!
//! Actix-web REST API: PDF upload/extraction, summarization, question answering

pub mod error;
pub mod routes;
pub mod state;
pub mod types;

use actix_web::{web, App, HttpServer};
use docbrief_common::{AppConfig, Result};
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use state::AppState;

/// Build state from configuration and serve until shutdown
pub async fn start_server(config: AppConfig) -> Result<()> {
    let bind_addr = config.server_bind_address();
    let state = web::Data::new(AppState::new(config)?);

    info!("Starting HTTP server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    info!("HTTP server stopped");
    Ok(())
}
