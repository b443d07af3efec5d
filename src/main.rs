mod error;
mod llm;
mod project;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .map_err(|e| format!("invalid PORT: {e}"))?;
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".into());

    // Non-fatal: generation calls report the config error until it is fixed.
    let llm: Result<Arc<dyn llm::LlmComplete>, _> = match llm::LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(provider = client.provider().as_str(), model = client.model(), "LLM client initialized");
            Ok(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured, AI generation disabled");
            Err(e)
        }
    };

    let state = state::AppState::new(llm);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("{bind_addr}:{port}")).await?;

    tracing::info!(%bind_addr, %port, "circuitsim listening");
    axum::serve(listener, app).await?;
    Ok(())
}
