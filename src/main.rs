use std::net::SocketAddr;

use anyhow::Context;
use filingintel::config::Config;
use filingintel::create_app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load .env (if present) so OPENAI_API_KEY from file is visible
    let _ = dotenvy::dotenv();
    let config = Config::from_env()?;

    let app = create_app(&config)?;
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("Server running on http://{}", config.bind_addr);

    // Peer addresses feed the per-IP rate limiter
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
