//! Store server binary

use anyhow::Context;
use store_server::{api, init_logger_with_file, Config, ServerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    init_logger_with_file(
        std::env::var("LOG_LEVEL").ok().as_deref(),
        config.log_dir.as_deref(),
    );

    let state = ServerState::in_memory(config.clone());
    let app = api::router(state);

    let addr = format!("{}:{}", config.host, config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(addr = %addr, environment = %config.environment, "store-server listening");
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
