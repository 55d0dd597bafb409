use std::net::SocketAddr;

use plant_care::{
    auth::TokenService, config::AppConfig, db::connection, logging::init_tracing, routes::router,
    state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env()?;
    init_tracing(&cfg.logging.rust_log);

    let tokens = TokenService::new(cfg.require_auth()?);
    let db = connection::connect(cfg.require_database()?).await?;

    let addr: SocketAddr = format!("{}:{}", cfg.general.host, cfg.general.port).parse()?;
    let state = AppState::new(cfg, db, tokens);
    let app = router(state);

    tracing::info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown requested");
}
