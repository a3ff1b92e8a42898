use useradmin::{
    app::{build_app, serve, shutdown_signal},
    config::AppConfig,
    db::Database,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "useradmin=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let db = Database::open(&config.db).await?;

    if let Err(e) = db.migrate().await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    let app_state = AppState::init(&config, db.clone())?;
    let result = serve(build_app(app_state), &config.bind_addr(), shutdown_signal()).await;

    db.close().await;
    result
}
