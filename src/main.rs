use authgate::{app, config::AppConfig, db, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "authgate=debug,axum=info,tower_http=info".to_string());
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
    let pool = db::connect(&config).await?;

    // Run migrations if present
    if let Err(e) = db::migrate(&pool).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    let addr = config.listen_addr()?;
    let state = AppState::postgres(pool, &config)?;
    app::serve(app::build_app(state), addr).await
}
