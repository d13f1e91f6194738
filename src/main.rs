use user_api::{app, config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    app::init_tracing(&config.log);

    let state = AppState::init(config).await?;
    app::serve(state).await
}
