use chainsaw::config::{environment::Config, init_db};
use chainsaw::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chainsaw=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let db = init_db(&config).await?;
    tracing::info!("Connected to MySQL");

    sqlx::migrate!("./migrations").run(&db).await?;
    tracing::info!("Migrations applied");

    let port = config.port;
    let app = chainsaw::create_app(AppState::new(config, db)?);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("Server running on http://localhost:{}", port);
    axum::serve(listener, app).await?;

    Ok(())
}
