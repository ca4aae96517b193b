use clothing_store_api::{app, config::Config, db};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clothing_store_api=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env();
    let database = db::connect(&config.mongodb_uri).await?;
    tokio::fs::create_dir_all(&config.uploads_dir).await?;

    let app = app(database, &config.uploads_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Service is running on port {}", config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
