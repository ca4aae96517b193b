use axum::{routing::get, Router};
use mongodb::Database;
use std::path::Path;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod upload;

/// Build the full application router. Exposed as a library entry point so
/// any host that can drive an axum `Router` — the bundled binary, a test
/// server, a managed runtime — can serve it.
pub fn app(db: Database, uploads_dir: &Path) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .nest("/user", routes::admin::admin_router(db.clone(), uploads_dir.to_path_buf()))
        .nest("/products", routes::products::products_router(db.clone()))
        .nest("/api/orders", routes::orders::orders_router(db))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn root_handler() -> &'static str {
    "Server is running successfully!"
}
