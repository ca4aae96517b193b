//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// MongoDB connection string. The database name is taken from the URI
    /// path when present.
    pub mongodb_uri: String,
    /// Port the HTTP listener binds to.
    pub port: u16,
    /// Directory uploaded product images are written to.
    pub uploads_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017/clothing_store".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            uploads_dir: env::var("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
        }
    }
}
