//! MongoDB connection setup.
//!
//! One client is created at startup and its `Database` handle is cloned into
//! every router. Server lifecycle transitions (connected, heartbeat failure,
//! disconnected) are logged and nothing more — a store that is down does not
//! stop the listener, requests simply fail at query time.

use mongodb::bson::doc;
use mongodb::event::sdam::SdamEvent;
use mongodb::event::EventHandler;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use tracing::{debug, error, info, warn};

const DEFAULT_DB_NAME: &str = "clothing_store";

pub async fn connect(uri: &str) -> mongodb::error::Result<Database> {
    let mut options = ClientOptions::parse(uri).await?;
    options.sdam_event_handler = Some(EventHandler::callback(|event: SdamEvent| match event {
        SdamEvent::ServerOpening(ev) => debug!("MongoDB server opening: {}", ev.address),
        SdamEvent::ServerHeartbeatFailed(ev) => {
            error!("MongoDB connection error: {}", ev.failure);
        }
        SdamEvent::ServerClosed(ev) => warn!("MongoDB disconnected: {}", ev.address),
        _ => {}
    }));

    let client = Client::with_options(options)?;
    let db = client
        .default_database()
        .unwrap_or_else(|| client.database(DEFAULT_DB_NAME));

    // The driver connects lazily; ping once so startup logs show whether the
    // store is reachable.
    match db.run_command(doc! { "ping": 1 }).await {
        Ok(_) => info!("Connected to MongoDB server"),
        Err(err) => error!("MongoDB connection error: {}", err),
    }

    Ok(db)
}
