mod app;
mod config;
mod error;
mod quick_add;
mod ui;
mod view;

use docstore::{MemoryStore, RestStore};
use engine::Engine;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "bilancio_tui={level},engine={level},docstore={level}",
            level = config.log_level
        ))
        .with_writer(std::io::stderr)
        .init();

    match config.store_url.clone() {
        Some(url) => {
            let store = RestStore::new(&url)?;
            let mut app = app::App::new(config, Engine::new(store));
            app.run().await
        }
        None => {
            tracing::info!("no store_url configured, running on the in-memory store");
            let mut app = app::App::new(config, Engine::new(MemoryStore::new()));
            app.run().await
        }
    }
}
