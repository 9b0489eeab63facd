pub mod app;
pub mod calendar;
pub mod config;
pub mod error;
pub mod event;
pub mod lookup;
pub mod reconcile;
pub mod resolver;

use anyhow::Result;
use log::info;

pub async fn run() -> Result<()> {
    let app = app::Application::new();
    info!("Initializing slated");
    app.run().await
}

pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

// Re-export commonly used types
pub use config::Config;
pub use error::Error;
pub use event::{NormalizedEvent, RemoteEvent};
pub use reconcile::Outcome;
