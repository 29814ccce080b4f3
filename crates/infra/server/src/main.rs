//! Clerk mirror server binary.
//!
//! Usage: `clerk-mirror-server [config.toml]`

use clerk_mirror_server::{load_config, MirrorConfig, MirrorServer};
use tracing::Level;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(&path)?,
        None => MirrorConfig::default(),
    }
    .with_env(|name| std::env::var(name).ok());

    // Initialize tracing
    let level = config.server.log_level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    // Create and run server
    let server = MirrorServer::in_memory(config);
    server.run().await?;

    Ok(())
}
