//! Bootstrap binary: initializes the database schema and validates the
//! transfer-limit configuration, then reports the resolved settings. The
//! engines themselves are embedded by whatever transport layer hosts this
//! core.

use cardbank::errors::Result;
use cardbank::{config, money};
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Resolve the transfer-limit configuration
    let app_config = config::limits::load_default_config()?;
    let policy = config::limits::limit_policy(&app_config)?;
    match policy.daily_ceiling() {
        Some(ceiling) => info!("Daily transfer limit: {}", money::format(ceiling)),
        None => info!("No daily transfer limit configured"),
    }

    // 4. Initialize the database
    let db = config::database::create_connection().await?;
    config::database::create_tables(&db).await?;
    info!(
        "Database initialized at {}",
        config::database::get_database_url()
    );

    Ok(())
}
