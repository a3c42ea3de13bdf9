/// Database configuration and connection management
pub mod database;

/// Transfer limit configuration from cardbank.toml and the environment
pub mod limits;
