//! Database configuration module.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. Table
//! creation goes through `Schema::create_table_from_entity`, so the database
//! schema always matches the entity definitions without manual SQL.

use crate::entities::{Card, Transfer};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the `DATABASE_URL` environment variable, or a
/// default local `SQLite` path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/cardbank.sqlite".to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates the `cards` and `card_transfers` tables from the entity
/// definitions.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let card_table = schema.create_table_from_entity(Card);
    let transfer_table = schema.create_table_from_entity(Transfer);

    db.execute(builder.build(&card_table)).await?;
    db.execute(builder.build(&transfer_table)).await?;

    Ok(())
}
