//! Shared test utilities.
//!
//! Common helpers for setting up in-memory test databases, creating cards
//! with sensible defaults, and wiring engines with the default collaborators.

use crate::auth::{InMemoryDirectory, RoleAuthorizer};
use crate::core::account;
use crate::core::limit::LimitPolicy;
use crate::core::notify::LoggingNotifier;
use crate::core::resolver::HashingResolver;
use crate::core::status::StatusEngine;
use crate::core::transfer::TransferEngine;
use crate::entities::{TransferStatus, card, transfer};
use crate::errors::Result;
use chrono::{DateTime, Days, Local, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::sync::Arc;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Issues an active card with no expiry date. The owner is registered as
/// active for the duration of the issuance.
pub async fn create_test_card(
    db: &DatabaseConnection,
    owner_id: i64,
    card_number: &str,
    balance: i64,
) -> Result<card::Model> {
    let principals = InMemoryDirectory::new().with_active(owner_id);
    account::issue_card(db, &principals, owner_id, card_number, None, balance).await
}

/// Issues an active card with the given expiry date and a zero balance.
/// The stored status is `ACTIVE` even when the date is in the past; tests
/// use this to exercise the lifecycle refresh.
pub async fn create_expiring_card(
    db: &DatabaseConnection,
    owner_id: i64,
    card_number: &str,
    expiry_date: NaiveDate,
) -> Result<card::Model> {
    let principals = InMemoryDirectory::new().with_active(owner_id);
    account::issue_card(db, &principals, owner_id, card_number, Some(expiry_date), 0).await
}

/// Inserts a raw ledger row with an explicit status and creation time,
/// bypassing the transfer engine. Used to stage history for limit and
/// ledger tests.
pub async fn insert_transfer_row(
    db: &DatabaseConnection,
    from_card_id: i64,
    to_card_id: i64,
    amount: i64,
    status: TransferStatus,
    created_at: DateTime<Utc>,
) -> Result<transfer::Model> {
    let model = transfer::ActiveModel {
        from_card_id: Set(from_card_id),
        to_card_id: Set(to_card_id),
        amount: Set(amount),
        description: Set(None),
        status: Set(status),
        created_at: Set(created_at),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// The local calendar date one day ago.
#[allow(clippy::expect_used)]
pub fn yesterday() -> NaiveDate {
    Local::now()
        .date_naive()
        .checked_sub_days(Days::new(1))
        .expect("date arithmetic within calendar range")
}

fn directory(active: &[i64], inactive: &[i64]) -> InMemoryDirectory {
    let mut dir = InMemoryDirectory::new();
    for &id in active {
        dir = dir.with_active(id);
    }
    for &id in inactive {
        dir = dir.with_inactive(id);
    }
    dir
}

/// Wires a [`TransferEngine`] with the default collaborators: role-based
/// authorization, hash-based number resolution, a static principal
/// directory, and the logging notifier.
pub fn test_engine(
    db: &DatabaseConnection,
    limits: LimitPolicy,
    active_principals: &[i64],
    inactive_principals: &[i64],
) -> TransferEngine {
    TransferEngine::new(
        db.clone(),
        Arc::new(RoleAuthorizer),
        Arc::new(HashingResolver::new(db.clone())),
        Arc::new(directory(active_principals, inactive_principals)),
        Arc::new(LoggingNotifier),
        limits,
    )
}

/// Wires a [`StatusEngine`] with the default collaborators.
pub fn test_status_engine(
    db: &DatabaseConnection,
    active_principals: &[i64],
    inactive_principals: &[i64],
) -> StatusEngine {
    StatusEngine::new(
        db.clone(),
        Arc::new(RoleAuthorizer),
        Arc::new(directory(active_principals, inactive_principals)),
    )
}
