//! Transfer ledger - the durable audit trail of transfer attempts.
//!
//! A [`TransferAttempt`] is the in-memory `PENDING` construction state; only
//! its terminal form (`COMPLETED` or `FAILED`) is ever inserted, exactly
//! once per attempt. Terminal rows are never mutated again.

use crate::entities::{Transfer, TransferStatus, transfer};
use crate::errors::Result;
use chrono::Utc;
use sea_orm::{Condition, ConnectionTrait, QueryOrder, Set, prelude::*};

/// A transfer attempt captured before the outcome is known.
///
/// Constructed by the transfer engine after authorization passes, so that
/// the attempt can be recorded even when a later business check fails.
#[derive(Debug, Clone)]
pub struct TransferAttempt {
    /// Card to debit
    pub from_card_id: i64,
    /// Card to credit
    pub to_card_id: i64,
    /// Amount in minor units, strictly positive
    pub amount: i64,
    /// Optional caller-supplied description
    pub description: Option<String>,
}

impl TransferAttempt {
    fn active_model(&self, status: TransferStatus) -> transfer::ActiveModel {
        transfer::ActiveModel {
            from_card_id: Set(self.from_card_id),
            to_card_id: Set(self.to_card_id),
            amount: Set(self.amount),
            description: Set(self.description.clone()),
            status: Set(status),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
    }
}

/// Persists the attempt as `FAILED`. Called on the plain connection, outside
/// any in-flight transaction, so the audit row survives a rollback.
pub async fn record_failed<C>(db: &C, attempt: &TransferAttempt) -> Result<transfer::Model>
where
    C: ConnectionTrait,
{
    let result = attempt.active_model(TransferStatus::Failed).insert(db).await?;
    Ok(result)
}

/// Persists the attempt as `COMPLETED`, inside the same transaction that
/// mutates the two balances.
pub async fn record_completed<C>(db: &C, attempt: &TransferAttempt) -> Result<transfer::Model>
where
    C: ConnectionTrait,
{
    let result = attempt
        .active_model(TransferStatus::Completed)
        .insert(db)
        .await?;
    Ok(result)
}

/// All transfers where the card is source or destination, newest first.
pub async fn transfers_for_card<C>(db: &C, card_id: i64) -> Result<Vec<transfer::Model>>
where
    C: ConnectionTrait,
{
    Transfer::find()
        .filter(
            Condition::any()
                .add(transfer::Column::FromCardId.eq(card_id))
                .add(transfer::Column::ToCardId.eq(card_id)),
        )
        .order_by_desc(transfer::Column::CreatedAt)
        .order_by_desc(transfer::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
