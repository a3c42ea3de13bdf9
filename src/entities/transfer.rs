//! Transfer entity - The audit ledger of transfer attempts.
//!
//! One row per attempt, successful or not. Rows are written once with a
//! terminal status (`COMPLETED` or `FAILED`) and never mutated afterwards;
//! `PENDING` exists only as an in-memory construction state.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transfer database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "card_transfers")]
pub struct Model {
    /// Unique identifier for the transfer attempt
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Card the amount was debited from
    pub from_card_id: i64,
    /// Card the amount was credited to
    pub to_card_id: i64,
    /// Transfer amount in minor units (scale 2); strictly positive
    pub amount: i64,
    /// Optional free-text description, bounded length, informational only
    pub description: Option<String>,
    /// Outcome of the attempt
    pub status: TransferStatus,
    /// When the attempt was made; immutable once set
    pub created_at: DateTimeUtc,
}

/// Transfer attempt status
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TransferStatus {
    /// Construction state; never observed after the engine returns
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Funds moved; both balances updated
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    /// Attempt rejected by a business rule; no balance changed
    #[sea_orm(string_value = "FAILED")]
    Failed,
}

/// Defines relationships between Transfer and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Source card of the transfer
    #[sea_orm(
        belongs_to = "super::card::Entity",
        from = "Column::FromCardId",
        to = "super::card::Column::Id"
    )]
    FromCard,
    /// Destination card of the transfer
    #[sea_orm(
        belongs_to = "super::card::Entity",
        from = "Column::ToCardId",
        to = "super::card::Column::Id"
    )]
    ToCard,
}

impl Related<super::card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FromCard.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
