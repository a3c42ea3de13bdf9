//! Card entity - Represents a card account holding a balance.
//!
//! Each card stores a one-way hash of its number (the cleartext is never
//! persisted), the last digits for display, the owning principal's id, a
//! scale-2 balance in minor units, a lifecycle status, and an optional
//! expiry date.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Card database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cards")]
pub struct Model {
    /// Unique identifier for the card
    #[sea_orm(primary_key)]
    pub id: i64,
    /// One-way hash of the normalized card number; lookups go through this
    #[sea_orm(unique)]
    pub number_hash: String,
    /// Trailing digits of the number, kept for display only
    pub last_digits: String,
    /// Identifier of the owning principal (managed outside this core)
    pub owner_id: i64,
    /// Current balance in minor units (scale 2); never negative
    pub balance: i64,
    /// Lifecycle status governing eligibility for balance mutation
    pub status: CardStatus,
    /// Calendar date after which the card must become `Expired`
    pub expiry_date: Option<Date>,
}

/// Card lifecycle status
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum CardStatus {
    /// Eligible for transfers and status changes
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    /// Temporarily ineligible; can be reactivated
    #[sea_orm(string_value = "BLOCKED")]
    Blocked,
    /// Expiry date has passed; terminal
    #[sea_orm(string_value = "EXPIRED")]
    Expired,
    /// Closed by an administrator; terminal
    #[sea_orm(string_value = "CLOSED")]
    Closed,
}

impl CardStatus {
    /// Display name, identical to the stored string value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Blocked => "BLOCKED",
            Self::Expired => "EXPIRED",
            Self::Closed => "CLOSED",
        }
    }
}

/// Defines relationships between Card and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Transfers debited from this card
    #[sea_orm(has_many = "super::transfer::Entity")]
    OutgoingTransfers,
}

impl Related<super::transfer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OutgoingTransfers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
