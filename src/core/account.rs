//! Card store operations - issuance, lookups, and balance updates.
//!
//! Issuance and reads live here; balance mutation is a single atomic SQL
//! expression so concurrent transfers can never lose an update. Cards are
//! never physically deleted by this core.

use crate::auth::PrincipalDirectory;
use crate::core::{lifecycle, resolver};
use crate::entities::{Card, CardStatus, card};
use crate::errors::{Error, Result};
use sea_orm::{DatabaseConnection, Set, prelude::*};

/// Issues a new card for an owner with a caller-supplied opening balance.
///
/// The number is normalized and stored only as a one-way hash plus its last
/// digits. The owner must exist and be active in the principal directory.
/// Duplicate numbers are rejected, and the opening balance must not be
/// negative. The card starts `Active`.
pub async fn issue_card(
    db: &DatabaseConnection,
    principals: &dyn PrincipalDirectory,
    owner_id: i64,
    card_number: &str,
    expiry_date: Option<Date>,
    opening_balance: i64,
) -> Result<card::Model> {
    let normalized = resolver::normalize(card_number);
    if normalized.is_empty() {
        return Err(Error::InvalidTransferRequest {
            reason: "card number must not be empty".to_string(),
        });
    }
    if opening_balance < 0 {
        return Err(Error::InvalidTransferRequest {
            reason: "opening balance must not be negative".to_string(),
        });
    }
    if !principals.is_active(owner_id).await? {
        return Err(Error::UserInactive { user_id: owner_id });
    }

    let number_hash = resolver::encode_number(&normalized);
    let existing = Card::find()
        .filter(card::Column::NumberHash.eq(number_hash.clone()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::Duplicate {
            resource: "card with the provided number".to_string(),
        });
    }

    let model = card::ActiveModel {
        number_hash: Set(number_hash),
        last_digits: Set(resolver::last_digits(&normalized)),
        owner_id: Set(owner_id),
        balance: Set(opening_balance),
        status: Set(CardStatus::Active),
        expiry_date: Set(expiry_date),
        ..Default::default()
    };

    let result = model.insert(db).await?;
    Ok(result)
}

/// Finds a card by its id, failing with [`Error::NotFound`] if absent.
pub async fn require_card<C>(db: &C, card_id: i64) -> Result<card::Model>
where
    C: ConnectionTrait,
{
    Card::find_by_id(card_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Card",
            id: card_id.to_string(),
        })
}

/// Returns all cards belonging to an owner, each with its lifecycle status
/// refreshed as of today.
pub async fn get_cards_for_owner(
    db: &DatabaseConnection,
    owner_id: i64,
) -> Result<Vec<card::Model>> {
    let cards = Card::find()
        .filter(card::Column::OwnerId.eq(owner_id))
        .all(db)
        .await?;

    let mut refreshed = Vec::with_capacity(cards.len());
    for c in cards {
        refreshed.push(lifecycle::refresh_expiration(db, c).await?);
    }
    Ok(refreshed)
}

/// Atomically adds a delta to a card's balance.
///
/// Uses a single SQL UPDATE (`balance = balance + delta`) rather than
/// read-modify-write, so concurrent updates cannot be lost.
pub async fn update_card_balance_atomic<C>(
    db: &C,
    card_id: i64,
    amount_delta: i64,
) -> Result<card::Model>
where
    C: ConnectionTrait,
{
    use sea_orm::sea_query::Expr;

    // First verify the card exists
    let _card = require_card(db, card_id).await?;

    Card::update_many()
        .col_expr(
            card::Column::Balance,
            Expr::col(card::Column::Balance).add(amount_delta),
        )
        .filter(card::Column::Id.eq(card_id))
        .exec(db)
        .await?;

    require_card(db, card_id).await
}
