//! Expiry-driven card status refresh.
//!
//! A card's expiry is wall-clock-derived, so its stored status can go stale
//! between requests without any explicit status change. This refresh must
//! run immediately before any authorization or balance decision that depends
//! on the status.

use crate::entities::{CardStatus, card};
use crate::errors::Result;
use chrono::{Local, NaiveDate};
use sea_orm::{ConnectionTrait, Set, prelude::*};

/// Refreshes a card's status against today's date.
///
/// `Closed` and `Expired` cards are returned unchanged, as is any card
/// without an expiry date. Otherwise, if the expiry date is not strictly
/// after today, the card is persisted as `Expired` and the updated row is
/// returned. Idempotent: a second call is a no-op.
pub async fn refresh_expiration<C>(db: &C, card: card::Model) -> Result<card::Model>
where
    C: ConnectionTrait,
{
    refresh_expiration_at(db, card, Local::now().date_naive()).await
}

/// [`refresh_expiration`] with an explicit "today", for deterministic tests.
pub async fn refresh_expiration_at<C>(
    db: &C,
    card: card::Model,
    today: NaiveDate,
) -> Result<card::Model>
where
    C: ConnectionTrait,
{
    if matches!(card.status, CardStatus::Closed | CardStatus::Expired) {
        return Ok(card);
    }
    let Some(expiry_date) = card.expiry_date else {
        return Ok(card);
    };
    if expiry_date > today {
        return Ok(card);
    }

    let mut model: card::ActiveModel = card.into();
    model.status = Set(CardStatus::Expired);
    let updated = model.update(db).await?;
    Ok(updated)
}
