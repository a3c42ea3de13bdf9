//! Card status transitions requested by operators.
//!
//! Wall-clock expiry is handled by [`crate::core::lifecycle`] and is the
//! only way a card becomes `EXPIRED`; this module covers the requested
//! transitions between `ACTIVE`, `BLOCKED`, and `CLOSED`. `CLOSED` and
//! `EXPIRED` are terminal: once a card reaches either, no requested
//! transition leaves it.

use crate::auth::{Actor, Authorizer, PrincipalDirectory};
use crate::core::{account, lifecycle};
use crate::entities::{CardStatus, card};
use crate::errors::{Error, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::sync::Arc;
use tracing::info;

/// Applies operator-requested status changes to cards.
pub struct StatusEngine {
    db: DatabaseConnection,
    authorizer: Arc<dyn Authorizer>,
    principals: Arc<dyn PrincipalDirectory>,
}

impl StatusEngine {
    pub fn new(
        db: DatabaseConnection,
        authorizer: Arc<dyn Authorizer>,
        principals: Arc<dyn PrincipalDirectory>,
    ) -> Self {
        Self {
            db,
            authorizer,
            principals,
        }
    }

    /// Moves the card to `target` on behalf of `actor`.
    ///
    /// The stored status is refreshed against the wall clock first, so a
    /// card whose expiry date has passed is treated as `EXPIRED` even if
    /// the table still says `ACTIVE`. Requesting the current status is a
    /// no-op that returns the card unchanged.
    pub async fn change_status(
        &self,
        actor: &Actor,
        card_id: i64,
        target: CardStatus,
    ) -> Result<card::Model> {
        if !self.principals.is_active(actor.id).await? {
            return Err(Error::UserInactive { user_id: actor.id });
        }

        let stored = account::require_card(&self.db, card_id).await?;
        let current = lifecycle::refresh_expiration(&self.db, stored).await?;

        if !self.authorizer.can_change_status(actor, &current, target) {
            return Err(Error::AccessDenied {
                reason: format!(
                    "user {} cannot set card {} to {}",
                    actor.id,
                    current.id,
                    target.as_str()
                ),
            });
        }

        if current.status == target {
            return Ok(current);
        }

        match (current.status, target) {
            (CardStatus::Closed, _) => Err(Error::CardInactive {
                reason: format!("card {} is closed", current.id),
            }),
            (CardStatus::Expired, _) => Err(Error::CardInactive {
                reason: format!("card {} has expired and cannot be reactivated", current.id),
            }),
            // Expiry is derived from the expiry date, never requested
            (_, CardStatus::Expired) => Err(Error::InvalidCardOperation {
                reason: "cards expire by date, not by request".to_string(),
            }),
            (from, to) => {
                let card_id = current.id;
                let mut model: card::ActiveModel = current.into();
                model.status = Set(to);
                let updated = model.update(&self.db).await?;
                info!(
                    "Card {} status changed {} -> {} by user {}",
                    card_id,
                    from.as_str(),
                    to.as_str(),
                    actor.id
                );
                Ok(updated)
            }
        }
    }
}
