//! Transfer engine - atomic money movement between two cards.
//!
//! Orchestrates resolution, lifecycle refresh, authorization, the daily
//! limit, and the balance check, then performs the debit/credit/ledger-write
//! as one database transaction. Business failures discovered after the
//! attempt is constructed still persist a `FAILED` audit row before the
//! error propagates; losing the audit trail of a failed attempt is a
//! correctness bug, not acceptable behavior.

use crate::auth::{Actor, Authorizer, PrincipalDirectory};
use crate::core::ledger::{self, TransferAttempt};
use crate::core::limit::{self, LimitPolicy};
use crate::core::locks::CardLocks;
use crate::core::notify::TransferNotifier;
use crate::core::resolver::{self, CardNumberResolver};
use crate::core::{account, lifecycle};
use crate::entities::{CardStatus, card, transfer};
use crate::errors::{Error, Result};
use crate::money;
use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::sync::Arc;
use tracing::{info, warn};

/// Upper bound on the free-text description of a transfer.
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// The money-movement orchestrator.
///
/// Collaborators are injected at construction: the authorization oracle, the
/// card number resolver, the principal directory, the notification hook, and
/// the immutable limit policy. One engine serves concurrent requests; the
/// per-card lock table provides the exclusivity discipline.
pub struct TransferEngine {
    db: DatabaseConnection,
    authorizer: Arc<dyn Authorizer>,
    resolver: Arc<dyn CardNumberResolver>,
    principals: Arc<dyn PrincipalDirectory>,
    notifier: Arc<dyn TransferNotifier>,
    limits: LimitPolicy,
    locks: CardLocks,
}

impl TransferEngine {
    /// Creates an engine over the given connection and collaborators.
    pub fn new(
        db: DatabaseConnection,
        authorizer: Arc<dyn Authorizer>,
        resolver: Arc<dyn CardNumberResolver>,
        principals: Arc<dyn PrincipalDirectory>,
        notifier: Arc<dyn TransferNotifier>,
        limits: LimitPolicy,
    ) -> Self {
        Self {
            db,
            authorizer,
            resolver,
            principals,
            notifier,
            limits,
            locks: CardLocks::new(),
        }
    }

    /// Moves `amount` minor units between the two cards identified by their
    /// numbers, on behalf of `actor`.
    ///
    /// Exactly one terminal ledger row is written per invocation that gets
    /// past authorization, and balances change if and only if the returned
    /// record is `COMPLETED`.
    pub async fn transfer(
        &self,
        actor: &Actor,
        from_card_number: &str,
        to_card_number: &str,
        amount: i64,
        description: Option<String>,
    ) -> Result<transfer::Model> {
        // Input validation happens before any lookup
        let amount = money::require_positive(amount)?;
        if let Some(text) = &description {
            if text.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(Error::InvalidTransferRequest {
                    reason: format!("description exceeds {MAX_DESCRIPTION_LEN} characters"),
                });
            }
        }
        let from_number = resolver::normalize(from_card_number);
        let to_number = resolver::normalize(to_card_number);
        if from_number == to_number {
            return Err(Error::InvalidTransferRequest {
                reason: "source and target cards must be different".to_string(),
            });
        }

        self.require_active_principal(actor.id).await?;

        let from_id = self.resolver.resolve(&from_number).await?;
        let to_id = self.resolver.resolve(&to_number).await?;
        if from_id == to_id {
            return Err(Error::InvalidTransferRequest {
                reason: "source and target cards must be different".to_string(),
            });
        }

        // Exclusive locks on both cards, ascending-id order, held through
        // the limit check and the balance mutation
        let _guard = self.locks.lock_pair(from_id, to_id).await;

        let from_card = account::require_card(&self.db, from_id).await?;
        let to_card = account::require_card(&self.db, to_id).await?;
        let from_card = lifecycle::refresh_expiration(&self.db, from_card).await?;
        let to_card = lifecycle::refresh_expiration(&self.db, to_card).await?;

        // Pre-condition, not a business outcome: a denial leaves no trace
        // in the ledger
        if !self.authorizer.can_debit(actor, &from_card) {
            return Err(Error::AccessDenied {
                reason: format!(
                    "user {} cannot initiate transfer from card {}",
                    actor.id, from_card.id
                ),
            });
        }

        let attempt = TransferAttempt {
            from_card_id: from_id,
            to_card_id: to_id,
            amount,
            description,
        };

        match self.run_business_checks(&from_card, &to_card, amount).await {
            Ok(()) => {
                let txn = self.db.begin().await?;
                account::update_card_balance_atomic(&txn, from_id, -amount).await?;
                account::update_card_balance_atomic(&txn, to_id, amount).await?;
                let record = ledger::record_completed(&txn, &attempt).await?;
                txn.commit().await?;

                info!(
                    "Completed transfer {} -> {} for amount {}",
                    from_id,
                    to_id,
                    money::format(amount)
                );
                // Best-effort hook, outside the atomic unit
                self.notifier.notify(&record).await;
                Ok(record)
            }
            Err(err) if err.is_recordable_business_failure() => {
                ledger::record_failed(&self.db, &attempt).await?;
                warn!(
                    "Transfer {} -> {} for amount {} failed: {}",
                    from_id,
                    to_id,
                    money::format(amount),
                    err
                );
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// All transfers where the card is source or destination, newest first.
    /// Requires view permission on the card.
    pub async fn transfers_for_card(
        &self,
        actor: &Actor,
        card_id: i64,
    ) -> Result<Vec<transfer::Model>> {
        self.require_active_principal(actor.id).await?;
        let card = account::require_card(&self.db, card_id).await?;
        if !self.authorizer.can_view(actor, &card) {
            return Err(Error::AccessDenied {
                reason: format!(
                    "user {} cannot view transfers for card {}",
                    actor.id, card.id
                ),
            });
        }
        lifecycle::refresh_expiration(&self.db, card).await?;
        ledger::transfers_for_card(&self.db, card_id).await
    }

    /// How much of the daily ceiling the card can still spend today.
    /// `0` both when exhausted and when no ceiling is configured.
    pub async fn remaining_daily_limit(&self, card_id: i64) -> Result<i64> {
        limit::remaining_daily_limit(&self.db, self.limits, card_id, Utc::now()).await
    }

    /// The limit policy this engine was built with.
    pub const fn limit_policy(&self) -> LimitPolicy {
        self.limits
    }

    async fn require_active_principal(&self, principal_id: i64) -> Result<()> {
        if self.principals.is_active(principal_id).await? {
            Ok(())
        } else {
            Err(Error::UserInactive {
                user_id: principal_id,
            })
        }
    }

    async fn require_owner_active(&self, card: &card::Model) -> Result<()> {
        if self.principals.is_active(card.owner_id).await? {
            Ok(())
        } else {
            Err(Error::UserInactive {
                user_id: card.owner_id,
            })
        }
    }

    fn require_card_active(card: &card::Model) -> Result<()> {
        if card.status == CardStatus::Active {
            Ok(())
        } else {
            Err(Error::CardInactive {
                reason: format!("card {} is not active", card.id),
            })
        }
    }

    /// The checks whose failures are recorded as `FAILED` ledger rows:
    /// owner liveness, card status, daily limit, and sufficient balance.
    /// Runs under the per-card locks.
    async fn run_business_checks(
        &self,
        from_card: &card::Model,
        to_card: &card::Model,
        amount: i64,
    ) -> Result<()> {
        self.require_owner_active(from_card).await?;
        self.require_owner_active(to_card).await?;
        Self::require_card_active(from_card)?;
        Self::require_card_active(to_card)?;

        limit::validate_daily_limit(&self.db, self.limits, from_card.id, amount, Utc::now())
            .await?;

        if from_card.balance < amount {
            return Err(Error::InsufficientFunds {
                available: from_card.balance,
                requested: amount,
            });
        }
        Ok(())
    }
}
