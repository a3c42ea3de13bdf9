//! Authorization boundary of the core.
//!
//! The engines never inspect role collections; they depend on the boolean
//! verdicts of [`Authorizer`] and on [`PrincipalDirectory`] for owner
//! liveness. Both are implemented by the surrounding access-control layer in
//! production; [`RoleAuthorizer`] and [`InMemoryDirectory`] are the default
//! implementations used by the bootstrap binary and the tests.

use crate::entities::{CardStatus, card};
use crate::errors::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;

/// Role of an acting principal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    /// Regular card holder; may only operate on own cards
    User,
    /// Administrator; may operate on any card
    Admin,
}

/// The principal on whose behalf an operation runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    /// Principal identifier, matching card `owner_id` values
    pub id: i64,
    /// Privilege level of the principal
    pub role: Role,
}

impl Actor {
    /// Creates a regular-user actor.
    pub const fn user(id: i64) -> Self {
        Self {
            id,
            role: Role::User,
        }
    }

    /// Creates an administrator actor.
    pub const fn admin(id: i64) -> Self {
        Self {
            id,
            role: Role::Admin,
        }
    }

    /// Whether the actor holds the administrator role.
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Authorization oracle consulted before any sensitive operation.
///
/// Verdicts are pure allow/deny decisions over the actor and the card; the
/// engines never see role representations.
pub trait Authorizer: Send + Sync {
    /// May the actor move funds out of this card?
    fn can_debit(&self, actor: &Actor, card: &card::Model) -> bool;
    /// May the actor view this card's transfer history?
    fn can_view(&self, actor: &Actor, card: &card::Model) -> bool;
    /// May the actor set this card to `target` status?
    fn can_change_status(&self, actor: &Actor, card: &card::Model, target: CardStatus) -> bool;
}

/// Default ownership-or-admin authorization rules.
///
/// Admins may do anything. Owners may debit and view their own cards and may
/// only toggle them between `Active` and `Blocked`; closing a card is an
/// administrative action.
#[derive(Debug, Default, Clone, Copy)]
pub struct RoleAuthorizer;

impl RoleAuthorizer {
    fn owns(actor: &Actor, card: &card::Model) -> bool {
        actor.id == card.owner_id
    }
}

impl Authorizer for RoleAuthorizer {
    fn can_debit(&self, actor: &Actor, card: &card::Model) -> bool {
        actor.is_admin() || Self::owns(actor, card)
    }

    fn can_view(&self, actor: &Actor, card: &card::Model) -> bool {
        actor.is_admin() || Self::owns(actor, card)
    }

    fn can_change_status(&self, actor: &Actor, card: &card::Model, target: CardStatus) -> bool {
        if actor.is_admin() {
            return true;
        }
        Self::owns(actor, card) && matches!(target, CardStatus::Active | CardStatus::Blocked)
    }
}

/// Lookup of principal liveness, backed by the external identity system.
#[async_trait]
pub trait PrincipalDirectory: Send + Sync {
    /// Whether the principal exists and is active. Unknown principals fail
    /// with [`Error::NotFound`].
    async fn is_active(&self, principal_id: i64) -> Result<bool>;
}

/// Static principal directory for tests and the bootstrap binary.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDirectory {
    principals: HashMap<i64, bool>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an active principal.
    #[must_use]
    pub fn with_active(mut self, principal_id: i64) -> Self {
        self.principals.insert(principal_id, true);
        self
    }

    /// Registers an inactive (blocked/deleted) principal.
    #[must_use]
    pub fn with_inactive(mut self, principal_id: i64) -> Self {
        self.principals.insert(principal_id, false);
        self
    }
}

#[async_trait]
impl PrincipalDirectory for InMemoryDirectory {
    async fn is_active(&self, principal_id: i64) -> Result<bool> {
        self.principals
            .get(&principal_id)
            .copied()
            .ok_or_else(|| Error::NotFound {
                entity: "User",
                id: principal_id.to_string(),
            })
    }
}
