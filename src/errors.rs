//! Unified error types for the money-movement core.
//!
//! Business-rule failures (not-found, access-denied, inactive card/owner,
//! limit, insufficient funds, and malformed requests) are distinct variants
//! so failure paths are exhaustively type-checked.
//! Infrastructure failures (`Database`, `Config`) are kept separate and are
//! the only ones a caller should retry.

use thiserror::Error;

/// All errors produced by the core.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or environment variable problem.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of what failed to load or parse
        message: String,
    },

    /// Underlying store failure. Retryable; never a business verdict.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A referenced card, transfer, or principal does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up (e.g. "Card", "User")
        entity: &'static str,
        /// Identifier that failed to resolve
        id: String,
    },

    /// The authorization oracle denied the operation, or a self-service
    /// status change targeted a status the owner may not set.
    #[error("Access denied: {reason}")]
    AccessDenied {
        /// Why the actor may not perform the operation
        reason: String,
    },

    /// Malformed caller input: self-transfer, non-positive amount, over-long
    /// description, or invalid issuance parameters. Rejected before any
    /// lookup.
    #[error("Invalid transfer request: {reason}")]
    InvalidTransferRequest {
        /// Which input was rejected
        reason: String,
    },

    /// The card's status makes it ineligible for the requested operation.
    #[error("Card inactive: {reason}")]
    CardInactive {
        /// Which card and why it is ineligible
        reason: String,
    },

    /// The owning principal is not active.
    #[error("User {user_id} is not active")]
    UserInactive {
        /// Identifier of the inactive principal
        user_id: i64,
    },

    /// Source card balance cannot cover the requested amount.
    #[error("Insufficient funds: available {available}, requested {requested} (minor units)")]
    InsufficientFunds {
        /// Balance available on the source card, in minor units
        available: i64,
        /// Amount the transfer asked for, in minor units
        requested: i64,
    },

    /// The daily transfer ceiling would be exceeded. Carries the configured
    /// ceiling for client display.
    #[error("Daily transfer limit of {limit} minor units exceeded")]
    LimitExceeded {
        /// Configured daily ceiling, in minor units
        limit: i64,
    },

    /// A status transition that no actor is permitted to make.
    #[error("Invalid card operation: {reason}")]
    InvalidCardOperation {
        /// Why the transition is intrinsically illegal
        reason: String,
    },

    /// A resource that must be unique already exists.
    #[error("Duplicate resource: {resource}")]
    Duplicate {
        /// Description of the conflicting resource
        resource: String,
    },
}

impl Error {
    /// Whether this is a business-rule failure that, once a transfer attempt
    /// has been constructed, must still be recorded as a `FAILED` ledger row
    /// before propagating.
    pub const fn is_recordable_business_failure(&self) -> bool {
        matches!(
            self,
            Self::CardInactive { .. }
                | Self::UserInactive { .. }
                | Self::InsufficientFunds { .. }
                | Self::LimitExceeded { .. }
        )
    }

    /// Whether the caller may retry the operation unchanged. Only
    /// infrastructure failures qualify; business verdicts are final.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_recordable_business_failures() {
        assert!(
            Error::InsufficientFunds {
                available: 100,
                requested: 200
            }
            .is_recordable_business_failure()
        );
        assert!(Error::LimitExceeded { limit: 50_000 }.is_recordable_business_failure());
        assert!(
            Error::CardInactive {
                reason: "card 1 is blocked".to_string()
            }
            .is_recordable_business_failure()
        );
        assert!(Error::UserInactive { user_id: 7 }.is_recordable_business_failure());

        // Pre-condition failures never produce a ledger row
        assert!(
            !Error::AccessDenied {
                reason: "not the owner".to_string()
            }
            .is_recordable_business_failure()
        );
        assert!(
            !Error::NotFound {
                entity: "Card",
                id: "9".to_string()
            }
            .is_recordable_business_failure()
        );
        assert!(
            !Error::InvalidTransferRequest {
                reason: "same card".to_string()
            }
            .is_recordable_business_failure()
        );
    }

    #[test]
    fn test_retryable_is_infrastructure_only() {
        assert!(
            Error::Database(sea_orm::DbErr::Custom("connection lost".to_string())).is_retryable()
        );
        assert!(!Error::LimitExceeded { limit: 1 }.is_retryable());
        assert!(
            !Error::Config {
                message: "bad toml".to_string()
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_display() {
        let err = Error::InsufficientFunds {
            available: 5000,
            requested: 5001,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds: available 5000, requested 5001 (minor units)"
        );
        assert_eq!(
            Error::LimitExceeded { limit: 50_000 }.to_string(),
            "Daily transfer limit of 50000 minor units exceeded"
        );
    }
}
