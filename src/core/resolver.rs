//! Card number resolution.
//!
//! The core never stores or compares cleartext card numbers. Numbers are
//! normalized (whitespace stripped) and one-way hashed; lookups go through
//! the hash. [`CardNumberResolver`] is the boundary the transfer engine
//! depends on; [`HashingResolver`] is the store-backed implementation.

use crate::entities::{Card, card};
use crate::errors::{Error, Result};
use async_trait::async_trait;
use sea_orm::prelude::*;
use sea_orm::DatabaseConnection;
use sha2::{Digest, Sha256};

/// Resolves an inbound card number to a card id.
#[async_trait]
pub trait CardNumberResolver: Send + Sync {
    /// Returns the id of the card with this number, or [`Error::NotFound`].
    async fn resolve(&self, card_number: &str) -> Result<i64>;
}

/// Strips all whitespace from a card number.
pub fn normalize(card_number: &str) -> String {
    card_number.chars().filter(|c| !c.is_whitespace()).collect()
}

/// One-way encoding of a normalized card number, as stored in `number_hash`.
pub fn encode_number(normalized_number: &str) -> String {
    hex::encode(Sha256::digest(normalized_number.as_bytes()))
}

/// Trailing digits of a card number, for display purposes only.
pub fn last_digits(card_number: &str) -> String {
    let normalized = normalize(card_number);
    let skip = normalized.len().saturating_sub(4);
    normalized.chars().skip(skip).collect()
}

/// Store-backed resolver: hash the normalized number, look up the card row.
#[derive(Debug, Clone)]
pub struct HashingResolver {
    db: DatabaseConnection,
}

impl HashingResolver {
    /// Creates a resolver over the given connection.
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CardNumberResolver for HashingResolver {
    async fn resolve(&self, card_number: &str) -> Result<i64> {
        let hash = encode_number(&normalize(card_number));
        let found = Card::find()
            .filter(card::Column::NumberHash.eq(hash))
            .one(&self.db)
            .await?;
        found.map(|c| c.id).ok_or(Error::NotFound {
            entity: "Card",
            id: "<by number>".to_string(),
        })
    }
}
