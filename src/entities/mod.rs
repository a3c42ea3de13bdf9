//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod card;
pub mod transfer;

// Re-export specific types to avoid conflicts
pub use card::{CardStatus, Entity as Card, Model as CardModel};
pub use transfer::{Entity as Transfer, Model as TransferModel, TransferStatus};
