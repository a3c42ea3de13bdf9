//! Core business logic, framework-agnostic.
//!
//! Leaf modules first: `account` (card store operations), `ledger` (transfer
//! audit rows), `lifecycle` (expiry-driven status refresh), `limit` (daily
//! ceiling), `locks` (per-card exclusivity), `resolver` (number-to-card
//! lookup), `notify` (fire-and-forget hook). The `transfer` and `status`
//! engines orchestrate them.

/// Card store operations: issuance, lookups, atomic balance updates
pub mod account;
/// Durable transfer audit rows and history queries
pub mod ledger;
/// Expiry-driven card status refresh
pub mod lifecycle;
/// Daily transfer ceiling evaluation
pub mod limit;
/// Per-card exclusive locks with a fixed acquisition order
pub mod locks;
/// Fire-and-forget transfer notification hook
pub mod notify;
/// Card number resolution through the encode/lookup boundary
pub mod resolver;
/// Card status transition engine
pub mod status;
/// Transfer engine: the atomic debit/credit orchestration
pub mod transfer;
