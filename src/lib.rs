//! Aggregate persistence and transactional consistency engine for wallets,
//! expenses, incomes, and transfers.
//!
//! Layers, inward to outward: `domain` (the Wallet aggregate and Money value
//! object, no I/O) → `application` (the repository contract and the
//! use-case facade) → `infrastructure` (the flat DTOs, the generic aggregate
//! store, and the Postgres-backed transactional peer) → `web` (request/
//! response DTOs and the response envelope for an embedding HTTP layer).

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod web;

pub use domain::{Currency, Money, Wallet, WalletError, WalletType};
