//! Domain-facing repository contract: the only storage interface the
//! use-case layer is allowed to depend on. Speaks entirely in `Wallet`
//! aggregates — no DTO, no SQL, no transaction ever appears here.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Wallet, WalletError};

#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// Persist the entire aggregate, including its child collections,
    /// atomically.
    async fn save(&self, wallet: &Wallet) -> Result<(), WalletError>;

    /// Load the root only; the returned wallet reports `is_fully_loaded() == false`.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Wallet>, WalletError>;

    /// Load the root and every child collection.
    async fn find_by_id_with_children(&self, id: Uuid) -> Result<Option<Wallet>, WalletError>;

    /// Load every wallet (root rows only) belonging to a user, in
    /// insertion-stable order.
    async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<Wallet>, WalletError>;

    /// Remove the aggregate and cascade-delete its children.
    async fn delete(&self, id: Uuid) -> Result<(), WalletError>;
}
