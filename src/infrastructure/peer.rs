//! The transactional peer contract: a data-only surface over storage.
//! Signatures here never mention domain types — only `WalletAggregateData`
//! and primitives — so the storage layer has no way to smuggle in behaviour.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::WalletError;
use crate::infrastructure::db::DbExecutor;
use crate::infrastructure::models::WalletAggregateData;

#[async_trait]
pub trait WalletPeer: Send + Sync {
    /// Persist a full aggregate, including its child collections, in one
    /// unit of work. Rejects `data.is_fully_loaded == false` when doing so
    /// would discard children it never read: a partially-loaded aggregate
    /// must never overwrite rows it hasn't seen.
    async fn save(&self, data: &WalletAggregateData) -> Result<(), WalletError>;

    /// Open a transaction, usable by [`WalletPeer::save_within`] so two
    /// aggregate saves can share one unit of work.
    async fn begin(&self) -> Result<DbExecutor, WalletError>;

    /// Save a full aggregate using an already-open transaction instead of
    /// opening its own. Neither commits nor rolls back `tx`; the caller owns
    /// that decision once every participating save has succeeded.
    async fn save_within(&self, tx: &mut DbExecutor, data: &WalletAggregateData) -> Result<(), WalletError>;

    /// Persist only the root row — balance, name, type — without touching
    /// any child table. Used for updates that never load children.
    async fn save_root_only(&self, data: &WalletAggregateData) -> Result<(), WalletError>;

    /// Load the root row only, with empty (not merely loaded-empty) child
    /// collections and `is_fully_loaded = false`.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<WalletAggregateData>, WalletError>;

    /// Load the root row and every child row, with `is_fully_loaded = true`.
    async fn find_by_id_with_child_entities(&self, id: Uuid) -> Result<Option<WalletAggregateData>, WalletError>;

    /// Load every wallet (root rows only) belonging to a user.
    async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<WalletAggregateData>, WalletError>;

    /// Delete a wallet and every child row referencing it.
    async fn delete(&self, id: Uuid) -> Result<(), WalletError>;
}
