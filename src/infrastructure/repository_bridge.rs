//! Repository bridge: implements the domain-facing repository contract
//! by composing the mapper and the peer. Performs no transaction
//! control of its own — that responsibility belongs to the peer.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::repository::WalletRepository;
use crate::domain::{Wallet, WalletError};
use crate::infrastructure::mapper;
use crate::infrastructure::peer::WalletPeer;

pub struct WalletRepositoryBridge {
    peer: Arc<dyn WalletPeer>,
}

impl WalletRepositoryBridge {
    pub fn new(peer: Arc<dyn WalletPeer>) -> Self {
        Self { peer }
    }

    pub fn peer(&self) -> Arc<dyn WalletPeer> {
        self.peer.clone()
    }
}

#[async_trait]
impl WalletRepository for WalletRepositoryBridge {
    async fn save(&self, wallet: &Wallet) -> Result<(), WalletError> {
        let data = mapper::to_data(wallet);
        self.peer.save(&data).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Wallet>, WalletError> {
        match self.peer.find_by_id(id).await? {
            Some(data) => Ok(Some(mapper::to_domain(data)?)),
            None => Ok(None),
        }
    }

    async fn find_by_id_with_children(&self, id: Uuid) -> Result<Option<Wallet>, WalletError> {
        match self.peer.find_by_id_with_child_entities(id).await? {
            Some(data) => Ok(Some(mapper::to_domain(data)?)),
            None => Ok(None),
        }
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<Wallet>, WalletError> {
        self.peer
            .find_by_user_id(user_id)
            .await?
            .into_iter()
            .map(mapper::to_domain)
            .collect()
    }

    async fn delete(&self, id: Uuid) -> Result<(), WalletError> {
        self.peer.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::DbExecutor;
    use crate::infrastructure::models::WalletAggregateData;
    use std::sync::Mutex;

    /// An in-memory double for [`WalletPeer`]: exercises the bridge without
    /// a database.
    struct MockWalletPeer {
        rows: Mutex<Vec<WalletAggregateData>>,
    }

    impl MockWalletPeer {
        fn new() -> Self {
            Self { rows: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl WalletPeer for MockWalletPeer {
        async fn save(&self, data: &WalletAggregateData) -> Result<(), WalletError> {
            let mut rows = self.rows.lock().unwrap();
            rows.retain(|r| r.id != data.id);
            rows.push(data.clone());
            Ok(())
        }

        async fn save_root_only(&self, data: &WalletAggregateData) -> Result<(), WalletError> {
            self.save(data).await
        }

        async fn begin(&self) -> Result<DbExecutor, WalletError> {
            unimplemented!("not exercised by bridge tests")
        }

        async fn save_within(&self, _tx: &mut DbExecutor, data: &WalletAggregateData) -> Result<(), WalletError> {
            self.save(data).await
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<WalletAggregateData>, WalletError> {
            Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
        }

        async fn find_by_id_with_child_entities(&self, id: Uuid) -> Result<Option<WalletAggregateData>, WalletError> {
            self.find_by_id(id).await
        }

        async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<WalletAggregateData>, WalletError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn delete(&self, id: Uuid) -> Result<(), WalletError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|r| r.id != id);
            if rows.len() == before {
                return Err(WalletError::NotFound(id));
            }
            Ok(())
        }
    }

    fn sample_wallet() -> Wallet {
        Wallet::new(
            "u1".to_string(),
            "Main".to_string(),
            crate::domain::wallet::WalletType::Cash,
            crate::domain::money::Currency::new("USD").unwrap(),
            5_000,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn save_then_find_by_id_round_trips() {
        let bridge = WalletRepositoryBridge::new(Arc::new(MockWalletPeer::new()));
        let wallet = sample_wallet();
        bridge.save(&wallet).await.unwrap();

        let found = bridge.find_by_id(wallet.id).await.unwrap().unwrap();
        assert_eq!(found.id, wallet.id);
        assert_eq!(found.balance(), wallet.balance());
    }

    #[tokio::test]
    async fn find_by_id_returns_none_for_unknown_wallet() {
        let bridge = WalletRepositoryBridge::new(Arc::new(MockWalletPeer::new()));
        assert!(bridge.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_surfaces_not_found_from_peer() {
        let bridge = WalletRepositoryBridge::new(Arc::new(MockWalletPeer::new()));
        let err = bridge.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, WalletError::NotFound(_)));
    }
}
