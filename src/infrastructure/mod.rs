//! Infrastructure layer: everything that knows about SQL, connections, and
//! the flat `WalletAggregateData` DTO. Nothing here imports domain types
//! directly except inside the mapper and the repository bridge.

pub mod config;
pub mod db;
pub mod mapper;
pub mod models;
pub mod peer;
pub mod postgres_peer;
pub mod repository_bridge;
pub mod store;

pub use config::DatabaseConfig;
pub use db::DbExecutor;
pub use models::{ExpenseRecordData, IncomeRecordData, TransferData, WalletAggregateData};
pub use peer::WalletPeer;
pub use postgres_peer::PostgresWalletPeer;
pub use repository_bridge::WalletRepositoryBridge;
