//! Transactional peer: the hard algorithmic core. Implements the
//! delete-then-insert child replacement protocol inside a single Postgres
//! transaction, with the `IsFullyLoaded` anti-footgun guard described below.

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::domain::WalletError;
use crate::infrastructure::db::DbExecutor;
use crate::infrastructure::models::{ExpenseRecordData, IncomeRecordData, TransferData, WalletAggregateData};
use crate::infrastructure::peer::WalletPeer;
use crate::infrastructure::store::{AggregateRecord, AggregateStore};

const WALLETS_TABLE: &str = "wallets";
const EXPENSES_TABLE: &str = "expense_records";
const INCOMES_TABLE: &str = "income_records";
const TRANSFERS_TABLE: &str = "transfers";

pub struct PostgresWalletPeer {
    pool: PgPool,
}

impl PostgresWalletPeer {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Root upsert plus delete-then-insert of every child collection, run
    /// against whichever executor the caller is already holding (same steps
    /// 2-3). Does not begin or commit a transaction itself.
    async fn save_aggregate(db: &mut DbExecutor, data: &WalletAggregateData) -> Result<(), WalletError> {
        if !data.is_fully_loaded {
            let expense_count = AggregateStore::new(EXPENSES_TABLE, db).count_by("wallet_id", data.id).await?;
            let income_count = AggregateStore::new(INCOMES_TABLE, db).count_by("wallet_id", data.id).await?;
            let transfer_count = AggregateStore::new(TRANSFERS_TABLE, db)
                .count_by("from_wallet_id", data.id)
                .await?;
            if expense_count + income_count + transfer_count > 0 {
                return Err(WalletError::InvalidInput(
                    "cannot save a partially-loaded wallet; call find_by_id_with_children first".to_string(),
                ));
            }
        }

        Self::upsert_root(db, data).await?;

        let mut expenses = AggregateStore::new(EXPENSES_TABLE, db);
        expenses.delete_by("wallet_id", data.id).await?;
        expenses.save_batch(&data.expense_records).await?;

        let mut incomes = AggregateStore::new(INCOMES_TABLE, db);
        incomes.delete_by("wallet_id", data.id).await?;
        incomes.save_batch(&data.income_records).await?;

        let mut transfers = AggregateStore::new(TRANSFERS_TABLE, db);
        transfers.delete_by("from_wallet_id", data.id).await?;
        transfers.save_batch(&data.transfers).await?;

        Ok(())
    }

    async fn upsert_root(db: &mut DbExecutor, data: &WalletAggregateData) -> Result<(), WalletError> {
        let query = sqlx::query(
            r#"
            INSERT INTO wallets (id, user_id, name, wallet_type, currency, balance_amount, balance_currency, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                wallet_type = excluded.wallet_type,
                balance_amount = excluded.balance_amount,
                balance_currency = excluded.balance_currency,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(data.id)
        .bind(&data.user_id)
        .bind(&data.name)
        .bind(&data.wallet_type)
        .bind(&data.currency)
        .bind(data.balance_amount)
        .bind(&data.balance_currency)
        .bind(data.created_at)
        .bind(data.updated_at);

        db.execute(query)
            .await
            .map_err(|e| WalletError::infrastructure("save wallet", e))?;
        Ok(())
    }

    async fn load_root(db: &mut DbExecutor, id: Uuid) -> Result<Option<WalletAggregateData>, WalletError> {
        let row = AggregateStore::new(WALLETS_TABLE, db).find_one::<WalletRootRow>("id", id).await?;
        Ok(row.map(WalletRootRow::into_empty_data))
    }
}

#[derive(sqlx::FromRow)]
struct WalletRootRow {
    id: Uuid,
    user_id: String,
    name: String,
    wallet_type: String,
    currency: String,
    balance_amount: i64,
    balance_currency: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl AggregateRecord for WalletRootRow {
    fn columns() -> &'static [&'static str] {
        &[
            "id",
            "user_id",
            "name",
            "wallet_type",
            "currency",
            "balance_amount",
            "balance_currency",
            "created_at",
            "updated_at",
        ]
    }

    fn bind_insert<'q>(&'q self, query: Query<'q, Postgres, PgArguments>) -> Query<'q, Postgres, PgArguments> {
        query
            .bind(self.id)
            .bind(&self.user_id)
            .bind(&self.name)
            .bind(&self.wallet_type)
            .bind(&self.currency)
            .bind(self.balance_amount)
            .bind(&self.balance_currency)
            .bind(self.created_at)
            .bind(self.updated_at)
    }

    fn id(&self) -> Uuid {
        self.id
    }
}

impl WalletRootRow {
    fn into_empty_data(self) -> WalletAggregateData {
        WalletAggregateData {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            wallet_type: self.wallet_type,
            currency: self.currency,
            balance_amount: self.balance_amount,
            balance_currency: self.balance_currency,
            created_at: self.created_at,
            updated_at: self.updated_at,
            is_fully_loaded: false,
            income_records: Vec::new(),
            expense_records: Vec::new(),
            transfers: Vec::new(),
        }
    }
}

#[async_trait]
impl WalletPeer for PostgresWalletPeer {
    #[instrument(skip(self, data), fields(wallet_id = %data.id))]
    async fn save(&self, data: &WalletAggregateData) -> Result<(), WalletError> {
        let mut tx = DbExecutor::begin(&self.pool)
            .await
            .map_err(|e| WalletError::infrastructure("begin save wallet", e))?;
        match Self::save_aggregate(&mut tx, data).await {
            Ok(()) => {
                tx.commit().await.map_err(|e| WalletError::infrastructure("commit save wallet", e))?;
                Ok(())
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err)
            }
        }
    }

    async fn begin(&self) -> Result<DbExecutor, WalletError> {
        DbExecutor::begin(&self.pool)
            .await
            .map_err(|e| WalletError::infrastructure("begin transaction", e))
    }

    #[instrument(skip(self, tx, data), fields(wallet_id = %data.id))]
    async fn save_within(&self, tx: &mut DbExecutor, data: &WalletAggregateData) -> Result<(), WalletError> {
        Self::save_aggregate(tx, data).await
    }

    #[instrument(skip(self, data), fields(wallet_id = %data.id))]
    async fn save_root_only(&self, data: &WalletAggregateData) -> Result<(), WalletError> {
        let mut db = DbExecutor::from_pool(self.pool.clone());
        Self::upsert_root(&mut db, data).await
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<WalletAggregateData>, WalletError> {
        let mut db = DbExecutor::from_pool(self.pool.clone());
        Self::load_root(&mut db, id).await
    }

    #[instrument(skip(self))]
    async fn find_by_id_with_child_entities(&self, id: Uuid) -> Result<Option<WalletAggregateData>, WalletError> {
        let mut db = DbExecutor::from_pool(self.pool.clone());
        let Some(mut data) = Self::load_root(&mut db, id).await? else {
            return Ok(None);
        };

        data.expense_records = AggregateStore::new(EXPENSES_TABLE, &mut db)
            .find_by::<ExpenseRecordData>("wallet_id", id)
            .await?;
        data.income_records = AggregateStore::new(INCOMES_TABLE, &mut db)
            .find_by::<IncomeRecordData>("wallet_id", id)
            .await?;
        data.transfers = AggregateStore::new(TRANSFERS_TABLE, &mut db)
            .find_by::<TransferData>("from_wallet_id", id)
            .await?;
        data.is_fully_loaded = true;

        Ok(Some(data))
    }

    #[instrument(skip(self))]
    async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<WalletAggregateData>, WalletError> {
        let mut db = DbExecutor::from_pool(self.pool.clone());
        let rows = db
            .fetch_all_rows::<WalletRootRow>(
                "SELECT id, user_id, name, wallet_type, currency, balance_amount, balance_currency, created_at, updated_at \
                 FROM wallets WHERE user_id = $1 ORDER BY created_at",
                user_id,
            )
            .await
            .map_err(|e| WalletError::infrastructure("list wallets for user", e))?;
        Ok(rows.into_iter().map(WalletRootRow::into_empty_data).collect())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<(), WalletError> {
        let result = sqlx::query("DELETE FROM wallets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| WalletError::infrastructure("delete wallet", e))?;
        if result.rows_affected() == 0 {
            return Err(WalletError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data(id: Uuid) -> WalletAggregateData {
        let now = chrono::Utc::now();
        WalletAggregateData {
            id,
            user_id: "u1".to_string(),
            name: "Main".to_string(),
            wallet_type: "CASH".to_string(),
            currency: "USD".to_string(),
            balance_amount: 10_000,
            balance_currency: "USD".to_string(),
            created_at: now,
            updated_at: now,
            is_fully_loaded: true,
            income_records: vec![IncomeRecordData {
                id: Uuid::new_v4(),
                wallet_id: id,
                category_id: "salary".to_string(),
                amount: 10_000,
                currency: "USD".to_string(),
                description: "paycheck".to_string(),
                date: now,
                created_at: now,
            }],
            expense_records: Vec::new(),
            transfers: Vec::new(),
        }
    }

    #[sqlx::test]
    async fn save_then_find_with_children_round_trips(pool: PgPool) -> sqlx::Result<()> {
        let peer = PostgresWalletPeer::new(pool);
        let id = Uuid::new_v4();
        let data = sample_data(id);

        peer.save(&data).await.unwrap();

        let found = peer.find_by_id_with_child_entities(id).await.unwrap().unwrap();
        assert_eq!(found.income_records.len(), 1);
        assert!(found.is_fully_loaded);
        assert_eq!(found.balance_amount, 10_000);
        Ok(())
    }

    #[sqlx::test]
    async fn find_by_id_omits_children_and_reports_not_fully_loaded(pool: PgPool) -> sqlx::Result<()> {
        let peer = PostgresWalletPeer::new(pool);
        let id = Uuid::new_v4();
        peer.save(&sample_data(id)).await.unwrap();

        let found = peer.find_by_id(id).await.unwrap().unwrap();
        assert!(found.income_records.is_empty());
        assert!(!found.is_fully_loaded);
        Ok(())
    }

    #[sqlx::test]
    async fn save_replaces_children_wholesale(pool: PgPool) -> sqlx::Result<()> {
        let peer = PostgresWalletPeer::new(pool);
        let id = Uuid::new_v4();
        let mut data = sample_data(id);
        peer.save(&data).await.unwrap();

        data.income_records.clear();
        data.expense_records.push(ExpenseRecordData {
            id: Uuid::new_v4(),
            wallet_id: id,
            category_id: "rent".to_string(),
            amount: 500,
            currency: "USD".to_string(),
            description: "rent".to_string(),
            date: data.created_at,
            created_at: data.created_at,
        });
        peer.save(&data).await.unwrap();

        let found = peer.find_by_id_with_child_entities(id).await.unwrap().unwrap();
        assert!(found.income_records.is_empty());
        assert_eq!(found.expense_records.len(), 1);
        Ok(())
    }

    #[sqlx::test]
    async fn save_rejects_partially_loaded_wallet_with_existing_children(pool: PgPool) -> sqlx::Result<()> {
        let peer = PostgresWalletPeer::new(pool);
        let id = Uuid::new_v4();
        peer.save(&sample_data(id)).await.unwrap();

        let mut partial = sample_data(id);
        partial.is_fully_loaded = false;
        partial.income_records.clear();

        let err = peer.save(&partial).await.unwrap_err();
        assert!(matches!(err, WalletError::InvalidInput(_)));

        let still_there = peer.find_by_id_with_child_entities(id).await.unwrap().unwrap();
        assert_eq!(still_there.income_records.len(), 1);
        Ok(())
    }

    #[sqlx::test]
    async fn delete_then_find_returns_absent(pool: PgPool) -> sqlx::Result<()> {
        let peer = PostgresWalletPeer::new(pool);
        let id = Uuid::new_v4();
        peer.save(&sample_data(id)).await.unwrap();

        peer.delete(id).await.unwrap();
        assert!(peer.find_by_id(id).await.unwrap().is_none());

        let err = peer.delete(id).await.unwrap_err();
        assert!(matches!(err, WalletError::NotFound(_)));
        Ok(())
    }

    #[sqlx::test]
    async fn save_within_shares_one_transaction_across_two_wallets(pool: PgPool) -> sqlx::Result<()> {
        let peer = PostgresWalletPeer::new(pool);
        let from_id = Uuid::new_v4();
        let to_id = Uuid::new_v4();
        peer.save(&sample_data(from_id)).await.unwrap();
        peer.save(&sample_data(to_id)).await.unwrap();

        let mut from_data = peer.find_by_id_with_child_entities(from_id).await.unwrap().unwrap();
        from_data.balance_amount -= 300;
        let mut to_data = peer.find_by_id_with_child_entities(to_id).await.unwrap().unwrap();
        to_data.balance_amount += 300;

        let mut tx = peer.begin().await.unwrap();
        peer.save_within(&mut tx, &from_data).await.unwrap();
        peer.save_within(&mut tx, &to_data).await.unwrap();
        tx.commit().await.unwrap();

        let from_after = peer.find_by_id(from_id).await.unwrap().unwrap();
        let to_after = peer.find_by_id(to_id).await.unwrap().unwrap();
        assert_eq!(from_after.balance_amount, 9_700);
        assert_eq!(to_after.balance_amount, 10_300);
        Ok(())
    }
}
