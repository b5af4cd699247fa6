//! Database client abstraction: a thin wrapper so the generic store
//! and the transactional peer can be driven by either a pool or an
//! open transaction without duplicating SQL-building logic.
//!
//! `sqlx::PgPool` and `sqlx::Transaction` already provide the
//! query/execute/begin/commit/rollback surface this needs, with RAII
//! rollback-on-drop; `DbExecutor` only needs to paper over which of the two
//! is currently in hand.

use sqlx::postgres::{PgArguments, PgQueryResult, PgRow};
use sqlx::query::Query;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

/// Either a bare connection pool or an open transaction. The generic store
/// and the transactional peer accept `&mut DbExecutor` so the same code path
/// works whether or not a unit of work is in progress.
pub enum DbExecutor {
    Pool(PgPool),
    Tx(Transaction<'static, Postgres>),
}

impl DbExecutor {
    pub fn from_pool(pool: PgPool) -> Self {
        DbExecutor::Pool(pool)
    }

    /// Begin a transaction against the given pool.
    pub async fn begin(pool: &PgPool) -> Result<Self, sqlx::Error> {
        Ok(DbExecutor::Tx(pool.begin().await?))
    }

    /// Commit the held transaction. A no-op when wrapping a bare pool: in
    /// that mode every statement already auto-commits individually.
    pub async fn commit(self) -> Result<(), sqlx::Error> {
        match self {
            DbExecutor::Pool(_) => Ok(()),
            DbExecutor::Tx(tx) => tx.commit().await,
        }
    }

    /// Explicitly roll back the held transaction. Dropping a `DbExecutor::Tx`
    /// without calling either this or `commit` also rolls back, via sqlx's
    /// own RAII guard.
    pub async fn rollback(self) -> Result<(), sqlx::Error> {
        match self {
            DbExecutor::Pool(_) => Ok(()),
            DbExecutor::Tx(tx) => tx.rollback().await,
        }
    }

    pub async fn execute<'q>(
        &mut self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Result<PgQueryResult, sqlx::Error> {
        match self {
            DbExecutor::Pool(pool) => query.execute(pool).await,
            DbExecutor::Tx(tx) => query.execute(&mut **tx).await,
        }
    }

    pub async fn fetch_all<T>(&mut self, sql: &str, wallet_id: uuid::Uuid) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let query = sqlx::query_as::<Postgres, T>(sql).bind(wallet_id);
        match self {
            DbExecutor::Pool(pool) => query.fetch_all(pool).await,
            DbExecutor::Tx(tx) => query.fetch_all(&mut **tx).await,
        }
    }

    pub async fn fetch_count(&mut self, sql: &str, wallet_id: uuid::Uuid) -> Result<i64, sqlx::Error> {
        let query = sqlx::query_scalar::<Postgres, i64>(sql).bind(wallet_id);
        match self {
            DbExecutor::Pool(pool) => query.fetch_one(pool).await,
            DbExecutor::Tx(tx) => query.fetch_one(&mut **tx).await,
        }
    }

    pub async fn fetch_optional_row<T>(&mut self, sql: &str, id: uuid::Uuid) -> Result<Option<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let query = sqlx::query_as::<Postgres, T>(sql).bind(id);
        match self {
            DbExecutor::Pool(pool) => query.fetch_optional(pool).await,
            DbExecutor::Tx(tx) => query.fetch_optional(&mut **tx).await,
        }
    }

    pub async fn fetch_all_rows<T>(&mut self, sql: &str, user_id: &str) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let query = sqlx::query_as::<Postgres, T>(sql).bind(user_id);
        match self {
            DbExecutor::Pool(pool) => query.fetch_all(pool).await,
            DbExecutor::Tx(tx) => query.fetch_all(&mut **tx).await,
        }
    }
}
