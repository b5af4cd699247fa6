//! Generic aggregate store: parametric upsert/find/delete/batch/criteria
//! primitives, reused for the root table and every per-child-type table.
//!
//! Rust has generics, so `AggregateStore<T>` is a struct bound by the
//! [`AggregateRecord`] trait and written once, rather than duplicated per
//! row type.

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{FromRow, Postgres};

use crate::domain::WalletError;
use crate::infrastructure::db::DbExecutor;

/// A row type a generic [`AggregateStore`] can persist. `id_column` and
/// `columns` describe the table shape; `bind_insert` supplies the values for
/// an insert-or-upsert statement in the same order as `columns`.
pub trait AggregateRecord: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    /// Ordered column list, ID first. Used to build INSERT/UPSERT SQL.
    fn columns() -> &'static [&'static str];

    /// Bind this record's values, in `columns()` order, onto a query.
    fn bind_insert<'q>(&'q self, query: Query<'q, Postgres, PgArguments>) -> Query<'q, Postgres, PgArguments>;

    fn id(&self) -> uuid::Uuid;
}

/// A parametric store over one table, instantiated once per row type.
pub struct AggregateStore<'a> {
    table: &'static str,
    db: &'a mut DbExecutor,
}

impl<'a> AggregateStore<'a> {
    pub fn new(table: &'static str, db: &'a mut DbExecutor) -> Self {
        Self { table, db }
    }

    fn upsert_sql<T: AggregateRecord>(&self) -> String {
        let columns = T::columns();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${}", i)).collect();
        let updates: Vec<String> = columns[1..]
            .iter()
            .map(|c| format!("{c} = excluded.{c}"))
            .collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) DO UPDATE SET {}",
            self.table,
            columns.join(", "),
            placeholders.join(", "),
            columns[0],
            updates.join(", "),
        )
    }

    /// Upsert a single record by primary key.
    pub async fn save<T: AggregateRecord>(&mut self, record: &T) -> Result<(), WalletError> {
        let sql = self.upsert_sql::<T>();
        let query = sqlx::query(&sql);
        let query = record.bind_insert(query);
        self.db
            .execute(query)
            .await
            .map_err(|e| WalletError::infrastructure(format!("upsert into {}", self.table), e))?;
        Ok(())
    }

    /// Upsert a batch of records inside the store's current executor. When
    /// the executor is a transaction, the whole batch is atomic.
    pub async fn save_batch<T: AggregateRecord>(&mut self, records: &[T]) -> Result<(), WalletError> {
        for record in records {
            self.save(record).await?;
        }
        Ok(())
    }

    /// Delete every row in this table whose `column` equals `value`.
    pub async fn delete_by(&mut self, column: &str, value: uuid::Uuid) -> Result<u64, WalletError> {
        let sql = format!("DELETE FROM {} WHERE {} = $1", self.table, column);
        let query = sqlx::query(&sql).bind(value);
        let result = self
            .db
            .execute(query)
            .await
            .map_err(|e| WalletError::infrastructure(format!("delete from {}", self.table), e))?;
        Ok(result.rows_affected())
    }

    /// Find every row in this table whose `column` equals `value`.
    pub async fn find_by<T: AggregateRecord>(
        &mut self,
        column: &str,
        value: uuid::Uuid,
    ) -> Result<Vec<T>, WalletError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = $1 ORDER BY date",
            T::columns().join(", "),
            self.table,
            column
        );
        let rows = self
            .db
            .fetch_all::<T>(&sql, value)
            .await
            .map_err(|e| WalletError::infrastructure(format!("find in {}", self.table), e))?;
        Ok(rows)
    }

    /// Find the single row in this table whose `column` equals `value`, if
    /// any. The id-based lookup variant of the generic store, used by the
    /// transactional peer to load a root row through the same abstraction
    /// the child tables use instead of hand-written SQL.
    pub async fn find_one<T: AggregateRecord>(
        &mut self,
        column: &str,
        value: uuid::Uuid,
    ) -> Result<Option<T>, WalletError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = $1",
            T::columns().join(", "),
            self.table,
            column
        );
        self.db
            .fetch_optional_row::<T>(&sql, value)
            .await
            .map_err(|e| WalletError::infrastructure(format!("find one in {}", self.table), e))
    }

    /// Count rows whose `column` equals `value`, used by the anti-footgun
    /// guard in the transactional peer.
    pub async fn count_by(&mut self, column: &str, value: uuid::Uuid) -> Result<i64, WalletError> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE {} = $1", self.table, column);
        self.db
            .fetch_count(&sql, value)
            .await
            .map_err(|e| WalletError::infrastructure(format!("count in {}", self.table), e))
    }
}
