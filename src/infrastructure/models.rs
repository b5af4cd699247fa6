//! Data-only records that cross the domain/storage boundary. These carry no
//! behaviour and no invariants — they are a flat projection of the Wallet
//! aggregate, following the `*DbModel` naming convention used elsewhere in
//! this codebase's infrastructure layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;
use sqlx::FromRow;
use uuid::Uuid;

use crate::infrastructure::store::AggregateRecord;

/// Root row for the `wallets` table plus (when loaded) its child rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletAggregateData {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub wallet_type: String,
    pub currency: String,
    pub balance_amount: i64,
    pub balance_currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_fully_loaded: bool,

    pub income_records: Vec<IncomeRecordData>,
    pub expense_records: Vec<ExpenseRecordData>,
    pub transfers: Vec<TransferData>,
}

/// Row for the `expense_records` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExpenseRecordData {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub category_id: String,
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl AggregateRecord for ExpenseRecordData {
    fn columns() -> &'static [&'static str] {
        &[
            "id",
            "wallet_id",
            "category_id",
            "amount",
            "currency",
            "description",
            "date",
            "created_at",
        ]
    }

    fn bind_insert<'q>(&'q self, query: Query<'q, Postgres, PgArguments>) -> Query<'q, Postgres, PgArguments> {
        query
            .bind(self.id)
            .bind(self.wallet_id)
            .bind(&self.category_id)
            .bind(self.amount)
            .bind(&self.currency)
            .bind(&self.description)
            .bind(self.date)
            .bind(self.created_at)
    }

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Row for the `income_records` table. Same shape as [`ExpenseRecordData`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IncomeRecordData {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub category_id: String,
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl AggregateRecord for IncomeRecordData {
    fn columns() -> &'static [&'static str] {
        &[
            "id",
            "wallet_id",
            "category_id",
            "amount",
            "currency",
            "description",
            "date",
            "created_at",
        ]
    }

    fn bind_insert<'q>(&'q self, query: Query<'q, Postgres, PgArguments>) -> Query<'q, Postgres, PgArguments> {
        query
            .bind(self.id)
            .bind(self.wallet_id)
            .bind(&self.category_id)
            .bind(self.amount)
            .bind(&self.currency)
            .bind(&self.description)
            .bind(self.date)
            .bind(self.created_at)
    }

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Row for the `transfers` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TransferData {
    pub id: Uuid,
    pub from_wallet_id: Uuid,
    pub to_wallet_id: Uuid,
    pub amount: i64,
    pub currency: String,
    pub fee_amount: i64,
    pub fee_currency: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl AggregateRecord for TransferData {
    fn columns() -> &'static [&'static str] {
        &[
            "id",
            "from_wallet_id",
            "to_wallet_id",
            "amount",
            "currency",
            "fee_amount",
            "fee_currency",
            "description",
            "date",
            "created_at",
        ]
    }

    fn bind_insert<'q>(&'q self, query: Query<'q, Postgres, PgArguments>) -> Query<'q, Postgres, PgArguments> {
        query
            .bind(self.id)
            .bind(self.from_wallet_id)
            .bind(self.to_wallet_id)
            .bind(self.amount)
            .bind(&self.currency)
            .bind(self.fee_amount)
            .bind(&self.fee_currency)
            .bind(&self.description)
            .bind(self.date)
            .bind(self.created_at)
    }

    fn id(&self) -> Uuid {
        self.id
    }
}
