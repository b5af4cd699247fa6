//! Data Transfer Objects for the web layer: request/response shapes for the
//! use-case facade, plus the uniform success/error envelope every handler
//! returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to open a new wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWalletRequest {
    pub user_id: String,
    pub name: String,
    pub wallet_type: String,
    pub currency: String,
    pub initial_balance_amount: Option<i64>,
}

/// Request to post an expense against an existing wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordExpenseRequest {
    pub wallet_id: Uuid,
    pub amount: i64,
    pub currency: String,
    pub category_id: String,
    pub description: String,
    pub date: DateTime<Utc>,
}

/// Request to post an income against an existing wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordIncomeRequest {
    pub wallet_id: Uuid,
    pub amount: i64,
    pub currency: String,
    pub category_id: String,
    pub description: String,
    pub date: DateTime<Utc>,
}

/// Request to move funds between two wallets belonging to the same or
/// different users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessTransferRequest {
    pub from_wallet_id: Uuid,
    pub to_wallet_id: Uuid,
    pub amount: i64,
    pub currency: String,
    pub fee_amount: i64,
    pub description: String,
    pub date: DateTime<Utc>,
}

/// Wallet as rendered to a client: root fields plus whichever child
/// collections were loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletDto {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub wallet_type: String,
    pub balance_amount: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_fully_loaded: bool,
    pub expense_records: Vec<ExpenseRecordDto>,
    pub income_records: Vec<IncomeRecordDto>,
    pub transfers: Vec<TransferDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRecordDto {
    pub id: Uuid,
    pub category_id: String,
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeRecordDto {
    pub id: Uuid,
    pub category_id: String,
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferDto {
    pub id: Uuid,
    pub from_wallet_id: Uuid,
    pub to_wallet_id: Uuid,
    pub amount: i64,
    pub fee_amount: i64,
    pub currency: String,
    pub description: String,
    pub date: DateTime<Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Success response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(error: String, message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorResponse { error, message }),
        }
    }
}
