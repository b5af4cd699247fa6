//! Error taxonomy shared by every layer of the wallet engine.

use uuid::Uuid;

/// Every recoverable failure mode a Wallet operation, repository, or peer can
/// surface. No method in this crate panics for a condition listed here.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch { expected: String, actual: String },

    #[error("insufficient funds in wallet {wallet_id}")]
    InsufficientFunds { wallet_id: Uuid },

    #[error("subtraction would produce a negative amount")]
    NegativeResult,

    #[error("amount must be positive, got {amount}")]
    NonPositiveAmount { amount: i64 },

    #[error("wallet {0} not found")]
    NotFound(Uuid),

    #[error("database constraint violated during {operation}: {message}")]
    ConstraintViolation { operation: String, message: String },

    #[error("infrastructure error during {operation}: {source}")]
    Infrastructure {
        operation: String,
        #[source]
        source: sqlx::Error,
    },
}

impl WalletError {
    pub fn infrastructure(operation: impl Into<String>, source: sqlx::Error) -> Self {
        match &source {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() || db_err.is_check_violation() => {
                WalletError::ConstraintViolation {
                    operation: operation.into(),
                    message: db_err.message().to_string(),
                }
            }
            _ => WalletError::Infrastructure {
                operation: operation.into(),
                source,
            },
        }
    }
}
