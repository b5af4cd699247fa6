//! Use-case facade: the surface the external HTTP layer calls. Every
//! method maps domain and infrastructure errors into the uniform
//! `UseCaseResult<T>` envelope and never leaks a raw `sqlx::Error` outward.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{error, info};
use uuid::Uuid;

use crate::application::repository::WalletRepository;
use crate::domain::money::Currency;
use crate::domain::wallet::WalletType;
use crate::domain::{Money, Wallet, WalletError};
use crate::infrastructure::peer::WalletPeer;

/// Consumed, not implemented, by this crate: a lookup over the category
/// aggregate, reached through an interface so the wallet never holds a
/// reference back into the category subsystem.
#[async_trait]
pub trait CategoryValidator: Send + Sync {
    async fn validate_subcategory_exists(&self, subcategory_id: &str) -> Result<(), WalletError>;
}

/// The uniform envelope every use-case returns: success carries `T`, failure
/// carries the error that produced it. The web layer maps this onto
/// `web::dto::ApiResponse<T>` and an HTTP status.
pub type UseCaseResult<T> = Result<T, WalletError>;

pub struct WalletFacade {
    repository: Arc<dyn WalletRepository>,
    peer: Arc<dyn WalletPeer>,
    category_validator: Option<Arc<dyn CategoryValidator>>,
}

impl WalletFacade {
    pub fn new(
        repository: Arc<dyn WalletRepository>,
        peer: Arc<dyn WalletPeer>,
        category_validator: Option<Arc<dyn CategoryValidator>>,
    ) -> Self {
        Self {
            repository,
            peer,
            category_validator,
        }
    }

    async fn validate_subcategory(&self, subcategory_id: &str) -> UseCaseResult<()> {
        if let Some(validator) = &self.category_validator {
            validator.validate_subcategory_exists(subcategory_id).await?;
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn create_wallet(
        &self,
        user_id: String,
        name: String,
        wallet_type: &str,
        currency: &str,
        initial_balance_amount: Option<i64>,
    ) -> UseCaseResult<Uuid> {
        let wallet_type = WalletType::parse(wallet_type)?;
        let currency = Currency::new(currency)?;
        let wallet = Wallet::new(user_id, name, wallet_type, currency, initial_balance_amount.unwrap_or(0))?;

        self.repository.save(&wallet).await.map_err(|e| {
            error!(wallet_id = %wallet.id, error = %e, "failed to save new wallet");
            e
        })?;
        info!(wallet_id = %wallet.id, "created wallet");
        Ok(wallet.id)
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_expense(
        &self,
        wallet_id: Uuid,
        subcategory_id: String,
        amount: i64,
        currency: &str,
        description: String,
        date: DateTime<Utc>,
    ) -> UseCaseResult<Uuid> {
        self.validate_subcategory(&subcategory_id).await?;

        let mut wallet = self
            .repository
            .find_by_id_with_children(wallet_id)
            .await?
            .ok_or(WalletError::NotFound(wallet_id))?;

        let money = Money::new(amount, Currency::new(currency)?)?;
        let record = wallet.add_expense(money, subcategory_id, description, date)?;
        self.repository.save(&wallet).await?;
        info!(wallet_id = %wallet_id, expense_id = %record.id, "recorded expense");
        Ok(record.id)
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_income(
        &self,
        wallet_id: Uuid,
        subcategory_id: String,
        amount: i64,
        currency: &str,
        description: String,
        date: DateTime<Utc>,
    ) -> UseCaseResult<Uuid> {
        self.validate_subcategory(&subcategory_id).await?;

        let mut wallet = self
            .repository
            .find_by_id_with_children(wallet_id)
            .await?
            .ok_or(WalletError::NotFound(wallet_id))?;

        let money = Money::new(amount, Currency::new(currency)?)?;
        let record = wallet.add_income(money, subcategory_id, description, date)?;
        self.repository.save(&wallet).await?;
        info!(wallet_id = %wallet_id, income_id = %record.id, "recorded income");
        Ok(record.id)
    }

    /// Moves funds between two wallets. Both saves share a single unit of
    /// work via the peer's `save_within`, so a crash partway through never
    /// leaves money "in flight".
    #[tracing::instrument(skip(self))]
    pub async fn process_transfer(
        &self,
        from_wallet_id: Uuid,
        to_wallet_id: Uuid,
        amount: i64,
        currency: &str,
        fee_amount: i64,
        description: String,
        date: DateTime<Utc>,
    ) -> UseCaseResult<Uuid> {
        let currency = Currency::new(currency)?;
        let money = Money::new(amount, currency.clone())?;
        let fee = Money::new(fee_amount, currency)?;

        let mut from_wallet = self
            .repository
            .find_by_id_with_children(from_wallet_id)
            .await?
            .ok_or(WalletError::NotFound(from_wallet_id))?;
        let mut to_wallet = self
            .repository
            .find_by_id_with_children(to_wallet_id)
            .await?
            .ok_or(WalletError::NotFound(to_wallet_id))?;

        from_wallet.process_outgoing_transfer(&money, &fee)?;
        let transfer = from_wallet.create_transfer(to_wallet_id, money.clone(), fee, description, date)?;
        to_wallet.process_incoming_transfer(&money)?;

        let mut tx = self.peer.begin().await?;
        let from_data = crate::infrastructure::mapper::to_data(&from_wallet);
        let to_data = crate::infrastructure::mapper::to_data(&to_wallet);

        let first = self.peer.save_within(&mut tx, &from_data).await;
        let result = match first {
            Ok(()) => self.peer.save_within(&mut tx, &to_data).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => {
                tx.commit().await.map_err(|e| WalletError::infrastructure("commit transfer", e))?;
            }
            Err(err) => {
                let _ = tx.rollback().await;
                error!(from_wallet_id = %from_wallet_id, to_wallet_id = %to_wallet_id, error = %err, "transfer failed");
                return Err(err);
            }
        }

        info!(from_wallet_id = %from_wallet_id, to_wallet_id = %to_wallet_id, transfer_id = %transfer.id, "processed transfer");
        Ok(transfer.id)
    }

    /// Updates `name`/`wallet_type` only, so it loads and saves the root row
    /// alone via the peer's `save_root_only` rather than the full
    /// child-replacing `repository.save`.
    #[tracing::instrument(skip(self))]
    pub async fn update_wallet(&self, wallet_id: Uuid, name: Option<String>, wallet_type: Option<&str>) -> UseCaseResult<()> {
        let mut wallet = self
            .repository
            .find_by_id(wallet_id)
            .await?
            .ok_or(WalletError::NotFound(wallet_id))?;

        if let Some(name) = name {
            wallet.update_name(name)?;
        }
        if let Some(wallet_type) = wallet_type {
            wallet.update_type(WalletType::parse(wallet_type)?);
        }
        let data = crate::infrastructure::mapper::to_data(&wallet);
        self.peer.save_root_only(&data).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_wallet(&self, wallet_id: Uuid) -> UseCaseResult<()> {
        self.repository.delete(wallet_id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_wallet(&self, wallet_id: Uuid, include_children: bool) -> UseCaseResult<Option<Wallet>> {
        if include_children {
            self.repository.find_by_id_with_children(wallet_id).await
        } else {
            self.repository.find_by_id(wallet_id).await
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_wallets(&self, user_id: &str) -> UseCaseResult<Vec<Wallet>> {
        self.repository.find_by_user_id(user_id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_wallet_balance(&self, wallet_id: Uuid) -> UseCaseResult<Money> {
        let wallet = self
            .repository
            .find_by_id(wallet_id)
            .await?
            .ok_or(WalletError::NotFound(wallet_id))?;
        Ok(wallet.balance().clone())
    }

    /// Diagnostic only: reports whether the stored balance is
    /// consistent with the signed sum of loaded children. Balance is stored
    /// authoritatively, not recomputed from children, so this never
    /// overwrites it; callers use it to flag drift, e.g. after a direct
    /// database edit. The wallet's initial balance is not separately
    /// persisted, so this compares deltas against a zero baseline and is
    /// only meaningful when the wallet was opened with `initial_balance = 0`.
    #[tracing::instrument(skip(self))]
    pub async fn recompute_balance(&self, wallet_id: Uuid) -> UseCaseResult<bool> {
        let wallet = self
            .repository
            .find_by_id_with_children(wallet_id)
            .await?
            .ok_or(WalletError::NotFound(wallet_id))?;

        let mut delta: i64 = 0;
        for income in wallet.income_records() {
            delta += income.amount.amount();
        }
        for expense in wallet.expense_records() {
            delta -= expense.amount.amount();
        }
        for transfer in wallet.transfers() {
            delta -= transfer.amount.amount() + transfer.fee.amount();
        }

        Ok(delta == wallet.balance().amount())
    }
}
