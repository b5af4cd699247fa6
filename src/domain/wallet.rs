//! Wallet aggregate root, and the expense, income, and transfer entities it owns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::WalletError;
use super::money::Money;

/// The kind of account a wallet represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WalletType {
    Cash,
    Bank,
    Credit,
    Investment,
}

impl WalletType {
    pub fn parse(raw: &str) -> Result<Self, WalletError> {
        match raw.to_uppercase().as_str() {
            "CASH" => Ok(WalletType::Cash),
            "BANK" => Ok(WalletType::Bank),
            "CREDIT" => Ok(WalletType::Credit),
            "INVESTMENT" => Ok(WalletType::Investment),
            other => Err(WalletError::InvalidInput(format!(
                "unknown wallet type {:?}",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WalletType::Cash => "CASH",
            WalletType::Bank => "BANK",
            WalletType::Credit => "CREDIT",
            WalletType::Investment => "INVESTMENT",
        }
    }
}

/// A single expense posted against a wallet. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseRecord {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub subcategory_id: String,
    pub amount: Money,
    pub description: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ExpenseRecord {
    fn new(
        wallet_id: Uuid,
        amount: Money,
        subcategory_id: String,
        description: String,
        date: DateTime<Utc>,
    ) -> Result<Self, WalletError> {
        if amount.amount() <= 0 {
            return Err(WalletError::NonPositiveAmount {
                amount: amount.amount(),
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            wallet_id,
            subcategory_id,
            amount,
            description,
            date,
            created_at: Utc::now(),
        })
    }

    /// Reconstruct a previously-persisted record, preserving its identity.
    pub fn from_parts(
        id: Uuid,
        wallet_id: Uuid,
        subcategory_id: String,
        amount: Money,
        description: String,
        date: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            wallet_id,
            subcategory_id,
            amount,
            description,
            date,
            created_at,
        }
    }
}

/// A single income posted against a wallet. Same shape as [`ExpenseRecord`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncomeRecord {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub subcategory_id: String,
    pub amount: Money,
    pub description: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl IncomeRecord {
    fn new(
        wallet_id: Uuid,
        amount: Money,
        subcategory_id: String,
        description: String,
        date: DateTime<Utc>,
    ) -> Result<Self, WalletError> {
        if amount.amount() <= 0 {
            return Err(WalletError::NonPositiveAmount {
                amount: amount.amount(),
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            wallet_id,
            subcategory_id,
            amount,
            description,
            date,
            created_at: Utc::now(),
        })
    }

    pub fn from_parts(
        id: Uuid,
        wallet_id: Uuid,
        subcategory_id: String,
        amount: Money,
        description: String,
        date: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            wallet_id,
            subcategory_id,
            amount,
            description,
            date,
            created_at,
        }
    }
}

/// A transfer of funds recorded on the source wallet's aggregate. The
/// destination wallet is a weak reference: it is credited separately and
/// carries no mirrored child record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transfer {
    pub id: Uuid,
    pub from_wallet_id: Uuid,
    pub to_wallet_id: Uuid,
    pub amount: Money,
    pub fee: Money,
    pub description: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Transfer {
    fn new(
        from_wallet_id: Uuid,
        to_wallet_id: Uuid,
        amount: Money,
        fee: Money,
        description: String,
        date: DateTime<Utc>,
    ) -> Result<Self, WalletError> {
        if to_wallet_id == from_wallet_id {
            return Err(WalletError::InvalidInput(
                "a wallet cannot transfer to itself".to_string(),
            ));
        }
        if amount.amount() <= 0 {
            return Err(WalletError::NonPositiveAmount {
                amount: amount.amount(),
            });
        }
        if fee.amount() < 0 {
            return Err(WalletError::InvalidInput(
                "transfer fee cannot be negative".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            from_wallet_id,
            to_wallet_id,
            amount,
            fee,
            description,
            date,
            created_at: Utc::now(),
        })
    }

    pub fn from_parts(
        id: Uuid,
        from_wallet_id: Uuid,
        to_wallet_id: Uuid,
        amount: Money,
        fee: Money,
        description: String,
        date: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            from_wallet_id,
            to_wallet_id,
            amount,
            fee,
            description,
            date,
            created_at,
        }
    }
}

/// The Wallet aggregate root. Owns its expense and income records outright,
/// and owns the Transfer records it originates. Every mutation goes through
/// a method on this type so the monetary invariants never drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub wallet_type: WalletType,
    balance: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    expense_records: Vec<ExpenseRecord>,
    income_records: Vec<IncomeRecord>,
    transfers: Vec<Transfer>,
    is_fully_loaded: bool,
}

impl Wallet {
    /// Create a brand-new wallet with empty child collections.
    pub fn new(
        user_id: String,
        name: String,
        wallet_type: WalletType,
        currency: super::money::Currency,
        initial_balance_amount: i64,
    ) -> Result<Self, WalletError> {
        if user_id.trim().is_empty() {
            return Err(WalletError::InvalidInput("user_id must not be empty".to_string()));
        }
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(WalletError::InvalidInput("name must not be empty".to_string()));
        }
        if name.chars().count() > 100 {
            return Err(WalletError::InvalidInput(
                "name must be at most 100 characters".to_string(),
            ));
        }

        let balance = Money::new(initial_balance_amount, currency)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            wallet_type,
            balance,
            created_at: now,
            updated_at: now,
            expense_records: Vec::new(),
            income_records: Vec::new(),
            transfers: Vec::new(),
            is_fully_loaded: false,
        })
    }

    /// Reconstruct a wallet from persisted state. Used only by the mapper
    /// (`infrastructure::mapper`) when rebuilding from a `WalletAggregateData`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: Uuid,
        user_id: String,
        name: String,
        wallet_type: WalletType,
        balance: Money,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        expense_records: Vec<ExpenseRecord>,
        income_records: Vec<IncomeRecord>,
        transfers: Vec<Transfer>,
        is_fully_loaded: bool,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            wallet_type,
            balance,
            created_at,
            updated_at,
            expense_records,
            income_records,
            transfers,
            is_fully_loaded,
        }
    }

    pub fn currency(&self) -> &super::money::Currency {
        self.balance.currency()
    }

    pub fn is_fully_loaded(&self) -> bool {
        self.is_fully_loaded
    }

    pub fn expense_records(&self) -> &[ExpenseRecord] {
        &self.expense_records
    }

    pub fn income_records(&self) -> &[IncomeRecord] {
        &self.income_records
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn balance(&self) -> &Money {
        &self.balance
    }

    fn require_same_currency(&self, amount: &Money) -> Result<(), WalletError> {
        if amount.currency() != self.balance.currency() {
            return Err(WalletError::CurrencyMismatch {
                expected: self.balance.currency().as_str().to_string(),
                actual: amount.currency().as_str().to_string(),
            });
        }
        Ok(())
    }

    /// Post an expense against the wallet, debiting the balance.
    pub fn add_expense(
        &mut self,
        amount: Money,
        subcategory_id: String,
        description: String,
        date: DateTime<Utc>,
    ) -> Result<ExpenseRecord, WalletError> {
        self.require_same_currency(&amount)?;
        let new_balance = self.balance.subtract(&amount).map_err(|e| match e {
            WalletError::NegativeResult => WalletError::InsufficientFunds { wallet_id: self.id },
            other => other,
        })?;

        let record = ExpenseRecord::new(self.id, amount, subcategory_id, description, date)?;
        self.expense_records.push(record.clone());
        self.balance = new_balance;
        self.updated_at = Utc::now();
        Ok(record)
    }

    /// Post an income against the wallet, crediting the balance. Balance is
    /// bounded below only; there is no upper bound.
    pub fn add_income(
        &mut self,
        amount: Money,
        subcategory_id: String,
        description: String,
        date: DateTime<Utc>,
    ) -> Result<IncomeRecord, WalletError> {
        self.require_same_currency(&amount)?;
        let record = IncomeRecord::new(self.id, amount.clone(), subcategory_id, description, date)?;
        self.balance = self.balance.add(&amount)?;
        self.income_records.push(record.clone());
        self.updated_at = Utc::now();
        Ok(record)
    }

    /// Debit `amount + fee` from the wallet as the source side of a transfer.
    /// Does not create the Transfer record; see [`Wallet::create_transfer`].
    pub fn process_outgoing_transfer(&mut self, amount: &Money, fee: &Money) -> Result<(), WalletError> {
        self.require_same_currency(amount)?;
        self.require_same_currency(fee)?;
        let total = amount.add(fee)?;
        let new_balance = self.balance.subtract(&total).map_err(|e| match e {
            WalletError::NegativeResult => WalletError::InsufficientFunds { wallet_id: self.id },
            other => other,
        })?;
        self.balance = new_balance;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Append the Transfer child record to the source wallet. Balance has
    /// already been adjusted by [`Wallet::process_outgoing_transfer`].
    pub fn create_transfer(
        &mut self,
        to_wallet_id: Uuid,
        amount: Money,
        fee: Money,
        description: String,
        date: DateTime<Utc>,
    ) -> Result<Transfer, WalletError> {
        self.require_same_currency(&amount)?;
        self.require_same_currency(&fee)?;
        let transfer = Transfer::new(self.id, to_wallet_id, amount, fee, description, date)?;
        self.transfers.push(transfer.clone());
        self.updated_at = Utc::now();
        Ok(transfer)
    }

    /// Credit the destination wallet's balance as the receiving side of a
    /// transfer. Creates no child record.
    pub fn process_incoming_transfer(&mut self, amount: &Money) -> Result<(), WalletError> {
        self.require_same_currency(amount)?;
        self.balance = self.balance.add(amount)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn update_name(&mut self, new_name: String) -> Result<(), WalletError> {
        let new_name = new_name.trim().to_string();
        if new_name.is_empty() {
            return Err(WalletError::InvalidInput("name must not be empty".to_string()));
        }
        if new_name.chars().count() > 100 {
            return Err(WalletError::InvalidInput(
                "name must be at most 100 characters".to_string(),
            ));
        }
        self.name = new_name;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn update_type(&mut self, new_type: WalletType) {
        self.wallet_type = new_type;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Currency;

    fn usd(amount: i64) -> Money {
        Money::new(amount, Currency::new("USD").unwrap()).unwrap()
    }

    fn new_wallet(initial: i64) -> Wallet {
        Wallet::new(
            "u1".to_string(),
            "W".to_string(),
            WalletType::Cash,
            Currency::new("USD").unwrap(),
            initial,
        )
        .unwrap()
    }

    #[test]
    fn rejects_empty_user_id() {
        let err = Wallet::new(
            "  ".to_string(),
            "W".to_string(),
            WalletType::Cash,
            Currency::new("USD").unwrap(),
            0,
        )
        .unwrap_err();
        assert!(matches!(err, WalletError::InvalidInput(_)));
    }

    #[test]
    fn rejects_empty_name() {
        assert!(Wallet::new(
            "u1".to_string(),
            "   ".to_string(),
            WalletType::Cash,
            Currency::new("USD").unwrap(),
            0,
        )
        .is_err());
    }

    #[test]
    fn rejects_negative_initial_balance() {
        assert!(Wallet::new(
            "u1".to_string(),
            "W".to_string(),
            WalletType::Cash,
            Currency::new("USD").unwrap(),
            -1,
        )
        .is_err());
    }

    #[test]
    fn rejects_unknown_type_string() {
        assert!(WalletType::parse("SAVINGS").is_err());
    }

    #[test]
    fn scenario_create_income_then_expense() {
        let mut wallet = new_wallet(0);
        wallet
            .add_income(usd(10_000), "sub1".to_string(), String::new(), Utc::now())
            .unwrap();
        wallet
            .add_expense(usd(2_500), "sub2".to_string(), String::new(), Utc::now())
            .unwrap();

        assert_eq!(wallet.balance, usd(7_500));
        assert_eq!(wallet.income_records().len(), 1);
        assert_eq!(wallet.expense_records().len(), 1);
    }

    #[test]
    fn currency_guard_rejects_mismatched_expense() {
        let mut wallet = new_wallet(10_000);
        let eur = Money::new(100, Currency::new("EUR").unwrap()).unwrap();
        let err = wallet
            .add_expense(eur, "sub2".to_string(), String::new(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, WalletError::CurrencyMismatch { .. }));
        assert_eq!(wallet.balance, usd(10_000));
        assert!(wallet.expense_records().is_empty());
    }

    #[test]
    fn expense_equal_to_balance_succeeds_one_unit_more_fails() {
        let mut wallet = new_wallet(7_500);
        let mut at_balance = wallet.clone();
        at_balance
            .add_expense(usd(7_500), "sub2".to_string(), String::new(), Utc::now())
            .unwrap();
        assert_eq!(at_balance.balance, usd(0));

        let err = wallet
            .add_expense(usd(7_501), "sub2".to_string(), String::new(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, WalletError::InsufficientFunds { .. }));
        assert_eq!(wallet.balance, usd(7_500));
    }

    #[test]
    fn create_transfer_rejects_self_transfer() {
        let mut wallet = new_wallet(1_000);
        let err = wallet
            .create_transfer(wallet.id, usd(100), usd(0), String::new(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidInput(_)));
    }

    #[test]
    fn two_wallet_transfer_scenario() {
        let mut w1 = Wallet::new(
            "u1".to_string(),
            "W1".to_string(),
            WalletType::Cash,
            Currency::new("USD").unwrap(),
            1_000,
        )
        .unwrap();
        let mut w2 = Wallet::new(
            "u2".to_string(),
            "W2".to_string(),
            WalletType::Cash,
            Currency::new("USD").unwrap(),
            0,
        )
        .unwrap();

        w1.process_outgoing_transfer(&usd(300), &usd(10)).unwrap();
        w2.process_incoming_transfer(&usd(300)).unwrap();
        w1.create_transfer(w2.id, usd(300), usd(10), String::new(), Utc::now())
            .unwrap();

        assert_eq!(w1.balance, usd(690));
        assert_eq!(w2.balance, usd(300));
        assert_eq!(w1.transfers().len(), 1);
        assert!(w2.transfers().is_empty());
    }

    #[test]
    fn currency_is_immutable_but_name_and_type_are_mutable() {
        let mut wallet = new_wallet(0);
        let currency_before = wallet.currency().clone();
        wallet.update_name("New Name".to_string()).unwrap();
        wallet.update_type(WalletType::Bank);
        assert_eq!(wallet.currency(), &currency_before);
        assert_eq!(wallet.name, "New Name");
        assert_eq!(wallet.wallet_type, WalletType::Bank);
    }
}
