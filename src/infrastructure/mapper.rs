//! Pure functions translating between the domain `Wallet` aggregate and the
//! flat `WalletAggregateData` DTO. Nothing in this module touches a
//! connection; it only reshapes data already in memory.

use crate::domain::money::Currency;
use crate::domain::wallet::{ExpenseRecord, IncomeRecord, Transfer, Wallet, WalletType};
use crate::domain::{Money, WalletError};
use crate::infrastructure::models::{ExpenseRecordData, IncomeRecordData, TransferData, WalletAggregateData};

/// Flatten a `Wallet` aggregate, including its currently-loaded children,
/// into its storage projection.
pub fn to_data(wallet: &Wallet) -> WalletAggregateData {
    WalletAggregateData {
        id: wallet.id,
        user_id: wallet.user_id.clone(),
        name: wallet.name.clone(),
        wallet_type: wallet.wallet_type.as_str().to_string(),
        currency: wallet.currency().as_str().to_string(),
        balance_amount: wallet.balance().amount(),
        balance_currency: wallet.balance().currency().as_str().to_string(),
        created_at: wallet.created_at,
        updated_at: wallet.updated_at,
        is_fully_loaded: wallet.is_fully_loaded(),
        income_records: wallet.income_records().iter().map(income_to_data).collect(),
        expense_records: wallet.expense_records().iter().map(expense_to_data).collect(),
        transfers: wallet.transfers().iter().map(transfer_to_data).collect(),
    }
}

/// Rebuild a `Wallet` aggregate from its storage projection. The resulting
/// aggregate's `is_fully_loaded` flag mirrors the DTO's, so a root-only read
/// correctly reports that its child collections are incomplete rather than
/// empty.
pub fn to_domain(data: WalletAggregateData) -> Result<Wallet, WalletError> {
    let wallet_type = WalletType::parse(&data.wallet_type)?;
    let balance = Money::new(data.balance_amount, Currency::new(data.balance_currency)?)?;

    let expense_records = data
        .expense_records
        .into_iter()
        .map(expense_from_data)
        .collect::<Result<Vec<_>, _>>()?;
    let income_records = data
        .income_records
        .into_iter()
        .map(income_from_data)
        .collect::<Result<Vec<_>, _>>()?;
    let transfers = data
        .transfers
        .into_iter()
        .map(transfer_from_data)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Wallet::from_parts(
        data.id,
        data.user_id,
        data.name,
        wallet_type,
        balance,
        data.created_at,
        data.updated_at,
        expense_records,
        income_records,
        transfers,
        data.is_fully_loaded,
    ))
}

fn expense_to_data(record: &ExpenseRecord) -> ExpenseRecordData {
    ExpenseRecordData {
        id: record.id,
        wallet_id: record.wallet_id,
        category_id: record.subcategory_id.clone(),
        amount: record.amount.amount(),
        currency: record.amount.currency().as_str().to_string(),
        description: record.description.clone(),
        date: record.date,
        created_at: record.created_at,
    }
}

fn expense_from_data(data: ExpenseRecordData) -> Result<ExpenseRecord, WalletError> {
    let amount = Money::new(data.amount, Currency::new(data.currency)?)?;
    Ok(ExpenseRecord::from_parts(
        data.id,
        data.wallet_id,
        data.category_id,
        amount,
        data.description,
        data.date,
        data.created_at,
    ))
}

fn income_to_data(record: &IncomeRecord) -> IncomeRecordData {
    IncomeRecordData {
        id: record.id,
        wallet_id: record.wallet_id,
        category_id: record.subcategory_id.clone(),
        amount: record.amount.amount(),
        currency: record.amount.currency().as_str().to_string(),
        description: record.description.clone(),
        date: record.date,
        created_at: record.created_at,
    }
}

fn income_from_data(data: IncomeRecordData) -> Result<IncomeRecord, WalletError> {
    let amount = Money::new(data.amount, Currency::new(data.currency)?)?;
    Ok(IncomeRecord::from_parts(
        data.id,
        data.wallet_id,
        data.category_id,
        amount,
        data.description,
        data.date,
        data.created_at,
    ))
}

fn transfer_to_data(transfer: &Transfer) -> TransferData {
    TransferData {
        id: transfer.id,
        from_wallet_id: transfer.from_wallet_id,
        to_wallet_id: transfer.to_wallet_id,
        amount: transfer.amount.amount(),
        currency: transfer.amount.currency().as_str().to_string(),
        fee_amount: transfer.fee.amount(),
        fee_currency: transfer.fee.currency().as_str().to_string(),
        description: transfer.description.clone(),
        date: transfer.date,
        created_at: transfer.created_at,
    }
}

fn transfer_from_data(data: TransferData) -> Result<Transfer, WalletError> {
    let amount = Money::new(data.amount, Currency::new(data.currency)?)?;
    let fee = Money::new(data.fee_amount, Currency::new(data.fee_currency)?)?;
    Ok(Transfer::from_parts(
        data.id,
        data.from_wallet_id,
        data.to_wallet_id,
        amount,
        fee,
        data.description,
        data.date,
        data.created_at,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_wallet() -> Wallet {
        let mut wallet = Wallet::new(
            "u1".to_string(),
            "Main".to_string(),
            WalletType::Cash,
            Currency::new("USD").unwrap(),
            10_000,
        )
        .unwrap();
        wallet
            .add_expense(
                Money::new(500, Currency::new("USD").unwrap()).unwrap(),
                "groceries".to_string(),
                "milk".to_string(),
                Utc::now(),
            )
            .unwrap();
        wallet
    }

    #[test]
    fn round_trips_through_data_without_losing_children() {
        let wallet = sample_wallet();
        let data = to_data(&wallet);
        assert_eq!(data.expense_records.len(), 1);

        let rebuilt = to_domain(data).unwrap();
        assert_eq!(rebuilt.id, wallet.id);
        assert_eq!(rebuilt.balance(), wallet.balance());
        assert_eq!(rebuilt.expense_records().len(), 1);
        assert!(!rebuilt.is_fully_loaded());
    }

    #[test]
    fn rejects_unknown_persisted_wallet_type() {
        let mut data = to_data(&sample_wallet());
        data.wallet_type = "SAVINGS".to_string();
        assert!(to_domain(data).is_err());
    }
}
