//! Ledger operations
//!
//! Stateless validate-then-mutate logic for opening accounts and for the three
//! balance mutations (deposit, withdraw, transfer). These functions operate on
//! account records already materialized in memory and own no storage or
//! locks; atomicity against concurrent callers is provided by running them
//! inside [`AccountStore::mutate_accounts`](crate::core::AccountStore::mutate_accounts).
//!
//! Every mutation checks all of its preconditions before touching a field, so
//! a failed call never leaves partial state behind and retrying it is safe.

use crate::types::{
    Account, BalanceChange, CreateAccountRequest, LedgerError, Receipt, TransactionType,
};
use chrono::Utc;
use uuid::Uuid;

/// Build a new account value
///
/// The account gets a fresh UUID v4 identifier and `created_at == updated_at`.
/// It is not inserted into any store.
///
/// # Errors
///
/// - `InvalidCustomerName` if the name is empty
/// - `InvalidInitialBalance` if the initial balance is negative (zero is allowed)
pub fn create_account(request: &CreateAccountRequest) -> Result<Account, LedgerError> {
    if request.customer_name.is_empty() {
        return Err(LedgerError::invalid_customer_name(&request.customer_name));
    }

    if request.initial_balance < 0 {
        return Err(LedgerError::invalid_initial_balance(
            request.initial_balance,
        ));
    }

    let now = Utc::now();

    Ok(Account {
        id: Uuid::new_v4().to_string(),
        customer_name: request.customer_name.clone(),
        balance: request.initial_balance,
        created_at: now,
        updated_at: now,
    })
}

/// Check that an account reference is present
pub fn validate_account(account: Option<&Account>) -> Result<&Account, LedgerError> {
    account.ok_or_else(|| LedgerError::account_not_found("<none>"))
}

/// Check whether `amount` may be debited from `account`
///
/// Pure predicate, never mutates.
///
/// # Errors
///
/// - `InvalidAmount` if `amount <= 0`
/// - `InsufficientFunds` if the balance does not cover `amount`
pub fn can_withdraw(account: &Account, amount: i64) -> Result<(), LedgerError> {
    ensure_positive(amount)?;

    if account.balance < amount {
        return Err(LedgerError::insufficient_funds(
            &account.id,
            account.balance,
            amount,
        ));
    }

    Ok(())
}

/// Credit `amount` to `account`
///
/// # Errors
///
/// - `InvalidAmount` if `amount <= 0`
/// - `BalanceOverflow` if the new balance would not fit in an `i64`
pub fn deposit(account: &mut Account, amount: i64) -> Result<Receipt, LedgerError> {
    ensure_positive(amount)?;
    let new_balance = credited_balance(account, amount)?;

    let now = Utc::now();
    let change = apply(account, new_balance, now);

    Ok(Receipt {
        tx_type: TransactionType::Deposit,
        amount,
        timestamp: account.updated_at,
        changes: vec![change],
    })
}

/// Debit `amount` from `account`
///
/// # Errors
///
/// Same as [`can_withdraw`].
pub fn withdraw(account: &mut Account, amount: i64) -> Result<Receipt, LedgerError> {
    can_withdraw(account, amount)?;

    // can_withdraw guarantees 0 < amount <= balance, so this cannot underflow
    let new_balance = account.balance - amount;
    let change = apply(account, new_balance, Utc::now());

    Ok(Receipt {
        tx_type: TransactionType::Withdrawal,
        amount,
        timestamp: account.updated_at,
        changes: vec![change],
    })
}

/// Move `amount` from `from` to `to`
///
/// Both balances and both `updated_at` stamps change in one step; the two
/// accounts end up with the same `updated_at`.
///
/// # Errors
///
/// - `SameAccountTransfer` if both records have the same identifier
/// - `InvalidAmount` if `amount <= 0`
/// - `InsufficientFunds` if `from` cannot cover `amount`
/// - `BalanceOverflow` if crediting `to` would overflow
pub fn transfer(from: &mut Account, to: &mut Account, amount: i64) -> Result<Receipt, LedgerError> {
    if from.id == to.id {
        return Err(LedgerError::same_account_transfer(&from.id, &to.id));
    }

    ensure_positive(amount)?;
    can_withdraw(from, amount)?;
    let credited = credited_balance(to, amount)?;
    let debited = from.balance - amount;

    let now = Utc::now().max(from.updated_at).max(to.updated_at);
    let debit = apply(from, debited, now);
    let credit = apply(to, credited, now);

    Ok(Receipt {
        tx_type: TransactionType::Transfer,
        amount,
        timestamp: now,
        changes: vec![debit, credit],
    })
}

fn ensure_positive(amount: i64) -> Result<(), LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::invalid_amount(amount));
    }
    Ok(())
}

fn credited_balance(account: &Account, amount: i64) -> Result<i64, LedgerError> {
    account
        .balance
        .checked_add(amount)
        .ok_or_else(|| LedgerError::balance_overflow(&account.id, account.balance, amount))
}

fn apply(account: &mut Account, new_balance: i64, now: chrono::DateTime<Utc>) -> BalanceChange {
    let previous = account.balance;
    account.balance = new_balance;
    account.touch(now);

    BalanceChange {
        account_id: account.id.clone(),
        previous,
        current: new_balance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn account_with_balance(balance: i64) -> Account {
        create_account(&CreateAccountRequest::new("Test Holder", balance)).unwrap()
    }

    #[rstest]
    #[case::valid("Ravi Kumar", 10000)]
    #[case::zero_balance("Sunil", 0)]
    fn test_create_account_valid(#[case] name: &str, #[case] initial_balance: i64) {
        let account = create_account(&CreateAccountRequest::new(name, initial_balance)).unwrap();

        assert!(!account.id.is_empty());
        assert_eq!(account.customer_name, name);
        assert_eq!(account.balance, initial_balance);
        assert_eq!(account.created_at, account.updated_at);
    }

    #[test]
    fn test_create_account_empty_name() {
        let result = create_account(&CreateAccountRequest::new("", 10000));

        assert_eq!(result, Err(LedgerError::invalid_customer_name("")));
    }

    #[test]
    fn test_create_account_negative_balance() {
        let result = create_account(&CreateAccountRequest::new("Priya", -1000));

        assert_eq!(result, Err(LedgerError::invalid_initial_balance(-1000)));
    }

    #[test]
    fn test_create_account_generates_unique_ids() {
        let first = account_with_balance(0);
        let second = account_with_balance(0);

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_validate_account() {
        let account = account_with_balance(100);

        assert!(validate_account(Some(&account)).is_ok());
        assert!(matches!(
            validate_account(None),
            Err(LedgerError::AccountNotFound { .. })
        ));
    }

    #[rstest]
    #[case::exact_balance(1000, 1000, None)]
    #[case::below_balance(1000, 1, None)]
    #[case::zero_amount(1000, 0, Some(LedgerError::invalid_amount(0)))]
    #[case::negative_amount(1000, -100, Some(LedgerError::invalid_amount(-100)))]
    fn test_can_withdraw(
        #[case] balance: i64,
        #[case] amount: i64,
        #[case] expected_error: Option<LedgerError>,
    ) {
        let account = account_with_balance(balance);

        let result = can_withdraw(&account, amount);

        assert_eq!(result.err(), expected_error);
        assert_eq!(account.balance, balance);
    }

    #[test]
    fn test_can_withdraw_insufficient_funds() {
        let account = account_with_balance(1000);

        let result = can_withdraw(&account, 1500);

        assert_eq!(
            result,
            Err(LedgerError::insufficient_funds(&account.id, 1000, 1500))
        );
    }

    #[test]
    fn test_deposit_increases_balance() {
        let mut account = account_with_balance(1000);
        let before = account.updated_at;

        let receipt = deposit(&mut account, 500).unwrap();

        assert_eq!(account.balance, 1500);
        assert!(account.updated_at >= before);
        assert_eq!(receipt.tx_type, TransactionType::Deposit);
        assert_eq!(receipt.amount, 500);
        assert_eq!(receipt.changes[0].previous, 1000);
        assert_eq!(receipt.changes[0].current, 1500);
        assert_eq!(receipt.net_change(), 500);
    }

    #[rstest]
    #[case::zero(0)]
    #[case::negative(-100)]
    fn test_deposit_rejects_non_positive_amount(#[case] amount: i64) {
        let mut account = account_with_balance(1000);
        let snapshot = account.clone();

        let result = deposit(&mut account, amount);

        assert_eq!(result, Err(LedgerError::invalid_amount(amount)));
        assert_eq!(account, snapshot);
    }

    #[test]
    fn test_deposit_overflow_leaves_account_unchanged() {
        let mut account = account_with_balance(i64::MAX - 10);
        let snapshot = account.clone();

        let result = deposit(&mut account, 11);

        assert!(matches!(result, Err(LedgerError::BalanceOverflow { .. })));
        assert_eq!(account, snapshot);
    }

    #[test]
    fn test_withdraw_decreases_balance() {
        let mut account = account_with_balance(1000);

        let receipt = withdraw(&mut account, 400).unwrap();

        assert_eq!(account.balance, 600);
        assert_eq!(receipt.tx_type, TransactionType::Withdrawal);
        assert_eq!(receipt.net_change(), -400);
    }

    #[test]
    fn test_withdraw_entire_balance() {
        let mut account = account_with_balance(1000);

        withdraw(&mut account, 1000).unwrap();

        assert_eq!(account.balance, 0);
    }

    #[test]
    fn test_withdraw_insufficient_funds_leaves_balance() {
        let mut account = account_with_balance(1000);
        let snapshot = account.clone();

        let result = withdraw(&mut account, 1500);

        assert!(matches!(
            result,
            Err(LedgerError::InsufficientFunds {
                balance: 1000,
                requested: 1500,
                ..
            })
        ));
        assert_eq!(account, snapshot);
    }

    #[test]
    fn test_withdraw_zero_amount() {
        let mut account = account_with_balance(1000);

        let result = withdraw(&mut account, 0);

        assert_eq!(result, Err(LedgerError::invalid_amount(0)));
        assert_eq!(account.balance, 1000);
    }

    #[test]
    fn test_repeated_failed_withdrawal_never_mutates() {
        let mut account = account_with_balance(100);
        let snapshot = account.clone();

        for _ in 0..5 {
            assert!(withdraw(&mut account, 101).is_err());
        }

        assert_eq!(account, snapshot);
    }

    #[test]
    fn test_transfer_moves_funds() {
        let mut from = account_with_balance(1000);
        let mut to = account_with_balance(500);

        let receipt = transfer(&mut from, &mut to, 300).unwrap();

        assert_eq!(from.balance, 700);
        assert_eq!(to.balance, 800);
        assert_eq!(from.updated_at, to.updated_at);
        assert_eq!(receipt.timestamp, from.updated_at);
        assert_eq!(receipt.account_id(), Some(from.id.as_str()));
        assert_eq!(receipt.counterparty_id(), Some(to.id.as_str()));
        assert_eq!(receipt.net_change(), 0);
    }

    #[rstest]
    #[case::small(1)]
    #[case::half(500)]
    #[case::all(1000)]
    fn test_transfer_conserves_money(#[case] amount: i64) {
        let mut from = account_with_balance(1000);
        let mut to = account_with_balance(250);
        let total = from.balance + to.balance;

        transfer(&mut from, &mut to, amount).unwrap();

        assert_eq!(from.balance + to.balance, total);
    }

    #[rstest]
    #[case::valid_amount(300)]
    #[case::zero_amount(0)]
    #[case::excessive_amount(1_000_000)]
    fn test_transfer_same_account_always_rejected(#[case] amount: i64) {
        let mut from = account_with_balance(1000);
        let mut to = from.clone();

        let result = transfer(&mut from, &mut to, amount);

        assert_eq!(
            result,
            Err(LedgerError::same_account_transfer(&from.id, &from.id))
        );
        assert_eq!(from.balance, 1000);
    }

    #[test]
    fn test_transfer_insufficient_funds_changes_nothing() {
        let mut from = account_with_balance(100);
        let mut to = account_with_balance(500);
        let (from_snapshot, to_snapshot) = (from.clone(), to.clone());

        let result = transfer(&mut from, &mut to, 101);

        assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
        assert_eq!(from, from_snapshot);
        assert_eq!(to, to_snapshot);
    }

    #[test]
    fn test_transfer_invalid_amount() {
        let mut from = account_with_balance(100);
        let mut to = account_with_balance(500);

        let result = transfer(&mut from, &mut to, -5);

        assert_eq!(result, Err(LedgerError::invalid_amount(-5)));
    }

    #[test]
    fn test_transfer_overflow_changes_nothing() {
        let mut from = account_with_balance(100);
        let mut to = account_with_balance(i64::MAX);
        let (from_snapshot, to_snapshot) = (from.clone(), to.clone());

        let result = transfer(&mut from, &mut to, 50);

        assert!(matches!(result, Err(LedgerError::BalanceOverflow { .. })));
        assert_eq!(from, from_snapshot);
        assert_eq!(to, to_snapshot);
    }
}
