//! Ledger service
//!
//! This module provides the `Ledger` struct, which coordinates the account
//! store, the ledger operations and the transaction log.
//!
//! For every mutation the ledger:
//! 1. Runs the operation inside one `AccountStore::mutate_accounts` cycle, so
//!    validation and write-back are indivisible with respect to other
//!    mutations of the same accounts
//! 2. Turns the returned receipt into a completed transaction record
//! 3. Appends the record to the transaction log
//!
//! Rejected mutations leave the store untouched and append a failed record
//! for the requested account(s). Failing to append an audit record is logged
//! and never undoes or fails a mutation that already succeeded.

use crate::core::account_store::AccountStore;
use crate::core::operations;
use crate::core::transaction_log::TransactionLog;
use crate::types::{
    Account, CreateAccountRequest, DepositRequest, LedgerError, TransactionId, TransactionRecord,
    TransactionType, TransferRequest, WithdrawRequest,
};
use std::sync::Arc;

/// Ledger service over a shared account store and transaction log
///
/// Cloning a `Ledger` yields another handle to the same store and log.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    accounts: Arc<AccountStore>,
    transactions: Arc<TransactionLog>,
}

impl Ledger {
    /// Create a ledger with an empty store and log
    pub fn new() -> Self {
        Self::with_parts(Arc::new(AccountStore::new()), Arc::new(TransactionLog::new()))
    }

    /// Create a ledger over existing components
    pub fn with_parts(accounts: Arc<AccountStore>, transactions: Arc<TransactionLog>) -> Self {
        Self {
            accounts,
            transactions,
        }
    }

    /// The underlying account store
    pub fn account_store(&self) -> &AccountStore {
        &self.accounts
    }

    /// The underlying transaction log
    pub fn transaction_log(&self) -> &TransactionLog {
        &self.transactions
    }

    /// Open a new account and insert it into the store
    ///
    /// # Errors
    ///
    /// - `InvalidCustomerName` / `InvalidInitialBalance` from validation
    /// - `DuplicateAccount` on an identifier collision
    pub fn open_account(&self, request: CreateAccountRequest) -> Result<Account, LedgerError> {
        let account = operations::create_account(&request).inspect_err(|e| {
            tracing::warn!(
                error = %e,
                customer_name = %request.customer_name,
                "Failed to create account"
            );
        })?;

        self.accounts.create(account.clone()).inspect_err(|e| {
            tracing::error!(error = %e, account_id = %account.id, "Failed to store account");
        })?;

        tracing::info!(
            account_id = %account.id,
            customer_name = %account.customer_name,
            balance = account.balance,
            "Account created"
        );

        Ok(account)
    }

    /// Snapshot of a single account
    pub fn account(&self, id: &str) -> Result<Account, LedgerError> {
        self.accounts.get(id)
    }

    /// Snapshot of every account
    pub fn accounts(&self) -> Vec<Account> {
        self.accounts.list_all()
    }

    /// Credit an account
    ///
    /// Returns the completed transaction record.
    pub fn deposit(&self, request: DepositRequest) -> Result<TransactionRecord, LedgerError> {
        let result = self
            .accounts
            .mutate_account(&request.account_id, |account| {
                operations::deposit(account, request.amount)
            });

        match result {
            Ok(receipt) => {
                let record = self.record(TransactionRecord::completed(&receipt));
                tracing::info!(
                    account_id = %request.account_id,
                    amount = request.amount,
                    transaction_id = %record.id,
                    new_balance = receipt.changes[0].current,
                    "Deposit processed"
                );
                Ok(record)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    account_id = %request.account_id,
                    amount = request.amount,
                    "Failed to process deposit"
                );
                self.record(TransactionRecord::failed(
                    TransactionType::Deposit,
                    &request.account_id,
                    request.amount,
                ));
                Err(e)
            }
        }
    }

    /// Debit an account
    ///
    /// Returns the completed transaction record.
    pub fn withdraw(&self, request: WithdrawRequest) -> Result<TransactionRecord, LedgerError> {
        let result = self
            .accounts
            .mutate_account(&request.account_id, |account| {
                operations::withdraw(account, request.amount)
            });

        match result {
            Ok(receipt) => {
                let record = self.record(TransactionRecord::completed(&receipt));
                tracing::info!(
                    account_id = %request.account_id,
                    amount = request.amount,
                    transaction_id = %record.id,
                    new_balance = receipt.changes[0].current,
                    "Withdrawal processed"
                );
                Ok(record)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    account_id = %request.account_id,
                    amount = request.amount,
                    "Failed to process withdrawal"
                );
                self.record(TransactionRecord::failed(
                    TransactionType::Withdrawal,
                    &request.account_id,
                    request.amount,
                ));
                Err(e)
            }
        }
    }

    /// Move funds between two accounts
    ///
    /// Both accounts are fetched, validated, mutated and written back under
    /// one store lock. Returns the completed transaction record.
    pub fn transfer(&self, request: TransferRequest) -> Result<TransactionRecord, LedgerError> {
        let ids = [
            request.from_account_id.as_str(),
            request.to_account_id.as_str(),
        ];
        let result = self.accounts.mutate_accounts(&ids, |accounts| match accounts {
            [from, to] => operations::transfer(from, to, request.amount),
            _ => Err(LedgerError::account_not_found(&request.from_account_id)),
        });

        match result {
            Ok(receipt) => {
                let record = self.record(TransactionRecord::completed(&receipt));
                tracing::info!(
                    from_account_id = %request.from_account_id,
                    to_account_id = %request.to_account_id,
                    amount = request.amount,
                    transaction_id = %record.id,
                    from_balance = receipt.changes[0].current,
                    to_balance = receipt.changes[1].current,
                    "Transfer processed"
                );
                Ok(record)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    from_account_id = %request.from_account_id,
                    to_account_id = %request.to_account_id,
                    amount = request.amount,
                    "Failed to process transfer"
                );
                self.record(TransactionRecord::failed_transfer(
                    &request.from_account_id,
                    &request.to_account_id,
                    request.amount,
                ));
                Err(e)
            }
        }
    }

    /// Look up a transaction record
    pub fn transaction(&self, id: &TransactionId) -> Result<TransactionRecord, LedgerError> {
        self.transactions.get(id)
    }

    /// Every transaction record, oldest first
    pub fn transactions(&self) -> Vec<TransactionRecord> {
        self.transactions.all()
    }

    /// Empty both the account store and the transaction log
    ///
    /// Meant as a reset between runs or tests. The store and the log are
    /// cleared one after the other, so a mutation running concurrently may
    /// leave a record behind in the log.
    pub fn clear(&self) {
        self.accounts.clear();
        self.transactions.clear();
    }

    fn record(&self, record: TransactionRecord) -> TransactionRecord {
        if let Err(e) = self.transactions.append(record.clone()) {
            tracing::error!(error = %e, transaction_id = %record.id, "Failed to store transaction");
        }
        record
    }
}
