//! Ledger command engine
//!
//! This module provides the `LedgerEngine` that turns batch commands into
//! ledger service calls.
//!
//! Commands name accounts by caller-chosen references. The engine keeps the
//! reference table and enforces:
//! - A reference is bound exactly once, by a successful `open`
//! - Every other command must name bound references
//!
//! The engine is cloneable; clones share the same ledger and reference table.

use std::sync::Arc;

use dashmap::{DashMap, Entry};

use crate::core::ledger::Ledger;
use crate::types::{
    Account, AccountId, AccountRef, CreateAccountRequest, DepositRequest, LedgerCommand,
    LedgerError, TransactionRecord, TransferRequest, WithdrawRequest,
};

/// Ledger command engine
///
/// Binding a reference and creating its account happen under the reference
/// table's shard lock, so concurrent opens of one reference create exactly
/// one account.
#[derive(Debug, Clone, Default)]
pub struct LedgerEngine {
    ledger: Ledger,
    references: Arc<DashMap<AccountRef, AccountId>>,
}

impl LedgerEngine {
    /// Create an engine over an empty ledger
    pub fn new() -> Self {
        Self::with_ledger(Ledger::new())
    }

    /// Create an engine over an existing ledger
    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            ledger,
            references: Arc::new(DashMap::new()),
        }
    }

    /// The ledger service commands are applied to
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Process a single command
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` with the reference as id if a reference is unbound
    /// - `DuplicateAccount` with the reference as id if `open` reuses a reference
    /// - any error from the ledger service
    pub fn process(&self, command: LedgerCommand) -> Result<(), LedgerError> {
        match command {
            LedgerCommand::Open {
                reference,
                customer_name,
                initial_balance,
            } => self.process_open(reference, customer_name, initial_balance),
            LedgerCommand::Deposit { reference, amount } => {
                let account_id = self.resolve(&reference)?;
                self.ledger
                    .deposit(DepositRequest { account_id, amount })
                    .map(drop)
            }
            LedgerCommand::Withdraw { reference, amount } => {
                let account_id = self.resolve(&reference)?;
                self.ledger
                    .withdraw(WithdrawRequest { account_id, amount })
                    .map(drop)
            }
            LedgerCommand::Transfer { from, to, amount } => {
                let from_account_id = self.resolve(&from)?;
                let to_account_id = self.resolve(&to)?;
                self.ledger
                    .transfer(TransferRequest {
                        from_account_id,
                        to_account_id,
                        amount,
                    })
                    .map(drop)
            }
        }
    }

    fn process_open(
        &self,
        reference: AccountRef,
        customer_name: String,
        initial_balance: i64,
    ) -> Result<(), LedgerError> {
        // The vacant entry keeps the shard locked until the reference is bound
        match self.references.entry(reference) {
            Entry::Occupied(entry) => Err(LedgerError::duplicate_account(entry.key())),
            Entry::Vacant(entry) => {
                let account = self
                    .ledger
                    .open_account(CreateAccountRequest::new(customer_name, initial_balance))?;

                tracing::debug!(reference = %entry.key(), account_id = %account.id, "Reference bound");
                entry.insert(account.id);

                Ok(())
            }
        }
    }

    fn resolve(&self, reference: &str) -> Result<AccountId, LedgerError> {
        self.references
            .get(reference)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| LedgerError::account_not_found(reference))
    }

    /// Final account states for output
    ///
    /// Returns `(reference, account)` pairs sorted by reference.
    pub fn accounts(&self) -> Vec<(AccountRef, Account)> {
        let mut accounts: Vec<(AccountRef, Account)> = self
            .references
            .iter()
            .filter_map(|entry| {
                self.ledger
                    .account(entry.value())
                    .ok()
                    .map(|account| (entry.key().clone(), account))
            })
            .collect();
        accounts.sort_by(|a, b| a.0.cmp(&b.0));
        accounts
    }

    /// Every transaction record, oldest first
    pub fn transactions(&self) -> Vec<TransactionRecord> {
        self.ledger.transactions()
    }
}
