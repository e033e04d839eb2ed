//! Rust Ledger Engine Library
//! # Overview
//!
//! This library provides a minimal in-memory ledger: named accounts holding
//! non-negative integer balances, moved by deposits, withdrawals and
//! transfers. A CSV-driven batch processor with a sync and an async strategy
//! is built on top.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, requests, receipts, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::operations`] - Account creation, validation and balance rules
//!   - [`core::account_store`] - Thread-safe account storage with atomic update cycles
//!   - [`core::transaction_log`] - Append-only audit records
//!   - [`core::ledger`] - Service applying operations through the store
//!   - [`core::engine`] / [`core::batch_processor`] - Command processing
//! - [`io`] - CSV input and output
//! - [`strategy`] - Sync and async processing pipelines
//!
//! # Operations
//!
//! - **Open**: Create an account with a non-empty name and a non-negative balance
//! - **Deposit**: Credit a positive amount
//! - **Withdraw**: Debit a positive amount the balance covers
//! - **Transfer**: Move a positive amount between two different accounts, all or nothing
//!
//! Every successful mutation returns a receipt from which the ledger service
//! builds an audit record. Rejected mutations leave balances untouched.

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{AccountStore, BatchProcessor, Ledger, LedgerEngine, TransactionLog};
pub use io::{write_accounts_csv, write_transactions_csv};
pub use types::{
    Account, AccountId, CreateAccountRequest, DepositRequest, LedgerCommand, LedgerError,
    Receipt, TransactionId, TransactionRecord, TransactionStatus, TransactionType,
    TransferRequest, WithdrawRequest,
};
