//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account record and creation request
//! - `command`: Batch ledger commands
//! - `transaction`: Mutation requests, receipts and audit records
//! - `error`: Error types for the ledger engine

pub mod account;
pub mod command;
pub mod error;
pub mod transaction;

pub use account::{Account, AccountId, CreateAccountRequest};
pub use command::{AccountRef, LedgerCommand};
pub use error::LedgerError;
pub use transaction::{
    BalanceChange, DepositRequest, Receipt, TransactionId, TransactionRecord, TransactionStatus,
    TransactionType, TransferRequest, WithdrawRequest,
};
