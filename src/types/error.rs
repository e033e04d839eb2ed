//! Error types for the ledger engine
//!
//! This module defines every error that can surface from the ledger core, the
//! transaction log and the CSV pipeline around them.
//!
//! # Error Categories
//!
//! - **Ledger Errors**: Unknown or duplicate accounts, invalid amounts, insufficient funds, etc.
//! - **Audit Log Errors**: Duplicate or unknown transaction identifiers
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **CSV Parsing Errors**: Malformed CSV, unknown commands, missing fields, etc.

use thiserror::Error;

/// Main error type for the ledger engine
///
/// Every variant carries the structured context of the failure rather than a
/// preformatted message, so callers can map each kind to their own status
/// codes. None of these errors are fatal to the process and none are retried
/// internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Lookup miss, or an absent account reference
    #[error("account not found: {id}")]
    AccountNotFound {
        /// The identifier that was looked up
        id: String,
    },

    /// An account with this identifier already exists
    #[error("account with ID {id} already exists")]
    DuplicateAccount {
        /// The colliding identifier
        id: String,
    },

    /// Amount must be strictly positive for deposits, withdrawals and transfers
    #[error("invalid amount: {amount} (must be positive)")]
    InvalidAmount {
        /// The rejected amount
        amount: i64,
    },

    /// Withdrawal or transfer exceeds the available balance
    ///
    /// The account balance is left untouched.
    #[error("insufficient funds in account {id}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Account being debited
        id: String,
        /// Balance at the time of the check
        balance: i64,
        /// Requested debit
        requested: i64,
    },

    /// Customer name is empty at account creation
    #[error("invalid customer name: '{name}' (must not be empty)")]
    InvalidCustomerName {
        /// The rejected name
        name: String,
    },

    /// Initial balance is negative at account creation
    #[error("invalid initial balance: {balance} (must be non-negative)")]
    InvalidInitialBalance {
        /// The rejected balance
        balance: i64,
    },

    /// Transfer source and destination are the same account
    #[error("cannot transfer to same account: from {from_id} to {to_id}")]
    SameAccountTransfer {
        /// Source account
        from_id: String,
        /// Destination account
        to_id: String,
    },

    /// Crediting the account would overflow its balance
    ///
    /// Rejected before any mutation so the account stays consistent.
    #[error("balance overflow in account {id}: balance {balance}, credit {amount}")]
    BalanceOverflow {
        /// Account being credited
        id: String,
        /// Balance at the time of the check
        balance: i64,
        /// Requested credit
        amount: i64,
    },

    /// A transaction record with this identifier was already appended
    #[error("transaction with ID {id} already exists")]
    DuplicateTransaction {
        /// The colliding transaction identifier
        id: String,
    },

    /// No transaction record with this identifier exists
    #[error("transaction not found: {id}")]
    TransactionNotFound {
        /// The identifier that was looked up
        id: String,
    },

    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// The malformed record is skipped and processing continues.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// A CSV row could not be turned into a ledger command
    #[error("Invalid '{command}' command: {reason}")]
    InvalidCommand {
        /// The command type as written in the input
        command: String,
        /// Why the row was rejected
        reason: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl LedgerError {
    /// Create an AccountNotFound error
    pub fn account_not_found(id: &str) -> Self {
        LedgerError::AccountNotFound { id: id.to_string() }
    }

    /// Create a DuplicateAccount error
    pub fn duplicate_account(id: &str) -> Self {
        LedgerError::DuplicateAccount { id: id.to_string() }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: i64) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(id: &str, balance: i64, requested: i64) -> Self {
        LedgerError::InsufficientFunds {
            id: id.to_string(),
            balance,
            requested,
        }
    }

    /// Create an InvalidCustomerName error
    pub fn invalid_customer_name(name: &str) -> Self {
        LedgerError::InvalidCustomerName {
            name: name.to_string(),
        }
    }

    /// Create an InvalidInitialBalance error
    pub fn invalid_initial_balance(balance: i64) -> Self {
        LedgerError::InvalidInitialBalance { balance }
    }

    /// Create a SameAccountTransfer error
    pub fn same_account_transfer(from_id: &str, to_id: &str) -> Self {
        LedgerError::SameAccountTransfer {
            from_id: from_id.to_string(),
            to_id: to_id.to_string(),
        }
    }

    /// Create a BalanceOverflow error
    pub fn balance_overflow(id: &str, balance: i64, amount: i64) -> Self {
        LedgerError::BalanceOverflow {
            id: id.to_string(),
            balance,
            amount,
        }
    }

    /// Create a DuplicateTransaction error
    pub fn duplicate_transaction(id: impl ToString) -> Self {
        LedgerError::DuplicateTransaction { id: id.to_string() }
    }

    /// Create a TransactionNotFound error
    pub fn transaction_not_found(id: impl ToString) -> Self {
        LedgerError::TransactionNotFound { id: id.to_string() }
    }

    /// Create an InvalidCommand error
    pub fn invalid_command(command: &str, reason: impl Into<String>) -> Self {
        LedgerError::InvalidCommand {
            command: command.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by caller input rather than the environment
    ///
    /// Transport layers map client errors to a 4xx-style response and
    /// everything else to a server-side failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            LedgerError::FileNotFound { .. }
                | LedgerError::IoError { .. }
                | LedgerError::DuplicateTransaction { .. }
        )
    }
}
