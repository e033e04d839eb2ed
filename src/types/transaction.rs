//! Transaction-related types for the ledger engine
//!
//! This module defines the boundary requests for balance mutations, the
//! side-effect-free receipts returned by successful mutations, and the audit
//! records built from them.

use super::account::AccountId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transaction identifier
///
/// Generated (UUID v4) when an audit record is built.
pub type TransactionId = Uuid;

/// Kinds of balance mutation recorded in the transaction log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Credit funds to a single account
    Deposit,

    /// Debit funds from a single account
    ///
    /// Requires the balance to cover the amount.
    Withdrawal,

    /// Move funds from one account to a different one
    ///
    /// Debit and credit are applied together or not at all.
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Transfer => "transfer",
        }
    }
}

/// Lifecycle status of an audit record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
        }
    }
}

/// Request to credit an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRequest {
    pub account_id: AccountId,
    pub amount: i64,
}

/// Request to debit an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawRequest {
    pub account_id: AccountId,
    pub amount: i64,
}

/// Request to move funds between two accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    pub amount: i64,
}

/// Balance movement applied to one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceChange {
    /// Account whose balance changed
    pub account_id: AccountId,

    /// Balance before the mutation
    pub previous: i64,

    /// Balance after the mutation
    pub current: i64,
}

impl BalanceChange {
    /// Signed difference applied to the balance
    pub fn delta(&self) -> i64 {
        self.current - self.previous
    }
}

/// Description of a completed ledger operation
///
/// Returned by every successful mutation. It holds enough information for the
/// caller to build and persist an audit record; producing it has no side
/// effects.
///
/// For transfers `changes` holds the debited account first and the credited
/// account second. Deposits and withdrawals hold a single change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_type: TransactionType,
    pub amount: i64,
    pub timestamp: DateTime<Utc>,
    pub changes: Vec<BalanceChange>,
}

impl Receipt {
    /// The account a deposit or withdrawal applied to (the debited one for transfers)
    pub fn account_id(&self) -> Option<&str> {
        self.changes.first().map(|change| change.account_id.as_str())
    }

    /// The credited account of a transfer
    pub fn counterparty_id(&self) -> Option<&str> {
        self.changes.get(1).map(|change| change.account_id.as_str())
    }

    /// Sum of all balance deltas
    ///
    /// Zero for transfers (money is conserved), `+amount` for deposits and
    /// `-amount` for withdrawals.
    pub fn net_change(&self) -> i64 {
        self.changes.iter().map(BalanceChange::delta).sum()
    }
}

/// Audit record of a ledger operation
///
/// Deposits and withdrawals set `account_id`; transfers set `from_account_id`
/// and `to_account_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: TransactionId,

    #[serde(rename = "type")]
    pub tx_type: TransactionType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_account_id: Option<AccountId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_account_id: Option<AccountId>,

    pub amount: i64,

    pub timestamp: DateTime<Utc>,

    pub status: TransactionStatus,
}

impl TransactionRecord {
    /// Build a completed record from the receipt of a successful mutation
    pub fn completed(receipt: &Receipt) -> Self {
        let (account_id, from_account_id, to_account_id) = match receipt.tx_type {
            TransactionType::Transfer => (
                None,
                receipt.account_id().map(str::to_string),
                receipt.counterparty_id().map(str::to_string),
            ),
            TransactionType::Deposit | TransactionType::Withdrawal => {
                (receipt.account_id().map(str::to_string), None, None)
            }
        };

        Self {
            id: Uuid::new_v4(),
            tx_type: receipt.tx_type,
            account_id,
            from_account_id,
            to_account_id,
            amount: receipt.amount,
            timestamp: receipt.timestamp,
            status: TransactionStatus::Completed,
        }
    }

    /// Build a failed record for a rejected deposit or withdrawal
    pub fn failed(tx_type: TransactionType, account_id: &str, amount: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            tx_type,
            account_id: Some(account_id.to_string()),
            from_account_id: None,
            to_account_id: None,
            amount,
            timestamp: Utc::now(),
            status: TransactionStatus::Failed,
        }
    }

    /// Build a failed record for a rejected transfer
    pub fn failed_transfer(from_account_id: &str, to_account_id: &str, amount: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            tx_type: TransactionType::Transfer,
            account_id: None,
            from_account_id: Some(from_account_id.to_string()),
            to_account_id: Some(to_account_id.to_string()),
            amount,
            timestamp: Utc::now(),
            status: TransactionStatus::Failed,
        }
    }
}
