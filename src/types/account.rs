//! Account-related types for the ledger engine
//!
//! This module defines the Account record and the boundary request used to
//! open one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account identifier
///
/// Opaque, unique and immutable. Generated as a UUID v4 string when the
/// account is created.
pub type AccountId = String;

/// A named holder of a non-negative balance
///
/// Balances are signed 64-bit integers in minor currency units (e.g. cents)
/// so that overdrafts are representable and can be rejected, but no operation
/// in this crate ever stores a negative balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier, never changes after creation
    pub id: AccountId,

    /// Holder name, non-empty and immutable after creation
    #[serde(rename = "owner_name")]
    pub customer_name: String,

    /// Current balance in minor currency units
    ///
    /// Invariant: `balance >= 0` whenever the account is observable through
    /// the store.
    pub balance: i64,

    /// Creation instant
    pub created_at: DateTime<Utc>,

    /// Instant of the last balance mutation
    ///
    /// Equal to `created_at` until the first deposit, withdrawal or transfer.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Stamp `updated_at` with `now`, never moving it backwards
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = self.updated_at.max(now);
    }
}

/// Request to open a new account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub customer_name: String,
    pub initial_balance: i64,
}

impl CreateAccountRequest {
    pub fn new(customer_name: impl Into<String>, initial_balance: i64) -> Self {
        Self {
            customer_name: customer_name.into(),
            initial_balance,
        }
    }
}
