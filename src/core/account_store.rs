//! Account store
//!
//! This module provides the `AccountStore` struct, the single authoritative,
//! thread-safe collection of account records.
//!
//! # Design
//!
//! All records live in one `HashMap` guarded by one collection-wide `RwLock`:
//! - `get`, `list_all`, `len` take the read lock and may run concurrently
//! - `create`, `update`, `clear`, `mutate_accounts` take the write lock and
//!   exclude everything else
//!
//! Records are handed out as clones, never as references into the map, so a
//! caller can only make a change visible by writing it back through the store.
//!
//! # Atomic read-validate-write cycles
//!
//! A `get` followed by an `update` is two separate critical sections: two
//! concurrent debits of the same account could both validate against the same
//! stale balance and the second write would silently discard the first.
//! `mutate_accounts` closes that gap by running the whole fetch, validate,
//! mutate and write-back cycle under a single write lock. Ledger mutations go
//! through it; `get`/`update` remain for plain reads and administrative
//! overwrites.

use crate::types::{Account, AccountId, LedgerError};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe keyed collection of account records
///
/// The lock is internal and never exposed. Every method is a single critical
/// section.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl AccountStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a new account
    ///
    /// # Errors
    ///
    /// `DuplicateAccount` if an account with the same identifier exists; the
    /// existing record is left untouched.
    pub fn create(&self, account: Account) -> Result<(), LedgerError> {
        let mut accounts = self.write();

        if accounts.contains_key(&account.id) {
            return Err(LedgerError::duplicate_account(&account.id));
        }

        accounts.insert(account.id.clone(), account);
        Ok(())
    }

    /// Get a snapshot of an account
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if no account has this identifier.
    pub fn get(&self, id: &str) -> Result<Account, LedgerError> {
        self.read()
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    /// Replace a stored account with `account` (last writer wins)
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if no account has `account.id`.
    pub fn update(&self, account: Account) -> Result<(), LedgerError> {
        let mut accounts = self.write();

        match accounts.get_mut(&account.id) {
            Some(stored) => {
                *stored = account;
                Ok(())
            }
            None => Err(LedgerError::account_not_found(&account.id)),
        }
    }

    /// Snapshot of every account, in no particular order
    pub fn list_all(&self) -> Vec<Account> {
        self.read().values().cloned().collect()
    }

    /// Remove every account
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Whether an account with this identifier exists
    pub fn contains(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    /// Number of stored accounts
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the store holds no accounts
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Run a read-validate-write cycle over several accounts atomically
    ///
    /// Under one write lock, fetches a working copy of every account in `ids`
    /// (in the given order), hands them to `f`, and writes all of them back
    /// only if `f` returns `Ok`. No other store operation can observe or
    /// interleave with the cycle.
    ///
    /// `ids` should be distinct. If an id is repeated, `f` receives one copy
    /// per occurrence and the last copy wins on write-back. Records are
    /// written back under the identifiers they were fetched with; changes
    /// `f` makes to `id` are discarded.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` for the first id with no stored account; `f` is not called
    /// - any error returned by `f`; nothing is written back
    pub fn mutate_accounts<T, F>(&self, ids: &[&str], f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut [Account]) -> Result<T, LedgerError>,
    {
        let mut accounts = self.write();

        let mut working = ids
            .iter()
            .map(|id| {
                accounts
                    .get(*id)
                    .cloned()
                    .ok_or_else(|| LedgerError::account_not_found(id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let output = f(&mut working)?;

        for (id, mut account) in ids.iter().zip(working) {
            account.id = id.to_string();
            accounts.insert(account.id.clone(), account);
        }

        Ok(output)
    }

    /// Run a read-validate-write cycle over a single account atomically
    ///
    /// See [`mutate_accounts`](Self::mutate_accounts).
    pub fn mutate_account<T, F>(&self, id: &str, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Account) -> Result<T, LedgerError>,
    {
        self.mutate_accounts(&[id], |accounts| match accounts {
            [account] => f(account),
            _ => Err(LedgerError::account_not_found(id)),
        })
    }

    // A panic inside a mutation closure only ever touched working copies,
    // so the map behind a poisoned lock is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<AccountId, Account>> {
        self.accounts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<AccountId, Account>> {
        self.accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
