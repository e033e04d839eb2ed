//! Append-only transaction log
//!
//! This module provides the `TransactionLog` struct, which keeps the audit
//! record of every ledger operation the service attempted.
//!
//! # Design
//!
//! The log uses `DashMap` (a concurrent HashMap) keyed by transaction id.
//! Records are write-once: appending an id that already exists is rejected
//! and the stored record is never replaced. Appends for unrelated records
//! proceed in parallel through DashMap's internal sharding.
//!
//! The ledger core never writes here directly. The ledger service appends a
//! record after each mutation succeeds or is rejected.

use crate::types::{LedgerError, TransactionId, TransactionRecord};
use dashmap::DashMap;

/// Thread-safe, append-only store of transaction records
#[derive(Debug)]
pub struct TransactionLog {
    /// Records keyed by their transaction id
    records: DashMap<TransactionId, TransactionRecord>,
}

impl TransactionLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Append a record
    ///
    /// # Errors
    ///
    /// `DuplicateTransaction` if a record with the same id was already
    /// appended. The stored record is left untouched.
    pub fn append(&self, record: TransactionRecord) -> Result<(), LedgerError> {
        let id = record.id;
        let mut inserted = false;

        // The shard lock is held for the whole check-and-insert
        self.records.entry(id).or_insert_with(|| {
            inserted = true;
            record
        });

        if inserted {
            Ok(())
        } else {
            Err(LedgerError::duplicate_transaction(id))
        }
    }

    /// Get a record by id
    ///
    /// # Errors
    ///
    /// `TransactionNotFound` if no record has this id.
    pub fn get(&self, id: &TransactionId) -> Result<TransactionRecord, LedgerError> {
        self.records
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| LedgerError::transaction_not_found(id))
    }

    /// Snapshot of every record, oldest first
    pub fn all(&self) -> Vec<TransactionRecord> {
        let mut records: Vec<TransactionRecord> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove every record
    pub fn clear(&self) {
        self.records.clear();
    }
}

impl Default for TransactionLog {
    fn default() -> Self {
        Self::new()
    }
}
