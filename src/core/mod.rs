//! Core business logic module
//!
//! This module contains the ledger components:
//! - `operations` - Pure account creation, validation and balance rules
//! - `account_store` - Thread-safe account storage with atomic update cycles
//! - `transaction_log` - Append-only audit records
//! - `ledger` - Service tying store, operations and log together
//! - `engine` - Reference-based command processing
//! - `batch_processor` - Concurrent batch processing over disjoint accounts

pub mod account_store;
pub mod batch_processor;
pub mod engine;
pub mod ledger;
pub mod operations;
pub mod transaction_log;

pub use account_store::AccountStore;
pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use engine::LedgerEngine;
pub use ledger::Ledger;
pub use transaction_log::TransactionLog;
