//! Processing strategy module for ledger command processing
//!
//! This module defines the Strategy pattern for complete processing pipelines,
//! covering both CSV parsing and command processing. This allows different
//! implementations (synchronous, asynchronous batch) to be selected at runtime.

use crate::cli::StrategyType;
use crate::core::LedgerEngine;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete ledger pipelines
///
/// Each strategy reads commands from a CSV file, applies them to a fresh
/// engine and writes the final account states to `output`.
pub trait ProcessingStrategy: Send + Sync {
    /// Process commands from `input_path` and write account states to `output`
    ///
    /// Returns the engine holding the final ledger state so the caller can
    /// export further views (such as the audit log).
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal pipeline failures:
    /// - The input file cannot be opened
    /// - The output cannot be written
    /// - The async runtime cannot be created
    ///
    /// Malformed rows and rejected commands are logged and skipped.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<LedgerEngine, String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` only applies to the async strategy; `None` uses the defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}
