//! Synchronous processing strategy
//!
//! Single-threaded pipeline: `SyncReader` streams commands one row at a time
//! and each command is applied to the `LedgerEngine` before the next row is
//! read. Memory use is O(accounts + audit records), independent of how the
//! input is laid out.

use crate::core::LedgerEngine;
use crate::io::csv_format::write_accounts_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::ProcessingStrategy;
use std::io::Write;
use std::path::Path;

/// Synchronous processing strategy
///
/// ```no_run
/// use rust_ledger_engine::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy;
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("commands.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<LedgerEngine, String> {
        let engine = LedgerEngine::new();
        let reader = SyncReader::new(input_path).map_err(|e| e.to_string())?;

        for result in reader {
            match result {
                Ok(command) => {
                    let name = command.name();
                    if let Err(e) = engine.process(command) {
                        tracing::warn!(command = name, error = %e, "Command rejected");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Skipping row"),
            }
        }

        write_accounts_csv(&engine.accounts(), output).map_err(|e| e.to_string())?;

        Ok(engine)
    }
}
