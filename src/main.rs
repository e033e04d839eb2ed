//! Rust Ledger Engine CLI
//!
//! Command-line interface for applying ledger commands from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > accounts.csv
//! cargo run -- --strategy sync commands.csv > accounts.csv
//! cargo run -- --strategy async --batch-size 2000 --worker-threads 8 commands.csv > accounts.csv
//! cargo run -- --audit-log audit.csv commands.csv > accounts.csv
//! RUST_LOG=info cargo run -- --log-format json commands.csv > accounts.csv
//! ```
//!
//! Final account states go to stdout; diagnostics go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, output not writable, etc.)

use rust_ledger_engine::cli::{self, LogFormat};
use rust_ledger_engine::io::write_transactions_csv;
use rust_ledger_engine::strategy;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

/// Initialize tracing on stderr, filtered by `RUST_LOG` (default `warn`)
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().with_target(false).try_init(),
    };
}

fn write_audit_log(path: &Path, engine: &rust_ledger_engine::LedgerEngine) -> Result<(), String> {
    let file = File::create(path)
        .map_err(|e| format!("Failed to create audit log '{}': {}", path.display(), e))?;
    let mut writer = BufWriter::new(file);

    let records = engine.transactions();
    write_transactions_csv(&records, &mut writer).map_err(|e| e.to_string())?;
    tracing::info!(path = %path.display(), records = records.len(), "Audit log written");

    Ok(())
}

fn main() {
    let args = cli::parse_args();
    init_tracing(args.log_format);

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy.clone(), config)
    };

    let mut output = std::io::stdout();
    let engine = match strategy.process(&args.input_file, &mut output) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!(error = %e, "Processing failed");
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Some(path) = &args.audit_log {
        if let Err(e) = write_audit_log(path, &engine) {
            tracing::error!(error = %e, "Audit log export failed");
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
