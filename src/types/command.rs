//! Ledger commands read from batch input
//!
//! Account identifiers are generated when an account is opened, so batch
//! input cannot know them up front. Commands instead name accounts by a
//! caller-chosen reference which the engine maps to the generated id.

/// Caller-chosen alias for an account within one processing run
pub type AccountRef = String;

/// A single ledger command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCommand {
    /// Open a new account and bind it to `reference`
    Open {
        reference: AccountRef,
        customer_name: String,
        initial_balance: i64,
    },

    /// Credit `amount` to the referenced account
    Deposit { reference: AccountRef, amount: i64 },

    /// Debit `amount` from the referenced account
    Withdraw { reference: AccountRef, amount: i64 },

    /// Move `amount` from `from` to `to`
    Transfer {
        from: AccountRef,
        to: AccountRef,
        amount: i64,
    },
}

impl LedgerCommand {
    /// Every account reference this command touches
    ///
    /// Two commands that share a reference must be applied in input order.
    pub fn references(&self) -> Vec<&str> {
        match self {
            LedgerCommand::Open { reference, .. }
            | LedgerCommand::Deposit { reference, .. }
            | LedgerCommand::Withdraw { reference, .. } => vec![reference.as_str()],
            LedgerCommand::Transfer { from, to, .. } => vec![from.as_str(), to.as_str()],
        }
    }

    /// Command name as written in the input
    pub fn name(&self) -> &'static str {
        match self {
            LedgerCommand::Open { .. } => "open",
            LedgerCommand::Deposit { .. } => "deposit",
            LedgerCommand::Withdraw { .. } => "withdraw",
            LedgerCommand::Transfer { .. } => "transfer",
        }
    }
}
