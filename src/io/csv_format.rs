//! CSV format handling for ledger commands, account output and audit records
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to ledger commands
//! - Account and audit log serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{Account, AccountRef, LedgerCommand, LedgerError, TransactionRecord};
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: type, account, to_account,
/// amount, name. Only `type` and `account` are required by every command;
/// trailing columns may be left empty or omitted.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub command: String,
    pub account: String,
    pub to_account: Option<String>,
    pub amount: Option<String>,
    pub name: Option<String>,
}

/// Convert a CsvRecord to a LedgerCommand
///
/// - `open` takes `name` and an optional `amount` (initial balance, default 0)
/// - `deposit`, `withdraw` (or `withdrawal`) take `amount`
/// - `transfer` takes `to_account` and `amount`
///
/// Command types are case-insensitive. Amounts are integers in minor units;
/// their sign is validated by the ledger, not here.
///
/// # Errors
///
/// `InvalidCommand` if the type is unknown, a required column is missing or
/// the amount is not an integer.
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<LedgerCommand, LedgerError> {
    let command = csv_record.command.trim().to_lowercase();
    let reference = required(&command, "account", Some(csv_record.account))?;

    match command.as_str() {
        "open" => {
            let customer_name = required(&command, "name", csv_record.name)?;
            let initial_balance = match non_empty(csv_record.amount) {
                Some(amount) => parse_amount(&command, &amount)?,
                None => 0,
            };

            Ok(LedgerCommand::Open {
                reference,
                customer_name,
                initial_balance,
            })
        }
        "deposit" => Ok(LedgerCommand::Deposit {
            reference,
            amount: required_amount(&command, csv_record.amount)?,
        }),
        "withdraw" | "withdrawal" => Ok(LedgerCommand::Withdraw {
            reference,
            amount: required_amount(&command, csv_record.amount)?,
        }),
        "transfer" => Ok(LedgerCommand::Transfer {
            to: required(&command, "to_account", csv_record.to_account)?,
            from: reference,
            amount: required_amount(&command, csv_record.amount)?,
        }),
        _ => Err(LedgerError::invalid_command(
            &csv_record.command,
            "unknown command type",
        )),
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required(command: &str, column: &str, field: Option<String>) -> Result<String, LedgerError> {
    non_empty(field)
        .ok_or_else(|| LedgerError::invalid_command(command, format!("requires '{}'", column)))
}

fn required_amount(command: &str, field: Option<String>) -> Result<i64, LedgerError> {
    let amount = required(command, "amount", field)?;
    parse_amount(command, &amount)
}

fn parse_amount(command: &str, amount: &str) -> Result<i64, LedgerError> {
    amount.parse::<i64>().map_err(|_| {
        LedgerError::invalid_command(command, format!("invalid amount '{}'", amount))
    })
}

/// Write final account states to CSV
///
/// Columns: account, owner_name, balance. Rows are sorted by reference for
/// deterministic output.
pub fn write_accounts_csv(
    accounts: &[(AccountRef, Account)],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["account", "owner_name", "balance"])?;

    let mut sorted: Vec<&(AccountRef, Account)> = accounts.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    for (reference, account) in sorted {
        writer.write_record([
            reference.as_str(),
            account.customer_name.as_str(),
            account.balance.to_string().as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the audit log to CSV
///
/// Columns: id, type, account_id, from_account_id, to_account_id, amount,
/// timestamp (RFC 3339), status. Unused account columns are left empty.
pub fn write_transactions_csv(
    records: &[TransactionRecord],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record([
        "id",
        "type",
        "account_id",
        "from_account_id",
        "to_account_id",
        "amount",
        "timestamp",
        "status",
    ])?;

    for record in records {
        writer.write_record([
            record.id.to_string().as_str(),
            record.tx_type.as_str(),
            record.account_id.as_deref().unwrap_or_default(),
            record.from_account_id.as_deref().unwrap_or_default(),
            record.to_account_id.as_deref().unwrap_or_default(),
            record.amount.to_string().as_str(),
            record.timestamp.to_rfc3339().as_str(),
            record.status.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BalanceChange, Receipt, TransactionType};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn csv_record(
        command: &str,
        account: &str,
        to_account: Option<&str>,
        amount: Option<&str>,
        name: Option<&str>,
    ) -> CsvRecord {
        CsvRecord {
            command: command.to_string(),
            account: account.to_string(),
            to_account: to_account.map(str::to_string),
            amount: amount.map(str::to_string),
            name: name.map(str::to_string),
        }
    }

    fn account(name: &str, balance: i64) -> Account {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Account {
            id: format!("id-{}", name),
            customer_name: name.to_string(),
            balance,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    #[case("deposit")]
    #[case("DEPOSIT")] // case insensitive
    #[case("  Deposit ")]
    fn test_convert_deposit(#[case] command: &str) {
        let record = csv_record(command, "alice", None, Some("100"), None);

        assert_eq!(
            convert_csv_record(record).unwrap(),
            LedgerCommand::Deposit {
                reference: "alice".to_string(),
                amount: 100,
            }
        );
    }

    #[rstest]
    #[case("withdraw")]
    #[case("withdrawal")]
    fn test_convert_withdraw_aliases(#[case] command: &str) {
        let record = csv_record(command, "alice", None, Some("40"), None);

        assert_eq!(
            convert_csv_record(record).unwrap(),
            LedgerCommand::Withdraw {
                reference: "alice".to_string(),
                amount: 40,
            }
        );
    }

    #[test]
    fn test_convert_open_with_and_without_balance() {
        let with_balance = csv_record("open", "alice", None, Some("500"), Some("Alice Smith"));
        let without_balance = csv_record("open", "bob", None, None, Some("Bob"));

        assert_eq!(
            convert_csv_record(with_balance).unwrap(),
            LedgerCommand::Open {
                reference: "alice".to_string(),
                customer_name: "Alice Smith".to_string(),
                initial_balance: 500,
            }
        );
        assert_eq!(
            convert_csv_record(without_balance).unwrap(),
            LedgerCommand::Open {
                reference: "bob".to_string(),
                customer_name: "Bob".to_string(),
                initial_balance: 0,
            }
        );
    }

    #[test]
    fn test_convert_transfer() {
        let record = csv_record("transfer", "alice", Some("bob"), Some("25"), None);

        assert_eq!(
            convert_csv_record(record).unwrap(),
            LedgerCommand::Transfer {
                from: "alice".to_string(),
                to: "bob".to_string(),
                amount: 25,
            }
        );
    }

    #[test]
    fn test_convert_negative_amount_is_left_to_ledger() {
        let record = csv_record("deposit", "alice", None, Some("-5"), None);

        assert_eq!(
            convert_csv_record(record).unwrap(),
            LedgerCommand::Deposit {
                reference: "alice".to_string(),
                amount: -5,
            }
        );
    }

    #[rstest]
    #[case::unknown_type("refund", "alice", None, Some("1"), None, "unknown command type")]
    #[case::missing_account("deposit", "", None, Some("1"), None, "requires 'account'")]
    #[case::deposit_missing_amount("deposit", "alice", None, None, None, "requires 'amount'")]
    #[case::withdraw_blank_amount("withdraw", "alice", None, Some("  "), None, "requires 'amount'")]
    #[case::decimal_amount("deposit", "alice", None, Some("10.50"), None, "invalid amount")]
    #[case::text_amount("deposit", "alice", None, Some("ten"), None, "invalid amount")]
    #[case::open_missing_name("open", "alice", None, Some("1"), None, "requires 'name'")]
    #[case::transfer_missing_target("transfer", "alice", None, Some("1"), None, "requires 'to_account'")]
    fn test_convert_errors(
        #[case] command: &str,
        #[case] account: &str,
        #[case] to_account: Option<&str>,
        #[case] amount: Option<&str>,
        #[case] name: Option<&str>,
        #[case] expected_error: &str,
    ) {
        let record = csv_record(command, account, to_account, amount, name);

        let error = convert_csv_record(record).unwrap_err();

        assert!(matches!(error, LedgerError::InvalidCommand { .. }));
        assert!(
            error.to_string().contains(expected_error),
            "unexpected error: {}",
            error
        );
    }

    #[rstest]
    #[case::empty(vec![], "account,owner_name,balance\n")]
    #[case::sorted_by_reference(
        vec![
            ("carol".to_string(), account("Carol", 3)),
            ("alice".to_string(), account("Alice", 1)),
            ("bob".to_string(), account("Bob", 0)),
        ],
        "account,owner_name,balance\nalice,Alice,1\nbob,Bob,0\ncarol,Carol,3\n"
    )]
    #[case::quoted_name(
        vec![("a".to_string(), account("Smith, Jane", 10))],
        "account,owner_name,balance\na,\"Smith, Jane\",10\n"
    )]
    fn test_write_accounts_csv(
        #[case] accounts: Vec<(AccountRef, Account)>,
        #[case] expected_output: &str,
    ) {
        let mut output = Vec::new();
        write_accounts_csv(&accounts, &mut output).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), expected_output);
    }

    #[test]
    fn test_write_transactions_csv() {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let receipt = Receipt {
            tx_type: TransactionType::Transfer,
            amount: 30,
            timestamp,
            changes: vec![
                BalanceChange {
                    account_id: "a".to_string(),
                    previous: 100,
                    current: 70,
                },
                BalanceChange {
                    account_id: "b".to_string(),
                    previous: 0,
                    current: 30,
                },
            ],
        };
        let transfer = TransactionRecord::completed(&receipt);
        let mut failed = TransactionRecord::failed(TransactionType::Withdrawal, "a", 500);
        failed.timestamp = timestamp;

        let mut output = Vec::new();
        write_transactions_csv(&[transfer.clone(), failed.clone()], &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            "id,type,account_id,from_account_id,to_account_id,amount,timestamp,status"
        );
        assert_eq!(
            lines[1],
            format!(
                "{},transfer,,a,b,30,2024-03-01T12:00:00+00:00,completed",
                transfer.id
            )
        );
        assert_eq!(
            lines[2],
            format!(
                "{},withdrawal,a,,,500,2024-03-01T12:00:00+00:00,failed",
                failed.id
            )
        );
    }
}
