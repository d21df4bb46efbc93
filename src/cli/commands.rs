//! Command execution
//!
//! Every invocation loads the data directory, runs one command against a
//! fresh `WalletService`, saves the directory back if the command changed the
//! ledger, and prints the result.
//!
//! A command that would save is refused when any dump file failed to load,
//! since saving would replace that file with an incomplete collection.

use super::args::{CliArgs, Command};
use crate::core::WalletService;
use crate::types::{Account, Money, Payment, WalletError};
use std::io::Write;

/// Run the parsed command, writing human-readable output to `output`
///
/// # Errors
///
/// Returns the first `WalletError` raised by the operation or by saving the
/// data directory. Unreadable dump files are only logged for read-only
/// commands; for commands that save, the first load error is returned before
/// anything runs.
pub fn execute(args: &CliArgs, output: &mut dyn Write) -> Result<(), WalletError> {
    let dump_config = args.to_dump_config();
    let mut service = WalletService::new();
    let summary = service.import_with(&args.data_dir, &dump_config);

    if args.command.mutates() {
        if let Some(error) = summary.errors.into_iter().next() {
            return Err(error);
        }
    }

    match &args.command {
        Command::Register { phone } => {
            let account = service.register_account(phone)?;
            write_account(output, &account)?;
        }
        Command::Deposit { account, amount } => {
            service.deposit(*account, Money(*amount))?;
            write_account(output, service.find_account_by_id(*account)?)?;
        }
        Command::Pay {
            account,
            amount,
            category,
        } => {
            let payment = service.pay(*account, Money(*amount), category)?;
            write_payment(output, &payment)?;
        }
        Command::Reject { payment } => {
            service.reject(payment)?;
            write_payment(output, service.find_payment_by_id(payment)?)?;
        }
        Command::Repeat { payment } => {
            let payment = service.repeat(payment)?;
            write_payment(output, &payment)?;
        }
        Command::Favorite { payment, name } => {
            let favorite = service.favorite_payment(payment, name)?;
            writeln!(
                output,
                "{}\t{}\t{}\t{}\t{}",
                favorite.id, favorite.account_id, favorite.name, favorite.amount, favorite.category
            )?;
        }
        Command::PayFavorite { favorite } => {
            let payment = service.pay_from_favorite(favorite)?;
            write_payment(output, &payment)?;
        }
        Command::Accounts => {
            for account in service.accounts() {
                write_account(output, account)?;
            }
        }
        Command::Sum => {
            let workers = args.to_aggregation_config().workers;
            let runtime = build_runtime(workers)?;
            let total = runtime.block_on(service.sum_payments(workers))?;
            writeln!(output, "{}", total)?;
        }
        Command::Filter { account } => {
            service.find_account_by_id(*account)?;
            let workers = args.to_aggregation_config().workers;
            let runtime = build_runtime(workers)?;
            let payments = runtime.block_on(service.filter_payments(*account, workers))?;
            for payment in &payments {
                write_payment(output, payment)?;
            }
        }
        Command::History {
            account,
            out,
            per_file,
        } => {
            let payments = service.export_account_history(*account)?;
            for path in service.history_to_files(&payments, out, *per_file)? {
                writeln!(output, "{}", path.display())?;
            }
        }
        Command::ExportFile { path } => {
            service.export_to_file(path)?;
            writeln!(output, "{}", path.display())?;
        }
        Command::ImportFile { path } => {
            let appended = service.import_from_file(path)?;
            writeln!(output, "{} new accounts", appended)?;
        }
    }

    if args.command.mutates() {
        service.export_with(&args.data_dir, &dump_config)?;
    }

    Ok(())
}

/// Multi-threaded runtime sized to the aggregation worker count
fn build_runtime(workers: usize) -> Result<tokio::runtime::Runtime, WalletError> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .build()
        .map_err(WalletError::from)
}

fn write_account(output: &mut dyn Write, account: &Account) -> Result<(), WalletError> {
    writeln!(
        output,
        "{}\t{}\t{}",
        account.id, account.phone, account.balance
    )?;
    Ok(())
}

fn write_payment(output: &mut dyn Write, payment: &Payment) -> Result<(), WalletError> {
    writeln!(
        output,
        "{}\t{}\t{}\t{}\t{}",
        payment.id, payment.account_id, payment.amount, payment.category, payment.status
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    fn run(dir: &TempDir, command: &[&str]) -> Result<String, WalletError> {
        let data_dir = dir.path().to_string_lossy().into_owned();
        let mut argv = vec!["wallet", "--data-dir", data_dir.as_str()];
        argv.extend_from_slice(command);
        let args = CliArgs::try_parse_from(argv).unwrap();

        let mut output = Vec::new();
        execute(&args, &mut output)?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_register_then_deposit_persists_between_runs() {
        let dir = TempDir::new().unwrap();

        assert_eq!(
            run(&dir, &["register", "+992937452945"]).unwrap(),
            "1\t+992937452945\t0.00\n"
        );
        assert_eq!(
            run(&dir, &["deposit", "1", "1050"]).unwrap(),
            "1\t+992937452945\t10.50\n"
        );
        assert_eq!(
            run(&dir, &["accounts"]).unwrap(),
            "1\t+992937452945\t10.50\n"
        );
    }

    #[test]
    fn test_failed_command_does_not_save() {
        let dir = TempDir::new().unwrap();
        run(&dir, &["register", "+1"]).unwrap();

        let result = run(&dir, &["pay", "1", "100", "auto"]);

        assert!(matches!(result, Err(WalletError::NotEnoughBalance { .. })));
        assert!(!dir.path().join("payments.dump").exists());
    }

    #[test]
    fn test_sum_and_filter() {
        let dir = TempDir::new().unwrap();
        run(&dir, &["register", "+1"]).unwrap();
        run(&dir, &["register", "+2"]).unwrap();
        run(&dir, &["deposit", "1", "1000"]).unwrap();
        run(&dir, &["deposit", "2", "1000"]).unwrap();
        run(&dir, &["pay", "1", "100", "auto"]).unwrap();
        run(&dir, &["pay", "2", "250", "food"]).unwrap();

        assert_eq!(run(&dir, &["--workers", "2", "sum"]).unwrap(), "3.50\n");

        let filtered = run(&dir, &["filter", "2"]).unwrap();
        assert_eq!(filtered.lines().count(), 1);
        assert!(filtered.contains("\tfood\tINPROGRESS"));
    }

    #[rstest]
    #[case::register(&["register", "+999"])]
    #[case::deposit(&["deposit", "1", "100"])]
    #[case::import_file(&["import-file", "missing.txt"])]
    fn test_mutating_command_refused_over_unreadable_dump(#[case] command: &[&str]) {
        let dir = TempDir::new().unwrap();
        let accounts = dir.path().join("accounts.dump");
        let original: &[u8] = b"1;+111;500\n2;+222;700\n3;+333;\xff\n";
        fs::write(&accounts, original).unwrap();

        let result = run(&dir, command);

        assert!(matches!(result, Err(WalletError::ParseError { .. })));
        assert_eq!(fs::read(&accounts).unwrap(), original);
    }

    #[test]
    fn test_read_only_command_runs_over_unreadable_dump() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("accounts.dump"), b"1;+111;\xff\n").unwrap();
        fs::write(dir.path().join("payments.dump"), "p-1;1;250;auto;OK\n").unwrap();

        assert_eq!(run(&dir, &["sum"]).unwrap(), "2.50\n");
    }

    #[test]
    fn test_legacy_data_dir() {
        let dir = TempDir::new().unwrap();
        run(&dir, &["--legacy", "register", "+1"]).unwrap();
        run(&dir, &["--legacy", "register", "+2"]).unwrap();

        let raw = fs::read_to_string(dir.path().join("accounts.dump")).unwrap();
        assert_eq!(raw, "1;+1;0|2;+2;0|");
        assert_eq!(run(&dir, &["--legacy", "accounts"]).unwrap().lines().count(), 2);
    }
}
