use crate::core::AggregationConfig;
use crate::io::{DumpConfig, RecordTerminator};
use crate::types::AccountId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Manage a flat-file wallet of accounts, payments, and favorites
#[derive(Parser, Debug)]
#[command(name = "wallet")]
#[command(about = "Manage a flat-file wallet of accounts, payments, and favorites", long_about = None)]
pub struct CliArgs {
    /// Directory holding accounts.dump, payments.dump, and favorites.dump
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        env = "WALLET_DATA_DIR",
        default_value = "data",
        global = true
    )]
    pub data_dir: PathBuf,

    /// Number of concurrent workers for aggregation commands
    #[arg(
        long = "workers",
        value_name = "COUNT",
        env = "WALLET_WORKERS",
        global = true,
        help = "Number of concurrent workers for sum/filter (default: CPU cores)"
    )]
    pub workers: Option<usize>,

    /// Separate records with '|' instead of newlines in the data directory
    #[arg(long = "legacy", global = true)]
    pub legacy: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Wallet commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Register a new account
    Register {
        /// Phone number, unique per account
        phone: String,
    },

    /// Credit an account
    Deposit {
        account: AccountId,
        /// Amount in cents
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },

    /// Pay from an account
    Pay {
        account: AccountId,
        /// Amount in cents
        #[arg(allow_negative_numbers = true)]
        amount: i64,
        category: String,
    },

    /// Reject a payment and refund it
    Reject { payment: String },

    /// Repeat an existing payment
    Repeat { payment: String },

    /// Save a payment as a named favorite
    Favorite { payment: String, name: String },

    /// Pay using a saved favorite
    #[command(name = "pay-favorite")]
    PayFavorite { favorite: String },

    /// List all accounts
    Accounts,

    /// Sum all payments in parallel
    Sum,

    /// List the payments of an account, filtered in parallel
    Filter { account: AccountId },

    /// Write the payment history of an account to paged dump files
    History {
        account: AccountId,
        /// Output directory
        #[arg(long = "out", value_name = "DIR")]
        out: PathBuf,
        /// Maximum records per file
        #[arg(long = "per-file", value_name = "COUNT", default_value_t = 100)]
        per_file: usize,
    },

    /// Write all accounts to a single '|'-separated file
    #[command(name = "export-file")]
    ExportFile { path: PathBuf },

    /// Merge accounts from a single '|'-separated file
    #[command(name = "import-file")]
    ImportFile { path: PathBuf },
}

impl Command {
    /// Whether the command changes the ledger and must be saved afterwards
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Command::Register { .. }
                | Command::Deposit { .. }
                | Command::Pay { .. }
                | Command::Reject { .. }
                | Command::Repeat { .. }
                | Command::Favorite { .. }
                | Command::PayFavorite { .. }
                | Command::ImportFile { .. }
        )
    }
}

impl CliArgs {
    /// Create an AggregationConfig from CLI arguments
    ///
    /// Falls back to the default (CPU cores) when no worker count is given.
    pub fn to_aggregation_config(&self) -> AggregationConfig {
        match self.workers {
            Some(workers) => AggregationConfig::new(workers),
            None => AggregationConfig::default(),
        }
    }

    /// Create the DumpConfig used for the data directory
    pub fn to_dump_config(&self) -> DumpConfig {
        let terminator = if self.legacy {
            RecordTerminator::Legacy
        } else {
            RecordTerminator::Newline
        };
        DumpConfig::new(DumpConfig::default().records_per_file, terminator)
    }
}
