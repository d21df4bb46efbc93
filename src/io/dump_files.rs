//! Directory-based export and import of the ledger
//!
//! Export overwrites whole files; there is no journaling. Import merges by
//! ID into whatever is already in memory, and a broken file only costs its
//! own collection.

use crate::core::ledger::Ledger;
use crate::io::dump_format::{read_records, write_records, DumpRecord, RecordTerminator};
use crate::types::{Account, Favorite, Payment, WalletError};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Configuration for dump files
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DumpConfig {
    /// Maximum number of payments per history file
    pub records_per_file: usize,
    /// Separator between records in directory dumps
    pub record_terminator: RecordTerminator,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            records_per_file: 100,
            record_terminator: RecordTerminator::Newline,
        }
    }
}

impl DumpConfig {
    /// Create a new DumpConfig, falling back to the default page size on zero
    pub fn new(records_per_file: usize, record_terminator: RecordTerminator) -> Self {
        let default = Self::default();

        let records_per_file = if records_per_file == 0 {
            tracing::warn!(
                records_per_file,
                default = default.records_per_file,
                "invalid records per file, using default"
            );
            default.records_per_file
        } else {
            records_per_file
        };

        Self {
            records_per_file,
            record_terminator,
        }
    }
}

/// Outcome of an import
///
/// Counts are records read from each file. Files that could not be read are
/// listed in `errors` and contributed nothing.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ImportSummary {
    pub accounts: usize,
    pub payments: usize,
    pub favorites: usize,
    pub errors: Vec<WalletError>,
}

impl ImportSummary {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

fn write_file<T: DumpRecord>(
    records: &[T],
    path: &Path,
    terminator: RecordTerminator,
) -> Result<(), WalletError> {
    let file = File::create(path).map_err(|e| WalletError::io(path, e))?;
    write_records(records, BufWriter::new(file), terminator).map_err(|e| with_path(e, path))
}

fn read_file<T: DumpRecord>(
    path: &Path,
    terminator: RecordTerminator,
) -> Result<Vec<T>, WalletError> {
    let file = File::open(path).map_err(|e| WalletError::io(path, e))?;
    read_records(BufReader::new(file), terminator).map_err(|e| with_path(e, path))
}

fn with_path(error: WalletError, path: &Path) -> WalletError {
    match error {
        WalletError::IoError { path: None, message } => WalletError::IoError {
            path: Some(path.display().to_string()),
            message,
        },
        other => other,
    }
}

fn create_dir(dir: &Path) -> Result<(), WalletError> {
    fs::create_dir_all(dir).map_err(|e| WalletError::io(dir, e))
}

/// Export the three collections into `dir` with default settings
///
/// See [`export_ledger_with`].
pub fn export_ledger(ledger: &Ledger, dir: &Path) -> Result<(), WalletError> {
    export_ledger_with(ledger, dir, &DumpConfig::default())
}

/// Write `accounts.dump`, `payments.dump`, and `favorites.dump` into `dir`
///
/// The directory is created if needed. A file is skipped (and any previous
/// version left alone) when its collection is empty.
///
/// # Errors
///
/// Returns the first I/O error; files written before it stay on disk
pub fn export_ledger_with(
    ledger: &Ledger,
    dir: &Path,
    config: &DumpConfig,
) -> Result<(), WalletError> {
    create_dir(dir)?;
    let terminator = config.record_terminator;

    if !ledger.accounts().is_empty() {
        write_file(ledger.accounts(), &dir.join(Account::FILE_NAME), terminator)?;
    }
    if !ledger.payments().is_empty() {
        write_file(ledger.payments(), &dir.join(Payment::FILE_NAME), terminator)?;
    }
    if !ledger.favorites().is_empty() {
        write_file(ledger.favorites(), &dir.join(Favorite::FILE_NAME), terminator)?;
    }

    tracing::info!(
        dir = %dir.display(),
        accounts = ledger.accounts().len(),
        payments = ledger.payments().len(),
        favorites = ledger.favorites().len(),
        "ledger exported"
    );
    Ok(())
}

/// Import the dump files in `dir` with default settings
///
/// See [`import_ledger_with`].
pub fn import_ledger(ledger: &mut Ledger, dir: &Path) -> ImportSummary {
    import_ledger_with(ledger, dir, &DumpConfig::default())
}

/// Merge `accounts.dump`, `payments.dump`, and `favorites.dump` from `dir`
///
/// Records whose ID already exists overwrite the in-memory record; others are
/// appended. Missing files are skipped silently. A file that fails to read is
/// logged, recorded in the summary, and skipped; the remaining files are
/// still imported.
pub fn import_ledger_with(ledger: &mut Ledger, dir: &Path, config: &DumpConfig) -> ImportSummary {
    let terminator = config.record_terminator;
    let mut summary = ImportSummary::default();

    if let Some(accounts) = load::<Account>(dir, terminator, &mut summary.errors) {
        summary.accounts = accounts.len();
        ledger.upsert_accounts(accounts);
    }
    if let Some(payments) = load::<Payment>(dir, terminator, &mut summary.errors) {
        summary.payments = payments.len();
        ledger.upsert_payments(payments);
    }
    if let Some(favorites) = load::<Favorite>(dir, terminator, &mut summary.errors) {
        summary.favorites = favorites.len();
        ledger.upsert_favorites(favorites);
    }

    tracing::info!(
        dir = %dir.display(),
        accounts = summary.accounts,
        payments = summary.payments,
        favorites = summary.favorites,
        failed = summary.errors.len(),
        "ledger imported"
    );
    summary
}

fn load<T: DumpRecord>(
    dir: &Path,
    terminator: RecordTerminator,
    errors: &mut Vec<WalletError>,
) -> Option<Vec<T>> {
    let path = dir.join(T::FILE_NAME);
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "dump file not present, skipping");
        return None;
    }

    match read_file(&path, terminator) {
        Ok(records) => Some(records),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to import dump file");
            errors.push(e);
            None
        }
    }
}

/// Write accounts to a single file using the legacy `|` record separator
///
/// Parent directories are created if needed.
pub fn export_accounts_file(accounts: &[Account], path: &Path) -> Result<(), WalletError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir(parent)?;
    }

    write_file(accounts, path, RecordTerminator::Legacy)?;
    tracing::info!(path = %path.display(), accounts = accounts.len(), "accounts exported");
    Ok(())
}

/// Read accounts from a legacy `|`-separated file
pub fn import_accounts_file(path: &Path) -> Result<Vec<Account>, WalletError> {
    read_file(path, RecordTerminator::Legacy)
}

/// Split `payments` into files of at most `records_per_file` records
///
/// A list that fits one file is written to `payments.dump`; longer lists go
/// to `payments1.dump`, `payments2.dump`, ... An empty list writes nothing.
/// A zero page size falls back to the [`DumpConfig`] default.
///
/// # Returns
///
/// The paths written, in order
pub fn history_to_files(
    payments: &[Payment],
    dir: &Path,
    records_per_file: usize,
) -> Result<Vec<PathBuf>, WalletError> {
    if payments.is_empty() {
        return Ok(Vec::new());
    }

    let config = DumpConfig::new(records_per_file, RecordTerminator::Newline);
    create_dir(dir)?;

    if payments.len() <= config.records_per_file {
        let path = dir.join(Payment::FILE_NAME);
        write_file(payments, &path, config.record_terminator)?;
        return Ok(vec![path]);
    }

    let mut written = Vec::new();
    for (index, page) in payments.chunks(config.records_per_file).enumerate() {
        let path = dir.join(format!("payments{}.dump", index + 1));
        write_file(page, &path, config.record_terminator)?;
        written.push(path);
    }

    tracing::info!(dir = %dir.display(), files = written.len(), "payment history written");
    Ok(written)
}
