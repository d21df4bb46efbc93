//! I/O module
//!
//! Handles the dump file format and moving the ledger to and from disk.
//!
//! # Components
//!
//! - `dump_format` - Record line format (`;`-separated fields), pure readers/writers
//! - `dump_files` - Directory export/import, legacy single-file export, history paging

pub mod dump_files;
pub mod dump_format;

pub use dump_files::{
    export_ledger, export_ledger_with, history_to_files, import_ledger, import_ledger_with,
    DumpConfig, ImportSummary,
};
pub use dump_format::{format_records, parse_records, DumpRecord, RecordTerminator};
