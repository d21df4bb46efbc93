//! Dump file format for accounts, payments, and favorites
//!
//! This module centralizes the line format of dump files:
//! - One record per line, fields separated by `;`
//! - `Account`:  `id;phone;balance`
//! - `Payment`:  `id;account_id;amount;category;status`
//! - `Favorite`: `id;account_id;name;amount;category`
//!
//! Records are separated by a newline, or by `|` in the legacy single-file
//! account export. No header, no checksum.
//!
//! Reading is deliberately lenient: missing fields read as empty strings and
//! malformed numbers read as zero. Only structurally unreadable input (I/O
//! failure, invalid UTF-8) is reported as an error.

use crate::types::{Account, Favorite, Money, Payment, PaymentStatus, WalletError};
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use serde::Serialize;
use std::io::{Read, Write};

/// Field separator inside a record
pub const FIELD_DELIMITER: u8 = b';';

/// Record separator of the legacy single-file account export
pub const LEGACY_RECORD_DELIMITER: u8 = b'|';

/// Separator between records of a collection
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RecordTerminator {
    /// One record per line
    #[default]
    Newline,

    /// Records separated by `|`
    Legacy,
}

impl RecordTerminator {
    fn for_writer(self) -> Terminator {
        match self {
            RecordTerminator::Newline => Terminator::Any(b'\n'),
            RecordTerminator::Legacy => Terminator::Any(LEGACY_RECORD_DELIMITER),
        }
    }

    fn for_reader(self) -> Terminator {
        match self {
            // CRLF accepts both `\n` and `\r\n`
            RecordTerminator::Newline => Terminator::CRLF,
            RecordTerminator::Legacy => Terminator::Any(LEGACY_RECORD_DELIMITER),
        }
    }
}

/// A record type that can be stored in its own dump file
pub trait DumpRecord: Serialize + Sized {
    /// File name used for this collection in a dump directory
    const FILE_NAME: &'static str;

    /// Build a record from raw fields, without validation
    fn from_fields(record: &StringRecord) -> Self;
}

fn text(record: &StringRecord, index: usize) -> String {
    record.get(index).unwrap_or_default().to_string()
}

fn integer(record: &StringRecord, index: usize) -> i64 {
    record
        .get(index)
        .and_then(|field| field.trim().parse().ok())
        .unwrap_or_default()
}

fn money(record: &StringRecord, index: usize) -> Money {
    record
        .get(index)
        .and_then(|field| field.parse().ok())
        .unwrap_or_default()
}

impl DumpRecord for Account {
    const FILE_NAME: &'static str = "accounts.dump";

    fn from_fields(record: &StringRecord) -> Self {
        Account {
            id: integer(record, 0),
            phone: text(record, 1),
            balance: money(record, 2),
        }
    }
}

impl DumpRecord for Payment {
    const FILE_NAME: &'static str = "payments.dump";

    fn from_fields(record: &StringRecord) -> Self {
        Payment {
            id: text(record, 0),
            account_id: integer(record, 1),
            amount: money(record, 2),
            category: text(record, 3),
            status: record
                .get(4)
                .and_then(|field| field.parse::<PaymentStatus>().ok())
                .unwrap_or_default(),
        }
    }
}

impl DumpRecord for Favorite {
    const FILE_NAME: &'static str = "favorites.dump";

    fn from_fields(record: &StringRecord) -> Self {
        Favorite {
            id: text(record, 0),
            account_id: integer(record, 1),
            name: text(record, 2),
            amount: money(record, 3),
            category: text(record, 4),
        }
    }
}

/// Write records to `output`, one per terminator
///
/// # Errors
///
/// Returns an `IoError` if the underlying writer fails
pub fn write_records<T, W>(
    records: &[T],
    output: W,
    terminator: RecordTerminator,
) -> Result<(), WalletError>
where
    T: DumpRecord,
    W: Write,
{
    let mut writer = WriterBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .has_headers(false)
        .terminator(terminator.for_writer())
        .from_writer(output);

    for record in records {
        writer.serialize(record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Read every record from `input`
///
/// Empty lines and records whose fields are all blank (such as a stray
/// newline after the last legacy `|`) are skipped. Records with missing or
/// malformed fields are still returned, with defaults in place of the bad
/// fields.
///
/// # Errors
///
/// Returns an error if reading fails or the input is not valid UTF-8
pub fn read_records<T, R>(input: R, terminator: RecordTerminator) -> Result<Vec<T>, WalletError>
where
    T: DumpRecord,
    R: Read,
{
    let mut reader = ReaderBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .terminator(terminator.for_reader())
        .from_reader(input);

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        records.push(T::from_fields(&record));
    }

    Ok(records)
}

/// Render records as a string
pub fn format_records<T: DumpRecord>(
    records: &[T],
    terminator: RecordTerminator,
) -> Result<String, WalletError> {
    let mut buffer = Vec::new();
    write_records(records, &mut buffer, terminator)?;

    String::from_utf8(buffer).map_err(|e| WalletError::ParseError {
        line: None,
        message: e.to_string(),
    })
}

/// Parse records from a string
pub fn parse_records<T: DumpRecord>(
    data: &str,
    terminator: RecordTerminator,
) -> Result<Vec<T>, WalletError> {
    read_records(data.as_bytes(), terminator)
}
