//! Wallet Service Library
//! # Overview
//!
//! This library provides an in-memory ledger of accounts, payments, and
//! favorite payments, with flat-file persistence and parallel aggregation
//! over payments.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Money, Account, Payment, Favorite, errors)
//! - [`cli`] - CLI arguments parsing and command execution
//! - [`core`] - Business logic components:
//!   - [`core::ledger`] - In-memory collections, ID allocation, and lookups
//!   - [`core::service`] - Balance-changing operations
//!   - [`core::r#async`] - Parallel sum/filter and progress reporting
//! - [`io`] - Dump file format and directory export/import
//!
//! # Operations
//!
//! - **RegisterAccount**: Create an account for a unique phone number
//! - **Deposit**: Credit an account
//! - **Pay**: Debit an account and record an in-progress payment
//! - **Reject**: Fail a payment and refund it
//! - **Repeat**: Pay again with the details of an earlier payment
//! - **FavoritePayment / PayFromFavorite**: Save and reuse payment templates
//!
//! # Invariants
//!
//! - Phone numbers are unique across accounts
//! - Balances never go negative
//! - Every payment and favorite references an existing account

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use core::{AggregationConfig, Ledger, PaymentAggregator, WalletService};
pub use io::{DumpConfig, ImportSummary, RecordTerminator};
pub use types::{
    Account, AccountId, Favorite, FavoriteId, Money, Payment, PaymentId, PaymentStatus, Progress,
    WalletError,
};
