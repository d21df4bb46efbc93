//! Asynchronous aggregation over the payment collection
//!
//! This module provides the parallel, read-only routines that run over a
//! snapshot of the ledger's payments on Tokio tasks:
//!
//! - **PaymentAggregator**: chunked parallel sum and filter, plus per-payment
//!   progress reporting through an unbounded channel
//! - **AggregationConfig**: number of workers per call
//!
//! # Thread Safety
//!
//! Workers only read the shared snapshot; every partial result is task-local
//! and merged after the tasks are joined.

pub mod aggregator;

pub use aggregator::{AggregationConfig, PaymentAggregator};
