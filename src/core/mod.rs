//! Core business logic module
//!
//! This module contains the core wallet components:
//! - `traits` - Seams for ID generation and payment predicates
//! - `ledger` - In-memory collections, ID allocation, lookups, import merge
//! - `service` - Balance-changing operations and persistence entry points
//! - `async` - Parallel aggregation over payments

pub mod r#async;
pub mod ledger;
pub mod service;
pub mod traits;

pub use ledger::Ledger;
pub use r#async::{AggregationConfig, PaymentAggregator};
pub use service::WalletService;
pub use traits::{ByAccount, IdGenerator, PaymentPredicate, UuidGenerator};
