//! Core traits for identifier generation and payment selection
//!
//! These are the seams where the ledger talks to collaborators it does not
//! own: the source of unique payment/favorite IDs, and caller-supplied
//! predicates used by the parallel filter.

use crate::types::{AccountId, Payment};
use uuid::Uuid;

/// Source of globally unique opaque identifiers
///
/// Used for payment and favorite IDs. Implementations must never return the
/// same value twice for the lifetime of a ledger.
pub trait IdGenerator: Send {
    /// Produce the next unique identifier
    fn next_id(&mut self) -> String;
}

/// Random v4 UUID generator, the default for every ledger
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// A capability of "Payment -> bool" shared across aggregation workers
///
/// Any `Fn(&Payment) -> bool` closure that can be sent between threads
/// implements this trait automatically.
pub trait PaymentPredicate: Send + Sync + 'static {
    /// Returns true if the payment should be kept
    fn matches(&self, payment: &Payment) -> bool;
}

impl<F> PaymentPredicate for F
where
    F: Fn(&Payment) -> bool + Send + Sync + 'static,
{
    fn matches(&self, payment: &Payment) -> bool {
        self(payment)
    }
}

/// Predicate selecting payments made from a single account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByAccount(pub AccountId);

impl PaymentPredicate for ByAccount {
    fn matches(&self, payment: &Payment) -> bool {
        payment.account_id == self.0
    }
}
