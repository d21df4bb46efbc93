//! Parallel aggregation over the payment collection
//!
//! This module provides the `PaymentAggregator` struct, which splits a
//! snapshot of the payments into contiguous chunks and processes each chunk on
//! its own Tokio task.
//!
//! # Design
//!
//! With `n` payments and `w` workers, the chunk size is `ceil(n / w)` and
//! exactly `w` chunks are produced; trailing chunks may be short or empty.
//! Each task accumulates into task-local state and the partial results are
//! reduced after all tasks are joined, so there is no shared accumulator.
//! A task that fails to join fails the whole call; partial results are never
//! returned as if they were complete.
//!
//! ```text
//! PaymentAggregator
//!     ├── Arc<[Payment]>      (read-only snapshot shared by all tasks)
//!     └── AggregationConfig   (number of workers)
//! ```

use std::ops::Range;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::traits::{ByAccount, PaymentPredicate};
use crate::types::{AccountId, Money, Payment, Progress, WalletError};

/// Configuration for parallel aggregation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregationConfig {
    /// Number of concurrent tasks (and chunks) per aggregation call
    pub workers: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
        }
    }
}

impl AggregationConfig {
    /// Create a new AggregationConfig, falling back to the default on zero
    pub fn new(workers: usize) -> Self {
        if workers == 0 {
            let default = Self::default();
            tracing::warn!(
                workers,
                default = default.workers,
                "invalid worker count, using default"
            );
            return default;
        }

        Self { workers }
    }
}

/// Parallel sum/filter over a payment snapshot
///
/// Cloning is cheap: clones share the same snapshot.
#[derive(Debug, Clone)]
pub struct PaymentAggregator {
    payments: Arc<[Payment]>,
    config: AggregationConfig,
}

impl PaymentAggregator {
    pub fn new(payments: Vec<Payment>, config: AggregationConfig) -> Self {
        Self {
            payments: Arc::from(payments),
            config,
        }
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    /// Split the snapshot into `workers` contiguous index ranges
    ///
    /// # Guarantees
    ///
    /// - Exactly `workers` ranges are returned, in index order
    /// - Every payment index appears in exactly one range
    /// - All ranges but the trailing ones have length `ceil(n / workers)`
    pub fn partition(&self) -> Vec<Range<usize>> {
        let total = self.payments.len();
        let workers = self.config.workers.max(1);
        let chunk_size = total.div_ceil(workers);

        (0..workers)
            .map(|chunk| {
                let start = (chunk * chunk_size).min(total);
                let end = (start + chunk_size).min(total);
                start..end
            })
            .collect()
    }

    /// Run `work` on every chunk concurrently and collect results in chunk order
    ///
    /// An empty snapshot spawns nothing and yields no chunk results.
    async fn run_chunks<T, F>(&self, work: F) -> Result<Vec<T>, WalletError>
    where
        T: Send + 'static,
        F: Fn(&[Payment]) -> T + Send + Sync + 'static,
    {
        if self.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(
            payments = self.len(),
            workers = self.config.workers,
            "aggregation started"
        );
        let work = Arc::new(work);

        let tasks: Vec<JoinHandle<T>> = self
            .partition()
            .into_iter()
            .map(|range| {
                let payments = Arc::clone(&self.payments);
                let work = Arc::clone(&work);
                tokio::spawn(async move { (*work)(&payments[range]) })
            })
            .collect();

        let mut results = Vec::with_capacity(tasks.len());
        for (chunk, outcome) in join_all(tasks).await.into_iter().enumerate() {
            match outcome {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!(chunk, error = %e, "aggregation task failed");
                    return Err(WalletError::AggregationFailed {
                        message: format!("chunk {}: {}", chunk, e),
                    });
                }
            }
        }

        Ok(results)
    }

    /// Total amount of all payments
    ///
    /// Equal to the sequential sum for any worker count.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if a chunk total or the overall total does
    /// not fit, or `AggregationFailed` if a worker task did not complete
    pub async fn sum(&self) -> Result<Money, WalletError> {
        let partials = self
            .run_chunks(|chunk| Money::checked_sum(chunk.iter().map(|payment| payment.amount)))
            .await?;

        partials
            .into_iter()
            .try_fold(Money::ZERO, |total, partial| {
                partial.and_then(|partial| total.checked_add(partial))
            })
            .ok_or_else(|| WalletError::ArithmeticOverflow {
                operation: "sum".to_string(),
                account_id: None,
            })
    }

    /// Payments matching `predicate`
    ///
    /// Order within a chunk is preserved and chunks are concatenated in
    /// index order, so the result keeps the collection order.
    ///
    /// # Errors
    ///
    /// Returns `AggregationFailed` if a worker task did not complete, e.g.
    /// because the predicate panicked
    pub async fn filter<P>(&self, predicate: P) -> Result<Vec<Payment>, WalletError>
    where
        P: PaymentPredicate,
    {
        self.run_chunks(move |chunk| {
            chunk
                .iter()
                .filter(|payment| predicate.matches(payment))
                .cloned()
                .collect::<Vec<Payment>>()
        })
        .await
        .map(|chunks| chunks.into_iter().flatten().collect())
    }

    /// Payments made from `account_id`
    pub async fn filter_by_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Payment>, WalletError> {
        self.filter(ByAccount(account_id)).await
    }

    /// Report every payment as a separate progress message
    ///
    /// Each worker sends one message per payment in its chunk. Messages from
    /// different workers interleave arbitrarily; the channel closes once the
    /// last worker finishes. Must be called from within a Tokio runtime.
    pub fn sum_with_progress(&self) -> mpsc::UnboundedReceiver<Progress> {
        let (sender, receiver) = mpsc::unbounded_channel();

        for range in self.partition() {
            let payments = Arc::clone(&self.payments);
            let sender = sender.clone();
            tokio::spawn(async move {
                for part in range {
                    let progress = Progress {
                        part,
                        result: payments[part].amount,
                    };
                    if sender.send(progress).is_err() {
                        // Receiver dropped, nobody is listening any more
                        break;
                    }
                }
            });
        }

        receiver
    }
}
