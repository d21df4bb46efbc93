//! Wallet service
//!
//! This module provides the `WalletService` that executes every
//! balance-changing operation against the `Ledger` and exposes the
//! persistence and aggregation entry points.
//!
//! The service enforces business rules such as:
//! - Phone numbers are unique across accounts
//! - Deposit and payment amounts are strictly positive
//! - Balances never go negative
//! - Payments and favorites always reference an existing account
//!
//! Mutating operations take `&mut self`; callers that share a service between
//! threads must serialize those calls themselves (e.g. behind a `Mutex`).

use crate::core::ledger::Ledger;
use crate::core::r#async::{AggregationConfig, PaymentAggregator};
use crate::core::traits::{IdGenerator, PaymentPredicate};
use crate::io::dump_files::{self, DumpConfig, ImportSummary};
use crate::types::{
    Account, AccountId, Favorite, Money, Payment, PaymentStatus, Progress, WalletError,
};
use std::path::Path;
use tokio::sync::mpsc;

/// Single-process wallet store and operations
#[derive(Debug, Default)]
pub struct WalletService {
    ledger: Ledger,
}

impl WalletService {
    /// Create a new, empty WalletService
    pub fn new() -> Self {
        WalletService {
            ledger: Ledger::new(),
        }
    }

    /// Create a service with a custom payment/favorite ID source
    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        WalletService {
            ledger: Ledger::with_id_generator(ids),
        }
    }

    /// Read-only access to the underlying ledger
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn accounts(&self) -> &[Account] {
        self.ledger.accounts()
    }

    pub fn payments(&self) -> &[Payment] {
        self.ledger.payments()
    }

    pub fn favorites(&self) -> &[Favorite] {
        self.ledger.favorites()
    }

    /// Register a new account with a zero balance
    ///
    /// # Errors
    ///
    /// Returns `PhoneAlreadyRegistered` if any account already uses `phone`
    pub fn register_account(&mut self, phone: &str) -> Result<Account, WalletError> {
        if self.ledger.is_phone_registered(phone) {
            return Err(WalletError::phone_already_registered(phone));
        }

        let id = self.ledger.allocate_account_id();
        let account = self.ledger.push_account(Account::new(id, phone)).clone();

        tracing::debug!(account_id = account.id, phone = %account.phone, "account registered");
        Ok(account)
    }

    /// Credit an account
    ///
    /// No payment record is created.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is zero or negative
    /// - The account does not exist
    /// - The new balance would overflow (the balance is left unchanged)
    pub fn deposit(&mut self, account_id: AccountId, amount: Money) -> Result<(), WalletError> {
        if !amount.is_positive() {
            return Err(WalletError::amount_must_be_positive(amount));
        }

        let account = self.ledger.find_account_mut(account_id)?;
        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| WalletError::arithmetic_overflow("deposit", account_id))?;

        tracing::debug!(
            account_id,
            amount = amount.as_minor(),
            balance = account.balance.as_minor(),
            "deposit applied"
        );
        Ok(())
    }

    /// Debit an account and record a new in-progress payment
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is zero or negative
    /// - The account does not exist
    /// - The balance is lower than the amount (the balance is left unchanged)
    pub fn pay(
        &mut self,
        account_id: AccountId,
        amount: Money,
        category: &str,
    ) -> Result<Payment, WalletError> {
        if !amount.is_positive() {
            return Err(WalletError::amount_must_be_positive(amount));
        }

        let account = self.ledger.find_account_mut(account_id)?;
        if account.balance < amount {
            return Err(WalletError::not_enough_balance(
                account_id,
                account.balance,
                amount,
            ));
        }
        account.balance = account
            .balance
            .checked_sub(amount)
            .ok_or_else(|| WalletError::arithmetic_overflow("pay", account_id))?;

        let payment = Payment {
            id: self.ledger.generate_id(),
            account_id,
            amount,
            category: category.to_string(),
            status: PaymentStatus::InProgress,
        };
        let payment = self.ledger.push_payment(payment).clone();

        tracing::debug!(
            payment_id = %payment.id,
            account_id,
            amount = amount.as_minor(),
            "payment created"
        );
        Ok(payment)
    }

    /// Mark a payment as failed and refund its amount
    ///
    /// Rejecting the same payment twice refunds it twice; the status is not
    /// checked before refunding.
    ///
    /// # Errors
    ///
    /// Returns `PaymentNotFound`, `AccountNotFound` if the paying account is
    /// gone, or `ArithmeticOverflow` if the refund would overflow the balance.
    /// The payment is left untouched on any error.
    pub fn reject(&mut self, payment_id: &str) -> Result<(), WalletError> {
        let payment = self.ledger.find_payment(payment_id)?;
        let (account_id, amount) = (payment.account_id, payment.amount);

        let account = self.ledger.find_account_mut(account_id)?;
        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| WalletError::arithmetic_overflow("reject", account_id))?;
        self.ledger.find_payment_mut(payment_id)?.status = PaymentStatus::Fail;

        tracing::debug!(
            payment_id,
            account_id,
            amount = amount.as_minor(),
            "payment rejected"
        );
        Ok(())
    }

    /// Pay again with the account, amount, and category of an existing payment
    ///
    /// # Errors
    ///
    /// Returns `PaymentNotFound`, or any error `pay` returns
    pub fn repeat(&mut self, payment_id: &str) -> Result<Payment, WalletError> {
        let payment = self.ledger.find_payment(payment_id)?.clone();
        self.pay(payment.account_id, payment.amount, &payment.category)
    }

    /// Save an existing payment as a named favorite
    ///
    /// # Errors
    ///
    /// Returns `PaymentNotFound` if the payment does not exist
    pub fn favorite_payment(
        &mut self,
        payment_id: &str,
        name: &str,
    ) -> Result<Favorite, WalletError> {
        let payment = self.ledger.find_payment(payment_id)?;
        let (account_id, amount, category) =
            (payment.account_id, payment.amount, payment.category.clone());

        let favorite = Favorite {
            id: self.ledger.generate_id(),
            account_id,
            name: name.to_string(),
            amount,
            category,
        };
        let favorite = self.ledger.push_favorite(favorite).clone();

        tracing::debug!(favorite_id = %favorite.id, payment_id, name, "favorite created");
        Ok(favorite)
    }

    /// Pay using a saved favorite
    ///
    /// # Errors
    ///
    /// Returns `FavoriteNotFound`, or any error `pay` returns
    pub fn pay_from_favorite(&mut self, favorite_id: &str) -> Result<Payment, WalletError> {
        let favorite = self.ledger.find_favorite(favorite_id)?.clone();
        self.pay(favorite.account_id, favorite.amount, &favorite.category)
    }

    pub fn find_account_by_id(&self, account_id: AccountId) -> Result<&Account, WalletError> {
        self.ledger.find_account(account_id)
    }

    pub fn find_payment_by_id(&self, payment_id: &str) -> Result<&Payment, WalletError> {
        self.ledger.find_payment(payment_id)
    }

    pub fn find_favorite_by_id(&self, favorite_id: &str) -> Result<&Favorite, WalletError> {
        self.ledger.find_favorite(favorite_id)
    }

    /// All payments made from an existing account, in creation order
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist
    pub fn export_account_history(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Payment>, WalletError> {
        self.ledger.find_account(account_id)?;

        Ok(self
            .ledger
            .payments()
            .iter()
            .filter(|payment| payment.account_id == account_id)
            .cloned()
            .collect())
    }

    // Persistence

    /// Write `accounts.dump`, `payments.dump`, and `favorites.dump` into `dir`
    ///
    /// See [`dump_files::export_ledger`].
    pub fn export(&self, dir: &Path) -> Result<(), WalletError> {
        dump_files::export_ledger(&self.ledger, dir)
    }

    pub fn export_with(&self, dir: &Path, config: &DumpConfig) -> Result<(), WalletError> {
        dump_files::export_ledger_with(&self.ledger, dir, config)
    }

    /// Merge the dump files found in `dir` into this service
    ///
    /// See [`dump_files::import_ledger`].
    pub fn import(&mut self, dir: &Path) -> ImportSummary {
        dump_files::import_ledger(&mut self.ledger, dir)
    }

    pub fn import_with(&mut self, dir: &Path, config: &DumpConfig) -> ImportSummary {
        dump_files::import_ledger_with(&mut self.ledger, dir, config)
    }

    /// Write all accounts to a single legacy `|`-separated file
    pub fn export_to_file(&self, path: &Path) -> Result<(), WalletError> {
        dump_files::export_accounts_file(self.ledger.accounts(), path)
    }

    /// Merge accounts from a legacy `|`-separated file
    pub fn import_from_file(&mut self, path: &Path) -> Result<usize, WalletError> {
        let accounts = dump_files::import_accounts_file(path)?;
        Ok(self.ledger.upsert_accounts(accounts))
    }

    /// Split a payment list across numbered dump files
    ///
    /// See [`dump_files::history_to_files`].
    pub fn history_to_files(
        &self,
        payments: &[Payment],
        dir: &Path,
        records_per_file: usize,
    ) -> Result<Vec<std::path::PathBuf>, WalletError> {
        dump_files::history_to_files(payments, dir, records_per_file)
    }

    // Aggregation

    /// Snapshot the payment collection for parallel aggregation
    pub fn aggregator(&self, config: AggregationConfig) -> PaymentAggregator {
        PaymentAggregator::new(self.ledger.payments().to_vec(), config)
    }

    /// Sum all payment amounts using `workers` concurrent tasks
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if the total does not fit, or
    /// `AggregationFailed` if a worker task did not complete
    pub async fn sum_payments(&self, workers: usize) -> Result<Money, WalletError> {
        self.aggregator(AggregationConfig::new(workers)).sum().await
    }

    /// Payments made from `account_id`, filtered by `workers` concurrent tasks
    ///
    /// Returns an empty list when nothing matches.
    pub async fn filter_payments(
        &self,
        account_id: AccountId,
        workers: usize,
    ) -> Result<Vec<Payment>, WalletError> {
        self.aggregator(AggregationConfig::new(workers))
            .filter_by_account(account_id)
            .await
    }

    /// Payments matching `predicate`, filtered by `workers` concurrent tasks
    pub async fn filter_payments_by_fn<P>(
        &self,
        predicate: P,
        workers: usize,
    ) -> Result<Vec<Payment>, WalletError>
    where
        P: PaymentPredicate,
    {
        self.aggregator(AggregationConfig::new(workers))
            .filter(predicate)
            .await
    }

    /// Stream one progress message per payment
    ///
    /// Must be called from within a Tokio runtime. The receiver yields `None`
    /// once every payment has been reported.
    pub fn sum_payments_with_progress(&self, workers: usize) -> mpsc::UnboundedReceiver<Progress> {
        self.aggregator(AggregationConfig::new(workers)).sum_with_progress()
    }
}
