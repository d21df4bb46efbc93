//! Ledger storage module
//!
//! This module provides the `Ledger` struct which owns the three in-memory
//! collections of the wallet: accounts, payments, and favorites.
//!
//! The Ledger is responsible for:
//! - Allocating sequential account IDs and unique payment/favorite IDs
//! - Linear lookup of records by ID
//! - Merging imported records into the collections (upsert by ID)
//!
//! Business rules (balances, duplicate phones) live in the service layer;
//! the ledger only stores and finds.

use crate::core::traits::{IdGenerator, UuidGenerator};
use crate::types::{Account, AccountId, Favorite, Payment, WalletError};
use std::collections::HashMap;
use std::fmt;

/// In-memory collections of accounts, payments, and favorites
///
/// Lookups are linear scans, which is fine for a personal ledger. The
/// collections are only mutated through the service operations and the
/// import merge; callers get shared slices.
pub struct Ledger {
    /// Last allocated account ID (0 when no account exists yet)
    next_account_id: AccountId,
    accounts: Vec<Account>,
    payments: Vec<Payment>,
    favorites: Vec<Favorite>,
    ids: Box<dyn IdGenerator>,
}

impl Ledger {
    /// Create an empty ledger using random UUIDs for payment and favorite IDs
    pub fn new() -> Self {
        Self::with_id_generator(UuidGenerator)
    }

    /// Create an empty ledger with a custom identifier source
    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        Ledger {
            next_account_id: 0,
            accounts: Vec::new(),
            payments: Vec::new(),
            favorites: Vec::new(),
            ids: Box::new(ids),
        }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn favorites(&self) -> &[Favorite] {
        &self.favorites
    }

    /// Find an account by ID
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if no account has this ID
    pub fn find_account(&self, account_id: AccountId) -> Result<&Account, WalletError> {
        self.accounts
            .iter()
            .find(|account| account.id == account_id)
            .ok_or_else(|| WalletError::account_not_found(account_id))
    }

    pub(crate) fn find_account_mut(
        &mut self,
        account_id: AccountId,
    ) -> Result<&mut Account, WalletError> {
        self.accounts
            .iter_mut()
            .find(|account| account.id == account_id)
            .ok_or_else(|| WalletError::account_not_found(account_id))
    }

    /// Find a payment by ID
    ///
    /// # Errors
    ///
    /// Returns `PaymentNotFound` if no payment has this ID
    pub fn find_payment(&self, payment_id: &str) -> Result<&Payment, WalletError> {
        self.payments
            .iter()
            .find(|payment| payment.id == payment_id)
            .ok_or_else(|| WalletError::payment_not_found(payment_id))
    }

    pub(crate) fn find_payment_mut(
        &mut self,
        payment_id: &str,
    ) -> Result<&mut Payment, WalletError> {
        self.payments
            .iter_mut()
            .find(|payment| payment.id == payment_id)
            .ok_or_else(|| WalletError::payment_not_found(payment_id))
    }

    /// Find a favorite by ID
    ///
    /// # Errors
    ///
    /// Returns `FavoriteNotFound` if no favorite has this ID
    pub fn find_favorite(&self, favorite_id: &str) -> Result<&Favorite, WalletError> {
        self.favorites
            .iter()
            .find(|favorite| favorite.id == favorite_id)
            .ok_or_else(|| WalletError::favorite_not_found(favorite_id))
    }

    /// Check whether any account uses this phone number
    pub fn is_phone_registered(&self, phone: &str) -> bool {
        self.accounts.iter().any(|account| account.phone == phone)
    }

    /// Allocate the next sequential account ID
    pub(crate) fn allocate_account_id(&mut self) -> AccountId {
        self.next_account_id += 1;
        self.next_account_id
    }

    /// Generate a fresh unique ID for a payment or favorite
    pub(crate) fn generate_id(&mut self) -> String {
        self.ids.next_id()
    }

    pub(crate) fn push_account(&mut self, account: Account) -> &Account {
        self.accounts.push(account);
        &self.accounts[self.accounts.len() - 1]
    }

    pub(crate) fn push_payment(&mut self, payment: Payment) -> &Payment {
        self.payments.push(payment);
        &self.payments[self.payments.len() - 1]
    }

    pub(crate) fn push_favorite(&mut self, favorite: Favorite) -> &Favorite {
        self.favorites.push(favorite);
        &self.favorites[self.favorites.len() - 1]
    }

    /// Merge accounts into the ledger by ID
    ///
    /// Existing accounts are overwritten in place, new ones are appended.
    /// The account ID counter never falls behind the highest known ID.
    /// Returns the number of appended accounts.
    pub(crate) fn upsert_accounts(&mut self, incoming: Vec<Account>) -> usize {
        let mut index: HashMap<AccountId, usize> = self
            .accounts
            .iter()
            .enumerate()
            .map(|(position, account)| (account.id, position))
            .collect();
        let mut appended = 0;

        for account in incoming {
            self.next_account_id = self.next_account_id.max(account.id);
            match index.get(&account.id) {
                Some(&position) => self.accounts[position] = account,
                None => {
                    index.insert(account.id, self.accounts.len());
                    self.accounts.push(account);
                    appended += 1;
                }
            }
        }

        appended
    }

    /// Merge payments into the ledger by ID, see [`Ledger::upsert_accounts`]
    pub(crate) fn upsert_payments(&mut self, incoming: Vec<Payment>) -> usize {
        upsert_by_key(&mut self.payments, incoming, |payment| payment.id.clone())
    }

    /// Merge favorites into the ledger by ID, see [`Ledger::upsert_accounts`]
    pub(crate) fn upsert_favorites(&mut self, incoming: Vec<Favorite>) -> usize {
        upsert_by_key(&mut self.favorites, incoming, |favorite| favorite.id.clone())
    }
}

/// Single-pass upsert of `incoming` into `existing` using a key index
fn upsert_by_key<T, F>(existing: &mut Vec<T>, incoming: Vec<T>, key: F) -> usize
where
    F: Fn(&T) -> String,
{
    let mut index: HashMap<String, usize> = existing
        .iter()
        .enumerate()
        .map(|(position, record)| (key(record), position))
        .collect();
    let mut appended = 0;

    for record in incoming {
        let record_key = key(&record);
        match index.get(&record_key) {
            Some(&position) => existing[position] = record,
            None => {
                index.insert(record_key, existing.len());
                existing.push(record);
                appended += 1;
            }
        }
    }

    appended
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("next_account_id", &self.next_account_id)
            .field("accounts", &self.accounts)
            .field("payments", &self.payments)
            .field("favorites", &self.favorites)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Money, PaymentStatus};

    fn payment(id: &str, account_id: AccountId, amount: i64) -> Payment {
        Payment {
            id: id.to_string(),
            account_id,
            amount: Money(amount),
            category: "auto".to_string(),
            status: PaymentStatus::InProgress,
        }
    }

    #[test]
    fn test_new_creates_empty_ledger() {
        let ledger = Ledger::new();
        assert!(ledger.accounts().is_empty());
        assert!(ledger.payments().is_empty());
        assert!(ledger.favorites().is_empty());
    }

    #[test]
    fn test_account_ids_are_sequential_from_one() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.allocate_account_id(), 1);
        assert_eq!(ledger.allocate_account_id(), 2);
        assert_eq!(ledger.allocate_account_id(), 3);
    }

    #[test]
    fn test_find_account_not_found() {
        let ledger = Ledger::new();
        assert_eq!(
            ledger.find_account(1).unwrap_err(),
            WalletError::AccountNotFound { account_id: 1 }
        );
    }

    #[test]
    fn test_find_payment_and_favorite_not_found() {
        let ledger = Ledger::new();
        assert!(matches!(
            ledger.find_payment("missing"),
            Err(WalletError::PaymentNotFound { .. })
        ));
        assert!(matches!(
            ledger.find_favorite("missing"),
            Err(WalletError::FavoriteNotFound { .. })
        ));
    }

    #[test]
    fn test_is_phone_registered() {
        let mut ledger = Ledger::new();
        let id = ledger.allocate_account_id();
        ledger.push_account(Account::new(id, "+992000000001"));

        assert!(ledger.is_phone_registered("+992000000001"));
        assert!(!ledger.is_phone_registered("+992000000002"));
    }

    #[test]
    fn test_upsert_accounts_overwrites_and_appends() {
        let mut ledger = Ledger::new();
        let id = ledger.allocate_account_id();
        ledger.push_account(Account::new(id, "+1"));

        let appended = ledger.upsert_accounts(vec![
            Account {
                id: 1,
                phone: "+1".to_string(),
                balance: Money(500),
            },
            Account {
                id: 5,
                phone: "+5".to_string(),
                balance: Money(10),
            },
        ]);

        assert_eq!(appended, 1);
        assert_eq!(ledger.accounts().len(), 2);
        assert_eq!(ledger.find_account(1).unwrap().balance, Money(500));
        assert_eq!(ledger.find_account(5).unwrap().phone, "+5");

        // Counter continues after the highest imported ID
        assert_eq!(ledger.allocate_account_id(), 6);
    }

    #[test]
    fn test_upsert_appends_each_new_record_once() {
        let mut ledger = Ledger::new();
        ledger.push_payment(payment("a", 1, 10));
        ledger.push_payment(payment("b", 1, 20));
        ledger.push_payment(payment("c", 1, 30));

        let appended = ledger.upsert_payments(vec![payment("d", 2, 40), payment("b", 1, 99)]);

        assert_eq!(appended, 1);
        assert_eq!(ledger.payments().len(), 4);
        assert_eq!(ledger.find_payment("b").unwrap().amount, Money(99));
        assert_eq!(ledger.payments().iter().filter(|p| p.id == "d").count(), 1);
    }

    #[test]
    fn test_upsert_duplicate_ids_within_incoming() {
        let mut ledger = Ledger::new();

        let appended = ledger.upsert_payments(vec![payment("x", 1, 1), payment("x", 1, 2)]);

        assert_eq!(appended, 1);
        assert_eq!(ledger.payments().len(), 1);
        assert_eq!(ledger.find_payment("x").unwrap().amount, Money(2));
    }
}
