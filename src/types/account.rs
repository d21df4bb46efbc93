//! Account-related types for the wallet service
//!
//! This module defines the Account structure and the identifiers used to
//! reference it from payments and favorites.

use super::money::Money;
use serde::Serialize;

/// Account identifier
///
/// Allocated sequentially by the ledger, starting at 1
pub type AccountId = i64;

/// Phone number, unique across all accounts
pub type Phone = String;

/// Wallet account state
///
/// The serialized field order (`id;phone;balance`) is the dump file layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    /// Sequential account identifier
    pub id: AccountId,

    /// Phone number the account was registered with
    pub phone: Phone,

    /// Current balance in minor units
    ///
    /// Never negative: every debit is checked against it first.
    pub balance: Money,
}

impl Account {
    /// Create a new account with a zero balance
    pub fn new(id: AccountId, phone: impl Into<Phone>) -> Self {
        Account {
            id,
            phone: phone.into(),
            balance: Money::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_has_zero_balance() {
        let account = Account::new(1, "+992937452945");
        assert_eq!(account.id, 1);
        assert_eq!(account.phone, "+992937452945");
        assert_eq!(account.balance, Money::ZERO);
    }
}
