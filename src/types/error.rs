//! Error types for the wallet service
//!
//! This module defines all error types that can occur while operating on the
//! ledger or moving it to and from dump files.
//!
//! # Error Categories
//!
//! - **Validation Errors**: duplicate phone, non-positive amount, insufficient balance
//! - **Lookup Errors**: account, payment, or favorite not found
//! - **Arithmetic Errors**: a balance or aggregate would overflow
//! - **Aggregation Errors**: a parallel worker task did not complete
//! - **File I/O Errors**: file create/open/read/write, directory creation
//! - **Parse Errors**: structurally unreadable dump files

use super::account::AccountId;
use super::money::Money;
use thiserror::Error;

/// Main error type for the wallet service
///
/// Every variant is returned to the caller of the triggering operation;
/// nothing in the library treats these as fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WalletError {
    /// An account with this phone number already exists
    #[error("Phone {phone} is already registered")]
    PhoneAlreadyRegistered {
        /// The duplicated phone number
        phone: String,
    },

    /// Deposits and payments require a strictly positive amount
    #[error("Amount must be positive, got {amount}")]
    AmountMustBePositive {
        /// The rejected amount
        amount: Money,
    },

    /// No account with the given ID exists
    #[error("Account {account_id} not found")]
    AccountNotFound {
        /// The account ID that was not found
        account_id: AccountId,
    },

    /// The account balance does not cover the requested payment
    ///
    /// The account state remains unchanged.
    #[error("Not enough balance on account {account_id}: balance {balance}, requested {requested}")]
    NotEnoughBalance {
        /// Account ID
        account_id: AccountId,
        /// Balance at the time of the request
        balance: Money,
        /// Requested payment amount
        requested: Money,
    },

    /// No payment with the given ID exists
    #[error("Payment {payment_id} not found")]
    PaymentNotFound {
        /// The payment ID that was not found
        payment_id: String,
    },

    /// No favorite with the given ID exists
    #[error("Favorite {favorite_id} not found")]
    FavoriteNotFound {
        /// The favorite ID that was not found
        favorite_id: String,
    },

    /// Arithmetic overflow would occur
    ///
    /// The operation is rejected and no state is changed.
    #[error("Arithmetic overflow in {operation}{}", account_id.map(|id| format!(" for account {}", id)).unwrap_or_default())]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account involved, if the operation targets one
        account_id: Option<AccountId>,
    },

    /// A parallel aggregation task panicked or was cancelled
    ///
    /// The partial result of that task is unavailable, so the whole
    /// aggregation is reported as failed.
    #[error("Aggregation task failed: {message}")]
    AggregationFailed {
        /// Description of the task failure
        message: String,
    },

    /// I/O error while reading or writing dump files
    #[error("I/O error{}: {message}", path.as_ref().map(|p| format!(" on {}", p)).unwrap_or_default())]
    IoError {
        /// File or directory involved, if known
        path: Option<String>,
        /// Description of the I/O error
        message: String,
    },

    /// A dump file could not be split into records
    #[error("Dump parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for WalletError {
    fn from(error: std::io::Error) -> Self {
        WalletError::IoError {
            path: None,
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for WalletError {
    fn from(error: csv::Error) -> Self {
        if error.is_io_error() {
            return WalletError::IoError {
                path: None,
                message: error.to_string(),
            };
        }

        let line = error.position().map(|pos| pos.line());

        WalletError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl WalletError {
    /// Create a PhoneAlreadyRegistered error
    pub fn phone_already_registered(phone: &str) -> Self {
        WalletError::PhoneAlreadyRegistered {
            phone: phone.to_string(),
        }
    }

    /// Create an AmountMustBePositive error
    pub fn amount_must_be_positive(amount: Money) -> Self {
        WalletError::AmountMustBePositive { amount }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account_id: AccountId) -> Self {
        WalletError::AccountNotFound { account_id }
    }

    /// Create a NotEnoughBalance error
    pub fn not_enough_balance(account_id: AccountId, balance: Money, requested: Money) -> Self {
        WalletError::NotEnoughBalance {
            account_id,
            balance,
            requested,
        }
    }

    /// Create an ArithmeticOverflow error for an account operation
    pub fn arithmetic_overflow(operation: &str, account_id: AccountId) -> Self {
        WalletError::ArithmeticOverflow {
            operation: operation.to_string(),
            account_id: Some(account_id),
        }
    }

    /// Create a PaymentNotFound error
    pub fn payment_not_found(payment_id: &str) -> Self {
        WalletError::PaymentNotFound {
            payment_id: payment_id.to_string(),
        }
    }

    /// Create a FavoriteNotFound error
    pub fn favorite_not_found(favorite_id: &str) -> Self {
        WalletError::FavoriteNotFound {
            favorite_id: favorite_id.to_string(),
        }
    }

    /// Create an IoError tied to a path
    pub fn io(path: &std::path::Path, error: std::io::Error) -> Self {
        WalletError::IoError {
            path: Some(path.display().to_string()),
            message: error.to_string(),
        }
    }
}
