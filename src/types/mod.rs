//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `money`: Integer minor-unit amounts
//! - `account`: Account-related types
//! - `payment`: Payments, favorites, and progress messages
//! - `error`: Error types for the wallet service

pub mod account;
pub mod error;
pub mod money;
pub mod payment;

pub use account::{Account, AccountId, Phone};
pub use error::WalletError;
pub use money::Money;
pub use payment::{
    Favorite, FavoriteId, Payment, PaymentCategory, PaymentId, PaymentStatus, Progress,
};
