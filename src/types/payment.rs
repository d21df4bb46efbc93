//! Payment-related types for the wallet service
//!
//! This module defines payments, their lifecycle status, favorite payment
//! templates, and the progress message emitted by streaming aggregation.

use super::account::AccountId;
use super::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Payment identifier (UUID string)
pub type PaymentId = String;

/// Favorite identifier (UUID string)
pub type FavoriteId = String;

/// Free-form payment category label
pub type PaymentCategory = String;

/// Lifecycle status of a payment
///
/// Payments are created `InProgress`; `Reject` moves them to `Fail`.
/// The serialized literals are part of the dump file format.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "OK")]
    Ok,

    #[serde(rename = "FAIL")]
    Fail,

    #[default]
    #[serde(rename = "INPROGRESS")]
    InProgress,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Ok => "OK",
            PaymentStatus::Fail => "FAIL",
            PaymentStatus::InProgress => "INPROGRESS",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "OK" => Ok(PaymentStatus::Ok),
            "FAIL" => Ok(PaymentStatus::Fail),
            "INPROGRESS" => Ok(PaymentStatus::InProgress),
            other => Err(format!("Unknown payment status '{}'", other)),
        }
    }
}

/// A single payment debited from an account
///
/// Serialized as `id;account_id;amount;category;status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payment {
    pub id: PaymentId,
    pub account_id: AccountId,

    /// Debited amount, always positive
    pub amount: Money,
    pub category: PaymentCategory,
    pub status: PaymentStatus,
}

/// A named, reusable payment template
///
/// Serialized as `id;account_id;name;amount;category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Favorite {
    pub id: FavoriteId,
    pub account_id: AccountId,
    pub name: String,
    pub amount: Money,
    pub category: PaymentCategory,
}

/// Incremental progress message from `sum_payments_with_progress`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Position of the processed payment in the payment collection
    pub part: usize,

    /// Amount contributed by that payment
    pub result: Money,
}
