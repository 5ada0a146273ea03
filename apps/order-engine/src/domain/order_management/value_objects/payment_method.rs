//! Payment method tag. Informational only; no payment processing happens here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::shared::DomainError;

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cod,
    /// Bank transfer.
    BankTransfer,
    /// Stripe card payment.
    Stripe,
    /// MoMo e-wallet.
    Momo,
    /// VNPay gateway.
    Vnpay,
}

impl PaymentMethod {
    const ALL: [Self; 5] = [
        Self::Cod,
        Self::BankTransfer,
        Self::Stripe,
        Self::Momo,
        Self::Vnpay,
    ];

    /// Wire and storage name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cod => "COD",
            Self::BankTransfer => "BANK_TRANSFER",
            Self::Stripe => "STRIPE",
            Self::Momo => "MOMO",
            Self::Vnpay => "VNPAY",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                DomainError::invalid("payment_method", format!("unknown payment method '{s}'"))
            })
    }
}
