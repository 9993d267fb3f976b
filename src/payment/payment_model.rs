use std::fmt;

use serde::{Deserialize, Serialize};

pub const BIDS_KEY: &str = "bids";
pub const PAYMENTS_KEY: &str = "payments";

// Rates in basis points so every amount stays an exact integer of EGP.
pub const PLATFORM_COMMISSION_BPS: i64 = 500;
pub const PROCESSING_FEE_BPS: i64 = 290;
pub const PROCESSING_FEE_FIXED_SCALED: i64 = 25_000; // 2.5 EGP, scaled by 10_000

pub const DECLINED_MESSAGE: &str = "Your card was declined";
pub const SAVE_FAILED_MESSAGE: &str = "Payment went through but its status could not be saved";
pub const DECLINED_CARD_SUFFIX: &str = "0000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidRecord {
    pub amount: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Unpaid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub status: PaymentStatus,
    pub total: i64,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub paid_at_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentBreakdown {
    pub bid_amount: i64,
    pub platform_commission: i64,
    pub processing_fee: i64,
    pub total_amount: i64,
    pub seller_payout: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentReceipt {
    pub auction_id: String,
    pub reference: String,
    pub breakdown: PaymentBreakdown,
    /// The auction was already settled before this attempt
    pub already_paid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// Negative, or too large to price without overflowing
    AmountOutOfRange { amount: i64 },
}

impl fmt::Display for PaymentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentError::AmountOutOfRange { amount } => {
                write!(f, "Bid amount {} is outside the supported range", amount)
            }
        }
    }
}

impl std::error::Error for PaymentError {}
