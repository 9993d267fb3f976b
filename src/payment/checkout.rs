use sha1::{Digest, Sha1};

use crate::{
    payment::payment_model::{
        BIDS_KEY, BidRecord, DECLINED_CARD_SUFFIX, DECLINED_MESSAGE, PAYMENTS_KEY,
        PLATFORM_COMMISSION_BPS, PaymentError, PROCESSING_FEE_BPS, PROCESSING_FEE_FIXED_SCALED,
        PaymentBreakdown, PaymentReceipt, PaymentRecord, PaymentStatus, SAVE_FAILED_MESSAGE,
    },
    storage::{
        error::StoreError,
        records::{read_record, write_record},
        store::KeyValueStore,
    },
    submission::submission_model::Resolution,
    trace::trace::now_ms,
    validate::{
        schema::{FieldRule, FieldSpec, Schema, strip_separators},
        validate_model::ValidInput,
    },
};

/// Last recorded bid for `auction_id`, or `default` when none is usable.
pub fn bid_amount(store: &dyn KeyValueStore, auction_id: &str, default: i64) -> i64 {
    read_record::<BidRecord>(store, BIDS_KEY, auction_id)
        .map(|b| b.amount)
        .filter(|amount| *amount > 0)
        .unwrap_or(default)
}

pub fn record_bid(store: &dyn KeyValueStore, auction_id: &str, amount: i64) -> Result<(), StoreError> {
    write_record(store, BIDS_KEY, auction_id, &BidRecord { amount })
}

pub fn payment_record(store: &dyn KeyValueStore, auction_id: &str) -> Option<PaymentRecord> {
    read_record(store, PAYMENTS_KEY, auction_id)
}

pub fn payment_status(store: &dyn KeyValueStore, auction_id: &str) -> PaymentStatus {
    payment_record(store, auction_id)
        .map(|r| r.status)
        .unwrap_or_default()
}

pub fn mark_unpaid(store: &dyn KeyValueStore, auction_id: &str, total: i64) -> Result<(), StoreError> {
    let record = PaymentRecord {
        status: PaymentStatus::Unpaid,
        total,
        reference: None,
        paid_at_ms: None,
    };
    write_record(store, PAYMENTS_KEY, auction_id, &record)
}

fn apply_bps(amount: i64, bps: i64, fixed: i64) -> Option<i64> {
    // half-up rounding of (amount * bps + fixed) / 10_000
    amount
        .checked_mul(bps)?
        .checked_add(fixed + 5_000)
        .map(|scaled| scaled.div_euclid(10_000))
}

/// Commission, processing fee and total for a winning bid.
///
/// Fails for negative bids and for bids whose total does not fit in an `i64`.
pub fn calculate_breakdown(bid_amount: i64) -> Result<PaymentBreakdown, PaymentError> {
    let out_of_range = PaymentError::AmountOutOfRange { amount: bid_amount };
    if bid_amount < 0 {
        return Err(out_of_range);
    }

    let platform_commission =
        apply_bps(bid_amount, PLATFORM_COMMISSION_BPS, 0).ok_or(out_of_range.clone())?;
    let processing_fee = apply_bps(bid_amount, PROCESSING_FEE_BPS, PROCESSING_FEE_FIXED_SCALED)
        .ok_or(out_of_range.clone())?;
    let total_amount = bid_amount
        .checked_add(platform_commission)
        .and_then(|t| t.checked_add(processing_fee))
        .ok_or(out_of_range)?;

    Ok(PaymentBreakdown {
        bid_amount,
        platform_commission,
        processing_fee,
        total_amount,
        seller_payout: bid_amount - platform_commission,
    })
}

pub fn card_schema() -> Schema {
    Schema::new()
        .field(FieldSpec::new("holder", "Cardholder name").required())
        .field(
            FieldSpec::new("number", "Card number")
                .required()
                .rule(FieldRule::Digits { min: 16, max: 16 }),
        )
        .field(
            FieldSpec::new("expiry", "Expiry date")
                .required()
                .rule(FieldRule::Expiry),
        )
        .field(
            FieldSpec::new("cvc", "CVC")
                .required()
                .rule(FieldRule::Digits { min: 3, max: 4 }),
        )
}

pub fn payment_reference(auction_id: &str, total: i64, at_ms: u128) -> String {
    let mut hasher = Sha1::new();
    hasher.update(format!("{}:{}:{}", auction_id, total, at_ms).as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("PAY-{}", digest[..12].to_uppercase())
}

/// Pretend to charge the card and record the auction as paid.
///
/// Nothing leaves the process. A card number ending in `0000` is declined.
/// An auction that is already paid is reported as such and left untouched.
pub fn simulate_payment(
    store: &dyn KeyValueStore,
    auction_id: &str,
    breakdown: &PaymentBreakdown,
    card: &ValidInput,
) -> Resolution<PaymentReceipt> {
    if let Some(record) = payment_record(store, auction_id) {
        if record.status == PaymentStatus::Paid {
            return Resolution::Success(PaymentReceipt {
                auction_id: auction_id.to_string(),
                reference: record.reference.unwrap_or_default(),
                breakdown: *breakdown,
                already_paid: true,
            });
        }
    }

    let number = strip_separators(card.get("number").unwrap_or(""));
    if number.ends_with(DECLINED_CARD_SUFFIX) {
        return Resolution::Recoverable(DECLINED_MESSAGE.to_string());
    }

    let at_ms = now_ms();
    let reference = payment_reference(auction_id, breakdown.total_amount, at_ms);
    let record = PaymentRecord {
        status: PaymentStatus::Paid,
        total: breakdown.total_amount,
        reference: Some(reference.clone()),
        paid_at_ms: u64::try_from(at_ms).ok(),
    };

    if let Err(e) = write_record(store, PAYMENTS_KEY, auction_id, &record) {
        eprintln!("Warning: {}", e);
        return Resolution::Recoverable(SAVE_FAILED_MESSAGE.to_string());
    }

    Resolution::Success(PaymentReceipt {
        auction_id: auction_id.to_string(),
        reference,
        breakdown: *breakdown,
        already_paid: false,
    })
}
