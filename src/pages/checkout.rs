use std::sync::Arc;

use crate::{
    locale::language::LanguageContext,
    pages::page_model::PageError,
    payment::{
        checkout::{bid_amount, calculate_breakdown, card_schema, simulate_payment},
        payment_model::{PaymentBreakdown, PaymentError, PaymentReceipt},
    },
    storage::store::KeyValueStore,
    submission::{
        machine::SubmissionMachine,
        submission_model::{ResetRejected, SubmissionState},
    },
    trace::logger::TraceLogger,
    validate::validate_model::{FormInput, ValidationErrors},
};

pub const FORM_NAME: &str = "checkout";
pub const AUCTION_NOT_FOUND: &str = "Auction not found";

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutView {
    Form {
        breakdown: PaymentBreakdown,
        error: Option<String>,
        field_errors: ValidationErrors,
    },
    Processing,
    Paid(PaymentReceipt),
    Unavailable {
        message: &'static str,
    },
}

/// Mock checkout for one won auction.
pub struct CheckoutPage {
    auction_id: String,
    breakdown: PaymentBreakdown,
    store: Arc<dyn KeyValueStore>,
    machine: SubmissionMachine<PaymentReceipt>,
    field_errors: ValidationErrors,
}

impl CheckoutPage {
    /// Mount the page, pricing it from the stored bid or `default_bid`.
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        auction_id: &str,
        default_bid: i64,
        tracer: Arc<TraceLogger>,
    ) -> Result<Self, PaymentError> {
        let bid = bid_amount(store.as_ref(), auction_id, default_bid);

        Ok(Self {
            auction_id: auction_id.to_string(),
            breakdown: calculate_breakdown(bid)?,
            store,
            machine: SubmissionMachine::with_tracer(FORM_NAME, tracer),
            field_errors: ValidationErrors::default(),
        })
    }

    pub fn auction_id(&self) -> &str {
        &self.auction_id
    }

    pub fn breakdown(&self) -> &PaymentBreakdown {
        &self.breakdown
    }

    pub fn state(&self) -> &SubmissionState<PaymentReceipt> {
        self.machine.state()
    }

    pub fn pay(&mut self, card: &FormInput) -> Result<&SubmissionState<PaymentReceipt>, PageError> {
        let valid = match card_schema().validate(card) {
            Ok(v) => v,
            Err(errors) => {
                self.field_errors = errors.clone();
                return Err(PageError::Invalid(errors));
            }
        };

        self.field_errors = ValidationErrors::default();
        let store = self.store.as_ref();
        let auction_id = self.auction_id.as_str();
        let breakdown = &self.breakdown;

        Ok(self
            .machine
            .submit_with(&valid, |card| simulate_payment(store, auction_id, breakdown, card))?)
    }

    pub fn reset(&mut self) -> Result<(), ResetRejected> {
        self.machine.reset()
    }

    pub fn view(&self) -> CheckoutView {
        match self.machine.state() {
            SubmissionState::Idle => CheckoutView::Form {
                breakdown: self.breakdown,
                error: None,
                field_errors: self.field_errors.clone(),
            },
            SubmissionState::Recoverable(message) => CheckoutView::Form {
                breakdown: self.breakdown,
                error: Some(message.clone()),
                field_errors: self.field_errors.clone(),
            },
            SubmissionState::Loading => CheckoutView::Processing,
            SubmissionState::Success(receipt) => CheckoutView::Paid(receipt.clone()),
            SubmissionState::NotFound => CheckoutView::Unavailable {
                message: AUCTION_NOT_FOUND,
            },
        }
    }
}

/// Localized breakdown lines, label then amount.
pub fn breakdown_lines(breakdown: &PaymentBreakdown, lang: &LanguageContext) -> Vec<(String, String)> {
    vec![
        (
            lang.t("Winning bid", "المزايدة الفائزة"),
            lang.format_currency_egp(breakdown.bid_amount),
        ),
        (
            lang.t("Platform commission", "عمولة المنصة"),
            lang.format_currency_egp(breakdown.platform_commission),
        ),
        (
            lang.t("Payment processing fee", "رسوم معالجة الدفع"),
            lang.format_currency_egp(breakdown.processing_fee),
        ),
        (
            lang.t("Total", "الإجمالي"),
            lang.format_currency_egp(breakdown.total_amount),
        ),
    ]
}
