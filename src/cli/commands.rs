use std::sync::Arc;

use crate::api::client::{ApiClient, HttpApiClient};
use crate::api::mock::MockApiClient;
use crate::auth::context::ApiAuthContext;
use crate::cli::config::{Backend, Settings};
use crate::locale::language::LanguageContext;
use crate::pages::checkout::{CheckoutPage, CheckoutView, breakdown_lines};
use crate::pages::forgot_password::{ForgotPasswordPage, ForgotPasswordView, describe};
use crate::pages::login::{LoginPage, LoginView};
use crate::pages::page_model::PageError;
use crate::payment::checkout::{payment_record, record_bid};
use crate::storage::store::{FileStore, KeyValueStore};
use crate::trace::logger::TraceLogger;
use crate::validate::validate_model::FormInput;

/// Capabilities shared by every subcommand.
pub struct App {
    pub store: Arc<dyn KeyValueStore>,
    pub client: Arc<dyn ApiClient>,
    pub tracer: Arc<TraceLogger>,
    pub lang: LanguageContext,
    pub verbose: u8,
}

impl App {
    pub fn from_settings(settings: &Settings) -> Result<App, Box<dyn std::error::Error>> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&settings.store_path));

        let client: Arc<dyn ApiClient> = match settings.backend {
            Backend::Http => Arc::new(HttpApiClient::new(
                &settings.base_url,
                settings.timeout_ms,
                store.clone(),
            )?),
            Backend::Mock => Arc::new(MockApiClient::default()),
        };

        let mut lang = LanguageContext::load(store.clone());
        if let Some(language) = settings.language {
            lang.set_language(language);
        }

        if settings.verbose > 0 {
            eprintln!(
                "Using {:?} backend ({}), store {}, language {}",
                settings.backend,
                settings.base_url,
                settings.store_path,
                lang.language()
            );
        }

        Ok(App {
            store,
            client,
            tracer: Arc::new(TraceLogger::new(&settings.trace_path)),
            lang,
            verbose: settings.verbose,
        })
    }
}

fn print_invalid(error: &PageError) -> bool {
    match error {
        PageError::Invalid(errors) => {
            for e in &errors.errors {
                println!("  {}: {}", e.field, e.message);
            }
        }
        PageError::Rejected(reason) => println!("{}", reason),
    }
    false
}

// ============================================================================
// forgot-password subcommand
// ============================================================================

/// Request a reset link. Returns whether the link was sent.
pub fn cmd_forgot_password(app: &App, email: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let mut page = ForgotPasswordPage::new(app.tracer.clone());
    let input = FormInput::new().with("email", email);

    if app.verbose > 0 {
        eprintln!("Requesting reset link for {}...", email);
    }

    if let Err(e) = page.submit(app.client.as_ref(), &input) {
        return Ok(print_invalid(&e));
    }

    let view = page.view();
    println!("{}", describe(&view, &app.lang));
    Ok(matches!(view, ForgotPasswordView::Sent { .. }))
}

// ============================================================================
// login subcommand
// ============================================================================

pub fn cmd_login(app: &App, email: &str, password: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let auth = ApiAuthContext::new(app.client.clone(), app.store.clone());
    let mut page = LoginPage::new(app.tracer.clone());
    let input = FormInput::new()
        .with("email", email)
        .with("password", password);

    if let Err(e) = page.submit(&auth, &input) {
        return Ok(print_invalid(&e));
    }

    match page.view() {
        LoginView::Redirect(destination) => {
            let role = page
                .state()
                .payload()
                .map(|u| format!("{:?}", u.role))
                .unwrap_or_default();
            println!(
                "{} ({}) -> {}",
                app.lang.t("Logged in", "تم تسجيل الدخول"),
                role,
                destination.path()
            );
            Ok(true)
        }
        LoginView::NoAccount { signup_path } => {
            println!(
                "{} {}",
                app.lang.t("No account found. Create one at", "لا يوجد حساب. أنشئ حساباً من"),
                signup_path
            );
            Ok(false)
        }
        LoginView::Form {
            error,
            forgot_password_path,
            ..
        } => {
            println!("{}", error.unwrap_or_default());
            println!(
                "{} {}",
                app.lang.t("Forgot your password?", "نسيت كلمة المرور؟"),
                forgot_password_path
            );
            Ok(false)
        }
        LoginView::SigningIn => Ok(false),
    }
}

// ============================================================================
// bid / pay / payment-status subcommands
// ============================================================================

pub fn cmd_bid(app: &App, auction: &str, amount: i64) -> Result<(), Box<dyn std::error::Error>> {
    if amount <= 0 {
        return Err(format!("Bid amount must be positive, got {}", amount).into());
    }

    record_bid(app.store.as_ref(), auction, amount)?;
    println!(
        "{} {}: {}",
        app.lang.t("Recorded bid for", "تم تسجيل المزايدة على"),
        auction,
        app.lang.format_currency_egp(amount)
    );
    Ok(())
}

pub struct CardArgs<'a> {
    pub holder: &'a str,
    pub number: &'a str,
    pub expiry: &'a str,
    pub cvc: &'a str,
}

pub fn cmd_pay(
    app: &App,
    auction: &str,
    default_bid: i64,
    card: &CardArgs<'_>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let mut page = CheckoutPage::open(app.store.clone(), auction, default_bid, app.tracer.clone())?;

    if page.breakdown().bid_amount <= 0 {
        return Err(format!("No bid recorded for auction {} and no --default-bid given", auction).into());
    }

    for (label, amount) in breakdown_lines(page.breakdown(), &app.lang) {
        println!("  {:<28} {}", label, amount);
    }

    let input = FormInput::new()
        .with("holder", card.holder)
        .with("number", card.number)
        .with("expiry", card.expiry)
        .with("cvc", card.cvc);

    if let Err(e) = page.pay(&input) {
        return Ok(print_invalid(&e));
    }

    match page.view() {
        CheckoutView::Paid(receipt) if receipt.already_paid => {
            println!(
                "{} ({})",
                app.lang.t("Auction already paid", "تم دفع هذا المزاد مسبقاً"),
                receipt.reference
            );
            Ok(true)
        }
        CheckoutView::Paid(receipt) => {
            println!(
                "{} {}",
                app.lang.t("Payment successful. Reference:", "تم الدفع بنجاح. المرجع:"),
                receipt.reference
            );
            Ok(true)
        }
        CheckoutView::Form { error, .. } => {
            println!(
                "{}: {}",
                app.lang.t("Payment failed", "فشل الدفع"),
                error.unwrap_or_default()
            );
            Ok(false)
        }
        CheckoutView::Unavailable { message } => {
            println!("{}", message);
            Ok(false)
        }
        CheckoutView::Processing => Ok(false),
    }
}

pub fn cmd_payment_status(app: &App, auction: &str) -> Result<(), Box<dyn std::error::Error>> {
    match payment_record(app.store.as_ref(), auction) {
        Some(record) => println!(
            "{}: {:?} ({}){}",
            auction,
            record.status,
            app.lang.format_currency_egp(record.total),
            record
                .reference
                .map(|r| format!(" {}", r))
                .unwrap_or_default()
        ),
        None => println!("{}: {}", auction, app.lang.t("unpaid", "غير مدفوع")),
    }
    Ok(())
}
