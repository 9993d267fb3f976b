use std::sync::Arc;

use serde_json::Value;

use crate::{
    api::{api_model::endpoints, client::ApiClient},
    locale::language::LanguageContext,
    pages::page_model::{LOGIN_PATH, PageError, SIGNUP_PATH},
    submission::{
        machine::ApiSubmission,
        submission_model::{ResetRejected, SubmissionState, SubmitRejected},
    },
    trace::logger::TraceLogger,
    validate::{
        schema::{FieldSpec, Schema},
        validate_model::{FormInput, ValidationErrors},
    },
};

pub const FORM_NAME: &str = "forgot-password";

/// What the forgot-password page shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ForgotPasswordView {
    Form {
        error: Option<String>,
        field_errors: ValidationErrors,
    },
    Sending,
    Sent {
        email: String,
    },
    /// No account for this email; offer sign-up instead of retry
    NotRegistered {
        email: String,
        signup_path: &'static str,
    },
}

pub fn schema() -> Schema {
    Schema::new().field(FieldSpec::new("email", "Email address").required().email())
}

pub struct ForgotPasswordPage {
    machine: ApiSubmission,
    email: String,
    field_errors: ValidationErrors,
}

impl ForgotPasswordPage {
    pub fn new(tracer: Arc<TraceLogger>) -> Self {
        Self {
            machine: ApiSubmission::with_tracer(FORM_NAME, tracer),
            email: String::new(),
            field_errors: ValidationErrors::default(),
        }
    }

    pub fn state(&self) -> &SubmissionState<Option<Value>> {
        self.machine.state()
    }

    pub fn submit(
        &mut self,
        client: &dyn ApiClient,
        input: &FormInput,
    ) -> Result<&SubmissionState<Option<Value>>, PageError> {
        if self.machine.state().is_loading() {
            return Err(PageError::Rejected(SubmitRejected::InFlight));
        }

        let valid = match schema().validate(input) {
            Ok(v) => v,
            Err(errors) => {
                self.field_errors = errors.clone();
                return Err(PageError::Invalid(errors));
            }
        };

        self.field_errors = ValidationErrors::default();
        self.email = valid.get("email").unwrap_or_default().to_string();
        Ok(self
            .machine
            .submit(client, endpoints::FORGOT_PASSWORD, &valid)?)
    }

    pub fn reset(&mut self) -> Result<(), ResetRejected> {
        self.machine.reset()
    }

    pub fn view(&self) -> ForgotPasswordView {
        match self.machine.state() {
            SubmissionState::Idle => ForgotPasswordView::Form {
                error: None,
                field_errors: self.field_errors.clone(),
            },
            SubmissionState::Recoverable(message) => ForgotPasswordView::Form {
                error: Some(message.clone()),
                field_errors: self.field_errors.clone(),
            },
            SubmissionState::Loading => ForgotPasswordView::Sending,
            SubmissionState::Success(_) => ForgotPasswordView::Sent {
                email: self.email.clone(),
            },
            SubmissionState::NotFound => ForgotPasswordView::NotRegistered {
                email: self.email.clone(),
                signup_path: SIGNUP_PATH,
            },
        }
    }

    pub fn back_to_login(&self) -> &'static str {
        LOGIN_PATH
    }
}

/// Localized one-line summary of a view.
pub fn describe(view: &ForgotPasswordView, lang: &LanguageContext) -> String {
    match view {
        ForgotPasswordView::Form {
            error: Some(message),
            ..
        } => message.clone(),
        ForgotPasswordView::Form { field_errors, .. } if !field_errors.is_empty() => {
            field_errors.to_string()
        }
        ForgotPasswordView::Form { .. } => lang.t(
            "We'll send a reset link if the email exists.",
            "سنرسل رابط إعادة التعيين إذا كان البريد الإلكتروني موجوداً.",
        ),
        ForgotPasswordView::Sending => lang.t("Sending reset link...", "جارٍ إرسال الرابط..."),
        ForgotPasswordView::Sent { email } => format!(
            "{} {}",
            lang.t(
                "If an account exists for this email, we'll email a reset link shortly:",
                "إذا كان هناك حساب لهذا البريد، سنرسل رابط إعادة التعيين قريباً:",
            ),
            email
        ),
        ForgotPasswordView::NotRegistered { email, signup_path } => format!(
            "{} {} ({} {})",
            lang.t("This email is not registered:", "هذا البريد الإلكتروني غير مسجل:"),
            email,
            lang.t("Create account", "إنشاء حساب"),
            signup_path
        ),
    }
}
