use std::sync::Arc;

use crate::{
    auth::{
        auth_model::{Destination, LoginResult, User, route_for_role},
        context::{AuthContext, LOGIN_FAILED},
    },
    pages::page_model::{FORGOT_PASSWORD_PATH, PageError, SIGNUP_PATH},
    submission::{
        machine::SubmissionMachine,
        submission_model::{NOT_FOUND_CODE, NOT_FOUND_ERRORS, ResetRejected, Resolution, SubmissionState},
    },
    trace::logger::TraceLogger,
    validate::{
        schema::{FieldSpec, Schema},
        validate_model::{FormInput, ValidationErrors},
    },
};

pub const FORM_NAME: &str = "login";

#[derive(Debug, Clone, PartialEq)]
pub enum LoginView {
    Form {
        error: Option<String>,
        field_errors: ValidationErrors,
        forgot_password_path: &'static str,
    },
    SigningIn,
    Redirect(Destination),
    NoAccount {
        signup_path: &'static str,
    },
}

pub fn schema() -> Schema {
    Schema::new()
        .field(FieldSpec::new("email", "Email address").required().email())
        .field(FieldSpec::new("password", "Password").required().untrimmed())
}

/// Map the auth context's answer onto a submission outcome.
pub fn interpret_login(result: LoginResult) -> Resolution<User> {
    match result {
        LoginResult {
            success: true,
            user: Some(user),
            ..
        } => Resolution::Success(user),
        LoginResult { error, code, .. } => {
            let message = error.unwrap_or_else(|| LOGIN_FAILED.to_string());
            if code.as_deref() == Some(NOT_FOUND_CODE)
                || NOT_FOUND_ERRORS.contains(&message.as_str())
            {
                Resolution::NotFound
            } else {
                Resolution::Recoverable(message)
            }
        }
    }
}

pub struct LoginPage {
    machine: SubmissionMachine<User>,
    field_errors: ValidationErrors,
}

impl LoginPage {
    pub fn new(tracer: Arc<TraceLogger>) -> Self {
        Self {
            machine: SubmissionMachine::with_tracer(FORM_NAME, tracer),
            field_errors: ValidationErrors::default(),
        }
    }

    pub fn state(&self) -> &SubmissionState<User> {
        self.machine.state()
    }

    pub fn submit(
        &mut self,
        auth: &dyn AuthContext,
        input: &FormInput,
    ) -> Result<&SubmissionState<User>, PageError> {
        let valid = match schema().validate(input) {
            Ok(v) => v,
            Err(errors) => {
                self.field_errors = errors.clone();
                return Err(PageError::Invalid(errors));
            }
        };

        self.field_errors = ValidationErrors::default();
        Ok(self.machine.submit_with(&valid, |credentials| {
            interpret_login(auth.login(
                credentials.get("email").unwrap_or_default(),
                credentials.get("password").unwrap_or_default(),
            ))
        })?)
    }

    pub fn reset(&mut self) -> Result<(), ResetRejected> {
        self.machine.reset()
    }

    /// Where to navigate once logged in.
    pub fn destination(&self) -> Option<Destination> {
        self.machine.state().payload().map(|user| route_for_role(user.role))
    }

    pub fn view(&self) -> LoginView {
        match self.machine.state() {
            SubmissionState::Idle => LoginView::Form {
                error: None,
                field_errors: self.field_errors.clone(),
                forgot_password_path: FORGOT_PASSWORD_PATH,
            },
            SubmissionState::Recoverable(message) => LoginView::Form {
                error: Some(message.clone()),
                field_errors: self.field_errors.clone(),
                forgot_password_path: FORGOT_PASSWORD_PATH,
            },
            SubmissionState::Loading => LoginView::SigningIn,
            SubmissionState::Success(user) => LoginView::Redirect(route_for_role(user.role)),
            SubmissionState::NotFound => LoginView::NoAccount {
                signup_path: SIGNUP_PATH,
            },
        }
    }
}
