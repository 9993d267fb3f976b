use std::fmt;

use crate::{submission::submission_model::SubmitRejected, validate::validate_model::ValidationErrors};

pub const LOGIN_PATH: &str = "/login";
pub const SIGNUP_PATH: &str = "/signup";
pub const FORGOT_PASSWORD_PATH: &str = "/forgot-password";

/// Why a page refused to start a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum PageError {
    /// Input failed the page schema; nothing was sent
    Invalid(ValidationErrors),

    /// The page's machine would not accept another attempt
    Rejected(SubmitRejected),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::Invalid(errors) => write!(f, "{}", errors),
            PageError::Rejected(reason) => write!(f, "{}", reason),
        }
    }
}

impl std::error::Error for PageError {}

impl From<ValidationErrors> for PageError {
    fn from(errors: ValidationErrors) -> Self {
        PageError::Invalid(errors)
    }
}

impl From<SubmitRejected> for PageError {
    fn from(reason: SubmitRejected) -> Self {
        PageError::Rejected(reason)
    }
}
