use std::fmt;

/// Error code the backend attaches when the referenced user does not exist.
pub const NOT_FOUND_CODE: &str = "USER_NOT_FOUND";

/// Error strings that carry the same meaning as [`NOT_FOUND_CODE`].
pub const NOT_FOUND_ERRORS: &[&str] = &["Email not found", "User not found"];

/// Lifecycle of one form's request. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState<T> {
    Idle,
    Loading,
    Success(T),
    Recoverable(String),
    NotFound,
}

impl<T> SubmissionState<T> {
    pub fn name(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "Idle",
            SubmissionState::Loading => "Loading",
            SubmissionState::Success(_) => "Success",
            SubmissionState::Recoverable(_) => "Recoverable",
            SubmissionState::NotFound => "NotFound",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SubmissionState::Loading)
    }

    /// Whether the form inputs accept edits.
    pub fn is_editable(&self) -> bool {
        matches!(self, SubmissionState::Idle | SubmissionState::Recoverable(_))
    }

    pub fn can_submit(&self) -> bool {
        self.is_editable()
    }

    pub fn can_reset(&self) -> bool {
        matches!(self, SubmissionState::Recoverable(_) | SubmissionState::NotFound)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SubmissionState::Recoverable(message) => Some(message),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            SubmissionState::Success(payload) => Some(payload),
            _ => None,
        }
    }
}

impl<T> Default for SubmissionState<T> {
    fn default() -> Self {
        SubmissionState::Idle
    }
}

/// Interpreted outcome of a dispatched request.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    Success(T),
    NotFound,
    Recoverable(String),
}

impl<T> From<Resolution<T>> for SubmissionState<T> {
    fn from(resolution: Resolution<T>) -> Self {
        match resolution {
            Resolution::Success(payload) => SubmissionState::Success(payload),
            Resolution::NotFound => SubmissionState::NotFound,
            Resolution::Recoverable(message) => SubmissionState::Recoverable(message),
        }
    }
}

/// Proof that a request was started. Consumed by `resolve`.
#[derive(Debug, PartialEq, Eq)]
pub struct PendingSubmission {
    pub(crate) attempt: u64,
}

impl PendingSubmission {
    pub fn attempt(&self) -> u64 {
        self.attempt
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejected {
    /// A request is already in flight
    InFlight,

    /// Current state must be reset before another attempt
    NotSubmittable { state: &'static str },
}

impl fmt::Display for SubmitRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitRejected::InFlight => write!(f, "A submission is already in progress"),
            SubmitRejected::NotSubmittable { state } => {
                write!(f, "Cannot submit from state {}", state)
            }
        }
    }
}

impl std::error::Error for SubmitRejected {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveRejected {
    /// Ticket belongs to an earlier attempt
    Stale { attempt: u64, current: u64 },

    /// Machine is not waiting for a response
    NotLoading { state: &'static str },
}

impl fmt::Display for ResolveRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveRejected::Stale { attempt, current } => {
                write!(f, "Response for attempt {} arrived during attempt {}", attempt, current)
            }
            ResolveRejected::NotLoading { state } => {
                write!(f, "No request in flight (state {})", state)
            }
        }
    }
}

impl std::error::Error for ResolveRejected {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetRejected {
    pub state: &'static str,
}

impl fmt::Display for ResetRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cannot reset from state {}", self.state)
    }
}

impl std::error::Error for ResetRejected {}
