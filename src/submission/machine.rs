use std::sync::Arc;

use serde_json::Value;

use crate::{
    api::client::ApiClient,
    submission::{
        classify::classify_outcome,
        submission_model::{
            PendingSubmission, ResetRejected, Resolution, ResolveRejected, SubmissionState,
            SubmitRejected,
        },
    },
    trace::{logger::TraceLogger, trace::TraceEvent},
    validate::validate_model::ValidInput,
};

/// Drives one form through Idle → Loading → {Success, Recoverable, NotFound}.
///
/// Owned by a single page. A request is started with [`begin`](Self::begin),
/// which hands back the only ticket able to [`resolve`](Self::resolve) it, so
/// a response can never land on a later attempt.
pub struct SubmissionMachine<T> {
    form: String,
    state: SubmissionState<T>,
    attempt: u64,
    step: u64,
    tracer: Arc<TraceLogger>,
}

/// Machine whose success payload is the raw `data` of an API response.
pub type ApiSubmission = SubmissionMachine<Option<Value>>;

impl<T> SubmissionMachine<T> {
    pub fn new(form: &str) -> Self {
        Self::with_tracer(form, Arc::new(TraceLogger::disabled()))
    }

    pub fn with_tracer(form: &str, tracer: Arc<TraceLogger>) -> Self {
        Self {
            form: form.to_string(),
            state: SubmissionState::Idle,
            attempt: 0,
            step: 0,
            tracer,
        }
    }

    pub fn form(&self) -> &str {
        &self.form
    }

    pub fn state(&self) -> &SubmissionState<T> {
        &self.state
    }

    /// Number of requests started so far.
    pub fn attempts(&self) -> u64 {
        self.attempt
    }

    /// Enter `Loading`. Allowed from `Idle` and `Recoverable` only.
    pub fn begin(&mut self) -> Result<PendingSubmission, SubmitRejected> {
        if self.state.is_loading() {
            self.trace_rejection("submit_rejected:in_flight");
            return Err(SubmitRejected::InFlight);
        }

        if !self.state.can_submit() {
            let state = self.state.name();
            self.trace_rejection("submit_rejected:not_submittable");
            return Err(SubmitRejected::NotSubmittable { state });
        }

        self.attempt += 1;
        self.transition(SubmissionState::Loading, None);
        Ok(PendingSubmission {
            attempt: self.attempt,
        })
    }

    /// Leave `Loading` with the outcome of the request behind `pending`.
    pub fn resolve(
        &mut self,
        pending: PendingSubmission,
        resolution: Resolution<T>,
    ) -> Result<&SubmissionState<T>, ResolveRejected> {
        if pending.attempt != self.attempt {
            return Err(ResolveRejected::Stale {
                attempt: pending.attempt,
                current: self.attempt,
            });
        }

        if !self.state.is_loading() {
            return Err(ResolveRejected::NotLoading {
                state: self.state.name(),
            });
        }

        self.settle(resolution);
        Ok(&self.state)
    }

    /// Run one attempt end to end: guard, dispatch, interpret.
    pub fn submit_with<F>(
        &mut self,
        input: &ValidInput,
        dispatch: F,
    ) -> Result<&SubmissionState<T>, SubmitRejected>
    where
        F: FnOnce(&ValidInput) -> Resolution<T>,
    {
        let _pending = self.begin()?;
        let resolution = dispatch(input);
        self.settle(resolution);
        Ok(&self.state)
    }

    /// Back to `Idle` after a failure. Clears the stored error.
    pub fn reset(&mut self) -> Result<(), ResetRejected> {
        if !self.state.can_reset() {
            return Err(ResetRejected {
                state: self.state.name(),
            });
        }

        self.transition(SubmissionState::Idle, None);
        Ok(())
    }

    // Caller guarantees the machine is Loading for the current attempt.
    fn settle(&mut self, resolution: Resolution<T>) {
        let detail = match &resolution {
            Resolution::Recoverable(message) => Some(message.clone()),
            _ => None,
        };
        self.transition(resolution.into(), detail);
    }

    fn transition(&mut self, next: SubmissionState<T>, detail: Option<String>) {
        let mut event = TraceEvent::now(self.step, &self.form, self.state.name(), next.name());
        if let Some(detail) = detail {
            event = event.with_detail(detail);
        }
        self.tracer.log(&event);

        self.step += 1;
        self.state = next;
    }

    fn trace_rejection(&mut self, reason: &str) {
        let name = self.state.name();
        self.tracer
            .log(&TraceEvent::now(self.step, &self.form, name, name).with_detail(reason));
        self.step += 1;
    }
}

impl ApiSubmission {
    /// Submit `input` as the JSON body of `endpoint`.
    pub fn submit(
        &mut self,
        client: &dyn ApiClient,
        endpoint: &str,
        input: &ValidInput,
    ) -> Result<&SubmissionState<Option<Value>>, SubmitRejected> {
        self.submit_payload(client, endpoint, &input.to_json())
    }

    /// Submit a prepared payload. Same guard and interpretation as `submit`.
    pub fn submit_payload(
        &mut self,
        client: &dyn ApiClient,
        endpoint: &str,
        payload: &Value,
    ) -> Result<&SubmissionState<Option<Value>>, SubmitRejected> {
        let _pending = self.begin()?;
        let resolution = classify_outcome(client.call(endpoint, payload));

        let mut event = TraceEvent::now(self.step, &self.form, "Loading", "Loading")
            .with_endpoint(endpoint);
        if let Resolution::NotFound = resolution {
            event = event.with_detail("not_found_signal");
        }
        self.tracer.log(&event);
        self.step += 1;

        self.settle(resolution);
        Ok(&self.state)
    }
}
