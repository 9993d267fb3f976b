use autousata_forms::{
    api::{
        api_model::{ApiResponse, endpoints},
        client::{REQUEST_FAILED, ScriptedApiClient},
        error::{NETWORK_ERROR, TIMEOUT_MESSAGE, TransportError},
    },
    submission::{
        classify::{classify_response, is_not_found},
        machine::{ApiSubmission, SubmissionMachine},
        submission_model::{
            NOT_FOUND_CODE, ResetRejected, Resolution, ResolveRejected, SubmissionState,
            SubmitRejected,
        },
    },
};
use serde_json::json;

use crate::common::fixtures::{capturing_tracer, valid_email};

mod common;

// =========================================================================
// At-most-one request in flight
// =========================================================================

#[test]
fn submit_while_loading_is_rejected_without_calling_api() {
    let client = ScriptedApiClient::answering(ApiResponse::empty());
    let mut machine = ApiSubmission::new("forgot-password");

    let pending = machine.begin().expect("idle machine accepts a submission");
    assert_eq!(machine.state(), &SubmissionState::Loading);

    let second = machine.submit(&client, endpoints::FORGOT_PASSWORD, &valid_email("a@b.co"));
    assert_eq!(second, Err(SubmitRejected::InFlight));
    assert_eq!(client.call_count(), 0, "No API call while one is in flight");
    assert_eq!(machine.state(), &SubmissionState::Loading, "State unchanged");

    machine
        .resolve(pending, Resolution::Success(None))
        .expect("ticket of the in-flight attempt resolves");
    assert_eq!(machine.state(), &SubmissionState::Success(None));
}

#[test]
fn begin_twice_keeps_first_attempt() {
    let mut machine: SubmissionMachine<()> = SubmissionMachine::new("login");
    let first = machine.begin().unwrap();
    assert_eq!(machine.begin(), Err(SubmitRejected::InFlight));
    assert_eq!(machine.attempts(), 1);
    assert_eq!(first.attempt(), 1);
}

#[test]
fn ticket_from_a_later_attempt_is_stale() {
    let mut a: SubmissionMachine<()> = SubmissionMachine::new("a");
    let mut b: SubmissionMachine<()> = SubmissionMachine::new("b");

    let _in_flight = a.begin().unwrap();

    let first = b.begin().unwrap();
    b.resolve(first, Resolution::Recoverable("Server error".into()))
        .unwrap();
    let second = b.begin().unwrap();

    assert_eq!(
        a.resolve(second, Resolution::Success(())),
        Err(ResolveRejected::Stale {
            attempt: 2,
            current: 1
        })
    );
    assert_eq!(a.state(), &SubmissionState::Loading);
}

#[test]
fn attempts_are_counted_across_resets() {
    let mut machine: SubmissionMachine<()> = SubmissionMachine::new("login");
    let pending = machine.begin().unwrap();
    assert!(machine.resolve(pending, Resolution::NotFound).is_ok());

    machine.reset().unwrap();
    let pending = machine.begin().unwrap();
    assert_eq!(pending.attempt(), 2);
    machine.resolve(pending, Resolution::Success(())).unwrap();
    assert_eq!(machine.attempts(), 2);
}

#[test]
fn resolve_rejects_when_not_loading() {
    let mut a: SubmissionMachine<()> = SubmissionMachine::new("a");
    let mut b: SubmissionMachine<()> = SubmissionMachine::new("b");

    let ticket_a = a.begin().unwrap();
    a.resolve(ticket_a, Resolution::Success(())).unwrap();

    // A ticket from another machine with a matching attempt number still
    // cannot resolve a machine that is not Loading.
    let ticket_b = b.begin().unwrap();
    assert_eq!(
        a.resolve(ticket_b, Resolution::Success(())),
        Err(ResolveRejected::NotLoading { state: "Success" })
    );
}

// =========================================================================
// Response interpretation
// =========================================================================

#[test]
fn not_found_code_wins_over_generic_error() {
    let client = ScriptedApiClient::new();
    client.push(ApiResponse::failure("some other text").with_code(NOT_FOUND_CODE));

    let mut machine = ApiSubmission::new("forgot-password");
    let state = machine
        .submit(&client, endpoints::FORGOT_PASSWORD, &valid_email("a@b.co"))
        .unwrap();

    assert_eq!(state, &SubmissionState::NotFound);
}

#[test]
fn not_found_error_string_is_recognized_without_code() {
    let client = ScriptedApiClient::new();
    client.push(ApiResponse::failure("Email not found"));

    let mut machine = ApiSubmission::new("forgot-password");
    machine
        .submit(&client, endpoints::FORGOT_PASSWORD, &valid_email("a@b.co"))
        .unwrap();

    assert_eq!(machine.state(), &SubmissionState::NotFound);
}

#[test]
fn generic_error_is_recoverable_and_verbatim() {
    let client = ScriptedApiClient::new();
    client.push(ApiResponse::failure("Something else"));

    let mut machine = ApiSubmission::new("forgot-password");
    machine
        .submit(&client, endpoints::FORGOT_PASSWORD, &valid_email("a@b.co"))
        .unwrap();

    assert_eq!(
        machine.state(),
        &SubmissionState::Recoverable("Something else".into())
    );
    assert!(machine.state().is_editable());
}

#[test]
fn unknown_code_without_error_falls_back_to_request_failed() {
    let resolution = classify_response(ApiResponse::empty().with_code("RATE_LIMITED"));
    assert_eq!(resolution, Resolution::Recoverable(REQUEST_FAILED.into()));
}

#[test]
fn success_carries_payload() {
    let client = ScriptedApiClient::new();
    client.push(ApiResponse::ok(json!({ "message": "Password reset link sent." })));

    let mut machine = ApiSubmission::new("forgot-password");
    machine
        .submit(&client, endpoints::FORGOT_PASSWORD, &valid_email("a@b.co"))
        .unwrap();

    assert_eq!(
        machine.state().payload(),
        Some(&Some(json!({ "message": "Password reset link sent." })))
    );
}

#[test]
fn empty_success_is_success() {
    let client = ScriptedApiClient::new();
    client.push(ApiResponse::empty());

    let mut machine = ApiSubmission::new("forgot-password");
    machine
        .submit(&client, endpoints::FORGOT_PASSWORD, &valid_email("a@b.co"))
        .unwrap();

    assert_eq!(machine.state(), &SubmissionState::Success(None));
}

#[test]
fn transport_failure_uses_generic_message() {
    let client = ScriptedApiClient::new();
    client.push_transport_error(TransportError::Connect {
        endpoint: endpoints::FORGOT_PASSWORD.into(),
        message: "connection refused (os error 111)".into(),
    });
    client.push_transport_error(TransportError::Timeout {
        endpoint: endpoints::FORGOT_PASSWORD.into(),
    });

    let mut machine = ApiSubmission::new("forgot-password");
    let input = valid_email("a@b.co");

    machine.submit(&client, endpoints::FORGOT_PASSWORD, &input).unwrap();
    assert_eq!(
        machine.state(),
        &SubmissionState::Recoverable(NETWORK_ERROR.into())
    );

    machine.submit(&client, endpoints::FORGOT_PASSWORD, &input).unwrap();
    assert_eq!(
        machine.state(),
        &SubmissionState::Recoverable(TIMEOUT_MESSAGE.into())
    );
}

#[test]
fn is_not_found_ignores_unrelated_responses() {
    assert!(!is_not_found(&ApiResponse::empty()));
    assert!(!is_not_found(&ApiResponse::failure("Invalid email or password")));
    assert!(is_not_found(&ApiResponse::failure("User not found")));
    assert!(is_not_found(&ApiResponse::empty().with_code(NOT_FOUND_CODE)));
}

// =========================================================================
// Reset and reuse
// =========================================================================

#[test]
fn reset_from_recoverable_then_resubmit() {
    let client = ScriptedApiClient::new();
    client.push(ApiResponse::failure("Server error"));
    client.push(ApiResponse::empty());

    let mut machine = ApiSubmission::new("forgot-password");
    let input = valid_email("a@b.co");

    machine.submit(&client, endpoints::FORGOT_PASSWORD, &input).unwrap();
    assert!(machine.state().error_message().is_some());

    machine.reset().unwrap();
    assert_eq!(machine.state(), &SubmissionState::Idle);
    assert_eq!(machine.state().error_message(), None);

    machine.submit(&client, endpoints::FORGOT_PASSWORD, &input).unwrap();
    assert_eq!(machine.state(), &SubmissionState::Success(None));
    assert_eq!(client.call_count(), 2);
}

#[test]
fn recoverable_allows_direct_resubmit() {
    let client = ScriptedApiClient::new();
    client.push(ApiResponse::failure("Server error"));
    client.push(ApiResponse::empty());

    let mut machine = ApiSubmission::new("forgot-password");
    let input = valid_email("a@b.co");

    machine.submit(&client, endpoints::FORGOT_PASSWORD, &input).unwrap();
    machine.submit(&client, endpoints::FORGOT_PASSWORD, &input).unwrap();
    assert_eq!(machine.state(), &SubmissionState::Success(None));
}

#[test]
fn reset_from_not_found_then_resubmit() {
    let client = ScriptedApiClient::new();
    client.push(ApiResponse::failure("x").with_code(NOT_FOUND_CODE));
    client.push(ApiResponse::empty());

    let mut machine = ApiSubmission::new("forgot-password");
    let input = valid_email("a@b.co");

    machine.submit(&client, endpoints::FORGOT_PASSWORD, &input).unwrap();
    assert_eq!(
        machine.submit(&client, endpoints::FORGOT_PASSWORD, &input),
        Err(SubmitRejected::NotSubmittable { state: "NotFound" }),
        "NotFound needs an explicit reset"
    );

    machine.reset().unwrap();
    machine.submit(&client, endpoints::FORGOT_PASSWORD, &input).unwrap();
    assert_eq!(machine.state(), &SubmissionState::Success(None));
}

#[test]
fn reset_is_rejected_outside_failure_states() {
    let mut machine: SubmissionMachine<()> = SubmissionMachine::new("login");
    assert_eq!(machine.reset(), Err(ResetRejected { state: "Idle" }));

    let pending = machine.begin().unwrap();
    assert_eq!(machine.reset(), Err(ResetRejected { state: "Loading" }));

    machine.resolve(pending, Resolution::Success(())).unwrap();
    assert_eq!(machine.reset(), Err(ResetRejected { state: "Success" }));
}

// =========================================================================
// Tracing
// =========================================================================

#[test]
fn transitions_are_traced_in_order() {
    let tracer = capturing_tracer();
    let client = ScriptedApiClient::new();
    client.push(ApiResponse::failure("Server error"));

    let mut machine = ApiSubmission::with_tracer("forgot-password", tracer.clone());
    machine
        .submit(&client, endpoints::FORGOT_PASSWORD, &valid_email("a@b.co"))
        .unwrap();
    machine.reset().unwrap();

    let moves: Vec<(String, String)> = tracer
        .events()
        .into_iter()
        .filter(|e| e.from != e.to)
        .map(|e| (e.from, e.to))
        .collect();

    assert_eq!(
        moves,
        vec![
            ("Idle".to_string(), "Loading".to_string()),
            ("Loading".to_string(), "Recoverable".to_string()),
            ("Recoverable".to_string(), "Idle".to_string()),
        ]
    );

    let events = tracer.events();
    assert!(events.iter().all(|e| e.form == "forgot-password"));
    assert!(
        events
            .iter()
            .any(|e| e.endpoint.as_deref() == Some(endpoints::FORGOT_PASSWORD))
    );
    let steps: Vec<u64> = events.iter().map(|e| e.step).collect();
    let mut sorted = steps.clone();
    sorted.sort();
    assert_eq!(steps, sorted);
}

#[test]
fn payload_is_the_valid_input_as_json() {
    let client = ScriptedApiClient::answering(ApiResponse::empty());
    let mut machine = ApiSubmission::new("forgot-password");

    machine
        .submit(&client, endpoints::FORGOT_PASSWORD, &valid_email("  a@b.co "))
        .unwrap();

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, endpoints::FORGOT_PASSWORD);
    assert_eq!(calls[0].1, json!({ "email": "a@b.co" }));
}
