//! The mandatory message/send baseline check.

mod common;

use a2a_tck::suite::{Category, ConformanceCheck, MessageSendText, Outcome};
use common::{client_for, dead_endpoint, scripted_client, start_mock_sut, SutBehavior};
use serde_json::{json, Value};

fn reason(outcome: &Outcome) -> &str {
    match outcome {
        Outcome::Failed { reason } => reason,
        other => panic!("expected failure, got {other}"),
    }
}

#[tokio::test]
async fn test_result_shapes() {
    let cases: [(Value, Option<&str>); 7] = [
        (
            json!({"kind": "task", "id": "t-1", "status": {"state": "completed"}}),
            None,
        ),
        (
            json!({"kind": "message", "messageId": "m-1", "role": "agent", "parts": []}),
            None,
        ),
        (json!({"kind": "task"}), Some("task result has no 'id'")),
        (
            json!({"kind": "task", "id": "t"}),
            Some("task result has no 'status.state'"),
        ),
        (
            json!({"kind": "task", "id": "", "status": {"state": "working"}}),
            Some("task result has no 'id'"),
        ),
        (
            json!({"kind": "bogus"}),
            Some("result kind must be 'task' or 'message', got 'bogus'"),
        ),
        (json!({}), Some("result has no 'kind' discriminator")),
    ];

    for (result, expected_failure) in cases {
        let (client, sent) = scripted_client(vec![result.clone()]);
        let outcome = MessageSendText.run(&client).await;

        match expected_failure {
            None => assert!(outcome.is_passed(), "{result} gave {outcome}"),
            Some(expected) => assert_eq!(reason(&outcome), expected, "{result}"),
        }
        assert_eq!(sent.lock().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_sut_failures_fail_the_check() {
    for behavior in [
        SutBehavior::SetupFails,
        SutBehavior::WrongId,
        SutBehavior::PlainHttpError,
        SutBehavior::GarbageBody,
    ] {
        let (endpoint, _sut, _handle) = start_mock_sut(behavior).await;
        let outcome = MessageSendText.run(&client_for(&endpoint)).await;
        assert!(outcome.is_failed(), "{behavior:?} gave {outcome}");
    }
}

#[tokio::test]
async fn test_error_response_reports_code() {
    let (endpoint, _sut, _handle) = start_mock_sut(SutBehavior::SetupFails).await;
    let outcome = MessageSendText.run(&client_for(&endpoint)).await;
    assert!(reason(&outcome).contains("-32603"), "{outcome}");
}

#[tokio::test]
async fn test_unreachable_sut_fails() {
    let outcome = MessageSendText.run(&client_for(&dead_endpoint().await)).await;
    assert!(reason(&outcome).starts_with("message/send failed"), "{outcome}");
}

#[test]
fn test_is_mandatory() {
    assert_eq!(MessageSendText.info().category, Category::Mandatory);
    assert_eq!(MessageSendText.info().name, "message_send_text");
}
