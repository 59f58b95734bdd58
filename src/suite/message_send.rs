//! Mandatory baseline: a plain text `message/send` must succeed.

use async_trait::async_trait;
use tracing::debug;

use crate::client::SutClient;
use crate::utils::message::{text_message_params, ClassifiedResponse};
use crate::utils::task::{result_kind, task_id_from_result, task_state_from_result};

use super::check::{Category, CheckInfo, ConformanceCheck, Outcome};

#[derive(Debug, Default, Clone, Copy)]
pub struct MessageSendText;

static INFO: CheckInfo = CheckInfo {
    name: "message_send_text",
    category: Category::Mandatory,
    description: "message/send with a single text part returns a success \
                  response whose result is a task or a message",
    failure_impact: "SUT is not A2A compliant: clients cannot send messages",
    fix_suggestion: "Handle message/send and return a Task or Message as the JSON-RPC result",
};

#[async_trait]
impl ConformanceCheck for MessageSendText {
    fn info(&self) -> &CheckInfo {
        &INFO
    }

    async fn run(&self, client: &SutClient) -> Outcome {
        let exchange = match client
            .send_message(&text_message_params("Hello from the conformance kit!"))
            .await
        {
            Ok(exchange) => exchange,
            Err(e) => return Outcome::fail(format!("message/send failed: {e}")),
        };

        let result = match exchange.classify() {
            ClassifiedResponse::Success(success) => success.result,
            ClassifiedResponse::Error(err) => {
                return Outcome::fail(format!(
                    "SUT returned error {}: {}",
                    err.error.code, err.error.message
                ))
            }
            ClassifiedResponse::Malformed(reason) => {
                return Outcome::fail(format!("malformed JSON-RPC response: {reason}"))
            }
        };

        match result_kind(&result) {
            Some("task") => {
                if task_id_from_result(&result).is_none() {
                    return Outcome::fail("task result has no 'id'");
                }
                if task_state_from_result(&result).is_none() {
                    return Outcome::fail("task result has no 'status.state'");
                }
                debug!(state = ?task_state_from_result(&result), "SUT returned a task");
                Outcome::pass_with("result is a task")
            }
            Some("message") => Outcome::pass_with("result is a message"),
            Some(other) => Outcome::fail(format!(
                "result kind must be 'task' or 'message', got '{other}'"
            )),
            None => Outcome::fail("result has no 'kind' discriminator"),
        }
    }
}
