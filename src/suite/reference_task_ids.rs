//! Optional feature: messages referencing earlier tasks via `referenceTaskIds`.
//!
//! A SUT may use the references, ignore them, or reject them with a
//! negative error code. Any of those is conformant; only a response that is
//! neither a valid success nor a valid error fails these checks.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::client::{Exchange, SutClient};
use crate::error::error_code_name;
use crate::utils::message::{
    text_message_params, text_message_params_with_references, ClassifiedResponse,
};
use crate::utils::task::task_id_from_result;

use super::check::{Category, CheckInfo, ConformanceCheck, Outcome};

/// Task id no SUT is expected to know.
pub const NONEXISTENT_TASK_ID: &str = "non-existent-task-id";

/// References a task the SUT itself just created.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceTaskIdsValid;

static VALID_INFO: CheckInfo = CheckInfo {
    name: "reference_task_ids_valid",
    category: Category::Feature,
    description: "A message referencing an existing task via referenceTaskIds \
                  gets a well-formed success or error response",
    failure_impact: "Limits feature completeness (perfectly acceptable)",
    fix_suggestion: "Implement referenceTaskIds support to enable task relationships",
};

#[async_trait]
impl ConformanceCheck for ReferenceTaskIdsValid {
    fn info(&self) -> &CheckInfo {
        &VALID_INFO
    }

    async fn run(&self, client: &SutClient) -> Outcome {
        // Prerequisite: create the task to reference.
        let create = match client
            .send_message(&text_message_params("Hello from reference task ID test!"))
            .await
        {
            Ok(exchange) => exchange,
            Err(e) => return Outcome::skip(format!("failed to create reference task: {e}")),
        };

        let reference_task_id = match create.classify() {
            ClassifiedResponse::Success(success) => match task_id_from_result(&success.result) {
                Some(id) => id.to_string(),
                None => {
                    return Outcome::skip("reference task result carries no task id");
                }
            },
            other => {
                return Outcome::skip(format!(
                    "failed to create reference task: SUT returned a {} response",
                    other.label()
                ));
            }
        };
        debug!(task_id = %reference_task_id, "created reference task");

        let params = text_message_params_with_references(
            "This message references another task",
            [reference_task_id.as_str()],
        );
        let exchange = match client.send_message(&params).await {
            Ok(exchange) => exchange,
            Err(e) => {
                return Outcome::fail(format!("message/send with referenceTaskIds failed: {e}"))
            }
        };

        judge_reference_response(&exchange)
    }
}

/// References a task id the SUT has never seen.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceTaskIdsInvalid;

static INVALID_INFO: CheckInfo = CheckInfo {
    name: "reference_task_ids_invalid",
    category: Category::Feature,
    description: "A message referencing an unknown task id is handled gracefully, \
                  and rejections use a negative error code",
    failure_impact: "Limits feature completeness (perfectly acceptable)",
    fix_suggestion: "Implement proper validation and error handling for invalid task references",
};

#[async_trait]
impl ConformanceCheck for ReferenceTaskIdsInvalid {
    fn info(&self) -> &CheckInfo {
        &INVALID_INFO
    }

    async fn run(&self, client: &SutClient) -> Outcome {
        let params = text_message_params_with_references(
            "This message references a non-existent task",
            [NONEXISTENT_TASK_ID],
        );
        let exchange = match client.send_message(&params).await {
            Ok(exchange) => exchange,
            Err(e) => {
                return Outcome::fail(format!("message/send with referenceTaskIds failed: {e}"))
            }
        };

        judge_reference_response(&exchange)
    }
}

/// Exactly one of success or error, and errors carry a negative code.
fn judge_reference_response(exchange: &Exchange) -> Outcome {
    match exchange.classify() {
        ClassifiedResponse::Success(_) => {
            info!(id = %exchange.id(), "SUT accepted referenceTaskIds");
            Outcome::pass_with("SUT accepted the message")
        }
        ClassifiedResponse::Error(err) if err.error.code < 0 => {
            let code = err.error.code;
            let name = error_code_name(code).unwrap_or("implementation-defined");
            info!(id = %exchange.id(), code, "SUT rejected referenceTaskIds");
            Outcome::pass_with(format!("SUT rejected the message with {name} ({code})"))
        }
        ClassifiedResponse::Error(err) => Outcome::fail(format!(
            "expected a negative error code, got {}",
            err.error.code
        )),
        ClassifiedResponse::Malformed(reason) => {
            Outcome::fail(format!("malformed JSON-RPC response: {reason}"))
        }
    }
}
