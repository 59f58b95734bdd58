//! Readers for the `result` payload of `message/send`.
//!
//! The suite never deserializes a SUT's task into a typed struct: a SUT
//! under test may omit fields a strict schema would demand, and the checks
//! only need a handful of members.

use serde_json::Value;

/// Returns the `kind` discriminator of a result (`"task"` or `"message"`).
pub fn result_kind(result: &Value) -> Option<&str> {
    result.get("kind").and_then(Value::as_str)
}

/// Extracts the id of the task a `message/send` result refers to.
///
/// A task result carries it as `id`; a direct message reply may carry it
/// as `taskId`.
///
/// # Example
///
/// ```
/// use a2a_tck::utils::task_id_from_result;
/// use serde_json::json;
///
/// let task = json!({"kind": "task", "id": "task-1", "status": {"state": "completed"}});
/// assert_eq!(task_id_from_result(&task), Some("task-1"));
///
/// let reply = json!({"kind": "message", "messageId": "m-1", "taskId": "task-2"});
/// assert_eq!(task_id_from_result(&reply), Some("task-2"));
/// ```
pub fn task_id_from_result(result: &Value) -> Option<&str> {
    non_empty_str(result, "id").or_else(|| non_empty_str(result, "taskId"))
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Extracts `status.state` from a task result.
pub fn task_state_from_result(result: &Value) -> Option<&str> {
    result
        .get("status")
        .and_then(|status| status.get("state"))
        .and_then(Value::as_str)
}
