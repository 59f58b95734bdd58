//! JSON-RPC request building and response classification.
//!
//! Every check in the suite goes through these functions: requests are
//! built with [`make_request`], and whatever the SUT answers is sorted by
//! [`classify`] into exactly one of success, error or malformed.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{TckError, TckResult};
use crate::types::{
    JsonRpcError, JsonRpcId, JsonRpcRequest, Message, Part, Role, SendMessageParams,
    JSONRPC_VERSION,
};

// ============================================================================
// Request Builder
// ============================================================================

/// Generates a fresh request id (a random UUID v4 string).
pub fn new_request_id() -> JsonRpcId {
    JsonRpcId::String(Uuid::new_v4().to_string())
}

/// Builds a JSON-RPC 2.0 request with a freshly generated id.
///
/// `params` must serialize to a JSON object; it is passed through
/// otherwise unchanged.
///
/// # Example
///
/// ```
/// use a2a_tck::utils::make_request;
/// use serde_json::json;
///
/// let request = make_request("message/send", json!({"message": {"parts": []}})).unwrap();
/// assert_eq!(request.jsonrpc, "2.0");
/// assert_eq!(request.method, "message/send");
/// ```
pub fn make_request(method: &str, params: impl Serialize) -> TckResult<JsonRpcRequest> {
    make_request_with_id(new_request_id(), method, params)
}

/// Builds a JSON-RPC 2.0 request with a caller-chosen id.
pub fn make_request_with_id(
    id: impl Into<JsonRpcId>,
    method: &str,
    params: impl Serialize,
) -> TckResult<JsonRpcRequest> {
    if method.trim().is_empty() {
        return Err(TckError::InvalidRequest(
            "method name must not be empty".to_string(),
        ));
    }

    let params = serde_json::to_value(params)
        .map_err(|e| TckError::InvalidRequest(format!("failed to serialize params: {e}")))?;
    if !params.is_object() {
        return Err(TckError::InvalidRequest(format!(
            "params for '{method}' must be a JSON object, got {}",
            json_type_name(&params)
        )));
    }

    Ok(JsonRpcRequest::new(id, method, params))
}

/// Builds `message/send` params carrying a single user text part.
pub fn text_message_params(text: impl Into<String>) -> SendMessageParams {
    SendMessageParams {
        message: Message::user(Uuid::new_v4().to_string(), text),
        metadata: None,
    }
}

/// Builds `message/send` params whose message references earlier tasks.
pub fn text_message_params_with_references<I, S>(
    text: impl Into<String>,
    reference_task_ids: I,
) -> SendMessageParams
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut params = text_message_params(text);
    params.message.reference_task_ids =
        Some(reference_task_ids.into_iter().map(Into::into).collect());
    params
}

/// Builds a user message from arbitrary parts.
pub fn new_user_parts_message(parts: Vec<Part>) -> Message {
    Message {
        message_id: Uuid::new_v4().to_string(),
        role: Role::User,
        kind: "message".to_string(),
        parts,
        context_id: None,
        task_id: None,
        metadata: None,
        reference_task_ids: None,
    }
}

// ============================================================================
// Response Classifier
// ============================================================================

/// Why a response is neither a valid success nor a valid error response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedReason {
    /// The response is not a JSON object.
    #[error("response is not a JSON object (got {0})")]
    NotAnObject(&'static str),

    /// The `jsonrpc` member is absent.
    #[error("missing 'jsonrpc' member")]
    MissingVersion,

    /// The `jsonrpc` member is present but not the string "2.0".
    #[error("'jsonrpc' must be \"2.0\", got {0}")]
    WrongVersion(String),

    /// The `id` member is absent.
    #[error("missing 'id' member")]
    MissingId,

    /// The `id` member does not equal the request id.
    #[error("'id' {actual} does not match request id {expected}")]
    IdMismatch {
        /// The id the request carried.
        expected: String,
        /// The id the response carried.
        actual: String,
    },

    /// Both `result` and `error` are present.
    #[error("both 'result' and 'error' are present")]
    BothResultAndError,

    /// Neither `result` nor `error` is present.
    #[error("neither 'result' nor 'error' is present")]
    NeitherResultNorError,

    /// `error` is not an object with integer `code` and string `message`.
    #[error("invalid error object: {0}")]
    InvalidErrorObject(String),
}

/// A well-formed JSON-RPC success response.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessResponse {
    /// The correlated request id.
    pub id: JsonRpcId,
    /// The `result` payload, uninterpreted.
    pub result: Value,
}

/// A well-formed JSON-RPC error response.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    /// The correlated request id.
    pub id: JsonRpcId,
    /// The error object.
    pub error: JsonRpcError,
}

/// The outcome of classifying a raw response. Exactly one variant applies.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedResponse {
    /// `result` present, `error` absent.
    Success(SuccessResponse),
    /// `error` present and valid, `result` absent.
    Error(ErrorResponse),
    /// Anything else.
    Malformed(MalformedReason),
}

impl ClassifiedResponse {
    /// Returns `true` for [`ClassifiedResponse::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, ClassifiedResponse::Success(_))
    }

    /// Returns `true` for [`ClassifiedResponse::Error`].
    pub fn is_error(&self) -> bool {
        matches!(self, ClassifiedResponse::Error(_))
    }

    /// Returns `true` for [`ClassifiedResponse::Malformed`].
    pub fn is_malformed(&self) -> bool {
        matches!(self, ClassifiedResponse::Malformed(_))
    }

    /// Short label used in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            ClassifiedResponse::Success(_) => "success",
            ClassifiedResponse::Error(_) => "error",
            ClassifiedResponse::Malformed(_) => "malformed",
        }
    }

    /// Converts into the `result` payload, turning error responses into
    /// [`TckError::JsonRpc`] and malformed ones into
    /// [`TckError::MalformedResponse`].
    pub fn into_result(self) -> TckResult<Value> {
        match self {
            ClassifiedResponse::Success(success) => Ok(success.result),
            ClassifiedResponse::Error(ErrorResponse { error, .. }) => Err(TckError::JsonRpc {
                code: error.code,
                message: error.message,
                data: error.data,
            }),
            ClassifiedResponse::Malformed(reason) => Err(TckError::MalformedResponse(reason)),
        }
    }
}

/// Classifies a raw response against the id of the request that produced it.
pub fn classify(response: &Value, expected_id: &JsonRpcId) -> ClassifiedResponse {
    match classify_inner(response, expected_id) {
        Ok(classified) => classified,
        Err(reason) => ClassifiedResponse::Malformed(reason),
    }
}

fn classify_inner(
    response: &Value,
    expected_id: &JsonRpcId,
) -> Result<ClassifiedResponse, MalformedReason> {
    let object = response
        .as_object()
        .ok_or_else(|| MalformedReason::NotAnObject(json_type_name(response)))?;

    match object.get("jsonrpc") {
        None => return Err(MalformedReason::MissingVersion),
        Some(Value::String(version)) if version == JSONRPC_VERSION => {}
        Some(other) => return Err(MalformedReason::WrongVersion(other.to_string())),
    }

    let id = object.get("id").ok_or(MalformedReason::MissingId)?;
    if !expected_id.matches(id) {
        return Err(MalformedReason::IdMismatch {
            expected: expected_id.to_value().to_string(),
            actual: id.to_string(),
        });
    }

    match (object.get("result"), object.get("error")) {
        (Some(_), Some(_)) => Err(MalformedReason::BothResultAndError),
        (None, None) => Err(MalformedReason::NeitherResultNorError),
        (Some(result), None) => Ok(ClassifiedResponse::Success(SuccessResponse {
            id: expected_id.clone(),
            result: result.clone(),
        })),
        (None, Some(error)) => Ok(ClassifiedResponse::Error(ErrorResponse {
            id: expected_id.clone(),
            error: parse_error_object(error)?,
        })),
    }
}

fn parse_error_object(error: &Value) -> Result<JsonRpcError, MalformedReason> {
    let object = error.as_object().ok_or_else(|| {
        MalformedReason::InvalidErrorObject(format!(
            "'error' must be an object, got {}",
            json_type_name(error)
        ))
    })?;

    let code = object
        .get("code")
        .and_then(Value::as_i64)
        .ok_or_else(|| MalformedReason::InvalidErrorObject("'code' must be an integer".into()))?;
    let message = object
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| MalformedReason::InvalidErrorObject("'message' must be a string".into()))?;

    Ok(JsonRpcError {
        code,
        message: message.to_string(),
        data: object.get("data").cloned(),
    })
}

/// Returns `true` iff `response` is a well-formed success response for
/// `expected_id`.
pub fn is_success(response: &Value, expected_id: &JsonRpcId) -> bool {
    classify(response, expected_id).is_success()
}

/// Returns `true` iff `response` is a well-formed error response for
/// `expected_id`.
pub fn is_error(response: &Value, expected_id: &JsonRpcId) -> bool {
    classify(response, expected_id).is_error()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn make_request_rejects_empty_method() {
        let err = make_request("  ", json!({})).unwrap_err();
        assert!(matches!(err, TckError::InvalidRequest(_)));
    }

    #[test]
    fn make_request_rejects_non_object_params() {
        let err = make_request("message/send", json!([1, 2])).unwrap_err();
        match err {
            TckError::InvalidRequest(msg) => assert!(msg.contains("array")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn make_request_uses_uuid_ids() {
        let request = make_request("tasks/get", json!({"id": "t"})).unwrap();
        match &request.id {
            JsonRpcId::String(s) => assert!(Uuid::parse_str(s).is_ok()),
            other => panic!("expected string id, got {other:?}"),
        }
    }

    #[test]
    fn reference_params_carry_ids_in_order() {
        let params = text_message_params_with_references("hi", ["b", "a"]);
        assert_eq!(
            params.message.reference_task_ids,
            Some(vec!["b".to_string(), "a".to_string()])
        );
    }

    #[test]
    fn wrong_version_is_malformed() {
        let id = JsonRpcId::from(1);
        let classified = classify(&json!({"jsonrpc": "1.0", "id": 1, "result": {}}), &id);
        assert_eq!(
            classified,
            ClassifiedResponse::Malformed(MalformedReason::WrongVersion("\"1.0\"".to_string()))
        );
        let classified = classify(&json!({"jsonrpc": 2.0, "id": 1, "result": {}}), &id);
        assert!(classified.is_malformed());
    }

    #[test]
    fn non_integer_code_is_malformed() {
        let id = JsonRpcId::from(1);
        let response = json!({"jsonrpc": "2.0", "id": 1, "error": {"code": "-32001", "message": "x"}});
        assert!(matches!(
            classify(&response, &id),
            ClassifiedResponse::Malformed(MalformedReason::InvalidErrorObject(_))
        ));
        let response = json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32001.5, "message": "x"}});
        assert!(classify(&response, &id).is_malformed());
    }

    #[test]
    fn error_data_is_preserved() {
        let id = JsonRpcId::from("r");
        let response = json!({
            "jsonrpc": "2.0",
            "id": "r",
            "error": {"code": -32602, "message": "bad", "data": {"field": "message"}}
        });
        match classify(&response, &id) {
            ClassifiedResponse::Error(err) => {
                assert_eq!(err.error.data, Some(json!({"field": "message"})));
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn null_result_counts_as_present() {
        let id = JsonRpcId::from(3);
        assert!(is_success(&json!({"jsonrpc": "2.0", "id": 3, "result": null}), &id));
    }

    #[test]
    fn into_result_maps_variants() {
        let id = JsonRpcId::from(1);
        let ok = classify(&json!({"jsonrpc": "2.0", "id": 1, "result": 5}), &id);
        assert_eq!(ok.into_result().unwrap(), json!(5));

        let err = classify(
            &json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32001, "message": "nope"}}),
            &id,
        );
        assert_eq!(err.into_result().unwrap_err().rpc_code(), Some(-32001));

        let bad = classify(&json!({"jsonrpc": "2.0", "id": 1}), &id);
        assert!(matches!(
            bad.into_result(),
            Err(TckError::MalformedResponse(MalformedReason::NeitherResultNorError))
        ));
    }
}
