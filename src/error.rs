//! TCK error types and the JSON-RPC / A2A error codes the suite inspects.
//!
//! Two families of failure are kept apart:
//! - transport failures (connection refused, timeout, non-2xx without a
//!   JSON-RPC body, unparsable body) which mean the SUT could not be reached
//! - protocol-level outcomes (`JsonRpc`, `MalformedResponse`) which mean the
//!   SUT answered and the answer was inspected

use crate::config::ConfigError;
use crate::utils::message::MalformedReason;

// ---------------------------------------------------------------------------
// Standard JSON-RPC 2.0 error codes
// ---------------------------------------------------------------------------

/// Invalid JSON was received by the server.
pub const PARSE_ERROR: i64 = -32700;

/// The JSON sent is not a valid Request object.
pub const INVALID_REQUEST: i64 = -32600;

/// The method does not exist / is not available.
pub const METHOD_NOT_FOUND: i64 = -32601;

/// Invalid method parameter(s).
pub const INVALID_PARAMS: i64 = -32602;

/// Internal JSON-RPC error.
pub const INTERNAL_ERROR: i64 = -32603;

// ---------------------------------------------------------------------------
// A2A-specific error codes
// ---------------------------------------------------------------------------

/// The requested task was not found.
pub const TASK_NOT_FOUND: i64 = -32001;

/// The task cannot be canceled in its current state.
pub const TASK_NOT_CANCELABLE: i64 = -32002;

/// Push notifications are not supported by this agent.
pub const PUSH_NOTIFICATION_NOT_SUPPORTED: i64 = -32003;

/// The requested operation is not supported.
pub const UNSUPPORTED_OPERATION: i64 = -32004;

/// The content type is not supported.
pub const CONTENT_TYPE_NOT_SUPPORTED: i64 = -32005;

/// The agent returned an invalid response.
pub const INVALID_AGENT_RESPONSE: i64 = -32006;

/// Authenticated extended card is not configured.
pub const AUTHENTICATED_EXTENDED_CARD_NOT_CONFIGURED: i64 = -32007;

/// Returns a short name for a well-known error code, if it is one.
///
/// Used when reporting what a SUT answered; unknown codes are still valid
/// as long as they are negative integers.
pub fn error_code_name(code: i64) -> Option<&'static str> {
    let name = match code {
        PARSE_ERROR => "ParseError",
        INVALID_REQUEST => "InvalidRequest",
        METHOD_NOT_FOUND => "MethodNotFound",
        INVALID_PARAMS => "InvalidParams",
        INTERNAL_ERROR => "InternalError",
        TASK_NOT_FOUND => "TaskNotFound",
        TASK_NOT_CANCELABLE => "TaskNotCancelable",
        PUSH_NOTIFICATION_NOT_SUPPORTED => "PushNotificationNotSupported",
        UNSUPPORTED_OPERATION => "UnsupportedOperation",
        CONTENT_TYPE_NOT_SUPPORTED => "ContentTypeNotSupported",
        INVALID_AGENT_RESPONSE => "InvalidAgentResponse",
        AUTHENTICATED_EXTENDED_CARD_NOT_CONFIGURED => "AuthenticatedExtendedCardNotConfigured",
        _ => return None,
    };
    Some(name)
}

// ---------------------------------------------------------------------------
// TckError enum
// ---------------------------------------------------------------------------

/// Unified error type for the conformance kit.
#[derive(Debug, thiserror::Error)]
pub enum TckError {
    /// A request could not be built (empty method, unserializable params).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Transport-level error (connection failed, body unreadable, etc.).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request or stream timed out.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// HTTP error status whose body is not a JSON-RPC response.
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// The SUT sent bytes that are not JSON.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// The SUT sent JSON that is neither a success nor an error response.
    #[error("Malformed JSON-RPC response: {0}")]
    MalformedResponse(#[from] MalformedReason),

    /// A well-formed JSON-RPC error response was received from the SUT.
    #[error("JSON-RPC error {code}: {message}")]
    JsonRpc {
        /// JSON-RPC error code.
        code: i64,
        /// Error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Suite configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catch-all for errors that don't fit other categories.
    #[error("{0}")]
    Other(String),
}

/// Convenience result type for TCK operations.
pub type TckResult<T> = Result<T, TckError>;

impl TckError {
    /// Returns `true` when the SUT could not be reached or did not answer
    /// with JSON at all.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TckError::Transport(_)
                | TckError::Timeout(_)
                | TckError::Http { .. }
                | TckError::InvalidJson(_)
        )
    }

    /// Returns the JSON-RPC error code carried by a protocol error, if any.
    pub fn rpc_code(&self) -> Option<i64> {
        match self {
            TckError::JsonRpc { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TckError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TckError::Timeout(format!("request timed out: {err}"))
        } else if err.is_connect() {
            TckError::Transport(format!("connection failed: {err}"))
        } else {
            TckError::Transport(format!("HTTP request failed: {err}"))
        }
    }
}
