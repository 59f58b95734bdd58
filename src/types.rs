//! Wire types the conformance kit sends to a SUT.
//!
//! Only the outbound side is typed. Responses are kept as raw
//! [`serde_json::Value`]s so the classifier in [`crate::utils::message`]
//! can judge shapes a typed deserializer would reject outright.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The JSON-RPC protocol version every request and response must carry.
pub const JSONRPC_VERSION: &str = "2.0";

// ============================================================================
// Enums
// ============================================================================

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from the client side.
    User,
    /// Message from the agent.
    Agent,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Agent => write!(f, "agent"),
        }
    }
}

// ============================================================================
// Message & Parts
// ============================================================================

/// A single message sent to the SUT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message identifier.
    pub message_id: String,

    /// Who sent this message.
    pub role: Role,

    /// Discriminator field, always "message".
    #[serde(default = "kind_message")]
    pub kind: String,

    /// Content parts of the message.
    pub parts: Vec<Part>,

    /// Context this message belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    /// Task this message is associated with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    /// Arbitrary metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,

    /// IDs of earlier tasks this message refers to.
    ///
    /// `None` leaves the field off the wire; `Some(vec![])` sends an
    /// explicit empty list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_task_ids: Option<Vec<String>>,
}

fn kind_message() -> String {
    "message".to_string()
}

/// A file the SUT can fetch by URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileWithUri {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One content part of a message, tagged by `kind` on the wire:
/// `{"kind": "text", "text": "hello"}`, `{"kind": "file", "file": {...}}`
/// or `{"kind": "data", "data": {...}}`.
///
/// The kit only ever sends file parts by URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<serde_json::Value>,
    },
    File {
        file: FileWithUri,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<serde_json::Value>,
    },
    Data {
        data: serde_json::Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<serde_json::Value>,
    },
}

// ============================================================================
// JSON-RPC Foundation
// ============================================================================

/// A JSON-RPC 2.0 request ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcId {
    /// String identifier.
    String(String),
    /// Numeric identifier.
    Number(i64),
    /// Null. Never generated by the kit, only seen in SUT responses.
    Null,
}

impl JsonRpcId {
    /// Compares this id against a raw `id` value from a response.
    ///
    /// Type-exact: the string `"1"` does not match the number `1`.
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        match (self, value) {
            (JsonRpcId::String(expected), serde_json::Value::String(actual)) => expected == actual,
            (JsonRpcId::Number(expected), serde_json::Value::Number(actual)) => {
                actual.as_i64() == Some(*expected)
            }
            (JsonRpcId::Null, serde_json::Value::Null) => true,
            _ => false,
        }
    }

    /// Returns the id as a raw JSON value.
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            JsonRpcId::String(s) => serde_json::Value::String(s.clone()),
            JsonRpcId::Number(n) => serde_json::Value::from(*n),
            JsonRpcId::Null => serde_json::Value::Null,
        }
    }
}

impl fmt::Display for JsonRpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonRpcId::String(s) => write!(f, "{}", s),
            JsonRpcId::Number(n) => write!(f, "{}", n),
            JsonRpcId::Null => write!(f, "null"),
        }
    }
}

impl From<String> for JsonRpcId {
    fn from(s: String) -> Self {
        JsonRpcId::String(s)
    }
}

impl From<&str> for JsonRpcId {
    fn from(s: &str) -> Self {
        JsonRpcId::String(s.to_string())
    }
}

impl From<i64> for JsonRpcId {
    fn from(n: i64) -> Self {
        JsonRpcId::Number(n)
    }
}

impl From<i32> for JsonRpcId {
    fn from(n: i32) -> Self {
        JsonRpcId::Number(n as i64)
    }
}

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version, always "2.0".
    pub jsonrpc: String,

    /// Request identifier used to correlate the response.
    pub id: JsonRpcId,

    /// Method name.
    pub method: String,

    /// Method parameters.
    pub params: serde_json::Value,
}

/// A JSON-RPC 2.0 error object as returned by a SUT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i64,

    /// Human-readable error message.
    pub message: String,

    /// Optional structured error data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

// ============================================================================
// Request Parameter Types
// ============================================================================

/// Parameters for `message/send` and `message/stream`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageParams {
    /// The message to send.
    pub message: Message,

    /// Request-level metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text {
            text: text.into(),
            metadata: None,
        }
    }

    /// A file part pointing at `uri`.
    pub fn file_from_uri(uri: impl Into<String>, mime_type: Option<String>) -> Self {
        let file = FileWithUri {
            uri: uri.into(),
            mime_type,
            name: None,
        };
        Part::File {
            file,
            metadata: None,
        }
    }

    pub fn data(data: serde_json::Value) -> Self {
        Part::Data {
            data,
            metadata: None,
        }
    }
}

impl Message {
    /// Create a new user message with a single text part.
    pub fn user(message_id: impl Into<String>, text: impl Into<String>) -> Self {
        Message {
            message_id: message_id.into(),
            role: Role::User,
            kind: kind_message(),
            parts: vec![Part::text(text)],
            context_id: None,
            task_id: None,
            metadata: None,
            reference_task_ids: None,
        }
    }
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC 2.0 request with an explicit id.
    pub fn new(
        id: impl Into<JsonRpcId>,
        method: impl Into<String>,
        params: serde_json::Value,
    ) -> Self {
        JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.into(),
            method: method.into(),
            params,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
