//! Builder patterns for constructing SUT clients and message params.

use std::collections::HashMap;
use std::time::Duration;

use uuid::Uuid;

use crate::client::SutClient;
use crate::config::SutConfig;
use crate::error::TckResult;
use crate::types::{Message, Part, Role, SendMessageParams};

/// Builder for a [`SutClient`] with fluent configuration.
///
/// # Example
///
/// ```no_run
/// use a2a_tck::builders::SutClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = SutClientBuilder::new("http://localhost:9999")
///     .with_timeout(Duration::from_secs(10))
///     .with_bearer_token("secret")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SutClientBuilder {
    url: String,
    timeout: Option<Duration>,
    headers: HashMap<String, String>,
}

impl SutClientBuilder {
    /// Create a new builder for the SUT's JSON-RPC endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
            headers: HashMap::new(),
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a custom HTTP header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add an Authorization header with a bearer token.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", token.into()),
        );
        self
    }

    /// Validate the settings into a [`SutConfig`].
    pub fn config(self) -> TckResult<SutConfig> {
        let mut config = SutConfig::new(self.url)?;
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        config.headers.extend(self.headers);
        Ok(config)
    }

    /// Build the client.
    pub fn build(self) -> TckResult<SutClient> {
        SutClient::new(self.config()?)
    }
}

/// Builder for `message/send` params.
///
/// # Example
///
/// ```
/// use a2a_tck::builders::SendMessageParamsBuilder;
///
/// let params = SendMessageParamsBuilder::new()
///     .text("see the earlier task")
///     .reference_task("task-1")
///     .build();
/// assert_eq!(params.message.reference_task_ids, Some(vec!["task-1".to_string()]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SendMessageParamsBuilder {
    parts: Vec<Part>,
    context_id: Option<String>,
    task_id: Option<String>,
    reference_task_ids: Option<Vec<String>>,
    metadata: Option<serde_json::Value>,
}

impl SendMessageParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text part.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(Part::text(text));
        self
    }

    /// Append an arbitrary part.
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    pub fn context_id(mut self, context_id: impl Into<String>) -> Self {
        self.context_id = Some(context_id.into());
        self
    }

    pub fn task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    /// Append one id to `referenceTaskIds`, creating the list if needed.
    pub fn reference_task(mut self, task_id: impl Into<String>) -> Self {
        self.reference_task_ids
            .get_or_insert_with(Vec::new)
            .push(task_id.into());
        self
    }

    /// Send an explicit, empty `referenceTaskIds` list.
    pub fn empty_references(mut self) -> Self {
        self.reference_task_ids = Some(Vec::new());
        self
    }

    /// Request-level metadata.
    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn build(self) -> SendMessageParams {
        SendMessageParams {
            message: Message {
                message_id: Uuid::new_v4().to_string(),
                role: Role::User,
                kind: "message".to_string(),
                parts: self.parts,
                context_id: self.context_id,
                task_id: self.task_id,
                metadata: None,
                reference_task_ids: self.reference_task_ids,
            },
            metadata: self.metadata,
        }
    }
}
