//! Protocol method names and well-known paths the kit talks to.

/// Send a message and receive a task or message.
pub const METHOD_MESSAGE_SEND: &str = "message/send";

/// Send a message and receive an SSE stream of updates.
pub const METHOD_MESSAGE_STREAM: &str = "message/stream";

/// The well-known path for the agent card (A2A v0.3 and later)
pub const AGENT_CARD_WELL_KNOWN_PATH: &str = "/.well-known/agent-card.json";

/// The previous well-known path for the agent card (deprecated, but still supported)
pub const PREV_AGENT_CARD_WELL_KNOWN_PATH: &str = "/.well-known/agent.json";
