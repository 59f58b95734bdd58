//! Agent card discovery.
//!
//! The card is returned as raw JSON; the suite only reads a few members of
//! it and must not reject a SUT over fields a typed schema would require.

use serde_json::Value;
use tracing::debug;

use crate::error::{TckError, TckResult};
use crate::utils::constants::{AGENT_CARD_WELL_KNOWN_PATH, PREV_AGENT_CARD_WELL_KNOWN_PATH};

/// Fetches agent cards from well-known paths under a SUT's origin.
#[derive(Debug, Clone)]
pub struct CardResolver {
    client: reqwest::Client,
}

impl CardResolver {
    /// Create a resolver with an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch the agent card from `origin`.
    ///
    /// Tries `/.well-known/agent-card.json` first and falls back to
    /// `/.well-known/agent.json` when that returns 404.
    pub async fn resolve(&self, origin: &str) -> TckResult<Value> {
        let base = origin.trim_end_matches('/');

        match self.fetch_card(base, AGENT_CARD_WELL_KNOWN_PATH).await {
            Err(TckError::Http { status: 404, .. }) => {
                debug!(
                    base = %base,
                    fallback = PREV_AGENT_CARD_WELL_KNOWN_PATH,
                    "agent card not found at current path, trying fallback"
                );
                self.fetch_card(base, PREV_AGENT_CARD_WELL_KNOWN_PATH).await
            }
            other => other,
        }
    }

    async fn fetch_card(&self, base: &str, path: &str) -> TckResult<Value> {
        let url = format!("{base}{path}");

        debug!(url = %url, "resolving agent card");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TckError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TckError::Transport(format!("failed to read agent card response: {e}")))?;

        let card: Value = serde_json::from_slice(&bytes)
            .map_err(|e| TckError::InvalidJson(format!("failed to parse agent card: {e}")))?;
        if !card.is_object() {
            return Err(TckError::InvalidJson(
                "agent card is not a JSON object".to_string(),
            ));
        }

        debug!(
            name = card.get("name").and_then(|v| v.as_str()).unwrap_or("<unnamed>"),
            "resolved agent card"
        );
        Ok(card)
    }
}
