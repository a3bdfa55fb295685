//! Agent card discovery.
//!
//! An agent card describes an agent's capabilities and skills and is
//! published at a well-known path. Resolution probes [`AGENT_CARD_PATH`]
//! first, falling back to [`A2A_AGENT_CARD_PATH`] (§6), within a fixed
//! probe budget so a dead or card-less endpoint doesn't stall a caller
//! indefinitely.

use std::time::Duration;

use crate::error::{A2AError, A2AResult};
use crate::types::AgentCard;
use crate::utils::constants::{A2A_AGENT_CARD_PATH, AGENT_CARD_PATH, DEFAULT_CARD_PROBE_BUDGET_SECS};

/// Resolves [`AgentCard`]s from agent base URLs.
///
/// # Example
///
/// ```no_run
/// use agentwire::client::CardResolver;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let resolver = CardResolver::new();
/// let card = resolver.resolve("http://localhost:7420").await?;
/// println!("Agent: {} v{}", card.name, card.version);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CardResolver {
    client: reqwest::Client,
    probe_budget: Duration,
}

impl CardResolver {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            probe_budget: Duration::from_secs(DEFAULT_CARD_PROBE_BUDGET_SECS),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            probe_budget: Duration::from_secs(DEFAULT_CARD_PROBE_BUDGET_SECS),
        }
    }

    pub fn with_probe_budget(mut self, budget: Duration) -> Self {
        self.probe_budget = budget;
        self
    }

    /// Probes `{base_url}{AGENT_CARD_PATH}`, falling back to
    /// `{base_url}{A2A_AGENT_CARD_PATH}` if the first attempt fails.
    pub async fn resolve(&self, base_url: &str) -> A2AResult<AgentCard> {
        let base = base_url.trim_end_matches('/');

        match self.fetch_card(base, AGENT_CARD_PATH).await {
            Ok(card) => Ok(card),
            Err(primary_err) => {
                tracing::debug!(
                    error = %primary_err,
                    "agent card not found at {}{}, trying {}{}",
                    base,
                    AGENT_CARD_PATH,
                    base,
                    A2A_AGENT_CARD_PATH,
                );
                self.fetch_card(base, A2A_AGENT_CARD_PATH).await
            }
        }
    }

    async fn fetch_card(&self, base: &str, path: &str) -> A2AResult<AgentCard> {
        let url = format!("{base}{path}");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .timeout(self.probe_budget)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    A2AError::Timeout(format!("timed out probing agent card at {url}"))
                } else {
                    A2AError::connection(url.as_str(), e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(A2AError::request(status.as_u16(), body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| A2AError::connection(url.as_str(), e.to_string()))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| A2AError::response(format!("invalid agent card at {url}: {e}")))
    }
}

impl Default for CardResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_probe_budget_matches_constant() {
        let resolver = CardResolver::new();
        assert_eq!(
            resolver.probe_budget,
            Duration::from_secs(DEFAULT_CARD_PROBE_BUDGET_SECS)
        );
    }

    #[test]
    fn with_probe_budget_overrides_default() {
        let resolver = CardResolver::new().with_probe_budget(Duration::from_secs(2));
        assert_eq!(resolver.probe_budget, Duration::from_secs(2));
    }
}
