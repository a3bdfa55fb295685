//! Agent discovery registry: a small directory agents can register with,
//! heartbeat against, and query (§4.8).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::builders::AgentCardBuilder;
use crate::types::{AgentCard, CAPABILITY_AGENT_DISCOVERY, CAPABILITY_REGISTRY};

/// Default eviction age for a registry entry with no recent heartbeat.
pub const DEFAULT_MAX_AGE_SECS: u64 = 300;

struct RegistryEntry {
    card: AgentCard,
    last_seen: Instant,
}

/// In-memory directory of registered agent cards, keyed by URL.
///
/// The background pruner ([`Registry::spawn_pruner`]) evicts entries whose
/// `last_seen` is older than `max_age`; the sweep period is `max_age / 3`.
pub struct Registry {
    entries: RwLock<HashMap<String, RegistryEntry>>,
    max_age: Duration,
    card: AgentCard,
}

impl Registry {
    /// `url` is this registry's own address, advertised on its `AgentCard`
    /// (served at `GET /agent.json` alongside the registry routes) with
    /// `agent_discovery = true` and `registry = true` set.
    pub fn new(url: impl Into<String>, max_age: Duration) -> Self {
        let url = url.into();
        let card = AgentCardBuilder::new("Agent Registry", "Agent discovery registry", url)
            .with_capability(CAPABILITY_AGENT_DISCOVERY, true)
            .with_capability(CAPABILITY_REGISTRY, true)
            .build();
        Self {
            entries: RwLock::new(HashMap::new()),
            max_age,
            card,
        }
    }

    pub fn with_default_max_age(url: impl Into<String>) -> Self {
        Self::new(url, Duration::from_secs(DEFAULT_MAX_AGE_SECS))
    }

    /// This registry's own agent card.
    pub fn card(&self) -> &AgentCard {
        &self.card
    }

    /// Registers or replaces the entry for `card.url`, refreshing
    /// `last_seen`. Idempotent.
    pub async fn register(&self, card: AgentCard) -> bool {
        let mut entries = self.entries.write().await;
        entries.insert(
            card.url.clone(),
            RegistryEntry {
                card,
                last_seen: Instant::now(),
            },
        );
        true
    }

    pub async fn unregister(&self, url: &str) -> bool {
        self.entries.write().await.remove(url).is_some()
    }

    /// Refreshes `last_seen` for `url`. Returns `false` without
    /// registering anything if `url` isn't already known.
    pub async fn heartbeat(&self, url: &str) -> bool {
        let mut entries = self.entries.write().await;
        match entries.get_mut(url) {
            Some(entry) => {
                entry.last_seen = Instant::now();
                true
            }
            None => false,
        }
    }

    pub async fn agents(&self) -> Vec<AgentCard> {
        self.entries
            .read()
            .await
            .values()
            .map(|e| e.card.clone())
            .collect()
    }

    async fn prune(&self) {
        let mut entries = self.entries.write().await;
        let max_age = self.max_age;
        let before = entries.len();
        entries.retain(|_, entry| entry.last_seen.elapsed() <= max_age);
        let pruned = before - entries.len();
        if pruned > 0 {
            debug!(pruned, "evicted stale registry entries");
        }
    }

    /// Spawns the background pruner, sweeping at `max_age / 3` (floored at
    /// 1ms so a zero `max_age` doesn't busy-loop; this keeps the sweep
    /// period comfortably within the `≤ max_age / 3` bound even for small
    /// `max_age` values).
    pub fn spawn_pruner(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let registry = self.clone();
        let period = (registry.max_age / 3).max(Duration::from_millis(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                registry.prune().await;
            }
        })
    }
}

/// `{url}` body shared by unregister/heartbeat requests.
#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[cfg(feature = "server")]
pub mod routes {
    //! `POST /registry/register`, `/unregister`, `/heartbeat`, and
    //! `GET /registry/agents` — mounted the same way as the agent routes.

    use std::sync::Arc;

    use axum::extract::State;
    use axum::response::{IntoResponse, Json};
    use axum::routing::{get, post};
    use axum::Router;

    use super::{Registry, SuccessResponse, UrlRequest};
    use crate::types::AgentCard;
    use crate::utils::constants::AGENT_CARD_PATH;

    pub fn registry_router(registry: Arc<Registry>) -> Router {
        Router::new()
            .route(AGENT_CARD_PATH, get(handle_agent_card))
            .route("/registry/register", post(handle_register))
            .route("/registry/unregister", post(handle_unregister))
            .route("/registry/heartbeat", post(handle_heartbeat))
            .route("/registry/agents", get(handle_agents))
            .with_state(registry)
    }

    async fn handle_agent_card(State(registry): State<Arc<Registry>>) -> impl IntoResponse {
        Json(registry.card().clone())
    }

    async fn handle_register(
        State(registry): State<Arc<Registry>>,
        Json(card): Json<AgentCard>,
    ) -> impl IntoResponse {
        let success = registry.register(card).await;
        Json(SuccessResponse { success })
    }

    async fn handle_unregister(
        State(registry): State<Arc<Registry>>,
        Json(body): Json<UrlRequest>,
    ) -> impl IntoResponse {
        let success = registry.unregister(&body.url).await;
        Json(SuccessResponse { success })
    }

    async fn handle_heartbeat(
        State(registry): State<Arc<Registry>>,
        Json(body): Json<UrlRequest>,
    ) -> impl IntoResponse {
        let success = registry.heartbeat(&body.url).await;
        Json(SuccessResponse { success })
    }

    async fn handle_agents(State(registry): State<Arc<Registry>>) -> impl IntoResponse {
        Json(registry.agents().await)
    }
}

/// Wraps a local agent card plus a set of registries to stay discoverable
/// against.
#[cfg(feature = "client")]
pub struct Discovery {
    card: AgentCard,
    registry_urls: Vec<String>,
    client: reqwest::Client,
}

#[cfg(feature = "client")]
impl Discovery {
    pub fn new(card: AgentCard, registry_urls: Vec<String>) -> Self {
        Self {
            card,
            registry_urls,
            client: reqwest::Client::new(),
        }
    }

    /// Registers with every configured registry. A failure against one
    /// registry doesn't abort the others — each result is collected
    /// independently.
    pub async fn register(&self) -> Vec<(String, bool)> {
        self.broadcast("register", serde_json::to_value(&self.card).unwrap())
            .await
    }

    pub async fn unregister(&self) -> Vec<(String, bool)> {
        self.broadcast("unregister", serde_json::json!({ "url": self.card.url }))
            .await
    }

    pub async fn heartbeat(&self) -> Vec<(String, bool)> {
        self.broadcast("heartbeat", serde_json::json!({ "url": self.card.url }))
            .await
    }

    /// Aggregates `GET /registry/agents` across every configured registry.
    pub async fn discover(&self) -> Vec<AgentCard> {
        let mut agents = Vec::new();
        for base in &self.registry_urls {
            let url = format!("{}/registry/agents", base.trim_end_matches('/'));
            match self.client.get(&url).send().await {
                Ok(response) => match response.json::<Vec<AgentCard>>().await {
                    Ok(cards) => agents.extend(cards),
                    Err(e) => warn!(registry = %base, error = %e, "invalid registry/agents response"),
                },
                Err(e) => warn!(registry = %base, error = %e, "failed to reach registry"),
            }
        }
        agents
    }

    async fn broadcast(&self, path: &str, body: serde_json::Value) -> Vec<(String, bool)> {
        let mut results = Vec::with_capacity(self.registry_urls.len());
        for base in &self.registry_urls {
            let url = format!("{}/registry/{}", base.trim_end_matches('/'), path);
            let success = match self.client.post(&url).json(&body).send().await {
                Ok(response) => response
                    .json::<SuccessResponse>()
                    .await
                    .map(|r| r.success)
                    .unwrap_or(false),
                Err(e) => {
                    warn!(registry = %base, error = %e, "registry call failed");
                    false
                }
            };
            results.push((base.clone(), success));
        }
        results
    }

    /// Spawns a background task that calls [`Discovery::heartbeat`] every
    /// `interval` (typically `max_age / 3`, matching the registry's own
    /// eviction window).
    pub fn spawn_heartbeat(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let results = self.heartbeat().await;
                if results.iter().any(|(_, ok)| !ok) {
                    info!("heartbeat rejected by at least one registry, re-registering");
                    let _ = self.register().await;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_card(url: &str) -> AgentCard {
        AgentCard {
            name: "test".to_string(),
            description: String::new(),
            url: url.to_string(),
            version: "0.1.0".to_string(),
            provider: None,
            documentation_url: None,
            capabilities: HashMap::new(),
            default_input_modes: vec![],
            default_output_modes: vec![],
            skills: vec![],
            authentication: None,
        }
    }

    #[tokio::test]
    async fn register_then_list_returns_card() {
        let registry = Registry::with_default_max_age("http://registry");
        registry.register(test_card("http://agent-a")).await;
        let agents = registry.agents().await;
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].url, "http://agent-a");
    }

    #[tokio::test]
    async fn heartbeat_for_unknown_url_does_not_register() {
        let registry = Registry::with_default_max_age("http://registry");
        let ok = registry.heartbeat("http://unknown").await;
        assert!(!ok);
        assert!(registry.agents().await.is_empty());
    }

    #[tokio::test]
    async fn reregistering_same_url_replaces_card() {
        let registry = Registry::with_default_max_age("http://registry");
        registry.register(test_card("http://agent-a")).await;
        let mut updated = test_card("http://agent-a");
        updated.version = "0.2.0".to_string();
        registry.register(updated).await;

        let agents = registry.agents().await;
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].version, "0.2.0");
    }

    #[tokio::test]
    async fn prune_evicts_stale_entries() {
        let registry = Registry::new("http://registry", Duration::from_millis(0));
        registry.register(test_card("http://agent-a")).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        registry.prune().await;
        assert!(registry.agents().await.is_empty());
    }

    #[tokio::test]
    async fn unregister_removes_entry() {
        let registry = Registry::with_default_max_age("http://registry");
        registry.register(test_card("http://agent-a")).await;
        assert!(registry.unregister("http://agent-a").await);
        assert!(registry.agents().await.is_empty());
    }

    #[test]
    fn own_card_advertises_discovery_and_registry_capabilities() {
        let registry = Registry::with_default_max_age("http://registry");
        let card = registry.card();
        assert!(card.has_capability(CAPABILITY_AGENT_DISCOVERY));
        assert!(card.has_capability(CAPABILITY_REGISTRY));
        assert_eq!(card.url, "http://registry");
    }
}
