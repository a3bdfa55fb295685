//! A named map of agents a caller can dispatch to by name, with lazy card
//! resolution and JSON persistence (§4.5).

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{A2AError, A2AResult};
use crate::types::AgentCard;

#[cfg(feature = "client")]
use crate::client::A2AClient;

/// One network member: an endpoint plus its lazily-fetched card.
struct Entry {
    url: String,
    card: Option<AgentCard>,
    #[cfg(feature = "client")]
    client: Option<Arc<A2AClient>>,
}

impl Entry {
    fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            card: None,
            #[cfg(feature = "client")]
            client: None,
        }
    }
}

/// Summary returned by [`AgentNetwork::list`].
#[derive(Debug, Clone, Serialize)]
pub struct AgentSummary {
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub skills_count: Option<usize>,
}

/// The JSON document written by [`AgentNetwork::save`] / read by
/// [`AgentNetwork::load`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkDocument {
    pub name: String,
    pub id: String,
    pub agents: Vec<NetworkDocumentAgent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkDocumentAgent {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<NetworkDocumentCard>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkDocumentCard {
    pub name: String,
    pub description: String,
    pub version: String,
    pub skills_count: usize,
}

/// A named registry of agents, resolved lazily and reused across calls.
///
/// Mirrors `AgentNetwork.add`/`get_agent`/`list_agents` and its
/// save/load-to-JSON round trip.
pub struct AgentNetwork {
    name: String,
    id: String,
    entries: RwLock<HashMap<String, Entry>>,
}

impl AgentNetwork {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: uuid::Uuid::new_v4().to_string(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Registers or replaces the entry for `name`. A repeat call for the
    /// same name overwrites the prior entry and drops its cached card.
    pub async fn add(&self, name: impl Into<String>, url: impl Into<String>) {
        let mut entries = self.entries.write().await;
        entries.insert(name.into(), Entry::new(url));
    }

    /// Removes `name` from the network, if present.
    pub async fn remove(&self, name: &str) {
        self.entries.write().await.remove(name);
    }

    /// Resolves a client for `name`, fetching and caching its agent card on
    /// first use.
    #[cfg(feature = "client")]
    pub async fn get(&self, name: &str) -> A2AResult<Arc<A2AClient>> {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(name) {
                if let Some(client) = &entry.client {
                    return Ok(client.clone());
                }
            } else {
                return Err(A2AError::validation(format!("unknown agent: {name}")));
            }
        }
        self.refresh(name).await
    }

    /// Forces re-resolution of `name`'s client and card.
    #[cfg(feature = "client")]
    pub async fn refresh(&self, name: &str) -> A2AResult<Arc<A2AClient>> {
        let url = {
            let entries = self.entries.read().await;
            entries
                .get(name)
                .map(|e| e.url.clone())
                .ok_or_else(|| A2AError::validation(format!("unknown agent: {name}")))?
        };

        let client = Arc::new(A2AClient::connect_url(&url).await?);
        let card = client.agent_card().cloned();

        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get_mut(name) {
            entry.client = Some(client.clone());
            entry.card = card;
        }
        Ok(client)
    }

    pub async fn list(&self) -> Vec<AgentSummary> {
        let entries = self.entries.read().await;
        let mut summaries: Vec<AgentSummary> = entries
            .iter()
            .map(|(name, entry)| AgentSummary {
                name: name.clone(),
                url: entry.url.clone(),
                description: entry.card.as_ref().map(|c| c.description.clone()),
                skills_count: entry.card.as_ref().map(|c| c.skills.len()),
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    /// Combined description + skill tags/examples per agent, used by the
    /// router's keyword fallback. An entry with no cached card yet
    /// contributes an empty profile — it still participates in routing,
    /// just with nothing to score against.
    pub async fn route_profiles(&self) -> Vec<(String, String)> {
        let entries = self.entries.read().await;
        let mut profiles: Vec<(String, String)> = entries
            .iter()
            .map(|(name, entry)| {
                let text = entry
                    .card
                    .as_ref()
                    .map(|card| {
                        let mut parts = vec![card.description.clone()];
                        for skill in &card.skills {
                            parts.extend(skill.tags.iter().cloned());
                            parts.extend(skill.examples.iter().cloned());
                        }
                        parts.join(" ")
                    })
                    .unwrap_or_default();
                (name.clone(), text)
            })
            .collect();
        profiles.sort_by(|a, b| a.0.cmp(&b.0));
        profiles
    }

    /// Serializes the network to the JSON document shape. Card metadata is
    /// best-effort: an entry whose card hasn't been fetched yet is saved
    /// without one.
    pub async fn save_document(&self) -> NetworkDocument {
        let entries = self.entries.read().await;
        let mut agents: Vec<NetworkDocumentAgent> = entries
            .iter()
            .map(|(name, entry)| NetworkDocumentAgent {
                name: name.clone(),
                url: entry.url.clone(),
                card: entry.card.as_ref().map(|c| NetworkDocumentCard {
                    name: c.name.clone(),
                    description: c.description.clone(),
                    version: c.version.clone(),
                    skills_count: c.skills.len(),
                }),
            })
            .collect();
        agents.sort_by(|a, b| a.name.cmp(&b.name));

        NetworkDocument {
            name: self.name.clone(),
            id: self.id.clone(),
            agents,
        }
    }

    /// Rebuilds a network from a document, reconnecting purely by URL — it
    /// does not replay cached card data, only the names and endpoints.
    pub fn load_document(document: NetworkDocument) -> Self {
        let mut entries = HashMap::new();
        for agent in document.agents {
            entries.insert(agent.name, Entry::new(agent.url));
        }
        Self {
            name: document.name,
            id: document.id,
            entries: RwLock::new(entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_then_list_returns_summary() {
        let network = AgentNetwork::new("test");
        network.add("weather", "http://localhost:9001").await;
        let summaries = network.list().await;
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, "weather");
        assert_eq!(summaries[0].url, "http://localhost:9001");
    }

    #[tokio::test]
    async fn repeat_add_overwrites_entry() {
        let network = AgentNetwork::new("test");
        network.add("weather", "http://localhost:9001").await;
        network.add("weather", "http://localhost:9002").await;
        let summaries = network.list().await;
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].url, "http://localhost:9002");
    }

    #[tokio::test]
    async fn save_then_load_round_trips_urls() {
        let network = AgentNetwork::new("test");
        network.add("weather", "http://localhost:9001").await;
        let document = network.save_document().await;

        let reloaded = AgentNetwork::load_document(document);
        let summaries = reloaded.list().await;
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].url, "http://localhost:9001");
        assert!(summaries[0].description.is_none());
    }
}
