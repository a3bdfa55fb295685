//! Builder patterns for ergonomic construction of agent cards, clients, and
//! servers.

use std::collections::HashMap;

use crate::types::{
    AgentCard, AgentSkill, CAPABILITY_PARTS_ARRAY_FORMAT, CAPABILITY_PUSH_NOTIFICATIONS,
    CAPABILITY_STATE_TRANSITION_HISTORY, CAPABILITY_STREAMING,
};

/// Builder for constructing an [`AgentCard`] with sensible defaults.
///
/// # Example
///
/// ```
/// use agentwire::builders::AgentCardBuilder;
///
/// let card = AgentCardBuilder::new("My Agent", "An example agent", "http://localhost:8080")
///     .with_skill("chat", "Chat", "Conversational AI", vec!["conversation".to_string()])
///     .with_streaming(true)
///     .build();
/// assert_eq!(card.name, "My Agent");
/// ```
#[derive(Debug, Clone)]
pub struct AgentCardBuilder {
    name: String,
    description: String,
    url: String,
    version: String,
    provider: Option<String>,
    documentation_url: Option<String>,
    capabilities: HashMap<String, bool>,
    default_input_modes: Vec<String>,
    default_output_modes: Vec<String>,
    skills: Vec<AgentSkill>,
    authentication: Option<serde_json::Value>,
}

impl AgentCardBuilder {
    pub fn new(name: impl Into<String>, description: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            url: url.into(),
            version: "0.1.0".to_string(),
            provider: None,
            documentation_url: None,
            capabilities: HashMap::new(),
            default_input_modes: vec!["text/plain".to_string()],
            default_output_modes: vec!["text/plain".to_string()],
            skills: Vec::new(),
            authentication: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_provider(mut self, organization: impl Into<String>) -> Self {
        self.provider = Some(organization.into());
        self
    }

    pub fn with_documentation_url(mut self, url: impl Into<String>) -> Self {
        self.documentation_url = Some(url.into());
        self
    }

    pub fn with_streaming(mut self, enabled: bool) -> Self {
        self.capabilities
            .insert(CAPABILITY_STREAMING.to_string(), enabled);
        self
    }

    pub fn with_push_notifications(mut self, enabled: bool) -> Self {
        self.capabilities
            .insert(CAPABILITY_PUSH_NOTIFICATIONS.to_string(), enabled);
        self
    }

    pub fn with_state_transition_history(mut self, enabled: bool) -> Self {
        self.capabilities
            .insert(CAPABILITY_STATE_TRANSITION_HISTORY.to_string(), enabled);
        self
    }

    pub fn with_parts_array_format(mut self, enabled: bool) -> Self {
        self.capabilities
            .insert(CAPABILITY_PARTS_ARRAY_FORMAT.to_string(), enabled);
        self
    }

    /// Sets an arbitrary capability key. Unknown keys are preserved on the
    /// wire, so this covers whatever a deployment needs beyond the
    /// well-known ones above.
    pub fn with_capability(mut self, key: impl Into<String>, enabled: bool) -> Self {
        self.capabilities.insert(key.into(), enabled);
        self
    }

    pub fn with_skill(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        self.skills.push(AgentSkill {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            tags,
            examples: Vec::new(),
            input_modes: None,
            output_modes: None,
        });
        self
    }

    pub fn with_skill_examples(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        tags: Vec<String>,
        examples: Vec<String>,
    ) -> Self {
        self.skills.push(AgentSkill {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            tags,
            examples,
            input_modes: None,
            output_modes: None,
        });
        self
    }

    pub fn with_input_modes(mut self, modes: Vec<String>) -> Self {
        self.default_input_modes = modes;
        self
    }

    pub fn with_output_modes(mut self, modes: Vec<String>) -> Self {
        self.default_output_modes = modes;
        self
    }

    pub fn build(self) -> AgentCard {
        AgentCard {
            name: self.name,
            description: self.description,
            url: self.url,
            version: self.version,
            provider: self.provider,
            documentation_url: self.documentation_url,
            capabilities: self.capabilities,
            default_input_modes: self.default_input_modes,
            default_output_modes: self.default_output_modes,
            skills: self.skills,
            authentication: self.authentication,
        }
    }
}

/// Builder for constructing [`crate::client::A2AClient`] with custom
/// configuration.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use agentwire::builders::ClientBuilder;
/// use std::time::Duration;
///
/// let client = ClientBuilder::new("http://localhost:7420")
///     .with_timeout(Duration::from_secs(30))
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "client")]
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    url: String,
    timeout: Option<std::time::Duration>,
    headers: HashMap<String, String>,
}

#[cfg(feature = "client")]
impl ClientBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
            headers: HashMap::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", token.into()),
        );
        self
    }

    /// Resolves the agent card at `url` (probing `/agent.json` then
    /// `/a2a/agent.json`, §6) and builds a client around it.
    pub async fn build(self) -> crate::error::A2AResult<crate::client::A2AClient> {
        let transport = self.build_transport();
        crate::client::A2AClient::connect(transport).await
    }

    /// Builds a client without probing for an agent card — useful when the
    /// endpoint is already known and the card is irrelevant.
    pub fn build_without_card(self) -> crate::client::A2AClient {
        crate::client::A2AClient::new(self.build_transport())
    }

    fn build_transport(&self) -> crate::client::transport::HttpTransport {
        let mut transport = crate::client::transport::HttpTransport::new(&self.url);
        if let Some(timeout) = self.timeout {
            transport = transport.with_timeout(timeout);
        }
        for (key, value) in &self.headers {
            transport = transport.with_header(key, value);
        }
        transport
    }
}

/// Builder for constructing an axum server with fluent configuration.
///
/// # Example
///
/// ```rust,ignore
/// use agentwire::builders::ServerBuilder;
/// use agentwire::server::{TaskHandler, InMemoryTaskStore};
/// use std::sync::Arc;
///
/// # async fn example(handler: Arc<dyn TaskHandler>) {
/// let app = ServerBuilder::new(handler)
///     .with_agent_card(|builder| builder.with_streaming(true))
///     .with_cors(true)
///     .build();
/// # }
/// ```
#[cfg(feature = "server")]
pub struct ServerBuilder {
    handler: std::sync::Arc<dyn crate::server::TaskHandler>,
    task_store: Option<std::sync::Arc<dyn crate::server::TaskStore>>,
    agent_card: Option<AgentCard>,
    cors_enabled: bool,
}

#[cfg(feature = "server")]
impl ServerBuilder {
    pub fn new(handler: std::sync::Arc<dyn crate::server::TaskHandler>) -> Self {
        Self {
            handler,
            task_store: None,
            agent_card: None,
            cors_enabled: false,
        }
    }

    pub fn with_task_store(mut self, store: std::sync::Arc<dyn crate::server::TaskStore>) -> Self {
        self.task_store = Some(store);
        self
    }

    pub fn with_agent_card<F>(mut self, f: F) -> Self
    where
        F: FnOnce(AgentCardBuilder) -> AgentCardBuilder,
    {
        let builder = AgentCardBuilder::new("agentwire agent", "An agentwire-compatible agent", "");
        self.agent_card = Some(f(builder).build());
        self
    }

    pub fn with_agent_card_direct(mut self, card: AgentCard) -> Self {
        self.agent_card = Some(card);
        self
    }

    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.cors_enabled = enabled;
        self
    }

    pub fn build(self) -> axum::Router {
        use crate::server::{a2a_router, DefaultRequestHandler, InMemoryTaskStore};
        use std::sync::Arc;

        let store = self
            .task_store
            .unwrap_or_else(|| Arc::new(InMemoryTaskStore::new()));
        let request_handler = Arc::new(DefaultRequestHandler::new(self.handler, store));
        let card = self.agent_card.unwrap_or_else(|| {
            AgentCardBuilder::new("agentwire agent", "An agentwire-compatible agent", "").build()
        });

        let mut router = a2a_router(request_handler, card);

        if self.cors_enabled {
            use tower_http::cors::CorsLayer;
            router = router.layer(CorsLayer::permissive());
        }

        router
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_card_builder_basic() {
        let card = AgentCardBuilder::new("Test Agent", "A test", "http://localhost:8080").build();
        assert_eq!(card.name, "Test Agent");
        assert_eq!(card.description, "A test");
        assert_eq!(card.url, "http://localhost:8080");
    }

    #[test]
    fn agent_card_builder_with_skills() {
        let card = AgentCardBuilder::new("Test", "Test", "http://localhost")
            .with_skill("chat", "Chat", "Chat skill", vec!["conversation".to_string()])
            .with_skill("code", "Code", "Code generation", vec!["coding".to_string()])
            .build();

        assert_eq!(card.skills.len(), 2);
        assert_eq!(card.skills[0].id, "chat");
        assert_eq!(card.skills[1].id, "code");
    }

    #[test]
    fn agent_card_builder_with_capabilities() {
        let card = AgentCardBuilder::new("Test", "Test", "http://localhost")
            .with_streaming(true)
            .with_push_notifications(false)
            .build();

        assert!(card.has_capability(CAPABILITY_STREAMING));
        assert!(!card.has_capability(CAPABILITY_PUSH_NOTIFICATIONS));
    }

    #[cfg(feature = "client")]
    #[test]
    fn client_builder_basic() {
        let builder = ClientBuilder::new("http://localhost:8080")
            .with_timeout(std::time::Duration::from_secs(30))
            .with_bearer_token("test-token");

        assert_eq!(builder.url, "http://localhost:8080");
        assert_eq!(builder.timeout, Some(std::time::Duration::from_secs(30)));
        assert_eq!(
            builder.headers.get("Authorization"),
            Some(&"Bearer test-token".to_string())
        );
    }
}
