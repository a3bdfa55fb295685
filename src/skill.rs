//! Declarative agent/skill metadata registration (§4.9).
//!
//! Rust has no runtime decorator or introspection mechanism, so where the
//! reference implementation attaches `@agent`/`@skill` decorators to handler
//! methods, this crate instead accumulates `(method, metadata)` pairs on a
//! builder at construction time. Purely declarative: it has no effect on
//! dispatch, only on the [`AgentCard`] the builder assembles.

use std::collections::HashMap;

use crate::types::{AgentCard, AgentSkill};

/// Metadata for one handler method, registered via [`SkillRegistry::skill`].
#[derive(Debug, Clone, Default)]
pub struct SkillMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub examples: Vec<String>,
}

impl SkillMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_examples(mut self, examples: Vec<String>) -> Self {
        self.examples = examples;
        self
    }
}

/// Agent-level identity, registered via [`SkillRegistry::agent`].
#[derive(Debug, Clone)]
pub struct AgentMetadata {
    pub name: String,
    pub description: String,
    pub version: String,
    pub url: String,
    pub capabilities: HashMap<String, bool>,
}

impl AgentMetadata {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            version: version.into(),
            url: url.into(),
            capabilities: HashMap::new(),
        }
    }

    pub fn with_capability(mut self, key: impl Into<String>, enabled: bool) -> Self {
        self.capabilities.insert(key.into(), enabled);
        self
    }
}

/// Accumulates `(method, SkillMetadata)` registrations plus one
/// [`AgentMetadata`] declaration, and assembles an [`AgentCard`] from them.
///
/// ```
/// use agentwire::skill::{AgentMetadata, SkillMetadata, SkillRegistry};
///
/// let card = SkillRegistry::new()
///     .agent(AgentMetadata::new("Weather Agent", "Forecasts", "1.0.0", "http://localhost:8080"))
///     .skill(
///         "get_forecast",
///         SkillMetadata::new()
///             .with_name("Forecast")
///             .with_description("Returns a weather forecast")
///             .with_tags(vec!["weather".to_string()]),
///     )
///     .build();
///
/// assert_eq!(card.name, "Weather Agent");
/// assert_eq!(card.skills.len(), 1);
/// assert_eq!(card.skills[0].id, "get_forecast");
/// ```
#[derive(Default)]
pub struct SkillRegistry {
    agent: Option<AgentMetadata>,
    skills: Vec<(String, SkillMetadata)>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agent(mut self, metadata: AgentMetadata) -> Self {
        self.agent = Some(metadata);
        self
    }

    pub fn skill(mut self, method: impl Into<String>, metadata: SkillMetadata) -> Self {
        self.skills.push((method.into(), metadata));
        self
    }

    /// Assembles the [`AgentCard`] from the accumulated registrations.
    /// Without a prior `.agent(...)` call, the card carries empty
    /// name/description/url placeholders — callers are expected to always
    /// register an agent before building in practice.
    pub fn build(self) -> AgentCard {
        let agent = self.agent.unwrap_or_else(|| AgentMetadata::new("", "", "0.1.0", ""));

        let skills = self
            .skills
            .into_iter()
            .map(|(method, metadata)| AgentSkill {
                id: method.clone(),
                name: metadata.name.unwrap_or(method),
                description: metadata.description.unwrap_or_default(),
                tags: metadata.tags,
                examples: metadata.examples,
                input_modes: None,
                output_modes: None,
            })
            .collect();

        AgentCard {
            name: agent.name,
            description: agent.description,
            url: agent.url,
            version: agent.version,
            provider: None,
            documentation_url: None,
            capabilities: agent.capabilities,
            default_input_modes: vec!["text/plain".to_string()],
            default_output_modes: vec!["text/plain".to_string()],
            skills,
            authentication: None,
        }
    }
}
