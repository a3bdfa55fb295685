//! Picks the best agent in a network for a given query (§4.6).
//!
//! Primary path: an opaque advisor callable (e.g. an LLM call) names an
//! agent. Fallback path: Jaccard similarity over lowercased, whitespace-
//! tokenized word sets of the query against each agent's description and
//! skill metadata.

use std::collections::HashSet;

use crate::network::AgentNetwork;

/// An agent name plus the confidence the router assigns it, in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    pub agent_name: String,
    pub confidence: f64,
}

/// Candidate text used to score a query against an agent, gathered from its
/// description and skill tags/examples.
struct AgentProfile {
    name: String,
    text: String,
}

/// An advisor is any callable that takes an assembled prompt and returns
/// its raw answer text. Errors fall through to keyword scoring.
pub trait Advisor: Send + Sync {
    fn ask(&self, prompt: &str) -> Result<String, String>;
}

impl<F> Advisor for F
where
    F: Fn(&str) -> Result<String, String> + Send + Sync,
{
    fn ask(&self, prompt: &str) -> Result<String, String> {
        self(prompt)
    }
}

/// Routes queries to the best-matching agent in a network.
pub struct Router<'a> {
    network: &'a AgentNetwork,
    advisor: Option<Box<dyn Advisor>>,
}

impl<'a> Router<'a> {
    pub fn new(network: &'a AgentNetwork) -> Self {
        Self {
            network,
            advisor: None,
        }
    }

    pub fn with_advisor(mut self, advisor: impl Advisor + 'static) -> Self {
        self.advisor = Some(Box::new(advisor));
        self
    }

    /// Selects the best agent for `query`. Never errors: an unroutable
    /// query (e.g. an empty network) yields `{agent_name: "", confidence:
    /// 0.0}` instead.
    pub async fn route(&self, query: &str) -> RouteResult {
        let profiles = self.profiles().await;
        if profiles.is_empty() {
            return RouteResult {
                agent_name: String::new(),
                confidence: 0.0,
            };
        }

        if let Some(advisor) = &self.advisor {
            let prompt = build_prompt(&profiles, query);
            if let Ok(reply) = advisor.ask(&prompt) {
                if let Some(result) = match_advisor_reply(&profiles, &reply) {
                    return result;
                }
            }
        }

        keyword_fallback(&profiles, query)
    }

    async fn profiles(&self) -> Vec<AgentProfile> {
        self.network
            .route_profiles()
            .await
            .into_iter()
            .map(|(name, text)| AgentProfile { name, text })
            .collect()
    }
}

fn build_prompt(profiles: &[AgentProfile], query: &str) -> String {
    let mut prompt = String::from("Choose the best agent for this query.\n\nAgents:\n");
    for profile in profiles {
        prompt.push_str(&format!("- {}: {}\n", profile.name, profile.text));
    }
    prompt.push_str(&format!("\nQuery: {query}\n\nRespond with only the agent name."));
    prompt
}

/// Finds an exact, case-insensitive, trimmed match of an agent name inside
/// the advisor's reply. If multiple names are mentioned, the first one to
/// appear wins.
fn match_advisor_reply(profiles: &[AgentProfile], reply: &str) -> Option<RouteResult> {
    let lower_reply = reply.to_lowercase();
    let mut best: Option<(usize, &str)> = None;

    for profile in profiles {
        let needle = profile.name.to_lowercase();
        if let Some(pos) = lower_reply.find(&needle) {
            if best.map(|(p, _)| pos < p).unwrap_or(true) {
                best = Some((pos, &profile.name));
            }
        }
    }

    best.map(|(_, name)| RouteResult {
        agent_name: name.to_string(),
        confidence: 1.0,
    })
}

fn keyword_fallback(profiles: &[AgentProfile], query: &str) -> RouteResult {
    let query_tokens = tokenize(query);

    let mut best = RouteResult {
        agent_name: profiles[0].name.clone(),
        confidence: 0.0,
    };

    for profile in profiles {
        let profile_tokens = tokenize(&profile.text);
        let score = jaccard_similarity(&query_tokens, &profile_tokens);
        if score > best.confidence {
            best = RouteResult {
                agent_name: profile.name.clone(),
                confidence: score,
            };
        }
    }

    best
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// `|intersection| / |union|` over two token sets; `1.0` when both sets are
/// empty (nothing to disagree on), `0.0` when only one is.
fn jaccard_similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}
