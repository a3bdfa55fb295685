//! High-level client for talking to a remote agent's routes.

use serde_json::json;

use crate::error::{A2AError, A2AResult};
use crate::types::{AgentCard, Message, Task};
use crate::utils::constants::{DISPATCH_PATH, TASKS_SEND_PATH, TASKS_STREAM_PATH};

use super::card_resolver::CardResolver;
use super::sse::SseStream;
use super::transport::HttpTransport;

/// Client for interacting with an agent over its HTTP routes (§4.4).
///
/// # Construction
///
/// ```no_run
/// use agentwire::client::A2AClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Resolves the agent card automatically, falling back to "no card" mode
/// // if the probe fails:
/// let client = A2AClient::connect_url("http://localhost:7420").await?;
///
/// let reply = client.ask("Hello, agent!").await?;
/// println!("{reply}");
/// # Ok(())
/// # }
/// ```
pub struct A2AClient {
    transport: HttpTransport,
    agent_card: Option<AgentCard>,
}

impl std::fmt::Debug for A2AClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("A2AClient")
            .field("base_url", &self.transport.base_url())
            .field("agent_card", &self.agent_card.as_ref().map(|c| &c.name))
            .finish()
    }
}

impl A2AClient {
    /// Builds a client with no agent card — requests are still sent, the
    /// card is simply unknown.
    pub fn new(transport: HttpTransport) -> Self {
        Self {
            transport,
            agent_card: None,
        }
    }

    /// Builds a client, probing for an agent card (§6). A probe failure is
    /// not fatal — the client falls back to "no card" mode rather than
    /// erroring, since the card is informational, not required to talk to
    /// the wire routes.
    pub async fn connect(transport: HttpTransport) -> A2AResult<Self> {
        let resolver = CardResolver::new();
        let agent_card = match resolver.resolve(transport.base_url()).await {
            Ok(card) => Some(card),
            Err(e) => {
                tracing::warn!(error = %e, "no agent card available, continuing without one");
                None
            }
        };
        Ok(Self {
            transport,
            agent_card,
        })
    }

    /// Convenience constructor: builds a transport from a base URL and
    /// connects.
    pub async fn connect_url(base_url: impl Into<String>) -> A2AResult<Self> {
        Self::connect(HttpTransport::new(base_url)).await
    }

    pub fn agent_card(&self) -> Option<&AgentCard> {
        self.agent_card.as_ref()
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Sends `text` as a user message and returns the agent's reply text.
    ///
    /// Prefers the agent's own reply message text; falls back to the first
    /// artifact if the agent only returns a task.
    pub async fn ask(&self, text: impl Into<String>) -> A2AResult<String> {
        let message = self.send_message(Message::user_text(text)).await?;
        message
            .text()
            .map(str::to_string)
            .ok_or_else(|| A2AError::response("agent reply carried no text content"))
    }

    /// Sends a message with no task id — message-only dispatch.
    pub async fn send_message(&self, message: Message) -> A2AResult<Message> {
        let body = json!({ "message": message });
        let value = self.transport.post_json(DISPATCH_PATH, &body).await?;
        serde_json::from_value(value)
            .map_err(|e| A2AError::response(format!("invalid message response: {e}")))
    }

    /// Submits a task, optionally continuing an existing one by id.
    pub async fn send_task(
        &self,
        task_id: Option<String>,
        session_id: Option<String>,
        message: Message,
    ) -> A2AResult<Task> {
        let body = send_task_body(&task_id, &session_id, &message);
        let value = self.transport.post_json(TASKS_SEND_PATH, &body).await?;
        serde_json::from_value(value)
            .map_err(|e| A2AError::response(format!("invalid task response: {e}")))
    }

    /// Convenience wrapper: starts a fresh task from plain text.
    pub async fn send_text(&self, text: impl Into<String>) -> A2AResult<Task> {
        self.send_task(None, None, Message::user_text(text)).await
    }

    /// Opens an SSE stream of task snapshots (§4.2).
    pub async fn stream(
        &self,
        task_id: Option<String>,
        session_id: Option<String>,
        message: Message,
    ) -> A2AResult<SseStream> {
        let body = send_task_body(&task_id, &session_id, &message);
        let response = self.transport.post_stream(TASKS_STREAM_PATH, &body).await?;
        Ok(SseStream::from_response(response))
    }

    /// Convenience wrapper: streams a fresh task from plain text.
    pub async fn stream_text(&self, text: impl Into<String>) -> A2AResult<SseStream> {
        self.stream(None, None, Message::user_text(text)).await
    }
}

fn send_task_body(
    task_id: &Option<String>,
    session_id: &Option<String>,
    message: &Message,
) -> serde_json::Value {
    let mut body = json!({ "message": message });
    let obj = body.as_object_mut().unwrap();
    if let Some(id) = task_id {
        obj.insert("id".to_string(), json!(id));
    }
    if let Some(sid) = session_id {
        obj.insert("sessionId".to_string(), json!(sid));
    }
    body
}
