//! Wire types for the agent-to-agent JSON-RPC protocol: messages, tasks,
//! artifacts, agent cards and the JSON-RPC envelope itself.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::A2AError;

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 envelope
// ---------------------------------------------------------------------------

/// A JSON-RPC request id: a number, a string, or absent (notification).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcId {
    Number(i64),
    String(String),
    Null,
}

/// `{jsonrpc, id, method, params}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonRpcId>,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(method: impl Into<String>, params: Option<Value>, id: Option<JsonRpcId>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

/// `{code, message, data?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// `{jsonrpc, id, result|error}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<JsonRpcId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<JsonRpcId>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn from_error(id: Option<JsonRpcId>, error: A2AError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
    System,
}

impl std::str::FromStr for Role {
    type Err = A2AError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "agent" => Ok(Role::Agent),
            "system" => Ok(Role::System),
            other => Err(A2AError::validation(format!("unrecognized role: {other}"))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::User => "user",
            Role::Agent => "agent",
            Role::System => "system",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// A single named/typed function-call argument. `value` round-trips any JSON
/// scalar, array or object verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionParameter {
    pub name: String,
    pub value: Value,
}

/// The payload carried by a [`Message`]. Tagged union, discriminator `type`.
///
/// Unknown `type` discriminators decode into [`Content::Unknown`] rather than
/// failing, so an unaware hop can still round-trip the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    Text {
        text: String,
    },
    FunctionCall {
        name: String,
        parameters: Vec<FunctionParameter>,
    },
    FunctionResponse {
        name: String,
        response: Value,
    },
    Error {
        message: String,
    },
    /// Opaque carrier for a discriminator this build doesn't recognize.
    #[serde(untagged)]
    Unknown(Value),
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    /// Returns the text payload, if this content is (or carries) plain text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text { text } => Some(text),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Part — retained for Artifact content (distinct from Message's Content)
// ---------------------------------------------------------------------------

/// An artifact content unit. Kept as a tagged union (discriminator `kind`)
/// distinct from [`Content`]: artifacts accumulate incrementally over many
/// parts, while a `Message` carries exactly one `Content` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Part {
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<Value>,
    },
    Data {
        data: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<Value>,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text {
            text: text.into(),
            metadata: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: String,
    pub role: Role,
    pub content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Message {
    pub fn new(role: Role, content: Content) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            role,
            content,
            parent_message_id: None,
            conversation_id: None,
            metadata: None,
        }
    }

    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(Role::User, Content::text(text))
    }

    pub fn agent_text(text: impl Into<String>) -> Self {
        Self::new(Role::Agent, Content::text(text))
    }

    pub fn with_conversation_id(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }

    pub fn with_parent(mut self, id: impl Into<String>) -> Self {
        self.parent_message_id = Some(id.into());
        self
    }

    /// Text content of this message, if it carries any.
    pub fn text(&self) -> Option<&str> {
        self.content.as_text()
    }
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub conversation_id: String,
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            messages: Vec::new(),
        }
    }

    /// Appends a message, stamping its `conversation_id` to match.
    pub fn push(&mut self, mut message: Message) {
        message.conversation_id = Some(self.conversation_id.clone());
        self.messages.push(message);
    }

    /// Validates the invariants from DATA MODEL §Conversation: every message's
    /// `conversation_id` (if set) matches, and `parent_message_id` (if set)
    /// references an earlier message in the sequence.
    pub fn validate(&self) -> Result<(), A2AError> {
        let mut seen = std::collections::HashSet::new();
        for message in &self.messages {
            if let Some(ref cid) = message.conversation_id {
                if cid != &self.conversation_id {
                    return Err(A2AError::validation(format!(
                        "message {} has conversation_id {cid} but belongs to conversation {}",
                        message.message_id, self.conversation_id
                    )));
                }
            }
            if let Some(ref parent) = message.parent_message_id {
                if !seen.contains(parent) {
                    return Err(A2AError::validation(format!(
                        "message {} references parent {parent} which has not occurred yet",
                        message.message_id
                    )));
                }
            }
            seen.insert(message.message_id.clone());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Task / TaskStatus / TaskState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Submitted,
    Waiting,
    InputRequired,
    Completed,
    Canceled,
    Failed,
    Unknown,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Canceled | TaskState::Failed
        )
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskState::Submitted => "submitted",
            TaskState::Waiting => "waiting",
            TaskState::InputRequired => "input_required",
            TaskState::Completed => "completed",
            TaskState::Canceled => "canceled",
            TaskState::Failed => "failed",
            TaskState::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: TaskState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl TaskStatus {
    pub fn new(state: TaskState) -> Self {
        Self {
            state,
            message: None,
            timestamp: Some(Utc::now()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default)]
    pub history: Vec<Message>,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Task {
    /// Builds a freshly submitted task from an initial message.
    pub fn submitted(message: Message) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: None,
            status: TaskStatus::new(TaskState::Submitted),
            message: Some(message.clone()),
            history: vec![message],
            artifacts: Vec::new(),
            metadata: None,
        }
    }

    /// The first artifact's concatenated text parts, if any.
    pub fn first_artifact_text(&self) -> Option<String> {
        self.artifacts.first().map(|artifact| {
            artifact
                .parts
                .iter()
                .filter_map(|part| match part {
                    Part::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("")
        })
    }
}

// ---------------------------------------------------------------------------
// Artifact
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub append: Option<bool>,
    #[serde(rename = "lastUpdate", skip_serializing_if = "Option::is_none")]
    pub last_update: Option<bool>,
}

impl Artifact {
    pub fn text(text: impl Into<String>, index: Option<u32>) -> Self {
        Self {
            parts: vec![Part::text(text)],
            index,
            append: None,
            last_update: None,
        }
    }
}

// ---------------------------------------------------------------------------
// TaskSnapshot — one frame of a streaming HandleStream response
// ---------------------------------------------------------------------------

/// One frame in a `HandleStream` response: the task as it stood at this
/// point. `last_update` marks the terminal frame (§4.3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub task: Task,
    pub last_update: bool,
}

impl TaskSnapshot {
    pub fn intermediate(task: Task) -> Self {
        Self {
            task,
            last_update: false,
        }
    }

    pub fn terminal(task: Task) -> Self {
        Self {
            task,
            last_update: true,
        }
    }
}

// ---------------------------------------------------------------------------
// AgentCard / AgentSkill
// ---------------------------------------------------------------------------

pub const CAPABILITY_STREAMING: &str = "streaming";
pub const CAPABILITY_PUSH_NOTIFICATIONS: &str = "pushNotifications";
pub const CAPABILITY_STATE_TRANSITION_HISTORY: &str = "stateTransitionHistory";
pub const CAPABILITY_GOOGLE_A2A_COMPATIBLE: &str = "google_a2a_compatible";
pub const CAPABILITY_PARTS_ARRAY_FORMAT: &str = "parts_array_format";
pub const CAPABILITY_AGENT_DISCOVERY: &str = "agent_discovery";
pub const CAPABILITY_REGISTRY: &str = "registry";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_modes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_modes: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentCard {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    #[serde(default)]
    pub capabilities: HashMap<String, bool>,
    #[serde(default)]
    pub default_input_modes: Vec<String>,
    #[serde(default)]
    pub default_output_modes: Vec<String>,
    #[serde(default)]
    pub skills: Vec<AgentSkill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Value>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

impl AgentCard {
    pub fn has_capability(&self, key: &str) -> bool {
        self.capabilities.get(key).copied().unwrap_or(false)
    }

    pub fn supports_streaming(&self) -> bool {
        self.has_capability(CAPABILITY_STREAMING)
    }

    /// Whether this card's peer expects the legacy `parts`-array wire shape
    /// for message content (see DATA MODEL §Content / open question (a)).
    pub fn prefers_parts_array(&self) -> bool {
        self.has_capability(CAPABILITY_PARTS_ARRAY_FORMAT)
            || self.has_capability(CAPABILITY_GOOGLE_A2A_COMPATIBLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_decodes_case_insensitively() {
        assert_eq!("USER".parse::<Role>().unwrap(), Role::User);
        assert_eq!("Agent".parse::<Role>().unwrap(), Role::Agent);
        assert!("nonsense".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }

    #[test]
    fn content_text_round_trips() {
        let content = Content::text("hello");
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"], "hello");
        let back: Content = serde_json::from_value(json).unwrap();
        assert_eq!(back, content);
    }

    #[test]
    fn function_parameter_round_trips_arbitrary_json() {
        let param = FunctionParameter {
            name: "args".to_string(),
            value: serde_json::json!({"a": [1, 2, 3], "b": null}),
        };
        let json = serde_json::to_value(&param).unwrap();
        let back: FunctionParameter = serde_json::from_value(json).unwrap();
        assert_eq!(back, param);
    }

    #[test]
    fn unknown_content_type_preserved() {
        let raw = serde_json::json!({"type": "something_new", "payload": 42});
        let content: Content = serde_json::from_value(raw.clone()).unwrap();
        match content {
            Content::Unknown(v) => assert_eq!(v, raw),
            _ => panic!("expected Unknown"),
        }
    }

    #[test]
    fn task_state_terminal_set() {
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Canceled.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(!TaskState::Submitted.is_terminal());
        assert!(!TaskState::Waiting.is_terminal());
        assert!(!TaskState::InputRequired.is_terminal());
        assert!(!TaskState::Unknown.is_terminal());
    }

    #[test]
    fn conversation_rejects_mismatched_id() {
        let mut convo = Conversation::new("c-1");
        let mut msg = Message::user_text("hi");
        msg.conversation_id = Some("c-2".to_string());
        convo.messages.push(msg);
        assert!(convo.validate().is_err());
    }

    #[test]
    fn conversation_rejects_forward_reference() {
        let mut convo = Conversation::new("c-1");
        let mut msg = Message::user_text("hi");
        msg.parent_message_id = Some("does-not-exist".to_string());
        convo.push(msg);
        assert!(convo.validate().is_err());
    }

    #[test]
    fn conversation_accepts_valid_chain() {
        let mut convo = Conversation::new("c-1");
        let first = Message::user_text("hi");
        let first_id = first.message_id.clone();
        convo.push(first);
        let reply = Message::agent_text("hello").with_parent(first_id);
        convo.push(reply);
        assert!(convo.validate().is_ok());
    }

    #[test]
    fn agent_card_capability_lookup() {
        let mut capabilities = HashMap::new();
        capabilities.insert(CAPABILITY_PARTS_ARRAY_FORMAT.to_string(), true);
        let card = AgentCard {
            name: "test".to_string(),
            description: String::new(),
            url: "http://localhost".to_string(),
            version: "1.0.0".to_string(),
            provider: None,
            documentation_url: None,
            capabilities,
            default_input_modes: vec![],
            default_output_modes: vec![],
            skills: vec![],
            authentication: None,
        };
        assert!(card.prefers_parts_array());
        assert!(!card.supports_streaming());
    }

    #[test]
    fn task_first_artifact_text_concatenates_parts() {
        let mut task = Task::submitted(Message::user_text("hi"));
        task.artifacts.push(Artifact {
            parts: vec![Part::text("Hello, "), Part::text("world!")],
            index: Some(0),
            append: None,
            last_update: Some(true),
        });
        assert_eq!(task.first_artifact_text().unwrap(), "Hello, world!");
    }
}
