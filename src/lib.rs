//! # agentwire — a runtime for the agent-to-agent JSON-RPC wire protocol
//!
//! Agents exchange JSON-RPC 2.0 envelopes over HTTP, with Server-Sent
//! Events for streaming task progress. This crate provides:
//!
//! - Wire types matching the protocol's data model ([`types`])
//! - A server framework built on axum ([`server`])
//! - An HTTP client ([`client`])
//! - Ergonomic builders for cards, clients, and servers ([`builders`])
//! - An agent network, content-based router, and small workflow engine for
//!   composing multiple agents ([`network`], [`router`], [`workflow`])
//! - A discovery registry agents can register with and query ([`discovery`])
//! - Declarative skill/agent metadata registration ([`skill`])
//!
//! ## Feature flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `client` | yes     | HTTP client (reqwest + SSE) |
//! | `server` | yes     | Server traits + axum integration |
//! | `full`   | no      | Enable all features |
//!
//! ## Quick start: client
//!
//! ```no_run
//! use agentwire::client::A2AClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = A2AClient::connect_url("http://localhost:7420").await?;
//!     let reply = client.ask("Write a haiku about Rust").await?;
//!     println!("{reply}");
//!
//!     let mut stream = client.stream_text("Tell me a story").await?;
//!     while let Some(chunk) = stream.next().await {
//!         println!("{:?}", chunk?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Quick start: server
//!
//! Implement [`server::TaskHandler`] to define your agent's behavior:
//!
//! ```rust,ignore
//! use agentwire::server::{TaskHandler, HandlerContext};
//! use agentwire::types::{Task, Artifact};
//! use agentwire::error::A2AResult;
//! use async_trait::async_trait;
//!
//! struct EchoAgent;
//!
//! #[async_trait]
//! impl TaskHandler for EchoAgent {
//!     async fn handle(&self, mut task: Task, _cx: &HandlerContext) -> A2AResult<Task> {
//!         let text = task.message.as_ref().and_then(|m| m.text()).unwrap_or_default();
//!         task.artifacts.push(Artifact::text(format!("Echo: {text}"), Some(0)));
//!         Ok(task)
//!     }
//! }
//! ```
//!
//! Then set up the HTTP server:
//!
//! ```rust,ignore
//! use agentwire::server::{a2a_router, DefaultRequestHandler, InMemoryTaskStore};
//! use agentwire::AgentCardBuilder;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let agent_card = AgentCardBuilder::new("Echo Agent", "Echoes your messages", "http://localhost:3000")
//!         .with_streaming(true)
//!         .build();
//!
//!     let store = Arc::new(InMemoryTaskStore::new());
//!     let handler = Arc::new(DefaultRequestHandler::new(Arc::new(EchoAgent), store));
//!     let app = a2a_router(handler, agent_card);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! The server exposes every route at both its plain path and under `/a2a`
//! (`GET /agent.json`, `POST /`, `POST /tasks/send`, `POST /tasks/stream`).

pub mod builders;
pub mod discovery;
pub mod error;
pub mod network;
pub mod router;
pub mod skill;
pub mod types;
pub mod utils;
pub mod workflow;

#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "server")]
pub mod server;

/// Re-exports the commonly used types and traits.
///
/// ```
/// use agentwire::prelude::*;
/// ```
pub mod prelude {
    pub use crate::types::{
        AgentCard, AgentSkill, Artifact, Content, Message, Part, Role, Task, TaskSnapshot,
        TaskState, TaskStatus,
    };

    pub use crate::error::{A2AError, A2AResult};

    pub use crate::builders::AgentCardBuilder;
    pub use crate::network::AgentNetwork;
    pub use crate::router::Router;
    pub use crate::skill::SkillRegistry;
    pub use crate::workflow::Flow;

    #[cfg(feature = "client")]
    pub use crate::builders::ClientBuilder;

    #[cfg(feature = "client")]
    pub use crate::client::A2AClient;

    #[cfg(feature = "server")]
    pub use crate::builders::ServerBuilder;

    #[cfg(feature = "server")]
    pub use crate::server::{
        a2a_router, DefaultRequestHandler, EventQueue, HandlerContext, InMemoryTaskStore,
        RequestHandler, TaskHandler, TaskManager, TaskStore, TaskUpdater,
    };
}

// Re-export core types at crate root for convenience.
pub use builders::AgentCardBuilder;
pub use error::{A2AError, A2AResult};
pub use types::*;

#[cfg(feature = "client")]
pub use builders::ClientBuilder;

#[cfg(feature = "server")]
pub use builders::ServerBuilder;
