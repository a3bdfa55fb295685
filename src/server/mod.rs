//! Server-side building blocks for hosting an agent: the [`TaskHandler`]
//! seam an agent author implements, task persistence, event delivery, and
//! the axum routes that expose them over HTTP.
//!
//! - [`TaskHandler`] trait + [`HandlerContext`] — implement your agent logic
//! - [`TaskStore`] trait + [`InMemoryTaskStore`] — task persistence
//! - [`TaskManager`] — resolves incoming requests to the task they continue
//! - [`TaskUpdater`] — ergonomic incremental status/artifact builder
//! - [`EventQueue`] — broadcast channel for streaming snapshots
//! - [`QueueManager`] trait + [`InMemoryQueueManager`] — per-task queue management
//! - [`EventConsumer`] — consumes snapshots from a queue
//! - [`RequestHandler`] trait + [`DefaultRequestHandler`] — wires it all together
//! - [`a2a_router`] — ready-made axum routes
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use agentwire::server::*;
//! use agentwire::types::{Task, AgentCard};
//!
//! struct MyAgent;
//!
//! #[async_trait::async_trait]
//! impl TaskHandler for MyAgent {
//!     async fn handle(&self, mut task: Task, _cx: &HandlerContext) -> agentwire::A2AResult<Task> {
//!         task.artifacts.push(agentwire::types::Artifact::text("done", Some(0)));
//!         Ok(task)
//!     }
//! }
//!
//! let handler: Arc<dyn RequestHandler> = Arc::new(
//!     DefaultRequestHandler::new(Arc::new(MyAgent), Arc::new(InMemoryTaskStore::new()))
//! );
//! let app = a2a_router(handler, agent_card);
//! ```

pub mod agent_executor;
pub mod axum_integration;
pub mod event_queue;
pub mod request_handler;
pub mod task_manager;
pub mod task_store;
pub mod task_updater;

pub use agent_executor::{HandlerContext, TaskHandler};
pub use axum_integration::a2a_router;
pub use event_queue::{
    EventConsumer, EventQueue, InMemoryQueueManager, NoTaskQueue, QueueManager, TaskQueueExists,
};
pub use request_handler::{DefaultRequestHandler, RequestHandler, SendTaskParams};
pub use task_manager::TaskManager;
pub use task_store::{InMemoryTaskStore, TaskStore};
pub use task_updater::TaskUpdater;
