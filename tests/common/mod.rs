//! Shared test utilities for integration tests.

use std::sync::Arc;

use agentwire::builders::AgentCardBuilder;
use agentwire::error::A2AResult;
use agentwire::server::{
    a2a_router, DefaultRequestHandler, HandlerContext, InMemoryTaskStore, TaskHandler, TaskStore,
};
use agentwire::types::{AgentCard, Artifact, Task};
use async_trait::async_trait;

/// Echoes the text of the task's last message back as an artifact.
pub struct EchoAgent;

#[async_trait]
impl TaskHandler for EchoAgent {
    async fn handle(&self, mut task: Task, _cx: &HandlerContext) -> A2AResult<Task> {
        let text = task
            .history
            .last()
            .and_then(|m| m.text())
            .unwrap_or_default()
            .to_string();
        task.artifacts
            .push(Artifact::text(format!("Echo: {text}"), Some(0)));
        Ok(task)
    }
}

/// Always fails — used to verify error propagation into a `Failed` task.
pub struct FailingAgent;

#[async_trait]
impl TaskHandler for FailingAgent {
    async fn handle(&self, _task: Task, _cx: &HandlerContext) -> A2AResult<Task> {
        Err(agentwire::error::A2AError::response("simulated handler failure"))
    }
}

pub fn test_agent_card(url: &str) -> AgentCard {
    AgentCardBuilder::new("Test Agent", "An agent used in integration tests", url)
        .with_streaming(true)
        .build()
}

/// Starts a test server on a random port with an in-memory task store.
pub async fn start_test_server(
    handler: Arc<dyn TaskHandler>,
) -> (String, tokio::task::JoinHandle<()>) {
    start_test_server_with_store(handler, Arc::new(InMemoryTaskStore::new())).await
}

pub async fn start_test_server_with_store(
    handler: Arc<dyn TaskHandler>,
    store: Arc<dyn TaskStore>,
) -> (String, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");

    let request_handler = Arc::new(DefaultRequestHandler::new(handler, store));
    let agent_card = test_agent_card(&base_url);
    let app = a2a_router(request_handler, agent_card);

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    (base_url, handle)
}
