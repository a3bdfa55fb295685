//! `A2AClient` exercised against a real, locally spawned server.

mod common;

use std::sync::Arc;

use agentwire::client::A2AClient;
use common::{start_test_server, EchoAgent, FailingAgent};

#[tokio::test]
async fn connect_resolves_the_agent_card() {
    let (base_url, _handle) = start_test_server(Arc::new(EchoAgent)).await;

    let client = A2AClient::connect_url(&base_url).await.unwrap();
    let card = client.agent_card().expect("card should resolve");
    assert_eq!(card.name, "Test Agent");
}

#[tokio::test]
async fn ask_returns_the_handler_artifact_text() {
    let (base_url, _handle) = start_test_server(Arc::new(EchoAgent)).await;

    let client = A2AClient::connect_url(&base_url).await.unwrap();
    let reply = client.ask("hello there").await.unwrap();
    assert!(reply.contains("hello there"));
}

#[tokio::test]
async fn send_text_returns_a_completed_task() {
    let (base_url, _handle) = start_test_server(Arc::new(EchoAgent)).await;

    let client = A2AClient::connect_url(&base_url).await.unwrap();
    let task = client.send_text("ping").await.unwrap();
    assert_eq!(task.status.state, agentwire::types::TaskState::Completed);
    assert!(task.first_artifact_text().unwrap().contains("ping"));
}

#[tokio::test]
async fn stream_text_yields_a_terminal_chunk() {
    let (base_url, _handle) = start_test_server(Arc::new(EchoAgent)).await;

    let client = A2AClient::connect_url(&base_url).await.unwrap();
    let mut stream = client.stream_text("stream please").await.unwrap();

    let mut saw_complete = false;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.unwrap();
        if chunk.kind == agentwire::client::ChunkKind::Complete {
            saw_complete = true;
            assert!(chunk
                .task
                .first_artifact_text()
                .unwrap()
                .contains("stream please"));
        }
    }
    assert!(saw_complete);
}

#[tokio::test]
async fn stream_text_surfaces_a_failed_handler_as_an_error_chunk() {
    let (base_url, _handle) = start_test_server(Arc::new(FailingAgent)).await;

    let client = A2AClient::connect_url(&base_url).await.unwrap();
    let mut stream = client.stream_text("boom").await.unwrap();

    let result = stream.next().await.expect("stream should yield a chunk");
    let err = result.expect_err("failed task should surface as an error chunk");
    assert!(err.to_string().contains("simulated handler failure"));
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn connecting_to_a_dead_host_falls_back_to_no_card() {
    let client = A2AClient::connect_url("http://127.0.0.1:1").await.unwrap();
    assert!(client.agent_card().is_none());
}
