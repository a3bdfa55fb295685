//! Real HTTP round-trips against the route table: `GET /agent.json`,
//! `POST /`, `POST /tasks/send`, `POST /tasks/stream`, and their `/a2a`
//! mirrors.

mod common;

use std::sync::Arc;

use agentwire::types::{Message, Task, TaskState};
use common::{start_test_server, EchoAgent, FailingAgent};

#[tokio::test]
async fn agent_card_is_served_at_plain_and_prefixed_paths() {
    let (base_url, _handle) = start_test_server(Arc::new(EchoAgent)).await;
    let client = reqwest::Client::new();

    let plain = client
        .get(format!("{base_url}/agent.json"))
        .send()
        .await
        .unwrap();
    assert!(plain.status().is_success());

    let prefixed = client
        .get(format!("{base_url}/a2a/agent.json"))
        .send()
        .await
        .unwrap();
    assert!(prefixed.status().is_success());

    let card: serde_json::Value = plain.json().await.unwrap();
    assert_eq!(card["name"], "Test Agent");
}

#[tokio::test]
async fn dispatch_with_naked_task_body_returns_updated_task() {
    let (base_url, _handle) = start_test_server(Arc::new(EchoAgent)).await;
    let client = reqwest::Client::new();

    let body = serde_json::json!({ "id": "task-1", "message": Message::user_text("hi") });
    let response = client
        .post(format!("{base_url}/"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let task: Task = response.json().await.unwrap();
    assert_eq!(task.id, "task-1");
    assert_eq!(task.status.state, TaskState::Completed);
    assert_eq!(task.artifacts.len(), 1);
}

#[tokio::test]
async fn dispatch_with_message_only_body_replies_with_a_message() {
    let (base_url, _handle) = start_test_server(Arc::new(EchoAgent)).await;
    let client = reqwest::Client::new();

    let body = serde_json::json!({ "message": Message::user_text("hello") });
    let response = client
        .post(format!("{base_url}/"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let reply: Message = response.json().await.unwrap();
    assert!(reply.text().unwrap().contains("hello"));
}

#[tokio::test]
async fn tasks_send_returns_completed_task() {
    let (base_url, _handle) = start_test_server(Arc::new(EchoAgent)).await;
    let client = reqwest::Client::new();

    let body = serde_json::json!({ "message": Message::user_text("ping") });
    let response = client
        .post(format!("{base_url}/tasks/send"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let task: Task = response.json().await.unwrap();
    assert_eq!(task.status.state, TaskState::Completed);
    assert!(task.first_artifact_text().unwrap().contains("ping"));
}

#[tokio::test]
async fn tasks_send_via_jsonrpc_envelope() {
    let (base_url, _handle) = start_test_server(Arc::new(EchoAgent)).await;
    let client = reqwest::Client::new();

    let body = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tasks/send",
        "params": { "message": Message::user_text("via rpc") },
    });
    let response = client
        .post(format!("{base_url}/a2a/tasks/send"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let envelope: serde_json::Value = response.json().await.unwrap();
    assert!(envelope.get("error").is_none());
    assert!(envelope["result"]["artifacts"][0]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .contains("via rpc"));
}

#[tokio::test]
async fn unknown_jsonrpc_method_returns_method_not_found() {
    let (base_url, _handle) = start_test_server(Arc::new(EchoAgent)).await;
    let client = reqwest::Client::new();

    let body = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "tasks/nonsense",
        "params": {},
    });
    let response = client
        .post(format!("{base_url}/"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let envelope: serde_json::Value = response.json().await.unwrap();
    assert_eq!(envelope["error"]["code"], -32601);
}

#[tokio::test]
async fn failing_handler_still_yields_a_terminal_failed_task() {
    let (base_url, _handle) = start_test_server(Arc::new(FailingAgent)).await;
    let client = reqwest::Client::new();

    let body = serde_json::json!({ "message": Message::user_text("boom") });
    let response = client
        .post(format!("{base_url}/tasks/send"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let task: Task = response.json().await.unwrap();
    assert_eq!(task.status.state, TaskState::Failed);
    assert!(task.status.message.unwrap().text().unwrap().contains("simulated handler failure"));
}

#[tokio::test]
async fn tasks_stream_emits_sse_update_then_complete() {
    let (base_url, _handle) = start_test_server(Arc::new(EchoAgent)).await;
    let client = reqwest::Client::new();

    let body = serde_json::json!({ "message": Message::user_text("stream me") });
    let response = client
        .post(format!("{base_url}/tasks/stream"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/event-stream"
    );

    let text = response.text().await.unwrap();
    assert!(text.contains("event:complete") || text.contains("event: complete"));
}

#[tokio::test]
async fn tasks_stream_emits_error_terminator_for_a_failed_task() {
    let (base_url, _handle) = start_test_server(Arc::new(FailingAgent)).await;
    let client = reqwest::Client::new();

    let body = serde_json::json!({ "message": Message::user_text("boom") });
    let response = client
        .post(format!("{base_url}/tasks/stream"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let text = response.text().await.unwrap();
    assert!(text.contains("event:error") || text.contains("event: error"));
    assert!(!text.contains("event:complete") && !text.contains("event: complete"));
    assert!(text.contains("\"error\""));
}
