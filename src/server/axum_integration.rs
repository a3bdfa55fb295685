//! Axum integration — ready-made HTTP routes for hosting an agent.
//!
//! Every route is mounted twice: once at its plain path and once under
//! `/a2a`, so a caller can talk to either without needing to know which
//! mount a given deployment prefers (§6).
//!
//! | Route | Method | Description |
//! |-------|--------|-------------|
//! | `/agent.json`, `/a2a/agent.json` | GET | agent card |
//! | `/`, `/a2a` | POST | content-sniffed dispatch |
//! | `/tasks/send`, `/a2a/tasks/send` | POST | task submission |
//! | `/tasks/stream`, `/stream` (+ `/a2a` mirrors) | POST | SSE task stream |

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use futures::stream::{Stream, StreamExt};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::A2AError;
use crate::types::{
    AgentCard, JsonRpcId, JsonRpcRequest, JsonRpcResponse, Message, TaskSnapshot, TaskState,
};
use crate::utils::constants::{
    A2A_PREFIX, AGENT_CARD_PATH, DEFAULT_KEEPALIVE_SECS, DISPATCH_PATH,
    STREAM_PATH, TASKS_SEND_PATH, TASKS_STREAM_PATH,
};

use super::request_handler::{RequestHandler, SendTaskParams};

struct AppState {
    handler: Arc<dyn RequestHandler>,
    agent_card: AgentCard,
}

/// Builds the full route table, mounted both plainly and under `/a2a`.
pub fn a2a_router(handler: Arc<dyn RequestHandler>, agent_card: AgentCard) -> Router {
    let state = Arc::new(AppState {
        handler,
        agent_card,
    });

    let mounted = |prefix: &str| -> Router<Arc<AppState>> {
        Router::new()
            .route(&format!("{prefix}{AGENT_CARD_PATH}"), get(handle_agent_card))
            .route(&format!("{prefix}{DISPATCH_PATH}"), post(handle_dispatch))
            .route(
                &format!("{prefix}{TASKS_SEND_PATH}"),
                post(handle_tasks_send),
            )
            .route(
                &format!("{prefix}{TASKS_STREAM_PATH}"),
                post(handle_tasks_stream),
            )
            .route(&format!("{prefix}{STREAM_PATH}"), post(handle_tasks_stream))
    };

    Router::new()
        .merge(mounted(""))
        .merge(mounted(A2A_PREFIX))
        .with_state(state)
}

async fn handle_agent_card(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.agent_card.clone())
}

fn error_response(id: Option<JsonRpcId>, err: A2AError) -> Response {
    Json(JsonRpcResponse::from_error(id, err)).into_response()
}

fn parse_send_task_params(value: &Value) -> Result<SendTaskParams, A2AError> {
    let obj = value
        .as_object()
        .ok_or_else(|| A2AError::invalid_params("params must be an object"))?;

    let message: Message = obj
        .get("message")
        .cloned()
        .ok_or_else(|| A2AError::invalid_params("missing 'message' field"))
        .and_then(|v| {
            serde_json::from_value(v)
                .map_err(|e| A2AError::invalid_params(format!("invalid message: {e}")))
        })?;

    let task_id = obj.get("id").and_then(|v| v.as_str()).map(String::from);
    let session_id = obj
        .get("sessionId")
        .or_else(|| obj.get("session_id"))
        .and_then(|v| v.as_str())
        .map(String::from);

    Ok(SendTaskParams {
        task_id,
        session_id,
        message,
    })
}

/// `POST /` and `POST /a2a` — content-sniffed dispatch: a JSON-RPC envelope
/// routes by method; a naked `{id, message, ...}` body is a task submission;
/// a naked `{message}` body with no id is message-only dispatch; anything
/// else is treated as raw text and wrapped into a `user` message.
async fn handle_dispatch(State(state): State<Arc<AppState>>, body: String) -> Response {
    let value: Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(_) => {
            // Not JSON at all — synthesize a user message from the raw text.
            return respond_to_message(&state, Message::user_text(body)).await;
        }
    };

    if value.get("jsonrpc").is_some() {
        return dispatch_jsonrpc(state, value).await;
    }

    let has_id = value.get("id").is_some();
    let has_message = value.get("message").is_some();

    if has_id && has_message {
        let params = match parse_send_task_params(&value) {
            Ok(p) => p,
            Err(e) => return error_response(None, e),
        };
        return match state.handler.on_task_send(params).await {
            Ok(task) => Json(task).into_response(),
            Err(e) => error_response(None, e),
        };
    }

    if has_message {
        let message: Message = match value
            .get("message")
            .cloned()
            .map(serde_json::from_value)
            .unwrap()
        {
            Ok(m) => m,
            Err(e) => {
                return error_response(
                    None,
                    A2AError::invalid_params(format!("invalid message: {e}")),
                )
            }
        };
        return respond_to_message(&state, message).await;
    }

    // Neither a JSON-RPC envelope nor a recognized task/message shape —
    // fall back to treating the whole body as raw text.
    respond_to_message(&state, Message::user_text(body)).await
}

async fn respond_to_message(state: &Arc<AppState>, message: Message) -> Response {
    match state.handler.on_message(message).await {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => error_response(None, e),
    }
}

async fn dispatch_jsonrpc(state: Arc<AppState>, value: Value) -> Response {
    let request: JsonRpcRequest = match serde_json::from_value(value) {
        Ok(r) => r,
        Err(e) => {
            return error_response(None, A2AError::parse_error(e.to_string()));
        }
    };

    if request.jsonrpc != "2.0" {
        return error_response(
            request.id,
            A2AError::invalid_request("jsonrpc version must be \"2.0\""),
        );
    }

    debug!(method = %request.method, "JSON-RPC request received");

    match request.method.as_str() {
        "tasks/send" => {
            let params = match request
                .params
                .ok_or_else(|| A2AError::invalid_params("missing params"))
                .and_then(|v| parse_send_task_params(&v))
            {
                Ok(p) => p,
                Err(e) => return error_response(request.id, e),
            };
            match state.handler.on_task_send(params).await {
                Ok(task) => match serde_json::to_value(&task) {
                    Ok(v) => Json(JsonRpcResponse::success(request.id, v)).into_response(),
                    Err(e) => error_response(request.id, A2AError::internal_error(e.to_string())),
                },
                Err(e) => error_response(request.id, e),
            }
        }
        "tasks/sendSubscribe" => {
            let params = match request
                .params
                .ok_or_else(|| A2AError::invalid_params("missing params"))
                .and_then(|v| parse_send_task_params(&v))
            {
                Ok(p) => p,
                Err(e) => return error_response(request.id, e),
            };
            stream_response(state, params).await
        }
        method => {
            warn!(method, "unknown JSON-RPC method");
            error_response(
                request.id,
                A2AError::method_not_found(format!("method not found: {method}")),
            )
        }
    }
}

/// `POST /tasks/send` and `POST /a2a/tasks/send`.
async fn handle_tasks_send(State(state): State<Arc<AppState>>, body: String) -> Response {
    let value: Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(e) => return error_response(None, A2AError::parse_error(e.to_string())),
    };

    if value.get("jsonrpc").is_some() {
        return dispatch_jsonrpc(state, value).await;
    }

    let params = match parse_send_task_params(&value) {
        Ok(p) => p,
        Err(e) => return error_response(None, e),
    };
    match state.handler.on_task_send(params).await {
        Ok(task) => Json(task).into_response(),
        Err(e) => error_response(None, e),
    }
}

/// `POST /tasks/stream` (and its `/stream` alias, both mirrored under
/// `/a2a`) — always responds with an SSE stream.
async fn handle_tasks_stream(State(state): State<Arc<AppState>>, body: String) -> Response {
    let value: Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(e) => return error_response(None, A2AError::parse_error(e.to_string())),
    };

    let params = if value.get("jsonrpc").is_some() {
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => return error_response(None, A2AError::parse_error(e.to_string())),
        };
        match request
            .params
            .ok_or_else(|| A2AError::invalid_params("missing params"))
            .and_then(|v| parse_send_task_params(&v))
        {
            Ok(p) => p,
            Err(e) => return error_response(request.id, e),
        }
    } else {
        match parse_send_task_params(&value) {
            Ok(p) => p,
            Err(e) => return error_response(None, e),
        }
    };

    stream_response(state, params).await
}

async fn stream_response(state: Arc<AppState>, params: SendTaskParams) -> Response {
    match state.handler.on_task_send_subscribe(params).await {
        Ok(snapshots) => Sse::new(sse_body(snapshots))
            .keep_alive(
                KeepAlive::new()
                    .interval(Duration::from_secs(DEFAULT_KEEPALIVE_SECS))
                    .text("keep-alive"),
            )
            .into_response(),
        Err(e) => error_response(None, e),
    }
}

/// Turns a snapshot stream into the SSE grammar from §4.2: zero-or-more
/// `update` events, then exactly one `complete` or `error` terminator. A
/// `Failed`-state terminal task ends the stream with `error`, not `complete`.
fn sse_body(
    mut snapshots: futures::stream::BoxStream<'static, TaskSnapshot>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        loop {
            match snapshots.next().await {
                Some(snapshot) => {
                    if snapshot.last_update && snapshot.task.status.state == TaskState::Failed {
                        let message = snapshot
                            .task
                            .status
                            .message
                            .as_ref()
                            .and_then(|m| m.text().map(ToString::to_string))
                            .unwrap_or_else(|| "task failed".to_string());
                        let data = serde_json::json!({ "error": message }).to_string();
                        yield Ok(Event::default().event("error").data(data));
                        break;
                    }

                    let event_name = if snapshot.last_update { "complete" } else { "update" };

                    match serde_json::to_string(&snapshot.task) {
                        Ok(json) => yield Ok(Event::default().event(event_name).data(json)),
                        Err(e) => {
                            error!(error = %e, "failed to serialize task snapshot");
                            yield Ok(Event::default()
                                .event("error")
                                .data(serde_json::json!({ "error": e.to_string() }).to_string()));
                            break;
                        }
                    }

                    if snapshot.last_update {
                        break;
                    }
                }
                None => break,
            }
        }
    }
}
