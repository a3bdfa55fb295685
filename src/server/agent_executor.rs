//! The [`TaskHandler`] trait — the seam agent authors implement.
//!
//! Mirrors the reference server's `AgentExecutor` split into a simpler
//! single-trait contract, since the task engine's surface (§4.3) is just
//! `Handle(task) -> task` plus an optional streaming variant, not the richer
//! push-notification-aware v0.3 executor contract.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, BoxStream};

use crate::error::A2AResult;
use crate::types::{Message, Task, TaskSnapshot, TaskState, TaskStatus};

/// Per-invocation context: the task/session identity and a cooperative
/// cancellation flag. Cancellation is signalled by the engine (e.g. when an
/// SSE client disconnects) and must be observed by the handler at I/O
/// boundaries (§5).
#[derive(Debug, Clone, Default)]
pub struct HandlerContext {
    pub task_id: String,
    pub session_id: Option<String>,
    cancelled: Arc<AtomicBool>,
}

impl HandlerContext {
    pub fn new(task_id: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            task_id: task_id.into(),
            session_id,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Signals cooperative cancellation to whoever holds this context (and
    /// any clone of it, since the flag is shared).
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Implement this trait to define an agent's behavior.
///
/// `handle` may mutate `status`, `artifacts` and `history`; it must not
/// change `id`. A non-terminal return value is auto-transitioned to
/// `Completed` by the engine (§4.3).
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn handle(&self, task: Task, cx: &HandlerContext) -> A2AResult<Task>;

    /// Streaming variant. The default implementation auto-wraps the
    /// non-streaming `handle` into a single-snapshot stream: one `update`
    /// snapshot carrying the final state, immediately followed by
    /// `complete` (open question (b), resolved in DESIGN.md). Handlers that
    /// need real incremental streaming should override this directly.
    async fn handle_stream(
        &self,
        task: Task,
        cx: &HandlerContext,
    ) -> A2AResult<BoxStream<'static, TaskSnapshot>> {
        let task_id = task.id.clone();
        let session_id = task.session_id.clone();
        let history = task.history.clone();

        let snapshot = match self.handle(task, cx).await {
            Ok(mut finished) => {
                if !finished.status.state.is_terminal() {
                    finished.status = TaskStatus::new(TaskState::Completed);
                }
                TaskSnapshot::terminal(finished)
            }
            Err(err) => {
                let mut status = TaskStatus::new(TaskState::Failed);
                status.message = Some(Message::agent_text(err.to_string()));
                TaskSnapshot::terminal(Task {
                    id: task_id,
                    session_id,
                    status,
                    message: None,
                    history,
                    artifacts: Vec::new(),
                    metadata: None,
                })
            }
        };

        Ok(Box::pin(stream::once(async move { snapshot })))
    }

    /// Default cancellation just flips the shared flag; handlers observing
    /// `cx.is_cancelled()` at I/O boundaries will stop on their own.
    async fn cancel(&self, cx: &HandlerContext) {
        cx.cancel();
    }
}
