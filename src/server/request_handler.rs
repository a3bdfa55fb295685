//! Request handler — coordinates task resolution, handler invocation, and
//! event delivery for the two wire methods this runtime exposes:
//! `tasks/send` and `tasks/sendSubscribe`, plus the naked message-only
//! dispatch used by `POST /` when the body carries no task id.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;

use crate::error::{A2AError, A2AResult};
use crate::server::agent_executor::{HandlerContext, TaskHandler};
use crate::server::event_queue::QueueManager;
use crate::server::task_manager::TaskManager;
use crate::server::task_store::TaskStore;
use crate::types::{Message, Task, TaskSnapshot, TaskState, TaskStatus};

/// Parameters shared by `tasks/send` and `tasks/sendSubscribe`: a message to
/// deliver, and optionally the task/session it continues.
#[derive(Debug, Clone)]
pub struct SendTaskParams {
    pub task_id: Option<String>,
    pub session_id: Option<String>,
    pub message: Message,
}

impl SendTaskParams {
    pub fn new(message: Message) -> Self {
        Self {
            task_id: None,
            session_id: None,
            message,
        }
    }
}

#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn on_task_send(&self, params: SendTaskParams) -> A2AResult<Task>;
    async fn on_task_send_subscribe(
        &self,
        params: SendTaskParams,
    ) -> A2AResult<BoxStream<'static, TaskSnapshot>>;
    async fn on_message(&self, message: Message) -> A2AResult<Message>;
}

pub struct DefaultRequestHandler {
    handler: Arc<dyn TaskHandler>,
    task_manager: TaskManager,
    queue_manager: Arc<dyn QueueManager>,
}

impl DefaultRequestHandler {
    pub fn new(handler: Arc<dyn TaskHandler>, store: Arc<dyn TaskStore>) -> Self {
        Self {
            handler,
            task_manager: TaskManager::new(store),
            queue_manager: Arc::new(crate::server::event_queue::InMemoryQueueManager::new()),
        }
    }

    pub fn with_queue_manager(mut self, queue_manager: Arc<dyn QueueManager>) -> Self {
        self.queue_manager = queue_manager;
        self
    }
}

fn failed_task_from_error(task: Task, err: &A2AError) -> Task {
    Task {
        id: task.id,
        session_id: task.session_id,
        status: {
            let mut status = TaskStatus::new(TaskState::Failed);
            status.message = Some(Message::agent_text(err.to_string()));
            status
        },
        message: None,
        history: task.history,
        artifacts: Vec::new(),
        metadata: task.metadata,
    }
}

#[async_trait]
impl RequestHandler for DefaultRequestHandler {
    async fn on_task_send(&self, params: SendTaskParams) -> A2AResult<Task> {
        let task = self
            .task_manager
            .resolve_or_start(params.task_id, params.session_id, params.message)
            .await?;

        if task.status.state == TaskState::Unknown {
            return Ok(task);
        }

        let cx = HandlerContext::new(task.id.clone(), task.session_id.clone());
        let mut finished = match self.handler.handle(task.clone(), &cx).await {
            Ok(finished) => finished,
            Err(err) => failed_task_from_error(task, &err),
        };
        if !finished.status.state.is_terminal() {
            finished.status = TaskStatus::new(TaskState::Completed);
        }
        self.task_manager.save(&finished).await?;
        Ok(finished)
    }

    async fn on_task_send_subscribe(
        &self,
        params: SendTaskParams,
    ) -> A2AResult<BoxStream<'static, TaskSnapshot>> {
        let task = self
            .task_manager
            .resolve_or_start(params.task_id, params.session_id, params.message)
            .await?;

        if task.status.state == TaskState::Unknown {
            let snapshot = TaskSnapshot::terminal(task);
            return Ok(Box::pin(futures::stream::once(async move { snapshot })));
        }

        let cx = HandlerContext::new(task.id.clone(), task.session_id.clone());
        let queue = self.queue_manager.get_or_create(&task.id).await;
        let stream = self.handler.handle_stream(task, &cx).await?;

        let task_manager = self.task_manager.clone();
        let tee = stream.then(move |snapshot| {
            let task_manager = task_manager.clone();
            let queue = queue.clone();
            async move {
                let _ = task_manager.save(&snapshot.task).await;
                let _ = queue.publish(snapshot.clone());
                snapshot
            }
        });
        Ok(Box::pin(tee))
    }

    async fn on_message(&self, message: Message) -> A2AResult<Message> {
        let task = Task::submitted(message);
        let cx = HandlerContext::new(task.id.clone(), None);
        let finished = self.handler.handle(task, &cx).await?;
        if let Some(text) = finished.first_artifact_text() {
            return Ok(Message::agent_text(text));
        }
        if let Some(message) = finished.status.message {
            return Ok(message);
        }
        Err(A2AError::response(
            "handler produced neither an artifact nor a status message",
        ))
    }
}
