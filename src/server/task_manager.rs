//! Task manager — resolves an incoming request to the task it continues
//! or starts, and persists the outcome.
//!
//! A request that carries a task id the store doesn't recognize becomes an
//! `unknown`-state task rather than an error (§4.3) — the engine never
//! invents history for a task it's never seen.

use std::sync::Arc;

use crate::error::A2AResult;
use crate::server::task_store::TaskStore;
use crate::types::{Message, Task, TaskState, TaskStatus};

#[derive(Clone)]
pub struct TaskManager {
    store: Arc<dyn TaskStore>,
}

impl TaskManager {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Resolves an incoming `(task_id, message)` pair into the task that
    /// should be handed to a [`crate::server::TaskHandler`]:
    ///
    /// - No task id: starts a fresh `submitted` task.
    /// - Task id found in the store: appends `message` to its history and
    ///   leaves its current status untouched so the handler can decide how
    ///   to continue (e.g. completing an `input_required` wait).
    /// - Task id not found: returns an `unknown`-state task carrying only
    ///   this message, which callers should return to the client without
    ///   invoking a handler.
    pub async fn resolve_or_start(
        &self,
        task_id: Option<String>,
        session_id: Option<String>,
        message: Message,
    ) -> A2AResult<Task> {
        let Some(id) = task_id else {
            let mut task = Task::submitted(message);
            task.session_id = session_id;
            return Ok(task);
        };

        match self.store.get(&id).await? {
            Some(mut task) => {
                task.history.push(message.clone());
                task.message = Some(message);
                Ok(task)
            }
            None => Ok(Task {
                id,
                session_id,
                status: TaskStatus::new(TaskState::Unknown),
                message: Some(message.clone()),
                history: vec![message],
                artifacts: Vec::new(),
                metadata: None,
            }),
        }
    }

    pub async fn save(&self, task: &Task) -> A2AResult<()> {
        self.store.save(task.clone()).await
    }

    pub async fn get(&self, task_id: &str) -> A2AResult<Option<Task>> {
        self.store.get(task_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::task_store::InMemoryTaskStore;
    use crate::utils::new_user_message;

    fn manager() -> TaskManager {
        TaskManager::new(Arc::new(InMemoryTaskStore::new()))
    }

    #[tokio::test]
    async fn no_task_id_starts_fresh_submitted_task() {
        let manager = manager();
        let task = manager
            .resolve_or_start(None, None, new_user_message("hi"))
            .await
            .unwrap();
        assert_eq!(task.status.state, TaskState::Submitted);
        assert_eq!(task.history.len(), 1);
    }

    #[tokio::test]
    async fn unknown_task_id_yields_unknown_state() {
        let manager = manager();
        let task = manager
            .resolve_or_start(Some("missing".into()), None, new_user_message("hi"))
            .await
            .unwrap();
        assert_eq!(task.status.state, TaskState::Unknown);
    }

    #[tokio::test]
    async fn known_task_id_appends_to_history() {
        let manager = manager();
        let first = manager
            .resolve_or_start(None, None, new_user_message("first"))
            .await
            .unwrap();
        let id = first.id.clone();
        manager.save(&first).await.unwrap();

        let continued = manager
            .resolve_or_start(Some(id), None, new_user_message("second"))
            .await
            .unwrap();
        assert_eq!(continued.history.len(), 2);
        assert_eq!(continued.status.state, TaskState::Submitted);
    }
}
