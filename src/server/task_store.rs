//! Task store — persistence layer for in-flight tasks.
//!
//! Scoped to what the wire surface actually needs: lookup by id so a
//! follow-up `tasks/send` referencing an existing task can resume it
//! (§4.3's `unknown` state is what a missing lookup turns into), plus save
//! and delete. There is no `tasks/list` route, so this trait carries no
//! pagination surface — trimmed relative to the reference server's store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::A2AResult;
use crate::types::Task;

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn save(&self, task: Task) -> A2AResult<()>;
    async fn get(&self, task_id: &str) -> A2AResult<Option<Task>>;
    async fn delete(&self, task_id: &str) -> A2AResult<()>;
}

/// Process-local task store. Tasks do not survive a restart — callers that
/// reference a task id from a previous process lifetime will see `unknown`,
/// which is the behavior §4.3 specifies for referenced-but-unrecognized
/// tasks.
#[derive(Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<String, Task>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn save(&self, task: Task) -> A2AResult<()> {
        self.tasks.write().unwrap().insert(task.id.clone(), task);
        Ok(())
    }

    async fn get(&self, task_id: &str) -> A2AResult<Option<Task>> {
        Ok(self.tasks.read().unwrap().get(task_id).cloned())
    }

    async fn delete(&self, task_id: &str) -> A2AResult<()> {
        self.tasks.write().unwrap().remove(task_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::new_user_message;

    #[tokio::test]
    async fn save_then_get_round_trips() {
        let store = InMemoryTaskStore::new();
        let task = Task::submitted(new_user_message("hi"));
        let id = task.id.clone();
        store.save(task).await.unwrap();
        let fetched = store.get(&id).await.unwrap();
        assert!(fetched.is_some());
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let store = InMemoryTaskStore::new();
        assert!(store.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_task() {
        let store = InMemoryTaskStore::new();
        let task = Task::submitted(new_user_message("hi"));
        let id = task.id.clone();
        store.save(task).await.unwrap();
        store.delete(&id).await.unwrap();
        assert!(store.get(&id).await.unwrap().is_none());
    }
}
