//! Task updater — ergonomic helper for handlers that build up a task's
//! status and artifacts incrementally (e.g. inside a custom
//! `handle_stream` override) and want each step published to subscribers.

use std::sync::Mutex;

use crate::error::{A2AError, A2AResult};
use crate::server::event_queue::EventQueue;
use crate::types::{Artifact, Message, Task, TaskSnapshot, TaskState, TaskStatus};
use crate::utils::artifact::apply_artifact;

/// Wraps a single task's mutable state plus an optional event queue that
/// every status or artifact change is published to.
pub struct TaskUpdater {
    task: Mutex<Task>,
    queue: Option<EventQueue>,
}

impl TaskUpdater {
    pub fn new(task: Task, queue: Option<EventQueue>) -> Self {
        Self {
            task: Mutex::new(task),
            queue,
        }
    }

    pub fn current_task(&self) -> Task {
        self.task.lock().unwrap().clone()
    }

    /// Moves the task to a new status. Errors if the task is already in a
    /// terminal state — terminal states are a one-way door (§4.3).
    pub fn update_status(&self, state: TaskState, message: Option<Message>) -> A2AResult<()> {
        let mut task = self.task.lock().unwrap();
        if task.status.state.is_terminal() {
            return Err(A2AError::internal_error(format!(
                "cannot transition task {} out of terminal state {}",
                task.id, task.status.state
            )));
        }
        let mut status = TaskStatus::new(state);
        status.message = message;
        task.status = status;
        drop(task);
        self.publish(false)
    }

    /// Applies an artifact using the index-keyed accumulation rule.
    pub fn add_artifact(&self, artifact: Artifact) -> A2AResult<()> {
        {
            let mut task = self.task.lock().unwrap();
            apply_artifact(&mut task.artifacts, artifact);
        }
        self.publish(false)
    }

    pub fn submit(&self) -> A2AResult<()> {
        self.update_status(TaskState::Submitted, None)
    }

    pub fn start_working(&self) -> A2AResult<()> {
        self.update_status(TaskState::Waiting, None)
    }

    pub fn requires_input(&self, message: Message) -> A2AResult<()> {
        self.update_status(TaskState::InputRequired, Some(message))
    }

    pub fn complete(&self) -> A2AResult<()> {
        let mut task = self.task.lock().unwrap();
        task.status = TaskStatus::new(TaskState::Completed);
        drop(task);
        self.publish(true)
    }

    pub fn fail(&self, message: Message) -> A2AResult<()> {
        let mut task = self.task.lock().unwrap();
        let mut status = TaskStatus::new(TaskState::Failed);
        status.message = Some(message);
        task.status = status;
        drop(task);
        self.publish(true)
    }

    pub fn cancel(&self) -> A2AResult<()> {
        let mut task = self.task.lock().unwrap();
        task.status = TaskStatus::new(TaskState::Canceled);
        drop(task);
        self.publish(true)
    }

    fn publish(&self, terminal: bool) -> A2AResult<()> {
        let Some(queue) = &self.queue else {
            return Ok(());
        };
        let task = self.current_task();
        let snapshot = if terminal {
            TaskSnapshot::terminal(task)
        } else {
            TaskSnapshot::intermediate(task)
        };
        queue.publish(snapshot)
    }
}
