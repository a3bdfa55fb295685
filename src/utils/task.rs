//! Helpers for constructing and trimming [`Task`] values.

use crate::error::{A2AError, A2AResult};
use crate::types::{Artifact, Message, Task, TaskState, TaskStatus};

/// Builds a freshly submitted task from an initial message.
///
/// # Errors
///
/// Returns a `validation` error if the message carries empty text content.
///
/// # Example
///
/// ```
/// use agentwire::types::Role;
/// use agentwire::utils::{new_user_message, new_task};
///
/// let message = new_user_message("Hello");
/// let task = new_task(message).unwrap();
/// assert_eq!(task.status.state, agentwire::types::TaskState::Submitted);
/// ```
pub fn new_task(message: Message) -> A2AResult<Task> {
    if let Some(text) = message.text() {
        if text.is_empty() {
            return Err(A2AError::validation("message text content cannot be empty"));
        }
    }
    Ok(Task::submitted(message))
}

/// Builds a `Completed` task carrying the given artifacts.
///
/// # Errors
///
/// Returns a `validation` error if `artifacts` is empty.
///
/// # Example
///
/// ```
/// use agentwire::utils::{completed_task, new_text_artifact};
///
/// let artifact = new_text_artifact("done", Some(0));
/// let task = completed_task("task-1", vec![artifact], vec![]).unwrap();
/// assert_eq!(task.status.state, agentwire::types::TaskState::Completed);
/// ```
pub fn completed_task(
    task_id: impl Into<String>,
    artifacts: Vec<Artifact>,
    history: Vec<Message>,
) -> A2AResult<Task> {
    if artifacts.is_empty() {
        return Err(A2AError::validation(
            "artifacts must be a non-empty list to mark a task completed",
        ));
    }
    Ok(Task {
        id: task_id.into(),
        session_id: None,
        status: TaskStatus::new(TaskState::Completed),
        message: None,
        history,
        artifacts,
        metadata: None,
    })
}

/// Returns a copy of `task` whose `history` is trimmed to its last
/// `history_length` entries (or left unchanged if `history_length` is
/// `None` or exceeds the current length).
///
/// # Example
///
/// ```
/// use agentwire::types::Role;
/// use agentwire::utils::{new_user_message, new_task, apply_history_length};
///
/// let mut task = new_task(new_user_message("hi")).unwrap();
/// for i in 0..9 {
///     task.history.push(new_user_message(format!("msg {i}")));
/// }
/// let trimmed = apply_history_length(task, Some(5));
/// assert_eq!(trimmed.history.len(), 5);
/// ```
pub fn apply_history_length(mut task: Task, history_length: Option<usize>) -> Task {
    if let Some(length) = history_length {
        let total = task.history.len();
        if length > 0 && total > length {
            task.history = task.history.split_off(total - length);
        }
    }
    task
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::new_user_message;

    #[test]
    fn new_task_status_is_submitted() {
        let task = new_task(new_user_message("test message")).unwrap();
        assert_eq!(task.status.state, TaskState::Submitted);
    }

    #[test]
    fn new_task_rejects_empty_text() {
        let result = new_task(new_user_message(""));
        assert!(result.is_err());
    }

    #[test]
    fn completed_task_rejects_empty_artifacts() {
        let result = completed_task("task-1", vec![], vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn apply_history_length_keeps_last_n() {
        let mut task = new_task(new_user_message("hi")).unwrap();
        for i in 0..9 {
            task.history.push(new_user_message(format!("msg {i}")));
        }
        let trimmed = apply_history_length(task, Some(5));
        assert_eq!(trimmed.history.len(), 5);
    }

    #[test]
    fn apply_history_length_none_is_noop() {
        let task = new_task(new_user_message("hi")).unwrap();
        let trimmed = apply_history_length(task.clone(), None);
        assert_eq!(trimmed.history.len(), task.history.len());
    }
}
