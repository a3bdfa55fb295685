//! Broadcast channel carrying [`TaskSnapshot`] frames from a handler's
//! streaming invocation out to one or more SSE subscribers.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::error::{A2AError, A2AResult};
use crate::types::TaskSnapshot;

/// Default broadcast channel capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// A broadcast channel of [`TaskSnapshot`]s for a single task.
#[derive(Clone)]
pub struct EventQueue {
    sender: broadcast::Sender<TaskSnapshot>,
    closed: Arc<std::sync::atomic::AtomicBool>,
}

impl EventQueue {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            closed: Arc::new(std::sync::atomic::AtomicBool::new(false)),
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TaskSnapshot> {
        self.sender.subscribe()
    }

    /// Publishes a snapshot. Silently drops it if there are no subscribers
    /// yet (matching broadcast-channel semantics) — the first subscriber to
    /// attach after publication simply won't see earlier frames.
    pub fn publish(&self, snapshot: TaskSnapshot) -> A2AResult<()> {
        if self.is_closed() {
            return Err(A2AError::internal_error("event queue is closed"));
        }
        match self.sender.send(snapshot) {
            Ok(_) => Ok(()),
            Err(_) => {
                debug!("publish with no subscribers");
                Ok(())
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn close(&self) {
        self.closed.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(std::sync::atomic::Ordering::SeqCst)
    }
}

/// Raised when a queue is requested for a task id that already has one.
#[derive(Debug, Error)]
#[error("a task queue already exists for task {task_id}")]
pub struct TaskQueueExists {
    pub task_id: String,
}

/// Raised when a queue is requested for a task id that has none.
#[derive(Debug, Error)]
#[error("no task queue exists for task {task_id}")]
pub struct NoTaskQueue {
    pub task_id: String,
}

/// Per-task queue lifecycle management, so a streaming subscriber (SSE
/// handler) and the executor that produces snapshots can rendezvous by
/// task id without either side needing a direct reference to the other.
#[async_trait::async_trait]
pub trait QueueManager: Send + Sync {
    async fn create(&self, task_id: &str) -> Result<EventQueue, TaskQueueExists>;
    async fn get(&self, task_id: &str) -> Option<EventQueue>;
    async fn get_or_create(&self, task_id: &str) -> EventQueue;
    async fn remove(&self, task_id: &str);
}

#[derive(Default)]
pub struct InMemoryQueueManager {
    queues: tokio::sync::RwLock<std::collections::HashMap<String, EventQueue>>,
}

impl InMemoryQueueManager {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl QueueManager for InMemoryQueueManager {
    async fn create(&self, task_id: &str) -> Result<EventQueue, TaskQueueExists> {
        let mut queues = self.queues.write().await;
        if queues.contains_key(task_id) {
            return Err(TaskQueueExists {
                task_id: task_id.to_string(),
            });
        }
        let queue = EventQueue::with_default_capacity();
        queues.insert(task_id.to_string(), queue.clone());
        Ok(queue)
    }

    async fn get(&self, task_id: &str) -> Option<EventQueue> {
        self.queues.read().await.get(task_id).cloned()
    }

    async fn get_or_create(&self, task_id: &str) -> EventQueue {
        if let Some(queue) = self.get(task_id).await {
            return queue;
        }
        let mut queues = self.queues.write().await;
        queues
            .entry(task_id.to_string())
            .or_insert_with(EventQueue::with_default_capacity)
            .clone()
    }

    async fn remove(&self, task_id: &str) {
        if let Some(queue) = self.queues.write().await.remove(task_id) {
            queue.close();
        } else {
            warn!(task_id, "attempted to remove a queue that does not exist");
        }
    }
}

/// Consumes snapshots from a subscription until a terminal one arrives.
pub struct EventConsumer {
    receiver: broadcast::Receiver<TaskSnapshot>,
}

impl EventConsumer {
    pub fn new(receiver: broadcast::Receiver<TaskSnapshot>) -> Self {
        Self { receiver }
    }

    /// Returns the next snapshot, or `None` if the channel closed.
    pub async fn next(&mut self) -> Option<TaskSnapshot> {
        loop {
            match self.receiver.recv().await {
                Ok(snapshot) => return Some(snapshot),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event consumer lagged, skipping frames");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Drains until a terminal (`last_update = true`) snapshot, returning it.
    pub async fn consume_until_terminal(&mut self) -> Option<TaskSnapshot> {
        while let Some(snapshot) = self.next().await {
            if snapshot.last_update {
                return Some(snapshot);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Task, TaskState};
    use crate::utils::new_user_message;

    fn snapshot(terminal: bool) -> TaskSnapshot {
        let task = Task::submitted(new_user_message("hi"));
        if terminal {
            TaskSnapshot::terminal(task)
        } else {
            TaskSnapshot::intermediate(task)
        }
    }

    #[tokio::test]
    async fn publish_and_subscribe_round_trips() {
        let queue = EventQueue::with_default_capacity();
        let mut rx = queue.subscribe();
        queue.publish(snapshot(false)).unwrap();
        let got = rx.recv().await.unwrap();
        assert!(!got.last_update);
    }

    #[tokio::test]
    async fn publish_with_no_subscribers_does_not_error() {
        let queue = EventQueue::with_default_capacity();
        assert!(queue.publish(snapshot(true)).is_ok());
    }

    #[tokio::test]
    async fn queue_manager_create_twice_errors() {
        let manager = InMemoryQueueManager::new();
        manager.create("t-1").await.unwrap();
        assert!(manager.create("t-1").await.is_err());
    }

    #[tokio::test]
    async fn consumer_stops_at_terminal_snapshot() {
        let queue = EventQueue::with_default_capacity();
        let mut consumer = EventConsumer::new(queue.subscribe());
        queue.publish(snapshot(false)).unwrap();
        queue.publish(snapshot(true)).unwrap();
        let last = consumer.consume_until_terminal().await.unwrap();
        assert!(last.last_update);
    }

    #[test]
    fn task_state_is_terminal_used_by_engine() {
        assert!(TaskState::Completed.is_terminal());
    }
}
