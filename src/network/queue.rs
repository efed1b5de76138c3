use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::Notify;
use tracing::warn;

use crate::protocol::OutboundMessage;

/// Raw `"<player> <command>"` lines from gateways to the game.
pub type InboundQueue = MessageQueue<String>;
/// Responses and broadcasts from the game to gateways.
pub type OutboundQueue = MessageQueue<OutboundMessage>;

/// Bounded FIFO shared between a gateway and the game loop.
///
/// The lock is held only for a single push or drain, never across
/// processing. Consumers can sleep on [`MessageQueue::wait_drain`] instead
/// of spinning.
pub struct MessageQueue<T> {
    name: &'static str,
    items: Mutex<VecDeque<T>>,
    capacity: usize,
    notify: Notify,
}

impl<T> MessageQueue<T> {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            items: Mutex::new(VecDeque::new()),
            capacity,
            notify: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Enqueue `item`, or reject it when the queue is full.
    pub fn push(&self, item: T) -> Result<(), String> {
        {
            let mut items = self.lock();
            if items.len() >= self.capacity {
                warn!("{} queue full ({} items), dropping message", self.name, self.capacity);
                return Err(format!("{} queue is full", self.name));
            }
            items.push_back(item);
        }
        self.notify.notify_one();
        Ok(())
    }

    pub fn pop(&self) -> Option<T> {
        self.lock().pop_front()
    }

    /// Take everything queued, oldest first.
    pub fn drain(&self) -> Vec<T> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Wait until something is pushed or `timeout` passes, then drain.
    /// May return an empty batch.
    pub async fn wait_drain(&self, timeout: Duration) -> Vec<T> {
        if self.is_empty() {
            let _ = tokio::time::timeout(timeout, self.notify.notified()).await;
        }
        self.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn drains_in_fifo_order() {
        let queue = MessageQueue::new("test", 4);
        queue.push(1).unwrap();
        queue.push(2).unwrap();
        queue.push(3).unwrap();
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.drain(), vec![2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn rejects_pushes_past_capacity() {
        let queue = MessageQueue::new("test", 2);
        queue.push("a").unwrap();
        queue.push("b").unwrap();
        assert!(queue.push("c").is_err());
        assert_eq!(queue.len(), 2);
    }

    #[tokio::test]
    async fn wait_drain_times_out_empty() {
        let queue: MessageQueue<u8> = MessageQueue::new("test", 2);
        let batch = queue.wait_drain(Duration::from_millis(10)).await;
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn wait_drain_wakes_on_push() {
        let queue = Arc::new(MessageQueue::new("test", 8));
        let producer = Arc::clone(&queue);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            producer.push("hello".to_string()).unwrap();
        });

        let batch = queue.wait_drain(Duration::from_secs(5)).await;
        assert_eq!(batch, vec!["hello".to_string()]);
    }
}
