use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;
/// Event bus for pub/sub messaging
///
/// Lets game logic observe fade lifecycle without polling the controller.
use std::sync::Arc;

use super::events::Event;

/// Subscriber ID for tracking subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

struct Subscriber {
    id: SubscriberId,
    sender: Sender<Event>,
}

/// Event bus for broadcasting events to subscribers
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<RwLock<Vec<Subscriber>>>,
    next_id: Arc<RwLock<usize>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events, returns a receiver and subscription ID
    pub fn subscribe(&self) -> (Receiver<Event>, SubscriberId) {
        let (tx, rx) = unbounded();

        let mut next_id = self.next_id.write();
        let id = SubscriberId(*next_id);
        *next_id += 1;
        drop(next_id);

        self.subscribers.write().push(Subscriber { id, sender: tx });

        (rx, id)
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers.write().retain(|s| s.id != id);
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: Event) {
        let subscribers = self.subscribers.read();
        if subscribers.is_empty() {
            return;
        }

        for subscriber in subscribers.iter() {
            // Closed channel means the receiver was dropped
            let _ = subscriber.sender.try_send(event.clone());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    pub fn clear(&self) {
        self.subscribers.write().clear();
    }
}
