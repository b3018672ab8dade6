use std::fmt;

use crate::core::subscriber::{Handler, Subscription, SubscriptionId};

/// Alias for a topic name.
pub type TopicName = String;

/// A topic is a named channel holding its subscriptions in registration
/// order.
pub struct Topic<R = ()> {
    name: TopicName,
    subscriptions: Vec<Subscription<R>>,
}

impl<R> Topic<R> {
    /// Creates an empty topic.
    pub fn new(name: impl Into<TopicName>) -> Self {
        Self {
            name: name.into(),
            subscriptions: Vec::new(),
        }
    }

    /// Returns the topic's name.
    pub fn name(&self) -> &TopicName {
        &self.name
    }

    /// Appends a handler at the end of the sequence. Duplicates are kept.
    pub fn push(&mut self, id: SubscriptionId, handler: Handler<R>) {
        self.subscriptions.push(Subscription::new(id, handler));
    }

    /// Removes the subscription with `id`, keeping the order of the rest.
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        match self.subscriptions.iter().position(|s| s.id() == id) {
            Some(index) => {
                self.subscriptions.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn subscriptions(&self) -> &[Subscription<R>] {
        &self.subscriptions
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl<R> fmt::Debug for Topic<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Topic")
            .field("name", &self.name)
            .field("subscriptions", &self.subscriptions)
            .finish()
    }
}
