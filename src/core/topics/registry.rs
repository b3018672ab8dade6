use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use crate::core::subscriber::{Handler, Subscription, SubscriptionId};
use crate::core::topics::topic::{Topic, TopicName};

/// [`TopicRegistry`] is a thread-safe store for managing active topics.
///
/// Uses DashMap internally so registrations on different topics do not
/// contend. A topic whose last subscription is removed is dropped from the
/// map, so an entry always has at least one handler.
pub struct TopicRegistry<R = ()> {
    topics: DashMap<TopicName, Topic<R>>,
    next_subscription_id: AtomicU64,
}

impl<R> Default for TopicRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for TopicRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopicRegistry")
            .field("topics", &self.list_topics())
            .finish()
    }
}

impl<R> TopicRegistry<R> {
    /// Creates a new empty [`TopicRegistry`].
    pub fn new() -> Self {
        Self {
            topics: DashMap::new(),
            next_subscription_id: AtomicU64::new(1),
        }
    }

    /// Appends `handler` to `name`, creating the topic if it doesn't exist.
    pub fn add(&self, name: &str, handler: Handler<R>) -> SubscriptionId {
        let raw = self.next_subscription_id.fetch_add(1, Ordering::Relaxed);
        let id = SubscriptionId::from_raw(raw);

        self.topics
            .entry(name.to_owned())
            .or_insert_with(|| {
                debug!("📭 Topic '{}' not found; creating new.", name);
                Topic::new(name)
            })
            .push(id, handler);

        id
    }

    /// Removes a single subscription.
    ///
    /// The topic itself is removed once its sequence becomes empty.
    pub fn remove(&self, name: &str, id: SubscriptionId) -> bool {
        match self.topics.entry(name.to_owned()) {
            Entry::Occupied(mut entry) => {
                let removed = entry.get_mut().remove(id);
                if entry.get().is_empty() {
                    debug!("🗑️ Topic '{}' has no handlers left; removing.", name);
                    entry.remove();
                }
                removed
            }
            Entry::Vacant(_) => false,
        }
    }

    /// Removes a topic by name.
    ///
    /// Returns `Some(topic)` if it was removed, or `None` if not found.
    pub fn remove_topic(&self, name: &str) -> Option<Topic<R>> {
        self.topics.remove(name).map(|(_, topic)| topic)
    }

    /// Copies the current handler sequence of `name`.
    ///
    /// The map guard is released before returning, so callers can invoke the
    /// handlers while other code mutates the registry.
    pub fn snapshot(&self, name: &str) -> Vec<Subscription<R>> {
        self.topics
            .get(name)
            .map(|topic| topic.subscriptions().to_vec())
            .unwrap_or_default()
    }

    /// Lists all topic names currently registered, sorted.
    pub fn list_topics(&self) -> Vec<TopicName> {
        let mut names: Vec<TopicName> = self
            .topics
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    pub fn contains_topic(&self, name: &str) -> bool {
        self.topics.contains_key(name)
    }

    /// Number of subscriptions on `name`; zero for unknown topics.
    pub fn handler_count(&self, name: &str) -> usize {
        self.topics.get(name).map_or(0, |topic| topic.len())
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Drops every topic and handler.
    pub fn clear(&self) {
        self.topics.clear();
    }
}
