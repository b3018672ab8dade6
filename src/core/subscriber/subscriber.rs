use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::core::args::Arg;
use crate::core::topics::registry::TopicRegistry;

/// A callback registered against a topic.
pub type Handler<R = ()> = Arc<dyn Fn(&[Arg]) -> R + Send + Sync>;

/// Token identifying one registration of a handler on a topic.
///
/// Handlers are closures and cannot be compared, so removal goes through the
/// token handed out by `subscribe` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn value(self) -> u64 {
        self.0
    }

    pub fn from_raw(value: u64) -> Self {
        SubscriptionId(value)
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// One entry in a topic's handler sequence.
pub struct Subscription<R = ()> {
    id: SubscriptionId,
    handler: Handler<R>,
}

impl<R> Subscription<R> {
    pub fn new(id: SubscriptionId, handler: Handler<R>) -> Self {
        Self { id, handler }
    }

    #[inline(always)]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    #[inline(always)]
    pub fn handler(&self) -> &Handler<R> {
        &self.handler
    }

    #[inline(always)]
    pub fn invoke(&self, args: &[Arg]) -> R {
        (self.handler)(args)
    }
}

impl<R> Clone for Subscription<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<R> fmt::Debug for Subscription<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Registration handle onto a shared [`TopicRegistry`].
///
/// Consumers hold a `Subscriber` without seeing who publishes.
pub struct Subscriber<R = ()> {
    topic_registry: Arc<TopicRegistry<R>>,
}

impl<R> Clone for Subscriber<R> {
    fn clone(&self) -> Self {
        Self {
            topic_registry: Arc::clone(&self.topic_registry),
        }
    }
}

impl<R> fmt::Debug for Subscriber<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("topic_registry", &self.topic_registry)
            .finish()
    }
}

impl<R> Subscriber<R> {
    pub fn new(topic_registry: Arc<TopicRegistry<R>>) -> Self {
        Self { topic_registry }
    }

    /// Appends `handler` to `topic`, creating the topic if needed.
    pub fn subscribe<F>(&self, topic: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&[Arg]) -> R + Send + Sync + 'static,
    {
        self.subscribe_handler(topic, Arc::new(handler))
    }

    /// Appends an already shared handler. Registering the same `Arc` twice
    /// yields two independent subscriptions.
    pub fn subscribe_handler(&self, topic: &str, handler: Handler<R>) -> SubscriptionId {
        let id = self.topic_registry.add(topic, handler);
        debug!(target: "topicbus::subscriber", topic, subscription = %id, "Subscribed");
        id
    }

    /// Appends several handlers in the given order.
    pub fn subscribe_all<I>(&self, topic: &str, handlers: I) -> Vec<SubscriptionId>
    where
        I: IntoIterator<Item = Handler<R>>,
    {
        handlers
            .into_iter()
            .map(|handler| self.subscribe_handler(topic, handler))
            .collect()
    }

    /// Removes one subscription, or the whole topic when `subscription` is
    /// `None`.
    ///
    /// Returns `true` only if something was removed.
    pub fn unsubscribe(&self, topic: &str, subscription: Option<SubscriptionId>) -> bool {
        let removed = match subscription {
            Some(id) => self.topic_registry.remove(topic, id),
            None => self.topic_registry.remove_topic(topic).is_some(),
        };

        debug!(
            target: "topicbus::subscriber",
            topic,
            subscription = ?subscription,
            removed,
            "Unsubscribed"
        );
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn subscription_id_displays_with_prefix() {
        assert_eq!(SubscriptionId::from_raw(7).to_string(), "sub-7");
        assert_eq!(SubscriptionId::from_raw(7).value(), 7);
    }

    #[test]
    fn subscribe_all_keeps_order_and_hands_out_distinct_ids() {
        let registry = Arc::new(TopicRegistry::<usize>::new());
        let subscriber = Subscriber::new(Arc::clone(&registry));

        let first: Handler<usize> = Arc::new(|_: &[Arg]| 1);
        let second: Handler<usize> = Arc::new(|_: &[Arg]| 2);
        let ids = subscriber.subscribe_all("t", [first, second]);

        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        let order: Vec<usize> = registry
            .snapshot("t")
            .iter()
            .map(|s| s.invoke(&[]))
            .collect();
        assert_eq!(order, vec![1, 2]);
    }

    #[test]
    fn unsubscribe_by_id_is_not_repeatable() {
        let registry = Arc::new(TopicRegistry::new());
        let subscriber = Subscriber::new(Arc::clone(&registry));
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);

        let id = subscriber.subscribe("t", move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert!(subscriber.unsubscribe("t", Some(id)));
        assert!(!subscriber.unsubscribe("t", Some(id)));
        assert!(!subscriber.unsubscribe("t", None));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
