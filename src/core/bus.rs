//! The owning facade over a topic registry.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::config::BusConfig;
use crate::core::args::Arg;
use crate::core::dispatch::DispatchPolicy;
use crate::core::error::BusError;
use crate::core::publisher::{Publisher, PublisherConfig};
use crate::core::subscriber::{Handler, Subscriber, SubscriptionId};
use crate::core::topics::registry::TopicRegistry;
use crate::core::topics::topic::TopicName;

/// In-process, synchronous, named-topic event bus.
///
/// `R` is what handlers return; `publish` collects one `R` per handler.
/// The bus can be shared across threads, and hands out cloneable
/// [`Publisher`] and [`Subscriber`] handles bound to the same registry.
pub struct EventBus<R = ()> {
    registry: Arc<TopicRegistry<R>>,
    publisher: Publisher<R>,
    subscriber: Subscriber<R>,
}

impl<R> Default for EventBus<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for EventBus<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("registry", &self.registry)
            .field("config", &self.publisher.config())
            .finish()
    }
}

impl<R> EventBus<R> {
    /// Creates an empty bus with the default [`PublisherConfig`].
    pub fn new() -> Self {
        Self::with_publisher_config(PublisherConfig::default())
    }

    /// Creates an empty bus using the `[bus]` section of the configuration.
    pub fn with_config(config: &BusConfig) -> Self {
        info!(
            dispatch = %config.dispatch,
            log_unknown_topics = config.log_unknown_topics,
            "Creating event bus"
        );
        Self::with_publisher_config(PublisherConfig {
            dispatch: config.dispatch,
            log_unknown_topics: config.log_unknown_topics,
        })
    }

    pub fn with_publisher_config(config: PublisherConfig) -> Self {
        let registry = Arc::new(TopicRegistry::new());
        Self {
            publisher: Publisher::new(Arc::clone(&registry), config),
            subscriber: Subscriber::new(Arc::clone(&registry)),
            registry,
        }
    }

    pub fn dispatch_policy(&self) -> DispatchPolicy {
        self.publisher.config().dispatch
    }

    /// A publish-only handle onto this bus.
    pub fn publisher(&self) -> Publisher<R> {
        self.publisher.clone()
    }

    /// A subscribe-only handle onto this bus.
    pub fn subscriber(&self) -> Subscriber<R> {
        self.subscriber.clone()
    }

    // ───────────────────────────────────────────────────────
    // Subscriber side
    // ───────────────────────────────────────────────────────

    pub fn subscribe<F>(&self, topic: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&[Arg]) -> R + Send + Sync + 'static,
    {
        self.subscriber.subscribe(topic, handler)
    }

    pub fn subscribe_handler(&self, topic: &str, handler: Handler<R>) -> SubscriptionId {
        self.subscriber.subscribe_handler(topic, handler)
    }

    pub fn subscribe_all<I>(&self, topic: &str, handlers: I) -> Vec<SubscriptionId>
    where
        I: IntoIterator<Item = Handler<R>>,
    {
        self.subscriber.subscribe_all(topic, handlers)
    }

    /// See [`Subscriber::unsubscribe`].
    pub fn unsubscribe(&self, topic: &str, subscription: Option<SubscriptionId>) -> bool {
        self.subscriber.unsubscribe(topic, subscription)
    }

    // ───────────────────────────────────────────────────────
    // Publisher side
    // ───────────────────────────────────────────────────────

    /// See [`Publisher::publish`].
    pub fn publish(&self, topic: &str, args: &[Arg]) -> Vec<R> {
        self.publisher.publish(topic, args)
    }

    /// See [`Publisher::try_publish`].
    pub fn try_publish(&self, topic: &str, args: &[Arg]) -> Vec<Result<R, BusError>> {
        self.publisher.try_publish(topic, args)
    }

    // ───────────────────────────────────────────────────────
    // Introspection
    // ───────────────────────────────────────────────────────

    pub fn topics(&self) -> Vec<TopicName> {
        self.registry.list_topics()
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.registry.contains_topic(topic)
    }

    pub fn handler_count(&self, topic: &str) -> usize {
        self.registry.handler_count(topic)
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn clear(&self) {
        self.registry.clear();
    }
}
