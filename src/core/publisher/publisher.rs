use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::core::args::Arg;
use crate::core::dispatch::{invoke_isolated, DispatchPolicy};
use crate::core::error::BusError;
use crate::core::topics::registry::TopicRegistry;

/// Settings for how a [`Publisher`] dispatches.
#[derive(Debug, Clone, Copy)]
pub struct PublisherConfig {
    pub dispatch: DispatchPolicy,
    /// Emit a `warn` event when publishing to a topic with no handlers.
    pub log_unknown_topics: bool,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            dispatch: DispatchPolicy::Abort,
            log_unknown_topics: true,
        }
    }
}

/// Responsible for invoking every handler registered on a topic.
///
/// - If the topic does not exist, the result is empty.
/// - Handlers run on the caller's thread, in registration order, against a
///   snapshot taken when the call starts.
pub struct Publisher<R = ()> {
    topic_registry: Arc<TopicRegistry<R>>,
    config: PublisherConfig,
}

impl<R> Clone for Publisher<R> {
    fn clone(&self) -> Self {
        Self {
            topic_registry: Arc::clone(&self.topic_registry),
            config: self.config,
        }
    }
}

impl<R> fmt::Debug for Publisher<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("topic_registry", &self.topic_registry)
            .field("config", &self.config)
            .finish()
    }
}

impl<R> Publisher<R> {
    /// Creates a new publisher with access to the shared topic registry.
    ///
    /// # Arguments
    /// * `topic_registry` - A thread-safe reference to the topic registry.
    /// * `config` - Dispatch policy and logging switches.
    pub fn new(topic_registry: Arc<TopicRegistry<R>>, config: PublisherConfig) -> Self {
        Self {
            topic_registry,
            config,
        }
    }

    pub fn config(&self) -> PublisherConfig {
        self.config
    }

    /// Publishes `args` to every handler of `topic` and collects their
    /// return values in registration order.
    ///
    /// With [`DispatchPolicy::Abort`] a panicking handler unwinds out of this
    /// call. With [`DispatchPolicy::Isolate`] it is logged and its result is
    /// left out.
    pub fn publish(&self, topic: &str, args: &[Arg]) -> Vec<R> {
        let subscriptions = self.topic_registry.snapshot(topic);
        if subscriptions.is_empty() {
            self.note_unknown(topic);
            return Vec::new();
        }

        debug!(
            target: "topicbus::publisher",
            topic,
            handlers = subscriptions.len(),
            "Publishing event"
        );

        match self.config.dispatch {
            DispatchPolicy::Abort => subscriptions.iter().map(|s| s.invoke(args)).collect(),
            DispatchPolicy::Isolate => subscriptions
                .iter()
                .filter_map(|s| match invoke_isolated(topic, s, args) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        error!(target: "topicbus::publisher", topic, subscription = %s.id(), "{e}");
                        None
                    }
                })
                .collect(),
        }
    }

    /// Like [`publish`](Self::publish) but always isolates handler panics and
    /// reports one result per handler, regardless of the configured policy.
    pub fn try_publish(&self, topic: &str, args: &[Arg]) -> Vec<Result<R, BusError>> {
        let subscriptions = self.topic_registry.snapshot(topic);
        if subscriptions.is_empty() {
            self.note_unknown(topic);
            return Vec::new();
        }

        debug!(
            target: "topicbus::publisher",
            topic,
            handlers = subscriptions.len(),
            "Publishing event (isolated)"
        );

        subscriptions
            .iter()
            .map(|s| {
                let result = invoke_isolated(topic, s, args);
                if let Err(e) = &result {
                    error!(target: "topicbus::publisher", topic, subscription = %s.id(), "{e}");
                }
                result
            })
            .collect()
    }

    fn note_unknown(&self, topic: &str) {
        if self.config.log_unknown_topics {
            warn!(target: "topicbus::publisher", topic, "Topic has no handlers. Event dropped.");
        }
    }
}
