use thiserror::Error;

use crate::core::subscriber::SubscriptionId;
use crate::core::topics::topic::TopicName;

/// Failures reported by the bus.
///
/// Unknown topics and redundant unsubscribes are not errors; they surface as
/// empty / `false` results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("handler {id} on topic '{topic}' panicked: {message}")]
    HandlerPanicked {
        topic: TopicName,
        id: SubscriptionId,
        message: String,
    },
}
