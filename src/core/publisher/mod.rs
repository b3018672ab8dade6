//! Publisher module for topicbus.
//! Exposes the Publisher interface for synchronous event dispatch.
#[allow(clippy::module_inception)]
pub mod publisher;
pub use publisher::PublisherConfig;

pub use publisher::Publisher;
