//! Topic module containing the topic handler sequence and the registry that
//! owns every topic.

pub mod registry;
pub mod topic;

pub use registry::TopicRegistry;
pub use topic::{Topic, TopicName};
