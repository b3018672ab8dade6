//! Subscriber side of the bus.
//!
//! Provides the `Subscriber` handle, the shared `Handler` type and the
//! `SubscriptionId` token used to remove a single registration.

#[allow(clippy::module_inception)]
pub mod subscriber;

pub use subscriber::{Handler, Subscriber, Subscription, SubscriptionId};
