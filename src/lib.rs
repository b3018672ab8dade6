//! topicbus – an in-process, synchronous, named-topic publish/subscribe bus.
//!
//! This crate exports
//!  * `core`    – topic registry, subscriber/publisher handles and the bus facade
//!  * `config`  – TOML + environment driven configuration
//!  * `logging` – `tracing` subscriber setup
//!  * `shell`   – line commands driving a bus (used by `topicbus-cli`)
//!
//! ```
//! use topicbus::{args, EventBus};
//!
//! let bus: EventBus<usize> = EventBus::new();
//! let id = bus.subscribe("orders", |args| args.len());
//!
//! assert_eq!(bus.publish("orders", &args!["create", 42]), vec![2]);
//! assert!(bus.unsubscribe("orders", Some(id)));
//! assert!(bus.publish("orders", &args!["create", 99]).is_empty());
//! ```

// ───────────────────────────────────────────────────────────
// Public modules
// ───────────────────────────────────────────────────────────
pub mod config;
pub mod core;
pub mod logging;
pub mod shell;

// ───────────────────────────────────────────────────────────
// Re-exports
// ───────────────────────────────────────────────────────────
pub use crate::core::args::Arg;
pub use crate::core::bus::EventBus;
pub use crate::core::dispatch::DispatchPolicy;
pub use crate::core::error::BusError;
pub use crate::core::publisher::Publisher;
pub use crate::core::subscriber::{Handler, Subscriber, SubscriptionId};
pub use config::{load_config, Config};
