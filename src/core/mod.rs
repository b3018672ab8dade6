pub mod args;
pub mod bus;
pub mod dispatch;
pub mod error;
pub mod publisher;
pub mod subscriber;
pub mod topics;
