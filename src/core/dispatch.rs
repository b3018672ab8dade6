use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;

use serde::Deserialize;

use crate::core::args::Arg;
use crate::core::error::BusError;
use crate::core::subscriber::Subscription;

/// What `publish` does when a handler panics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPolicy {
    /// The panic unwinds to the publisher's caller; later handlers in the
    /// same dispatch are not invoked.
    #[default]
    Abort,
    /// Each handler runs under `catch_unwind`; a panicking handler is logged
    /// and skipped, the rest still run.
    Isolate,
}

impl fmt::Display for DispatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchPolicy::Abort => f.write_str("abort"),
            DispatchPolicy::Isolate => f.write_str("isolate"),
        }
    }
}

impl FromStr for DispatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(DispatchPolicy::Abort),
            "isolate" => Ok(DispatchPolicy::Isolate),
            other => Err(format!("unknown dispatch policy '{other}' (expected abort|isolate)")),
        }
    }
}

/// Runs one handler, turning a panic into [`BusError::HandlerPanicked`].
pub fn invoke_isolated<R>(
    topic: &str,
    subscription: &Subscription<R>,
    args: &[Arg],
) -> Result<R, BusError> {
    panic::catch_unwind(AssertUnwindSafe(|| subscription.invoke(args))).map_err(|payload| {
        BusError::HandlerPanicked {
            topic: topic.to_owned(),
            id: subscription.id(),
            message: panic_message(payload.as_ref()),
        }
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::subscriber::SubscriptionId;
    use std::sync::Arc;

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Isolate".parse::<DispatchPolicy>(), Ok(DispatchPolicy::Isolate));
        assert_eq!(" abort ".parse::<DispatchPolicy>(), Ok(DispatchPolicy::Abort));
        assert!("retry".parse::<DispatchPolicy>().is_err());
        assert_eq!(DispatchPolicy::default(), DispatchPolicy::Abort);
    }

    #[test]
    fn isolated_invoke_captures_panic_message() {
        let id = SubscriptionId::from_raw(3);
        let sub: Subscription<u8> =
            Subscription::new(id, Arc::new(|_: &[Arg]| -> u8 { panic!("boom") }));

        let err = invoke_isolated("t", &sub, &[]).unwrap_err();
        assert_eq!(
            err,
            BusError::HandlerPanicked {
                topic: "t".into(),
                id,
                message: "boom".into(),
            }
        );
        assert_eq!(err.to_string(), "handler sub-3 on topic 't' panicked: boom");
    }

    #[test]
    fn isolated_invoke_passes_result_through() {
        let sub: Subscription<usize> =
            Subscription::new(SubscriptionId::from_raw(1), Arc::new(|args: &[Arg]| args.len()));

        assert_eq!(invoke_isolated("t", &sub, &[Arg::Null, Arg::Null]), Ok(2));
    }
}
