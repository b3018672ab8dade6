use std::env;

use tracing::subscriber::SetGlobalDefaultError;
use tracing::warn;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::config::LoggingConfig;

/// Installs the global subscriber using `RUST_LOG`, falling back to `info`.
pub fn init_logging() {
    let _ = try_init_logging(&LoggingConfig::default());
}

/// Installs the global subscriber. `RUST_LOG` still takes precedence over
/// the configured filter.
pub fn init_logging_with(config: &LoggingConfig) {
    let _ = try_init_logging(config);
}

/// Returns an error if a global subscriber is already set.
///
/// An unparsable `RUST_LOG` or configured filter falls back to `info` and is
/// reported with a `warn` event once the subscriber is installed.
pub fn try_init_logging(config: &LoggingConfig) -> Result<(), SetGlobalDefaultError> {
    let from_env = env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, rejected) = resolve_filter(from_env, &config.filter);

    let formatting_layer = fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_thread_ids(config.thread_ids)
        .with_target(true)
        .compact();

    let subscriber = Registry::default().with(filter).with(formatting_layer);

    tracing::subscriber::set_global_default(subscriber)?;

    for (directive, error) in rejected {
        warn!(target: "topicbus::logging", directive, %error, "Ignoring invalid log filter");
    }
    Ok(())
}

/// Picks the first valid directive among `RUST_LOG` and the configured one,
/// else `info`. Returns the rejected directives with their parse errors.
fn resolve_filter(
    from_env: Option<String>,
    configured: &str,
) -> (EnvFilter, Vec<(String, String)>) {
    let mut rejected = Vec::new();

    for directive in from_env.into_iter().chain(std::iter::once(configured.to_owned())) {
        match EnvFilter::try_new(&directive) {
            Ok(filter) => return (filter, rejected),
            Err(e) => rejected.push((directive, e.to_string())),
        }
    }

    (EnvFilter::new("info"), rejected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_directive_wins_when_valid() {
        let (filter, rejected) = resolve_filter(Some("topicbus=debug".into()), "warn");

        assert!(rejected.is_empty());
        assert_eq!(filter.to_string(), "topicbus=debug");
    }

    #[test]
    fn configured_directive_used_without_env() {
        let (filter, rejected) = resolve_filter(None, "warn");

        assert!(rejected.is_empty());
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn invalid_directives_are_reported_not_swallowed() {
        let (filter, rejected) = resolve_filter(Some("topicbus=lots".into()), "other=loud");

        assert_eq!(filter.to_string(), "info");
        let directives: Vec<&str> = rejected.iter().map(|(d, _)| d.as_str()).collect();
        assert_eq!(directives, vec!["topicbus=lots", "other=loud"]);
        assert!(rejected.iter().all(|(_, e)| !e.is_empty()));
    }
}
