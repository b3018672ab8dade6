use std::env;
use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tempfile::NamedTempFile;
use topicbus::config::{load_config, Config, ConfigError, CONFIG_ENV};
use topicbus::{DispatchPolicy, EventBus};

#[test]
fn load_config_matches_toml() {
    let cfg: Config = load_config("topicbus.toml").expect("failed to load config");

    assert_eq!(cfg.bus.dispatch, DispatchPolicy::Abort);
    assert!(cfg.bus.log_unknown_topics);
    assert_eq!(cfg.logging.filter, "info");
    assert!(!cfg.logging.thread_ids);
}

#[test]
fn explicit_path_is_loaded_and_applied_to_bus() {
    let mut file = NamedTempFile::new().unwrap();
    let body = concat!(
        "[bus]\ndispatch = \"isolate\"\nlog_unknown_topics = false\n\n",
        "[logging]\nfilter = \"topicbus=trace\"",
    );
    writeln!(file, "{body}").unwrap();

    let cfg = load_config(file.path()).unwrap();
    assert_eq!(cfg.bus.dispatch, DispatchPolicy::Isolate);
    assert_eq!(cfg.logging.filter, "topicbus=trace");

    let bus: EventBus = EventBus::with_config(&cfg.bus);
    assert_eq!(bus.dispatch_policy(), DispatchPolicy::Isolate);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_config("does/not/exist.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn malformed_file_is_a_toml_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[bus\ndispatch = ").unwrap();

    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

/// Tests below mutate process-wide `TOPICBUS_*` variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_guard() -> MutexGuard<'static, ()> {
    let guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    for key in [CONFIG_ENV, "TOPICBUS_DISPATCH", "TOPICBUS_LOG_UNKNOWN_TOPICS", "TOPICBUS_LOG"] {
        env::remove_var(key);
    }
    guard
}

fn config_file(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{body}").unwrap();
    file
}

fn path_of(file: &NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}

#[test]
fn explicit_path_beats_config_env_var() {
    let _guard = env_guard();
    let from_env = config_file("[logging]\nfilter = \"from-env\"");
    let explicit = config_file("[logging]\nfilter = \"explicit\"");
    env::set_var(CONFIG_ENV, path_of(&from_env));

    let cfg = Config::load(Some(path_of(&explicit))).unwrap();
    env::remove_var(CONFIG_ENV);

    assert_eq!(cfg.logging.filter, "explicit");
}

#[test]
fn config_env_var_is_used_without_path() {
    let _guard = env_guard();
    let from_env = config_file("[bus]\ndispatch = \"isolate\"");
    env::set_var(CONFIG_ENV, path_of(&from_env));

    let cfg = Config::load(None).unwrap();
    env::remove_var(CONFIG_ENV);

    assert_eq!(cfg.bus.dispatch, DispatchPolicy::Isolate);
}

#[test]
fn defaults_apply_without_path_or_env() {
    let _guard = env_guard();

    assert_eq!(Config::load(None).unwrap(), Config::default());
}

#[test]
fn dispatch_env_override_beats_file() {
    let _guard = env_guard();
    let file = config_file("[bus]\ndispatch = \"abort\"");
    env::set_var("TOPICBUS_DISPATCH", "isolate");

    let cfg = Config::load(Some(path_of(&file)));
    env::remove_var("TOPICBUS_DISPATCH");

    assert_eq!(cfg.unwrap().bus.dispatch, DispatchPolicy::Isolate);
}

#[test]
fn bad_dispatch_env_override_is_reported() {
    let _guard = env_guard();
    env::set_var("TOPICBUS_DISPATCH", "sometimes");

    let result = Config::load(None);
    env::remove_var("TOPICBUS_DISPATCH");

    assert!(matches!(result, Err(ConfigError::Parse(_))));
}
