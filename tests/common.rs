use std::sync::{Arc, Mutex, Once};

use topicbus::Arg;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        topicbus::logging::init_logging();
    });
}

/// Shared record of the argument lists a handler has received.
pub type CallLog = Arc<Mutex<Vec<Vec<Arg>>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// A handler that appends every argument list it receives to `log`.
pub fn recorder(log: &CallLog) -> impl Fn(&[Arg]) + Send + Sync + 'static {
    let log = Arc::clone(log);
    move |args: &[Arg]| log.lock().unwrap().push(args.to_vec())
}
