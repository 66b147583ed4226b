use std::sync::{Arc, Mutex};

use weave_core::{action, Action, Nexus};

/// Shared execution log written to by recording actions
pub type Log = Arc<Mutex<Vec<String>>>;

#[allow(dead_code)]
pub fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

/// Action that appends its own name to `log` when run
#[allow(dead_code)]
pub fn recording_action(log: &Log, name: &str) -> Action {
    let log = Arc::clone(log);
    let entry = name.to_string();
    action(name, move || log.lock().unwrap().push(entry.clone()))
}

/// Snapshot of the log contents
#[allow(dead_code)]
pub fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Resolved action names of one extension point
#[allow(dead_code)]
pub fn resolved(nexus: &Nexus, extension_point: &str) -> Vec<String> {
    nexus
        .service(extension_point)
        .expect("extension point should be exported")
        .action_names()
        .into_iter()
        .map(String::from)
        .collect()
}
