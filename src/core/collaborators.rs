//! Narrow interfaces to the world outside the scanner: time, warnings and
//! the help system that consumes the generated documents.

use std::path::PathBuf;

use tracing::{info, warn};

/// Source of "now" for watermarks, in unix seconds
pub trait Clock {
    fn now(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Receives grammar warnings such as unknown tag keywords
pub trait WarningSink {
    fn log_warning(&self, category: &str, message: &str);
}

/// Forwards warnings to the tracing subscriber
pub struct TracingWarnings;

impl WarningSink for TracingWarnings {
    fn log_warning(&self, category: &str, message: &str) {
        warn!(category, "{}", message);
    }
}

/// Told once per completed sweep that the documentation changed
pub trait HelpNotifier {
    fn documentation_changed(&self);
}

pub struct LogNotifier;

impl HelpNotifier for LogNotifier {
    fn documentation_changed(&self) {
        info!("Documentation changed; help data should be rebuilt");
    }
}

/// Writes the completion time to a marker file watched by the help renderer
pub struct MarkerNotifier {
    path: PathBuf,
}

impl MarkerNotifier {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl HelpNotifier for MarkerNotifier {
    fn documentation_changed(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("Cannot create {}: {}", parent.display(), e);
                return;
            }
        }
        let stamp = chrono::Utc::now().to_rfc3339();
        match std::fs::write(&self.path, format!("{}\n", stamp)) {
            Ok(()) => info!("Help rebuild marker updated: {}", self.path.display()),
            Err(e) => warn!("Cannot write help marker {}: {}", self.path.display(), e),
        }
    }
}
