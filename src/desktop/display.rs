use std::io::{self, Write};

use notify_rust::Notification;
use tracing::{debug, warn};

/// Where the running countdown is shown.
pub trait StatusDisplay: Send + Sync {
    fn set_title(&self, title: &str);

    /// One-shot message for the user, e.g. when an interval has elapsed.
    fn announce(&self, _message: &str) {}
}

/// Keeps the countdown on a single, rewritten stdout line and raises a
/// desktop notification for announcements.
#[derive(Debug)]
pub struct TerminalDisplay {
    app_name: String,
}

impl TerminalDisplay {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl StatusDisplay for TerminalDisplay {
    fn set_title(&self, title: &str) {
        debug!(title, "status updated");
        let mut stdout = io::stdout();
        if let Err(e) = write!(stdout, "\r{:<16}", title).and_then(|_| stdout.flush()) {
            debug!("Failed to write status line: {}", e);
        }
    }

    fn announce(&self, message: &str) {
        println!();
        if let Err(e) = send_notification(&self.app_name, message) {
            warn!("Failed to send notification: {}", e);
        }
    }
}

fn send_notification(summary: &str, message: &str) -> Result<(), Box<dyn std::error::Error>> {
    Notification::new()
        .summary(summary)
        .body(message)
        .timeout(0) // No auto-dismiss
        .show()?;
    Ok(())
}
