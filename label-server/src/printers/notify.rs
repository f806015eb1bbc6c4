//! Operator notification fan-out with repeat suppression
//!
//! Persistence and discovery failures must surface without blocking
//! the operation that hit them. The notifier broadcasts to any number
//! of listeners (SSE handlers, log sinks) and suppresses repeats of
//! the same event key inside a cooldown window, so a flapping backend
//! does not flood the console.

use shared::{Notification, NotificationLevel};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tracing::{info, warn};

const DEFAULT_COOLDOWN: Duration = Duration::from_secs(30);
const CHANNEL_CAPACITY: usize = 64;

/// Cloneable notification hub, created once at startup.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notification>,
    cooldown: Duration,
    last_sent: std::sync::Arc<Mutex<HashMap<String, Instant>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::with_cooldown(DEFAULT_COOLDOWN)
    }

    pub fn with_cooldown(cooldown: Duration) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            sender,
            cooldown,
            last_sent: std::sync::Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Emit a notification unless the same key fired within the
    /// cooldown window. Returns whether the notification went out.
    pub fn notify(&self, level: NotificationLevel, key: &str, message: impl Into<String>) -> bool {
        let now = Instant::now();
        {
            let mut last_sent = match self.last_sent.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(prev) = last_sent.get(key)
                && now.duration_since(*prev) < self.cooldown
            {
                return false;
            }
            last_sent.insert(key.to_string(), now);
        }

        let notification = Notification::new(level, message);
        match level {
            NotificationLevel::Info => info!(message = %notification.message, "notification"),
            _ => warn!(level = %level, message = %notification.message, "notification"),
        }

        // No subscribers is fine, the log line above already landed.
        let _ = self.sender.send(notification);
        true
    }

    /// Clear all cooldown tracking, e.g. after an explicit reconnect.
    pub fn reset(&self) {
        if let Ok(mut last_sent) = self.last_sent.lock() {
            last_sent.clear();
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
