// Transient user-facing notices

use std::collections::VecDeque;

/// How long a notice stays visible unless configured otherwise
pub const DEFAULT_NOTICE_MS: i64 = 3_000;

/// A message shown to the user until it expires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub expires_at_ms: i64,
}

/// Queue of notices that dismiss themselves after a fixed time
///
/// Expiry is checked against the time passed in, so nothing runs in the
/// background.
#[derive(Debug, Clone)]
pub struct Notifications {
    ttl_ms: i64,
    notices: VecDeque<Notice>,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_MS)
    }
}

impl Notifications {
    pub fn new(ttl_ms: i64) -> Self {
        Self {
            ttl_ms,
            notices: VecDeque::new(),
        }
    }

    pub fn push(&mut self, message: impl Into<String>, now_ms: i64) {
        let message = message.into();
        tracing::debug!(%message, "Showing notice");
        self.notices.push_back(Notice {
            message,
            expires_at_ms: now_ms.saturating_add(self.ttl_ms),
        });
    }

    /// Drop expired notices and return the ones still visible, oldest first
    pub fn active(&mut self, now_ms: i64) -> Vec<Notice> {
        self.notices.retain(|n| n.expires_at_ms > now_ms);
        self.notices.iter().cloned().collect()
    }
}
