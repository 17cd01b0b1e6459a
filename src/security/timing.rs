//! Timing attack protection utilities
//!
//! Pads authentication attempts to a minimum wall-clock duration so that
//! input-shape failures, unknown accounts and wrong passwords are not
//! distinguishable by response time.

use std::time::{Duration, Instant};

/// Add artificial delay so an operation takes at least `min_duration`
pub async fn add_auth_delay(start_time: Instant, min_duration: Duration) {
    let elapsed = start_time.elapsed();
    if elapsed < min_duration {
        tokio::time::sleep(min_duration - elapsed).await;
    }
}

/// Authentication timing helper
pub struct AuthTimer {
    start: Instant,
    min_duration: Duration,
}

impl AuthTimer {
    /// Create a new auth timer with minimum duration
    pub fn new(min_duration: Duration) -> Self {
        Self {
            start: Instant::now(),
            min_duration,
        }
    }

    /// Wait until minimum duration has elapsed
    pub async fn wait(self) {
        add_auth_delay(self.start, self.min_duration).await;
    }
}
