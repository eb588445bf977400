use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Fixed courtesy delay between consecutive requests.
pub(crate) struct RateLimiter {
    next_request: Mutex<Instant>,
    delay: Duration,
}

impl RateLimiter {
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            next_request: Mutex::new(Instant::now()),
            delay,
        }
    }

    /// Waits until the previous request is at least `delay` old, then books the next slot.
    pub(crate) async fn wait(&self) {
        let mut next_request = self.next_request.lock().await;
        sleep_until(*next_request).await;
        *next_request = Instant::now() + self.delay;
    }
}
