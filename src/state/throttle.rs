use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Minimum spacing between outbound requests for one source
///
/// The first request also waits the full delay.
#[derive(Debug, Clone)]
pub struct Throttle {
    delay: Duration,
    last_request_time: Option<Instant>,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request_time: None,
        }
    }

    /// Calculates how long to wait before the next request may go out
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_next_request(&self, now: Instant) -> Option<Duration> {
        let remaining = match self.last_request_time {
            Some(last) => self.delay.saturating_sub(now.duration_since(last)),
            None => self.delay,
        };

        if remaining.is_zero() {
            None
        } else {
            Some(remaining)
        }
    }

    /// Records that a request is about to be issued
    pub fn record_request(&mut self, now: Instant) {
        self.last_request_time = Some(now);
    }

    /// Sleeps until the next request may go out, then records it
    ///
    /// # Returns
    ///
    /// * `true` - The caller may issue its request
    /// * `false` - The token was cancelled while waiting
    pub async fn wait(&mut self, cancel: &CancellationToken) -> bool {
        if let Some(delay) = self.time_until_next_request(Instant::now()) {
            tokio::select! {
                _ = cancel.cancelled() => return false,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        if cancel.is_cancelled() {
            return false;
        }

        self.record_request(Instant::now());
        true
    }
}
