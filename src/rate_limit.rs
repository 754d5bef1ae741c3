/// Lets an expensive operation run at most once per interval.
///
/// Time is a monotonic `u64` millisecond count, so deadlines are compared
/// directly; additions saturate instead of wrapping. Checking and recording
/// are separate so a run that fails can be retried right away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimiter {
    last_fired_ms: Option<u64>,
}

impl RateLimiter {
    pub const fn new() -> Self {
        Self { last_fired_ms: None }
    }

    /// Earliest time the next run is allowed, given `interval_ms`.
    /// `None` until the first run, meaning "now".
    pub fn deadline(&self, interval_ms: u64) -> Option<u64> {
        self.last_fired_ms.map(|last| last.saturating_add(interval_ms))
    }

    /// Whether a run is allowed at `now_ms`. Does not record anything.
    pub fn is_due(&self, now_ms: u64, interval_ms: u64) -> bool {
        match self.deadline(interval_ms) {
            Some(deadline) => now_ms >= deadline,
            None => true,
        }
    }

    /// Record a completed run at `now_ms`.
    pub fn mark(&mut self, now_ms: u64) {
        self.last_fired_ms = Some(now_ms);
    }
}
