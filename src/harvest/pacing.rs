//! Inter-source pacing policy
//!
//! Sequential dispatch pauses between sources so the upstream service never
//! sees a burst of back-to-back requests. The policy is a value the dispatch
//! loop consults, so it can be swapped (or zeroed for tests) without touching
//! orchestration logic.

use std::time::Duration;

/// Default pause between sequential source fetches
pub const DEFAULT_INTER_SOURCE_PAUSE: Duration = Duration::from_secs(10);

/// Pacing policy consulted between sequential source fetches
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    delay: Duration,
}

impl Pacing {
    /// A fixed pause of the given length
    pub fn fixed(delay: Duration) -> Self {
        Self { delay }
    }

    /// The production default: a fixed 10 second pause
    pub fn default_inter_source() -> Self {
        Self::fixed(DEFAULT_INTER_SOURCE_PAUSE)
    }

    /// No pause at all (for tests and one-shot runs)
    pub fn none() -> Self {
        Self::fixed(Duration::ZERO)
    }

    /// The configured pause length
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits out one pacing interval
    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::default_inter_source()
    }
}
