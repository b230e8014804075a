use rand::Rng;
use std::time::{Duration, Instant};

/// Bounds for the randomized delay between spawns, in milliseconds.
const MIN_DELAY_MS: f64 = 1000.0;
const MAX_DELAY_MS: f64 = 2000.0;

/// Repeating spawn deadline.
///
/// Holds at most one pending deadline and is polled from the frame loop, so
/// there is no callback to cancel: whoever polls decides what firing means,
/// and a deadline that outlives the game round simply gets disarmed at fire
/// time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnTimer {
    next_fire: Option<Instant>,
}

impl SpawnTimer {
    /// Creates a timer that is already due at `now`.
    pub fn armed(now: Instant) -> Self {
        Self {
            next_fire: Some(now),
        }
    }

    /// True once the pending deadline has passed. A disarmed timer is never
    /// due.
    pub fn due(&self, now: Instant) -> bool {
        self.next_fire.is_some_and(|at| now >= at)
    }

    /// Re-arms with a fresh uniformly random delay in [1000, 2000) ms.
    pub fn schedule(&mut self, now: Instant) {
        let delay_ms = rand::rng().random_range(MIN_DELAY_MS..MAX_DELAY_MS);
        self.next_fire = Some(now + Duration::from_secs_f64(delay_ms / 1000.0));
    }

    /// Makes the timer due at `now`, ahead of any scheduled delay.
    pub fn arm(&mut self, now: Instant) {
        self.next_fire = Some(now);
    }

    /// Drops the pending deadline; the timer stays quiet until re-armed.
    pub fn disarm(&mut self) {
        self.next_fire = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_fire.is_some()
    }
}
