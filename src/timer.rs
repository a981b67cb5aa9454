//! Fixed-interval repeating timer driven by caller-supplied instants.
//!
//! The frame loop owns the clock; tests pass synthetic `Instant`s so the
//! timer never has to sleep.

use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct RepeatingTimer {
    interval: Duration,
    next_fire: Option<Instant>,
}

impl RepeatingTimer {
    pub fn new(interval: Duration) -> Self {
        RepeatingTimer {
            interval,
            next_fire: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.next_fire.is_some()
    }

    /// Arm the timer so it first fires one interval after `now`.
    /// Starting a running timer keeps its current phase.
    pub fn start(&mut self, now: Instant) {
        if self.next_fire.is_none() {
            self.next_fire = Some(now + self.interval);
        }
    }

    pub fn stop(&mut self) {
        self.next_fire = None;
    }

    /// Number of whole intervals that elapsed up to `now`. The timer stays
    /// in phase: a late poll reports every missed fire at once.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut next) = self.next_fire else {
            return 0;
        };
        if self.interval.is_zero() {
            // Degenerate interval: fire once per poll instead of spinning
            self.next_fire = Some(now);
            return 1;
        }
        let mut fired = 0;
        while next <= now {
            next += self.interval;
            fired += 1;
        }
        self.next_fire = Some(next);
        fired
    }

    /// Time left until the next fire, or `None` when stopped.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next_fire
            .map(|next| next.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_timer_never_fires() {
        let mut timer = RepeatingTimer::new(Duration::from_millis(10));
        let t0 = Instant::now();
        assert_eq!(timer.poll(t0 + Duration::from_secs(5)), 0);
        assert_eq!(timer.remaining(t0), None);
    }

    #[test]
    fn stop_disarms() {
        let mut timer = RepeatingTimer::new(Duration::from_millis(10));
        let t0 = Instant::now();
        timer.start(t0);
        timer.stop();
        assert!(!timer.is_running());
        assert_eq!(timer.poll(t0 + Duration::from_millis(50)), 0);
    }
}
