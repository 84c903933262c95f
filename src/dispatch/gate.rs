// Pre-check gate evaluated once per command before any query runs.

use rand::Rng;

/// Turns away a configurable fraction of commands at random.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RejectionGate {
    rate: f64,
}

impl RejectionGate {
    /// `rate` is clamped to [0, 1]; 0 admits everything.
    pub fn new(rate: f64) -> Self {
        let rate = if rate.is_finite() {
            rate.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { rate }
    }

    pub fn disabled() -> Self {
        Self { rate: 0.0 }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn admit(&self) -> bool {
        if self.rate <= 0.0 {
            return true;
        }
        !rand::thread_rng().gen_bool(self.rate)
    }
}

impl Default for RejectionGate {
    fn default() -> Self {
        Self::disabled()
    }
}
