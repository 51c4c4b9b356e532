//! Remaining-time estimation.
//!
//! One estimator lives per tracked transfer, created when the record is
//! inserted and dropped exactly once — at the finish event or at removal,
//! whichever comes first.

/// EWA smoothing factor for speed samples (20% of the new sample, 80% of
/// the running average). Keeps single-sample spikes from swinging the
/// estimate while still converging within a few updates.
const SPEED_SMOOTHING: f64 = 0.2;

/// Smooths speed samples and estimates seconds until completion.
#[derive(Debug, Default)]
pub struct RemainingTimeEstimator {
    smoothed_bps: f64,
}

impl RemainingTimeEstimator {
    /// Create an estimator with no speed history.
    #[must_use]
    pub const fn new() -> Self {
        Self { smoothed_bps: 0.0 }
    }

    /// Feed a speed sample and estimate the remaining seconds.
    ///
    /// Non-positive samples don't disturb the running average; the previous
    /// smoothed speed keeps driving the estimate through short stalls.
    /// Returns 0 when nothing remains or no speed has been observed yet.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn estimate(&mut self, speed_bps: u64, remaining_bytes: u64) -> u64 {
        if speed_bps > 0 {
            let sample = speed_bps as f64;
            if self.smoothed_bps > 0.0 {
                self.smoothed_bps =
                    SPEED_SMOOTHING.mul_add(sample, (1.0 - SPEED_SMOOTHING) * self.smoothed_bps);
            } else {
                // Seed from the first sample
                self.smoothed_bps = sample;
            }
        }

        if remaining_bytes == 0 || self.smoothed_bps <= 0.0 {
            return 0;
        }

        (remaining_bytes as f64 / self.smoothed_bps).ceil() as u64
    }

    /// The current smoothed speed in bytes per second.
    #[must_use]
    pub const fn smoothed_bps(&self) -> f64 {
        self.smoothed_bps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_samples_yields_zero() {
        let mut est = RemainingTimeEstimator::new();
        assert_eq!(est.estimate(0, 1_000_000), 0);
    }

    #[test]
    fn test_first_sample_seeds_average() {
        let mut est = RemainingTimeEstimator::new();
        assert_eq!(est.estimate(100, 1000), 10);
    }

    #[test]
    fn test_nothing_remaining_yields_zero() {
        let mut est = RemainingTimeEstimator::new();
        assert_eq!(est.estimate(100, 0), 0);
    }

    #[test]
    fn test_spike_is_damped() {
        let mut est = RemainingTimeEstimator::new();
        est.estimate(100, 10_000);

        // A 10x single-sample spike moves the average to 280 B/s, not 1000
        let secs = est.estimate(1000, 10_000);
        assert!(secs > 10, "spike should not dominate: got {secs}s");
        assert!(secs < 100, "average should still move: got {secs}s");
    }

    #[test]
    fn test_stall_keeps_previous_speed() {
        let mut est = RemainingTimeEstimator::new();
        est.estimate(200, 10_000);

        // Zero-speed sample: previous average still drives the estimate
        assert_eq!(est.estimate(0, 10_000), 50);
    }

    #[test]
    fn test_converges_to_steady_speed() {
        let mut est = RemainingTimeEstimator::new();
        for _ in 0..40 {
            est.estimate(500, 1_000_000);
        }
        assert!((est.smoothed_bps() - 500.0).abs() < 1.0);
    }
}
