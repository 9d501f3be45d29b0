//! Running average over a bounded trailing time span.

use std::collections::VecDeque;
use std::time::Duration;

/// A running average of f32 samples over a bounded trailing time span.
///
/// Samples are timestamped with a caller-supplied monotonic `Duration`
/// (time since an arbitrary origin, e.g. app start). On every update,
/// samples older than the window span are evicted, so `average()` always
/// reflects the most recent `span` of wall time rather than a fixed
/// sample count.
#[derive(Clone, Debug)]
pub struct MovingAverageWindow {
    span: Duration,
    samples: VecDeque<(Duration, f32)>,
    /// Sum of the retained samples, kept in f64 to limit drift from
    /// incremental add/subtract.
    sum: f64,
    total_samples: u64,
}

impl MovingAverageWindow {
    /// Create an empty window covering the given trailing time span.
    pub fn new(span: Duration) -> Self {
        Self {
            span,
            samples: VecDeque::new(),
            sum: 0.0,
            total_samples: 0,
        }
    }

    /// Incorporate one new measurement taken at time `now`, evicting any
    /// retained samples older than the window span.
    pub fn update(&mut self, now: Duration, sample: f32) {
        self.samples.push_back((now, sample));
        self.sum += f64::from(sample);
        self.total_samples += 1;

        let cutoff = now.saturating_sub(self.span);
        while let Some(&(timestamp, value)) = self.samples.front() {
            if timestamp >= cutoff {
                break;
            }
            self.samples.pop_front();
            self.sum -= f64::from(value);
        }
    }

    /// Forget all history and restart the total sample counter at zero.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.sum = 0.0;
        self.total_samples = 0;
    }

    /// The average of the retained samples, or 0.0 while empty.
    ///
    /// Callers gate on [`sample_count`](Self::sample_count) for warm-up;
    /// the value is not meaningful before then.
    pub fn average(&self) -> f32 {
        if self.samples.is_empty() {
            0.0
        } else {
            (self.sum / self.samples.len() as f64) as f32
        }
    }

    /// Total number of samples seen since the last reset, including
    /// samples that have since aged out of the window.
    pub fn sample_count(&self) -> u64 {
        self.total_samples
    }

    /// The trailing time span this window covers.
    pub fn span(&self) -> Duration {
        self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    /// An empty window reports an average of 0.0 and no samples.
    #[test]
    fn test_empty_window() {
        let window = MovingAverageWindow::new(secs(1.0));
        assert_eq!(window.average(), 0.0);
        assert_eq!(window.sample_count(), 0);
    }

    /// The average of samples inside the span is their arithmetic mean.
    #[test]
    fn test_average_of_retained_samples() {
        let mut window = MovingAverageWindow::new(secs(10.0));
        window.update(secs(0.0), 10.0);
        window.update(secs(0.1), 20.0);
        window.update(secs(0.2), 30.0);
        assert!((window.average() - 20.0).abs() < 1e-5);
        assert_eq!(window.sample_count(), 3);
    }

    /// Samples older than the span are evicted and stop influencing the average.
    #[test]
    fn test_old_samples_age_out() {
        let mut window = MovingAverageWindow::new(secs(1.0));
        window.update(secs(0.0), 100.0);
        window.update(secs(0.5), 100.0);
        // 2.0s later: both old samples fall outside the 1s span.
        window.update(secs(2.0), 10.0);
        assert!((window.average() - 10.0).abs() < 1e-5);
    }

    /// The total sample counter keeps counting past evictions.
    #[test]
    fn test_sample_count_survives_eviction() {
        let mut window = MovingAverageWindow::new(secs(0.1));
        for i in 0..50 {
            window.update(secs(i as f64), 5.0);
        }
        assert_eq!(window.sample_count(), 50);
        // Only the newest sample is retained with a 0.1s span and 1s pacing.
        assert!((window.average() - 5.0).abs() < 1e-5);
    }

    /// Reset forgets history and restarts the counter.
    #[test]
    fn test_reset() {
        let mut window = MovingAverageWindow::new(secs(1.0));
        window.update(secs(0.0), 42.0);
        window.update(secs(0.1), 42.0);
        window.reset();
        assert_eq!(window.average(), 0.0);
        assert_eq!(window.sample_count(), 0);
    }

    /// Zero and negative samples are valid data (a stall drives the average down).
    #[test]
    fn test_zero_samples_accepted() {
        let mut window = MovingAverageWindow::new(secs(10.0));
        window.update(secs(0.0), 60.0);
        window.update(secs(0.1), 0.0);
        assert!((window.average() - 30.0).abs() < 1e-5);
    }
}
