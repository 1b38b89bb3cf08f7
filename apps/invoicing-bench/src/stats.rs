//! Latency summaries for recorded request samples.

use std::time::Duration;

/// Aggregate of one scenario run.
#[derive(Debug)]
pub struct Summary {
    pub requests: usize,
    pub failures: usize,
    pub elapsed: Duration,
    pub min: Duration,
    pub mean: Duration,
    pub p50: Duration,
    pub p95: Duration,
    pub p99: Duration,
    pub max: Duration,
}

impl Summary {
    /// Summarize the latencies of completed requests. `failures` counts
    /// requests that errored; those carry no latency sample.
    #[must_use]
    pub fn from_samples(mut latencies: Vec<Duration>, failures: usize, elapsed: Duration) -> Self {
        latencies.sort_unstable();
        let requests = latencies.len() + failures;
        let mean = if latencies.is_empty() {
            Duration::ZERO
        } else {
            let total: Duration = latencies.iter().sum();
            total / u32::try_from(latencies.len()).unwrap_or(u32::MAX)
        };
        Self {
            requests,
            failures,
            elapsed,
            min: latencies.first().copied().unwrap_or_default(),
            mean,
            p50: percentile(&latencies, 50),
            p95: percentile(&latencies, 95),
            p99: percentile(&latencies, 99),
            max: latencies.last().copied().unwrap_or_default(),
        }
    }

    /// Completed requests per second over the whole run.
    #[must_use]
    pub fn throughput(&self) -> f64 {
        if self.elapsed.is_zero() {
            return 0.0;
        }
        let completed = u32::try_from(self.requests - self.failures).unwrap_or(u32::MAX);
        f64::from(completed) / self.elapsed.as_secs_f64()
    }
}

/// Nearest-rank percentile over an ascending-sorted slice.
fn percentile(sorted: &[Duration], pct: u32) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let rank = (sorted.len() as u64 * u64::from(pct)).div_ceil(100).max(1);
    let idx = usize::try_from(rank - 1).unwrap_or(sorted.len() - 1);
    sorted[idx.min(sorted.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn nearest_rank_percentiles() {
        let latencies: Vec<Duration> = (1..=100).map(ms).collect();
        let summary = Summary::from_samples(latencies, 0, Duration::from_secs(10));
        assert_eq!(summary.requests, 100);
        assert_eq!(summary.min, ms(1));
        assert_eq!(summary.p50, ms(50));
        assert_eq!(summary.p95, ms(95));
        assert_eq!(summary.p99, ms(99));
        assert_eq!(summary.max, ms(100));
        assert!((summary.throughput() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn failures_count_against_requests_not_percentiles() {
        let summary = Summary::from_samples(vec![ms(10), ms(20)], 3, Duration::from_secs(1));
        assert_eq!(summary.requests, 5);
        assert_eq!(summary.failures, 3);
        assert_eq!(summary.max, ms(20));
        assert!((summary.throughput() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_sample_set_is_all_zeroes() {
        let summary = Summary::from_samples(Vec::new(), 0, Duration::ZERO);
        assert_eq!(summary.requests, 0);
        assert_eq!(summary.mean, Duration::ZERO);
        assert!(summary.throughput().abs() < f64::EPSILON);
    }
}
