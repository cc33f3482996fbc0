use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Monotonic clock sampled once per frame by the session loop.
pub trait Timer: Clone + Send + Sync {
    /// Nanoseconds since the timer was created.
    fn now(&self) -> u64;

    fn elapsed(&self, since_ns: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(since_ns))
    }

    fn record_frame(&mut self, d: Duration);
    fn frame_stats(&self) -> FrameStats;
}

/// Render cadence over the retained frame samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    pub samples: usize,
    pub average_frame_time_ns: f64,
    pub jitter_ns: f64,
    pub min_frame_time_ns: f64,
    pub max_frame_time_ns: f64,
    pub effective_fps: f64,
}

impl FrameStats {
    pub fn from_samples(frame_times: &[Duration]) -> Self {
        if frame_times.is_empty() {
            return Self::default();
        }
        let times: Vec<f64> = frame_times.iter().map(|d| d.as_nanos() as f64).collect();
        let n = times.len() as f64;
        let avg = times.iter().sum::<f64>() / n;
        let var = times.iter().map(|x| (x - avg).powi(2)).sum::<f64>() / n;
        let min = times.iter().copied().fold(f64::INFINITY, f64::min);
        let max = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            samples: times.len(),
            average_frame_time_ns: avg,
            jitter_ns: var.sqrt(),
            min_frame_time_ns: min,
            max_frame_time_ns: max,
            effective_fps: if avg > 0.0 { 1e9 / avg } else { 0.0 },
        }
    }
}

#[derive(Debug, Clone)]
pub struct HighPrecisionTimer {
    pub start: Instant,
    pub frame_times: Vec<Duration>,
    pub max_samples: usize,
}

impl HighPrecisionTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            frame_times: Vec::with_capacity(1000),
            max_samples: 1000,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_times.len()
    }
}

impl Default for HighPrecisionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for HighPrecisionTimer {
    fn now(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }

    fn record_frame(&mut self, d: Duration) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.remove(0);
        }
        self.frame_times.push(d);
    }

    fn frame_stats(&self) -> FrameStats {
        FrameStats::from_samples(&self.frame_times)
    }
}

/// Clock that only moves when told to. Clones share the same reading,
/// so a test can keep a handle while the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    now_ns: Arc<AtomicU64>,
    frames: Vec<Duration>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, d: Duration) {
        self.now_ns
            .fetch_add(d.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, now_ns: u64) {
        self.now_ns.store(now_ns, Ordering::SeqCst);
    }
}

impl Timer for ManualTimer {
    fn now(&self) -> u64 {
        self.now_ns.load(Ordering::SeqCst)
    }

    fn record_frame(&mut self, d: Duration) {
        self.frames.push(d);
    }

    fn frame_stats(&self) -> FrameStats {
        FrameStats::from_samples(&self.frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_timer_clones_share_time() {
        let t = ManualTimer::new();
        let handle = t.clone();
        handle.advance(Duration::from_millis(1500));
        assert_eq!(t.now(), 1_500_000_000);
        assert_eq!(t.elapsed(500_000_000), Duration::from_secs(1));
    }

    #[test]
    fn elapsed_saturates_for_future_timestamps() {
        let t = ManualTimer::new();
        assert_eq!(t.elapsed(10), Duration::ZERO);
    }

    #[test]
    fn frame_stats_population_jitter() {
        let stats = FrameStats::from_samples(&[
            Duration::from_millis(10),
            Duration::from_millis(20),
            Duration::from_millis(30),
        ]);
        assert_eq!(stats.samples, 3);
        assert!((stats.average_frame_time_ns - 20e6).abs() < 1.0);
        assert!((stats.jitter_ns - 8_164_965.8).abs() < 1.0);
        assert_eq!(stats.min_frame_time_ns, 10e6);
        assert_eq!(stats.max_frame_time_ns, 30e6);
        assert!((stats.effective_fps - 50.0).abs() < 1e-9);
    }

    #[test]
    fn empty_samples_give_zero_stats() {
        assert_eq!(FrameStats::from_samples(&[]), FrameStats::default());
    }

    #[test]
    fn high_precision_timer_keeps_bounded_samples() {
        let mut t = HighPrecisionTimer::new();
        t.max_samples = 2;
        for ms in [1, 2, 3] {
            t.record_frame(Duration::from_millis(ms));
        }
        assert_eq!(t.frame_times, vec![Duration::from_millis(2), Duration::from_millis(3)]);
    }
}
