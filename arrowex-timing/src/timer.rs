use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic clock with sleep and per-frame bookkeeping
pub trait Timer: Clone + Send + Sync {
    /// Nanoseconds since the timer was created
    fn now(&self) -> u64;
    fn elapsed(&self, ts: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(ts))
    }
    fn since_start(&self) -> Duration {
        Duration::from_nanos(self.now())
    }
    fn sleep(&self, d: Duration);
    fn record_frame(&mut self, d: Duration);
    fn frame_stats(&self) -> FrameTimingStats;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameTimingStats {
    pub frames: usize,
    pub average_frame_time_ns: f64,
    pub jitter_ns: f64,
    pub min_frame_time_ns: f64,
    pub max_frame_time_ns: f64,
    pub effective_fps: f64,
}

impl FrameTimingStats {
    fn from_samples(samples: &[Duration]) -> Self {
        let times: Vec<f64> = samples.iter().map(|d| d.as_nanos() as f64).collect();
        if times.is_empty() {
            return Self::default();
        }
        let avg = times.iter().sum::<f64>() / times.len() as f64;
        let var = times.iter().map(|x| (x - avg).powi(2)).sum::<f64>() / times.len() as f64;
        let min = times.iter().copied().fold(f64::INFINITY, f64::min);
        let max = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            frames: times.len(),
            average_frame_time_ns: avg,
            jitter_ns: var.sqrt(),
            min_frame_time_ns: min,
            max_frame_time_ns: max,
            effective_fps: if avg > 0.0 { 1e9 / avg } else { 0.0 },
        }
    }
}

fn push_bounded(frames: &mut Vec<Duration>, max_samples: usize, d: Duration) {
    if frames.len() >= max_samples {
        frames.remove(0);
    }
    frames.push(d);
}

#[derive(Debug, Clone)]
pub struct HighPrecisionTimer {
    pub start: Instant,
    pub frame_times: Vec<Duration>,
    pub max_samples: usize,
}

impl Timer for HighPrecisionTimer {
    fn now(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }
    fn sleep(&self, d: Duration) {
        self.high_precision_sleep(d)
    }
    fn record_frame(&mut self, d: Duration) {
        push_bounded(&mut self.frame_times, self.max_samples, d);
    }
    fn frame_stats(&self) -> FrameTimingStats {
        FrameTimingStats::from_samples(&self.frame_times)
    }
}

impl HighPrecisionTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            frame_times: Vec::with_capacity(1000),
            max_samples: 1000,
        }
    }

    pub fn high_precision_sleep(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        #[cfg(target_os = "linux")]
        self.linux_sleep(duration);
        #[cfg(not(target_os = "linux"))]
        std::thread::sleep(duration);
    }

    #[cfg(target_os = "linux")]
    fn linux_sleep(&self, duration: Duration) {
        use libc::{clock_nanosleep, timespec, CLOCK_MONOTONIC};

        let req = timespec {
            tv_sec: duration.as_secs() as libc::time_t,
            tv_nsec: duration.subsec_nanos() as libc::c_long,
        };

        // SAFETY: `req` is a valid timespec and the remainder pointer may be null.
        unsafe {
            clock_nanosleep(CLOCK_MONOTONIC, 0, &req, std::ptr::null_mut());
        }
    }
}

impl Default for HighPrecisionTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Clock that only moves when told to; clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    now_ns: Arc<AtomicU64>,
    frame_times: Vec<Duration>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, d: Duration) {
        self.now_ns.fetch_add(d.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, d: Duration) {
        self.now_ns.store(d.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Timer for ManualTimer {
    fn now(&self) -> u64 {
        self.now_ns.load(Ordering::SeqCst)
    }
    /// Sleeping advances the shared clock instantly.
    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
    fn record_frame(&mut self, d: Duration) {
        push_bounded(&mut self.frame_times, 1000, d);
    }
    fn frame_stats(&self) -> FrameTimingStats {
        FrameTimingStats::from_samples(&self.frame_times)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_timer_clones_share_time() {
        let t = ManualTimer::new();
        let other = t.clone();
        t.advance(Duration::from_millis(5));
        assert_eq!(other.now(), 5_000_000);
        other.sleep(Duration::from_millis(1));
        assert_eq!(t.since_start(), Duration::from_millis(6));
        assert_eq!(t.elapsed(1_000_000), Duration::from_millis(5));
    }

    #[test]
    fn frame_stats() {
        let mut t = ManualTimer::new();
        assert_eq!(t.frame_stats(), FrameTimingStats::default());
        t.record_frame(Duration::from_millis(10));
        t.record_frame(Duration::from_millis(20));
        let s = t.frame_stats();
        assert_eq!(s.frames, 2);
        assert_eq!(s.average_frame_time_ns, 15_000_000.0);
        assert_eq!(s.jitter_ns, 5_000_000.0);
        assert_eq!(s.min_frame_time_ns, 10_000_000.0);
        assert_eq!(s.max_frame_time_ns, 20_000_000.0);
        assert!((s.effective_fps - 1e9 / 15_000_000.0).abs() < 1e-9);
    }

    #[test]
    fn high_precision_timer_is_monotonic() {
        let t = HighPrecisionTimer::new();
        let a = t.now();
        t.sleep(Duration::from_micros(200));
        assert!(t.now() >= a + 200_000);
    }
}
