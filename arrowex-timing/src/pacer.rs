use crate::timer::Timer;
use std::time::Duration;

/// Holds a loop to a fixed tick rate, like a frame limiter.
#[derive(Debug, Clone)]
pub struct TickPacer {
    period_ns: u64,
    next_deadline: Option<u64>,
    overruns: u64,
}

impl TickPacer {
    pub fn new(rate_hz: f64) -> Self {
        let period_ns = if rate_hz > 0.0 {
            (1e9 / rate_hz).round() as u64
        } else {
            0
        };
        Self {
            period_ns,
            next_deadline: None,
            overruns: 0,
        }
    }

    pub fn period(&self) -> Duration {
        Duration::from_nanos(self.period_ns)
    }

    /// Ticks that finished after their deadline
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// Sleeps until the end of the current tick and returns the time slept.
    ///
    /// A late tick does not try to catch up; the schedule restarts from now.
    pub fn wait<T: Timer>(&mut self, timer: &T) -> Duration {
        let now = timer.now();
        let deadline = *self.next_deadline.get_or_insert(now + self.period_ns);
        if now >= deadline {
            if now > deadline {
                self.overruns += 1;
                tracing::trace!(late_ns = now - deadline, "tick overran its deadline");
            }
            self.next_deadline = Some(now + self.period_ns);
            return Duration::ZERO;
        }
        let remaining = Duration::from_nanos(deadline - now);
        timer.sleep(remaining);
        self.next_deadline = Some(deadline + self.period_ns);
        remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualTimer;

    #[test]
    fn sleeps_out_the_rest_of_the_tick() {
        let timer = ManualTimer::new();
        let mut pacer = TickPacer::new(100.0);
        assert_eq!(pacer.period(), Duration::from_millis(10));

        timer.advance(Duration::from_millis(3));
        assert_eq!(pacer.wait(&timer), Duration::from_millis(10));
        assert_eq!(timer.since_start(), Duration::from_millis(13));

        timer.advance(Duration::from_millis(4));
        assert_eq!(pacer.wait(&timer), Duration::from_millis(6));
        assert_eq!(timer.since_start(), Duration::from_millis(23));
        assert_eq!(pacer.overruns(), 0);
    }

    #[test]
    fn late_tick_resyncs() {
        let timer = ManualTimer::new();
        let mut pacer = TickPacer::new(100.0);
        pacer.wait(&timer);
        timer.advance(Duration::from_millis(25));
        assert_eq!(pacer.wait(&timer), Duration::ZERO);
        assert_eq!(pacer.overruns(), 1);
        assert_eq!(pacer.wait(&timer), Duration::from_millis(10));
    }
}
