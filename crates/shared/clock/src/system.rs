use chrono::Utc;
use microflow_core::Timestamp;
use microflow_ports::Clock;

/// Wall-clock time for live runs
///
/// Cooldowns, hold times and labeling horizons are all compared against
/// this clock's readings, so the engines stay correct under polling jitter.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_monotone_enough() {
        let clock = SystemClock::new();
        let before = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let after = clock.now();

        assert!(after > before);
        assert!((after - before).num_milliseconds() >= 9);
    }
}
