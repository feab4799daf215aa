//! Tick bookkeeping for the admission scheduler.
//!
//! Each tick:
//! - Drains the intake queue onto the wait list
//! - Advances active messages
//! - Retires finished messages and releases their lanes
//! - Admits waiting messages into free lanes

use std::time::Duration;

/// Configuration for the scheduler tick
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Interval between ticks
    pub tick_interval: Duration,
    /// Columns moved per tick
    pub speed: f64,
    /// Consecutive render failures tolerated per message before giving up
    pub max_render_attempts: u32,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(16),
            speed: 1.0,
            max_render_attempts: 3,
        }
    }
}

impl TickConfig {
    /// Create a new tick config
    pub fn new(tick_interval: Duration, speed: f64) -> Self {
        Self {
            tick_interval,
            speed,
            ..Self::default()
        }
    }

    /// Set the render failure budget
    pub fn with_max_render_attempts(mut self, attempts: u32) -> Self {
        self.max_render_attempts = attempts.max(1);
        self
    }
}

/// What happened during a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Entries pulled off the intake queue
    pub drained: usize,
    /// Active messages moved
    pub advanced: usize,
    /// Messages whose visual was removed and lane released
    pub retired: usize,
    /// Messages moved into a lane
    pub admitted: usize,
    /// Renderer calls that failed
    pub render_failures: usize,
    /// Messages given up on after repeated render failures
    pub discarded: usize,
}

impl TickReport {
    /// Returns true if the tick changed nothing
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// Cumulative counters across ticks
#[derive(Debug, Default, Clone)]
pub struct TickState {
    /// Number of ticks since start
    pub tick_count: u64,
    /// Messages ever created
    pub total_received: u64,
    /// Messages ever admitted
    pub total_admitted: u64,
    /// Messages ever retired
    pub total_retired: u64,
    /// Messages discarded after render failures
    pub total_discarded: u64,
    /// Renderer failures observed
    pub total_render_failures: u64,
}

impl TickState {
    /// Create a new tick state
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one tick's report into the totals
    pub fn record(&mut self, report: &TickReport) {
        self.tick_count += 1;
        self.total_received += report.drained as u64;
        self.total_admitted += report.admitted as u64;
        self.total_retired += report.retired as u64;
        self.total_discarded += report.discarded as u64;
        self.total_render_failures += report.render_failures as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_config_default() {
        let config = TickConfig::default();
        assert_eq!(config.tick_interval, Duration::from_millis(16));
        assert_eq!(config.speed, 1.0);
        assert_eq!(config.max_render_attempts, 3);
    }

    #[test]
    fn test_tick_config_new() {
        let config = TickConfig::new(Duration::from_millis(33), 6.0);
        assert_eq!(config.tick_interval, Duration::from_millis(33));
        assert_eq!(config.speed, 6.0);
    }

    #[test]
    fn test_max_render_attempts_floor() {
        let config = TickConfig::default().with_max_render_attempts(0);
        assert_eq!(config.max_render_attempts, 1);
    }

    #[test]
    fn test_report_idle() {
        assert!(TickReport::default().is_idle());
        let report = TickReport {
            admitted: 1,
            ..TickReport::default()
        };
        assert!(!report.is_idle());
    }

    #[test]
    fn test_state_records_reports() {
        let mut state = TickState::new();
        state.record(&TickReport {
            drained: 3,
            admitted: 2,
            ..TickReport::default()
        });
        state.record(&TickReport {
            retired: 1,
            render_failures: 2,
            discarded: 1,
            ..TickReport::default()
        });
        assert_eq!(state.tick_count, 2);
        assert_eq!(state.total_received, 3);
        assert_eq!(state.total_admitted, 2);
        assert_eq!(state.total_retired, 1);
        assert_eq!(state.total_render_failures, 2);
        assert_eq!(state.total_discarded, 1);
    }
}
