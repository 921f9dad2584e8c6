// Path: crates/telemetry/src/time.rs
use crate::sinks::TxMetricsSink;
use std::time::{Duration, Instant};

/// Reports the lifetime of a scope to a metrics sink when dropped.
pub struct Timer<'a> {
    sink: &'a dyn TxMetricsSink,
    phase: &'static str,
    start: Instant,
}

impl<'a> Timer<'a> {
    /// Starts timing a `phase` call.
    pub fn new(sink: &'a dyn TxMetricsSink, phase: &'static str) -> Self {
        Self {
            sink,
            phase,
            start: Instant::now(),
        }
    }

    /// Time elapsed since the timer started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer<'_> {
    fn drop(&mut self) {
        self.sink
            .observe_tx_duration(self.phase, self.start.elapsed().as_secs_f64());
    }
}
