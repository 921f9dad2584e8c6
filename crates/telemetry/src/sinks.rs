// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling core logic from the backend.

use once_cell::sync::OnceCell;

// --- Static Sink Access ---

/// A no-op sink for use in tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// A lazily-initialized static reference to the global `TxMetricsSink` implementation.
pub static SINK: OnceCell<&'static dyn TxMetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns a static reference to the configured transaction metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn tx_metrics() -> &'static dyn TxMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

// --- Trait Definitions ---

/// A sink for metrics about transactions flowing through the stack.
pub trait TxMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the counter of processed transactions, labeled by phase
    /// (`check` / `deliver`) and outcome (`ok` or an error code such as `TX_BAD_NONCE`).
    fn inc_tx_processed(&self, phase: &str, outcome: &str);
    /// Records how long one call spent below the recording layer.
    fn observe_tx_duration(&self, phase: &str, duration_secs: f64);
    /// Increments the counter of faults converted into errors by the recovery layer.
    fn inc_recovered_panics(&self, operation: &str);
}

impl TxMetricsSink for NopSink {
    fn inc_tx_processed(&self, _phase: &str, _outcome: &str) {}
    fn observe_tx_duration(&self, _phase: &str, _duration_secs: f64) {}
    fn inc_recovered_panics(&self, _operation: &str) {}
}
