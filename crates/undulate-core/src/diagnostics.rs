// ─────────────────────────────────────────────────────────────────────
// Undulate Kernel — Diagnostic Events
// ─────────────────────────────────────────────────────────────────────
//! Structured diagnostics emitted by the generator and the sinks that
//! receive them.
//!
//! Gating output to a single process is the caller's business: hand a
//! `LogSink::for_rank(rank)` (or a `SilentSink`) to the generator.
//! Kinematics are computed identically whatever sink is installed.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use undulate_physics::{ParameterSet, ParameterSummary};
use undulate_types::SwimmingMode;

use crate::compliance::{ComplianceReport, Verdict};

/// Periodic snapshot confirming the fixed (non-adaptive) parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterCheck {
    pub time: f64,
    pub mode: SwimmingMode,
    pub amplitude: f64,
    pub frequency: f64,
    pub strouhal: f64,
    pub wavelength: f64,
    pub reynolds_number: f64,
    pub thickness_ratio: f64,
}

impl ParameterCheck {
    pub fn new(time: f64, params: &ParameterSet) -> Self {
        Self {
            time,
            mode: params.mode(),
            amplitude: params.max_amplitude(),
            frequency: params.frequency(),
            strouhal: params.strouhal(),
            wavelength: params.wavelength(),
            reynolds_number: params.reynolds_number(),
            thickness_ratio: params.thickness_ratio(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DiagnosticEvent {
    /// Emitted once when a generator is built.
    Configuration {
        object_name: String,
        summary: ParameterSummary,
    },
    /// Result of checking the caller configuration against the protocol.
    Compliance {
        object_name: String,
        report: ComplianceReport,
    },
    ParameterCheck(ParameterCheck),
    /// The generator refused a call and stopped.
    Halted { object_name: String, reason: String },
}

/// Receiver of diagnostic events.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, event: &DiagnosticEvent);
}

/// Forwards events to the `log` facade.
pub struct LogSink {
    enabled: bool,
}

impl LogSink {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Enabled only on the root process.
    pub fn for_rank(rank: usize) -> Self {
        Self { enabled: rank == 0 }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for LogSink {
    fn emit(&self, event: &DiagnosticEvent) {
        if !self.enabled {
            return;
        }
        match event {
            DiagnosticEvent::Configuration {
                object_name,
                summary,
            } => {
                log::info!(
                    "{object_name}: {:?} kinematics, mode={}, h/c={}",
                    summary.variant,
                    summary.mode,
                    summary.thickness_ratio
                );
                log::info!(
                    "{object_name}: A_max={} Re={} St={} f={} lambda*={} nu={}",
                    summary.max_amplitude,
                    summary.reynolds_number,
                    summary.strouhal,
                    summary.frequency,
                    summary.wavelength,
                    summary.viscosity
                );
                log::info!("{object_name}: envelope {}", summary.envelope_formula);
            }
            DiagnosticEvent::Compliance {
                object_name,
                report,
            } => {
                for f in &report.findings {
                    match f.verdict {
                        Verdict::Satisfied => {
                            log::debug!("{object_name}: {} = {} ok", f.quantity, f.supplied)
                        }
                        Verdict::Overridden => log::warn!(
                            "{object_name}: {} = {} (reference {}): {}",
                            f.quantity,
                            f.supplied,
                            f.reference,
                            f.message
                        ),
                        Verdict::Advisory => {
                            log::warn!("{object_name}: {}: {}", f.quantity, f.message)
                        }
                    }
                }
                if report.is_compliant() {
                    log::info!("{object_name}: all parameters comply with the reference protocol");
                } else {
                    log::warn!(
                        "{object_name}: some parameters differ from the reference protocol; \
                         critical values were overridden"
                    );
                }
            }
            DiagnosticEvent::ParameterCheck(c) => log::info!(
                "kinematics check t={:.4}: mode={} A={} f={} St={} lambda*={} Re={} h/c={}",
                c.time,
                c.mode,
                c.amplitude,
                c.frequency,
                c.strouhal,
                c.wavelength,
                c.reynolds_number,
                c.thickness_ratio
            ),
            DiagnosticEvent::Halted {
                object_name,
                reason,
            } => log::error!(">>> {object_name}: KINEMATICS HALTED: {reason} <<<"),
        }
    }
}

/// Drops every event.
pub struct SilentSink;

impl DiagnosticSink for SilentSink {
    fn emit(&self, _event: &DiagnosticEvent) {}
}

/// Keeps every event in memory; useful for hosts that batch their output
/// and for tests.
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn parameter_checks(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, DiagnosticEvent::ParameterCheck(_)))
            .count()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, event: &DiagnosticEvent) {
        self.events.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_gate() {
        assert!(LogSink::for_rank(0).is_enabled());
        assert!(!LogSink::for_rank(3).is_enabled());
    }

    #[test]
    fn test_collecting_sink() {
        let sink = CollectingSink::new();
        let params = ParameterSet::prescribed(0.06, 0.4);
        sink.emit(&DiagnosticEvent::ParameterCheck(ParameterCheck::new(0.0, &params)));
        sink.emit(&DiagnosticEvent::Halted {
            object_name: "foil".into(),
            reason: "test".into(),
        });
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.parameter_checks(), 1);
    }

    #[test]
    fn test_parameter_check_snapshot() {
        let params = ParameterSet::prescribed(0.24, 0.6);
        let c = ParameterCheck::new(4.0, &params);
        assert_eq!(c.mode, SwimmingMode::Carangiform);
        assert!((c.frequency - 3.0).abs() < 1e-12);
        assert_eq!(c.amplitude, 0.1);
    }

    #[test]
    fn test_disabled_log_sink_is_silent() {
        // Must not panic even without a logger installed.
        let sink = LogSink::for_rank(1);
        sink.emit(&DiagnosticEvent::Halted {
            object_name: "foil".into(),
            reason: "nothing".into(),
        });
    }
}
