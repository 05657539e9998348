// ─────────────────────────────────────────────────────────────────────
// Undulate Kernel — Undulating Foil Kinematics
// ─────────────────────────────────────────────────────────────────────
//! Per-step state machine driven by the host solver.
//!
//! Each step is exactly two calls: `set_velocity(t)` then `set_shape(t)`
//! with the same `t`. Any contract violation halts the generator for
//! good; the host is expected to abort the run.
//!
//! ```text
//!   Idle ──set_velocity──▶ VelocitySet ──set_shape──▶ Idle
//!                            │    ▲
//!                            └────┘ set_velocity (re-records time)
//!   any violation ──▶ Halted (terminal)
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use undulate_physics::{ParameterSet, WaveKinematics};
use undulate_types::{
    KinematicsConfig, KinematicsError, KinematicsResult, RestartRecord, RigidFrame,
};

use crate::compliance::{ComplianceChecker, ComplianceReport};
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, LogSink, ParameterCheck};
use crate::layout::{BodyDiscretizer, ImmersedBodyLayout, MeshSpacing, StructureParameters};
use crate::restart::RestartStore;
use crate::schedule::{EmissionScheduler, METRICS_INTERVAL, PARAMETER_CHECK_INTERVAL};
use crate::validation::{
    FlowDiagnostics, MetricsRecorder, ValidationHeader, ValidationLog, ValidationRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepPhase {
    Idle,
    VelocitySet,
    Halted,
}

/// Host-facing contract of a deforming-body kinematics generator.
///
/// Arrays are `[streamwise, lateral]`, one entry per marker handle.
pub trait KinematicsModel {
    fn set_velocity(&mut self, time: f64, frame: RigidFrame) -> KinematicsResult<()>;
    fn velocity(&self, level: usize) -> &[Vec<f64>; 2];
    fn set_shape(&mut self, time: f64, angle: f64) -> KinematicsResult<()>;
    fn shape(&self, level: usize) -> &[Vec<f64>; 2];
    fn save_state(&self, store: &dyn RestartStore) -> KinematicsResult<()>;
    fn load_state(&mut self, store: &dyn RestartStore) -> KinematicsResult<()>;
    fn current_time(&self) -> f64;
}

/// Assembles an `UndulatingFoilKinematics` from configuration, structure
/// metadata and the finest-level mesh spacing.
pub struct KinematicsBuilder {
    object_name: String,
    config: KinematicsConfig,
    structure: StructureParameters,
    spacing: MeshSpacing,
    diagnostics: Arc<dyn DiagnosticSink>,
    recorder: Option<Box<dyn MetricsRecorder>>,
}

impl KinematicsBuilder {
    pub fn new(
        object_name: impl Into<String>,
        config: KinematicsConfig,
        structure: StructureParameters,
        spacing: MeshSpacing,
    ) -> Self {
        Self {
            object_name: object_name.into(),
            config,
            structure,
            spacing,
            diagnostics: Arc::new(LogSink::new()),
            recorder: None,
        }
    }

    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    /// Replaces the validation log file named in the configuration.
    /// Ignored when `write_validation_data` is off.
    pub fn recorder(mut self, recorder: Box<dyn MetricsRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn build(self) -> KinematicsResult<UndulatingFoilKinematics> {
        let Self {
            object_name,
            config,
            structure,
            spacing,
            diagnostics,
            recorder,
        } = self;

        config.validate()?;
        let params = ParameterSet::from_config(&config)?;
        let compliance = ComplianceChecker::check(&config, &params);
        let layout =
            BodyDiscretizer::new(params.chord_length(), spacing, params.thickness_ratio())
                .discretize(&structure)?;
        let wave = WaveKinematics::from_params(&params);

        diagnostics.emit(&DiagnosticEvent::Configuration {
            object_name: object_name.clone(),
            summary: params.summary(),
        });
        diagnostics.emit(&DiagnosticEvent::Compliance {
            object_name: object_name.clone(),
            report: compliance.clone(),
        });

        let recorder = if config.write_validation_data {
            open_recorder(&object_name, &config, &params, recorder)
        } else {
            None
        };

        let n = layout.marker_count();
        let mut kin = UndulatingFoilKinematics {
            object_name,
            params,
            wave,
            layout,
            structure,
            compliance,
            diagnostics,
            recorder,
            phase: StepPhase::Idle,
            halt_reason: None,
            current_time: 0.0,
            new_time: 0.0,
            frame: RigidFrame::default(),
            flow: FlowDiagnostics::default(),
            velocity: [vec![0.0; n], vec![0.0; n]],
            shape: [vec![0.0; n], vec![0.0; n]],
            metrics_schedule: EmissionScheduler::new(METRICS_INTERVAL),
            check_schedule: EmissionScheduler::new(PARAMETER_CHECK_INTERVAL),
        };
        kin.fill_shape(None);
        Ok(kin)
    }

    /// Build, then restore the checkpoint stored under the object name.
    pub fn resume(self, store: &dyn RestartStore) -> KinematicsResult<UndulatingFoilKinematics> {
        let mut kin = self.build()?;
        kin.load_state(store)?;
        Ok(kin)
    }
}

fn open_recorder(
    object_name: &str,
    config: &KinematicsConfig,
    params: &ParameterSet,
    supplied: Option<Box<dyn MetricsRecorder>>,
) -> Option<Box<dyn MetricsRecorder>> {
    let mut recorder = match supplied {
        Some(r) => r,
        None => match ValidationLog::create(&config.validation_log_file) {
            Ok(log) => Box::new(log) as Box<dyn MetricsRecorder>,
            Err(e) => {
                log::warn!(
                    "{object_name}: cannot open {}: {e}; validation data disabled",
                    config.validation_log_file
                );
                return None;
            }
        },
    };
    match recorder.begin(&ValidationHeader::new(&config.naca_profile, params)) {
        Ok(()) => Some(recorder),
        Err(e) => {
            log::warn!(
                "{object_name}: validation header not written: {e}; validation data disabled"
            );
            None
        }
    }
}

/// Prescribed traveling-wave kinematics for a 2D undulating foil.
pub struct UndulatingFoilKinematics {
    object_name: String,
    params: ParameterSet,
    wave: WaveKinematics,
    layout: ImmersedBodyLayout,
    structure: StructureParameters,
    compliance: ComplianceReport,
    diagnostics: Arc<dyn DiagnosticSink>,
    recorder: Option<Box<dyn MetricsRecorder>>,
    phase: StepPhase,
    halt_reason: Option<String>,
    current_time: f64,
    new_time: f64,
    frame: RigidFrame,
    flow: FlowDiagnostics,
    velocity: [Vec<f64>; 2],
    shape: [Vec<f64>; 2],
    metrics_schedule: EmissionScheduler,
    check_schedule: EmissionScheduler,
}

impl UndulatingFoilKinematics {
    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    pub fn is_halted(&self) -> bool {
        self.phase == StepPhase::Halted
    }

    pub fn halt_reason(&self) -> Option<&str> {
        self.halt_reason.as_deref()
    }

    pub fn layout(&self) -> &ImmersedBodyLayout {
        &self.layout
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    pub fn wave(&self) -> &WaveKinematics {
        &self.wave
    }

    pub fn structure(&self) -> &StructureParameters {
        &self.structure
    }

    pub fn frame(&self) -> &RigidFrame {
        &self.frame
    }

    pub fn marker_count(&self) -> usize {
        self.layout.marker_count()
    }

    pub fn compliance(&self) -> &ComplianceReport {
        &self.compliance
    }

    pub fn records_validation_data(&self) -> bool {
        self.recorder.is_some()
    }

    pub fn flow_diagnostics(&self) -> FlowDiagnostics {
        self.flow
    }

    /// Latest host measurements; echoed into validation rows only.
    pub fn set_flow_diagnostics(&mut self, swimming_speed: f64, thrust: f64, power: f64) {
        self.flow = FlowDiagnostics {
            swimming_speed,
            thrust,
            power,
        };
    }

    fn ensure_active(&self) -> KinematicsResult<()> {
        match (&self.phase, &self.halt_reason) {
            (StepPhase::Halted, reason) => Err(KinematicsError::Halted(format!(
                "{}: {}",
                self.object_name,
                reason.as_deref().unwrap_or("halted")
            ))),
            _ => Ok(()),
        }
    }

    /// Latch into `Halted`, emit the event and return the prefixed reason.
    fn halt(&mut self, reason: String) -> String {
        self.phase = StepPhase::Halted;
        self.diagnostics.emit(&DiagnosticEvent::Halted {
            object_name: self.object_name.clone(),
            reason: reason.clone(),
        });
        let message = format!("{}: {reason}", self.object_name);
        self.halt_reason = Some(reason);
        message
    }

    /// Centerline at `time`, or the undeformed body when `None`.
    fn fill_shape(&mut self, time: Option<f64>) {
        let dy = self.layout.spacing().dy;
        let markers = self.layout.markers();
        for section in self.layout.sections() {
            let yc = time.map_or(0.0, |t| self.wave.displacement(section.x, t));
            for h in section.handles.clone() {
                self.shape[0][h] = section.position;
                self.shape[1][h] = yc + markers[h].offset(dy);
            }
        }
    }

    fn emit_periodic(&mut self, time: f64) {
        if let Some(recorder) = self.recorder.as_mut() {
            if self.metrics_schedule.fire(time) {
                let row = ValidationRecord::compute(&self.params, &self.wave, time, &self.flow);
                if let Err(e) = recorder.record(&row) {
                    log::warn!("{}: validation row at t={time} not written: {e}", self.object_name);
                }
            }
        }
        if self.check_schedule.fire(time) {
            self.diagnostics
                .emit(&DiagnosticEvent::ParameterCheck(ParameterCheck::new(time, &self.params)));
        }
    }
}

impl KinematicsModel for UndulatingFoilKinematics {
    fn set_velocity(&mut self, time: f64, frame: RigidFrame) -> KinematicsResult<()> {
        self.ensure_active()?;
        if !time.is_finite() {
            let message = self.halt(format!("set_velocity called with non-finite time {time}"));
            return Err(KinematicsError::Numerical(message));
        }
        self.new_time = time;
        self.frame = frame;

        for section in self.layout.sections() {
            let v = self.wave.velocity(section.x, time);
            for h in section.handles.clone() {
                self.velocity[0][h] = 0.0;
                self.velocity[1][h] = v;
            }
        }
        self.phase = StepPhase::VelocitySet;
        self.emit_periodic(time);
        Ok(())
    }

    fn velocity(&self, _level: usize) -> &[Vec<f64>; 2] {
        &self.velocity
    }

    fn set_shape(&mut self, time: f64, _angle: f64) -> KinematicsResult<()> {
        self.ensure_active()?;
        if !self.structure.position_update.updates_shape() {
            return Ok(());
        }
        if self.phase != StepPhase::VelocitySet {
            return Err(KinematicsError::Precondition(self.halt(format!(
                "set_shape at t={time} without a preceding set_velocity"
            ))));
        }
        if time != self.new_time {
            let reason = format!(
                "set_shape time {time} does not match set_velocity time {}",
                self.new_time
            );
            return Err(KinematicsError::Precondition(self.halt(reason)));
        }

        self.fill_shape(Some(time));
        self.current_time = self.new_time;
        self.phase = StepPhase::Idle;
        Ok(())
    }

    fn shape(&self, _level: usize) -> &[Vec<f64>; 2] {
        &self.shape
    }

    fn save_state(&self, store: &dyn RestartStore) -> KinematicsResult<()> {
        store.put_record(&self.object_name, &RestartRecord::new(self.current_time, &self.frame))
    }

    fn load_state(&mut self, store: &dyn RestartStore) -> KinematicsResult<()> {
        self.ensure_active()?;
        let record = store.get_record(&self.object_name)?.ok_or_else(|| {
            KinematicsError::Restart(format!("no restart record for {}", self.object_name))
        })?;
        self.current_time = record.current_time;
        self.new_time = record.current_time;
        self.frame = record.frame();
        self.phase = StepPhase::Idle;
        log::info!("{}: restored at t={}", self.object_name, self.current_time);
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }
}
