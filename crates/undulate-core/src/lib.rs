// ─────────────────────────────────────────────────────────────────────
// Undulate Kernel — Core Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Deforming-body kinematics for an undulating 2D foil inside an
//! immersed-boundary flow solver.
//!
//! The host calls `set_velocity(t)` then `set_shape(t)` once per step and
//! reads back per-marker arrays. Everything else here supports that loop:
//! body discretisation, reference-protocol compliance, periodic
//! diagnostics and checkpoints.
//!
//! # Invariants
//!
//! 1. **Fixed parameters**: Strouhal number, frequency, amplitude and
//!    wavelength are set at construction and never change.
//!
//! 2. **Marker alignment**: velocity and shape arrays are both filled by
//!    walking the layout's marker arena, so index i is the same physical
//!    point in both.
//!
//! 3. **Halt is terminal**: a shape update with a time that differs from
//!    the preceding velocity update halts the generator; every later
//!    mutating call is refused.

pub mod compliance;
pub mod diagnostics;
pub mod kinematics;
pub mod layout;
pub mod restart;
pub mod schedule;
pub mod validation;

pub use compliance::{ComplianceChecker, ComplianceFinding, ComplianceReport, Quantity, Verdict};
pub use diagnostics::{
    CollectingSink, DiagnosticEvent, DiagnosticSink, LogSink, ParameterCheck, SilentSink,
};
pub use kinematics::{KinematicsBuilder, KinematicsModel, StepPhase, UndulatingFoilKinematics};
pub use layout::{
    BodyDiscretizer, ImmersedBodyLayout, MarkerSlot, MeshSpacing,
    PositionUpdateMethod, Section, SectionId, StructureParameters, Surface,
};
pub use restart::{InMemoryRestartStore, JsonFileRestartStore, RestartStore};
pub use schedule::{EmissionScheduler, METRICS_INTERVAL, PARAMETER_CHECK_INTERVAL};
pub use validation::{
    format_scientific, instantaneous_strouhal, FlowDiagnostics, MetricsRecorder,
    ValidationHeader, ValidationLog, ValidationRecord,
};
