// ─────────────────────────────────────────────────────────────────────
// Undulate Kernel — Kinematics Physics
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Reference parameters, amplitude envelopes and the closed-form
//! traveling wave driving the undulating hydrofoil.

pub mod envelope;
pub mod params;
pub mod wave;

pub use envelope::{anguilliform_envelope, carangiform_envelope, Envelope};
pub use params::{
    naca_half_thickness, naca_thickness_ratio, wavelength_for, ParameterSet, ParameterSummary,
    A_MAX, CHORD_LENGTH, REYNOLDS_NUMBER, ST_HIGH, ST_LOW,
};
pub use wave::WaveKinematics;
