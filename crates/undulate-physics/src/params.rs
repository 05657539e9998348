// ─────────────────────────────────────────────────────────────────────
// Undulate Kernel — Reference Parameters
// ─────────────────────────────────────────────────────────────────────
//! Fixed physical and kinematic constants of the undulating hydrofoil
//! protocol (Gupta, Puri & Nair 2022, Phys. Rev. Fluids 7, 094102), and
//! the single thickness-derived mode decision.
//!
//! Everything is nondimensional: chord c = 1, inflow speed U = 1, so the
//! convective time τ equals the simulation time t.

use serde::{Deserialize, Serialize};

use undulate_types::{
    KinematicsConfig, KinematicsResult, KinematicsVariant, SwimmingMode,
};

use crate::envelope::Envelope;

pub const CHORD_LENGTH: f64 = 1.0;
pub const INFLOW_SPEED: f64 = 1.0;
pub const REYNOLDS_NUMBER: f64 = 5000.0;
pub const VISCOSITY: f64 = 1.0 / REYNOLDS_NUMBER;
pub const A_MAX: f64 = 0.1;

pub const ANG_WAVELENGTH: f64 = 0.65;
pub const ANG_ALPHA: f64 = 2.18;

pub const CAR_WAVELENGTH: f64 = 1.0;
pub const CAR_C0: f64 = 0.02;
pub const CAR_C1: f64 = -0.08;
pub const CAR_C2: f64 = 0.16;

/// Prescribed Strouhal numbers used by the protocol.
pub const ST_LOW: f64 = 0.4;
pub const ST_HIGH: f64 = 0.6;

/// f = St · U / (2 A_max) = 5 St for U = 1, A_max = 0.1.
pub const STROUHAL_TO_FREQUENCY: f64 = INFLOW_SPEED / (2.0 * A_MAX);

/// Validation variant: St and f are literals rather than derived.
pub const VALIDATION_STROUHAL: f64 = 0.6;
pub const VALIDATION_FREQUENCY: f64 = 3.0;

/// Wavelength λ* of a swimming mode.
pub fn wavelength_for(mode: SwimmingMode) -> f64 {
    match mode {
        SwimmingMode::Anguilliform => ANG_WAVELENGTH,
        SwimmingMode::Carangiform => CAR_WAVELENGTH,
    }
}

/// Thickness ratio encoded in a symmetric NACA 4-digit code (`"0012"` → 0.12).
///
/// Returns `None` for anything that is not four ASCII digits.
pub fn naca_thickness_ratio(code: &str) -> Option<f64> {
    if code.len() != 4 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let percent: u32 = code[2..].parse().ok()?;
    Some(f64::from(percent) / 100.0)
}

/// Half-thickness of a NACA 00XX section at chordwise position x ∈ [0, 1].
///
///   y = 5t (0.2969 √x − 0.1260 x − 0.3516 x² + 0.2843 x³ − 0.1015 x⁴)
pub fn naca_half_thickness(x: f64, thickness_ratio: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    5.0 * thickness_ratio
        * (0.2969 * x.sqrt() - 0.1260 * x - 0.3516 * x * x + 0.2843 * x.powi(3)
            - 0.1015 * x.powi(4))
}

/// Authoritative parameter set. Built once; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    variant: KinematicsVariant,
    mode: SwimmingMode,
    thickness_ratio: f64,
    chord_length: f64,
    inflow_speed: f64,
    reynolds_number: f64,
    viscosity: f64,
    strouhal: f64,
    frequency: f64,
    max_amplitude: f64,
    wavelength: f64,
    envelope: Envelope,
    shape_adaptation: bool,
}

impl ParameterSet {
    /// Prescribed variant: mode from thickness, f = 5 · St.
    pub fn prescribed(thickness_ratio: f64, strouhal: f64) -> Self {
        let mode = SwimmingMode::from_thickness(thickness_ratio);
        Self::build(
            KinematicsVariant::Prescribed,
            mode,
            thickness_ratio,
            strouhal,
            STROUHAL_TO_FREQUENCY * strouhal,
        )
    }

    /// Validation variant: mode given explicitly, St = 0.6, f = 3.0.
    pub fn validation(mode: SwimmingMode, thickness_ratio: f64) -> Self {
        Self::build(
            KinematicsVariant::Validation,
            mode,
            thickness_ratio,
            VALIDATION_STROUHAL,
            VALIDATION_FREQUENCY,
        )
    }

    /// Derive the authoritative set from a caller configuration.
    ///
    /// Amplitude, Reynolds number and adaptation are pinned regardless of
    /// what the configuration asks for. An unrecognised mode string is fatal.
    pub fn from_config(config: &KinematicsConfig) -> KinematicsResult<Self> {
        let requested = config.requested_mode()?;
        let params = match config.variant {
            KinematicsVariant::Prescribed => {
                Self::prescribed(config.thickness_ratio, config.prescribed_strouhal)
            }
            KinematicsVariant::Validation => Self::validation(
                requested.unwrap_or(SwimmingMode::Anguilliform),
                config.thickness_ratio,
            ),
        };
        log::debug!(
            "parameter set: variant={:?} mode={} St={} f={} lambda={}",
            params.variant,
            params.mode,
            params.strouhal,
            params.frequency,
            params.wavelength
        );
        Ok(params)
    }

    fn build(
        variant: KinematicsVariant,
        mode: SwimmingMode,
        thickness_ratio: f64,
        strouhal: f64,
        frequency: f64,
    ) -> Self {
        Self {
            variant,
            mode,
            thickness_ratio,
            chord_length: CHORD_LENGTH,
            inflow_speed: INFLOW_SPEED,
            reynolds_number: REYNOLDS_NUMBER,
            viscosity: VISCOSITY,
            strouhal,
            frequency,
            max_amplitude: A_MAX,
            wavelength: wavelength_for(mode),
            envelope: Envelope::for_mode(mode),
            shape_adaptation: false,
        }
    }

    pub fn variant(&self) -> KinematicsVariant {
        self.variant
    }

    pub fn mode(&self) -> SwimmingMode {
        self.mode
    }

    pub fn thickness_ratio(&self) -> f64 {
        self.thickness_ratio
    }

    pub fn chord_length(&self) -> f64 {
        self.chord_length
    }

    pub fn inflow_speed(&self) -> f64 {
        self.inflow_speed
    }

    pub fn reynolds_number(&self) -> f64 {
        self.reynolds_number
    }

    pub fn viscosity(&self) -> f64 {
        self.viscosity
    }

    pub fn strouhal(&self) -> f64 {
        self.strouhal
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn max_amplitude(&self) -> f64 {
        self.max_amplitude
    }

    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    pub fn envelope(&self) -> Envelope {
        self.envelope
    }

    pub fn envelope_power(&self) -> f64 {
        self.envelope.power()
    }

    /// Always false: the protocol forbids adaptive kinematics.
    pub fn shape_adaptation(&self) -> bool {
        self.shape_adaptation
    }

    /// Snapshot for the construction banner and log headers.
    pub fn summary(&self) -> ParameterSummary {
        ParameterSummary {
            variant: self.variant,
            mode: self.mode,
            thickness_ratio: self.thickness_ratio,
            chord_length: self.chord_length,
            inflow_speed: self.inflow_speed,
            reynolds_number: self.reynolds_number,
            viscosity: self.viscosity,
            strouhal: self.strouhal,
            frequency: self.frequency,
            max_amplitude: self.max_amplitude,
            wavelength: self.wavelength,
            envelope_formula: self.envelope.formula(),
        }
    }
}

/// Flat, serialisable view of a `ParameterSet`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSummary {
    pub variant: KinematicsVariant,
    pub mode: SwimmingMode,
    pub thickness_ratio: f64,
    pub chord_length: f64,
    pub inflow_speed: f64,
    pub reynolds_number: f64,
    pub viscosity: f64,
    pub strouhal: f64,
    pub frequency: f64,
    pub max_amplitude: f64,
    pub wavelength: f64,
    pub envelope_formula: String,
}
