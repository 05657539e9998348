// ─────────────────────────────────────────────────────────────────────
// Undulate Kernel — Traveling-Wave Kinematics
// ─────────────────────────────────────────────────────────────────────
//! Lateral body motion of the undulating foil:
//!
//!   φ(X, t) = 2π (X/λ* − St·τ)
//!   Y(X, t) = A(X) sin φ
//!   V(X, t) = π St (A(X)/A_max) cos φ
//!
//! with τ = t because chord and inflow speed are both 1. These two
//! functions are the only source of motion in the kernel.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;
use crate::params::ParameterSet;

/// Closed-form traveling wave for one parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveKinematics {
    envelope: Envelope,
    wavelength: f64,
    strouhal: f64,
    max_amplitude: f64,
}

impl WaveKinematics {
    pub fn new(envelope: Envelope, wavelength: f64, strouhal: f64, max_amplitude: f64) -> Self {
        Self {
            envelope,
            wavelength,
            strouhal,
            max_amplitude,
        }
    }

    pub fn from_params(params: &ParameterSet) -> Self {
        Self::new(
            params.envelope(),
            params.wavelength(),
            params.strouhal(),
            params.max_amplitude(),
        )
    }

    /// Phase 2π (X/λ − St·t).
    #[inline]
    pub fn phase(&self, x: f64, time: f64) -> f64 {
        2.0 * PI * (x / self.wavelength - self.strouhal * time)
    }

    /// Envelope amplitude A(X).
    #[inline]
    pub fn amplitude(&self, x: f64) -> f64 {
        self.envelope.amplitude(x)
    }

    /// Centerline lateral displacement Y(X, t).
    #[inline]
    pub fn displacement(&self, x: f64, time: f64) -> f64 {
        self.amplitude(x) * self.phase(x, time).sin()
    }

    /// Lateral body velocity V(X, t).
    #[inline]
    pub fn velocity(&self, x: f64, time: f64) -> f64 {
        PI * self.strouhal * (self.amplitude(x) / self.max_amplitude) * self.phase(x, time).cos()
    }

    /// Temporal period 1/St of the motion.
    pub fn period(&self) -> f64 {
        1.0 / self.strouhal
    }

    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    pub fn strouhal(&self) -> f64 {
        self.strouhal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use undulate_types::SwimmingMode;

    fn anguilliform_04() -> WaveKinematics {
        WaveKinematics::from_params(&ParameterSet::prescribed(0.06, 0.4))
    }

    #[test]
    fn test_tail_reference_values() {
        let w = anguilliform_04();
        let phase = 2.0 * PI / 0.65;
        assert!((w.phase(1.0, 0.0) - phase).abs() < 1e-12);
        let y = w.displacement(1.0, 0.0);
        let v = w.velocity(1.0, 0.0);
        assert!((y - 0.1 * phase.sin()).abs() < 1e-15);
        assert!((y - (-0.023_931_566)).abs() < 1e-6, "Y(1,0)={y}");
        assert!((v - PI * 0.4 * phase.cos()).abs() < 1e-15);
        assert!((v - (-1.220_121_47)).abs() < 1e-6, "V(1,0)={v}");
    }

    #[test]
    fn test_periodic_in_time() {
        for mode in [SwimmingMode::Anguilliform, SwimmingMode::Carangiform] {
            let params = match mode {
                SwimmingMode::Anguilliform => ParameterSet::prescribed(0.08, 0.6),
                SwimmingMode::Carangiform => ParameterSet::prescribed(0.18, 0.6),
            };
            let w = WaveKinematics::from_params(&params);
            let period = w.period();
            for i in 0..=20 {
                let x = i as f64 / 20.0;
                for &t in &[0.0, 0.37, 1.9, 12.25] {
                    let dy = w.displacement(x, t) - w.displacement(x, t + period);
                    let dv = w.velocity(x, t) - w.velocity(x, t + period);
                    assert!(dy.abs() < 1e-9, "{mode}: Y not periodic at X={x}, t={t}");
                    assert!(dv.abs() < 1e-9, "{mode}: V not periodic at X={x}, t={t}");
                }
            }
        }
    }

    #[test]
    fn test_velocity_peak_at_tail() {
        let w = anguilliform_04();
        // Choose t so that the tail phase is a multiple of 2π: cos φ = 1.
        let t = (1.0 / 0.65 - 2.0) / 0.4;
        let v = w.velocity(1.0, t);
        assert!((v - PI * 0.4).abs() < 1e-9, "V={v}");
    }

    #[test]
    fn test_velocity_is_time_derivative_scaled() {
        // dY/dt = −2π St A cos φ, so V = −dY/dt / (2 A_max).
        let w = WaveKinematics::from_params(&ParameterSet::prescribed(0.12, 0.4));
        let h = 1e-6;
        for &x in &[0.0, 0.3, 0.75, 1.0] {
            let t = 0.8;
            let dydt = (w.displacement(x, t + h) - w.displacement(x, t - h)) / (2.0 * h);
            let expected = -dydt / (2.0 * 0.1);
            assert!((w.velocity(x, t) - expected).abs() < 1e-6, "X={x}");
        }
    }

    #[test]
    fn test_displacement_bounded_by_envelope() {
        let w = WaveKinematics::from_params(&ParameterSet::prescribed(0.24, 0.6));
        for i in 0..=50 {
            let x = i as f64 / 50.0;
            for j in 0..10 {
                let t = j as f64 * 0.13;
                assert!(w.displacement(x, t).abs() <= w.amplitude(x) + 1e-15);
            }
        }
    }
}
