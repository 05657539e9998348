// ─────────────────────────────────────────────────────────────────────
// Undulate Kernel — Amplitude Envelopes
// ─────────────────────────────────────────────────────────────────────
//! Closed-form amplitude envelopes A(X), X ∈ [0, 1] from head to tail.
//!
//!   Anguilliform: A(X) = A_max · exp[α (X − 1)],   α = 2.18
//!   Carangiform:  A(X) = c0 + c1 X + c2 X²,         (0.02, −0.08, 0.16)
//!
//! Both reach A_max = 0.1 at the tail. Evaluation outside [0, 1] is
//! allowed and never fails; keeping X in range is the caller's job.

use serde::{Deserialize, Serialize};

use undulate_types::SwimmingMode;

use crate::params::{ANG_ALPHA, A_MAX, CAR_C0, CAR_C1, CAR_C2};

/// Amplitude envelope of the traveling wave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Envelope {
    Exponential { a_max: f64, alpha: f64 },
    Quadratic { c0: f64, c1: f64, c2: f64 },
}

impl Envelope {
    /// Reference envelope of a swimming mode.
    pub fn for_mode(mode: SwimmingMode) -> Self {
        match mode {
            SwimmingMode::Anguilliform => Envelope::Exponential {
                a_max: A_MAX,
                alpha: ANG_ALPHA,
            },
            SwimmingMode::Carangiform => Envelope::Quadratic {
                c0: CAR_C0,
                c1: CAR_C1,
                c2: CAR_C2,
            },
        }
    }

    /// A(X).
    #[inline]
    pub fn amplitude(&self, x: f64) -> f64 {
        match *self {
            Envelope::Exponential { a_max, alpha } => a_max * (alpha * (x - 1.0)).exp(),
            Envelope::Quadratic { c0, c1, c2 } => c0 + c1 * x + c2 * x * x,
        }
    }

    /// Exponent describing the envelope family (1 exponential, 2 quadratic).
    pub fn power(&self) -> f64 {
        match self {
            Envelope::Exponential { .. } => 1.0,
            Envelope::Quadratic { .. } => 2.0,
        }
    }

    /// Human-readable formula for banners and log headers.
    pub fn formula(&self) -> String {
        match *self {
            Envelope::Exponential { a_max, alpha } => {
                format!("A(X) = {a_max} * exp[{alpha}(X - 1)]")
            }
            Envelope::Quadratic { c0, c1, c2 } => {
                format!("A(X) = {c0} + ({c1})X + {c2}X^2")
            }
        }
    }
}

/// Anguilliform reference envelope.
pub fn anguilliform_envelope(x: f64) -> f64 {
    Envelope::for_mode(SwimmingMode::Anguilliform).amplitude(x)
}

/// Carangiform reference envelope.
pub fn carangiform_envelope(x: f64) -> f64 {
    Envelope::for_mode(SwimmingMode::Carangiform).amplitude(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anguilliform_endpoints() {
        assert!((anguilliform_envelope(1.0) - 0.1).abs() < 1e-15);
        let head = 0.1 * (-2.18f64).exp();
        assert!((anguilliform_envelope(0.0) - head).abs() < 1e-15);
        assert!((anguilliform_envelope(0.0) - 0.0113).abs() < 1e-4);
    }

    #[test]
    fn test_anguilliform_strictly_increasing() {
        let mut prev = anguilliform_envelope(0.0);
        for i in 1..=1000 {
            let a = anguilliform_envelope(i as f64 / 1000.0);
            assert!(a > prev, "A not increasing at X={}", i as f64 / 1000.0);
            prev = a;
        }
    }

    #[test]
    fn test_carangiform_endpoints() {
        assert!((carangiform_envelope(0.0) - 0.02).abs() < 1e-15);
        assert!((carangiform_envelope(1.0) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_carangiform_single_interior_minimum() {
        let n = 1000;
        let samples: Vec<f64> = (0..=n)
            .map(|i| carangiform_envelope(i as f64 / n as f64))
            .collect();
        let minima: Vec<usize> = (1..n)
            .filter(|&i| samples[i] < samples[i - 1] && samples[i] <= samples[i + 1])
            .collect();
        assert_eq!(minima.len(), 1, "minima at {minima:?}");
        let x_min = minima[0] as f64 / n as f64;
        assert!((x_min - 0.25).abs() < 2e-3, "x_min={x_min}");
        assert!((samples[minima[0]] - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_outside_domain_finite() {
        for &x in &[-5.0, -1.0, 2.0, 10.0] {
            assert!(anguilliform_envelope(x).is_finite());
            assert!(carangiform_envelope(x).is_finite());
        }
    }

    #[test]
    fn test_power_and_formula() {
        let ang = Envelope::for_mode(SwimmingMode::Anguilliform);
        let car = Envelope::for_mode(SwimmingMode::Carangiform);
        assert_eq!(ang.power(), 1.0);
        assert_eq!(car.power(), 2.0);
        assert!(ang.formula().contains("exp"));
        assert!(car.formula().contains("X^2"));
    }
}
