// ─────────────────────────────────────────────────────────────────────
// Undulate Kernel — Protocol Compliance Checker
// ─────────────────────────────────────────────────────────────────────
//! Compares a caller configuration with the authoritative parameter set.
//!
//! The result is a plain report value. Nothing is rejected and nothing is
//! printed here: divergent values are either overridden by the parameter
//! set or flagged as advisory, and the caller decides where the report
//! goes (see `diagnostics`).

use std::fmt;

use serde::{Deserialize, Serialize};

use undulate_physics::{
    naca_thickness_ratio, ParameterSet, A_MAX, REYNOLDS_NUMBER, ST_HIGH, ST_LOW,
};
use undulate_types::{
    KinematicsConfig, KinematicsVariant, SwimmingMode, DEFAULT_PRESCRIBED_STROUHAL,
    MODE_THICKNESS_THRESHOLD,
};

pub const AMPLITUDE_TOL: f64 = 1e-6;
pub const REYNOLDS_TOL: f64 = 1e-3;
pub const STROUHAL_TOL: f64 = 1e-6;
pub const NACA_TOL: f64 = 1e-6;

/// Quantity examined by a compliance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Amplitude,
    ReynoldsNumber,
    ShapeAdaptation,
    Strouhal,
    ThicknessMode,
    RequestedMode,
    NacaProfile,
    Wavelength,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quantity::Amplitude => "amplitude",
            Quantity::ReynoldsNumber => "reynolds_number",
            Quantity::ShapeAdaptation => "shape_adaptation",
            Quantity::Strouhal => "strouhal",
            Quantity::ThicknessMode => "thickness_mode",
            Quantity::RequestedMode => "requested_mode",
            Quantity::NacaProfile => "naca_profile",
            Quantity::Wavelength => "wavelength",
        };
        f.write_str(name)
    }
}

/// Outcome of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Supplied value matches the reference.
    Satisfied,
    /// Supplied value differs and was replaced by the reference value.
    Overridden,
    /// Supplied value differs from common practice; kept as is.
    Advisory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceFinding {
    pub quantity: Quantity,
    pub supplied: String,
    pub reference: String,
    pub verdict: Verdict,
    pub message: String,
}

impl ComplianceFinding {
    pub fn is_divergent(&self) -> bool {
        self.verdict != Verdict::Satisfied
    }
}

/// All findings of one configuration check, in check order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub findings: Vec<ComplianceFinding>,
}

impl ComplianceReport {
    pub fn is_compliant(&self) -> bool {
        self.findings.iter().all(|f| !f.is_divergent())
    }

    pub fn divergent(&self) -> impl Iterator<Item = &ComplianceFinding> {
        self.findings.iter().filter(|f| f.is_divergent())
    }

    pub fn overridden(&self) -> impl Iterator<Item = &ComplianceFinding> {
        self.findings.iter().filter(|f| f.verdict == Verdict::Overridden)
    }

    pub fn finding(&self, quantity: Quantity) -> Option<&ComplianceFinding> {
        self.findings.iter().find(|f| f.quantity == quantity)
    }

    fn push(
        &mut self,
        quantity: Quantity,
        supplied: impl fmt::Display,
        reference: impl fmt::Display,
        verdict: Verdict,
        message: impl Into<String>,
    ) {
        self.findings.push(ComplianceFinding {
            quantity,
            supplied: supplied.to_string(),
            reference: reference.to_string(),
            verdict,
            message: message.into(),
        });
    }
}

/// Stateless checker; see module docs.
pub struct ComplianceChecker;

impl ComplianceChecker {
    pub fn check(config: &KinematicsConfig, params: &ParameterSet) -> ComplianceReport {
        let mut report = ComplianceReport::default();

        if (config.base_amplitude - A_MAX).abs() > AMPLITUDE_TOL {
            report.push(
                Quantity::Amplitude,
                config.base_amplitude,
                A_MAX,
                Verdict::Overridden,
                format!("base_amplitude overridden to {A_MAX}"),
            );
        } else {
            report.push(Quantity::Amplitude, config.base_amplitude, A_MAX, Verdict::Satisfied, "");
        }

        if (config.reynolds_number - REYNOLDS_NUMBER).abs() > REYNOLDS_TOL {
            report.push(
                Quantity::ReynoldsNumber,
                config.reynolds_number,
                REYNOLDS_NUMBER,
                Verdict::Overridden,
                format!("Re overridden to {REYNOLDS_NUMBER}"),
            );
        } else {
            report.push(
                Quantity::ReynoldsNumber,
                config.reynolds_number,
                REYNOLDS_NUMBER,
                Verdict::Satisfied,
                "",
            );
        }

        if config.enable_shape_adaptation {
            report.push(
                Quantity::ShapeAdaptation,
                true,
                false,
                Verdict::Overridden,
                "enable_shape_adaptation forced off",
            );
        } else {
            report.push(Quantity::ShapeAdaptation, false, false, Verdict::Satisfied, "");
        }

        Self::check_strouhal(config, params, &mut report);
        Self::check_mode(config, params, &mut report);

        match naca_thickness_ratio(&config.naca_profile) {
            Some(t) if (t - config.thickness_ratio).abs() <= NACA_TOL => {
                report.push(Quantity::NacaProfile, &config.naca_profile, t, Verdict::Satisfied, "");
            }
            Some(t) => report.push(
                Quantity::NacaProfile,
                &config.naca_profile,
                t,
                Verdict::Advisory,
                format!(
                    "NACA{} implies h/c = {t}, thickness_ratio is {}",
                    config.naca_profile, config.thickness_ratio
                ),
            ),
            None => report.push(
                Quantity::NacaProfile,
                &config.naca_profile,
                "00XX",
                Verdict::Advisory,
                "naca_profile is not a symmetric 4-digit code",
            ),
        }

        report.push(
            Quantity::Wavelength,
            params.wavelength(),
            params.wavelength(),
            Verdict::Satisfied,
            format!("{} wavelength", params.mode()),
        );

        report
    }

    fn check_strouhal(
        config: &KinematicsConfig,
        params: &ParameterSet,
        report: &mut ComplianceReport,
    ) {
        let st = config.prescribed_strouhal;
        match params.variant() {
            KinematicsVariant::Prescribed => {
                let standard =
                    (st - ST_LOW).abs() <= STROUHAL_TOL || (st - ST_HIGH).abs() <= STROUHAL_TOL;
                let verdict = if standard { Verdict::Satisfied } else { Verdict::Advisory };
                let message = if standard {
                    String::new()
                } else {
                    format!("prescribed_strouhal = {st}; protocol uses {ST_LOW} or {ST_HIGH}")
                };
                let reference = format!("{ST_LOW}|{ST_HIGH}");
                report.push(Quantity::Strouhal, st, reference, verdict, message);
            }
            KinematicsVariant::Validation => {
                // The validation run has no Strouhal input of its own; the
                // untouched default is not a request.
                let reference = params.strouhal();
                if (st - reference).abs() <= STROUHAL_TOL {
                    report.push(Quantity::Strouhal, st, reference, Verdict::Satisfied, "");
                } else if (st - DEFAULT_PRESCRIBED_STROUHAL).abs() <= STROUHAL_TOL {
                    let note = format!("default unused; validation runs at St = {reference}");
                    report.push(Quantity::Strouhal, st, reference, Verdict::Satisfied, note);
                } else {
                    report.push(
                        Quantity::Strouhal,
                        st,
                        reference,
                        Verdict::Overridden,
                        format!("validation variant runs at St = {reference}"),
                    );
                }
            }
        }
    }

    fn check_mode(config: &KinematicsConfig, params: &ParameterSet, report: &mut ComplianceReport) {
        let ratio = config.thickness_ratio;
        let mode = params.mode();
        let mismatch = match mode {
            SwimmingMode::Anguilliform => ratio > MODE_THICKNESS_THRESHOLD,
            SwimmingMode::Carangiform => ratio < MODE_THICKNESS_THRESHOLD,
        };
        if mismatch {
            let hint = match mode {
                SwimmingMode::Anguilliform => {
                    "anguilliform typically uses h/c <= 0.08 (NACA0006, 0008)"
                }
                SwimmingMode::Carangiform => {
                    "carangiform typically uses h/c >= 0.12 (NACA0012, 0018, 0024)"
                }
            };
            report.push(Quantity::ThicknessMode, ratio, mode, Verdict::Advisory, hint);
        } else {
            report.push(Quantity::ThicknessMode, ratio, mode, Verdict::Satisfied, "");
        }

        if params.variant() == KinematicsVariant::Prescribed {
            if let Ok(Some(requested)) = config.requested_mode() {
                if requested != mode {
                    report.push(
                        Quantity::RequestedMode,
                        requested,
                        mode,
                        Verdict::Advisory,
                        format!("h/c = {ratio} selects {mode}; requested {requested} ignored"),
                    );
                } else {
                    report.push(Quantity::RequestedMode, requested, mode, Verdict::Satisfied, "");
                }
            }
        }
    }
}
