// ─────────────────────────────────────────────────────────────────────
// Undulate Kernel — Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{KinematicsError, KinematicsResult};
use crate::mode::SwimmingMode;

/// `prescribed_strouhal` when the configuration leaves it out.
pub const DEFAULT_PRESCRIBED_STROUHAL: f64 = 0.4;

/// Which reference derivation of the kinematics to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KinematicsVariant {
    /// Mode from thickness ratio, frequency derived as f = 5·St from a
    /// prescribed Strouhal number.
    #[default]
    Prescribed,
    /// Mode from the `swimming_mode` string, St = 0.6 and f = 3.0 fixed.
    Validation,
}

/// Caller-supplied configuration of the foil kinematics.
///
/// Values that disagree with the reference protocol (amplitude, Reynolds
/// number, adaptation flag) are accepted here and overridden later; see
/// the compliance checker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KinematicsConfig {
    /// Reference derivation to follow.
    /// Default: `prescribed`.
    #[serde(default)]
    pub variant: KinematicsVariant,

    /// Requested swimming mode, `"anguilliform"` or `"carangiform"`.
    /// Required by the validation variant (falls back to anguilliform),
    /// cross-checked only by the prescribed variant.
    #[serde(default)]
    pub swimming_mode: Option<String>,

    /// NACA 4-digit identifier, e.g. `"0012"`.
    pub naca_profile: String,

    /// Maximum thickness over chord. Required.
    pub thickness_ratio: f64,

    /// Prescribed Strouhal number.
    /// Default: 0.4.
    #[serde(default = "default_strouhal")]
    pub prescribed_strouhal: f64,

    /// Requested peak amplitude. Always overridden to 0.1.
    #[serde(default = "default_amplitude")]
    pub base_amplitude: f64,

    /// Requested Reynolds number. Always overridden to 5000.
    #[serde(default = "default_reynolds")]
    pub reynolds_number: f64,

    /// Requested shape adaptation. Always forced off.
    #[serde(default)]
    pub enable_shape_adaptation: bool,

    /// Emit the periodic validation log.
    /// Default: true.
    #[serde(default = "default_true")]
    pub write_validation_data: bool,

    /// Validation log path.
    /// Default: `validation_gupta2022.dat`.
    #[serde(default = "default_log_file")]
    pub validation_log_file: String,
}

fn default_strouhal() -> f64 {
    DEFAULT_PRESCRIBED_STROUHAL
}

fn default_amplitude() -> f64 {
    0.1
}

fn default_reynolds() -> f64 {
    5000.0
}

fn default_true() -> bool {
    true
}

fn default_log_file() -> String {
    "validation_gupta2022.dat".to_string()
}

impl KinematicsConfig {
    /// Minimal configuration for a NACA profile; everything else defaulted.
    pub fn new(naca_profile: impl Into<String>, thickness_ratio: f64) -> Self {
        Self {
            variant: KinematicsVariant::default(),
            swimming_mode: None,
            naca_profile: naca_profile.into(),
            thickness_ratio,
            prescribed_strouhal: default_strouhal(),
            base_amplitude: default_amplitude(),
            reynolds_number: default_reynolds(),
            enable_shape_adaptation: false,
            write_validation_data: default_true(),
            validation_log_file: default_log_file(),
        }
    }

    /// Validate structural soundness. Reference-value divergence is not an
    /// error here.
    pub fn validate(&self) -> KinematicsResult<()> {
        if !self.thickness_ratio.is_finite() || self.thickness_ratio <= 0.0 {
            return Err(KinematicsError::Config(format!(
                "thickness_ratio must be finite and > 0, got {}",
                self.thickness_ratio
            )));
        }
        if !self.prescribed_strouhal.is_finite() || self.prescribed_strouhal <= 0.0 {
            return Err(KinematicsError::Config(format!(
                "prescribed_strouhal must be finite and > 0, got {}",
                self.prescribed_strouhal
            )));
        }
        if self.write_validation_data && self.validation_log_file.trim().is_empty() {
            return Err(KinematicsError::Config(
                "validation_log_file must be set when write_validation_data is on".to_string(),
            ));
        }
        self.requested_mode()?;
        Ok(())
    }

    /// Parse the requested swimming mode, if any.
    ///
    /// An unrecognised string is fatal.
    pub fn requested_mode(&self) -> KinematicsResult<Option<SwimmingMode>> {
        self.swimming_mode
            .as_deref()
            .map(str::parse::<SwimmingMode>)
            .transpose()
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> KinematicsResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| KinematicsError::Config(format!("JSON parse error: {e}")))
    }
}
