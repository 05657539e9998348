// ─────────────────────────────────────────────────────────────────────
// Undulate Kernel — Swimming Mode
// ─────────────────────────────────────────────────────────────────────

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KinematicsError;

/// Thickness ratio at or below which a foil swims anguilliform.
pub const MODE_THICKNESS_THRESHOLD: f64 = 0.10;

/// Undulation family of the body.
///
/// Anguilliform is eel-like whole-body undulation; carangiform concentrates
/// the motion towards the tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwimmingMode {
    Anguilliform,
    Carangiform,
}

impl SwimmingMode {
    /// Thin foils (h/c ≤ 0.10) are anguilliform, thicker ones carangiform.
    /// The boundary value itself is anguilliform.
    pub fn from_thickness(thickness_ratio: f64) -> Self {
        if thickness_ratio <= MODE_THICKNESS_THRESHOLD {
            SwimmingMode::Anguilliform
        } else {
            SwimmingMode::Carangiform
        }
    }

    /// Lowercase configuration key.
    pub fn as_str(&self) -> &'static str {
        match self {
            SwimmingMode::Anguilliform => "anguilliform",
            SwimmingMode::Carangiform => "carangiform",
        }
    }
}

impl FromStr for SwimmingMode {
    type Err = KinematicsError;

    /// Case-sensitive: only `"anguilliform"` and `"carangiform"` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anguilliform" => Ok(SwimmingMode::Anguilliform),
            "carangiform" => Ok(SwimmingMode::Carangiform),
            other => Err(KinematicsError::Config(format!(
                "unknown swimming_mode '{other}', must be 'anguilliform' or 'carangiform'"
            ))),
        }
    }
}

impl fmt::Display for SwimmingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwimmingMode::Anguilliform => f.write_str("Anguilliform"),
            SwimmingMode::Carangiform => f.write_str("Carangiform"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_belongs_to_anguilliform() {
        assert_eq!(SwimmingMode::from_thickness(0.10), SwimmingMode::Anguilliform);
        assert_eq!(SwimmingMode::from_thickness(0.1000001), SwimmingMode::Carangiform);
    }

    #[test]
    fn test_naca_family() {
        assert_eq!(SwimmingMode::from_thickness(0.06), SwimmingMode::Anguilliform);
        assert_eq!(SwimmingMode::from_thickness(0.08), SwimmingMode::Anguilliform);
        assert_eq!(SwimmingMode::from_thickness(0.12), SwimmingMode::Carangiform);
        assert_eq!(SwimmingMode::from_thickness(0.24), SwimmingMode::Carangiform);
    }

    #[test]
    fn test_parse_case_sensitive() {
        assert_eq!(
            "carangiform".parse::<SwimmingMode>().unwrap(),
            SwimmingMode::Carangiform
        );
        assert!("Carangiform".parse::<SwimmingMode>().is_err());
        assert!("thunniform".parse::<SwimmingMode>().is_err());
    }

    #[test]
    fn test_display_and_key() {
        assert_eq!(SwimmingMode::Anguilliform.to_string(), "Anguilliform");
        assert_eq!(SwimmingMode::Anguilliform.as_str(), "anguilliform");
    }
}
