// ─────────────────────────────────────────────────────────────────────
// Undulate Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all kinematics kernel failures.
#[derive(Error, Debug)]
pub enum KinematicsError {
    /// Invalid or unrecognised configuration (fatal at construction).
    #[error("config error: {0}")]
    Config(String),

    /// The host broke the velocity-then-shape calling contract.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// Body layout could not be built or disagrees with the host structure.
    #[error("layout error: {0}")]
    Layout(String),

    /// A previous contract violation halted the generator.
    #[error("kinematics halted: {0}")]
    Halted(String),

    /// Checkpoint record missing or unreadable.
    #[error("restart error: {0}")]
    Restart(String),

    /// Side-channel output (validation log, restart files) failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Non-finite simulation time handed in by the host.
    #[error("numerical error: {0}")]
    Numerical(String),
}

pub type KinematicsResult<T> = Result<T, KinematicsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let e = KinematicsError::Precondition("time mismatch".into());
        assert_eq!(e.to_string(), "precondition violated: time mismatch");
        let e = KinematicsError::Config("bad".into());
        assert!(e.to_string().starts_with("config error"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let e: KinematicsError = io.into();
        assert!(matches!(e, KinematicsError::Io(_)));
    }
}
