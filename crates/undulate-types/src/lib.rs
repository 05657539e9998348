// ─────────────────────────────────────────────────────────────────────
// Undulate Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Configuration, error hierarchy and shared value types for the
//! undulating-foil kinematics kernel.

pub mod config;
pub mod error;
pub mod frame;
pub mod mode;

pub use config::{KinematicsConfig, KinematicsVariant, DEFAULT_PRESCRIBED_STROUHAL};
pub use error::{KinematicsError, KinematicsResult};
pub use frame::{RestartRecord, RigidFrame};
pub use mode::{SwimmingMode, MODE_THICKNESS_THRESHOLD};
