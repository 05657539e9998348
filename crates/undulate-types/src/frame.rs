// ─────────────────────────────────────────────────────────────────────
// Undulate Kernel — Rigid-Frame Inputs & Restart Record
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

/// Rigid-body inputs handed over by the host solver on every velocity call.
///
/// The generator never interprets them; they are stored and checkpointed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RigidFrame {
    pub incremented_angle: [f64; 3],
    pub center_of_mass: [f64; 3],
    pub tagged_point: [f64; 3],
}

impl RigidFrame {
    pub fn new(
        incremented_angle: [f64; 3],
        center_of_mass: [f64; 3],
        tagged_point: [f64; 3],
    ) -> Self {
        Self {
            incremented_angle,
            center_of_mass,
            tagged_point,
        }
    }
}

/// Everything that survives a checkpoint. Velocity, shape and layout are
/// rebuilt from configuration and mesh on resume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RestartRecord {
    pub current_time: f64,
    pub center_of_mass: [f64; 3],
    pub incremented_angle_from_reference_axis: [f64; 3],
    pub tagged_pt_position: [f64; 3],
}

impl RestartRecord {
    pub fn new(current_time: f64, frame: &RigidFrame) -> Self {
        Self {
            current_time,
            center_of_mass: frame.center_of_mass,
            incremented_angle_from_reference_axis: frame.incremented_angle,
            tagged_pt_position: frame.tagged_point,
        }
    }

    pub fn frame(&self) -> RigidFrame {
        RigidFrame {
            incremented_angle: self.incremented_angle_from_reference_axis,
            center_of_mass: self.center_of_mass,
            tagged_point: self.tagged_pt_position,
        }
    }
}
