// ─────────────────────────────────────────────────────────────────────
// Undulate Kernel — Validation Metrics Log
// ─────────────────────────────────────────────────────────────────────
//! Periodic ASCII record of tail kinematics and host-supplied flow
//! quantities, for comparison against published reference data.
//!
//! Format: a `#` header block, then one line per emission
//!
//!   time tail_amplitude tail_velocity swimming_speed thrust power strouhal_computed
//!
//! in C-style scientific notation with 8 fractional digits.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use undulate_physics::{ParameterSet, WaveKinematics};
use undulate_types::{KinematicsResult, SwimmingMode};

/// Below this swimming speed the instantaneous Strouhal number is reported as 0.
pub const SPEED_EPSILON: f64 = 1e-10;

/// Flow quantities measured by the host solver; echoed into the log only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowDiagnostics {
    pub swimming_speed: f64,
    pub thrust: f64,
    pub power: f64,
}

/// Data for the commented header block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationHeader {
    pub naca_profile: String,
    pub thickness_ratio: f64,
    pub mode: SwimmingMode,
    pub wavelength: f64,
    pub reynolds_number: f64,
    pub strouhal: f64,
    pub frequency: f64,
}

impl ValidationHeader {
    pub fn new(naca_profile: &str, params: &ParameterSet) -> Self {
        Self {
            naca_profile: naca_profile.to_string(),
            thickness_ratio: params.thickness_ratio(),
            mode: params.mode(),
            wavelength: params.wavelength(),
            reynolds_number: params.reynolds_number(),
            strouhal: params.strouhal(),
            frequency: params.frequency(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        vec![
            "# Validation Data for Gupta et al. (2022) Kinematics".to_string(),
            format!("# NACA Profile: {}", self.naca_profile),
            format!("# Thickness ratio: {}", self.thickness_ratio),
            format!("# Swimming mode: {}", self.mode),
            format!("# Wavelength lambda*: {}", self.wavelength),
            format!(
                "# Re = {}, St = {}, f = {}",
                self.reynolds_number, self.strouhal, self.frequency
            ),
            "#".to_string(),
            "# Columns: Time, TailAmplitude, TailVelocity, Swimming_Speed, Thrust, Power, \
             Strouhal_Computed"
                .to_string(),
        ]
    }
}

/// One emitted row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub time: f64,
    pub tail_amplitude: f64,
    pub tail_velocity: f64,
    pub swimming_speed: f64,
    pub thrust: f64,
    pub power: f64,
    pub strouhal_computed: f64,
}

impl ValidationRecord {
    /// Tail (X = 1) kinematics at `time` plus the latest flow quantities.
    pub fn compute(
        params: &ParameterSet,
        wave: &WaveKinematics,
        time: f64,
        flow: &FlowDiagnostics,
    ) -> Self {
        Self {
            time,
            tail_amplitude: wave.displacement(1.0, time),
            tail_velocity: wave.velocity(1.0, time),
            swimming_speed: flow.swimming_speed,
            thrust: flow.thrust,
            power: flow.power,
            strouhal_computed: instantaneous_strouhal(
                params.frequency(),
                params.max_amplitude(),
                flow.swimming_speed,
            ),
        }
    }

    pub fn to_line(&self) -> String {
        [
            self.time,
            self.tail_amplitude,
            self.tail_velocity,
            self.swimming_speed,
            self.thrust,
            self.power,
            self.strouhal_computed,
        ]
        .iter()
        .map(|&v| format_scientific(v))
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// St = 2 f A_max / U, guarded against a vanishing swimming speed.
pub fn instantaneous_strouhal(frequency: f64, max_amplitude: f64, swimming_speed: f64) -> f64 {
    if swimming_speed.abs() > SPEED_EPSILON {
        2.0 * frequency * max_amplitude / swimming_speed
    } else {
        0.0
    }
}

/// `-2.39315664e-02` style: 8 fractional digits, signed two-digit exponent.
pub fn format_scientific(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let raw = format!("{value:.8e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.abs())
        }
        None => raw,
    }
}

/// Destination of validation rows.
pub trait MetricsRecorder: Send + Sync {
    /// Called once before the first record.
    fn begin(&mut self, header: &ValidationHeader) -> KinematicsResult<()>;
    fn record(&mut self, row: &ValidationRecord) -> KinematicsResult<()>;
}

/// Writes the ASCII log to any `Write` sink, flushing after every row.
pub struct ValidationLog<W: Write> {
    writer: W,
    rows: usize,
}

impl ValidationLog<BufWriter<File>> {
    /// Create (truncate) a log file.
    pub fn create(path: impl AsRef<Path>) -> KinematicsResult<Self> {
        let file = File::create(path.as_ref())?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> ValidationLog<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, rows: 0 }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + Sync> MetricsRecorder for ValidationLog<W> {
    fn begin(&mut self, header: &ValidationHeader) -> KinematicsResult<()> {
        for line in header.lines() {
            writeln!(self.writer, "{line}")?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn record(&mut self, row: &ValidationRecord) -> KinematicsResult<()> {
        writeln!(self.writer, "{}", row.to_line())?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }
}
