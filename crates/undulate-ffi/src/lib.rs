// ─────────────────────────────────────────────────────────────────────
// Undulate Kernel — PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied: PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the undulating-foil kinematics kernel.
//!
//! Exposes `KinematicsConfig`, `RustFoilKinematics` and the closed-form
//! wave functions so Python drivers and post-processing scripts can use
//! the same kinematics the solver sees.
//!
//! Install: `pip install -e crates/undulate-ffi` (requires maturin).
//!
//! Usage from Python:
//! ```python
//! from undulate_kernel import KinematicsConfig, RustFoilKinematics
//!
//! cfg = KinematicsConfig("0012", 0.12, write_validation_data=False)
//! foil = RustFoilKinematics("foil", cfg, dx=1/64)
//! foil.set_velocity(0.0)
//! foil.set_shape(0.0)
//! xs, ys = foil.shape()
//! ```

use std::sync::Arc;

use pyo3::exceptions::{PyIOError, PyKeyError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use undulate_core::{
    InMemoryRestartStore, JsonFileRestartStore, KinematicsBuilder, KinematicsModel, LogSink,
    MeshSpacing, PositionUpdateMethod, RestartStore, StepPhase, StructureParameters,
    UndulatingFoilKinematics,
};
use undulate_physics::{naca_thickness_ratio, wavelength_for, Envelope, WaveKinematics, A_MAX};
use undulate_types::{
    KinematicsConfig, KinematicsError, KinematicsVariant, RestartRecord, RigidFrame, SwimmingMode,
};

fn to_py_err(e: KinematicsError) -> PyErr {
    match e {
        KinematicsError::Config(_) | KinematicsError::Layout(_) => {
            PyValueError::new_err(e.to_string())
        }
        KinematicsError::Io(_) => PyIOError::new_err(e.to_string()),
        _ => PyRuntimeError::new_err(e.to_string()),
    }
}

fn parse_mode(mode: &str) -> PyResult<SwimmingMode> {
    mode.parse::<SwimmingMode>().map_err(to_py_err)
}

fn parse_variant(variant: &str) -> PyResult<KinematicsVariant> {
    match variant {
        "prescribed" => Ok(KinematicsVariant::Prescribed),
        "validation" => Ok(KinematicsVariant::Validation),
        other => Err(PyValueError::new_err(format!(
            "unknown variant '{other}' (expected 'prescribed' or 'validation')"
        ))),
    }
}

fn parse_position_update(method: &str) -> PyResult<PositionUpdateMethod> {
    match method {
        "CONSTRAINT_VELOCITY" => Ok(PositionUpdateMethod::ConstraintVelocity),
        "CONSTRAINT_POSITION" => Ok(PositionUpdateMethod::ConstraintPosition),
        "CONSTRAINT_EXPT_POSITION" => Ok(PositionUpdateMethod::ConstraintExptPosition),
        other => Err(PyValueError::new_err(format!(
            "unknown position update method '{other}'"
        ))),
    }
}

fn required<'py, T: FromPyObject<'py>>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<T> {
    dict.get_item(key)?
        .ok_or_else(|| PyKeyError::new_err(format!("restart record is missing '{key}'")))?
        .extract()
}

fn record_to_dict<'py>(py: Python<'py>, record: &RestartRecord) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("current_time", record.current_time)?;
    dict.set_item("center_of_mass", record.center_of_mass.to_vec())?;
    dict.set_item(
        "incremented_angle_from_reference_axis",
        record.incremented_angle_from_reference_axis.to_vec(),
    )?;
    dict.set_item("tagged_pt_position", record.tagged_pt_position.to_vec())?;
    Ok(dict)
}

fn wave_for(mode: &str, strouhal: f64) -> PyResult<WaveKinematics> {
    let mode = parse_mode(mode)?;
    Ok(WaveKinematics::new(
        Envelope::for_mode(mode),
        wavelength_for(mode),
        strouhal,
        A_MAX,
    ))
}

// ─── PyKinematicsConfig ─────────────────────────────────────────────

/// Python-visible kinematics configuration.
#[pyclass(name = "KinematicsConfig")]
#[derive(Clone)]
struct PyKinematicsConfig {
    inner: KinematicsConfig,
}

#[pymethods]
impl PyKinematicsConfig {
    #[new]
    #[pyo3(signature = (
        naca_profile,
        thickness_ratio,
        variant = "prescribed",
        swimming_mode = None,
        prescribed_strouhal = 0.4,
        base_amplitude = 0.1,
        reynolds_number = 5000.0,
        enable_shape_adaptation = false,
        write_validation_data = true,
        validation_log_file = "validation_gupta2022.dat",
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        naca_profile: &str,
        thickness_ratio: f64,
        variant: &str,
        swimming_mode: Option<String>,
        prescribed_strouhal: f64,
        base_amplitude: f64,
        reynolds_number: f64,
        enable_shape_adaptation: bool,
        write_validation_data: bool,
        validation_log_file: &str,
    ) -> PyResult<Self> {
        let config = KinematicsConfig {
            variant: parse_variant(variant)?,
            swimming_mode,
            naca_profile: naca_profile.to_string(),
            thickness_ratio,
            prescribed_strouhal,
            base_amplitude,
            reynolds_number,
            enable_shape_adaptation,
            write_validation_data,
            validation_log_file: validation_log_file.to_string(),
        };
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    /// Construct from JSON string.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = KinematicsConfig::from_json(json).map_err(to_py_err)?;
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    #[getter]
    fn thickness_ratio(&self) -> f64 {
        self.inner.thickness_ratio
    }

    #[getter]
    fn naca_profile(&self) -> String {
        self.inner.naca_profile.clone()
    }

    fn __repr__(&self) -> String {
        format!(
            "KinematicsConfig(naca={}, h/c={}, variant={:?}, St={})",
            self.inner.naca_profile,
            self.inner.thickness_ratio,
            self.inner.variant,
            self.inner.prescribed_strouhal
        )
    }
}

// ─── RustFoilKinematics ─────────────────────────────────────────────

/// Per-step kinematics generator for one immersed foil.
#[pyclass(name = "RustFoilKinematics")]
struct PyFoilKinematics {
    inner: UndulatingFoilKinematics,
}

#[pymethods]
impl PyFoilKinematics {
    #[new]
    #[pyo3(signature = (
        object_name,
        config,
        dx,
        dy = None,
        level = 0,
        position_update = "CONSTRAINT_POSITION",
        lag_idx_range = None,
        rank = 0,
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        object_name: &str,
        config: &PyKinematicsConfig,
        dx: f64,
        dy: Option<f64>,
        level: usize,
        position_update: &str,
        lag_idx_range: Option<(usize, usize)>,
        rank: usize,
    ) -> PyResult<Self> {
        let mut structure = StructureParameters::single_level(level)
            .with_position_update(parse_position_update(position_update)?);
        if let Some((first, last)) = lag_idx_range {
            structure = structure.with_lag_idx_range(first, last);
        }
        let inner = KinematicsBuilder::new(
            object_name,
            config.inner.clone(),
            structure,
            MeshSpacing::new(dx, dy.unwrap_or(dx)),
        )
        .diagnostics(Arc::new(LogSink::for_rank(rank)))
        .build()
        .map_err(to_py_err)?;
        Ok(Self { inner })
    }

    #[pyo3(signature = (
        time,
        incremented_angle = None,
        center_of_mass = None,
        tagged_point = None,
    ))]
    fn set_velocity(
        &mut self,
        time: f64,
        incremented_angle: Option<[f64; 3]>,
        center_of_mass: Option<[f64; 3]>,
        tagged_point: Option<[f64; 3]>,
    ) -> PyResult<()> {
        let frame = RigidFrame::new(
            incremented_angle.unwrap_or_default(),
            center_of_mass.unwrap_or_default(),
            tagged_point.unwrap_or_default(),
        );
        self.inner.set_velocity(time, frame).map_err(to_py_err)
    }

    /// (streamwise, lateral) velocity per marker.
    #[pyo3(signature = (level = 0))]
    fn velocity(&self, level: usize) -> (Vec<f64>, Vec<f64>) {
        let [u, v] = self.inner.velocity(level);
        (u.clone(), v.clone())
    }

    #[pyo3(signature = (time, angle = 0.0))]
    fn set_shape(&mut self, time: f64, angle: f64) -> PyResult<()> {
        self.inner.set_shape(time, angle).map_err(to_py_err)
    }

    /// (streamwise, lateral) position per marker.
    #[pyo3(signature = (level = 0))]
    fn shape(&self, level: usize) -> (Vec<f64>, Vec<f64>) {
        let [x, y] = self.inner.shape(level);
        (x.clone(), y.clone())
    }

    #[pyo3(signature = (swimming_speed, thrust = 0.0, power = 0.0))]
    fn set_flow_diagnostics(&mut self, swimming_speed: f64, thrust: f64, power: f64) {
        self.inner.set_flow_diagnostics(swimming_speed, thrust, power);
    }

    /// Checkpoint as a dict with the four restart fields.
    fn save_state(&self, py: Python<'_>) -> PyResult<PyObject> {
        let store = InMemoryRestartStore::new();
        self.inner.save_state(&store).map_err(to_py_err)?;
        let record = store
            .get_record(self.inner.object_name())
            .map_err(to_py_err)?
            .ok_or_else(|| PyRuntimeError::new_err("checkpoint was not stored"))?;
        Ok(record_to_dict(py, &record)?.into())
    }

    /// Restore from a dict produced by `save_state`.
    fn load_state(&mut self, record: &Bound<'_, PyDict>) -> PyResult<()> {
        let record = RestartRecord {
            current_time: required(record, "current_time")?,
            center_of_mass: required(record, "center_of_mass")?,
            incremented_angle_from_reference_axis: required(
                record,
                "incremented_angle_from_reference_axis",
            )?,
            tagged_pt_position: required(record, "tagged_pt_position")?,
        };
        let store = InMemoryRestartStore::new();
        store
            .put_record(self.inner.object_name(), &record)
            .map_err(to_py_err)?;
        self.inner.load_state(&store).map_err(to_py_err)
    }

    /// Write `<object_name>.json` into `directory`.
    fn save_state_to(&self, directory: &str) -> PyResult<()> {
        let store = JsonFileRestartStore::open(directory).map_err(to_py_err)?;
        self.inner.save_state(&store).map_err(to_py_err)
    }

    fn load_state_from(&mut self, directory: &str) -> PyResult<()> {
        let store = JsonFileRestartStore::open(directory).map_err(to_py_err)?;
        self.inner.load_state(&store).map_err(to_py_err)
    }

    #[getter]
    fn current_time(&self) -> f64 {
        self.inner.current_time()
    }

    #[getter]
    fn phase(&self) -> &'static str {
        match self.inner.phase() {
            StepPhase::Idle => "idle",
            StepPhase::VelocitySet => "velocity_set",
            StepPhase::Halted => "halted",
        }
    }

    #[getter]
    fn is_halted(&self) -> bool {
        self.inner.is_halted()
    }

    #[getter]
    fn marker_count(&self) -> usize {
        self.inner.marker_count()
    }

    #[getter]
    fn mode(&self) -> &'static str {
        self.inner.parameters().mode().as_str()
    }

    /// (s, marker count) per section, streamwise order.
    fn sections(&self) -> Vec<(f64, usize)> {
        self.inner.layout().section_counts().collect()
    }

    /// Parameter summary: mode, St, f, wavelength, amplitude, Re.
    fn parameters(&self, py: Python<'_>) -> PyResult<PyObject> {
        let p = self.inner.parameters();
        let dict = PyDict::new(py);
        dict.set_item("mode", p.mode().as_str())?;
        dict.set_item("strouhal", p.strouhal())?;
        dict.set_item("frequency", p.frequency())?;
        dict.set_item("wavelength", p.wavelength())?;
        dict.set_item("max_amplitude", p.max_amplitude())?;
        dict.set_item("reynolds_number", p.reynolds_number())?;
        dict.set_item("viscosity", p.viscosity())?;
        dict.set_item("thickness_ratio", p.thickness_ratio())?;
        Ok(dict.into())
    }

    /// Divergent compliance findings as (quantity, message) pairs.
    fn compliance_warnings(&self) -> Vec<(String, String)> {
        self.inner
            .compliance()
            .divergent()
            .map(|f| (f.quantity.to_string(), f.message.clone()))
            .collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "RustFoilKinematics(name={}, mode={}, markers={}, t={})",
            self.inner.object_name(),
            self.inner.parameters().mode(),
            self.inner.marker_count(),
            self.inner.current_time()
        )
    }
}

// ─── Closed-form functions ──────────────────────────────────────────

/// Amplitude envelope A(x) for `mode` ("anguilliform" | "carangiform").
#[pyfunction]
fn envelope(mode: &str, x: f64) -> PyResult<f64> {
    Ok(Envelope::for_mode(parse_mode(mode)?).amplitude(x))
}

/// Lateral centerline displacement y(x, t).
#[pyfunction]
#[pyo3(signature = (x, t, mode, strouhal = 0.4))]
fn displacement(x: f64, t: f64, mode: &str, strouhal: f64) -> PyResult<f64> {
    Ok(wave_for(mode, strouhal)?.displacement(x, t))
}

/// Lateral body velocity dy/dt at (x, t).
#[pyfunction]
#[pyo3(signature = (x, t, mode, strouhal = 0.4))]
fn body_velocity(x: f64, t: f64, mode: &str, strouhal: f64) -> PyResult<f64> {
    Ok(wave_for(mode, strouhal)?.velocity(x, t))
}

/// Thickness ratio encoded by a symmetric 4-digit NACA code, e.g. "0012" → 0.12.
#[pyfunction]
fn naca_thickness(code: &str) -> Option<f64> {
    naca_thickness_ratio(code)
}

// ─── Module Registration ────────────────────────────────────────────

/// Undulate Kernel: prescribed undulatory kinematics for immersed foils.
///
/// - `KinematicsConfig`: configuration
/// - `RustFoilKinematics`: per-step velocity/shape generator
/// - `envelope`, `displacement`, `body_velocity`, `naca_thickness`
#[pymodule]
fn undulate_kernel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyKinematicsConfig>()?;
    m.add_class::<PyFoilKinematics>()?;
    m.add_function(wrap_pyfunction!(envelope, m)?)?;
    m.add_function(wrap_pyfunction!(displacement, m)?)?;
    m.add_function(wrap_pyfunction!(body_velocity, m)?)?;
    m.add_function(wrap_pyfunction!(naca_thickness, m)?)?;
    Ok(())
}
