// ─────────────────────────────────────────────────────────────────────
// Undulate Kernel — End-to-End Host Loop
// ─────────────────────────────────────────────────────────────────────

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use undulate_core::{
    CollectingSink, DiagnosticEvent, JsonFileRestartStore, KinematicsBuilder, KinematicsModel,
    MeshSpacing, Quantity, StepPhase, StructureParameters, Verdict,
};
use undulate_types::{KinematicsConfig, RigidFrame, SwimmingMode};

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("undulate-e2e-{tag}-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_host_loop_writes_validation_log() {
    let dir = scratch_dir("log");
    let log_path = dir.join("validation.dat");
    let json = format!(
        r#"{{"naca_profile": "0006", "thickness_ratio": 0.06,
            "prescribed_strouhal": 0.4, "validation_log_file": {:?}}}"#,
        log_path.to_string_lossy()
    );
    let config = KinematicsConfig::from_json(&json).unwrap();
    let sink = Arc::new(CollectingSink::new());
    let mut kin = KinematicsBuilder::new(
        "eel",
        config,
        StructureParameters::single_level(3),
        MeshSpacing::new(0.05, 0.02),
    )
    .diagnostics(sink.clone())
    .build()
    .unwrap();
    assert!(kin.records_validation_data());
    assert_eq!(kin.parameters().mode(), SwimmingMode::Anguilliform);
    assert!((kin.parameters().frequency() - 2.0).abs() < 1e-12);
    assert!(kin.compliance().is_compliant());

    let dt = 0.025;
    for step in 0..=40 {
        let t = step as f64 * dt;
        kin.set_flow_diagnostics(0.3, 0.01, 0.05);
        kin.set_velocity(t, RigidFrame::default()).unwrap();
        kin.set_shape(t, 0.0).unwrap();
    }
    assert_eq!(kin.phase(), StepPhase::Idle);
    assert!((kin.current_time() - 1.0).abs() < 1e-12);
    drop(kin);

    let text = fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    let header = lines.iter().take_while(|l| l.starts_with('#')).count();
    assert_eq!(header, 8);
    let rows = &lines[header..];
    assert!(rows.len() >= 10 && rows.len() <= 21, "{} rows", rows.len());

    // First row at t = 0, tail at X = 1.
    let first: Vec<f64> = rows[0].split(' ').map(|c| c.parse().unwrap()).collect();
    assert_eq!(first.len(), 7);
    assert_eq!(first[0], 0.0);
    assert!((first[1] - (-0.023931566428755636)).abs() < 1e-8);
    assert!((first[2] - (-1.2201214722755234)).abs() < 1e-7);
    assert!((first[3] - 0.3).abs() < 1e-8);

    assert_eq!(sink.parameter_checks(), 1);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_checkpoint_and_resume_through_files() {
    let dir = scratch_dir("restart");
    let store = JsonFileRestartStore::open(&dir).unwrap();
    let mut config = KinematicsConfig::new("0024", 0.24);
    config.write_validation_data = false;
    config.reynolds_number = 10_000.0;

    let make = || {
        KinematicsBuilder::new(
            "shark",
            config.clone(),
            StructureParameters::single_level(0),
            MeshSpacing::uniform(0.02),
        )
        .diagnostics(Arc::new(CollectingSink::new()))
    };

    let mut kin = make().build().unwrap();
    let finding = kin.compliance().finding(Quantity::ReynoldsNumber).unwrap();
    assert_eq!(finding.verdict, Verdict::Overridden);
    assert_eq!(kin.parameters().reynolds_number(), 5000.0);

    let frame = RigidFrame::new([0.0, 0.0, 0.05], [0.5, -0.002, 0.0], [1.0, 0.01, 0.0]);
    kin.set_velocity(2.5, frame).unwrap();
    kin.set_shape(2.5, 0.0).unwrap();
    kin.save_state(&store).unwrap();
    assert!(store.path_for("shark").exists());

    let mut resumed = make().resume(&store).unwrap();
    assert_eq!(resumed.current_time(), 2.5);
    assert_eq!(resumed.frame(), &frame);
    assert_eq!(resumed.parameters().mode(), SwimmingMode::Carangiform);

    // Same step replayed on the resumed generator gives the same arrays.
    resumed.set_velocity(2.5, frame).unwrap();
    resumed.set_shape(2.5, 0.0).unwrap();
    assert_eq!(resumed.velocity(0), kin.velocity(0));
    assert_eq!(resumed.shape(0), kin.shape(0));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_violation_is_reported_once_and_sticks() {
    let mut config = KinematicsConfig::new("0012", 0.12);
    config.write_validation_data = false;
    let sink = Arc::new(CollectingSink::new());
    let mut kin = KinematicsBuilder::new(
        "foil",
        config,
        StructureParameters::single_level(0),
        MeshSpacing::new(0.1, 0.05),
    )
    .diagnostics(sink.clone())
    .build()
    .unwrap();

    kin.set_velocity(0.1, RigidFrame::default()).unwrap();
    assert!(kin.set_shape(0.2, 0.0).is_err());
    assert!(kin.set_velocity(0.2, RigidFrame::default()).is_err());
    let halts = sink
        .events()
        .iter()
        .filter(|e| matches!(e, DiagnosticEvent::Halted { .. }))
        .count();
    assert_eq!(halts, 1);
}
