use std::path::Path;

use hydrofoil::{CoefficientModel, CoefficientSource, Termination};
use sim::{execute, load_config, parse_config, roll_curve, Outcome, RunConfig};

const RUN_FILE: &str = r#"
[vehicle]
foil_length = 1.6
foil_chord = 0.18
foil_incidence = 0.05
foil_dihedral = 0.698
tail_incidence = -0.05
tail_area = 0.08
tail_arm = 2.6
tail_depth = 0.9
cg_x = 0.35
cg_y = 0.0
cg_z = 0.6
mass = 1000.0
pitch_inertia = 505.0
roll_inertia = 50.0
thrust = 0.0

[environment]
air_density = 1.225
water_density = 997.0

[initial]
z = 0.5

[run]
dt = 0.1
run_time = 10.0
target_height = 1.0

[coefficients.foil]
kind = "table"
aoa = [-0.2, 0.0, 0.2]
lift = [-1.0, 0.2, 1.4]
drag = [0.05, 0.01, 0.06]

[coefficients.tail]
kind = "constant"
lift = 0.3
drag = 0.02
"#;

#[test]
fn full_run_file_parses() {
    let cfg = parse_config(RUN_FILE).unwrap();
    assert_eq!(cfg.vehicle.mass, 1000.0);
    assert_eq!(cfg.environment.tail_density, 998.0);
    assert_eq!(cfg.environment.gravity, 9.81);
    assert_eq!(cfg.initial.z, 0.5);
    assert_eq!(cfg.initial.vx, 0.0);
    assert!(matches!(cfg.coefficients.foil, CoefficientModel::Table(_)));
    assert!((cfg.coefficients.foil.lift_coefficient(0.1).unwrap() - 0.8).abs() < 1e-12);
}

#[test]
fn stationary_run_stops_on_time() {
    let cfg = parse_config(RUN_FILE).unwrap();
    let report = execute(&cfg).unwrap();
    assert_eq!(report.outcome, Outcome::Terminated(Termination::RunTime));
    assert_eq!(report.states.len(), 101);
    let summary = report.summary();
    assert!((summary.duration - 10.0).abs() < 1e-9);
    assert_eq!(summary.max_height, 0.5);
}

#[test]
fn missing_vehicle_field_is_fatal() {
    let text = RUN_FILE.replace("mass = 1000.0\n", "");
    let err = parse_config(&text).unwrap_err();
    assert!(format!("{err:#}").contains("mass"), "{err:#}");
}

#[test]
fn missing_environment_is_fatal() {
    let text = RUN_FILE.replace(
        "[environment]\nair_density = 1.225\nwater_density = 997.0\n",
        "",
    );
    assert!(!text.contains("[environment]"));
    let err = parse_config(&text).unwrap_err();
    assert!(format!("{err:#}").contains("environment"), "{err:#}");
}

#[test]
fn missing_water_density_is_fatal() {
    let text = RUN_FILE.replace("water_density = 997.0\n", "");
    let err = parse_config(&text).unwrap_err();
    assert!(format!("{err:#}").contains("water_density"), "{err:#}");
}

#[test]
fn roll_curve_rejects_negative_foil_length() {
    let mut cfg = RunConfig::demo();
    cfg.vehicle.foil_length = -1.0;
    let err = roll_curve(&cfg, 10.0, 3).unwrap_err();
    assert!(format!("{err:#}").contains("foil_length"), "{err:#}");
}

#[test]
fn roll_curve_of_demo_craft_is_restoring() {
    let curve = roll_curve(&RunConfig::demo(), 10.0, 5).unwrap();
    assert_eq!(curve.len(), 5);
    assert!(curve.iter().all(|p| p.restoring()), "{curve:?}");
}

#[test]
fn unknown_coefficient_kind_is_rejected() {
    let text = RUN_FILE.replace("kind = \"constant\"", "kind = \"polar\"");
    assert!(parse_config(&text).is_err());
}

#[test]
fn bad_dt_is_reported_before_running() {
    let text = RUN_FILE.replace("dt = 0.1", "dt = -0.1");
    let cfg = parse_config(&text).unwrap();
    assert!(execute(&cfg).is_err());
}

#[test]
fn missing_run_file_falls_back_to_demo() {
    let cfg = load_config(Path::new("does/not/exist.toml")).unwrap();
    assert_eq!(cfg, RunConfig::demo());
}

#[test]
fn demo_round_trips_through_toml() {
    let demo = RunConfig::demo();
    let text = toml::to_string(&demo).unwrap();
    assert_eq!(parse_config(&text).unwrap(), demo);
}
