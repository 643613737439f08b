//! Equations of motion for a surface-piercing V-foil hydrofoil craft.
//!
//! The crate covers pitch, roll, surge and heave. `dynamics::geometry` turns
//! attitude and ride height into wetted foil lengths and lever arms,
//! `dynamics::forces` turns those into lift and drag, `compute_accels` sums
//! everything into accelerations and `run`/`simulate` march the state forward
//! with explicit Euler steps.

mod error;
pub use error::{
    CoefficientKind, Component, ConfigError, EvaluationError, ForceEvaluationError, GeometryError,
    NumericalError, OutOfRangeError, RunError, StepError, StepFailure, Surface,
};

mod params;
pub use params::{presets, EnvParams, VehicleParams, GRAVITY, TAIL_DENSITY};

mod state;
pub use state::{Accelerations, VehicleState};

pub mod coefficients;
pub use coefficients::{
    CoefficientModel, CoefficientSource, CoefficientTable, ConstantCoefficients, FlatPlate,
};

pub mod dynamics;
pub use dynamics::{
    compute_accels, compute_forces, roll_torque_curve, run, simulate, Coefficients, ForceBreakdown,
    RollPoint, Run, RunSettings, Termination, Trajectory,
};
