use std::fmt;

use anyhow::{Context, Result};
use hydrofoil::dynamics::{bank_angles, elapsed, peak_height, timed_states};
use hydrofoil::{
    roll_torque_curve, simulate, Coefficients, ConfigError, RollPoint, RunError, StepError,
    Termination, VehicleState,
};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::RunConfig;

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Terminated(Termination),
    Aborted(StepError),
}

/// States of one run, complete or partial, with how it ended.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub thrust: f64,
    pub dt: f64,
    pub states: Vec<VehicleState>,
    pub outcome: Outcome,
}

impl RunReport {
    pub fn timed(&self) -> impl Iterator<Item = (f64, &VehicleState)> + '_ {
        timed_states(&self.states, self.dt)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            thrust: self.thrust,
            outcome: self.outcome.clone(),
            states: self.states.len(),
            duration: elapsed(&self.states, self.dt),
            final_state: self.states.last().copied().unwrap_or_default(),
            max_height: peak_height(&self.states).unwrap_or(f64::NAN),
        }
    }
}

/// One line per run for sweeps and logs.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub thrust: f64,
    pub outcome: Outcome,
    pub states: usize,
    pub duration: f64,
    pub final_state: VehicleState,
    pub max_height: f64,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = match &self.outcome {
            Outcome::Terminated(Termination::TargetHeight) => "reached target height".to_string(),
            Outcome::Terminated(Termination::RunTime) => "reached run time".to_string(),
            Outcome::Aborted(e) => format!("aborted: {e}"),
        };
        write!(
            f,
            "thrust={:.1} N  t={:.3} s  states={}  z_end={:.3} m  z_max={:.3} m  \
             vx_end={:.3} m/s  {}",
            self.thrust,
            self.duration,
            self.states,
            self.final_state.z,
            self.max_height,
            self.final_state.vx,
            end
        )
    }
}

/// Runs the simulation described by `cfg`. A failed tick is reported in the
/// outcome with the partial trajectory; only bad parameters are errors.
pub fn execute(cfg: &RunConfig) -> Result<RunReport, ConfigError> {
    let coefficients = Coefficients::new(&cfg.coefficients.foil, &cfg.coefficients.tail);
    let result = simulate(cfg.initial, &cfg.vehicle, &cfg.environment, coefficients, cfg.run);

    let (states, outcome) = match result {
        Ok(traj) => (traj.states, Outcome::Terminated(traj.termination)),
        Err(RunError::Aborted { partial, error }) => {
            warn!(thrust = cfg.vehicle.thrust, step = error.step, "run aborted");
            (partial, Outcome::Aborted(error))
        }
        Err(RunError::Config(e)) => return Err(e),
    };

    Ok(RunReport {
        thrust: cfg.vehicle.thrust,
        dt: cfg.run.dt,
        states,
        outcome,
    })
}

/// One independent run per thrust value, in parallel. Results keep the order
/// of `thrusts`.
pub fn sweep(cfg: &RunConfig, thrusts: &[f64]) -> Vec<Result<RunSummary, ConfigError>> {
    info!(runs = thrusts.len(), "starting thrust sweep");
    thrusts
        .par_iter()
        .map(|&thrust| execute(&cfg.with_thrust(thrust)).map(|r| r.summary()))
        .collect()
}

/// Static roll torque at the configured initial height and speed, for bank
/// angles out to `max_roll_deg` either side.
pub fn roll_curve(cfg: &RunConfig, max_roll_deg: f64, count: usize) -> Result<Vec<RollPoint>> {
    cfg.vehicle.validate()?;
    cfg.environment.validate()?;
    let coefficients = Coefficients::new(&cfg.coefficients.foil, &cfg.coefficients.tail);
    let curve = roll_torque_curve(
        &cfg.vehicle,
        &cfg.environment,
        coefficients,
        cfg.initial.z,
        cfg.initial.vx,
        &bank_angles(max_roll_deg.to_radians(), count),
    )
    .context("evaluating roll torque curve")?;
    Ok(curve)
}
