use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::accels::{compute_accels, Coefficients};
use crate::error::{ConfigError, RunError, StepError, StepFailure};
use crate::{Accelerations, EnvParams, VehicleParams, VehicleState};

/// Step counts above this are treated as a configuration mistake.
const MAX_STEPS: f64 = 1e12;
/// Relative slack when deciding whether `run_time` is a whole number of steps.
const STEP_ROUNDING: f64 = 1e-9;

/// Time step and stop conditions of one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSettings {
    /// Fixed time step (s).
    pub dt: f64,
    /// Simulated time after which the run stops (s).
    pub run_time: f64,
    /// The run stops once the foil root rises above this height (m).
    pub target_height: f64,
}

impl RunSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_finite("dt", self.dt)?;
        ConfigError::check_finite("run_time", self.run_time)?;
        if self.dt <= 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "dt",
                value: self.dt,
                reason: "must be positive",
            });
        }
        if self.run_time <= 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "run_time",
                value: self.run_time,
                reason: "must be positive",
            });
        }
        if self.target_height.is_nan() {
            return Err(ConfigError::NonFinite {
                name: "target_height",
                value: self.target_height,
            });
        }
        Ok(())
    }

    /// Number of ticks after which the time limit fires.
    ///
    /// A `run_time` that is a whole multiple of `dt` up to float rounding
    /// (10 s at 0.1 s) gives exactly that many ticks; anything else rounds up.
    pub fn step_limit(&self) -> Result<u64, ConfigError> {
        self.validate()?;
        let ratio = self.run_time / self.dt;
        if ratio > MAX_STEPS {
            return Err(ConfigError::OutOfRange {
                name: "run_time",
                value: self.run_time,
                reason: "implies too many steps for the chosen dt",
            });
        }
        let nearest = ratio.round();
        let steps = if (ratio - nearest).abs() <= STEP_ROUNDING * ratio.max(1.0) {
            nearest
        } else {
            ratio.ceil()
        };
        Ok(steps.max(1.0) as u64)
    }
}

/// Why a run stopped without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The foil root rose above the target height.
    TargetHeight,
    /// The time limit was reached.
    RunTime,
}

/// One explicit Euler update. Positions move with the rates from the start of
/// the step; rates then take the accelerations.
pub fn advance(state: &VehicleState, acc: &Accelerations, dt: f64) -> VehicleState {
    VehicleState {
        pitch: state.pitch + state.pitch_rate * dt,
        roll: state.roll + state.roll_rate * dt,
        x: state.x + state.vx * dt,
        z: state.z + state.vz * dt,
        pitch_rate: state.pitch_rate + acc.pitch_accel * dt,
        roll_rate: state.roll_rate + acc.roll_accel * dt,
        vx: state.vx + acc.ax * dt,
        vz: state.vz + acc.az * dt,
    }
}

enum Phase {
    Start(VehicleState),
    Running { state: VehicleState, step: u64 },
    Terminated(Option<Termination>),
}

/// Lazy run: yields the initial state, then one state per tick until a stop
/// condition holds or a tick fails. A failed tick is yielded as the last item.
pub struct Run<'a> {
    vehicle: &'a VehicleParams,
    env: &'a EnvParams,
    coefficients: Coefficients<'a>,
    settings: RunSettings,
    step_limit: u64,
    phase: Phase,
}

/// Validates the inputs and prepares a run from `initial`.
pub fn run<'a>(
    initial: VehicleState,
    vehicle: &'a VehicleParams,
    env: &'a EnvParams,
    coefficients: Coefficients<'a>,
    settings: RunSettings,
) -> Result<Run<'a>, ConfigError> {
    vehicle.validate()?;
    env.validate()?;
    let step_limit = settings.step_limit()?;
    if let Some((name, value)) = initial.first_non_finite() {
        return Err(ConfigError::NonFinite { name, value });
    }

    debug!(
        dt = settings.dt,
        run_time = settings.run_time,
        target_height = settings.target_height,
        step_limit,
        "starting run"
    );

    Ok(Run {
        vehicle,
        env,
        coefficients,
        settings,
        step_limit,
        phase: Phase::Start(initial),
    })
}

impl Run<'_> {
    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    pub fn step_limit(&self) -> u64 {
        self.step_limit
    }

    /// Set once the run has stopped through a stop condition.
    pub fn termination(&self) -> Option<Termination> {
        match self.phase {
            Phase::Terminated(t) => t,
            _ => None,
        }
    }

    fn tick(&self, state: &VehicleState) -> Result<VehicleState, StepFailure> {
        let acc = compute_accels(state, self.vehicle, self.env, self.coefficients)?;
        let next = advance(state, &acc, self.settings.dt);
        match next.first_non_finite() {
            Some((field, value)) => Err(StepFailure::Diverged { field, value }),
            None => Ok(next),
        }
    }

    fn stop_condition(&self, state: &VehicleState, step: u64) -> Option<Termination> {
        if state.z > self.settings.target_height {
            Some(Termination::TargetHeight)
        } else if step >= self.step_limit {
            Some(Termination::RunTime)
        } else {
            None
        }
    }

    fn emit(&mut self, state: VehicleState, step: u64) -> VehicleState {
        self.phase = match self.stop_condition(&state, step) {
            Some(termination) => {
                debug!(?termination, step, z = state.z, "run terminated");
                Phase::Terminated(Some(termination))
            }
            None => Phase::Running { state, step },
        };
        state
    }
}

impl Iterator for Run<'_> {
    type Item = Result<VehicleState, StepError>;

    fn next(&mut self) -> Option<Self::Item> {
        match std::mem::replace(&mut self.phase, Phase::Terminated(None)) {
            Phase::Start(initial) => Some(Ok(self.emit(initial, 0))),
            Phase::Running { state, step } => {
                let step = step + 1;
                match self.tick(&state) {
                    Ok(next) => Some(Ok(self.emit(next, step))),
                    Err(failure) => {
                        let err = StepError::new(step, failure);
                        warn!(
                            step,
                            component = %err.component,
                            error = %err.failure,
                            "step failed, aborting run"
                        );
                        Some(Err(err))
                    }
                }
            }
            Phase::Terminated(t) => {
                self.phase = Phase::Terminated(t);
                None
            }
        }
    }
}

impl FusedIterator for Run<'_> {}

/// States of a completed run, sampled at `t_n = n * dt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub states: Vec<VehicleState>,
    pub termination: Termination,
    pub dt: f64,
}

impl Trajectory {
    /// Ticks taken after the initial state.
    pub fn steps(&self) -> usize {
        self.states.len().saturating_sub(1)
    }

    pub fn duration(&self) -> f64 {
        elapsed(&self.states, self.dt)
    }

    pub fn final_state(&self) -> Option<&VehicleState> {
        self.states.last()
    }

    pub fn max_height(&self) -> Option<f64> {
        peak_height(&self.states)
    }

    /// `(t_n, state_n)` pairs.
    pub fn timed(&self) -> impl Iterator<Item = (f64, &VehicleState)> + '_ {
        timed_states(&self.states, self.dt)
    }
}

// Helpers over a state sequence sampled every `dt` from `t = 0`, shared with
// partial trajectories of aborted runs.

pub fn elapsed(states: &[VehicleState], dt: f64) -> f64 {
    states.len().saturating_sub(1) as f64 * dt
}

pub fn peak_height(states: &[VehicleState]) -> Option<f64> {
    states.iter().map(|s| s.z).reduce(f64::max)
}

pub fn timed_states(
    states: &[VehicleState],
    dt: f64,
) -> impl Iterator<Item = (f64, &VehicleState)> + '_ {
    states
        .iter()
        .enumerate()
        .map(move |(n, s)| (n as f64 * dt, s))
}

/// Runs to completion. On a failed tick the states produced so far come back
/// with the error.
pub fn simulate(
    initial: VehicleState,
    vehicle: &VehicleParams,
    env: &EnvParams,
    coefficients: Coefficients<'_>,
    settings: RunSettings,
) -> Result<Trajectory, RunError> {
    let mut run = run(initial, vehicle, env, coefficients, settings)?;
    let mut states = Vec::new();
    for item in &mut run {
        match item {
            Ok(state) => states.push(state),
            Err(error) => {
                return Err(RunError::Aborted {
                    partial: states,
                    error,
                })
            }
        }
    }
    // exhausted without a failed tick, so a stop condition fired
    let termination = run.termination().unwrap_or(Termination::RunTime);
    Ok(Trajectory {
        states,
        termination,
        dt: settings.dt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::ConstantCoefficients;
    use crate::error::Component;
    use crate::params::presets::demo_craft;
    use approx::assert_relative_eq;

    fn settings(dt: f64, run_time: f64) -> RunSettings {
        RunSettings {
            dt,
            run_time,
            target_height: 100.0,
        }
    }

    #[test]
    fn step_limit_absorbs_rounding() {
        assert_eq!(settings(0.1, 10.0).step_limit().unwrap(), 100);
        assert_eq!(settings(0.1, 0.3).step_limit().unwrap(), 3);
        assert_eq!(settings(0.3, 1.0).step_limit().unwrap(), 4);
        assert_eq!(settings(0.1, 0.05).step_limit().unwrap(), 1);
    }

    #[test]
    fn invalid_settings_are_config_errors() {
        assert!(settings(0.0, 1.0).validate().is_err());
        assert!(settings(-0.1, 1.0).validate().is_err());
        assert!(settings(f64::NAN, 1.0).validate().is_err());
        assert!(settings(0.1, f64::INFINITY).validate().is_err());
        assert!(settings(0.1, 0.0).validate().is_err());
        assert!(settings(1e-15, 1e3).step_limit().is_err());
        let nan_target = RunSettings {
            target_height: f64::NAN,
            ..settings(0.1, 1.0)
        };
        assert!(nan_target.validate().is_err());
    }

    #[test]
    fn positions_use_rates_from_start_of_step() {
        let state = VehicleState {
            z: 1.0,
            vz: 2.0,
            pitch_rate: 0.5,
            ..VehicleState::default()
        };
        let acc = Accelerations {
            az: -10.0,
            pitch_accel: 1.0,
            ..Accelerations::default()
        };
        let next = advance(&state, &acc, 0.1);
        assert_relative_eq!(next.z, 1.2, epsilon = 1e-12);
        assert_relative_eq!(next.vz, 1.0, epsilon = 1e-12);
        assert_relative_eq!(next.pitch, 0.05, epsilon = 1e-12);
        assert_relative_eq!(next.pitch_rate, 0.6, epsilon = 1e-12);
    }

    #[test]
    fn initial_state_above_target_stops_immediately() {
        let vehicle = demo_craft();
        let env = EnvParams::standard();
        let c = ConstantCoefficients::new(0.6, 0.05);
        let s = RunSettings {
            target_height: 1.0,
            ..settings(0.1, 10.0)
        };
        let traj = simulate(
            VehicleState::at_height(2.0),
            &vehicle,
            &env,
            Coefficients::shared(&c),
            s,
        )
        .unwrap();
        assert_eq!(traj.states.len(), 1);
        assert_eq!(traj.termination, Termination::TargetHeight);
    }

    #[test]
    fn emerged_craft_free_falls() {
        let vehicle = demo_craft();
        let env = EnvParams::standard();
        let c = ConstantCoefficients::new(0.6, 0.05);
        let traj = simulate(
            VehicleState::at_height(10.0),
            &vehicle,
            &env,
            Coefficients::shared(&c),
            settings(0.1, 0.3),
        )
        .unwrap();
        assert_eq!(traj.states.len(), 4);
        assert_eq!(traj.termination, Termination::RunTime);
        assert_relative_eq!(traj.states[1].vz, -0.981, epsilon = 1e-12);
        assert_eq!(traj.states[1].z, 10.0);
        assert_relative_eq!(traj.states[2].z, 10.0 - 0.0981, epsilon = 1e-12);
        assert_relative_eq!(traj.duration(), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn partial_state_helpers() {
        let states = [
            VehicleState::at_height(0.2),
            VehicleState::at_height(0.5),
            VehicleState::at_height(0.4),
        ];
        assert_relative_eq!(elapsed(&states, 0.1), 0.2, epsilon = 1e-12);
        assert_eq!(peak_height(&states), Some(0.5));
        let times: Vec<f64> = timed_states(&states, 0.5).map(|(t, _)| t).collect();
        assert_eq!(times, vec![0.0, 0.5, 1.0]);
        assert_eq!(elapsed(&[], 0.1), 0.0);
        assert_eq!(peak_height(&[]), None);
    }

    #[test]
    fn run_is_fused_after_termination() {
        let vehicle = demo_craft();
        let env = EnvParams::standard();
        let c = ConstantCoefficients::new(0.6, 0.05);
        let mut run = run(
            VehicleState::at_height(10.0),
            &vehicle,
            &env,
            Coefficients::shared(&c),
            settings(0.1, 0.2),
        )
        .unwrap();
        assert_eq!(run.by_ref().count(), 3);
        assert_eq!(run.termination(), Some(Termination::RunTime));
        assert!(run.next().is_none());
        assert!(run.next().is_none());
    }

    #[test]
    fn blow_up_is_an_integrator_failure() {
        let vehicle = demo_craft();
        let env = EnvParams::standard();
        let c = ConstantCoefficients::new(1e308, 1e308);
        let initial = VehicleState {
            vx: 8.0,
            ..VehicleState::at_height(0.3)
        };
        let err = simulate(
            initial,
            &vehicle,
            &env,
            Coefficients::shared(&c),
            settings(0.1, 1.0),
        )
        .unwrap_err();
        match err {
            RunError::Aborted { partial, error } => {
                assert_eq!(partial.len(), 1);
                assert_eq!(error.step, 1);
                assert_eq!(error.component, Component::Integrator);
                assert!(matches!(error.failure, StepFailure::Diverged { .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn non_finite_initial_state_is_rejected() {
        let vehicle = demo_craft();
        let env = EnvParams::standard();
        let c = ConstantCoefficients::new(0.6, 0.05);
        let initial = VehicleState {
            roll: f64::NAN,
            ..VehicleState::default()
        };
        let err = run(
            initial,
            &vehicle,
            &env,
            Coefficients::shared(&c),
            settings(0.1, 1.0),
        )
        .err();
        assert!(matches!(err, Some(ConfigError::NonFinite { name: "roll", .. })));
    }
}
