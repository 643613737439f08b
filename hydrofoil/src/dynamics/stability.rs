//! Static roll stability of the V-foil: roll torque against bank angle at a
//! fixed ride height and speed.

use serde::{Deserialize, Serialize};

use super::accels::{compute_forces, Coefficients};
use crate::error::EvaluationError;
use crate::{EnvParams, VehicleParams, VehicleState};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollPoint {
    pub roll: f64,
    pub roll_torque: f64,
    pub right_wetted: f64,
    pub left_wetted: f64,
}

impl RollPoint {
    /// Torque opposes the bank (or there is no bank and no torque).
    pub fn restoring(&self) -> bool {
        self.roll * self.roll_torque < 0.0 || (self.roll == 0.0 && self.roll_torque == 0.0)
    }
}

/// Roll torque at each bank angle in `rolls`, level in pitch, with the foil
/// root held at `height` and the craft moving at `speed`.
pub fn roll_torque_curve(
    vehicle: &VehicleParams,
    env: &EnvParams,
    coefficients: Coefficients<'_>,
    height: f64,
    speed: f64,
    rolls: &[f64],
) -> Result<Vec<RollPoint>, EvaluationError> {
    rolls
        .iter()
        .map(|&roll| {
            let state = VehicleState {
                roll,
                z: height,
                vx: speed,
                ..VehicleState::default()
            };
            let f = compute_forces(&state, vehicle, env, coefficients)?;
            Ok(RollPoint {
                roll,
                roll_torque: f.roll_torque,
                right_wetted: f.submergence.right.length_water,
                left_wetted: f.submergence.left.length_water,
            })
        })
        .collect()
}

/// Evenly spaced bank angles from `-max_roll` to `max_roll`, zero included
/// when `count` is odd.
pub fn bank_angles(max_roll: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        n => {
            let last = (n - 1) as f64;
            (0..n).map(|i| max_roll * ((2 * i) as f64 / last - 1.0)).collect()
        }
    }
}
