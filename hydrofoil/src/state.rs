use serde::{Deserialize, Serialize};

/// Vehicle state at one time instant `t_n = n * dt`.
///
/// Conventions: pitch is positive nose-up, roll is positive starboard side
/// down, `x` is forward and `z` is the height of the foil root above the calm
/// water line.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VehicleState {
    pub pitch: f64,
    pub roll: f64,
    pub x: f64,
    pub z: f64,
    pub pitch_rate: f64,
    pub roll_rate: f64,
    pub vx: f64,
    pub vz: f64,
}

impl VehicleState {
    /// Level and at rest with the foil root at height `z`.
    pub fn at_height(z: f64) -> Self {
        Self {
            z,
            ..Self::default()
        }
    }

    /// First field that is NaN or infinite, if any.
    pub fn first_non_finite(&self) -> Option<(&'static str, f64)> {
        [
            ("pitch", self.pitch),
            ("roll", self.roll),
            ("x", self.x),
            ("z", self.z),
            ("pitch_rate", self.pitch_rate),
            ("roll_rate", self.roll_rate),
            ("vx", self.vx),
            ("vz", self.vz),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
    }
}

/// Output of `compute_accels`: second derivatives of the state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Accelerations {
    pub pitch_accel: f64,
    pub roll_accel: f64,
    pub ax: f64,
    pub az: f64,
}
