use super::geometry::{body_pitch_lever, FoilPair, PitchLever};
use crate::VehicleParams;

// ----- Forces -----

/// Propulsive force. The propulsor is declutched at rest, so a stationary
/// craft produces no thrust.
pub(super) fn thrust_force(vehicle: &VehicleParams, vx: f64) -> f64 {
    if vx == 0.0 {
        0.0
    } else {
        vehicle.thrust
    }
}

pub(super) fn weight(vehicle: &VehicleParams, gravity: f64) -> f64 {
    vehicle.mass * gravity
}

pub(super) fn sum(forces: &FoilPair<f64>) -> f64 {
    forces.values().into_iter().sum()
}

// ----- Roll torque -----

/// Positive rolls the craft to starboard: port lift raises the port side.
pub(super) fn torque_roll(lift: &FoilPair<f64>, arms: &FoilPair<f64>) -> f64 {
    let port = lift.left.air * arms.left.air + lift.left.water * arms.left.water;
    let starboard = lift.right.air * arms.right.air + lift.right.water * arms.right.water;
    port - starboard
}

// ----- Pitch torques (nose-up positive) -----

pub(super) fn torque_pitch_foils(
    lift: &FoilPair<f64>,
    drag: &FoilPair<f64>,
    arms: &FoilPair<PitchLever>,
) -> f64 {
    let lift_moment: f64 = lift
        .values()
        .into_iter()
        .zip(arms.values())
        .map(|(l, arm)| l * arm.lift)
        .sum();
    let drag_moment: f64 = drag
        .values()
        .into_iter()
        .zip(arms.values())
        .map(|(d, arm)| d * arm.drag)
        .sum();
    lift_moment - drag_moment
}

/// Nose-down moments of the tail forces, returned as `(lift, drag)`.
/// The tail sits `tail_arm` behind and `tail_depth` below the CG.
pub(super) fn tail_moments(
    vehicle: &VehicleParams,
    pitch: f64,
    tail_lift: f64,
    tail_drag: f64,
) -> (f64, f64) {
    let lever = body_pitch_lever(-vehicle.tail_arm, -vehicle.tail_depth, pitch);
    (-lever.lift * tail_lift, lever.drag * tail_drag)
}
