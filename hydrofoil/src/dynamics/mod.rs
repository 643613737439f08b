mod accels;
pub mod forces;
pub mod geometry;
mod integrator;
mod stability;
mod terms;

pub use accels::{compute_accels, compute_forces, Coefficients, ForceBreakdown};
pub use integrator::{
    advance, elapsed, peak_height, run, simulate, timed_states, Run, RunSettings, Termination,
    Trajectory,
};
pub use stability::{bank_angles, roll_torque_curve, RollPoint};
