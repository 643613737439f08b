use super::forces;
use super::geometry::{
    pitch_moment_arms, roll_moment_arms, submergence, FoilPair, PitchLever, Segments, Submergence,
};
use super::terms::*;
use crate::coefficients::CoefficientSource;
use crate::error::{EvaluationError, ForceEvaluationError, Surface};
use crate::{Accelerations, EnvParams, VehicleParams, VehicleState};

type ForceFn =
    fn(f64, f64, f64, f64, f64, &dyn CoefficientSource) -> Result<f64, ForceEvaluationError>;

/// Coefficient capabilities for the main foils and the tail.
#[derive(Clone, Copy)]
pub struct Coefficients<'a> {
    pub foil: &'a dyn CoefficientSource,
    pub tail: &'a dyn CoefficientSource,
}

impl<'a> Coefficients<'a> {
    pub fn new(foil: &'a dyn CoefficientSource, tail: &'a dyn CoefficientSource) -> Self {
        Self { foil, tail }
    }

    /// Same source for foils and tail.
    pub fn shared(source: &'a dyn CoefficientSource) -> Self {
        Self {
            foil: source,
            tail: source,
        }
    }
}

/// Every intermediate term of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ForceBreakdown {
    pub foil_aoa: f64,
    pub tail_aoa: f64,
    pub submergence: Submergence,
    pub roll_arms: FoilPair<f64>,
    pub pitch_arms: FoilPair<PitchLever>,
    pub lift: FoilPair<f64>,
    pub drag: FoilPair<f64>,
    pub tail_lift: f64,
    pub tail_drag: f64,
    pub thrust: f64,
    pub weight: f64,
    // Net body loads
    pub fx: f64,
    pub fz: f64,
    pub roll_torque: f64,
    pub pitch_torque: f64,
}

impl ForceBreakdown {
    pub fn accelerations(&self, vehicle: &VehicleParams) -> Accelerations {
        Accelerations {
            pitch_accel: self.pitch_torque / vehicle.pitch_inertia,
            roll_accel: self.roll_torque / vehicle.roll_inertia,
            ax: self.fx / vehicle.mass,
            az: self.fz / vehicle.mass,
        }
    }
}

/// Net forces and torques on the craft at `state`. Pure: identical inputs give
/// bit-identical outputs as long as the coefficient sources are deterministic.
pub fn compute_forces(
    state: &VehicleState,
    vehicle: &VehicleParams,
    env: &EnvParams,
    coefficients: Coefficients<'_>,
) -> Result<ForceBreakdown, EvaluationError> {
    let foil_aoa = vehicle.foil_incidence + state.pitch;
    let tail_aoa = vehicle.tail_incidence + state.pitch;

    let sub = submergence(
        state.pitch,
        state.roll,
        state.z,
        vehicle.foil_length,
        vehicle.foil_dihedral,
    )?;
    let roll_arms = roll_moment_arms(&sub, vehicle.foil_dihedral, vehicle.cg_y, vehicle.cg_z);
    let pitch_arms = pitch_moment_arms(
        &sub,
        vehicle.foil_dihedral,
        state.pitch,
        vehicle.cg_x,
        vehicle.cg_z,
    );

    let foil_err = |source: ForceEvaluationError| EvaluationError::Force {
        surface: Surface::Foil,
        source,
    };
    let tail_err = |source: ForceEvaluationError| EvaluationError::Force {
        surface: Surface::Tail,
        source,
    };

    let segment = |force: ForceFn, air_span: f64, water_span: f64| {
        let chord = vehicle.foil_chord;
        Ok::<_, EvaluationError>(Segments {
            air: force(env.air_density, air_span, chord, state.vx, foil_aoa, coefficients.foil)
                .map_err(foil_err)?,
            water: force(
                env.water_density,
                water_span,
                chord,
                state.vx,
                foil_aoa,
                coefficients.foil,
            )
            .map_err(foil_err)?,
        })
    };

    let lift = FoilPair {
        right: segment(forces::lift, sub.right.length_air, sub.right.length_water)?,
        left: segment(forces::lift, sub.left.length_air, sub.left.length_water)?,
    };
    let drag = FoilPair {
        right: segment(forces::drag, sub.right.length_air, sub.right.length_water)?,
        left: segment(forces::drag, sub.left.length_air, sub.left.length_water)?,
    };

    let tail_lift = forces::tail_lift(
        env.tail_density,
        vehicle.tail_area,
        state.vx,
        tail_aoa,
        coefficients.tail,
    )
    .map_err(tail_err)?;
    let tail_drag = forces::tail_drag(
        env.tail_density,
        vehicle.tail_area,
        state.vx,
        tail_aoa,
        coefficients.tail,
    )
    .map_err(tail_err)?;

    let thrust = thrust_force(vehicle, state.vx);
    let weight = weight(vehicle, env.gravity);

    let fz = sum(&lift) - weight;
    let fx = thrust - sum(&drag) - tail_drag;
    let roll_torque = torque_roll(&lift, &roll_arms);
    let (tail_lift_moment, tail_drag_moment) =
        tail_moments(vehicle, state.pitch, tail_lift, tail_drag);
    let pitch_torque =
        torque_pitch_foils(&lift, &drag, &pitch_arms) - (tail_drag_moment + tail_lift_moment);

    Ok(ForceBreakdown {
        foil_aoa,
        tail_aoa,
        submergence: sub,
        roll_arms,
        pitch_arms,
        lift,
        drag,
        tail_lift,
        tail_drag,
        thrust,
        weight,
        fx,
        fz,
        roll_torque,
        pitch_torque,
    })
}

/// Linear and angular accelerations at `state`.
pub fn compute_accels(
    state: &VehicleState,
    vehicle: &VehicleParams,
    env: &EnvParams,
    coefficients: Coefficients<'_>,
) -> Result<Accelerations, EvaluationError> {
    compute_forces(state, vehicle, env, coefficients).map(|f| f.accelerations(vehicle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::ConstantCoefficients;
    use crate::params::presets::demo_craft;
    use approx::assert_relative_eq;

    fn cruising(z: f64) -> VehicleState {
        VehicleState {
            z,
            vx: 8.0,
            ..VehicleState::default()
        }
    }

    #[test]
    fn emerged_foils_at_rest_fall_at_g() {
        let vehicle = demo_craft();
        let c = ConstantCoefficients::new(0.7, 0.04);
        let acc = compute_accels(
            &VehicleState::at_height(10.0),
            &vehicle,
            &EnvParams::standard(),
            Coefficients::shared(&c),
        )
        .unwrap();
        assert_relative_eq!(acc.az, -9.81, epsilon = 1e-12);
        assert_eq!(acc.ax, 0.0);
        assert_eq!(acc.roll_accel, 0.0);
        assert_eq!(acc.pitch_accel, 0.0);
    }

    #[test]
    fn level_symmetric_craft_has_no_roll_torque() {
        let vehicle = demo_craft();
        let c = ConstantCoefficients::new(0.7, 0.04);
        let f = compute_forces(
            &cruising(0.3),
            &vehicle,
            &EnvParams::standard(),
            Coefficients::shared(&c),
        )
        .unwrap();
        assert!(f.fz > -f.weight);
        assert_eq!(f.roll_torque, 0.0);
    }

    #[test]
    fn starboard_roll_is_resisted() {
        let vehicle = demo_craft();
        let c = ConstantCoefficients::new(0.7, 0.04);
        let state = VehicleState {
            roll: 0.1,
            ..cruising(0.3)
        };
        let f = compute_forces(&state, &vehicle, &EnvParams::standard(), Coefficients::shared(&c))
            .unwrap();
        assert!(f.roll_torque < 0.0, "roll torque {}", f.roll_torque);
    }

    #[test]
    fn drag_and_tail_reduce_surge_force() {
        let vehicle = demo_craft();
        let c = ConstantCoefficients::new(0.7, 0.04);
        let f = compute_forces(
            &cruising(0.3),
            &vehicle,
            &EnvParams::standard(),
            Coefficients::shared(&c),
        )
        .unwrap();
        assert_relative_eq!(f.fx, vehicle.thrust - sum(&f.drag) - f.tail_drag, epsilon = 1e-9);
        assert!(f.tail_drag > 0.0);
    }

    #[test]
    fn tail_failure_is_attributed_to_the_tail() {
        let vehicle = demo_craft();
        let foil = ConstantCoefficients::new(0.7, 0.04);
        let tail = ConstantCoefficients::new(0.3, 0.02).with_domain(0.5, 0.6);
        let err = compute_accels(
            &cruising(0.3),
            &vehicle,
            &EnvParams::standard(),
            Coefficients::new(&foil, &tail),
        )
        .unwrap_err();
        assert!(matches!(err, EvaluationError::Force { surface: Surface::Tail, .. }));
    }

    #[test]
    fn repeated_evaluation_is_bit_identical() {
        let vehicle = demo_craft();
        let c = ConstantCoefficients::new(0.7, 0.04);
        let state = VehicleState {
            pitch: 0.03,
            roll: -0.05,
            pitch_rate: 0.1,
            ..cruising(0.25)
        };
        let env = EnvParams::standard();
        let a = compute_accels(&state, &vehicle, &env, Coefficients::shared(&c)).unwrap();
        let b = compute_accels(&state, &vehicle, &env, Coefficients::shared(&c)).unwrap();
        assert_eq!(a, b);
    }
}
