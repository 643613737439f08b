use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, NumericalError};

/// Gravitational acceleration used for the weight term (m/s^2).
pub const GRAVITY: f64 = 9.81;
/// Density assumed for the fully submerged tail surface (kg/m^3).
pub const TAIL_DENSITY: f64 = 998.0;

/// Divisors at or below this magnitude are rejected before a run.
const MIN_DIVISOR: f64 = 1e-9;

/// Static description of a surface-piercing V-foil craft.
///
/// Both foils leave a common root on the hull centerline and slope down and
/// outboard at `foil_dihedral` below the horizontal. Offsets are body-frame
/// distances from the foil root (CG) or from the CG (tail).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleParams {
    /// Length of each foil from root to tip (m).
    pub foil_length: f64,
    pub foil_chord: f64,
    /// Foil incidence relative to the hull datum (rad).
    pub foil_incidence: f64,
    /// Angle of each foil below the horizontal (rad).
    pub foil_dihedral: f64,
    pub tail_incidence: f64,
    /// Planform area of the submerged tail (m^2).
    pub tail_area: f64,
    /// Distance from the CG aft to the tail (m).
    pub tail_arm: f64,
    /// Distance from the CG down to the tail (m).
    pub tail_depth: f64,
    /// CG distance ahead of the foil station (m).
    pub cg_x: f64,
    /// CG distance to starboard of the centerline (m).
    pub cg_y: f64,
    /// CG height above the foil root (m).
    pub cg_z: f64,
    pub mass: f64,
    pub pitch_inertia: f64,
    pub roll_inertia: f64,
    /// Propulsive force delivered while the craft is moving (N).
    pub thrust: f64,
}

impl VehicleParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("foil_length", self.foil_length),
            ("foil_chord", self.foil_chord),
            ("foil_incidence", self.foil_incidence),
            ("foil_dihedral", self.foil_dihedral),
            ("tail_incidence", self.tail_incidence),
            ("tail_area", self.tail_area),
            ("tail_arm", self.tail_arm),
            ("tail_depth", self.tail_depth),
            ("cg_x", self.cg_x),
            ("cg_y", self.cg_y),
            ("cg_z", self.cg_z),
            ("mass", self.mass),
            ("pitch_inertia", self.pitch_inertia),
            ("roll_inertia", self.roll_inertia),
            ("thrust", self.thrust),
        ];
        for (name, value) in fields {
            ConfigError::check_finite(name, value)?;
        }

        if self.foil_length <= 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "foil_length",
                value: self.foil_length,
                reason: "must be positive",
            });
        }
        if self.foil_chord <= 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "foil_chord",
                value: self.foil_chord,
                reason: "must be positive",
            });
        }
        if self.tail_area < 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "tail_area",
                value: self.tail_area,
                reason: "must not be negative",
            });
        }
        if self.foil_dihedral.abs() >= std::f64::consts::FRAC_PI_2 {
            return Err(ConfigError::OutOfRange {
                name: "foil_dihedral",
                value: self.foil_dihedral,
                reason: "must lie strictly between -pi/2 and pi/2",
            });
        }

        for (name, value) in [
            ("mass", self.mass),
            ("pitch_inertia", self.pitch_inertia),
            ("roll_inertia", self.roll_inertia),
        ] {
            if value <= MIN_DIVISOR {
                return Err(NumericalError::NearZeroDivisor { name, value }.into());
            }
        }
        Ok(())
    }
}

/// Fluid properties shared by every evaluation of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvParams {
    pub air_density: f64,
    pub water_density: f64,
    #[serde(default = "default_tail_density")]
    pub tail_density: f64,
    #[serde(default = "default_gravity")]
    pub gravity: f64,
}

fn default_tail_density() -> f64 {
    TAIL_DENSITY
}

fn default_gravity() -> f64 {
    GRAVITY
}

impl EnvParams {
    /// Sea-level air over fresh water.
    pub fn standard() -> Self {
        Self {
            air_density: 1.225,
            water_density: 997.0,
            tail_density: TAIL_DENSITY,
            gravity: GRAVITY,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("air_density", self.air_density),
            ("water_density", self.water_density),
            ("tail_density", self.tail_density),
            ("gravity", self.gravity),
        ] {
            ConfigError::check_finite(name, value)?;
            if value < 0.0 {
                return Err(ConfigError::OutOfRange {
                    name,
                    value,
                    reason: "must not be negative",
                });
            }
        }
        Ok(())
    }
}

impl Default for EnvParams {
    fn default() -> Self {
        Self::standard()
    }
}

pub mod presets {
    use super::*;

    // Small single-seat V-foil runabout (prototype scale, SI units)
    pub fn demo_craft() -> VehicleParams {
        let foil_length = 1.6;
        let foil_chord = 0.18;
        let mass = 420.0;

        // Hull approximated as a 3.8 m x 1.2 m box for inertia
        let hull_length: f64 = 3.8;
        let hull_beam: f64 = 1.2;
        let pitch_inertia = mass * hull_length * hull_length / 12.0;
        let roll_inertia = mass * hull_beam * hull_beam / 12.0;

        VehicleParams {
            foil_length,
            foil_chord,
            foil_incidence: 0.05,
            foil_dihedral: 40f64.to_radians(),
            // negative incidence trims the nose up against the foil lift moment
            tail_incidence: -0.05,
            tail_area: 0.08,
            tail_arm: 2.6,
            tail_depth: 0.9,
            cg_x: 0.35,
            cg_y: 0.0,
            cg_z: 0.6,
            mass,
            pitch_inertia,
            roll_inertia,
            thrust: 1800.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_craft_is_valid() {
        presets::demo_craft().validate().unwrap();
        EnvParams::standard().validate().unwrap();
    }

    #[test]
    fn zero_mass_is_a_numerical_error() {
        let mut p = presets::demo_craft();
        p.mass = 0.0;
        assert_eq!(
            p.validate(),
            Err(ConfigError::Numerical(NumericalError::NearZeroDivisor {
                name: "mass",
                value: 0.0
            }))
        );
    }

    #[test]
    fn tiny_roll_inertia_is_rejected() {
        let mut p = presets::demo_craft();
        p.roll_inertia = 1e-12;
        assert!(matches!(
            p.validate(),
            Err(ConfigError::Numerical(NumericalError::NearZeroDivisor {
                name: "roll_inertia",
                ..
            }))
        ));
    }

    #[test]
    fn vertical_foil_is_out_of_range() {
        let mut p = presets::demo_craft();
        p.foil_dihedral = std::f64::consts::FRAC_PI_2;
        assert!(matches!(
            p.validate(),
            Err(ConfigError::OutOfRange { name: "foil_dihedral", .. })
        ));
    }

    #[test]
    fn nan_parameter_is_rejected() {
        let mut p = presets::demo_craft();
        p.cg_z = f64::NAN;
        assert!(matches!(p.validate(), Err(ConfigError::NonFinite { name: "cg_z", .. })));
    }

    #[test]
    fn negative_density_is_rejected() {
        let env = EnvParams {
            water_density: -1.0,
            ..EnvParams::standard()
        };
        assert!(env.validate().is_err());
    }
}
