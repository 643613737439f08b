//! Foil submergence and lever arms.
//!
//! Body frame: foil root at the origin, `y` to starboard, `z` up, `x` forward.
//! The right foil runs along `(cos Γ, -sin Γ)` in the front view, the left foil
//! along `(-cos Γ, -sin Γ)`. Roll is positive starboard-down, pitch positive
//! nose-up.

use crate::error::GeometryError;

/// Wetted and emerged parts of one foil. Midpoints are distances along the
/// foil measured from the root.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SideSubmergence {
    pub length_air: f64,
    pub length_water: f64,
    pub mid_air: f64,
    pub mid_water: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Submergence {
    pub right: SideSubmergence,
    pub left: SideSubmergence,
}

/// Per-segment values for one foil.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Segments<T> {
    pub air: T,
    pub water: T,
}

/// Per-segment values for both foils.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FoilPair<T> {
    pub right: Segments<T>,
    pub left: Segments<T>,
}

impl<T> FoilPair<T> {
    pub fn values(&self) -> [&T; 4] {
        [&self.right.air, &self.right.water, &self.left.air, &self.left.water]
    }
}

/// Side-view lever of a segment about the CG pitch axis.
///
/// `lift` is the earth-horizontal offset ahead of the CG (an upward force
/// there pitches nose-up); `drag` is the depth below the CG (a rearward force
/// there pitches nose-down).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PitchLever {
    pub lift: f64,
    pub drag: f64,
}

fn classify(quantity: &'static str, value: f64) -> Result<f64, GeometryError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeometryError::UndefinedBranch { quantity, value })
    }
}

/// Wetted/emerged lengths of both foils for the given attitude and root
/// height above the water line.
pub fn submergence(
    pitch: f64,
    roll: f64,
    height: f64,
    foil_length: f64,
    foil_dihedral: f64,
) -> Result<Submergence, GeometryError> {
    let pitch = classify("pitch", pitch)?;
    let roll = classify("roll", roll)?;
    let height = classify("height", height)?;
    let foil_length = classify("foil length", foil_length)?;
    if foil_length < 0.0 {
        return Err(GeometryError::UndefinedBranch {
            quantity: "foil length",
            value: foil_length,
        });
    }

    // Pitch tilts the transverse foil plane equally for both sides
    let tilt = pitch.cos();
    let right_drop = (foil_dihedral + roll).sin() * tilt;
    let left_drop = (foil_dihedral - roll).sin() * tilt;

    Ok(Submergence {
        right: side_submergence(height, right_drop, foil_length)?,
        left: side_submergence(height, left_drop, foil_length)?,
    })
}

/// Splits one foil where `h(s) = height - drop * s` crosses zero; `h < 0` is wet.
fn side_submergence(
    height: f64,
    drop: f64,
    length: f64,
) -> Result<SideSubmergence, GeometryError> {
    use std::cmp::Ordering;

    let drop = classify("foil drop rate", drop)?;
    let crossing = || (height / drop).clamp(0.0, length);

    let (root_wet, cut) = match drop.partial_cmp(&0.0) {
        // tip below the root: dry inboard, wet outboard of the crossing
        Some(Ordering::Greater) => (false, crossing()),
        // tip above the root: wet inboard, dry outboard
        Some(Ordering::Less) => (true, crossing()),
        Some(Ordering::Equal) => (height < 0.0, length),
        None => {
            return Err(GeometryError::UndefinedBranch {
                quantity: "foil drop rate",
                value: drop,
            })
        }
    };

    let inboard = cut;
    let outboard = length - cut;
    let inboard_mid = 0.5 * cut;
    let outboard_mid = 0.5 * (cut + length);

    Ok(if root_wet {
        SideSubmergence {
            length_air: outboard,
            length_water: inboard,
            mid_air: outboard_mid,
            mid_water: inboard_mid,
        }
    } else {
        SideSubmergence {
            length_air: inboard,
            length_water: outboard,
            mid_air: inboard_mid,
            mid_water: outboard_mid,
        }
    })
}

/// Front-view lever arms about the CG roll axis.
///
/// Foil lift acts normal to the foil span, so each arm is the distance along
/// the foil from the foot of the CG's perpendicular to the segment midpoint.
/// Roll only enters through the wetted lengths.
pub fn roll_moment_arms(
    sub: &Submergence,
    foil_dihedral: f64,
    cg_y: f64,
    cg_z: f64,
) -> FoilPair<f64> {
    let (sin_g, cos_g) = foil_dihedral.sin_cos();
    // CG projected onto each foil's spanwise direction
    let cg_along_right = cg_y * cos_g - cg_z * sin_g;
    let cg_along_left = -cg_y * cos_g - cg_z * sin_g;

    FoilPair {
        right: Segments {
            air: sub.right.mid_air - cg_along_right,
            water: sub.right.mid_water - cg_along_right,
        },
        left: Segments {
            air: sub.left.mid_air - cg_along_left,
            water: sub.left.mid_water - cg_along_left,
        },
    }
}

/// Side-view lever arms about the CG pitch axis. The foils lie in the
/// transverse plane through the foil station, `cg_x` behind the CG.
pub fn pitch_moment_arms(
    sub: &Submergence,
    foil_dihedral: f64,
    pitch: f64,
    cg_x: f64,
    cg_z: f64,
) -> FoilPair<PitchLever> {
    let sin_g = foil_dihedral.sin();
    let lever = |mid: f64| body_pitch_lever(-cg_x, -mid * sin_g - cg_z, pitch);

    FoilPair {
        right: Segments {
            air: lever(sub.right.mid_air),
            water: lever(sub.right.mid_water),
        },
        left: Segments {
            air: lever(sub.left.mid_air),
            water: lever(sub.left.mid_water),
        },
    }
}

/// Lever of a body point `(dx, dz)` relative to the CG after pitching.
pub(super) fn body_pitch_lever(dx: f64, dz: f64, pitch: f64) -> PitchLever {
    let (sin_p, cos_p) = pitch.sin_cos();
    let x_earth = dx * cos_p - dz * sin_p;
    let z_earth = dx * sin_p + dz * cos_p;
    PitchLever {
        lift: x_earth,
        drag: -z_earth,
    }
}
