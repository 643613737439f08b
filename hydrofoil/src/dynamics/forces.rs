use crate::coefficients::CoefficientSource;
use crate::error::{CoefficientKind, ForceEvaluationError};

/// Lift on a rectangular foil segment: `0.5 * rho * cl(aoa) * span * chord * v^2`.
pub fn lift(
    density: f64,
    span: f64,
    chord: f64,
    velocity: f64,
    aoa: f64,
    coefficients: &dyn CoefficientSource,
) -> Result<f64, ForceEvaluationError> {
    let cl = coefficient(coefficients, CoefficientKind::Lift, aoa)?;
    dynamic_force(density, span * chord, velocity, cl)
}

/// Drag on a rectangular foil segment, same form as [`lift`].
pub fn drag(
    density: f64,
    span: f64,
    chord: f64,
    velocity: f64,
    aoa: f64,
    coefficients: &dyn CoefficientSource,
) -> Result<f64, ForceEvaluationError> {
    let cd = coefficient(coefficients, CoefficientKind::Drag, aoa)?;
    dynamic_force(density, span * chord, velocity, cd)
}

/// Lift on the submerged tail of planform `area`.
pub fn tail_lift(
    density: f64,
    area: f64,
    velocity: f64,
    aoa: f64,
    coefficients: &dyn CoefficientSource,
) -> Result<f64, ForceEvaluationError> {
    let cl = coefficient(coefficients, CoefficientKind::Lift, aoa)?;
    dynamic_force(density, area, velocity, cl)
}

pub fn tail_drag(
    density: f64,
    area: f64,
    velocity: f64,
    aoa: f64,
    coefficients: &dyn CoefficientSource,
) -> Result<f64, ForceEvaluationError> {
    let cd = coefficient(coefficients, CoefficientKind::Drag, aoa)?;
    dynamic_force(density, area, velocity, cd)
}

fn coefficient(
    source: &dyn CoefficientSource,
    kind: CoefficientKind,
    aoa: f64,
) -> Result<f64, ForceEvaluationError> {
    let value = match kind {
        CoefficientKind::Lift => source.lift_coefficient(aoa),
        CoefficientKind::Drag => source.drag_coefficient(aoa),
    }
    .map_err(|err| ForceEvaluationError::OutOfRange { kind, source: err })?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(ForceEvaluationError::NonFiniteCoefficient { kind, aoa, value })
    }
}

fn dynamic_force(
    density: f64,
    area: f64,
    velocity: f64,
    coefficient: f64,
) -> Result<f64, ForceEvaluationError> {
    if !density.is_finite() || density < 0.0 {
        return Err(ForceEvaluationError::MalformedInput {
            quantity: "density",
            value: density,
        });
    }
    if !area.is_finite() || area < 0.0 {
        return Err(ForceEvaluationError::MalformedInput {
            quantity: "area",
            value: area,
        });
    }
    if !velocity.is_finite() {
        return Err(ForceEvaluationError::MalformedInput {
            quantity: "velocity",
            value: velocity,
        });
    }
    if velocity == 0.0 {
        return Ok(0.0);
    }
    Ok(0.5 * density * coefficient * area * velocity * velocity)
}
