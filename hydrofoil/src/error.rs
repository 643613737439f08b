use std::fmt;

use thiserror::Error;

/// Which coefficient a lookup was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoefficientKind {
    Lift,
    Drag,
}

impl fmt::Display for CoefficientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoefficientKind::Lift => f.write_str("lift"),
            CoefficientKind::Drag => f.write_str("drag"),
        }
    }
}

/// Lifting surface a force was being evaluated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Foil,
    Tail,
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Foil => f.write_str("foil"),
            Surface::Tail => f.write_str("tail"),
        }
    }
}

/// Part of the step pipeline that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Geometry,
    Force,
    Integrator,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Geometry => f.write_str("geometry model"),
            Component::Force => f.write_str("force model"),
            Component::Integrator => f.write_str("integrator"),
        }
    }
}

/// Divisors in the acceleration formulas that are unusable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumericalError {
    #[error("`{name}` = {value} is too close to zero to divide by")]
    NearZeroDivisor { name: &'static str, value: f64 },
}

/// Rejected parameters, detected before the first step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("parameter `{name}` must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("parameter `{name}` = {value} is out of range: {reason}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("invalid coefficient table: {0}")]
    Table(String),
    #[error(transparent)]
    Numerical(#[from] NumericalError),
}

impl ConfigError {
    pub(crate) fn check_finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(ConfigError::NonFinite { name, value })
        }
    }
}

/// A coefficient database was queried outside the angles it covers.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("angle of attack {aoa} rad is outside the coefficient domain [{min}, {max}]")]
pub struct OutOfRangeError {
    pub aoa: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("{quantity} = {value} cannot be classified; submergence branch is undefined")]
    UndefinedBranch { quantity: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForceEvaluationError {
    #[error("{kind} coefficient lookup failed")]
    OutOfRange {
        kind: CoefficientKind,
        #[source]
        source: OutOfRangeError,
    },
    #[error("{kind} coefficient source returned {value} at aoa {aoa}")]
    NonFiniteCoefficient {
        kind: CoefficientKind,
        aoa: f64,
        value: f64,
    },
    #[error("malformed {quantity} for force evaluation: {value}")]
    MalformedInput { quantity: &'static str, value: f64 },
}

/// Failure of a single `compute_accels` evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("{surface} force: {source}")]
    Force {
        surface: Surface,
        #[source]
        source: ForceEvaluationError,
    },
}

impl EvaluationError {
    pub fn component(&self) -> Component {
        match self {
            EvaluationError::Geometry(_) => Component::Geometry,
            EvaluationError::Force { .. } => Component::Force,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StepFailure {
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error("state field `{field}` became {value}")]
    Diverged { field: &'static str, value: f64 },
}

impl StepFailure {
    pub fn component(&self) -> Component {
        match self {
            StepFailure::Evaluation(e) => e.component(),
            StepFailure::Diverged { .. } => Component::Integrator,
        }
    }
}

/// A tick that could not be completed. `step` counts ticks with the initial
/// state as tick 0, so it equals the number of states emitted before it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("step {step} failed in the {component}: {failure}")]
pub struct StepError {
    pub step: u64,
    pub component: Component,
    #[source]
    pub failure: StepFailure,
}

impl StepError {
    pub(crate) fn new(step: u64, failure: StepFailure) -> Self {
        Self {
            step,
            component: failure.component(),
            failure,
        }
    }
}

/// Outcome of an eager run that did not reach a termination predicate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("run aborted after {} states: {error}", .partial.len())]
    Aborted {
        /// States emitted before the failure. The first element is the
        /// initial state, so the length is one more than the number of
        /// completed steps and equals `error.step`.
        partial: Vec<crate::VehicleState>,
        #[source]
        error: StepError,
    },
}
