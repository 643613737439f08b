//! Lift and drag coefficient sources.
//!
//! The dynamics never look at a coefficient database directly; they go through
//! [`CoefficientSource`] so tests and configs can supply fixed, tabulated or
//! analytic values. Sources must fail on angles outside their domain instead
//! of clamping.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, OutOfRangeError};

pub trait CoefficientSource {
    fn lift_coefficient(&self, aoa: f64) -> Result<f64, OutOfRangeError>;
    fn drag_coefficient(&self, aoa: f64) -> Result<f64, OutOfRangeError>;
}

impl<T: CoefficientSource + ?Sized> CoefficientSource for &T {
    fn lift_coefficient(&self, aoa: f64) -> Result<f64, OutOfRangeError> {
        (**self).lift_coefficient(aoa)
    }

    fn drag_coefficient(&self, aoa: f64) -> Result<f64, OutOfRangeError> {
        (**self).drag_coefficient(aoa)
    }
}

impl<T: CoefficientSource + ?Sized> CoefficientSource for Box<T> {
    fn lift_coefficient(&self, aoa: f64) -> Result<f64, OutOfRangeError> {
        (**self).lift_coefficient(aoa)
    }

    fn drag_coefficient(&self, aoa: f64) -> Result<f64, OutOfRangeError> {
        (**self).drag_coefficient(aoa)
    }
}

fn check_domain(aoa: f64, min: f64, max: f64) -> Result<(), OutOfRangeError> {
    // NaN fails both comparisons and lands here too
    if aoa >= min && aoa <= max {
        Ok(())
    } else {
        Err(OutOfRangeError { aoa, min, max })
    }
}

/// The same coefficients at every angle, optionally restricted to a domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstantCoefficients {
    pub lift: f64,
    pub drag: f64,
    /// Inclusive `[min, max]` angle-of-attack domain (rad).
    #[serde(default)]
    pub domain: Option<[f64; 2]>,
}

impl ConstantCoefficients {
    pub fn new(lift: f64, drag: f64) -> Self {
        Self {
            lift,
            drag,
            domain: None,
        }
    }

    pub fn with_domain(mut self, min: f64, max: f64) -> Self {
        self.domain = Some([min, max]);
        self
    }

    fn check(&self, aoa: f64) -> Result<(), OutOfRangeError> {
        match self.domain {
            Some([min, max]) => check_domain(aoa, min, max),
            None if aoa.is_nan() => Err(OutOfRangeError {
                aoa,
                min: f64::NEG_INFINITY,
                max: f64::INFINITY,
            }),
            None => Ok(()),
        }
    }
}

impl CoefficientSource for ConstantCoefficients {
    fn lift_coefficient(&self, aoa: f64) -> Result<f64, OutOfRangeError> {
        self.check(aoa)?;
        Ok(self.lift)
    }

    fn drag_coefficient(&self, aoa: f64) -> Result<f64, OutOfRangeError> {
        self.check(aoa)?;
        Ok(self.drag)
    }
}

/// Tabulated coefficients with linear interpolation between samples.
///
/// Angles must be strictly increasing; lookups outside `[aoa[0], aoa[n-1]]`
/// fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableColumns", into = "TableColumns")]
pub struct CoefficientTable {
    aoa: Vec<f64>,
    lift: Vec<f64>,
    drag: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableColumns {
    aoa: Vec<f64>,
    lift: Vec<f64>,
    drag: Vec<f64>,
}

impl TryFrom<TableColumns> for CoefficientTable {
    type Error = ConfigError;

    fn try_from(c: TableColumns) -> Result<Self, Self::Error> {
        CoefficientTable::new(c.aoa, c.lift, c.drag)
    }
}

impl From<CoefficientTable> for TableColumns {
    fn from(t: CoefficientTable) -> Self {
        TableColumns {
            aoa: t.aoa,
            lift: t.lift,
            drag: t.drag,
        }
    }
}

impl CoefficientTable {
    pub fn new(aoa: Vec<f64>, lift: Vec<f64>, drag: Vec<f64>) -> Result<Self, ConfigError> {
        if aoa.len() < 2 {
            return Err(ConfigError::Table(format!(
                "need at least two samples, got {}",
                aoa.len()
            )));
        }
        if lift.len() != aoa.len() || drag.len() != aoa.len() {
            return Err(ConfigError::Table(format!(
                "column lengths differ: aoa={}, lift={}, drag={}",
                aoa.len(),
                lift.len(),
                drag.len()
            )));
        }
        if let Some(v) = aoa.iter().chain(&lift).chain(&drag).find(|v| !v.is_finite()) {
            return Err(ConfigError::Table(format!("non-finite entry {v}")));
        }
        if let Some(w) = aoa.windows(2).find(|w| w[1] <= w[0]) {
            return Err(ConfigError::Table(format!(
                "angles must be strictly increasing ({} then {})",
                w[0], w[1]
            )));
        }
        Ok(Self { aoa, lift, drag })
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.aoa[0], self.aoa[self.aoa.len() - 1])
    }

    fn interpolate(&self, column: &[f64], aoa: f64) -> Result<f64, OutOfRangeError> {
        let (min, max) = self.domain();
        check_domain(aoa, min, max)?;
        // index of the first sample strictly above aoa, kept inside the table
        let hi = self.aoa.partition_point(|&a| a <= aoa).clamp(1, self.aoa.len() - 1);
        let lo = hi - 1;
        let t = (aoa - self.aoa[lo]) / (self.aoa[hi] - self.aoa[lo]);
        Ok(column[lo] * (1.0 - t) + column[hi] * t)
    }
}

impl CoefficientSource for CoefficientTable {
    fn lift_coefficient(&self, aoa: f64) -> Result<f64, OutOfRangeError> {
        self.interpolate(&self.lift, aoa)
    }

    fn drag_coefficient(&self, aoa: f64) -> Result<f64, OutOfRangeError> {
        self.interpolate(&self.drag, aoa)
    }
}

/// Thin-section estimate: `cl = slope * aoa`, `cd = cd0 + k * cl^2`, valid up
/// to `stall_aoa` either side of zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlatPlate {
    #[serde(default = "default_lift_slope")]
    pub lift_slope: f64,
    pub cd0: f64,
    pub induced_drag_factor: f64,
    pub stall_aoa: f64,
}

fn default_lift_slope() -> f64 {
    std::f64::consts::TAU
}

impl FlatPlate {
    fn lift(&self, aoa: f64) -> Result<f64, OutOfRangeError> {
        check_domain(aoa, -self.stall_aoa, self.stall_aoa)?;
        Ok(self.lift_slope * aoa)
    }
}

impl CoefficientSource for FlatPlate {
    fn lift_coefficient(&self, aoa: f64) -> Result<f64, OutOfRangeError> {
        self.lift(aoa)
    }

    fn drag_coefficient(&self, aoa: f64) -> Result<f64, OutOfRangeError> {
        let cl = self.lift(aoa)?;
        Ok(self.cd0 + self.induced_drag_factor * cl * cl)
    }
}

/// Config-facing choice of coefficient source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoefficientModel {
    Constant(ConstantCoefficients),
    Table(CoefficientTable),
    FlatPlate(FlatPlate),
}

impl CoefficientSource for CoefficientModel {
    fn lift_coefficient(&self, aoa: f64) -> Result<f64, OutOfRangeError> {
        match self {
            CoefficientModel::Constant(c) => c.lift_coefficient(aoa),
            CoefficientModel::Table(t) => t.lift_coefficient(aoa),
            CoefficientModel::FlatPlate(p) => p.lift_coefficient(aoa),
        }
    }

    fn drag_coefficient(&self, aoa: f64) -> Result<f64, OutOfRangeError> {
        match self {
            CoefficientModel::Constant(c) => c.drag_coefficient(aoa),
            CoefficientModel::Table(t) => t.drag_coefficient(aoa),
            CoefficientModel::FlatPlate(p) => p.drag_coefficient(aoa),
        }
    }
}
