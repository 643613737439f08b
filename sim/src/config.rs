use std::path::Path;

use anyhow::{Context, Result};
use hydrofoil::{
    presets, CoefficientModel, EnvParams, FlatPlate, RunSettings, VehicleParams, VehicleState,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Everything one simulation needs, as read from a run file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub vehicle: VehicleParams,
    pub environment: EnvParams,
    #[serde(default)]
    pub initial: VehicleState,
    pub run: RunSettings,
    pub coefficients: CoefficientConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoefficientConfig {
    pub foil: CoefficientModel,
    pub tail: CoefficientModel,
}

impl RunConfig {
    /// Demo craft launched at 6 m/s with the foil root 0.3 m up.
    pub fn demo() -> Self {
        let section = CoefficientModel::FlatPlate(FlatPlate {
            lift_slope: std::f64::consts::TAU,
            cd0: 0.01,
            induced_drag_factor: 0.05,
            stall_aoa: 0.35,
        });
        Self {
            vehicle: presets::demo_craft(),
            environment: EnvParams::standard(),
            initial: VehicleState {
                vx: 6.0,
                ..VehicleState::at_height(0.3)
            },
            run: RunSettings {
                dt: 0.01,
                run_time: 5.0,
                target_height: 0.8,
            },
            coefficients: CoefficientConfig {
                foil: section.clone(),
                tail: section,
            },
        }
    }

    /// Same run with a different propulsor force.
    pub fn with_thrust(&self, thrust: f64) -> Self {
        let mut cfg = self.clone();
        cfg.vehicle.thrust = thrust;
        cfg
    }
}

pub fn parse_config(text: &str) -> Result<RunConfig> {
    toml::from_str(text).context("invalid run config")
}

/// Reads a run file, falling back to [`RunConfig::demo`] when `path` does not exist.
pub fn load_config(path: &Path) -> Result<RunConfig> {
    if !path.exists() {
        info!(path = %path.display(), "no run file found, using the demo craft");
        return Ok(RunConfig::demo());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading run file {}", path.display()))?;
    parse_config(&text).with_context(|| format!("loading {}", path.display()))
}
