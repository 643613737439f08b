use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "hydrofoil-sim")]
#[command(about = "Time-marching simulator for a V-foil hydrofoil craft", long_about = None)]
pub struct Args {
    /// Run file (TOML); the built-in demo craft is used when it does not exist
    #[arg(long, default_value = "hydrofoil.toml")]
    pub config: PathBuf,
    /// Comma-separated thrust values (N) to run side by side
    #[arg(long, value_delimiter = ',')]
    pub sweep_thrust: Vec<f64>,
    /// Print every state of the trajectory
    #[arg(long, default_value_t = false)]
    pub print_states: bool,
    /// Print the static roll torque curve out to this bank angle (degrees)
    #[arg(long)]
    pub roll_curve_deg: Option<f64>,
}
