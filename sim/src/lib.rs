//! Run files, the command-line surface and parallel sweeps for the
//! `hydrofoil` equations of motion.

mod args;
pub use args::Args;

mod config;
pub use config::{load_config, parse_config, CoefficientConfig, RunConfig};

mod runs;
pub use runs::{execute, roll_curve, sweep, Outcome, RunReport, RunSummary};
