use anyhow::Result;
use clap::Parser;
use tracing::info;

use sim::{execute, load_config, roll_curve, sweep, Args, Outcome};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let cfg = load_config(&args.config)?;
    info!(?cfg, "Run config loaded");

    if let Some(max_deg) = args.roll_curve_deg {
        for p in roll_curve(&cfg, max_deg, 21)? {
            println!(
                "roll={:+.2} deg  torque={:+.1} N*m  wet_r={:.3} m  wet_l={:.3} m{}",
                p.roll.to_degrees(),
                p.roll_torque,
                p.right_wetted,
                p.left_wetted,
                if p.restoring() { "" } else { "  (upsetting)" }
            );
        }
        return Ok(());
    }

    if !args.sweep_thrust.is_empty() {
        for summary in sweep(&cfg, &args.sweep_thrust) {
            println!("{}", summary?);
        }
        return Ok(());
    }

    let report = execute(&cfg)?;
    if args.print_states {
        for (t, s) in report.timed() {
            println!(
                "t={t:.3} x={:.3} z={:.3} pitch={:+.4} roll={:+.4} vx={:.3} vz={:+.3}",
                s.x, s.z, s.pitch, s.roll, s.vx, s.vz
            );
        }
    }
    println!("{}", report.summary());

    match report.outcome {
        Outcome::Aborted(err) => Err(anyhow::Error::new(err).context("simulation aborted")),
        Outcome::Terminated(_) => Ok(()),
    }
}
