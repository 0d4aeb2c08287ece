use std::path::PathBuf;

use anyhow::{Context, Result};
use cardiogate_core::gating::GatingSession;
use clap::Args;

use super::InputArgs;

#[derive(Args)]
pub struct SignalsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write the traces as CSV instead of printing a table
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

const COLUMNS: [&str; 6] = [
    "frame",
    "maxima",
    "extrema",
    "maxima_unfiltered",
    "extrema_unfiltered",
    "phase",
];

/// Print the composite curves and automatic phase per frame.
pub fn run(args: &SignalsArgs) -> Result<()> {
    let loaded = args.input.load()?;
    let mut session = GatingSession::new();
    let traces = loaded.engine.run(&loaded.input, &mut session)?;
    let scaled = &traces.scaled;

    let rows = traces.frame_numbers.iter().enumerate().map(|(pos, &number)| {
        let phase = session
            .phase_of(number - 1)
            .map(|p| p.letter().to_string())
            .unwrap_or_default();
        (
            number,
            scaled.maxima.filtered[pos],
            scaled.extrema.filtered[pos],
            scaled.maxima.unfiltered[pos],
            scaled.extrema.unfiltered[pos],
            phase,
        )
    });

    if let Some(ref path) = args.csv {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        writer.write_record(COLUMNS)?;
        for (number, max_f, ext_f, max_u, ext_u, phase) in rows {
            writer.write_record([
                number.to_string(),
                max_f.to_string(),
                ext_f.to_string(),
                max_u.to_string(),
                ext_u.to_string(),
                phase,
            ])?;
        }
        writer.flush()?;
        println!("Signals saved to {}", path.display());
        return Ok(());
    }

    println!(
        "{:>6}  {:>12}  {:>12}  {:>12}  {:>12}  {:>5}",
        "Frame", "Maxima", "Extrema", "Max (raw)", "Ext (raw)", "Phase"
    );
    println!("{}", "-".repeat(70));
    for (number, max_f, ext_f, max_u, ext_u, phase) in rows {
        println!(
            "{:>6}  {:>12.6}  {:>12.6}  {:>12.6}  {:>12.6}  {:>5}",
            number, max_f, ext_f, max_u, ext_u, phase
        );
    }

    Ok(())
}
