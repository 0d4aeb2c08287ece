use std::path::PathBuf;

use anyhow::{Context, Result};
use cardiogate_core::gating::GatingSession;
use clap::Args;
use serde::Serialize;

use super::InputArgs;
use crate::summary::{print_gating_result, print_gating_summary};

#[derive(Args)]
pub struct GateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Save the gated frames as TOML
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Saved gating result. Frame lists are 0-based indices.
#[derive(Serialize)]
struct GatingResult {
    first_frame: usize,
    last_frame: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    factor_diff: Option<f64>,
    diastole_indices: Vec<usize>,
    systole_indices: Vec<usize>,
}

pub fn run(args: &GateArgs) -> Result<()> {
    let loaded = args.input.load()?;
    let mut session = GatingSession::new();
    let traces = loaded.engine.run(&loaded.input, &mut session)?;

    print_gating_summary(
        &args.input.frames,
        &args.input.report,
        &loaded.config,
        loaded.engine.frame_rate(),
        loaded.total_frames,
        &traces,
    );
    print_gating_result(&session);

    if let Some(ref path) = args.output {
        let result = GatingResult {
            first_frame: traces.range.lower + 1,
            last_frame: traces.range.upper,
            factor_diff: traces.scaled.factor_diff,
            diastole_indices: session.diastole_frames(),
            systole_indices: session.systole_frames(),
        };
        let toml_str = toml::to_string_pretty(&result)?;
        std::fs::write(path, toml_str)
            .with_context(|| format!("Failed to write result to {}", path.display()))?;
        println!("Gating result saved to {}", path.display());
    }

    Ok(())
}
