pub mod config;
pub mod gate;
pub mod signals;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use cardiogate_core::frame::Frame;
use cardiogate_core::gating::{AppConfig, GatingEngine, GatingInput};
use cardiogate_core::io::FrameDirectory;
use cardiogate_core::range::FrameRange;
use cardiogate_core::report::{suggest_intramural_range, ContourReport};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// Acquisition inputs shared by the gating commands.
#[derive(Args)]
pub struct InputArgs {
    /// Directory with one image per frame (sorted by file name)
    pub frames: PathBuf,

    /// Per-frame contour report (CSV)
    pub report: PathBuf,

    /// TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// First frame of the range (1-based)
    #[arg(long)]
    pub from: Option<usize>,

    /// Last frame of the range (1-based, inclusive)
    #[arg(long)]
    pub to: Option<usize>,

    /// Restrict a full-acquisition run to the suggested intramural range
    #[arg(long)]
    pub auto_range: bool,

    /// Acquisition frame rate in Hz (overrides the config fallback)
    #[arg(long)]
    pub frame_rate: Option<f64>,
}

/// Everything a gating command needs after loading.
pub struct Loaded {
    pub config: AppConfig,
    pub total_frames: usize,
    pub input: GatingInput,
    pub engine: GatingEngine,
}

impl InputArgs {
    pub fn load(&self) -> Result<Loaded> {
        let config = match &self.config {
            Some(path) => AppConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => AppConfig::default(),
        };

        let frames = read_frames(&self.frames)?;
        let report = ContourReport::load_csv(&self.report)
            .with_context(|| format!("Failed to read report {}", self.report.display()))?;

        let range = self.frame_range(frames.len(), &report, &config)?;
        let input = GatingInput::select(
            &frames,
            &report,
            range,
            config.gating.intramural_threshold,
        )?;
        let engine = GatingEngine::from_app_config(&config, self.frame_rate)?;

        Ok(Loaded {
            config,
            total_frames: frames.len(),
            input,
            engine,
        })
    }

    fn frame_range(
        &self,
        total: usize,
        report: &ContourReport,
        config: &AppConfig,
    ) -> Result<FrameRange> {
        let lower = self.from.map_or(0, |n| n.saturating_sub(1));
        let upper = self.to.unwrap_or(total);
        if lower >= upper || upper > total {
            bail!(
                "Invalid frame range {}-{} for an acquisition of {} frames",
                lower + 1,
                upper,
                total
            );
        }
        let range = FrameRange::new(lower, upper, total)?;

        if self.auto_range && range.is_full(total) {
            match suggest_intramural_range(report, config.gating.intramural_threshold) {
                Some(suggested) => {
                    info!(from = suggested.lower + 1, to = suggested.upper, "using intramural range");
                    return Ok(suggested);
                }
                None => println!("No intramural segment found, gating the full acquisition"),
            }
        }
        Ok(range)
    }
}

fn read_frames(dir: &std::path::Path) -> Result<Vec<Frame>> {
    let seq = FrameDirectory::open(dir)
        .with_context(|| format!("No frames found in {}", dir.display()))?;

    let pb = ProgressBar::new(seq.frame_count() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Reading frames");

    let frames: Vec<Frame> = seq
        .frames()
        .enumerate()
        .map(|(i, f)| {
            pb.set_position(i as u64 + 1);
            f
        })
        .collect::<std::result::Result<_, _>>()?;
    pb.finish_and_clear();

    cardiogate_core::io::frame_dir::check_uniform(&frames)?;
    Ok(frames)
}
