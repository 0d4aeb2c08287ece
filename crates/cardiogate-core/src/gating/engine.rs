use std::time::Instant;

use tracing::{debug, info};

use crate::error::{GatingError, Result};
use crate::frame::{CropRegion, Frame, FrameSeries};
use crate::gating::auto::{apply_if_unset, automatic_gating, AutoGating};
use crate::gating::config::{AppConfig, GatingConfig, PeakMode};
use crate::gating::scaling::ScaledTraces;
use crate::gating::session::GatingSession;
use crate::range::FrameRange;
use crate::report::{suggest_intramural_range, ContourReport, RangeReport};
use crate::signal::condition::condition;
use crate::signal::fuse::combined_signal;
use crate::signal::{extract, ConditionedSignal, RawSignal, SignalKind};

/// Frames and report rows of the active range, checked against each other.
#[derive(Clone, Debug)]
pub struct GatingInput {
    pub frames: FrameSeries,
    pub report: RangeReport,
}

impl GatingInput {
    /// Select `range` from a loaded acquisition.
    ///
    /// Fails without touching any state when nothing is loaded or when frames
    /// of the range lack contour rows. For a full-acquisition range the
    /// intramural suggestion is computed and logged.
    pub fn select(
        all_frames: &[Frame],
        report: &ContourReport,
        range: FrameRange,
        intramural_threshold: f64,
    ) -> Result<Self> {
        if all_frames.is_empty() || report.is_empty() {
            return Err(GatingError::NoInputLoaded);
        }
        let range = FrameRange::new(range.lower, range.upper, all_frames.len())?;

        if range.is_full(all_frames.len()) {
            suggest_intramural_range(report, intramural_threshold);
        }

        let report = report.select(&range)?;
        let frames = FrameSeries::from_range(all_frames, range.lower, range.upper)?;
        Ok(Self { frames, report })
    }
}

/// Everything computed for one gating attempt.
#[derive(Clone, Debug)]
pub struct GatingTraces {
    /// 1-based frame numbers (plot x-axis).
    pub frame_numbers: Vec<usize>,
    pub range: FrameRange,
    pub conditioned: Vec<ConditionedSignal>,
    pub scaled: ScaledTraces,
}

impl GatingTraces {
    pub fn signal(&self, kind: SignalKind) -> Option<&ConditionedSignal> {
        self.conditioned.iter().find(|s| s.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.frame_numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_numbers.is_empty()
    }
}

/// Multi-signal gating engine.
#[derive(Clone, Debug)]
pub struct GatingEngine {
    config: GatingConfig,
    crop: CropRegion,
    frame_rate: f64,
}

impl GatingEngine {
    pub fn new(config: GatingConfig, crop: CropRegion, frame_rate: f64) -> Result<Self> {
        config.validate()?;
        config.band_pass(frame_rate).design()?;
        Ok(Self {
            config,
            crop,
            frame_rate,
        })
    }

    /// Build from application config; `frame_rate` overrides the configured
    /// fallback when the input carries one.
    pub fn from_app_config(app: &AppConfig, frame_rate: Option<f64>) -> Result<Self> {
        Self::new(
            app.gating.clone(),
            app.crop.clone(),
            frame_rate.unwrap_or(app.frame_rate),
        )
    }

    pub fn config(&self) -> &GatingConfig {
        &self.config
    }

    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    /// Raw measurements: image signals from the cropped frames, geometric
    /// signals from the report.
    pub fn extract(&self, input: &GatingInput) -> Result<Vec<RawSignal>> {
        if input.frames.len() != input.report.len() {
            return Err(GatingError::DimensionMismatch {
                expected: input.report.len(),
                actual: input.frames.len(),
            });
        }
        let cropped = input.frames.cropped(&self.crop);
        let frames = cropped.frames();

        Ok(vec![
            RawSignal {
                kind: SignalKind::Correlation,
                values: extract::correlation(frames),
            },
            RawSignal {
                kind: SignalKind::Blur,
                values: extract::blur(frames),
            },
            RawSignal {
                kind: SignalKind::ShortestDistance,
                values: input.report.column(|r| r.shortest_distance),
            },
            RawSignal {
                kind: SignalKind::VectorAngle,
                values: input.report.column(|r| r.vector_angle),
            },
            RawSignal {
                kind: SignalKind::VectorLength,
                values: input.report.column(|r| r.vector_length),
            },
        ])
    }

    /// Extract, condition and fuse all signals of the range.
    pub fn prepare(&self, input: &GatingInput) -> Result<GatingTraces> {
        let start = Instant::now();
        let band = self.config.band_pass(self.frame_rate);

        let conditioned = self
            .extract(input)?
            .iter()
            .map(|raw| condition(raw, &band))
            .collect::<Result<Vec<_>>>()?;

        let group = |kinds: &[SignalKind]| -> Vec<ConditionedSignal> {
            kinds
                .iter()
                .filter_map(|k| conditioned.iter().find(|s| s.kind == *k).cloned())
                .collect()
        };
        let peaks = self.config.peak_params();
        let maxima = combined_signal(
            &group(SignalKind::MAXIMA_GROUP),
            true,
            self.config.window_size,
            &peaks,
        )?;
        let extrema = combined_signal(
            &group(SignalKind::EXTREMA_GROUP),
            false,
            self.config.window_size,
            &peaks,
        )?;
        let scaled = ScaledTraces::new(maxima, extrema);

        debug!(frames = input.frames.len(), elapsed = ?start.elapsed(), "prepared gating traces");
        Ok(GatingTraces {
            frame_numbers: input.report.frame_numbers(),
            range: input.report.range(),
            conditioned,
            scaled,
        })
    }

    /// Automatic gating of prepared traces, without touching any session.
    pub fn gate(&self, traces: &GatingTraces, report: &RangeReport) -> AutoGating {
        automatic_gating(
            &traces.scaled.maxima.filtered,
            &traces.scaled.extrema.filtered,
            report,
            PeakMode::from(self.config.both_extrema),
            &self.config.peak_params(),
            self.config.auto_gating_threshold,
        )
    }

    /// Prepare the traces and, when the session holds no gating yet, run
    /// automatic gating into it.
    pub fn run(&self, input: &GatingInput, session: &mut GatingSession) -> Result<GatingTraces> {
        let traces = self.prepare(input)?;
        if session.is_empty() {
            let result = self.gate(&traces, &input.report);
            apply_if_unset(session, &result);
        } else {
            info!("manual gating present, automatic gating skipped");
        }
        Ok(traces)
    }
}
