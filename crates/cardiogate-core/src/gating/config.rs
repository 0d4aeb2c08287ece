use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_FRAME_RATE;
use crate::error::{GatingError, Result};
use crate::frame::CropRegion;
use crate::signal::condition::BandPass;
use crate::signal::peaks::PeakParams;

/// Parameters of the gating engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatingConfig {
    /// Minimum rolling elliptic ratio for the intramural range suggestion.
    pub intramural_threshold: f64,
    /// Band-pass low cutoff (Hz).
    pub lowcut: f64,
    /// Band-pass high cutoff (Hz).
    pub highcut: f64,
    /// Butterworth order.
    pub order: usize,
    /// Moving-average window used before weighting.
    pub window_size: usize,
    /// Percentile of the signal used as minimum peak height.
    pub min_height_percentile: f64,
    /// Minimum distance (frames) between peaks.
    pub min_distance: usize,
    /// Maximum distance (frames) between matched image and contour peaks.
    pub auto_gating_threshold: usize,
    /// Use all extrema of the image-based curve instead of maxima only.
    pub both_extrema: bool,
}

impl Default for GatingConfig {
    fn default() -> Self {
        Self {
            intramural_threshold: 0.6,
            lowcut: 0.45,
            highcut: 1.8,
            order: 4,
            window_size: 5,
            min_height_percentile: 50.0,
            min_distance: 5,
            auto_gating_threshold: 5,
            both_extrema: true,
        }
    }
}

impl GatingConfig {
    /// Reject parameter combinations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.order == 0 {
            return Err(GatingError::Config("order must be at least 1".into()));
        }
        if self.window_size == 0 {
            return Err(GatingError::Config("window_size must be at least 1".into()));
        }
        if self.min_distance == 0 {
            return Err(GatingError::Config("min_distance must be at least 1".into()));
        }
        if !(0.0..=100.0).contains(&self.min_height_percentile) {
            return Err(GatingError::Config(format!(
                "min_height_percentile must lie in [0, 100] (got {})",
                self.min_height_percentile
            )));
        }
        if !(self.lowcut > 0.0 && self.highcut > self.lowcut) {
            return Err(GatingError::Config(format!(
                "cutoffs must satisfy 0 < lowcut < highcut (got {}, {})",
                self.lowcut, self.highcut
            )));
        }
        Ok(())
    }

    pub fn band_pass(&self, frame_rate: f64) -> BandPass {
        BandPass {
            lowcut: self.lowcut,
            highcut: self.highcut,
            order: self.order,
            frame_rate,
        }
    }

    pub fn peak_params(&self) -> PeakParams {
        PeakParams {
            min_height_percentile: self.min_height_percentile,
            min_distance: self.min_distance,
        }
    }
}

/// Which peaks of the image-based curve take part in matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeakMode {
    AllExtrema,
    MaximaOnly,
}

impl From<bool> for PeakMode {
    fn from(both_extrema: bool) -> Self {
        if both_extrema {
            Self::AllExtrema
        } else {
            Self::MaximaOnly
        }
    }
}

impl fmt::Display for PeakMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllExtrema => write!(f, "Extrema"),
            Self::MaximaOnly => write!(f, "Maxima"),
        }
    }
}

/// Colors used for phase markers, as RGB.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub diastole_color: [u8; 3],
    pub systole_color: [u8; 3],
    pub neutral_color: [u8; 3],
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            diastole_color: [39, 69, 219],
            systole_color: [209, 55, 38],
            neutral_color: [128, 128, 128],
        }
    }
}

/// Complete application configuration, as stored in TOML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Frame rate (Hz) used when the input carries none.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
    #[serde(default)]
    pub gating: GatingConfig,
    #[serde(default)]
    pub crop: CropRegion,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_frame_rate() -> f64 {
    DEFAULT_FRAME_RATE
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            gating: GatingConfig::default(),
            crop: CropRegion::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| GatingError::Config(e.to_string()))?;
        config.gating.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| GatingError::Config(e.to_string()))
    }
}
