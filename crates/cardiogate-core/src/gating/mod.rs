pub mod auto;
pub mod config;
pub mod engine;
pub mod scaling;
pub mod session;

pub use config::{AppConfig, DisplayConfig, GatingConfig, PeakMode};
pub use engine::{GatingEngine, GatingInput, GatingTraces};
pub use session::{GatingSession, Phase};
