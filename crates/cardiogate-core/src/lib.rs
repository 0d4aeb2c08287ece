pub mod annotation;
pub mod consts;
pub mod error;
pub mod frame;
pub mod gating;
pub mod io;
pub mod range;
pub mod report;
pub mod signal;
