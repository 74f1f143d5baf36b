//! G-code inspection.

pub mod duration;

pub use duration::{DurationExtractor, DurationMatch, PatternFamily};
