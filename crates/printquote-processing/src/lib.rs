//! PrintQuote Processing Library
//!
//! The STL-to-price pipeline: run an external slicing engine against an uploaded mesh,
//! recover the estimated print time from the produced G-code, and price it.

pub mod error;
pub mod gcode;
pub mod pipeline;
pub mod quote;
pub mod slicer;
pub mod traits;
pub mod validator;

pub use error::SlicingError;
pub use gcode::{DurationExtractor, DurationMatch, PatternFamily};
pub use pipeline::{QuotePipeline, UNKNOWN_PRINT_TIME};
pub use quote::QuoteCalculator;
pub use slicer::{EngineResolver, Platform, SliceJob, SlicerInvoker, SlicerSettings};
pub use traits::Slicer;
pub use validator::{display_name, MeshValidator, ValidationError};
