//! Slicing engine invocation

pub mod engine;
pub mod invoker;
pub mod job;

pub use engine::{EngineResolver, Platform};
pub use invoker::{SlicerInvoker, SlicerSettings};
pub use job::SliceJob;
