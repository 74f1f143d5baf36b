//! Seams between the pipeline stages.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::SlicingError;

/// Turns a mesh file into a G-code file on disk.
#[async_trait]
pub trait Slicer: Send + Sync {
    /// Slice `mesh_path` and return the path of the produced G-code.
    async fn slice(&self, mesh_path: &Path) -> Result<PathBuf, SlicingError>;

    /// Path of the engine executable this slicer would run.
    fn engine_path(&self) -> PathBuf;
}
