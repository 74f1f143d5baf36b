//! Application state shared by every handler.

use printquote_core::Config;
use printquote_processing::{MeshValidator, QuotePipeline};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pipeline: Arc<QuotePipeline>,
    pub validator: Arc<MeshValidator>,
    /// One permit per slicer process allowed to run at once.
    pub slice_permits: Arc<Semaphore>,
}

impl AppState {
    pub fn new(config: Config, pipeline: QuotePipeline) -> Self {
        let validator = MeshValidator::new(
            config.max_mesh_size_bytes(),
            config.mesh_allowed_extensions().to_vec(),
        );
        let slice_permits = Arc::new(Semaphore::new(config.max_concurrent_slices()));

        Self {
            config,
            pipeline: Arc::new(pipeline),
            validator: Arc::new(validator),
            slice_permits,
        }
    }

    /// How long a request may wait for a free slicer slot.
    pub fn slot_wait(&self) -> Duration {
        Duration::from_secs(self.config.slicer_timeout_secs())
    }
}
