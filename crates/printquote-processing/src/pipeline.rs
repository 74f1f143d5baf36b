//! Quote pipeline: slice a mesh, read the estimate back, price it.

use printquote_core::{Config, PriceQuote, PricingTable};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::error::SlicingError;
use crate::gcode::{DurationExtractor, DurationMatch};
use crate::quote::QuoteCalculator;
use crate::slicer::{EngineResolver, Platform, SlicerInvoker, SlicerSettings};
use crate::traits::Slicer;

/// Reported as the print time when a quote is priced from the fallback hours.
pub const UNKNOWN_PRINT_TIME: &str = "unknown";

pub struct QuotePipeline {
    slicer: Arc<dyn Slicer>,
    extractor: DurationExtractor,
    calculator: QuoteCalculator,
    retain_intermediate_output: bool,
    fallback_print_hours: Option<f64>,
}

impl QuotePipeline {
    pub fn new(
        slicer: Arc<dyn Slicer>,
        extractor: DurationExtractor,
        calculator: QuoteCalculator,
    ) -> Self {
        Self {
            slicer,
            extractor,
            calculator,
            retain_intermediate_output: true,
            fallback_print_hours: None,
        }
    }

    /// Pipeline wired to the real slicing engine as configured.
    pub fn from_config(config: &Config) -> Result<Self, regex::Error> {
        let resolver = EngineResolver::new(
            Platform::current(),
            config.slicer_path_override().map(PathBuf::from),
        );
        let settings = SlicerSettings::new(config.scratch_dir())
            .with_profile(config.slicer_profile_path())
            .with_timeout(Duration::from_secs(config.slicer_timeout_secs()));

        let extractor = DurationExtractor::new()?.with_max_bytes(config.gcode_max_bytes());
        let calculator = QuoteCalculator::new(PricingTable::default())?;

        Ok(Self::new(
            Arc::new(SlicerInvoker::new(resolver, settings)),
            extractor,
            calculator,
        )
        .with_retain_intermediate_output(config.retain_intermediate_output())
        .with_fallback_print_hours(config.fallback_print_hours()))
    }

    /// When false, the G-code file is deleted once it has been read.
    pub fn with_retain_intermediate_output(mut self, retain: bool) -> Self {
        self.retain_intermediate_output = retain;
        self
    }

    /// Hours to price when the G-code carries no recognized estimate.
    pub fn with_fallback_print_hours(mut self, hours: Option<f64>) -> Self {
        self.fallback_print_hours = hours;
        self
    }

    pub fn slicer(&self) -> &Arc<dyn Slicer> {
        &self.slicer
    }

    pub fn calculator(&self) -> &QuoteCalculator {
        &self.calculator
    }

    pub fn extractor(&self) -> &DurationExtractor {
        &self.extractor
    }

    /// Slice `mesh_path` and return the estimate embedded in the output, if any.
    pub async fn estimate_duration(
        &self,
        mesh_path: &Path,
    ) -> Result<Option<DurationMatch>, SlicingError> {
        let gcode_path = self.slicer.slice(mesh_path).await?;
        let found = self.extractor.extract_from_path(&gcode_path).await;

        if !self.retain_intermediate_output {
            discard_gcode(&gcode_path).await;
        }

        found
    }

    /// Full pipeline for one mesh.
    ///
    /// `Ok(None)` means the estimate was missing and no fallback hours are configured.
    #[tracing::instrument(skip(self), fields(mesh_path = %mesh_path.display()))]
    pub async fn quote(
        &self,
        mesh_path: &Path,
        material: &str,
        color: &str,
    ) -> Result<Option<PriceQuote>, SlicingError> {
        let quote = match self.estimate_duration(mesh_path).await? {
            Some(found) => Some(self.calculator.quote(&found.text, material, color)),
            None => self.fallback_print_hours.map(|hours| {
                tracing::warn!(
                    fallback_hours = hours,
                    "No print duration found, pricing fallback hours"
                );
                self.calculator
                    .quote_hours(UNKNOWN_PRINT_TIME, hours, material, color)
            }),
        };

        if let Some(q) = &quote {
            tracing::info!(
                print_time = %q.print_time,
                total = q.total,
                material = %material,
                color = %color,
                "Quote ready"
            );
        }

        Ok(quote)
    }
}

async fn discard_gcode(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(
            error = %e,
            gcode_path = %path.display(),
            "Failed to delete intermediate G-code"
        );
    }
}
