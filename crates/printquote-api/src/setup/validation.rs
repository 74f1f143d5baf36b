//! Configuration validation
//!
//! Checks run at startup, before any request is served.

use anyhow::Result;
use printquote_core::Config;

pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Please set specific allowed origins via CORS_ORIGINS environment variable."
        ));
    }

    if !config.slicer_profile_path().is_file() {
        tracing::warn!(
            profile_path = %config.slicer_profile_path().display(),
            "Slicer profile not found; the built-in quality preset will be used"
        );
    }

    if config.slicer_timeout_secs() > 600 {
        tracing::warn!(
            slicer_timeout_secs = config.slicer_timeout_secs(),
            "SLICER_TIMEOUT_SECS is very high - requests may hold connections for a long time"
        );
    }

    Ok(())
}
