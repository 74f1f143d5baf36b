//! Configuration module
//!
//! This module provides configuration structures for the quote service: HTTP server
//! settings, slicing engine discovery, scratch/upload directories and the caller-side
//! pricing fallback policy.

use std::env;
use std::path::PathBuf;

// Common constants
const SERVER_PORT: u16 = 4000;
const SLICER_TIMEOUT_SECS: u64 = 60;
const MAX_MESH_SIZE_MB: usize = 100;
const MAX_CONCURRENT_SLICES: usize = 2;
const SCRATCH_RETENTION_HOURS: u64 = 24;
const DEFAULT_PROFILE_PATH: &str = "config/prusa-slicer.ini";

/// Environment variable holding the slicing engine override.
pub const SLICER_PATH_ENV: &str = "PRUSA_SLICER_PATH";

/// Base server configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
}

/// Quote service configuration
#[derive(Clone, Debug)]
pub struct QuoteServiceConfig {
    pub base: BaseConfig,
    // Slicing engine
    pub slicer_path_override: Option<String>,
    pub slicer_profile_path: PathBuf,
    pub slicer_timeout_secs: u64,
    pub max_concurrent_slices: usize,
    // Filesystem
    pub scratch_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub retain_intermediate_output: bool,
    /// Hours a retained G-code file is kept before the cleanup service removes it. 0 = disabled.
    pub scratch_retention_hours: u64,
    // Upload validation
    pub max_mesh_size_bytes: usize,
    pub mesh_allowed_extensions: Vec<String>,
    // Duration extraction
    pub gcode_max_bytes: Option<u64>,
    /// Hours to price when the slicer output carries no recognizable duration.
    /// None rejects the request instead.
    pub fallback_print_hours: Option<f64>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<QuoteServiceConfig>);

impl Config {
    fn as_quote(&self) -> &QuoteServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.as_quote().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = QuoteServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_quote().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_quote().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_quote().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_quote().base.environment
    }

    pub fn slicer_path_override(&self) -> Option<&str> {
        self.as_quote().slicer_path_override.as_deref()
    }

    pub fn slicer_profile_path(&self) -> &PathBuf {
        &self.as_quote().slicer_profile_path
    }

    pub fn slicer_timeout_secs(&self) -> u64 {
        self.as_quote().slicer_timeout_secs
    }

    pub fn max_concurrent_slices(&self) -> usize {
        self.as_quote().max_concurrent_slices
    }

    pub fn scratch_dir(&self) -> &PathBuf {
        &self.as_quote().scratch_dir
    }

    pub fn upload_dir(&self) -> &PathBuf {
        &self.as_quote().upload_dir
    }

    pub fn retain_intermediate_output(&self) -> bool {
        self.as_quote().retain_intermediate_output
    }

    pub fn scratch_retention_hours(&self) -> u64 {
        self.as_quote().scratch_retention_hours
    }

    pub fn max_mesh_size_bytes(&self) -> usize {
        self.as_quote().max_mesh_size_bytes
    }

    pub fn mesh_allowed_extensions(&self) -> &[String] {
        &self.as_quote().mesh_allowed_extensions
    }

    pub fn gcode_max_bytes(&self) -> Option<u64> {
        self.as_quote().gcode_max_bytes
    }

    pub fn fallback_print_hours(&self) -> Option<f64> {
        self.as_quote().fallback_print_hours
    }
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    value
        .map(|v| v.trim().to_lowercase())
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl QuoteServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production_env(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let base = BaseConfig {
            server_port: lookup("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
        };

        let temp_root = env::temp_dir().join("printquote");

        let max_mesh_size_mb = lookup("MAX_MESH_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_MESH_SIZE_MB);
        let max_mesh_size_bytes = max_mesh_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_MESH_SIZE_MB is too large"))?;

        let fallback_print_hours = match lookup("FALLBACK_PRINT_HOURS").filter(|s| !s.is_empty())
        {
            Some(raw) => Some(raw.trim().parse::<f64>().map_err(|_| {
                anyhow::anyhow!("FALLBACK_PRINT_HOURS must be a number of hours")
            })?),
            None => None,
        };

        let config = QuoteServiceConfig {
            base,
            slicer_path_override: lookup(SLICER_PATH_ENV).filter(|s| !s.trim().is_empty()),
            slicer_profile_path: lookup("SLICER_PROFILE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROFILE_PATH)),
            slicer_timeout_secs: lookup("SLICER_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(SLICER_TIMEOUT_SECS),
            max_concurrent_slices: lookup("MAX_CONCURRENT_SLICES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONCURRENT_SLICES),
            scratch_dir: lookup("SLICER_SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| temp_root.join("gcode")),
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| temp_root.join("uploads")),
            retain_intermediate_output: parse_bool(lookup("RETAIN_INTERMEDIATE_OUTPUT"), true),
            scratch_retention_hours: lookup("SCRATCH_RETENTION_HOURS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(SCRATCH_RETENTION_HOURS),
            max_mesh_size_bytes,
            mesh_allowed_extensions: parse_list(
                &lookup("MESH_ALLOWED_EXTENSIONS").unwrap_or_else(|| "stl,obj,3mf".to_string()),
            ),
            gcode_max_bytes: lookup("GCODE_MAX_BYTES").and_then(|s| s.parse().ok()),
            fallback_print_hours,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.slicer_timeout_secs == 0 {
            return Err(anyhow::anyhow!("SLICER_TIMEOUT_SECS must be greater than 0"));
        }

        if self.max_concurrent_slices == 0 {
            return Err(anyhow::anyhow!(
                "MAX_CONCURRENT_SLICES must be greater than 0"
            ));
        }

        if self.mesh_allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "MESH_ALLOWED_EXTENSIONS must list at least one extension"
            ));
        }

        if let Some(hours) = self.fallback_print_hours {
            if !hours.is_finite() || hours < 0.0 {
                return Err(anyhow::anyhow!(
                    "FALLBACK_PRINT_HOURS must be a non-negative number"
                ));
            }
        }

        Ok(())
    }
}
