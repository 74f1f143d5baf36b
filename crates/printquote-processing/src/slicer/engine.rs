//! Slicing engine discovery: an explicit override, else one default path per OS family.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::SlicingError;

/// OS family used to pick the engine's default install location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Platform this binary was compiled for. Anything that is not Windows or macOS is
    /// treated as Linux, the production target.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    pub fn default_engine_path(self) -> &'static str {
        match self {
            Platform::Windows => r"C:\Program Files\Prusa3D\PrusaSlicer\prusa-slicer-console.exe",
            Platform::MacOs => "/Applications/PrusaSlicer.app/Contents/MacOS/PrusaSlicer",
            Platform::Linux => "/usr/bin/prusa-slicer",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::MacOs => "macOS",
            Platform::Linux => "Linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolves which engine executable to run. No PATH search is performed.
#[derive(Debug, Clone)]
pub struct EngineResolver {
    platform: Platform,
    default_path: PathBuf,
    override_path: Option<PathBuf>,
}

impl EngineResolver {
    pub fn new(platform: Platform, override_path: Option<PathBuf>) -> Self {
        Self::with_default_path(platform, platform.default_engine_path(), override_path)
    }

    /// Resolver with a custom default location, e.g. a path known not to exist.
    pub fn with_default_path(
        platform: Platform,
        default_path: impl Into<PathBuf>,
        override_path: Option<PathBuf>,
    ) -> Self {
        Self {
            platform,
            default_path: default_path.into(),
            override_path,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn default_path(&self) -> &Path {
        &self.default_path
    }

    pub fn resolve(&self) -> PathBuf {
        self.override_path
            .clone()
            .unwrap_or_else(|| self.default_path.clone())
    }

    pub fn not_found(&self, resolved: &Path) -> SlicingError {
        SlicingError::EngineNotFound {
            resolved: resolved.to_path_buf(),
            default_path: self.default_path.clone(),
            platform: self.platform,
        }
    }
}
