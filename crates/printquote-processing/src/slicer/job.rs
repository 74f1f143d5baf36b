use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

/// Preset used when no profile file is available.
pub const FALLBACK_QUALITY_PRESET: &str = "0.20mm QUALITY";
pub const FALLBACK_FILL_DENSITY: &str = "100%";

/// One slicing invocation. Lives only for the duration of the call; its G-code
/// output stays on disk afterwards.
#[derive(Debug, Clone)]
pub struct SliceJob {
    pub input_path: PathBuf,
    pub engine_path: PathBuf,
    pub output_path: PathBuf,
    pub profile_path: Option<PathBuf>,
    pub timeout: Duration,
}

impl SliceJob {
    /// Engine command-line arguments, input file last.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["--export-gcode".into()];

        match &self.profile_path {
            Some(profile) => {
                args.push("--load".into());
                args.push(profile.into());
            }
            None => {
                args.extend(
                    [
                        "--print-profile",
                        FALLBACK_QUALITY_PRESET,
                        "--fill-density",
                        FALLBACK_FILL_DENSITY,
                    ]
                    .map(OsString::from),
                );
            }
        }

        args.push("--output".into());
        args.push(self.output_path.clone().into());
        args.push(self.input_path.clone().into());
        args
    }
}
