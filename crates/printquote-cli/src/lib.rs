use printquote_processing::{DurationExtractor, QuoteCalculator};
use serde::Serialize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Load `.env` (from the working directory, or `env_file` when given) and build the
/// log filter from `RUST_LOG`, defaulting to `warn`.
pub fn load_environment(env_file: Option<&Path>) -> EnvFilter {
    let _ = match env_file {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Initialize tracing for the CLI. Logs go to stderr so stdout stays valid JSON.
pub fn init_tracing(filter: EnvFilter) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Output of `printquote duration`.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DurationReport {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_hours: Option<String>,
}

pub async fn duration_report(
    extractor: &DurationExtractor,
    calculator: &QuoteCalculator,
    gcode: &Path,
) -> anyhow::Result<DurationReport> {
    let report = match extractor.extract_from_path(gcode).await? {
        Some(found) => DurationReport {
            found: true,
            pattern: Some(found.family.to_string()),
            print_hours: Some(format!("{:.2}", calculator.duration_hours(&found.text))),
            print_time: Some(found.text),
        },
        None => DurationReport {
            found: false,
            pattern: None,
            print_time: None,
            print_hours: None,
        },
    };
    Ok(report)
}
