//! Estimated print time recovery from slicer-annotated G-code.
//!
//! Slicers leave the estimate in a comment, each vendor (and engine version) with its own
//! spelling. The recognized spellings are tried in a fixed priority order and the first one
//! found anywhere in the file wins. Only the raw-seconds form (`; TIME:<n>`) is rewritten
//! into the canonical `"{h}h {m}m {s}s"` rendering; every other form is returned as written.

use printquote_core::PrintDuration;
use regex::Regex;
use std::fmt;
use std::path::Path;

use crate::error::SlicingError;

/// Recognized annotation spellings, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternFamily {
    /// `estimated printing time (normal mode)=<value>`
    NormalModeCompact,
    /// `estimated printing time (silent mode)=<value>`
    SilentModeCompact,
    /// `; estimated printing time (normal mode) = <value>`
    NormalModeComment,
    /// `; estimated total print time: <value>`
    EstimatedTotalPrintTime,
    /// `; TIME:<integer-seconds>`
    RawSeconds,
    /// `; Print time: <value>`
    PrintTime,
    /// `; Estimated print time: <value>`
    EstimatedPrintTime,
    /// `; total print time: <value>`
    TotalPrintTime,
    /// `; printing time: <value>`
    PrintingTime,
    /// `; est. printing time: <value>`
    EstPrintingTime,
}

impl PatternFamily {
    pub const ALL: [PatternFamily; 10] = [
        PatternFamily::NormalModeCompact,
        PatternFamily::SilentModeCompact,
        PatternFamily::NormalModeComment,
        PatternFamily::EstimatedTotalPrintTime,
        PatternFamily::RawSeconds,
        PatternFamily::PrintTime,
        PatternFamily::EstimatedPrintTime,
        PatternFamily::TotalPrintTime,
        PatternFamily::PrintingTime,
        PatternFamily::EstPrintingTime,
    ];

    /// Case-insensitive regex with the value in capture group 1.
    fn pattern(self) -> &'static str {
        match self {
            PatternFamily::NormalModeCompact => {
                r"(?i)estimated printing time \(normal mode\)=[ \t]*(\S[^\r\n]*)"
            }
            PatternFamily::SilentModeCompact => {
                r"(?i)estimated printing time \(silent mode\)=[ \t]*(\S[^\r\n]*)"
            }
            PatternFamily::NormalModeComment => {
                r"(?i);[ \t]*estimated printing time \(normal mode\)[ \t]*=[ \t]*(\S[^\r\n]*)"
            }
            PatternFamily::EstimatedTotalPrintTime => {
                r"(?i);[ \t]*estimated total print time:[ \t]*(\S[^\r\n]*)"
            }
            PatternFamily::RawSeconds => r"(?i);[ \t]*TIME:[ \t]*(\d+)",
            PatternFamily::PrintTime => r"(?i);[ \t]*print time:[ \t]*(\S[^\r\n]*)",
            PatternFamily::EstimatedPrintTime => {
                r"(?i);[ \t]*estimated print time:[ \t]*(\S[^\r\n]*)"
            }
            PatternFamily::TotalPrintTime => r"(?i);[ \t]*total print time:[ \t]*(\S[^\r\n]*)",
            PatternFamily::PrintingTime => r"(?i);[ \t]*printing time:[ \t]*(\S[^\r\n]*)",
            PatternFamily::EstPrintingTime => {
                r"(?i);[ \t]*est\. printing time:[ \t]*(\S[^\r\n]*)"
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PatternFamily::NormalModeCompact => "normal_mode_compact",
            PatternFamily::SilentModeCompact => "silent_mode_compact",
            PatternFamily::NormalModeComment => "normal_mode_comment",
            PatternFamily::EstimatedTotalPrintTime => "estimated_total_print_time",
            PatternFamily::RawSeconds => "raw_seconds",
            PatternFamily::PrintTime => "print_time",
            PatternFamily::EstimatedPrintTime => "estimated_print_time",
            PatternFamily::TotalPrintTime => "total_print_time",
            PatternFamily::PrintingTime => "printing_time",
            PatternFamily::EstPrintingTime => "est_printing_time",
        }
    }
}

impl fmt::Display for PatternFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The winning annotation and its (possibly normalized) duration text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationMatch {
    pub family: PatternFamily,
    pub text: String,
}

/// Ordered pattern table, compiled once and shared by reference.
#[derive(Debug, Clone)]
pub struct DurationExtractor {
    patterns: Vec<(PatternFamily, Regex)>,
    max_bytes: Option<u64>,
}

impl DurationExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        let patterns = PatternFamily::ALL
            .iter()
            .map(|family| Regex::new(family.pattern()).map(|re| (*family, re)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns,
            max_bytes: None,
        })
    }

    /// Refuse to read G-code files larger than `max_bytes`.
    pub fn with_max_bytes(mut self, max_bytes: Option<u64>) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Scan `content` for the highest-priority annotation.
    ///
    /// `None` means no recognized annotation was found, which is a normal outcome.
    pub fn extract_from_str(&self, content: &str) -> Option<DurationMatch> {
        for (family, regex) in &self.patterns {
            let Some(value) = regex
                .captures(content)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim())
            else {
                continue;
            };

            if *family == PatternFamily::RawSeconds {
                match value.parse::<u64>() {
                    Ok(total) => {
                        return Some(DurationMatch {
                            family: *family,
                            text: PrintDuration::from_total_seconds(total).to_string(),
                        });
                    }
                    Err(e) => {
                        tracing::warn!(
                            value = %value,
                            error = %e,
                            "Ignoring unparseable raw-seconds annotation"
                        );
                        continue;
                    }
                }
            }

            return Some(DurationMatch {
                family: *family,
                text: value.to_string(),
            });
        }

        None
    }

    /// Read a G-code file and scan it. Invalid UTF-8 is replaced, not rejected.
    #[tracing::instrument(skip(self), fields(gcode.bytes = tracing::field::Empty))]
    pub async fn extract_from_path(
        &self,
        path: &Path,
    ) -> Result<Option<DurationMatch>, SlicingError> {
        let read_failed = |source: std::io::Error| SlicingError::GcodeReadFailed {
            path: path.to_path_buf(),
            source,
        };

        if let Some(max_bytes) = self.max_bytes {
            let len = tokio::fs::metadata(path).await.map_err(read_failed)?.len();
            if len > max_bytes {
                return Err(read_failed(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("G-code is {} bytes, limit is {}", len, max_bytes),
                )));
            }
        }

        let bytes = tokio::fs::read(path).await.map_err(read_failed)?;
        tracing::Span::current().record("gcode.bytes", bytes.len() as u64);

        let content = String::from_utf8_lossy(&bytes);
        let found = self.extract_from_str(&content);

        match &found {
            Some(m) => tracing::debug!(family = %m.family, duration = %m.text, "Print duration found"),
            None => tracing::warn!(
                path = %path.display(),
                "No recognized print duration annotation in G-code"
            ),
        }

        Ok(found)
    }
}
