use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    #[serde(rename = "ascii", alias = "ASCII")]
    Ascii,
    #[serde(rename = "utf-8", alias = "UTF-8", alias = "utf8")]
    Utf8,
    #[serde(rename = "utf-16", alias = "UTF-16", alias = "utf16")]
    Utf16,
    #[serde(rename = "unknown")]
    Unknown,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Encoding::Ascii => "ASCII",
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16 => "UTF-16",
            Encoding::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    Crlf,
    Cr,
    Lf,
}

impl LineEnding {
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            LineEnding::Crlf => b"\r\n",
            LineEnding::Cr => b"\r",
            LineEnding::Lf => b"\n",
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineEnding::Crlf => "CRLF",
            LineEnding::Cr => "CR",
            LineEnding::Lf => "LF",
        };
        f.write_str(name)
    }
}

/// 一次執行的不可變設定，沿呼叫鏈以參考傳遞
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionRequest {
    pub recursive: bool,
    pub dry_run: bool,
    pub verbose: bool,
    pub target_encoding: Option<Encoding>,
    pub target_line_ending: Option<LineEnding>,
    pub follow_symlinks: bool,
    pub exclude: Vec<String>,
}

impl ConversionRequest {
    pub fn has_target(&self) -> bool {
        self.target_encoding.is_some() || self.target_line_ending.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Skipped,
    PermissionError,
    CorruptionError,
    UnknownError,
    DryRun {
        encoding: Option<(Encoding, Encoding)>,
        line_ending: Option<(LineEnding, LineEnding)>,
    },
    Converted {
        encoding: Option<Encoding>,
        line_ending: Option<LineEnding>,
    },
}

impl Outcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Skipped => OutcomeKind::Skipped,
            Outcome::PermissionError => OutcomeKind::PermissionError,
            Outcome::CorruptionError => OutcomeKind::CorruptionError,
            Outcome::UnknownError => OutcomeKind::UnknownError,
            Outcome::DryRun { .. } => OutcomeKind::DryRun,
            Outcome::Converted { .. } => OutcomeKind::Converted,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Outcome::PermissionError | Outcome::CorruptionError | Outcome::UnknownError
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Skipped => f.write_str("skipped"),
            Outcome::PermissionError => f.write_str("permissions error"),
            Outcome::CorruptionError => f.write_str("corruption error"),
            Outcome::UnknownError => f.write_str("unknown error"),
            Outcome::DryRun {
                encoding,
                line_ending,
            } => {
                let mut parts = Vec::new();
                if let Some((from, to)) = encoding {
                    parts.push(format!("encoding {} -> {}", from, to));
                }
                if let Some((from, to)) = line_ending {
                    parts.push(format!("line endings {} -> {}", from, to));
                }
                write!(f, "DRY RUN: {}", parts.join("; "))
            }
            Outcome::Converted {
                encoding,
                line_ending,
            } => {
                let mut parts = Vec::new();
                if let Some(to) = encoding {
                    parts.push(format!("converted encoding to {}", to));
                }
                if let Some(to) = line_ending {
                    parts.push(format!("converted line ending to {}", to));
                }
                f.write_str(&parts.join("; "))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Skipped,
    PermissionError,
    CorruptionError,
    UnknownError,
    DryRun,
    Converted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: Outcome,
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.path.display(), self.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_messages() {
        assert_eq!(Outcome::Skipped.to_string(), "skipped");
        assert_eq!(Outcome::PermissionError.to_string(), "permissions error");
        assert_eq!(Outcome::CorruptionError.to_string(), "corruption error");
        assert_eq!(Outcome::UnknownError.to_string(), "unknown error");

        let preview = Outcome::DryRun {
            encoding: Some((Encoding::Ascii, Encoding::Utf16)),
            line_ending: Some((LineEnding::Crlf, LineEnding::Lf)),
        };
        assert_eq!(
            preview.to_string(),
            "DRY RUN: encoding ASCII -> UTF-16; line endings CRLF -> LF"
        );

        let line_only = Outcome::DryRun {
            encoding: None,
            line_ending: Some((LineEnding::Lf, LineEnding::Cr)),
        };
        assert_eq!(line_only.to_string(), "DRY RUN: line endings LF -> CR");

        let converted = Outcome::Converted {
            encoding: Some(Encoding::Utf8),
            line_ending: Some(LineEnding::Crlf),
        };
        assert_eq!(
            converted.to_string(),
            "converted encoding to UTF-8; converted line ending to CRLF"
        );
    }

    #[test]
    fn test_file_report_line() {
        let report = FileReport {
            path: PathBuf::from("docs/readme.txt"),
            outcome: Outcome::Converted {
                encoding: None,
                line_ending: Some(LineEnding::Lf),
            },
        };
        assert_eq!(
            report.to_string(),
            "docs/readme.txt - converted line ending to LF"
        );
    }

    #[test]
    fn test_request_has_target() {
        let mut request = ConversionRequest::default();
        assert!(!request.has_target());
        request.target_encoding = Some(Encoding::Ascii);
        assert!(request.has_target());
    }
}
