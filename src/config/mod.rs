pub mod cli;
pub mod toml_config;

use crate::domain::model::{ConversionRequest, Encoding, LineEnding};
use crate::utils::error::{NormalizeError, Result};
use crate::utils::validation::{validate_path, validate_paths, validate_pattern, Validate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::TomlConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Everything one run needs, after command line and config file are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub request: ConversionRequest,
    pub paths: Vec<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Validate for RunSettings {
    fn validate(&self) -> Result<()> {
        if !self.request.has_target() {
            return Err(NormalizeError::MissingTargetError);
        }

        if self.request.target_encoding == Some(Encoding::Unknown) {
            return Err(NormalizeError::InvalidConfigValueError {
                field: "encoding".to_string(),
                value: Encoding::Unknown.to_string(),
                reason: "Valid encodings: ASCII, UTF-8, UTF-16".to_string(),
            });
        }

        validate_paths("paths", &self.paths)?;

        for pattern in &self.request.exclude {
            validate_pattern("exclude", pattern)?;
        }

        if let Some(path) = &self.report_path {
            validate_path("report", path)?;
        }

        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "textnorm")]
#[command(about = "Detect and convert text file encodings and line endings")]
pub struct CliConfig {
    /// Files or directories to process
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Walk directories recursively
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Show detection details
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Report what would change without writing anything
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Convert line endings to CRLF (Windows)
    #[arg(short = 'w', long = "crlf", overrides_with_all = ["cr", "lf"])]
    pub crlf: bool,

    /// Convert line endings to CR (classic Mac)
    #[arg(short = 'm', long = "cr", overrides_with_all = ["crlf", "lf"])]
    pub cr: bool,

    /// Convert line endings to LF (Unix)
    #[arg(short = 'u', long = "lf", overrides_with_all = ["crlf", "cr"])]
    pub lf: bool,

    /// Convert to ASCII, transliterating other characters
    #[arg(short = 'a', long = "ascii", overrides_with_all = ["utf8", "utf16"])]
    pub ascii: bool,

    /// Convert to UTF-8
    #[arg(short = '8', long = "utf8", overrides_with_all = ["ascii", "utf16"])]
    pub utf8: bool,

    /// Convert to UTF-16 (with byte-order mark)
    #[arg(short = 's', long = "utf16", overrides_with_all = ["ascii", "utf8"])]
    pub utf16: bool,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip paths matching this regular expression (repeatable)
    #[arg(long, value_name = "REGEX")]
    pub exclude: Vec<String>,

    /// Follow symbolic links while walking directories
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Write a JSON report of all outcomes to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn target_line_ending(&self) -> Option<LineEnding> {
        if self.crlf {
            Some(LineEnding::Crlf)
        } else if self.cr {
            Some(LineEnding::Cr)
        } else if self.lf {
            Some(LineEnding::Lf)
        } else {
            None
        }
    }

    pub fn target_encoding(&self) -> Option<Encoding> {
        if self.ascii {
            Some(Encoding::Ascii)
        } else if self.utf8 {
            Some(Encoding::Utf8)
        } else if self.utf16 {
            Some(Encoding::Utf16)
        } else {
            None
        }
    }

    /// 命令列優先：布林旗標取 OR，目標以命令列為準，排除規則合併
    pub fn resolve(self, file: Option<&TomlConfig>) -> RunSettings {
        let file_config = file.cloned().unwrap_or_default();

        let mut exclude = file_config.exclude().to_vec();
        exclude.extend(self.exclude.iter().cloned());

        let request = ConversionRequest {
            recursive: self.recursive || file_config.recursive(),
            dry_run: self.dry_run || file_config.dry_run(),
            verbose: self.verbose || file_config.verbose(),
            target_encoding: self.target_encoding().or(file_config.encoding()),
            target_line_ending: self.target_line_ending().or(file_config.line_ending()),
            follow_symlinks: self.follow_symlinks || file_config.follow_symlinks(),
            exclude,
        };

        RunSettings {
            request,
            report_path: self
                .report
                .clone()
                .or_else(|| file_config.report_path().map(PathBuf::from)),
            log_format: self
                .log_format
                .or(file_config.log_format())
                .unwrap_or_default(),
            paths: self.paths,
        }
    }
}
