use crate::config::LogFormat;
use crate::domain::model::{Encoding, LineEnding};
use crate::utils::error::{NormalizeError, Result};
use crate::utils::validation::{validate_path, validate_pattern, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub defaults: Option<DefaultsConfig>,
    pub traversal: Option<TraversalConfig>,
    pub report: Option<ReportConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    pub recursive: Option<bool>,
    pub dry_run: Option<bool>,
    pub verbose: Option<bool>,
    pub line_ending: Option<LineEnding>,
    pub encoding: Option<Encoding>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraversalConfig {
    pub exclude: Option<Vec<String>>,
    pub follow_symlinks: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    pub format: Option<LogFormat>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(NormalizeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let config: Self =
            toml::from_str(&processed_content).map_err(|e| NormalizeError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 替換環境變數 (例如 ${HOME})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| NormalizeError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn recursive(&self) -> bool {
        self.defaults.as_ref().and_then(|d| d.recursive).unwrap_or(false)
    }

    pub fn dry_run(&self) -> bool {
        self.defaults.as_ref().and_then(|d| d.dry_run).unwrap_or(false)
    }

    pub fn verbose(&self) -> bool {
        self.defaults.as_ref().and_then(|d| d.verbose).unwrap_or(false)
    }

    pub fn line_ending(&self) -> Option<LineEnding> {
        self.defaults.as_ref().and_then(|d| d.line_ending)
    }

    pub fn encoding(&self) -> Option<Encoding> {
        self.defaults.as_ref().and_then(|d| d.encoding)
    }

    pub fn exclude(&self) -> &[String] {
        self.traversal
            .as_ref()
            .and_then(|t| t.exclude.as_deref())
            .unwrap_or(&[])
    }

    pub fn follow_symlinks(&self) -> bool {
        self.traversal
            .as_ref()
            .and_then(|t| t.follow_symlinks)
            .unwrap_or(false)
    }

    pub fn report_path(&self) -> Option<&Path> {
        self.report.as_ref().and_then(|r| r.path.as_deref())
    }

    pub fn log_format(&self) -> Option<LogFormat> {
        self.logging.as_ref().and_then(|l| l.format)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if self.encoding() == Some(Encoding::Unknown) {
            return Err(NormalizeError::InvalidConfigValueError {
                field: "defaults.encoding".to_string(),
                value: "unknown".to_string(),
                reason: "Valid encodings: ascii, utf-8, utf-16".to_string(),
            });
        }

        for pattern in self.exclude() {
            validate_pattern("traversal.exclude", pattern)?;
        }

        if let Some(path) = self.report_path() {
            validate_path("report.path", path)?;
        }

        Ok(())
    }
}
