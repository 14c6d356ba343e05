use crate::core::engine::RunSummary;
use crate::domain::model::{ConversionRequest, Encoding, LineEnding, OutcomeKind};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub path: String,
    pub outcome: OutcomeKind,
    pub message: String,
}

/// 執行結果的 JSON 報告
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub dry_run: bool,
    pub target_encoding: Option<Encoding>,
    pub target_line_ending: Option<LineEnding>,
    pub files: Vec<ReportEntry>,
    pub counts: BTreeMap<OutcomeKind, usize>,
}

impl RunReport {
    pub fn new(request: &ConversionRequest, summary: &RunSummary) -> Self {
        let files = summary
            .reports
            .iter()
            .map(|report| ReportEntry {
                path: report.path.to_string_lossy().into_owned(),
                outcome: report.outcome.kind(),
                message: report.outcome.to_string(),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            dry_run: request.dry_run,
            target_encoding: request.target_encoding,
            target_line_ending: request.target_line_ending,
            files,
            counts: summary.counts.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
