use crate::core::normalizer::Normalizer;
use crate::core::walk::FileWalker;
use crate::domain::model::{ConversionRequest, FileReport, OutcomeKind};
use crate::domain::ports::Storage;
use crate::utils::error::{NormalizeError, Result};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    pub reports: Vec<FileReport>,
    pub counts: BTreeMap<OutcomeKind, usize>,
}

impl RunSummary {
    fn record(&mut self, report: FileReport) {
        *self.counts.entry(report.outcome.kind()).or_insert(0) += 1;
        self.reports.push(report);
    }

    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn error_count(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_error()).count()
    }
}

pub struct NormalizeEngine<S: Storage> {
    normalizer: Normalizer<S>,
    request: ConversionRequest,
}

impl<S: Storage> NormalizeEngine<S> {
    pub fn new(storage: S, request: ConversionRequest) -> Self {
        Self {
            normalizer: Normalizer::new(storage),
            request,
        }
    }

    pub fn request(&self) -> &ConversionRequest {
        &self.request
    }

    /// Processes every file reachable from `inputs`, writing one
    /// `<path> - <outcome>` line per file to `out`.
    ///
    /// Per-file failures are reported and never abort the run; only an empty
    /// request, a bad exclude pattern or a broken output stream return `Err`.
    pub fn run<W: Write>(&self, inputs: &[PathBuf], out: &mut W) -> Result<RunSummary> {
        if !self.request.has_target() {
            return Err(NormalizeError::MissingTargetError);
        }

        let walker = FileWalker::new(&self.request)?;
        let files = walker.collect(inputs);
        tracing::info!("🔍 Found {} candidate files", files.len());

        let mut summary = RunSummary::default();
        for path in files {
            let Some(outcome) = self.normalizer.process_file(&path, &self.request) else {
                continue;
            };

            let report = FileReport { path, outcome };
            writeln!(out, "{}", report)?;
            if report.outcome.is_error() {
                tracing::warn!("⚠️ {}", report);
            }
            summary.record(report);
        }
        out.flush()?;

        tracing::info!(
            "✅ Processed {} files: {} converted, {} previewed, {} skipped, {} errors",
            summary.total(),
            summary.count(OutcomeKind::Converted),
            summary.count(OutcomeKind::DryRun),
            summary.count(OutcomeKind::Skipped),
            summary.error_count()
        );

        Ok(summary)
    }
}
