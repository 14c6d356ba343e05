use crate::core::convert::{self, TranscodeError};
use crate::core::detect::{self, Detection};
use crate::domain::model::{ConversionRequest, Encoding, Outcome};
use crate::domain::ports::Storage;
use crate::utils::error::{ErrorCategory, NormalizeError, Result};
use std::path::Path;

pub struct Normalizer<S: Storage> {
    storage: S,
}

impl<S: Storage> Normalizer<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Classifies, inspects and (unless dry-running) rewrites one file.
    ///
    /// Returns `None` when `path` is not an existing regular file. Every other
    /// path yields exactly one outcome; failures never leave the file partly
    /// written because the replace is the last step.
    pub fn process_file(&self, path: &Path, request: &ConversionRequest) -> Option<Outcome> {
        if !self.storage.is_regular_file(path) {
            tracing::debug!("Ignoring {}: not a regular file", path.display());
            return None;
        }

        let outcome = match self.try_process(path, request) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!("{} failed ({:?}): {}", path.display(), e.category(), e);
                outcome_for_error(&e)
            }
        };
        Some(outcome)
    }

    fn try_process(&self, path: &Path, request: &ConversionRequest) -> Result<Outcome> {
        let bytes = self.storage.read_file(path)?;

        if detect::is_binary(&bytes) {
            tracing::debug!("{}: binary content", path.display());
            return Ok(Outcome::Skipped);
        }

        self.storage.check_access(path)?;

        let detection = detect::inspect(&bytes);
        tracing::debug!(
            "{}: encoding {}, line endings {} (crlf={}, cr={}, lf={})",
            path.display(),
            detection.encoding,
            detection.line_ending,
            detection.counts.crlf,
            detection.counts.cr,
            detection.counts.lf
        );

        if request.dry_run {
            return Ok(Outcome::DryRun {
                encoding: request
                    .target_encoding
                    .map(|target| (detection.encoding, target)),
                line_ending: request
                    .target_line_ending
                    .map(|target| (detection.line_ending, target)),
            });
        }

        let working_copy = transform(path, &bytes, &detection, request)?;
        self.storage.replace_file(path, &working_copy)?;

        Ok(Outcome::Converted {
            encoding: request.target_encoding,
            line_ending: request.target_line_ending,
        })
    }
}

fn outcome_for_error(error: &NormalizeError) -> Outcome {
    match error.category() {
        ErrorCategory::Permission => Outcome::PermissionError,
        ErrorCategory::Conversion => Outcome::CorruptionError,
        ErrorCategory::Configuration | ErrorCategory::Unknown => Outcome::UnknownError,
    }
}

/// 在私有副本上完成所有轉換；原始位元組不會被修改
fn transform(
    path: &Path,
    bytes: &[u8],
    detection: &Detection,
    request: &ConversionRequest,
) -> Result<Vec<u8>> {
    let conversion_error = |e: TranscodeError| NormalizeError::ConversionError {
        path: path.to_path_buf(),
        from: detection.encoding.to_string(),
        message: e.to_string(),
    };

    // UTF-16 的換行必須在解碼後處理，其他編碼直接改位元組
    let needs_decoding =
        request.target_encoding.is_some() || detection.encoding == Encoding::Utf16;

    if !needs_decoding {
        return Ok(match request.target_line_ending {
            Some(target) => convert::convert_line_endings(bytes, target),
            None => bytes.to_vec(),
        });
    }

    let decoded = convert::decode(bytes, detection.encoding).map_err(conversion_error)?;
    let text = match request.target_line_ending {
        Some(target) => convert::convert_line_endings_text(&decoded.text, target),
        None => decoded.text,
    };
    let target_encoding = request.target_encoding.unwrap_or(detection.encoding);

    convert::encode(
        &text,
        target_encoding,
        decoded.byte_order.unwrap_or_default(),
    )
    .map_err(conversion_error)
}
