pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, LogFormat, RunSettings};

pub use crate::core::{
    engine::{NormalizeEngine, RunSummary},
    normalizer::Normalizer,
};
pub use domain::model::{ConversionRequest, Encoding, FileReport, LineEnding, Outcome, OutcomeKind};
pub use utils::error::{NormalizeError, Result};
