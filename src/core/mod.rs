pub mod convert;
pub mod detect;
pub mod engine;
pub mod normalizer;
pub mod walk;

pub use crate::domain::model::{ConversionRequest, Encoding, LineEnding, Outcome};
pub use crate::domain::ports::Storage;
pub use crate::utils::error::Result;
