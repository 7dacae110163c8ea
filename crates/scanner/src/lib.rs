//! Compliance Batch Scanner
//!
//! Runs fraud detection over a batch of inspections matched to their
//! centers and emits at most one notification per inspection and violation
//! type, however often the same data is scanned.

mod cancel;
mod config;
mod index;
mod scanner;

pub use cancel::CancellationFlag;
pub use self::config::{CenterMatching, ScanConfig};
pub use index::CenterIndex;
pub use scanner::{BatchScanner, ScanReport};

use thiserror::Error;

/// Scanner error types
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Scan worker failed: {0}")]
    Worker(String),
}
