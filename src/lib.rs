//! pcmheader - Audio samples to firmware C headers
//!
//! Decodes each audio file to mono s16le PCM, peak-normalizes it onto the
//! full int16 range and emits a C header with the samples as a static array.

pub mod audio;
pub mod config;
pub mod decoder;
pub mod error;
pub mod header;
pub mod processing;

pub use config::{Config, Args};
pub use decoder::{Decoder, DecoderKind};
pub use error::{PcmHeaderError, Result};
pub use processing::{SampleConverter, BatchSummary, FileReport, FailurePolicy};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

pub fn init_logging(verbose: bool) {
    let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()
        .ok();
}

pub fn get_library_info() -> LibraryInfo {
    LibraryInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl std::fmt::Display for LibraryInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{} - {}", self.name, self.version, self.description)
    }
}
