//! Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Main error type
#[derive(Debug, Clone, Error)]
pub enum PcmHeaderError {
    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Malformed PCM: {message}")]
    MalformedPcm { message: String },

    #[error("Sample {index} out of int16 range: {value}")]
    SampleOutOfRange { index: usize, value: i64 },

    #[error("Invalid identifier: {name}")]
    Identifier { name: String },

    #[error("Duplicate output {}: already written by {}", output.display(), previous.display())]
    DuplicateOutput { output: PathBuf, previous: PathBuf },

    #[error("Audio error: {message}")]
    Audio { message: String },

    #[error("Config error: {message}")]
    Config { message: String },

    #[error("Processing error: {message}")]
    Processing { message: String },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<PcmHeaderError>,
    },
}

impl PcmHeaderError {
    pub fn decode<S: Into<String>>(msg: S) -> Self { Self::Decode { message: msg.into() } }
    pub fn malformed<S: Into<String>>(msg: S) -> Self { Self::MalformedPcm { message: msg.into() } }
    pub fn identifier<S: Into<String>>(name: S) -> Self { Self::Identifier { name: name.into() } }
    pub fn audio<S: Into<String>>(msg: S) -> Self { Self::Audio { message: msg.into() } }
    pub fn config<S: Into<String>>(msg: S) -> Self { Self::Config { message: msg.into() } }
    pub fn processing<S: Into<String>>(msg: S) -> Self { Self::Processing { message: msg.into() } }
    pub fn io<S: Into<String>>(msg: S) -> Self { Self::Io { message: msg.into() } }

    /// Attach the input file that was being converted.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            already @ Self::File { .. } => already,
            other => Self::File { path: path.into(), source: Box::new(other) },
        }
    }

    /// The innermost error, skipping file context.
    pub fn root(&self) -> &PcmHeaderError {
        match self {
            Self::File { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, PcmHeaderError>;

impl From<std::io::Error> for PcmHeaderError {
    fn from(err: std::io::Error) -> Self { Self::io(err.to_string()) }
}

impl From<hound::Error> for PcmHeaderError {
    fn from(err: hound::Error) -> Self { Self::audio(format!("WAV: {}", err)) }
}

impl From<time::error::Format> for PcmHeaderError {
    fn from(err: time::error::Format) -> Self { Self::io(format!("timestamp: {}", err)) }
}
