//! Decoder backends
//!
//! A [`Decoder`] turns an input audio file into raw mono s16le PCM at the
//! configured sample rate. The converter only ever sees the bytes.

pub mod ffmpeg;
pub mod wav;

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::config::Config;
use crate::error::Result;

pub use ffmpeg::FfmpegDecoder;
pub use wav::WavDecoder;

pub trait Decoder {
    fn decode(&self, input: &Path) -> Result<Vec<u8>>;
}

impl<F> Decoder for F
where
    F: Fn(&Path) -> Result<Vec<u8>>,
{
    fn decode(&self, input: &Path) -> Result<Vec<u8>> {
        self(input)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DecoderKind {
    /// External ffmpeg process, any input format it understands.
    Ffmpeg,
    /// Built-in WAV reader, no external tools.
    Wav,
}

/// Build the decoder selected in `config`. Scratch files go to the output directory.
pub fn build_decoder(config: &Config) -> Box<dyn Decoder> {
    match config.decoder.kind {
        DecoderKind::Ffmpeg => Box::new(FfmpegDecoder::new(
            config.decoder.ffmpeg_path.clone(),
            config.output_dir.clone(),
            config.decoder.sample_rate,
            config.decoder.channels,
        )),
        DecoderKind::Wav => Box::new(WavDecoder::new(config.decoder.sample_rate)),
    }
}
