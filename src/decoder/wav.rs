//! Native WAV decoder

use std::path::Path;
use log::debug;
use crate::audio::{AudioConverter, WavAudio};
use crate::decoder::Decoder;
use crate::error::{PcmHeaderError, Result};

#[derive(Debug, Clone)]
pub struct WavDecoder {
    sample_rate: u32,
}

impl WavDecoder {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }
}

impl Decoder for WavDecoder {
    fn decode(&self, input: &Path) -> Result<Vec<u8>> {
        let audio = WavAudio::from_file(input)
            .map_err(|e| PcmHeaderError::decode(e.to_string()))?;

        debug!("{}: {:.2}s, {}Hz, {}ch, {}",
               input.display(), audio.duration(), audio.sample_rate(), audio.channels(),
               audio.header.format.name());

        let mono = AudioConverter::to_mono_at(&audio, self.sample_rate)?;
        Ok(mono.to_pcm_s16le())
    }
}
