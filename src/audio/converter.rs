//! Audio Format Converter - mono down-mix and linear resampling

use ndarray::{Array1, ArrayView1};
use crate::audio::{AudioFormat, WavAudio};
use crate::error::{PcmHeaderError, Result};

pub struct AudioConverter;

impl AudioConverter {
    /// Down-mix to mono and resample to `target_sample_rate`.
    pub fn to_mono_at(audio: &WavAudio, target_sample_rate: u32) -> Result<WavAudio> {
        let mono = WavAudio::new_mono(audio.sample_rate(), audio.data().to_mono(), AudioFormat::Float32);
        Self::convert_sample_rate(&mono, target_sample_rate)
    }

    /// Convert sample rate of mono audio using linear interpolation
    pub fn convert_sample_rate(audio: &WavAudio, target_sample_rate: u32) -> Result<WavAudio> {
        if target_sample_rate == 0 {
            return Err(PcmHeaderError::audio("Target sample rate cannot be 0"));
        }
        if audio.sample_rate() == target_sample_rate {
            return Ok(audio.clone());
        }

        let data = audio.data().to_mono();
        let ratio = target_sample_rate as f64 / audio.sample_rate() as f64;
        let new_length = (data.len() as f64 * ratio) as usize;
        let resampled = Self::resample_mono(data.view(), new_length, ratio)?;

        Ok(WavAudio::new_mono(target_sample_rate, resampled, audio.header.format))
    }

    fn resample_mono(data: ArrayView1<f32>, new_length: usize, ratio: f64) -> Result<Array1<f32>> {
        if data.is_empty() {
            return Err(PcmHeaderError::audio("Input data is empty"));
        }

        let old_length = data.len();
        let mut new_data = Array1::zeros(new_length);

        for i in 0..new_length {
            let old_pos = i as f64 / ratio;
            let old_index = old_pos.floor() as usize;
            let fraction = old_pos - old_index as f64;

            new_data[i] = if old_index >= old_length - 1 {
                data[old_length - 1]
            } else {
                data[old_index] + (data[old_index + 1] - data[old_index]) * fraction as f32
            };
        }

        Ok(new_data)
    }
}
