//! WAV audio file processing

use std::path::Path;
use std::fs::File;
use hound::{WavReader, SampleFormat};
use ndarray::{Array1, Array2, Axis};
use crate::error::{PcmHeaderError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Int(u16),
    Float32,
}

impl AudioFormat {
    pub fn name(&self) -> String {
        match self {
            AudioFormat::Int(bits) => format!("int{}", bits),
            AudioFormat::Float32 => "float32".to_string(),
        }
    }

    fn from_spec(spec: &hound::WavSpec) -> Result<Self> {
        match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Int, bits @ (8 | 16 | 24 | 32)) => Ok(AudioFormat::Int(bits)),
            (SampleFormat::Float, 32) => Ok(AudioFormat::Float32),
            (format, bits) => Err(PcmHeaderError::audio(
                format!("Unsupported sample format: {:?} {}-bit", format, bits)
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AudioHeader {
    pub sample_rate: u32,
    pub channels: u16,
    pub format: AudioFormat,
    pub total_frames: u32,
    pub duration: f64,
}

impl AudioHeader {
    pub fn new(sample_rate: u32, channels: u16, format: AudioFormat, total_frames: u32) -> Self {
        let duration = if sample_rate > 0 { total_frames as f64 / sample_rate as f64 } else { 0.0 };

        Self {
            sample_rate,
            channels,
            format,
            total_frames,
            duration,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(PcmHeaderError::audio("Sample rate cannot be 0"));
        }

        if self.channels == 0 {
            return Err(PcmHeaderError::audio("Channel count cannot be 0"));
        }

        if self.total_frames == 0 {
            return Err(PcmHeaderError::audio("Audio contains no frames"));
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct WavAudio {
    pub header: AudioHeader,
    pub data: AudioData,
}

#[derive(Debug, Clone)]
pub enum AudioData {
    Mono(Array1<f32>),
    /// Frames by channels.
    Multi(Array2<f32>),
}

impl AudioData {
    pub fn len(&self) -> usize {
        match self {
            AudioData::Mono(data) => data.len(),
            AudioData::Multi(data) => data.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channels(&self) -> u16 {
        match self {
            AudioData::Mono(_) => 1,
            AudioData::Multi(data) => data.ncols() as u16,
        }
    }

    /// Down-mix by averaging channels.
    pub fn to_mono(&self) -> Array1<f32> {
        match self {
            AudioData::Mono(data) => data.clone(),
            AudioData::Multi(data) => data
                .mean_axis(Axis(1))
                .unwrap_or_else(|| Array1::zeros(data.nrows())),
        }
    }
}

impl WavAudio {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path)
            .map_err(|e| PcmHeaderError::audio(format!("Cannot open audio file {}: {}", path.display(), e)))?;

        let mut reader = WavReader::new(std::io::BufReader::new(file))
            .map_err(|e| PcmHeaderError::audio(format!("Cannot create WAV reader: {}", e)))?;

        let spec = reader.spec();
        let format = AudioFormat::from_spec(&spec)?;

        let samples: Vec<f32> = match format {
            AudioFormat::Int(bits) => {
                let scale = (1i64 << (bits - 1)) as f32;
                reader.samples::<i32>()
                    .map(|sample| sample.map(|s| s as f32 / scale))
                    .collect::<std::result::Result<Vec<f32>, hound::Error>>()?
            }
            AudioFormat::Float32 => {
                reader.samples::<f32>().collect::<std::result::Result<Vec<f32>, hound::Error>>()?
            }
        };

        let channels = spec.channels as usize;
        if channels == 0 {
            return Err(PcmHeaderError::audio("Channel count cannot be 0"));
        }
        let frames = samples.len() / channels;

        let data = if channels == 1 {
            AudioData::Mono(Array1::from(samples))
        } else {
            let mut interleaved = samples;
            interleaved.truncate(frames * channels);
            let multi = Array2::from_shape_vec((frames, channels), interleaved)
                .map_err(|e| PcmHeaderError::audio(format!("Invalid channel layout: {}", e)))?;
            AudioData::Multi(multi)
        };

        let header = AudioHeader::new(spec.sample_rate, spec.channels, format, frames as u32);
        header.validate()?;

        Ok(WavAudio { header, data })
    }

    pub fn new_mono(sample_rate: u32, data: Array1<f32>, format: AudioFormat) -> Self {
        let header = AudioHeader::new(sample_rate, 1, format, data.len() as u32);
        WavAudio { header, data: AudioData::Mono(data) }
    }

    pub fn new_multi(sample_rate: u32, data: Array2<f32>, format: AudioFormat) -> Result<Self> {
        if data.ncols() < 2 {
            return Err(PcmHeaderError::audio("Multi-channel data needs at least 2 columns"));
        }

        let header = AudioHeader::new(sample_rate, data.ncols() as u16, format, data.nrows() as u32);
        Ok(WavAudio { header, data: AudioData::Multi(data) })
    }

    pub fn data(&self) -> &AudioData {
        &self.data
    }

    pub fn sample_rate(&self) -> u32 {
        self.header.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.header.channels
    }

    pub fn total_frames(&self) -> u32 {
        self.header.total_frames
    }

    pub fn duration(&self) -> f64 {
        self.header.duration
    }

    /// Mono s16le bytes, down-mixing if needed.
    pub fn to_pcm_s16le(&self) -> Vec<u8> {
        self.data.to_mono().iter().flat_map(|&s| to_i16(s).to_le_bytes()).collect()
    }
}

fn to_i16(sample: f32) -> i16 {
    (sample * 32768.0).round().clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};
    use tempfile::TempDir;

    #[test]
    fn test_audio_format() {
        assert_eq!(AudioFormat::Int(16).name(), "int16");
        assert_eq!(AudioFormat::Float32.name(), "float32");

        let spec = |sample_format, bits_per_sample| WavSpec { channels: 1, sample_rate: 8000, bits_per_sample, sample_format };
        assert_eq!(AudioFormat::from_spec(&spec(SampleFormat::Int, 24)).unwrap(), AudioFormat::Int(24));
        assert_eq!(AudioFormat::from_spec(&spec(SampleFormat::Float, 32)).unwrap(), AudioFormat::Float32);
        assert!(AudioFormat::from_spec(&spec(SampleFormat::Float, 64)).is_err());
    }

    #[test]
    fn test_audio_header_validation() {
        let header = AudioHeader::new(44100, 1, AudioFormat::Int(16), 1000);
        assert!(header.validate().is_ok());

        assert!(AudioHeader::new(0, 1, AudioFormat::Int(16), 1000).validate().is_err());
        assert!(AudioHeader::new(44100, 0, AudioFormat::Int(16), 1000).validate().is_err());
        assert!(AudioHeader::new(44100, 1, AudioFormat::Int(16), 0).validate().is_err());
    }

    #[test]
    fn test_downmix() {
        let stereo = AudioData::Multi(Array2::from(vec![[0.5, -0.5], [0.25, 0.75]]));
        assert_eq!(stereo.channels(), 2);
        assert_eq!(stereo.to_mono().to_vec(), vec![0.0, 0.5]);
    }

    #[test]
    fn test_int16_samples_survive_exactly() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("beep.wav");

        let spec = WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for s in [0i16, 5000, 10000, -2500, i16::MIN, i16::MAX] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let audio = WavAudio::from_file(&path).unwrap();
        assert_eq!(audio.sample_rate(), 44100);
        assert_eq!(audio.total_frames(), 6);

        let bytes = audio.to_pcm_s16le();
        let pcm = crate::audio::PcmBuffer::from_le_bytes(&bytes);
        assert_eq!(pcm.samples, vec![0, 5000, 10000, -2500, i16::MIN, i16::MAX]);
    }

    #[test]
    fn test_stereo_file_downmix() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stereo.wav");

        let spec = WavSpec { channels: 2, sample_rate: 22050, bits_per_sample: 16, sample_format: SampleFormat::Int };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for s in [16384i16, 16384, -8192, -8192, 0, 16384] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let loaded = WavAudio::from_file(&path).unwrap();
        assert_eq!(loaded.channels(), 2);
        assert_eq!(loaded.sample_rate(), 22050);
        assert_eq!(loaded.total_frames(), 3);

        let mono = loaded.data().to_mono();
        assert!((mono[0] - 0.5).abs() < 1e-6);
        assert!((mono[1] + 0.25).abs() < 1e-6);
        assert!((mono[2] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_multi_creation() {
        let data = Array2::<f32>::zeros((4, 1));
        assert!(WavAudio::new_multi(44100, data, AudioFormat::Int(16)).is_err());
    }

    #[test]
    fn test_not_a_wav_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("noise.wav");
        std::fs::write(&path, b"definitely not RIFF").unwrap();
        assert!(WavAudio::from_file(&path).is_err());
    }
}
