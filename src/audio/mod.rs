//! Audio Processing Module
//!
//! Raw PCM unpacking, peak normalization, and native WAV reading with
//! down-mix and resampling.

pub mod wav;
pub mod converter;
pub mod pcm;
pub mod normalize;

pub use wav::{WavAudio, AudioFormat, AudioHeader, AudioData};
pub use converter::AudioConverter;
pub use pcm::{PcmBuffer, OddLengthPolicy};
pub use normalize::{normalize_peak, peak_magnitude, Normalized};
