//! Raw s16le PCM buffers

use log::warn;
use serde::{Deserialize, Serialize};
use crate::error::{PcmHeaderError, Result};

/// What to do with a raw buffer whose length is not a multiple of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OddLengthPolicy {
    /// Drop the trailing byte and warn.
    #[default]
    Truncate,
    /// Fail the file.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmBuffer {
    pub samples: Vec<i16>,
    /// Bytes left over after the last whole sample (0 or 1).
    pub trailing_bytes: usize,
}

impl PcmBuffer {
    pub fn from_le_bytes(bytes: &[u8]) -> Self {
        let chunks = bytes.chunks_exact(2);
        let trailing_bytes = chunks.remainder().len();
        let samples = chunks.map(|pair| i16::from_le_bytes([pair[0], pair[1]])).collect();

        Self { samples, trailing_bytes }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn validate(&self, policy: OddLengthPolicy) -> Result<()> {
        if self.is_empty() {
            return Err(PcmHeaderError::malformed("decoder produced no samples"));
        }

        if self.trailing_bytes > 0 {
            match policy {
                OddLengthPolicy::Truncate => {
                    warn!("Discarding {} trailing byte(s) after {} samples", self.trailing_bytes, self.len());
                }
                OddLengthPolicy::Reject => {
                    return Err(PcmHeaderError::malformed(format!(
                        "odd buffer length: {} samples plus {} trailing byte(s)",
                        self.len(), self.trailing_bytes
                    )));
                }
            }
        }

        Ok(())
    }
}

pub fn to_le_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_little_endian() {
        let buf = PcmBuffer::from_le_bytes(&[0x10, 0x27, 0xF0, 0xD8, 0x00, 0x80]);
        assert_eq!(buf.samples, vec![10000, -10000, i16::MIN]);
        assert_eq!(buf.trailing_bytes, 0);
    }

    #[test]
    fn test_odd_trailing_byte_is_discarded() {
        let mut bytes = to_le_bytes(&[1, -2, 12345]);
        bytes.push(0x7F);

        let buf = PcmBuffer::from_le_bytes(&bytes);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.samples[2], 12345);
        assert_eq!(buf.trailing_bytes, 1);

        assert!(buf.validate(OddLengthPolicy::Truncate).is_ok());
        assert!(matches!(
            buf.validate(OddLengthPolicy::Reject),
            Err(PcmHeaderError::MalformedPcm { .. })
        ));
    }

    #[test]
    fn test_sample_count_is_half_byte_count() {
        for len in 0..9usize {
            let bytes = vec![0u8; len];
            assert_eq!(PcmBuffer::from_le_bytes(&bytes).len(), len / 2);
        }
    }

    #[test]
    fn test_empty_buffer_rejected() {
        let buf = PcmBuffer::from_le_bytes(&[]);
        assert!(buf.validate(OddLengthPolicy::Truncate).is_err());

        let buf = PcmBuffer::from_le_bytes(&[0x01]);
        assert!(buf.validate(OddLengthPolicy::Truncate).is_err());
    }
}
