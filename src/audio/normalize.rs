//! Peak normalization onto the full int16 range
//!
//! Every sample is divided by the peak magnitude and the resulting [-1, 1]
//! value is mapped linearly onto [-32768, 32767]:
//!
//! `out = round(x * 65535 / 2 + (-32768 + 32767) / 2)`
//!
//! Ties round to even, so a zero sample stays zero.

use log::warn;
use crate::error::{PcmHeaderError, Result};

const INT16_MIN: f64 = i16::MIN as f64;
const INT16_MAX: f64 = i16::MAX as f64;
const HALF_SPAN: f64 = (INT16_MAX - INT16_MIN) / 2.0;
const MID: f64 = (INT16_MIN + INT16_MAX) / 2.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub samples: Vec<i16>,
    /// Peak magnitude of the input, before normalization.
    pub peak: u16,
    pub silent: bool,
}

/// Largest absolute sample value. `i16::MIN` yields 32768.
pub fn peak_magnitude(samples: &[i16]) -> u16 {
    samples.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0)
}

pub fn normalize_peak(samples: &[i16]) -> Result<Normalized> {
    let peak = peak_magnitude(samples);

    if peak == 0 {
        warn!("Input is silent ({} samples), emitting zeros", samples.len());
        return Ok(Normalized { samples: vec![0; samples.len()], peak, silent: true });
    }

    let divisor = peak as f64;
    let samples = samples
        .iter()
        .enumerate()
        .map(|(index, &s)| {
            let scaled = (s as f64 / divisor * HALF_SPAN + MID).round_ties_even();
            to_int16(index, scaled)
        })
        .collect::<Result<Vec<i16>>>()?;

    Ok(Normalized { samples, peak, silent: false })
}

fn to_int16(index: usize, value: f64) -> Result<i16> {
    if !value.is_finite() || value < INT16_MIN || value > INT16_MAX {
        return Err(PcmHeaderError::SampleOutOfRange { index, value: value as i64 });
    }
    Ok(value as i16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_peak_magnitude() {
        assert_eq!(peak_magnitude(&[]), 0);
        assert_eq!(peak_magnitude(&[3, -7, 5]), 7);
        assert_eq!(peak_magnitude(&[i16::MIN, 1]), 32768);
    }

    #[test]
    fn test_positive_peak_hits_upper_rail() {
        let result = normalize_peak(&[0, 5000, 10000, -2500]).unwrap();
        assert_eq!(result.samples, vec![0, 16383, 32767, -8192]);
        assert_eq!(result.peak, 10000);
        assert!(!result.silent);
    }

    #[test]
    fn test_negative_peak_hits_lower_rail() {
        let result = normalize_peak(&[2500, -10000, 0]).unwrap();
        assert_eq!(result.samples, vec![8191, -32768, 0]);
    }

    #[test]
    fn test_full_scale_input() {
        let result = normalize_peak(&[i16::MIN, i16::MAX, 0]).unwrap();
        assert_eq!(result.samples[0], i16::MIN);
        // 32767 / 32768 of full scale lands one step below the upper rail.
        assert_eq!(result.samples[1], 32766);
    }

    #[test]
    fn test_silence_emits_zeros() {
        let result = normalize_peak(&[0, 0, 0, 0]).unwrap();
        assert_eq!(result.samples, vec![0, 0, 0, 0]);
        assert!(result.silent);
        assert_eq!(result.peak, 0);
    }

    #[test]
    fn test_out_of_range_reports_index() {
        assert!(to_int16(0, 32767.0).is_ok());
        assert!(to_int16(0, -32768.0).is_ok());
        assert!(matches!(
            to_int16(4, 32768.0),
            Err(PcmHeaderError::SampleOutOfRange { index: 4, value: 32768 })
        ));
        assert!(to_int16(2, f64::NAN).is_err());
    }

    #[test]
    fn test_random_inputs_saturate_one_rail() {
        let mut rng = rand::thread_rng();

        for _ in 0..200 {
            let len = rng.gen_range(1..512);
            let samples: Vec<i16> = (0..len).map(|_| rng.gen_range(-20000..=20000)).collect();
            if peak_magnitude(&samples) == 0 {
                continue;
            }

            let result = normalize_peak(&samples).unwrap();
            assert_eq!(result.samples.len(), samples.len());

            let max = *result.samples.iter().max().unwrap();
            let min = *result.samples.iter().min().unwrap();
            assert!(max == i16::MAX || min == i16::MIN, "no rail reached: {}..{}", min, max);

            // Ordering is preserved by a monotonic mapping.
            for (a, b) in samples.windows(2).zip(result.samples.windows(2)) {
                if a[0] < a[1] {
                    assert!(b[0] <= b[1]);
                }
            }
        }
    }
}
