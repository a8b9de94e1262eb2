use std::f64::consts::PI;

use crate::SampleRate;

/// Number of frequencies the response is evaluated at.
pub const RESPONSE_POINTS: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyPoint {
    pub frequency_hz: f64,
    pub magnitude_db: f64,
}

/// Magnitude response of an FIR filter at `points` frequencies evenly spaced
/// over `[0, fs/2)`.
pub fn freqz(coeffs: &[f64], rate: SampleRate, points: usize) -> Vec<FrequencyPoint> {
    (0..points)
        .map(|k| {
            let w = PI * k as f64 / points as f64;
            let (re, im) = coeffs.iter().enumerate().fold((0.0, 0.0), |(re, im), (n, b)| {
                let phase = w * n as f64;
                (re + b * phase.cos(), im - b * phase.sin())
            });
            FrequencyPoint {
                frequency_hz: w * rate.0 / (2.0 * PI),
                magnitude_db: 20.0 * re.hypot(im).log10(),
            }
        })
        .collect()
}
