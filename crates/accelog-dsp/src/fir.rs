use std::f64::consts::PI;

use crate::{DesignError, FilterSpec, SampleRate};

/// Symmetric Hamming window of length `len`.
pub fn hamming(len: usize) -> Vec<f64> {
    if len == 1 {
        return vec![1.0];
    }
    let span = (len - 1) as f64;
    (0..len)
        .map(|n| 0.54 - 0.46 * (2.0 * PI * n as f64 / span).cos())
        .collect()
}

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

/// Linear-phase low-pass FIR by the window method (Hamming), scaled to unit
/// gain at DC.
pub fn firwin(taps: usize, cutoff_hz: f64, rate: SampleRate) -> Result<Vec<f64>, DesignError> {
    FilterSpec {
        taps,
        sample_rate_hz: rate.0,
        cutoff_hz,
    }
    .validate()?;

    let cutoff = cutoff_hz / rate.nyquist();
    let alpha = 0.5 * (taps - 1) as f64;
    let mut coeffs: Vec<f64> = hamming(taps)
        .into_iter()
        .enumerate()
        .map(|(n, w)| cutoff * sinc(cutoff * (n as f64 - alpha)) * w)
        .collect();

    let gain: f64 = coeffs.iter().sum();
    for c in &mut coeffs {
        *c /= gain;
    }
    log::debug!("designed {taps}-tap low-pass at {cutoff_hz} Hz (fs = {} Hz)", rate.0);
    Ok(coeffs)
}

/// Discrete convolution trimmed to `max(len)` samples centred on the full
/// result, so a filtered trace lines up with its input.
pub fn convolve_same(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    if signal.is_empty() || kernel.is_empty() {
        return Vec::new();
    }

    let full_len = signal.len() + kernel.len() - 1;
    let mut full = vec![0.0; full_len];
    for (i, s) in signal.iter().enumerate() {
        for (j, k) in kernel.iter().enumerate() {
            full[i + j] += s * k;
        }
    }

    let shorter = signal.len().min(kernel.len());
    let offset = shorter - 1 - shorter / 2;
    let len = signal.len().max(kernel.len());
    full.drain(offset..offset + len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_hamming_endpoints() {
        let w = hamming(5);
        assert_close(w[0], 0.08);
        assert_close(w[2], 1.0);
        assert_close(w[4], 0.08);
        assert_eq!(hamming(1), vec![1.0]);
    }

    #[test]
    fn test_firwin_is_symmetric_with_unit_dc_gain() {
        let h = firwin(20, 20.0, SampleRate(400.0)).unwrap();
        assert_eq!(h.len(), 20);
        assert_close(h.iter().sum::<f64>(), 1.0);
        for i in 0..10 {
            assert_close(h[i], h[19 - i]);
        }
        // centre taps dominate for a narrow low-pass
        assert!(h[9] > h[0]);
        assert!(h[9] > 0.0);
    }

    #[test]
    fn test_firwin_matches_reference_values() {
        // firwin(5, 0.25 * nyquist) with a Hamming window
        let h = firwin(5, 25.0, SampleRate(200.0)).unwrap();
        let raw = [
            0.08 * 0.25 * sinc(-0.5),
            0.54 * 0.25 * sinc(-0.25),
            0.25,
            0.54 * 0.25 * sinc(0.25),
            0.08 * 0.25 * sinc(0.5),
        ];
        let gain: f64 = raw.iter().sum();
        for (got, want) in h.iter().zip(raw) {
            assert_close(*got, want / gain);
        }
    }

    #[test]
    fn test_single_tap_is_identity() {
        assert_eq!(firwin(1, 10.0, SampleRate(100.0)).unwrap(), vec![1.0]);
    }

    #[test]
    fn test_firwin_rejects_cutoff_above_nyquist() {
        assert!(matches!(
            firwin(20, 250.0, SampleRate(400.0)),
            Err(DesignError::Cutoff { .. })
        ));
    }

    #[test]
    fn test_convolve_same_odd_kernel() {
        let out = convolve_same(&[1.0, 2.0, 3.0], &[0.0, 1.0, 0.5]);
        assert_eq!(out, vec![1.0, 2.5, 4.0]);
    }

    #[test]
    fn test_convolve_same_even_kernel() {
        let out = convolve_same(&[1.0, 2.0, 3.0, 4.0], &[1.0, 1.0]);
        assert_eq!(out, vec![1.0, 3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_convolve_same_kernel_longer_than_signal() {
        let out = convolve_same(&[1.0], &[1.0, 2.0, 3.0]);
        assert_eq!(out, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_convolve_same_preserves_dc_in_the_middle() {
        let h = firwin(9, 20.0, SampleRate(400.0)).unwrap();
        let out = convolve_same(&[1.0; 40], &h);
        assert_eq!(out.len(), 40);
        assert_close(out[20], 1.0);
    }

    #[test]
    fn test_convolve_same_empty() {
        assert!(convolve_same(&[], &[1.0]).is_empty());
    }
}
