//! Offline filter design for the accelerometer pipeline.

pub mod export;
pub mod fir;
pub mod response;

use serde::{Deserialize, Serialize};

pub use export::{round_coefficients, write_coefficients, ExportError, COEFFICIENT_DECIMALS};
pub use fir::{convolve_same, firwin, hamming};
pub use response::{freqz, FrequencyPoint, RESPONSE_POINTS};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRate(pub f64); // Hz

impl SampleRate {
    pub fn nyquist(&self) -> f64 {
        self.0 / 2.0
    }
}

/// Parameters of a windowed low-pass FIR design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    pub taps: usize,
    pub sample_rate_hz: f64,
    pub cutoff_hz: f64,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            taps: 20,
            sample_rate_hz: 400.0,
            cutoff_hz: 20.0,
        }
    }
}

impl FilterSpec {
    pub fn sample_rate(&self) -> SampleRate {
        SampleRate(self.sample_rate_hz)
    }

    pub fn validate(&self) -> Result<(), DesignError> {
        if self.taps == 0 {
            return Err(DesignError::NoTaps);
        }
        if !(self.sample_rate_hz.is_finite() && self.sample_rate_hz > 0.0) {
            return Err(DesignError::SampleRate(self.sample_rate_hz));
        }
        let nyquist = self.sample_rate().nyquist();
        if !(self.cutoff_hz > 0.0 && self.cutoff_hz < nyquist) {
            return Err(DesignError::Cutoff {
                cutoff: self.cutoff_hz,
                nyquist,
            });
        }
        Ok(())
    }

    /// Designs the filter described by this spec.
    pub fn design(&self) -> Result<Vec<f64>, DesignError> {
        firwin(self.taps, self.cutoff_hz, self.sample_rate())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DesignError {
    #[error("a filter needs at least one tap")]
    NoTaps,
    #[error("sample rate must be a positive number of Hz, got {0}")]
    SampleRate(f64),
    #[error("cutoff must lie strictly between 0 and the Nyquist frequency ({nyquist} Hz), got {cutoff} Hz")]
    Cutoff { cutoff: f64, nyquist: f64 },
}
