//! Sample buffer - owned mono audio at a fixed 44.1 kHz rate.
//!
//! Every pipeline stage consumes and produces a `SampleBuffer`. Samples are
//! f64 in [-1.0, 1.0] nominal range; gain is tracked in dB relative to full
//! scale, with loudness measured as RMS (matching how the limiter and the
//! headroom tests reason about level).

use std::ops::Range;

/// Fixed output sample rate in Hz.
pub const SAMPLE_RATE: u32 = 44_100;

/// dB floor returned for silent or non-positive amplitudes.
pub const DB_FLOOR: f64 = -120.0;

/// Convert dB to a linear amplitude multiplier.
#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Convert linear amplitude to dB, clamped at the silence floor.
#[inline]
pub fn linear_to_db(linear: f64) -> f64 {
    if linear <= 0.0 {
        DB_FLOOR
    } else {
        (20.0 * linear.log10()).max(DB_FLOOR)
    }
}

/// Number of samples covering `ms` milliseconds at the fixed rate.
#[inline]
pub fn ms_to_samples(ms: f64) -> usize {
    (ms * SAMPLE_RATE as f64 / 1000.0).round() as usize
}

/// An owned buffer of mono f64 samples at [`SAMPLE_RATE`].
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f64>,
}

impl SampleBuffer {
    /// Wrap an existing sample vector.
    pub fn from_samples(samples: Vec<f64>) -> Self {
        Self { samples }
    }

    /// A silent buffer spanning `duration_ms` milliseconds.
    pub fn silence(duration_ms: f64) -> Self {
        Self {
            samples: vec![0.0; ms_to_samples(duration_ms)],
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Buffer duration in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.samples.len() as f64 * 1000.0 / SAMPLE_RATE as f64
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f64] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    /// Peak absolute amplitude (linear).
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0, |acc, s| acc.max(s.abs()))
    }

    /// RMS loudness in dB relative to full scale.
    ///
    /// Silence reports [`DB_FLOOR`].
    pub fn dbfs(&self) -> f64 {
        if self.samples.is_empty() {
            return DB_FLOOR;
        }
        let sum_sq: f64 = self.samples.iter().map(|s| s * s).sum();
        let rms = (sum_sq / self.samples.len() as f64).sqrt();
        linear_to_db(rms)
    }

    /// Apply a uniform gain of `db` decibels to the whole buffer.
    pub fn apply_gain_db(&mut self, db: f64) {
        let gain = db_to_linear(db);
        for s in &mut self.samples {
            *s *= gain;
        }
    }

    /// Apply a uniform gain of `db` decibels to a sample range.
    ///
    /// The range is clamped to the buffer length.
    pub fn apply_gain_db_range(&mut self, db: f64, range: Range<usize>) {
        let gain = db_to_linear(db);
        let end = range.end.min(self.samples.len());
        let start = range.start.min(end);
        for s in &mut self.samples[start..end] {
            *s *= gain;
        }
    }

    /// Sample-wise addition of `other` over the overlapping prefix.
    ///
    /// The buffer keeps its own length; trailing samples of a longer
    /// `other` are ignored. Callers that need full coverage pad first
    /// with [`pad_to_len`](Self::pad_to_len).
    pub fn overlay(&mut self, other: &SampleBuffer) {
        let n = self.samples.len().min(other.samples.len());
        for i in 0..n {
            self.samples[i] += other.samples[i];
        }
    }

    /// Append all samples of `other` after the current contents.
    pub fn append(&mut self, other: &SampleBuffer) {
        self.samples.extend_from_slice(&other.samples);
    }

    /// Extend with trailing silence until the buffer holds `len` samples.
    pub fn pad_to_len(&mut self, len: usize) {
        if len > self.samples.len() {
            self.samples.resize(len, 0.0);
        }
    }

    /// Linear amplitude ramp from silence over the first `ms` milliseconds.
    ///
    /// A window longer than the buffer spans the whole buffer.
    pub fn fade_in(&mut self, ms: f64) {
        let n = ms_to_samples(ms).min(self.samples.len());
        if n == 0 {
            return;
        }
        for i in 0..n {
            self.samples[i] *= i as f64 / n as f64;
        }
    }

    /// Linear amplitude ramp to silence over the final `ms` milliseconds.
    ///
    /// The last sample lands on exactly zero. A window longer than the
    /// buffer spans the whole buffer.
    pub fn fade_out(&mut self, ms: f64) {
        let len = self.samples.len();
        let n = ms_to_samples(ms).min(len);
        if n == 0 {
            return;
        }
        for i in 0..n {
            self.samples[len - n + i] *= (n - 1 - i) as f64 / n as f64;
        }
    }
}
