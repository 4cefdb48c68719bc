//! Tone generator - additive harmonic synthesis of the raw flute tone.
//!
//! A fundamental sine plus five harmonics at integer multiples x2..x6,
//! each attenuated independently, summed time-aligned, then pulled down a
//! further headroom margin so several notes can be mixed later without
//! clipping. Output is fully deterministic.

use std::f64::consts::TAU;

use crate::config::ToneParams;
use crate::dsp::buffer::{SAMPLE_RATE, SampleBuffer, db_to_linear, ms_to_samples};
use crate::error::RenderError;

/// Generates the raw multi-harmonic waveform for one fundamental.
#[derive(Debug, Clone)]
pub struct ToneGenerator {
    params: ToneParams,
}

impl ToneGenerator {
    pub fn new(params: ToneParams) -> Self {
        Self { params }
    }

    /// Render a sine partial at `frequency_hz` and linear `gain`.
    fn partial(frequency_hz: f64, gain: f64, num_samples: usize) -> Vec<f64> {
        let step = TAU * frequency_hz / SAMPLE_RATE as f64;
        (0..num_samples)
            .map(|i| gain * (step * i as f64).sin())
            .collect()
    }

    /// Build the composite tone for one fundamental frequency.
    pub fn generate(
        &self,
        frequency_hz: f64,
        duration_ms: f64,
    ) -> Result<SampleBuffer, RenderError> {
        if !(frequency_hz > 0.0 && frequency_hz.is_finite()) {
            return Err(RenderError::NonPositiveFrequency(frequency_hz));
        }
        if !(duration_ms > 0.0 && duration_ms.is_finite()) {
            return Err(RenderError::NonPositiveDuration(duration_ms));
        }

        let num_samples = ms_to_samples(duration_ms);
        let mut composite = Self::partial(
            frequency_hz,
            db_to_linear(self.params.fundamental_db),
            num_samples,
        );

        for (order, &db) in (2..).zip(self.params.harmonic_dbs.iter()) {
            let harmonic = Self::partial(frequency_hz * order as f64, db_to_linear(db), num_samples);
            for (c, h) in composite.iter_mut().zip(harmonic) {
                *c += h;
            }
        }

        let mut buffer = SampleBuffer::from_samples(composite);
        buffer.apply_gain_db(self.params.headroom_db);
        Ok(buffer)
    }
}
