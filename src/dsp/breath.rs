//! Breath texture - a faint noise layer under the tonal signal.
//!
//! Broadband noise from a seeded RNG, attenuated far below the tone and
//! overlaid time-aligned. The onset/middle/tail breath envelope is
//! defined here as well, but the default overlay is flat: the envelope
//! shape is only applied per-sample when `apply_envelope` is set, which
//! keeps the stock bank output stable while leaving the shaped variant
//! available.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::BreathParams;
use crate::dsp::buffer::SampleBuffer;
use crate::error::RenderError;

/// Overlays a shaped-or-flat noise layer onto a tonal buffer.
#[derive(Debug, Clone)]
pub struct BreathTexture {
    params: BreathParams,
}

/// Gain contour of the breath layer over a note's lifetime:
/// strong at the very onset fading in over the first 10%, a low
/// sinusoidal murmur through the middle, and a slight swell across the
/// final 20% that settles back to near silence at the end.
pub fn breath_envelope(len: usize) -> Vec<f64> {
    let mut envelope = vec![1.0; len];
    if len == 0 {
        return envelope;
    }

    let attack = (0.1 * len as f64) as usize;
    let release = (0.2 * len as f64) as usize;

    for i in 0..attack {
        envelope[i] = 0.3 + 0.7 * (attack - i) as f64 / attack as f64;
    }
    for i in 0..release {
        envelope[len - 1 - i] = 0.1 + 0.2 * i as f64 / release as f64;
    }

    let middle_start = attack;
    let middle_end = len.saturating_sub(release);
    if middle_end > middle_start {
        let span = (middle_end - middle_start) as f64;
        for i in middle_start..middle_end {
            envelope[i] = 0.05 + 0.05 * ((i - middle_start) as f64 * PI / span).sin();
        }
    }

    envelope
}

impl BreathTexture {
    pub fn new(params: BreathParams) -> Self {
        Self { params }
    }

    /// Mix the breath layer into `buffer`.
    ///
    /// The noise matches the buffer's duration exactly and is seeded from
    /// the config, so repeated renders are bit-identical.
    pub fn add_breath(&self, mut buffer: SampleBuffer) -> Result<SampleBuffer, RenderError> {
        let p = &self.params;
        if !(0.0..=1.0).contains(&p.intensity) {
            return Err(RenderError::InvalidParameter {
                stage: "breath",
                name: "intensity",
                value: p.intensity,
            });
        }

        let mut rng = StdRng::seed_from_u64(p.noise_seed);
        let mut noise = SampleBuffer::from_samples(
            (0..buffer.len())
                .map(|_| rng.random_range(-1.0..1.0))
                .collect(),
        );

        noise.apply_gain_db(p.base_attenuation_db);
        noise.apply_gain_db(p.layer_attenuation_db);

        if p.apply_envelope {
            let envelope = breath_envelope(noise.len());
            for (s, g) in noise.samples_mut().iter_mut().zip(envelope) {
                *s *= g;
            }
        }

        buffer.overlay(&noise);
        Ok(buffer)
    }
}
