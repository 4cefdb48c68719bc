//! Reverb diffuser - a few decayed, delayed reflections of the note.
//!
//! Each tap builds a copy of the input prefixed with delay-length silence,
//! attenuates it by `28 + 8 * (1 - decay)` dB, pads the shorter of copy
//! and accumulator with trailing silence, and overlays. The result is as
//! long as the longest reflection, so the output grows by the last tap's
//! delay. Light tuning on purpose: a flute carries its own air, it only
//! needs a hint of room.

use crate::config::{ReverbParams, ReverbTap};
use crate::dsp::buffer::SampleBuffer;
use crate::error::RenderError;

/// Overlays delayed, decayed copies of a signal onto itself.
#[derive(Debug, Clone)]
pub struct ReverbDiffuser {
    params: ReverbParams,
}

impl ReverbDiffuser {
    pub fn new(params: ReverbParams) -> Self {
        Self { params }
    }

    /// Attenuation applied to one reflection, in dB (as a negative gain).
    fn tap_attenuation_db(tap: &ReverbTap) -> f64 {
        28.0 + 8.0 * (1.0 - tap.decay)
    }

    pub fn diffuse(&self, buffer: SampleBuffer) -> Result<SampleBuffer, RenderError> {
        for tap in &self.params.taps {
            if !(tap.delay_ms > 0.0 && tap.delay_ms.is_finite()) {
                return Err(RenderError::InvalidParameter {
                    stage: "reverb",
                    name: "delay_ms",
                    value: tap.delay_ms,
                });
            }
            if !(0.0..=1.0).contains(&tap.decay) {
                return Err(RenderError::InvalidParameter {
                    stage: "reverb",
                    name: "decay",
                    value: tap.decay,
                });
            }
        }

        let mut result = buffer.clone();
        for tap in &self.params.taps {
            let mut delayed = SampleBuffer::silence(tap.delay_ms);
            delayed.append(&buffer);
            delayed.apply_gain_db(-Self::tap_attenuation_db(tap));

            // Length-align before overlaying; overlay keeps self length.
            if delayed.len() > result.len() {
                result.pad_to_len(delayed.len());
            } else {
                delayed.pad_to_len(result.len());
            }
            result.overlay(&delayed);
        }
        Ok(result)
    }
}
