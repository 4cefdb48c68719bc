//! Vibrato - block-level amplitude tremor approximating pitch vibrato.
//!
//! True vibrato modulates pitch and would require resampling; this stage
//! instead nudges the gain of fixed 50 ms blocks along a slow sine, with
//! the per-block delta clamped to a couple of dB. At the default rate and
//! depth the wobble reads as vibrato without reinforcing beats between
//! simultaneously sounding notes. A trailing partial block passes through
//! unmodified.

use std::f64::consts::TAU;

use crate::config::VibratoParams;
use crate::dsp::buffer::{SampleBuffer, ms_to_samples};
use crate::error::RenderError;

/// Applies periodic amplitude modulation over fixed-length blocks.
#[derive(Debug, Clone)]
pub struct Vibrato {
    params: VibratoParams,
}

impl Vibrato {
    pub fn new(params: VibratoParams) -> Self {
        Self { params }
    }

    pub fn modulate(&self, mut buffer: SampleBuffer) -> Result<SampleBuffer, RenderError> {
        let p = &self.params;
        if !(p.rate_hz >= 0.0 && p.rate_hz.is_finite()) {
            return Err(RenderError::InvalidParameter {
                stage: "vibrato",
                name: "rate_hz",
                value: p.rate_hz,
            });
        }
        if !(0.0..1.0).contains(&p.depth) {
            return Err(RenderError::InvalidParameter {
                stage: "vibrato",
                name: "depth",
                value: p.depth,
            });
        }

        let block = ms_to_samples(p.block_ms);
        if block == 0 {
            return Err(RenderError::InvalidParameter {
                stage: "vibrato",
                name: "block_ms",
                value: p.block_ms,
            });
        }

        let full_blocks = buffer.len() / block;
        for i in 0..full_blocks {
            let start_ms = i as f64 * p.block_ms;
            let phase = TAU * p.rate_hz * start_ms / 1000.0;
            let modulation = 1.0 + p.depth * phase.sin();
            // Guard: with depth < 1 the modulation stays positive, but a
            // zero-or-negative factor has no dB equivalent.
            let delta_db = if modulation > 0.0 {
                (20.0 * modulation.log10()).clamp(-p.max_delta_db, p.max_delta_db)
            } else {
                0.0
            };
            buffer.apply_gain_db_range(delta_db, i * block..(i + 1) * block);
        }
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::buffer::db_to_linear;

    fn vibrato() -> Vibrato {
        Vibrato::new(VibratoParams::default())
    }

    fn flat(ms: f64) -> SampleBuffer {
        SampleBuffer::from_samples(vec![0.5; ms_to_samples(ms)])
    }

    #[test]
    fn preserves_length() {
        let out = vibrato().modulate(flat(2500.0)).unwrap();
        assert_eq!(out.len(), ms_to_samples(2500.0));
    }

    #[test]
    fn first_block_is_unchanged() {
        // Phase 0 at block start 0 ms gives modulation 1.0: no gain change.
        let out = vibrato().modulate(flat(500.0)).unwrap();
        assert_eq!(out.samples()[0], 0.5);
    }

    #[test]
    fn blocks_are_uniform_within_themselves() {
        let out = vibrato().modulate(flat(500.0)).unwrap();
        let block = ms_to_samples(50.0);
        for b in 0..out.len() / block {
            let span = &out.samples()[b * block..(b + 1) * block];
            let first = span[0];
            assert!(
                span.iter().all(|&s| (s - first).abs() < 1e-12),
                "block {b} is not uniform"
            );
        }
    }

    #[test]
    fn modulation_varies_across_blocks() {
        let out = vibrato().modulate(flat(1000.0)).unwrap();
        let block = ms_to_samples(50.0);
        let levels: Vec<f64> = (0..out.len() / block)
            .map(|b| out.samples()[b * block])
            .collect();
        assert!(
            levels.iter().any(|&l| (l - levels[0]).abs() > 1e-9),
            "expected at least one block to differ: {levels:?}"
        );
    }

    #[test]
    fn delta_stays_within_clamp() {
        // A huge depth would give deltas beyond the clamp; the applied
        // gain must still stay inside +/- 2 dB.
        let v = Vibrato::new(VibratoParams {
            depth: 0.9,
            ..VibratoParams::default()
        });
        let out = v.modulate(flat(1000.0)).unwrap();
        let hi = 0.5 * db_to_linear(2.0);
        let lo = 0.5 * db_to_linear(-2.0);
        for &s in out.samples() {
            assert!(s <= hi + 1e-12 && s >= lo - 1e-12, "sample {s} outside clamp");
        }
    }

    #[test]
    fn trailing_partial_block_passes_through() {
        // 130 ms = two full 50 ms blocks + 30 ms remainder.
        let out = vibrato().modulate(flat(130.0)).unwrap();
        let tail_start = 2 * ms_to_samples(50.0);
        for &s in &out.samples()[tail_start..] {
            assert_eq!(s, 0.5, "partial block must not be modulated");
        }
    }

    #[test]
    fn rejects_invalid_depth_and_rate() {
        let bad_depth = VibratoParams {
            depth: -0.1,
            ..VibratoParams::default()
        };
        assert!(Vibrato::new(bad_depth).modulate(flat(100.0)).is_err());

        let bad_rate = VibratoParams {
            rate_hz: f64::NAN,
            ..VibratoParams::default()
        };
        assert!(Vibrato::new(bad_rate).modulate(flat(100.0)).is_err());
    }
}
