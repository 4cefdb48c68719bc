//! Envelope shaper - four-phase amplitude contour for one note.
//!
//! Attack (linear fade-in), decay (flat dB offset), sustain (flat dB
//! offset), release (linear fade-out). Phases are carved out of the buffer
//! front to back; whenever the remaining material is too short for the
//! next phase, that remainder simply fades out instead, and a buffer
//! shorter than the attack window gets a fade-in plus fade-out over its
//! whole length. The shaper never changes the sample count.

use crate::config::EnvelopeParams;
use crate::dsp::buffer::{SampleBuffer, ms_to_samples};

/// Applies the four-phase amplitude model to a raw tone.
#[derive(Debug, Clone)]
pub struct EnvelopeShaper {
    params: EnvelopeParams,
}

impl EnvelopeShaper {
    pub fn new(params: EnvelopeParams) -> Self {
        Self { params }
    }

    pub fn shape(&self, mut buffer: SampleBuffer) -> SampleBuffer {
        let len = buffer.len();
        let attack = ms_to_samples(self.params.attack_ms);

        if len <= attack {
            // Whole buffer is shorter than the attack window: taper both
            // ends across its full length.
            let full = buffer.duration_ms();
            buffer.fade_in(full);
            buffer.fade_out(full);
            return buffer;
        }

        buffer.fade_in(self.params.attack_ms);

        let decay = ms_to_samples(self.params.decay_ms);
        let remaining = len - attack;
        if remaining <= decay {
            // Not enough material for a decay phase; fade the rest out.
            Self::fade_out_span(&mut buffer, attack, len);
            return buffer;
        }

        buffer.apply_gain_db_range(self.params.decay_db, attack..attack + decay);

        let release = ms_to_samples(self.params.release_ms);
        let sustain_start = attack + decay;
        let sustain_len = len - sustain_start;
        if sustain_len <= release {
            // No room for a sustain plateau; the remainder is all tail.
            Self::fade_out_span(&mut buffer, sustain_start, len);
            return buffer;
        }

        buffer.apply_gain_db_range(self.params.sustain_db, sustain_start..len - release);
        buffer.fade_out(self.params.release_ms);
        buffer
    }

    /// Linear fade to silence across an arbitrary span of the buffer.
    fn fade_out_span(buffer: &mut SampleBuffer, start: usize, end: usize) {
        let n = end.saturating_sub(start);
        if n == 0 {
            return;
        }
        let samples = buffer.samples_mut();
        for i in 0..n {
            samples[start + i] *= (n - 1 - i) as f64 / n as f64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::buffer::db_to_linear;

    fn shaper() -> EnvelopeShaper {
        EnvelopeShaper::new(EnvelopeParams::default())
    }

    fn flat_tone(ms: f64) -> SampleBuffer {
        SampleBuffer::from_samples(vec![0.5; ms_to_samples(ms)])
    }

    #[test]
    fn preserves_sample_count() {
        for &ms in &[20.0, 50.0, 150.0, 320.0, 900.0, 2500.0] {
            let input = flat_tone(ms);
            let expected = input.len();
            let shaped = shaper().shape(input);
            assert_eq!(shaped.len(), expected, "length changed for {ms} ms");
        }
    }

    #[test]
    fn attack_ramps_from_silence() {
        let shaped = shaper().shape(flat_tone(2500.0));
        let s = shaped.samples();
        assert_eq!(s[0], 0.0);
        let attack_end = ms_to_samples(100.0);
        // Monotonic rise through the attack window.
        assert!(s[attack_end / 2] > s[attack_end / 4]);
    }

    #[test]
    fn release_ends_at_silence() {
        let shaped = shaper().shape(flat_tone(2500.0));
        assert_eq!(*shaped.samples().last().unwrap(), 0.0);
    }

    #[test]
    fn decay_and_sustain_sit_below_attack_peak() {
        let shaped = shaper().shape(flat_tone(2500.0));
        let s = shaped.samples();
        let decay_mid = ms_to_samples(200.0); // inside 100..300 ms
        let sustain_mid = ms_to_samples(1200.0);
        let expected_decay = 0.5 * db_to_linear(-1.0);
        let expected_sustain = 0.5 * db_to_linear(-2.0);
        assert!(
            (s[decay_mid] - expected_decay).abs() < 1e-9,
            "decay level {} expected {expected_decay}",
            s[decay_mid]
        );
        assert!(
            (s[sustain_mid] - expected_sustain).abs() < 1e-9,
            "sustain level {} expected {expected_sustain}",
            s[sustain_mid]
        );
    }

    #[test]
    fn short_buffer_tapers_both_ends() {
        // 50 ms is shorter than the 100 ms attack window.
        let shaped = shaper().shape(flat_tone(50.0));
        let s = shaped.samples();
        assert_eq!(s[0], 0.0);
        assert_eq!(*s.last().unwrap(), 0.0);
        assert!(s[s.len() / 2] > 0.0, "middle must keep signal");
    }

    #[test]
    fn medium_buffer_degrades_to_fade_out() {
        // 150 ms: attack fits, the 200 ms decay window does not, so the
        // remaining 50 ms becomes a fade-out.
        let shaped = shaper().shape(flat_tone(150.0));
        let s = shaped.samples();
        assert_eq!(s[0], 0.0);
        assert_eq!(*s.last().unwrap(), 0.0);
        assert_eq!(shaped.len(), ms_to_samples(150.0));
    }

    #[test]
    fn no_release_room_fades_post_decay_remainder() {
        // 500 ms: attack 100 + decay 200 leaves 200 ms, less than the
        // 400 ms release window, so the remainder fades out entirely.
        let shaped = shaper().shape(flat_tone(500.0));
        let s = shaped.samples();
        assert_eq!(*s.last().unwrap(), 0.0);
        assert_eq!(shaped.len(), ms_to_samples(500.0));
    }
}
