//! Note renderer - the fixed synthesis chain for one finished note.
//!
//! Order: tone generation, envelope, vibrato, breath, limiter, reverb,
//! then a final safety limiter. Every stage is a pure function of its
//! input buffer and the config constants, so identical inputs render
//! bit-identical notes and separate notes share no state.

use crate::config::BankConfig;
use crate::dsp::breath::BreathTexture;
use crate::dsp::buffer::SampleBuffer;
use crate::dsp::envelope::EnvelopeShaper;
use crate::dsp::limiter::SoftLimiter;
use crate::dsp::reverb::ReverbDiffuser;
use crate::dsp::stage::{Pipeline, Stage};
use crate::dsp::tone::ToneGenerator;
use crate::dsp::vibrato::Vibrato;
use crate::error::RenderError;
use crate::scale::Octave;

/// Renders one note from a fundamental frequency and the bank tuning.
pub struct NoteRenderer {
    duration_ms: f64,
    tone: ToneGenerator,
    pipeline: Pipeline,
}

impl NoteRenderer {
    pub fn new(config: &BankConfig) -> Self {
        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(EnvelopeShaper::new(config.envelope.clone())),
            Box::new(Vibrato::new(config.vibrato.clone())),
            Box::new(BreathTexture::new(config.breath.clone())),
            Box::new(SoftLimiter::new(config.limiter)),
            Box::new(ReverbDiffuser::new(config.reverb.clone())),
            Box::new(SoftLimiter::new(config.safety_limiter)),
        ];
        Self {
            duration_ms: config.duration_ms,
            tone: ToneGenerator::new(config.tone.clone()),
            pipeline: Pipeline::new(stages),
        }
    }

    /// Render the note for one bank entry at the configured duration.
    pub fn render(
        &self,
        frequency_hz: f64,
        octave: Octave,
        degree: u8,
    ) -> Result<SampleBuffer, RenderError> {
        log::debug!("rendering {octave}/{degree} at {frequency_hz} Hz");
        self.render_with_duration(frequency_hz, self.duration_ms)
    }

    /// Render at an explicit duration, bypassing the configured one.
    pub fn render_with_duration(
        &self,
        frequency_hz: f64,
        duration_ms: f64,
    ) -> Result<SampleBuffer, RenderError> {
        let raw = self.tone.generate(frequency_hz, duration_ms)?;
        self.pipeline.run(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::buffer::ms_to_samples;

    fn renderer() -> NoteRenderer {
        NoteRenderer::new(&BankConfig::default())
    }

    #[test]
    fn renders_are_bit_identical() {
        let r = renderer();
        let a = r.render(261.63, Octave::Mid, 1).unwrap();
        let b = r.render(261.63, Octave::Mid, 1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn duration_is_request_plus_reverb_tail() {
        let r = renderer();
        let tail = 200.0; // longest default reverb delay
        for &ms in &[50.0, 150.0, 2500.0] {
            let out = r.render_with_duration(261.63, ms).unwrap();
            let expected = ms + tail;
            assert!(
                (out.duration_ms() - expected).abs() < 5.0,
                "{ms} ms request rendered {} ms, expected about {expected}",
                out.duration_ms()
            );
        }
    }

    #[test]
    fn final_loudness_respects_safety_limiter() {
        let r = renderer();
        for (octave, degree, hz) in crate::scale::all_notes() {
            let out = r.render(hz, octave, degree).unwrap();
            assert!(
                out.dbfs() <= -10.0 + 1.0 + 1e-6,
                "{octave}/{degree}: {} dBFS exceeds the -10 dB threshold + 1 dB margin",
                out.dbfs()
            );
        }
    }

    #[test]
    fn end_to_end_middle_c() {
        let r = renderer();
        let out = r.render_with_duration(261.63, 2500.0).unwrap();
        assert_eq!(
            out.len(),
            ms_to_samples(2500.0) + ms_to_samples(200.0),
            "length must be the request plus the reverb tail"
        );
        assert!(out.dbfs() <= -9.0 + 1e-6, "final loudness {}", out.dbfs());
        assert!(out.peak() > 0.0, "note must not be silent");
        // The tonal attack starts from silence; only the faint breath
        // layer (under -57 dB) can sit on the first sample.
        assert!(out.samples()[0].abs() < 2e-3);
    }

    #[test]
    fn four_note_chord_leaves_headroom() {
        // Sum mid 1/3/5/7 sample-wise; the combined peak must stay below
        // full scale, the whole point of the per-stage headroom budget.
        let r = renderer();
        let mut chord: Option<SampleBuffer> = None;
        for degree in [1u8, 3, 5, 7] {
            let hz = crate::scale::note_frequency(Octave::Mid, degree).unwrap();
            let note = r.render(hz, Octave::Mid, degree).unwrap();
            chord = Some(match chord {
                None => note,
                Some(mut acc) => {
                    acc.overlay(&note);
                    acc
                }
            });
        }
        let chord = chord.unwrap();
        assert!(
            chord.peak() < 1.0,
            "four-voice chord peaks at {} and would clip",
            chord.peak()
        );
    }

    #[test]
    fn invalid_frequency_fails_fast() {
        let r = renderer();
        assert!(r.render(-1.0, Octave::Low, 1).is_err());
        assert!(r.render_with_duration(440.0, -10.0).is_err());
    }
}
