//! flutebank - offline synthesis of a tuned bamboo-flute note bank.
//!
//! Renders 21 notes (three octave registers, seven scale degrees each)
//! through a deterministic DSP chain: additive harmonics, amplitude
//! envelope, block vibrato, breath noise, soft limiting, and reverb
//! diffusion, then exports each note as a mono WAV file. Tuning constants
//! all live in [`config::BankConfig`]; the defaults reproduce the stock
//! bank and are headroom-budgeted so a player can mix several notes at
//! once without clipping.

pub mod bank;
pub mod config;
pub mod dsp;
pub mod error;
pub mod export;
pub mod scale;

pub use bank::{BankBuilder, BankReport, generate_bank};
pub use config::BankConfig;
pub use dsp::{NoteRenderer, SampleBuffer};
pub use error::{BankError, ConfigError, NoteFailure, RenderError};
pub use scale::Octave;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render a single bank note with the given tuning.
pub fn render_note(
    octave: Octave,
    degree: u8,
    config: &BankConfig,
) -> Result<SampleBuffer, BankError> {
    config.validate()?;
    let hz = scale::note_frequency(octave, degree).ok_or(RenderError::InvalidParameter {
        stage: "renderer",
        name: "degree",
        value: degree as f64,
    })?;
    let renderer = NoteRenderer::new(config);
    Ok(renderer.render(hz, octave, degree)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_note_rejects_bad_degree() {
        let config = BankConfig::default();
        assert!(render_note(Octave::Mid, 0, &config).is_err());
        assert!(render_note(Octave::Mid, 8, &config).is_err());
    }

    #[test]
    fn render_note_produces_audio() {
        let config = BankConfig {
            duration_ms: 150.0,
            ..BankConfig::default()
        };
        let note = render_note(Octave::Mid, 1, &config).unwrap();
        assert!(note.peak() > 0.0);
    }
}
