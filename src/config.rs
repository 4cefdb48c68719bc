//! Bank configuration - every tuning constant as an explicit value.
//!
//! Nothing in the pipeline reads ambient globals; each stage is handed its
//! numbers from here, so alternate tunings can be rendered and tested
//! deterministically. `Default` reproduces the reference bank tuning.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Additive harmonic structure of the raw tone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneParams {
    /// Attenuation of the fundamental sine, in dB.
    pub fundamental_db: f64,
    /// Attenuation of harmonics x2..x6, in dB, in harmonic order.
    pub harmonic_dbs: [f64; 5],
    /// Master attenuation applied to the composite, reserving headroom
    /// for later multi-voice summation.
    pub headroom_db: f64,
}

impl Default for ToneParams {
    fn default() -> Self {
        ToneParams {
            fundamental_db: -8.0,
            // The x4 dip below x5 is deliberate; an exact harmonic-series
            // rolloff sounds too bright for a flute.
            harmonic_dbs: [-32.0, -28.0, -40.0, -35.0, -45.0],
            headroom_db: -6.0,
        }
    }
}

/// Four-phase amplitude envelope timings and levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeParams {
    /// Linear fade-in window from silence, in ms.
    pub attack_ms: f64,
    /// Flat early-decay window after the attack, in ms.
    pub decay_ms: f64,
    /// Gain offset of the decay window, in dB.
    pub decay_db: f64,
    /// Gain offset of the sustain portion, in dB.
    pub sustain_db: f64,
    /// Linear fade-out tail, in ms.
    pub release_ms: f64,
}

impl Default for EnvelopeParams {
    fn default() -> Self {
        EnvelopeParams {
            attack_ms: 100.0,
            decay_ms: 200.0,
            decay_db: -1.0,
            sustain_db: -2.0,
            release_ms: 400.0,
        }
    }
}

/// Block-level amplitude vibrato.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VibratoParams {
    /// Modulation rate in Hz.
    pub rate_hz: f64,
    /// Modulation depth (unitless, around 0.02).
    pub depth: f64,
    /// Fixed block length in ms; a trailing partial block passes through.
    pub block_ms: f64,
    /// Clamp on the per-block gain delta, in dB.
    pub max_delta_db: f64,
}

impl Default for VibratoParams {
    fn default() -> Self {
        VibratoParams {
            rate_hz: 4.0,
            depth: 0.02,
            block_ms: 50.0,
            max_delta_db: 2.0,
        }
    }
}

/// Breath-noise texture layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreathParams {
    /// Nominal breath intensity in [0, 1].
    pub intensity: f64,
    /// Base attenuation of the raw noise, in dB.
    pub base_attenuation_db: f64,
    /// Further attenuation of the breath layer, in dB.
    pub layer_attenuation_db: f64,
    /// RNG seed for the noise source, fixed for reproducible output.
    pub noise_seed: u64,
    /// Shape the noise with the onset/middle/tail breath envelope
    /// instead of overlaying it flat. Off by default: the flat overlay
    /// is the reference bank sound.
    pub apply_envelope: bool,
}

impl Default for BreathParams {
    fn default() -> Self {
        BreathParams {
            intensity: 0.04,
            base_attenuation_db: -42.0,
            layer_attenuation_db: -15.0,
            noise_seed: 0x0F1E_2D3C,
            apply_envelope: false,
        }
    }
}

/// Whole-buffer soft limiter settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LimiterParams {
    /// Loudness threshold in dBFS.
    pub threshold_db: f64,
    /// Compression ratio in [0, 1]; 1 means no reduction.
    pub ratio: f64,
}

/// One delayed reverb reflection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReverbTap {
    /// Delay before the reflection starts, in ms.
    pub delay_ms: f64,
    /// Decay factor in [0, 1]; feeds the attenuation formula
    /// `28 + 8 * (1 - decay)` dB.
    pub decay: f64,
}

/// Reverb diffusion settings: taps are applied in listed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReverbParams {
    pub taps: Vec<ReverbTap>,
}

impl Default for ReverbParams {
    fn default() -> Self {
        ReverbParams {
            taps: vec![
                ReverbTap {
                    delay_ms: 60.0,
                    decay: 0.25,
                },
                ReverbTap {
                    delay_ms: 120.0,
                    decay: 0.15,
                },
                ReverbTap {
                    delay_ms: 200.0,
                    decay: 0.08,
                },
            ],
        }
    }
}

/// Full tuning of the bank pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankConfig {
    /// Rendered note length in ms (before the reverb tail).
    pub duration_ms: f64,
    pub tone: ToneParams,
    pub envelope: EnvelopeParams,
    pub vibrato: VibratoParams,
    pub breath: BreathParams,
    /// First limiter pass, applied before the reverb.
    pub limiter: LimiterParams,
    /// Final safety pass, applied after the reverb.
    pub safety_limiter: LimiterParams,
    pub reverb: ReverbParams,
}

impl Default for BankConfig {
    fn default() -> Self {
        BankConfig {
            duration_ms: 2500.0,
            tone: ToneParams::default(),
            envelope: EnvelopeParams::default(),
            vibrato: VibratoParams::default(),
            breath: BreathParams::default(),
            limiter: LimiterParams {
                threshold_db: -8.0,
                ratio: 0.6,
            },
            safety_limiter: LimiterParams {
                threshold_db: -10.0,
                ratio: 0.5,
            },
            reverb: ReverbParams::default(),
        }
    }
}

impl BankConfig {
    /// Check every value against its numeric domain.
    ///
    /// Rendering with an unvalidated config is still safe per note (the
    /// stages re-check their own parameters), but validating up front
    /// turns a bad tuning into one clear fatal error instead of 21
    /// identical per-note failures.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(
            field: &'static str,
            value: f64,
            ok: bool,
            reason: &'static str,
        ) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue {
                    field,
                    value,
                    reason,
                })
            }
        }

        check(
            "duration_ms",
            self.duration_ms,
            self.duration_ms > 0.0 && self.duration_ms.is_finite(),
            "must be a positive finite duration",
        )?;
        check(
            "envelope.attack_ms",
            self.envelope.attack_ms,
            self.envelope.attack_ms >= 0.0,
            "must be non-negative",
        )?;
        check(
            "envelope.decay_ms",
            self.envelope.decay_ms,
            self.envelope.decay_ms >= 0.0,
            "must be non-negative",
        )?;
        check(
            "envelope.release_ms",
            self.envelope.release_ms,
            self.envelope.release_ms >= 0.0,
            "must be non-negative",
        )?;
        check(
            "vibrato.rate_hz",
            self.vibrato.rate_hz,
            self.vibrato.rate_hz >= 0.0 && self.vibrato.rate_hz.is_finite(),
            "must be non-negative",
        )?;
        check(
            "vibrato.depth",
            self.vibrato.depth,
            (0.0..1.0).contains(&self.vibrato.depth),
            "must be in [0, 1)",
        )?;
        check(
            "vibrato.block_ms",
            self.vibrato.block_ms,
            self.vibrato.block_ms > 0.0,
            "must be positive",
        )?;
        check(
            "breath.intensity",
            self.breath.intensity,
            (0.0..=1.0).contains(&self.breath.intensity),
            "must be in [0, 1]",
        )?;
        for (field, limiter) in [
            ("limiter.ratio", &self.limiter),
            ("safety_limiter.ratio", &self.safety_limiter),
        ] {
            check(
                field,
                limiter.ratio,
                (0.0..=1.0).contains(&limiter.ratio),
                "must be in [0, 1]",
            )?;
        }
        for (field, limiter) in [
            ("limiter.threshold_db", &self.limiter),
            ("safety_limiter.threshold_db", &self.safety_limiter),
        ] {
            check(
                field,
                limiter.threshold_db,
                limiter.threshold_db.is_finite(),
                "must be finite",
            )?;
        }
        for tap in &self.reverb.taps {
            check(
                "reverb.taps.delay_ms",
                tap.delay_ms,
                tap.delay_ms > 0.0,
                "must be positive",
            )?;
            check(
                "reverb.taps.decay",
                tap.decay,
                (0.0..=1.0).contains(&tap.decay),
                "must be in [0, 1]",
            )?;
        }
        Ok(())
    }
}
