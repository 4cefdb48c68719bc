//! Bank builder - renders and persists the full 21-note bank.
//!
//! Output layout: `low/`, `mid/`, `high/` under the output root, each
//! holding `1.wav` through `7.wav`. Notes are independent, so one failed
//! note is recorded and the rest keep rendering; only setup problems
//! (bad config, unwritable directories) abort the whole run.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::BankConfig;
use crate::dsp::renderer::NoteRenderer;
use crate::error::{BankError, ConfigError, NoteFailure};
use crate::export;
use crate::scale::Octave;

/// Outcome of a bank run: every written file plus every recorded failure.
#[derive(Debug)]
pub struct BankReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<NoteFailure>,
}

impl BankReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Renders the frequency table and writes one WAV per note.
pub struct BankBuilder {
    config: BankConfig,
    output_root: PathBuf,
}

impl BankBuilder {
    /// Validate the tuning and bind an output root.
    pub fn new(output_root: impl Into<PathBuf>, config: BankConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            output_root: output_root.into(),
        })
    }

    /// Create the three octave directories. Idempotent: existing
    /// directories and their files are left alone.
    pub fn prepare_directories(&self) -> Result<(), ConfigError> {
        for octave in Octave::ALL {
            let path = self.output_root.join(octave.dir_name());
            fs::create_dir_all(&path).map_err(|source| ConfigError::OutputDir {
                path: path.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Render and export the whole bank.
    ///
    /// Returns the report of written files and per-note failures; errors
    /// only on fatal setup problems.
    pub fn generate(&self) -> Result<BankReport, BankError> {
        self.prepare_directories()?;

        let renderer = NoteRenderer::new(&self.config);
        let mut report = BankReport {
            written: Vec::new(),
            failures: Vec::new(),
        };

        for octave in Octave::ALL {
            log::info!("rendering {octave} octave");
            for (degree, hz) in (1u8..).zip(octave.frequencies()) {
                match self.render_and_export(&renderer, octave, degree, hz) {
                    Ok(path) => {
                        log::info!("wrote {}", path.display());
                        report.written.push(path);
                    }
                    Err(error) => {
                        log::warn!("{octave}/{degree} failed: {error}");
                        report.failures.push(NoteFailure {
                            octave,
                            degree,
                            error,
                        });
                    }
                }
            }
        }

        Ok(report)
    }

    fn render_and_export(
        &self,
        renderer: &NoteRenderer,
        octave: Octave,
        degree: u8,
        hz: f64,
    ) -> Result<PathBuf, BankError> {
        let note = renderer.render(hz, octave, degree)?;
        let path = self.note_path(octave, degree);

        // Disk writes are the only non-deterministic step; retry once
        // before recording the failure.
        if let Err(first) = export::write_wav(&path, &note) {
            log::warn!("retrying write of {}: {first}", path.display());
            export::write_wav(&path, &note).map_err(|source| BankError::Export {
                path: path.clone(),
                source,
            })?;
        }
        Ok(path)
    }

    /// Target file for one note: `<root>/<octave>/<degree>.wav`.
    pub fn note_path(&self, octave: Octave, degree: u8) -> PathBuf {
        self.output_root
            .join(octave.dir_name())
            .join(format!("{degree}.wav"))
    }
}

/// Convenience wrapper: generate the default 21-note bank under `root`.
pub fn generate_bank(root: impl AsRef<Path>, config: BankConfig) -> Result<BankReport, BankError> {
    let builder = BankBuilder::new(root.as_ref(), config)?;
    builder.generate()
}
