use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::scale::Octave;

/// Fatal setup problems: the run cannot start or continue at all.
#[derive(Debug)]
pub enum ConfigError {
    /// A tuning value is outside its numeric domain.
    InvalidValue {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
    /// The output directory could not be created or written.
    OutputDir { path: PathBuf, source: io::Error },
}

/// Per-note computation failures: one note fails fast, siblings continue.
#[derive(Debug)]
pub enum RenderError {
    NonPositiveFrequency(f64),
    NonPositiveDuration(f64),
    /// A stage parameter left its valid numeric domain.
    InvalidParameter {
        stage: &'static str,
        name: &'static str,
        value: f64,
    },
}

/// Anything that can go wrong while producing the bank.
#[derive(Debug)]
pub enum BankError {
    Config(ConfigError),
    Render(RenderError),
    /// The encoded file could not be written, after one retry.
    Export { path: PathBuf, source: hound::Error },
}

/// One failed note, recorded so the remaining notes still render.
#[derive(Debug)]
pub struct NoteFailure {
    pub octave: Octave,
    pub degree: u8,
    pub error: BankError,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue {
                field,
                value,
                reason,
            } => {
                write!(f, "invalid config value {field} = {value}: {reason}")
            }
            ConfigError::OutputDir { path, source } => {
                write!(
                    f,
                    "cannot prepare output directory {}: {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::OutputDir { source, .. } => Some(source),
            ConfigError::InvalidValue { .. } => None,
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NonPositiveFrequency(hz) => {
                write!(f, "frequency must be positive, got {hz} Hz")
            }
            RenderError::NonPositiveDuration(ms) => {
                write!(f, "duration must be positive, got {ms} ms")
            }
            RenderError::InvalidParameter { stage, name, value } => {
                write!(f, "{stage}: parameter {name} = {value} is out of range")
            }
        }
    }
}

impl std::error::Error for RenderError {}

impl fmt::Display for BankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankError::Config(e) => write!(f, "configuration error: {e}"),
            BankError::Render(e) => write!(f, "render error: {e}"),
            BankError::Export { path, source } => {
                write!(f, "failed to write {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for BankError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BankError::Config(e) => Some(e),
            BankError::Render(e) => Some(e),
            BankError::Export { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for BankError {
    fn from(e: ConfigError) -> Self {
        BankError::Config(e)
    }
}

impl From<RenderError> for BankError {
    fn from(e: RenderError) -> Self {
        BankError::Render(e)
    }
}

impl fmt::Display for NoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}: {}", self.octave, self.degree, self.error)
    }
}
