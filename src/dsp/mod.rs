//! DSP pipeline - deterministic offline synthesis of flute notes.
//!
//! Data flows strictly downstream through owned buffers: raw tone,
//! envelope, vibrato, breath, limiter, reverb, final limiter. Each stage
//! is a pure function of its input and the bank tuning; no stage reads
//! sibling notes, so the 21 bank renders are fully independent.

pub mod breath;
pub mod buffer;
pub mod envelope;
pub mod limiter;
pub mod renderer;
pub mod reverb;
pub mod stage;
pub mod tone;
pub mod vibrato;

pub use buffer::{SAMPLE_RATE, SampleBuffer};
pub use renderer::NoteRenderer;
