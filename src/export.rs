//! WAV export - writes a finished buffer as 16-bit mono PCM.

use std::path::Path;

use crate::dsp::buffer::{SAMPLE_RATE, SampleBuffer};

/// Convert an f64 sample in [-1, 1] to i16 PCM, clamping out-of-range
/// values instead of wrapping.
#[inline]
fn to_i16(sample: f64) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped >= 0.0 {
        (clamped * i16::MAX as f64) as i16
    } else {
        (-clamped * i16::MIN as f64) as i16
    }
}

/// Write `buffer` to `path` as a 44.1 kHz mono 16-bit WAV file.
pub fn write_wav(path: &Path, buffer: &SampleBuffer) -> Result<(), hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in buffer.samples() {
        writer.write_sample(to_i16(sample))?;
    }
    writer.finalize()
}
