//! Soft limiter - whole-buffer gain reduction above a loudness threshold.
//!
//! This is block-level headroom management, not a sample-accurate peak
//! limiter: when the buffer's RMS loudness exceeds the threshold, the
//! whole buffer is pulled down by `excess * (1 - ratio)` dB, with one
//! extra flat dB if the result still sits more than 1 dB over. Below the
//! threshold the signal passes through untouched.

use crate::config::LimiterParams;
use crate::dsp::buffer::SampleBuffer;
use crate::error::RenderError;

/// Safety margin above the threshold that triggers the extra step, in dB.
const SAFETY_MARGIN_DB: f64 = 1.0;

/// Attenuates buffers whose loudness exceeds a dBFS threshold.
#[derive(Debug, Clone)]
pub struct SoftLimiter {
    params: LimiterParams,
}

impl SoftLimiter {
    pub fn new(params: LimiterParams) -> Self {
        Self { params }
    }

    pub fn limit(&self, mut buffer: SampleBuffer) -> Result<SampleBuffer, RenderError> {
        let p = self.params;
        if !(0.0..=1.0).contains(&p.ratio) {
            return Err(RenderError::InvalidParameter {
                stage: "limiter",
                name: "ratio",
                value: p.ratio,
            });
        }
        if !p.threshold_db.is_finite() {
            return Err(RenderError::InvalidParameter {
                stage: "limiter",
                name: "threshold_db",
                value: p.threshold_db,
            });
        }

        let loudness = buffer.dbfs();
        if loudness <= p.threshold_db {
            return Ok(buffer);
        }

        let excess = loudness - p.threshold_db;
        let compression = excess * (1.0 - p.ratio);
        buffer.apply_gain_db(-compression);

        if buffer.dbfs() > p.threshold_db + SAFETY_MARGIN_DB {
            buffer.apply_gain_db(-1.0);
        }

        Ok(buffer)
    }
}
