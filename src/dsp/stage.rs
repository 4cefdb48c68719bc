//! Stage trait - the one buffer-transform interface all effects share.
//!
//! The note pipeline is an ordered list of stages folded over a single
//! buffer. Keeping the interface this narrow lets each stage be tested in
//! isolation and the order be rearranged without touching orchestration.

use crate::dsp::breath::BreathTexture;
use crate::dsp::buffer::SampleBuffer;
use crate::dsp::envelope::EnvelopeShaper;
use crate::dsp::limiter::SoftLimiter;
use crate::dsp::reverb::ReverbDiffuser;
use crate::dsp::vibrato::Vibrato;
use crate::error::RenderError;

/// One pipeline step: consume a buffer, return the transformed buffer.
pub trait Stage {
    /// Stable name for logs and error context.
    fn name(&self) -> &'static str;

    fn process(&self, input: SampleBuffer) -> Result<SampleBuffer, RenderError>;
}

impl Stage for EnvelopeShaper {
    fn name(&self) -> &'static str {
        "envelope"
    }

    fn process(&self, input: SampleBuffer) -> Result<SampleBuffer, RenderError> {
        Ok(self.shape(input))
    }
}

impl Stage for Vibrato {
    fn name(&self) -> &'static str {
        "vibrato"
    }

    fn process(&self, input: SampleBuffer) -> Result<SampleBuffer, RenderError> {
        self.modulate(input)
    }
}

impl Stage for BreathTexture {
    fn name(&self) -> &'static str {
        "breath"
    }

    fn process(&self, input: SampleBuffer) -> Result<SampleBuffer, RenderError> {
        self.add_breath(input)
    }
}

impl Stage for SoftLimiter {
    fn name(&self) -> &'static str {
        "limiter"
    }

    fn process(&self, input: SampleBuffer) -> Result<SampleBuffer, RenderError> {
        self.limit(input)
    }
}

impl Stage for ReverbDiffuser {
    fn name(&self) -> &'static str {
        "reverb"
    }

    fn process(&self, input: SampleBuffer) -> Result<SampleBuffer, RenderError> {
        self.diffuse(input)
    }
}

/// An ordered list of stages applied left to right.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Fold the buffer through every stage in order.
    pub fn run(&self, mut buffer: SampleBuffer) -> Result<SampleBuffer, RenderError> {
        for stage in &self.stages {
            buffer = stage.process(buffer)?;
            log::trace!(
                "{}: {:.1} ms, {:.2} dBFS",
                stage.name(),
                buffer.duration_ms(),
                buffer.dbfs()
            );
        }
        Ok(buffer)
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LimiterParams;
    use crate::dsp::buffer::ms_to_samples;

    /// Inverting stage used to observe ordering.
    struct Negate;

    impl Stage for Negate {
        fn name(&self) -> &'static str {
            "negate"
        }

        fn process(&self, mut input: SampleBuffer) -> Result<SampleBuffer, RenderError> {
            for s in input.samples_mut() {
                *s = -*s;
            }
            Ok(input)
        }
    }

    #[test]
    fn empty_pipeline_is_identity() {
        let p = Pipeline::new(vec![]);
        let input = SampleBuffer::from_samples(vec![0.1, -0.2, 0.3]);
        let out = p.run(input.clone()).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn stages_apply_in_listed_order() {
        // Two negations cancel; one does not.
        let once = Pipeline::new(vec![Box::new(Negate)]);
        let twice = Pipeline::new(vec![Box::new(Negate), Box::new(Negate)]);
        let input = SampleBuffer::from_samples(vec![0.25; 100]);

        let a = once.run(input.clone()).unwrap();
        let b = twice.run(input.clone()).unwrap();
        assert_eq!(a.samples()[0], -0.25);
        assert_eq!(b, input);
    }

    #[test]
    fn failing_stage_aborts_the_run() {
        let bad = SoftLimiter::new(LimiterParams {
            threshold_db: -8.0,
            ratio: 2.0,
        });
        let p = Pipeline::new(vec![Box::new(Negate), Box::new(bad)]);
        let input = SampleBuffer::from_samples(vec![0.5; ms_to_samples(100.0)]);
        assert!(p.run(input).is_err());
    }

    #[test]
    fn stage_names_reflect_order() {
        let p = Pipeline::new(vec![
            Box::new(Negate),
            Box::new(SoftLimiter::new(LimiterParams {
                threshold_db: -8.0,
                ratio: 0.6,
            })),
        ]);
        assert_eq!(p.stage_names(), vec!["negate", "limiter"]);
    }
}
