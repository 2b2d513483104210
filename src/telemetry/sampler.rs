use anyhow::anyhow;
use uuid::Uuid;

/// Samples a fixed fraction of traces.
///
/// The decision depends only on the trace id: the upper 64 bits of the id are compared against
/// `rate * 2^64`. Every participant seeing the same trace id thus makes the same decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilitySampler {
    rate: f64,
}

impl ProbabilitySampler {
    pub fn new(rate: f64) -> anyhow::Result<Self> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(anyhow!("Sampling rate {} is not within [0, 1]", rate));
        }
        Ok(Self { rate })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn should_sample(&self, trace_id: &Uuid) -> bool {
        if self.rate >= 1.0 {
            return true;
        }
        if self.rate <= 0.0 {
            return false;
        }
        // The lower half of a v4 UUID starts with fixed variant bits, the upper half does not.
        let (upper_bits, _) = trace_id.as_u64_pair();
        let bound = (self.rate * u64::MAX as f64) as u64;
        upper_bits < bound
    }
}
