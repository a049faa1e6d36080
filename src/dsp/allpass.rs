//! # Schroeder Allpass Diffuser
//!
//! Passes every frequency at equal gain but smears the phase, turning the
//! comb bank's discrete echoes into a smooth wash. Four of these run in
//! series after the combs.
//!
//! This is the Freeverb approximation with a fixed feedback of 0.5:
//!
//! ```text
//! out    = buffered - input
//! buffer = input + buffered * 0.5
//! ```

use std::num::NonZeroUsize;

use super::delay_line::DelayLine;
use super::filter::flush_denormal;

const FEEDBACK: f32 = 0.5;

pub struct AllpassFilter {
    delay: DelayLine,
}

impl AllpassFilter {
    pub fn new(len: NonZeroUsize) -> Self {
        Self {
            delay: DelayLine::new(len),
        }
    }

    pub fn resize(&mut self, len: NonZeroUsize) {
        self.delay.resize(len);
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let buffered = self.delay.front();
        self.delay.push(flush_denormal(input + buffered * FEEDBACK));
        buffered - input
    }

    pub fn clear(&mut self) {
        self.delay.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allpass(n: usize) -> AllpassFilter {
        AllpassFilter::new(NonZeroUsize::new(n).unwrap())
    }

    /// An impulse comes out inverted immediately, then as the delayed
    /// copy one period later.
    #[test]
    fn test_impulse_response() {
        let mut ap = allpass(3);

        let first = ap.process(1.0);
        assert!((first + 1.0).abs() < 1e-6, "Expected -1.0, got {first}");

        assert!(ap.process(0.0).abs() < 1e-6);
        assert!(ap.process(0.0).abs() < 1e-6);

        let delayed = ap.process(0.0);
        assert!((delayed - 1.0).abs() < 1e-6, "Expected 1.0, got {delayed}");

        ap.process(0.0);
        ap.process(0.0);
        let second = ap.process(0.0);
        assert!((second - 0.5).abs() < 1e-6, "Expected 0.5, got {second}");
    }

    #[test]
    fn test_clear() {
        let mut ap = allpass(2);
        ap.process(1.0);
        ap.clear();

        assert!(ap.process(0.0).abs() < 1e-6);
        assert!(ap.process(0.0).abs() < 1e-6);
    }
}
