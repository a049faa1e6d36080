//! # Damped Comb Filter
//!
//! A feedback comb is a delay line whose output is fed back into its own
//! input. An impulse goes in once and comes out again every `len` samples,
//! a little quieter each time. Eight of these in parallel, with mutually
//! prime-ish lengths, build the dense echo pattern of a room.
//!
//! ```text
//! input ──►(+)──► [delay line] ──┬──► output
//!           ▲                    │
//!           └── × feedback ◄── [lowpass] ◄┘
//! ```

use std::num::NonZeroUsize;

use super::delay_line::DelayLine;
use super::filter::{flush_denormal, OnePoleFilter};

pub struct CombFilter {
    delay: DelayLine,
    damping: OnePoleFilter,
}

impl CombFilter {
    pub fn new(len: NonZeroUsize) -> Self {
        Self {
            delay: DelayLine::new(len),
            damping: OnePoleFilter::new(),
        }
    }

    pub fn resize(&mut self, len: NonZeroUsize) {
        self.delay.resize(len);
        self.damping.reset();
    }

    /// Process one sample.
    ///
    /// * `damp` - damping coefficient, 0.0 (bright) to 1.0 (dark)
    /// * `feedback` - loop gain; must stay below 1.0 unless the reverb is
    ///   frozen, where exactly 1.0 sustains the tail forever
    #[inline]
    pub fn process(&mut self, input: f32, damp: f32, feedback: f32) -> f32 {
        let output = self.delay.front();
        let filtered = self.damping.process(output, damp);
        self.delay.push(flush_denormal(input + filtered * feedback));
        output
    }

    pub fn len(&self) -> usize {
        self.delay.len()
    }

    pub fn clear(&mut self) {
        self.delay.clear();
        self.damping.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comb(n: usize) -> CombFilter {
        CombFilter::new(NonZeroUsize::new(n).unwrap())
    }

    /// The first echo of an impulse appears exactly one delay later.
    #[test]
    fn test_first_echo_after_one_period() {
        let mut c = comb(50);

        let first = c.process(1.0, 0.0, 0.5);
        assert_eq!(first, 0.0, "Output starts from an empty delay line");

        for _ in 0..49 {
            assert!(c.process(0.0, 0.0, 0.5).abs() < 1e-6);
        }

        let echo = c.process(0.0, 0.0, 0.5);
        assert!((echo - 1.0).abs() < 1e-6, "Expected the impulse, got {echo}");
    }

    /// Each recirculation is scaled by the feedback amount.
    #[test]
    fn test_feedback_decay() {
        let mut c = comb(10);
        c.process(1.0, 0.0, 0.5);

        let mut echoes = Vec::new();
        for i in 1..=30 {
            let out = c.process(0.0, 0.0, 0.5);
            if i % 10 == 0 {
                echoes.push(out);
            }
        }

        assert!((echoes[0] - 1.0).abs() < 1e-6, "got {}", echoes[0]);
        assert!((echoes[1] - 0.5).abs() < 1e-6, "got {}", echoes[1]);
        assert!((echoes[2] - 0.25).abs() < 1e-6, "got {}", echoes[2]);
    }

    /// With unity feedback and no damping the loop neither grows nor decays.
    #[test]
    fn test_unity_feedback_sustains() {
        let mut c = comb(8);
        c.process(1.0, 0.0, 1.0);

        let mut last_echo = 0.0;
        for i in 1..=800 {
            let out = c.process(0.0, 0.0, 1.0);
            if i % 8 == 0 {
                last_echo = out;
            }
        }

        assert!((last_echo - 1.0).abs() < 1e-4, "Expected sustained echo, got {last_echo}");
    }

    #[test]
    fn test_clear_silences() {
        let mut c = comb(4);
        for _ in 0..4 {
            c.process(1.0, 0.2, 0.8);
        }
        c.clear();

        for _ in 0..8 {
            assert!(c.process(0.0, 0.2, 0.8).abs() < 1e-6);
        }
    }
}
