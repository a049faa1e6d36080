//! # One-Pole Damping Filter
//!
//! The lowpass that sits inside every comb filter's feedback path. It is
//! what makes a reverb tail get darker as it decays: each trip around the
//! comb loop passes through this filter once more.
//!
//! ```text
//! y[n] = (1 - a) * x[n] + a * y[n-1]
//! ```
//!
//! Here the coefficient `a` *is* the damping amount, set directly rather
//! than derived from a cutoff in Hz:
//!
//! - `a = 0.0` → no damping, the tail stays bright
//! - `a = 0.4` → the most the reverb ever uses (damping 100%)
//! - `a → 1.0` → output barely moves (heavy damping)

/// Smallest magnitude kept in the filter state. Anything below is flushed
/// to zero so a decaying tail never drifts into denormal territory, where
/// floating point math on most CPUs becomes dramatically slower.
const DENORMAL_THRESHOLD: f32 = 1.0e-15;

/// Flush tiny values to exactly zero.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < DENORMAL_THRESHOLD {
        0.0
    } else {
        x
    }
}

/// A one-pole (6 dB/octave) lowpass with a directly set coefficient.
pub struct OnePoleFilter {
    prev_output: f32,
}

impl OnePoleFilter {
    pub fn new() -> Self {
        Self { prev_output: 0.0 }
    }

    /// Process one sample with the given damping coefficient.
    ///
    /// The coefficient is passed per call because the engine ramps it
    /// sample by sample and shares one value across sixteen combs.
    #[inline]
    pub fn process(&mut self, input: f32, coefficient: f32) -> f32 {
        let output = (1.0 - coefficient) * input + coefficient * self.prev_output;
        self.prev_output = flush_denormal(output);
        self.prev_output
    }

    pub fn reset(&mut self) {
        self.prev_output = 0.0;
    }
}

impl Default for OnePoleFilter {
    fn default() -> Self {
        Self::new()
    }
}
