//! # Fixed-Length Delay Line
//!
//! Comb and allpass filters both need the same primitive: a circular
//! buffer whose delay is exactly its own length. Every sample we read the
//! oldest stored value (the one written `len` samples ago), then overwrite
//! that slot with the new value and advance.
//!
//! ```text
//!   write_pos ─┐
//!              ▼
//!   [ s4 | s5 | s0 | s1 | s2 | s3 ]      len = 6
//!              ▲
//!              └─ front(): the sample written 6 steps ago
//! ```
//!
//! Unlike a variable-tap delay there is no interpolation and no separate
//! read index: the read and write positions coincide.

use std::num::NonZeroUsize;

/// A circular buffer whose delay equals its length.
///
/// The buffer is allocated in [`new`](Self::new) and [`resize`](Self::resize)
/// only. Both are called from the engine's `set_sample_rate()`, never from
/// the audio callback.
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Create a silent delay line of `len` samples.
    pub fn new(len: NonZeroUsize) -> Self {
        Self {
            buffer: vec![0.0; len.get()],
            write_pos: 0,
        }
    }

    /// Change the delay length. Contents are cleared.
    pub fn resize(&mut self, len: NonZeroUsize) {
        self.buffer.clear();
        self.buffer.resize(len.get(), 0.0);
        self.write_pos = 0;
    }

    /// The sample that was pushed `len()` samples ago.
    #[inline]
    pub fn front(&self) -> f32 {
        self.buffer[self.write_pos]
    }

    /// Overwrite the oldest sample and advance by one.
    #[inline]
    pub fn push(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos += 1;
        if self.write_pos == self.buffer.len() {
            self.write_pos = 0;
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Fill with silence and rewind. Does not reallocate.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
