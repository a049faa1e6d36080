//! # DSP (Digital Signal Processing)
//!
//! The reverb engine and the building blocks it is made of:
//!
//! - **`reverb`**: the engine the plugin talks to. Owns two banks of comb
//!   and allpass filters and maps [`ReverbParameters`] onto them.
//! - **`comb`**: a feedback comb with damping, the source of the echoes.
//! - **`allpass`**: a diffuser that smears those echoes into a wash.
//! - **`delay_line`**: the fixed-length circular buffer both filters use.
//! - **`filter`**: the one-pole lowpass inside each comb's feedback loop.

pub mod allpass;
pub mod comb;
pub mod delay_line;
pub mod filter;
pub mod reverb;

pub use reverb::{Reverb, ReverbParameters};
