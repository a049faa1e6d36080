//! # Reverb Engine
//!
//! A Freeverb-style stereo reverb: eight damped comb filters in parallel
//! per channel, followed by four allpass diffusers in series. The right
//! channel's filters are slightly longer than the left's (the "stereo
//! spread"), which decorrelates the two tails and gives the width control
//! something to work with.
//!
//! ```text
//!             ┌► comb ×8 (parallel) ─► allpass ×4 (series) ─► wetL ─┐
//! (L+R)·gain ─┤                                                     ├─► width matrix ─► + dry
//!             └► comb ×8 (+23 smp) ─► allpass ×4 (+23 smp) ─► wetR ─┘
//! ```
//!
//! The plugin glue treats this module as a black box: it only calls
//! [`Reverb::set_sample_rate`], [`Reverb::set_parameters`],
//! [`Reverb::reset`], [`Reverb::process_mono`] and
//! [`Reverb::process_stereo`].

use std::num::NonZeroUsize;

use nih_plug::prelude::{Smoother, SmoothingStyle};

use super::allpass::AllpassFilter;
use super::comb::CombFilter;

const NUM_COMBS: usize = 8;
const NUM_ALLPASSES: usize = 4;
const NUM_CHANNELS: usize = 2;

/// Filter lengths in samples at the reference rate of 44.1 kHz.
const COMB_TUNINGS: [usize; NUM_COMBS] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];
const ALLPASS_TUNINGS: [usize; NUM_ALLPASSES] = [556, 441, 341, 225];
const TUNING_SAMPLE_RATE: f32 = 44100.0;
const STEREO_SPREAD: usize = 23;

const WET_SCALE: f32 = 3.0;
const DRY_SCALE: f32 = 2.0;
const ROOM_SCALE: f32 = 0.28;
const ROOM_OFFSET: f32 = 0.7;
const DAMP_SCALE: f32 = 0.4;
const INPUT_GAIN: f32 = 0.015;
const SMOOTHING_MS: f32 = 10.0;

/// The engine's parameter block. All levels are linear, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParameters {
    /// Room size. Larger rooms have longer tails.
    pub room_size: f32,
    /// High-frequency absorption of the room.
    pub damping: f32,
    /// Stereo width of the wet signal. 0 collapses it to mono.
    pub width: f32,
    pub wet_level: f32,
    pub dry_level: f32,
    /// Sustain the current tail indefinitely and stop feeding new input.
    pub freeze: bool,
}

impl ReverbParameters {
    /// Map the plugin's percentage controls (0–100) to engine levels.
    ///
    /// `mix` becomes a linear crossfade: wet = mix, dry = 1 - mix.
    pub fn from_percentages(size: f32, damp: f32, width: f32, mix: f32, freeze: bool) -> Self {
        let unit = |percent: f32| (percent * 0.01).clamp(0.0, 1.0);
        let mix = unit(mix);

        Self {
            room_size: unit(size),
            damping: unit(damp),
            width: unit(width),
            wet_level: mix,
            dry_level: 1.0 - mix,
            freeze,
        }
    }
}

impl Default for ReverbParameters {
    fn default() -> Self {
        Self {
            room_size: 0.5,
            damping: 0.5,
            width: 1.0,
            wet_level: 0.33,
            dry_level: 0.4,
            freeze: false,
        }
    }
}

/// The per-sample coefficients a parameter block turns into.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Coefficients {
    damping: f32,
    feedback: f32,
    dry_gain: f32,
    /// Gain of each channel's own wet signal.
    wet_gain_1: f32,
    /// Gain of the opposite channel's wet signal.
    wet_gain_2: f32,
}

impl Coefficients {
    fn for_parameters(parameters: &ReverbParameters) -> Self {
        // The width matrix: at full width each side only hears its own
        // tail (wet_gain_2 = 0), at zero width both sides hear the same
        // sum of the two tails (wet_gain_1 = wet_gain_2).
        let wet = parameters.wet_level * WET_SCALE;
        let wet_gain_1 = 0.5 * wet * (1.0 + parameters.width);
        let wet_gain_2 = 0.5 * wet * (1.0 - parameters.width);

        // Freezing turns every comb into a lossless loop: nothing is
        // absorbed (no damping) and nothing decays (feedback of exactly 1).
        let (damping, feedback) = if parameters.freeze {
            (0.0, 1.0)
        } else {
            (
                parameters.damping * DAMP_SCALE,
                parameters.room_size * ROOM_SCALE + ROOM_OFFSET,
            )
        };

        Self {
            damping,
            feedback,
            dry_gain: parameters.dry_level * DRY_SCALE,
            wet_gain_1,
            wet_gain_2,
        }
    }
}

pub struct Reverb {
    parameters: ReverbParameters,
    sample_rate: f32,
    input_gain: f32,
    combs: [[CombFilter; NUM_COMBS]; NUM_CHANNELS],
    allpasses: [[AllpassFilter; NUM_ALLPASSES]; NUM_CHANNELS],
    damping: Smoother<f32>,
    feedback: Smoother<f32>,
    dry_gain: Smoother<f32>,
    wet_gain_1: Smoother<f32>,
    wet_gain_2: Smoother<f32>,
}

impl Reverb {
    /// Create an engine tuned for 44.1 kHz with default parameters.
    pub fn new() -> Self {
        let combs = std::array::from_fn(|channel| {
            std::array::from_fn(|i| {
                CombFilter::new(scaled_len(COMB_TUNINGS[i], channel, TUNING_SAMPLE_RATE))
            })
        });
        let allpasses = std::array::from_fn(|channel| {
            std::array::from_fn(|i| {
                AllpassFilter::new(scaled_len(ALLPASS_TUNINGS[i], channel, TUNING_SAMPLE_RATE))
            })
        });
        let smoother = || Smoother::new(SmoothingStyle::Linear(SMOOTHING_MS));

        let mut reverb = Self {
            parameters: ReverbParameters::default(),
            sample_rate: TUNING_SAMPLE_RATE,
            input_gain: INPUT_GAIN,
            combs,
            allpasses,
            damping: smoother(),
            feedback: smoother(),
            dry_gain: smoother(),
            wet_gain_1: smoother(),
            wet_gain_2: smoother(),
        };
        reverb.snap_smoothers();
        reverb
    }

    /// Resize all filters for `sample_rate` and snap every smoother to its
    /// target. Allocates, so only call this outside the audio callback.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;

        for (channel, (combs, allpasses)) in self
            .combs
            .iter_mut()
            .zip(self.allpasses.iter_mut())
            .enumerate()
        {
            for (comb, tuning) in combs.iter_mut().zip(COMB_TUNINGS) {
                comb.resize(scaled_len(tuning, channel, sample_rate));
            }
            for (allpass, tuning) in allpasses.iter_mut().zip(ALLPASS_TUNINGS) {
                allpass.resize(scaled_len(tuning, channel, sample_rate));
            }
        }

        self.snap_smoothers();
    }

    /// Take a new parameter block. The gains and filter coefficients glide
    /// to their new values over the next 10 ms instead of jumping, since
    /// the host only hands us new values once per block and a sudden step
    /// in a gain is an audible click.
    pub fn set_parameters(&mut self, parameters: ReverbParameters) {
        let target = Coefficients::for_parameters(&parameters);
        for (smoother, value) in self.smoothers(&target) {
            smoother.set_target(self.sample_rate, value);
        }

        // Not smoothed: while frozen, any input leaking into the loop would
        // pile up forever, so it is cut off immediately.
        self.input_gain = if parameters.freeze { 0.0 } else { INPUT_GAIN };
        self.parameters = parameters;
    }

    pub fn parameters(&self) -> &ReverbParameters {
        &self.parameters
    }

    /// Silence every filter. Keeps buffer sizes.
    pub fn reset(&mut self) {
        for comb in self.combs.iter_mut().flatten() {
            comb.clear();
        }
        for allpass in self.allpasses.iter_mut().flatten() {
            allpass.clear();
        }
    }

    /// Process a single channel in place using the left filter bank.
    pub fn process_mono(&mut self, samples: &mut [f32]) {
        let [combs, _] = &mut self.combs;
        let [allpasses, _] = &mut self.allpasses;

        for sample in samples.iter_mut() {
            let input = *sample * self.input_gain;
            let damp = self.damping.next();
            let feedback = self.feedback.next();

            let mut output = 0.0;
            for comb in combs.iter_mut() {
                output += comb.process(input, damp, feedback);
            }
            for allpass in allpasses.iter_mut() {
                output = allpass.process(output);
            }

            // Mono has no opposite channel, so the cross term of the width
            // matrix still has to tick but is not used.
            let dry = self.dry_gain.next();
            let wet_1 = self.wet_gain_1.next();
            self.wet_gain_2.next();
            *sample = output * wet_1 + *sample * dry;
        }
    }

    /// Process a stereo pair in place. Both channels feed one summed input;
    /// the width matrix then cross-mixes the two wet outputs.
    pub fn process_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        let [combs_l, combs_r] = &mut self.combs;
        let [allpasses_l, allpasses_r] = &mut self.allpasses;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            // Step 1: one shared input. The left/right difference comes
            // entirely from the spread between the two filter banks.
            let input = (*l + *r) * self.input_gain;
            let damp = self.damping.next();
            let feedback = self.feedback.next();

            // Step 2: the parallel combs build up the echo density.
            let mut out_l = 0.0;
            let mut out_r = 0.0;
            for (comb_l, comb_r) in combs_l.iter_mut().zip(combs_r.iter_mut()) {
                out_l += comb_l.process(input, damp, feedback);
                out_r += comb_r.process(input, damp, feedback);
            }

            // Step 3: the allpasses in series smear those echoes without
            // changing the overall frequency balance.
            for (allpass_l, allpass_r) in allpasses_l.iter_mut().zip(allpasses_r.iter_mut()) {
                out_l = allpass_l.process(out_l);
                out_r = allpass_r.process(out_r);
            }

            // Step 4: width matrix plus dry signal.
            let dry = self.dry_gain.next();
            let wet_1 = self.wet_gain_1.next();
            let wet_2 = self.wet_gain_2.next();
            *l = out_l * wet_1 + out_r * wet_2 + *l * dry;
            *r = out_r * wet_1 + out_l * wet_2 + *r * dry;
        }
    }

    /// How many samples the tail takes to fall by 60 dB, or `None` while
    /// frozen (the tail never ends).
    ///
    /// Each pass around a comb multiplies the signal by the feedback, so
    /// after `n` passes the level is `feedback^n`. Solving
    /// `feedback^n = 0.001` and multiplying by the longest comb length
    /// gives the decay time.
    pub fn tail_samples(&self) -> Option<u32> {
        if self.parameters.freeze {
            return None;
        }

        // Use where the feedback is heading, not where the smoother is
        // right now: that is the decay the host will actually hear.
        let feedback = Coefficients::for_parameters(&self.parameters).feedback;
        let longest_comb = self.combs[1].iter().map(CombFilter::len).max().unwrap_or(0);
        if feedback <= 0.001 {
            return Some(longest_comb as u32);
        }

        let passes = -3.0 / feedback.log10(); // log10(0.001) = -3
        Some((passes * longest_comb as f32) as u32)
    }

    fn smoothers(&self, target: &Coefficients) -> [(&Smoother<f32>, f32); 5] {
        [
            (&self.damping, target.damping),
            (&self.feedback, target.feedback),
            (&self.dry_gain, target.dry_gain),
            (&self.wet_gain_1, target.wet_gain_1),
            (&self.wet_gain_2, target.wet_gain_2),
        ]
    }

    /// Jump straight to the current parameters' coefficients.
    fn snap_smoothers(&self) {
        let target = Coefficients::for_parameters(&self.parameters);
        for (smoother, value) in self.smoothers(&target) {
            smoother.reset(value);
        }
    }
}

impl Default for Reverb {
    fn default() -> Self {
        Self::new()
    }
}

/// Filter length for `channel` at `sample_rate`, in whole samples.
fn scaled_len(tuning: usize, channel: usize, sample_rate: f32) -> NonZeroUsize {
    let tuning = (tuning + channel * STEREO_SPREAD) as f32;
    let len = (tuning * sample_rate / TUNING_SAMPLE_RATE) as usize;
    NonZeroUsize::new(len).unwrap_or(NonZeroUsize::MIN)
}
