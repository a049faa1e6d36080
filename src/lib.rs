//! # Simple Reverb: An AU/VST3/CLAP Reverb Plugin
//!
//! A mono/stereo reverb built with [nih-plug](https://github.com/robbert-vdh/nih-plug).
//! Four dials (size, damp, width, mix) and a freeze switch drive a
//! Freeverb-style engine.
//!
//! ## Signal Flow
//!
//! ```text
//!                 once per block
//!  ReverbParams ───────────────────► ReverbParameters ──► Reverb::set_parameters
//!  (size, damp,    reverb_parameters()   (0..1 levels)
//!   width, mix,
//!   freeze)
//!
//!  Input ──► [ 1 channel?  Reverb::process_mono   ] ──► Output (in place)
//!            [ 2 channels? Reverb::process_stereo ]
//! ```
//!
//! The editor and the audio thread never share anything but the
//! parameters, which nih-plug synchronizes for us.

mod dsp;
mod editor;
mod params;
mod state;
#[cfg(test)]
mod testing;

use std::num::NonZeroU32;
use std::sync::Arc;

use dsp::Reverb;
use nih_plug::prelude::*;
use nih_plug::wrapper::state::PluginState;
use params::ReverbParams;

struct SimpleReverb {
    params: Arc<ReverbParams>,
    reverb: Reverb,
}

impl Default for SimpleReverb {
    fn default() -> Self {
        Self {
            params: Arc::new(ReverbParams::default()),
            // Tuned for 44.1 kHz until initialize() tells us the real rate.
            reverb: Reverb::new(),
        }
    }
}

/// Which engine path a buffer went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChannelRouting {
    Mono,
    Stereo,
    /// Left untouched. Carries the channel count for the error report.
    Unsupported(usize),
}

/// Run the engine over `channels` in place.
fn route_channels(reverb: &mut Reverb, channels: &mut [&mut [f32]]) -> ChannelRouting {
    match channels {
        [mono] => {
            reverb.process_mono(mono);
            ChannelRouting::Mono
        }
        [left, right] => {
            reverb.process_stereo(left, right);
            ChannelRouting::Stereo
        }
        other => ChannelRouting::Unsupported(other.len()),
    }
}

impl Plugin for SimpleReverb {
    const NAME: &'static str = "Simple Reverb";
    const VENDOR: &'static str = "Suzuki Kengo";
    const URL: &'static str = "";
    const EMAIL: &'static str = "";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // Input and output channel counts always match. Stereo is listed
    // first so hosts that only try one layout pick it.
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(2),
            main_output_channels: NonZeroU32::new(2),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(1),
            main_output_channels: NonZeroU32::new(1),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
    ];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    fn editor(&mut self, _async_executor: AsyncExecutor<Self>) -> Option<Box<dyn Editor>> {
        editor::create(self.params.clone(), self.params.editor_state.clone())
    }

    fn filter_state(plugin_state: &mut PluginState) {
        state::sanitize(plugin_state);
    }

    /// Resize the engine's filters for the host sample rate. This is the
    /// only place the engine allocates.
    fn initialize(
        &mut self,
        audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let sample_rate = buffer_config.sample_rate;

        // The comb and allpass lengths are tuned in samples at 44.1 kHz.
        // Rescaling them keeps the room the same size in seconds at any
        // host rate. Parameters go in first so the engine starts on them
        // rather than gliding in from its defaults.
        self.reverb.set_parameters(self.params.reverb_parameters());
        self.reverb.set_sample_rate(sample_rate);

        let channels = audio_io_layout
            .main_output_channels
            .map(NonZeroU32::get)
            .unwrap_or(0);
        nih_log!(
            "Initialized at {} Hz, {} channel(s), max block {}",
            sample_rate,
            channels,
            buffer_config.max_buffer_size
        );

        true
    }

    fn reset(&mut self) {
        self.reverb.reset();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        // ─── Copy the parameters once per block ───
        //
        // Unlike a per-sample `.smoothed.next()` loop, the engine takes one
        // parameter block per buffer. It smooths its own gains internally,
        // so reading the values once here is enough to avoid zipper noise,
        // and the engine never sees a parameter change mid-block.
        self.reverb.set_parameters(self.params.reverb_parameters());

        // ─── Route the buffer ───
        //
        // `as_slice()` gives one `&mut [f32]` per channel. The layouts we
        // advertise only allow one or two, so anything else means the host
        // ignored them. In that case the audio passes through untouched
        // and debug builds complain.
        if let ChannelRouting::Unsupported(channels) =
            route_channels(&mut self.reverb, buffer.as_slice())
        {
            nih_debug_assert_failure!("Unsupported channel configuration: {} channels", channels);
        }

        // ─── Report the tail ───
        //
        // After the input goes silent the host keeps calling process() for
        // as many samples as we report here, so the reverb can ring out
        // instead of being cut off.
        //
        // While frozen the combs feed back at exactly 1 and never decay,
        // so there is no finite tail to report. `KeepAlive` asks the host
        // to keep processing for as long as the plugin is active.
        match self.reverb.tail_samples() {
            Some(samples) => ProcessStatus::Tail(samples),
            None => ProcessStatus::KeepAlive,
        }
    }
}

impl ClapPlugin for SimpleReverb {
    const CLAP_ID: &'static str = "com.suzuki-kengo.simple-reverb";
    const CLAP_DESCRIPTION: Option<&'static str> = Some("A simple mono/stereo reverb");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Mono,
        ClapFeature::Reverb,
    ];
}

impl Vst3Plugin for SimpleReverb {
    const VST3_CLASS_ID: [u8; 16] = *b"SimpleReverb_v01";
    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Reverb];
}

nih_export_clap!(SimpleReverb);
nih_export_vst3!(SimpleReverb);

// AUv2 entry point for hosts that only load Audio Units.
clap_wrapper::export_auv2!();

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::ReverbParameters;

    fn reverb_with(mix: f32) -> Reverb {
        let mut reverb = Reverb::new();
        reverb.set_parameters(ReverbParameters::from_percentages(50.0, 50.0, 50.0, mix, false));
        reverb.set_sample_rate(44100.0);
        reverb
    }

    fn impulse(len: usize) -> Vec<f32> {
        let mut buf = vec![0.0; len];
        buf[0] = 1.0;
        buf
    }

    /// One channel goes through the mono path and matches a direct call.
    #[test]
    fn test_mono_buffer_routes_to_mono_path() {
        let mut routed = impulse(2048);
        let mut channels: [&mut [f32]; 1] = [&mut routed];
        let routing = route_channels(&mut reverb_with(100.0), &mut channels);
        assert_eq!(routing, ChannelRouting::Mono);

        let mut direct = impulse(2048);
        reverb_with(100.0).process_mono(&mut direct);
        assert_eq!(routed, direct);
    }

    #[test]
    fn test_stereo_buffer_routes_to_stereo_path() {
        let mut left = impulse(2048);
        let mut right = impulse(2048);
        let mut channels: [&mut [f32]; 2] = [&mut left, &mut right];
        let routing = route_channels(&mut reverb_with(100.0), &mut channels);
        assert_eq!(routing, ChannelRouting::Stereo);

        let mut direct_l = impulse(2048);
        let mut direct_r = impulse(2048);
        reverb_with(100.0).process_stereo(&mut direct_l, &mut direct_r);
        assert_eq!(left, direct_l);
        assert_eq!(right, direct_r);
    }

    /// Anything other than one or two channels passes through untouched.
    #[test]
    fn test_unsupported_layout_is_untouched() {
        let mut a = impulse(16);
        let mut b = impulse(16);
        let mut c = impulse(16);
        let mut channels: [&mut [f32]; 3] = [&mut a, &mut b, &mut c];
        let routing = route_channels(&mut reverb_with(100.0), &mut channels);

        assert_eq!(routing, ChannelRouting::Unsupported(3));
        assert_eq!(a, impulse(16));
        assert_eq!(c, impulse(16));
    }

    #[test]
    fn test_layouts_match_in_and_out() {
        for layout in SimpleReverb::AUDIO_IO_LAYOUTS {
            assert_eq!(layout.main_input_channels, layout.main_output_channels);
        }
        assert_eq!(
            SimpleReverb::AUDIO_IO_LAYOUTS[0].main_output_channels,
            NonZeroU32::new(2),
            "Stereo should be the preferred layout"
        );
    }

    /// The per-block parameter copy is what the engine ends up with.
    #[test]
    fn test_block_parameters_reach_engine() {
        let plugin = SimpleReverb::default();
        let mut reverb = Reverb::new();
        reverb.set_parameters(plugin.params.reverb_parameters());

        let p = reverb.parameters();
        assert!((p.wet_level - 0.5).abs() < 1e-6);
        assert!((p.dry_level - 0.5).abs() < 1e-6);
        assert!(!p.freeze);
    }
}
