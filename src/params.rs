//! # Plugin Parameters
//!
//! Five host-visible parameters. The four dials share one shape: a plain
//! range of 0 to 100 (shown as a percentage), 0.01 steps, defaulting to the
//! middle. Freeze is a plain on/off switch.
//!
//! The IDs (`#[id = "..."]`) are what hosts store in sessions and presets.
//! Never change them once published.
//!
//! Values are read once per audio block and handed to the reverb engine,
//! which ramps its internal gains itself, so none of these
//! parameters carries a smoother.

use std::sync::Arc;

use nih_plug::prelude::*;
use nih_plug_egui::EguiState;

use crate::dsp::ReverbParameters;
use crate::editor;

pub const SIZE_ID: &str = "size";
pub const DAMP_ID: &str = "damp";
pub const WIDTH_ID: &str = "width";
pub const MIX_ID: &str = "mix";
pub const FREEZE_ID: &str = "freeze";

/// The IDs of the four percentage dials, in display order.
pub const PERCENT_IDS: [&str; 4] = [SIZE_ID, DAMP_ID, WIDTH_ID, MIX_ID];

pub const PERCENT_MIN: f32 = 0.0;
pub const PERCENT_MAX: f32 = 100.0;
const PERCENT_DEFAULT: f32 = 50.0;

#[derive(Params)]
pub struct ReverbParams {
    /// Window size, saved with the session so the editor reopens at the
    /// same scale.
    #[persist = "editor-state"]
    pub editor_state: Arc<EguiState>,

    /// **Size**: room size. Larger rooms ring longer.
    #[id = "size"]
    pub size: FloatParam,

    /// **Damp**: how quickly high frequencies die away in the tail.
    #[id = "damp"]
    pub damp: FloatParam,

    /// **Width**: stereo spread of the wet signal. 0% is mono.
    #[id = "width"]
    pub width: FloatParam,

    /// **Mix**: dry/wet balance. 0% is fully dry, 100% fully wet.
    #[id = "mix"]
    pub mix: FloatParam,

    /// **Freeze**: hold the current tail forever and ignore new input.
    #[id = "freeze"]
    pub freeze: BoolParam,
}

impl ReverbParams {
    /// Snapshot the current values in the engine's units.
    pub fn reverb_parameters(&self) -> ReverbParameters {
        ReverbParameters::from_percentages(
            self.size.value(),
            self.damp.value(),
            self.width.value(),
            self.mix.value(),
            self.freeze.value(),
        )
    }
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            editor_state: editor::default_state(),
            size: percent_param("Size"),
            damp: percent_param("Damp"),
            width: percent_param("Width"),
            mix: percent_param("Mix"),
            freeze: BoolParam::new("Freeze", false),
        }
    }
}

fn percent_param(name: &str) -> FloatParam {
    FloatParam::new(
        name,
        PERCENT_DEFAULT,
        FloatRange::Linear {
            min: PERCENT_MIN,
            max: PERCENT_MAX,
        },
    )
    .with_step_size(0.01)
    .with_value_to_string(v2s_percent())
    .with_string_to_value(s2v_percent())
}

/// Format a 0–100 value with precision that shrinks as the number grows,
/// so the readout stays about four characters wide: `5.25 %`, `42.5 %`,
/// `100 %`.
pub fn format_percent(value: f32) -> String {
    if value < 10.0 {
        format!("{value:.2} %")
    } else if value < 100.0 {
        format!("{value:.1} %")
    } else {
        format!("{value:.0} %")
    }
}

/// Parse user input like `42`, `42.5%` or ` 42.5 % `.
pub fn parse_percent(text: &str) -> Option<f32> {
    text.trim()
        .trim_end_matches('%')
        .trim_end()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
}

fn v2s_percent() -> Arc<dyn Fn(f32) -> String + Send + Sync> {
    Arc::new(format_percent)
}

fn s2v_percent() -> Arc<dyn Fn(&str) -> Option<f32> + Send + Sync> {
    Arc::new(parse_percent)
}
