//! # State Persistence
//!
//! nih-plug already serializes the whole parameter tree for us: when the
//! host saves a session it gets a JSON object keyed by parameter ID, plus
//! every `#[persist]` field (here only `editor-state`). On load, the tree
//! is handed back and each known ID is restored.
//!
//! This module owns the two places where we touch that tree ourselves:
//!
//! - [`sanitize`] runs on every restored state before it is applied and
//!   drops entries we could not safely load.
//! - [`ReverbSnapshot`] is a plain copy of the five values, used by the
//!   editor's undo history.

use nih_plug::prelude::*;
use nih_plug::wrapper::state::{ParamValue, PluginState};

use crate::params::{
    ReverbParams, DAMP_ID, FREEZE_ID, MIX_ID, PERCENT_IDS, PERCENT_MAX, PERCENT_MIN, SIZE_ID,
    WIDTH_ID,
};

/// Clean up a state blob before nih-plug applies it.
///
/// - Percentage entries that are not finite floats are dropped, so the
///   parameter keeps its current value.
/// - Finite percentages outside 0–100 are clamped.
/// - A `freeze` entry that is not a boolean is dropped.
///
/// Unknown IDs are left alone; nih-plug ignores them anyway.
pub fn sanitize(state: &mut PluginState) {
    let known = PERCENT_IDS
        .iter()
        .chain(std::iter::once(&FREEZE_ID))
        .filter(|id| state.params.contains_key(**id))
        .count();
    if known == 0 {
        nih_log!("Restored state contains no reverb parameters, keeping current values");
        return;
    }

    for id in PERCENT_IDS {
        let Some(value) = state.params.get_mut(id) else {
            continue;
        };

        let valid = match value {
            ParamValue::F32(v) if v.is_finite() => {
                *v = v.clamp(PERCENT_MIN, PERCENT_MAX);
                true
            }
            _ => false,
        };
        if !valid {
            nih_log!("Dropping invalid value for '{id}' from restored state");
            state.params.remove(id);
        }
    }

    if let Some(value) = state.params.get(FREEZE_ID) {
        if !matches!(value, ParamValue::Bool(_)) {
            nih_log!("Dropping invalid value for '{FREEZE_ID}' from restored state");
            state.params.remove(FREEZE_ID);
        }
    }
}

/// The five parameter values at one point in time, in plain units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbSnapshot {
    pub size: f32,
    pub damp: f32,
    pub width: f32,
    pub mix: f32,
    pub freeze: bool,
}

impl ReverbSnapshot {
    /// Read the values the user currently sees, ignoring host modulation.
    pub fn capture(params: &ReverbParams) -> Self {
        Self {
            size: params.size.unmodulated_plain_value(),
            damp: params.damp.unmodulated_plain_value(),
            width: params.width.unmodulated_plain_value(),
            mix: params.mix.unmodulated_plain_value(),
            freeze: params.freeze.unmodulated_plain_value(),
        }
    }

    /// Push every value that differs from the live parameters back to the
    /// host, each as a complete begin/set/end gesture.
    pub fn apply(&self, params: &ReverbParams, setter: &ParamSetter) {
        let current = Self::capture(params);

        for (param, target, now) in [
            (&params.size, self.size, current.size),
            (&params.damp, self.damp, current.damp),
            (&params.width, self.width, current.width),
            (&params.mix, self.mix, current.mix),
        ] {
            if target != now {
                setter.begin_set_parameter(param);
                setter.set_parameter(param, target);
                setter.end_set_parameter(param);
            }
        }

        if self.freeze != current.freeze {
            setter.begin_set_parameter(&params.freeze);
            setter.set_parameter(&params.freeze, self.freeze);
            setter.end_set_parameter(&params.freeze);
        }
    }

    /// Value of the dial with the given ID, if it is one of ours.
    pub fn percent(&self, id: &str) -> Option<f32> {
        match id {
            SIZE_ID => Some(self.size),
            DAMP_ID => Some(self.damp),
            WIDTH_ID => Some(self.width),
            MIX_ID => Some(self.mix),
            _ => None,
        }
    }

    /// A copy with one dial replaced. Unknown IDs return the copy as-is.
    pub fn with_percent(mut self, id: &str, value: f32) -> Self {
        match id {
            SIZE_ID => self.size = value,
            DAMP_ID => self.damp = value,
            WIDTH_ID => self.width = value,
            MIX_ID => self.mix = value,
            _ => (),
        }
        self
    }

    pub fn with_freeze(mut self, freeze: bool) -> Self {
        self.freeze = freeze;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::testing::{HostCall, RecordingContext};

    fn state_with(params: Vec<(&str, ParamValue)>) -> PluginState {
        PluginState {
            version: String::from("0.1.0"),
            params: params
                .into_iter()
                .map(|(id, value)| (id.to_string(), value))
                .collect(),
            fields: BTreeMap::new(),
        }
    }

    #[test]
    fn test_sanitize_keeps_valid_state() {
        let mut state = state_with(vec![
            ("size", ParamValue::F32(30.0)),
            ("damp", ParamValue::F32(60.0)),
            ("width", ParamValue::F32(100.0)),
            ("mix", ParamValue::F32(0.0)),
            ("freeze", ParamValue::Bool(true)),
        ]);
        sanitize(&mut state);

        assert_eq!(state.params.len(), 5);
        assert!(matches!(state.params["size"], ParamValue::F32(v) if v == 30.0));
        assert!(matches!(state.params["freeze"], ParamValue::Bool(true)));
    }

    #[test]
    fn test_sanitize_clamps_out_of_range() {
        let mut state = state_with(vec![
            ("size", ParamValue::F32(250.0)),
            ("mix", ParamValue::F32(-3.0)),
        ]);
        sanitize(&mut state);

        assert!(matches!(state.params["size"], ParamValue::F32(v) if v == 100.0));
        assert!(matches!(state.params["mix"], ParamValue::F32(v) if v == 0.0));
    }

    #[test]
    fn test_sanitize_drops_invalid_entries() {
        let mut state = state_with(vec![
            ("size", ParamValue::F32(f32::NAN)),
            ("damp", ParamValue::String(String::from("wet"))),
            ("width", ParamValue::F32(40.0)),
            ("freeze", ParamValue::I32(1)),
        ]);
        sanitize(&mut state);

        assert!(!state.params.contains_key("size"));
        assert!(!state.params.contains_key("damp"));
        assert!(!state.params.contains_key("freeze"));
        assert!(state.params.contains_key("width"));
    }

    #[test]
    fn test_sanitize_ignores_foreign_state() {
        let mut state = state_with(vec![("gain", ParamValue::F32(f32::INFINITY))]);
        sanitize(&mut state);

        assert_eq!(state.params.len(), 1, "Unknown entries are not ours to touch");
    }

    #[test]
    fn test_capture_defaults() {
        let snapshot = ReverbSnapshot::capture(&ReverbParams::default());

        assert_eq!(
            snapshot,
            ReverbSnapshot {
                size: 50.0,
                damp: 50.0,
                width: 50.0,
                mix: 50.0,
                freeze: false,
            }
        );
    }

    #[test]
    fn test_with_percent_replaces_one_dial() {
        let base = ReverbSnapshot::capture(&ReverbParams::default());
        let edited = base.with_percent("width", 12.5);

        assert_eq!(edited.percent("width"), Some(12.5));
        assert_eq!(edited.percent("size"), Some(50.0));
        assert_eq!(base.with_percent("gain", 1.0), base);
        assert_eq!(base.percent("freeze"), None);
        assert!(base.with_freeze(true).freeze);
    }

    /// Undo only touches what changed, and brackets every change.
    #[test]
    fn test_apply_sends_only_changed_parameters() {
        let params = ReverbParams::default();
        let context = RecordingContext::default();
        let setter = ParamSetter::new(&context);

        let target = ReverbSnapshot::capture(&params)
            .with_percent(SIZE_ID, 20.0)
            .with_percent(MIX_ID, 80.0)
            .with_freeze(true);
        target.apply(&params, &setter);

        let calls = context.calls();
        let expected = [
            HostCall::begin("Size"),
            HostCall::set("Size", 0.2),
            HostCall::end("Size"),
            HostCall::begin("Mix"),
            HostCall::set("Mix", 0.8),
            HostCall::end("Mix"),
            HostCall::begin("Freeze"),
            HostCall::set("Freeze", 1.0),
            HostCall::end("Freeze"),
        ];
        assert_eq!(calls.len(), expected.len(), "Unexpected calls: {calls:?}");
        for (call, expected) in calls.iter().zip(&expected) {
            match (call, expected) {
                (HostCall::Set(name, value), HostCall::Set(want, want_value)) => {
                    assert_eq!(name, want);
                    assert!((value - want_value).abs() < 1e-6, "{name}: {value} != {want_value}");
                }
                _ => assert_eq!(call, expected),
            }
        }
    }

    #[test]
    fn test_apply_unchanged_snapshot_is_silent() {
        let params = ReverbParams::default();
        let context = RecordingContext::default();
        let setter = ParamSetter::new(&context);

        ReverbSnapshot::capture(&params).apply(&params, &setter);
        assert!(context.calls().is_empty());
    }
}
