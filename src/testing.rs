//! Test doubles shared by the unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use nih_plug::params::internals::ParamPtr;
use nih_plug::prelude::*;
use nih_plug::wrapper::state::PluginState;

/// One call a [`ParamSetter`] made into the host, keyed by parameter name.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Begin(String),
    Set(String, f32),
    End(String),
}

impl HostCall {
    pub fn begin(name: &str) -> Self {
        Self::Begin(name.to_string())
    }

    pub fn set(name: &str, normalized: f32) -> Self {
        Self::Set(name.to_string(), normalized)
    }

    pub fn end(name: &str) -> Self {
        Self::End(name.to_string())
    }
}

/// A host stand-in that only writes down what it was asked to do. It never
/// changes the parameters themselves.
#[derive(Default)]
pub struct RecordingContext {
    calls: Mutex<Vec<HostCall>>,
}

impl RecordingContext {
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn record(&self, call: HostCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl GuiContext for RecordingContext {
    fn plugin_api(&self) -> PluginApi {
        PluginApi::Clap
    }

    fn request_resize(&self) -> bool {
        false
    }

    unsafe fn raw_begin_set_parameter(&self, param: ParamPtr) {
        self.record(HostCall::begin(param.name()));
    }

    unsafe fn raw_set_parameter_normalized(&self, param: ParamPtr, normalized: f32) {
        self.record(HostCall::set(param.name(), normalized));
    }

    unsafe fn raw_end_set_parameter(&self, param: ParamPtr) {
        self.record(HostCall::end(param.name()));
    }

    fn get_state(&self) -> PluginState {
        PluginState {
            version: String::new(),
            params: BTreeMap::new(),
            fields: BTreeMap::new(),
        }
    }

    fn set_state(&self, _state: PluginState) {}
}
