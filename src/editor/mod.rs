//! # Editor
//!
//! The plugin window: four dials (size, damp, width, mix), a freeze toggle
//! between them, and Cmd/Ctrl+Z / Cmd/Ctrl+Shift+Z undo and redo.
//!
//! Parameter changes never go to the audio thread directly. Each widget
//! hands them to the host through nih-plug's [`ParamSetter`]; the audio
//! thread picks up the new values at the start of its next block.
//!
//! Undo is tracked per gesture. When a control is grabbed we remember the
//! whole parameter set; when it is released we record that snapshot and
//! the new one as a single transaction.
//!
//! The window can be resized from its corner, between 1× and 2× the
//! default size, always keeping the default aspect ratio.

mod history;
mod layout;
mod widgets;

use std::sync::Arc;

use nih_plug::prelude::*;
use nih_plug_egui::egui::{self, vec2, Event};
use nih_plug_egui::resizable_window::ResizableWindow;
use nih_plug_egui::{create_egui_editor, EguiState};

use crate::params::{ReverbParams, PERCENT_IDS};
use crate::state::ReverbSnapshot;
use history::{HistoryCommand, UndoHistory};
use widgets::{Dial, ToggleButton};

pub use layout::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

pub fn default_state() -> Arc<EguiState> {
    EguiState::from_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
}

/// Editor-side state that lives as long as the window is open.
#[derive(Default)]
struct EditorSession {
    history: UndoHistory<ReverbSnapshot>,
    /// Parameter set at the moment the current gesture began.
    gesture_start: Option<ReverbSnapshot>,
}

impl EditorSession {
    fn begin_gesture(&mut self, snapshot: ReverbSnapshot) {
        if self.gesture_start.is_none() {
            self.gesture_start = Some(snapshot);
        }
    }

    fn end_gesture(&mut self, after: ReverbSnapshot) {
        if let Some(before) = self.gesture_start.take() {
            self.history.record(before, after);
        }
    }

    /// Drop a gesture whose release we never saw, e.g. because the mouse
    /// was let go outside the window or the window closed mid-drag.
    /// `dragging` says whether any control is still held.
    fn settle(&mut self, dragging: bool) {
        if !dragging && self.gesture_start.take().is_some() {
            nih_log!("Discarding a gesture that never ended");
        }
    }

    fn run(&mut self, command: HistoryCommand) -> Option<ReverbSnapshot> {
        // A half-finished drag would be recorded against a stale start.
        if self.gesture_start.is_some() {
            return None;
        }

        match command {
            HistoryCommand::Undo if self.history.can_undo() => self.history.undo(),
            HistoryCommand::Redo if self.history.can_redo() => self.history.redo(),
            _ => None,
        }
    }
}

pub fn create(params: Arc<ReverbParams>, editor_state: Arc<EguiState>) -> Option<Box<dyn Editor>> {
    let window_state = editor_state.clone();
    create_egui_editor(
        editor_state,
        EditorSession::default(),
        |egui_ctx, session| {
            let mut visuals = egui::Visuals::dark();
            visuals.panel_fill = widgets::BACKGROUND;
            egui_ctx.set_visuals(visuals);

            // A drag from the last time the window was open can never end.
            session.settle(false);
        },
        move |egui_ctx, setter, session| {
            let commands: Vec<HistoryCommand> = egui_ctx.input(|input| {
                input
                    .events
                    .iter()
                    .filter_map(|event| match event {
                        Event::Key {
                            key,
                            pressed: true,
                            modifiers,
                            ..
                        } => HistoryCommand::from_key(*key, *modifiers),
                        _ => None,
                    })
                    .collect()
            });
            for command in commands {
                if let Some(snapshot) = session.run(command) {
                    nih_log!("{command:?} to {snapshot:?}");
                    snapshot.apply(&params, setter);
                }
            }

            let min_size = vec2(DEFAULT_WIDTH as f32, DEFAULT_HEIGHT as f32);
            ResizableWindow::new("simple-reverb")
                .min_size(min_size)
                .show(egui_ctx, &window_state, |ui| {
                    // Lay out against the whole window, not the panel's
                    // inner margin, so positions match the default layout.
                    let (width, height) = window_state.size();
                    let origin = ui.ctx().screen_rect().min;
                    let scale = layout::scale_for_size(width as f32, height as f32);
                    let before = ReverbSnapshot::capture(&params);

                    let dials = [&params.size, &params.damp, &params.width, &params.mix];
                    let rects = layout::dial_rects(origin, scale);
                    for ((param, rect), id) in dials.into_iter().zip(rects).zip(PERCENT_IDS) {
                        let (_, events) = Dial::for_param(param, setter).show(ui, rect);
                        if events.began {
                            session.begin_gesture(before);
                        }
                        if let Some(value) = events.ended {
                            let after = session
                                .gesture_start
                                .unwrap_or(before)
                                .with_percent(id, value);
                            session.end_gesture(after);
                        }
                    }

                    let freeze_rect = layout::freeze_rect(origin, scale);
                    let (_, toggled) =
                        ToggleButton::for_param(&params.freeze, setter).show(ui, freeze_rect);
                    if let Some(freeze) = toggled {
                        session.begin_gesture(before);
                        session.end_gesture(before.with_freeze(freeze));
                    }
                });

            // The resize corner only enforces the minimum. Snap whatever it
            // asked for to the allowed aspect ratio and 2× cap.
            let size = window_state.size();
            let fitted = layout::fit_window_size(size);
            if fitted != size {
                window_state.set_requested_size(fitted);
            }

            // Widgets report their release in the same frame the pointer
            // goes up, so anything still open here lost its release.
            session.settle(egui_ctx.dragged_id().is_some());
        },
    )
}
