//! Rotary dial and toggle button bound to plugin parameters.
//!
//! Both widgets talk to the host through a [`ParamSetter`] and follow the
//! gesture protocol: `begin_set` when the user grabs a control, `set` while
//! it moves, `end_set` when it is released. Hosts use those brackets for
//! automation recording and for their own undo.

use std::f32::consts::PI;

use nih_plug::prelude::*;
use nih_plug_egui::egui::{self, pos2, Color32, Pos2, Rect, Response, Sense, Stroke, Ui};

pub const BACKGROUND: Color32 = Color32::BLACK;
const TRACK: Color32 = Color32::from_rgb(52, 52, 58);
const ACCENT: Color32 = Color32::from_rgb(236, 152, 82);
const ACCENT_ACTIVE: Color32 = Color32::from_rgb(255, 178, 110);
const BODY: Color32 = Color32::from_rgb(28, 28, 32);
const TEXT: Color32 = Color32::from_rgb(200, 200, 205);
const TEXT_DIM: Color32 = Color32::from_rgb(140, 140, 150);

/// Normalized change per dragged pixel.
const DRAG_SENSITIVITY: f32 = 0.005;
/// Shift-drag moves ten times slower.
const FINE_FACTOR: f32 = 0.1;

/// 270° sweep starting bottom-left.
const START_ANGLE: f32 = PI * 0.75;
const SWEEP: f32 = PI * 1.5;

/// What a control did this frame, for the undo history.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureEvents {
    /// The user grabbed the control.
    pub began: bool,
    /// The user let go. Holds the final plain value for dials.
    pub ended: Option<f32>,
}

/// A rotary dial for one percentage parameter.
pub struct Dial<'a> {
    param: &'a FloatParam,
    setter: &'a ParamSetter<'a>,
    label: &'a str,
}

impl<'a> Dial<'a> {
    pub fn for_param(param: &'a FloatParam, setter: &'a ParamSetter<'a>) -> Self {
        Self {
            param,
            setter,
            label: param.name(),
        }
    }

    pub fn show(self, ui: &mut Ui, rect: Rect) -> (Response, GestureEvents) {
        let mut response = ui.allocate_rect(rect, Sense::click_and_drag());
        let drag_id = response.id.with("drag-normalized");
        let mut events = GestureEvents::default();

        if response.double_clicked() {
            events = reset_to_default(self.param, self.setter);
            response.mark_changed();
        } else {
            if response.drag_started() {
                let start = self.param.unmodulated_normalized_value();
                ui.memory_mut(|mem| mem.data.insert_temp(drag_id, start));
                events = begin_drag(self.param, self.setter);
            }

            if response.dragged() {
                let fine = ui.input(|i| i.modifiers.shift);
                let current = ui
                    .memory(|mem| mem.data.get_temp::<f32>(drag_id))
                    .unwrap_or_else(|| self.param.unmodulated_normalized_value());
                let next = drag_target(current, response.drag_delta().y, fine);

                if next != current {
                    ui.memory_mut(|mem| mem.data.insert_temp(drag_id, next));
                    self.setter.set_parameter_normalized(self.param, next);
                    response.mark_changed();
                }
            }

            if response.drag_stopped() {
                let last = ui
                    .memory_mut(|mem| {
                        let last = mem.data.get_temp::<f32>(drag_id);
                        mem.data.remove::<f32>(drag_id);
                        last
                    })
                    .unwrap_or_else(|| self.param.unmodulated_normalized_value());
                events.ended = end_drag(self.param, self.setter, last).ended;
            }
        }

        if ui.is_rect_visible(rect) {
            let normalized = ui
                .memory(|mem| mem.data.get_temp::<f32>(drag_id))
                .unwrap_or_else(|| self.param.unmodulated_normalized_value());
            self.paint(ui, rect, normalized, response.dragged() || response.hovered());
        }

        (response, events)
    }

    fn paint(&self, ui: &Ui, rect: Rect, normalized: f32, active: bool) {
        let painter = ui.painter();
        let scale = rect.width() / 80.0;
        let diameter = rect.width() * 0.75;
        let center = pos2(rect.center().x, rect.top() + 6.0 * scale + diameter / 2.0);
        let radius = diameter / 2.0;
        let accent = if active { ACCENT_ACTIVE } else { ACCENT };

        let value_angle = START_ANGLE + normalized * SWEEP;
        draw_arc(painter, center, radius, START_ANGLE, START_ANGLE + SWEEP, TRACK, 4.0 * scale);
        if normalized > 0.001 {
            draw_arc(painter, center, radius, START_ANGLE, value_angle, accent, 4.0 * scale);
        }

        painter.circle_filled(center, radius - 6.0 * scale, BODY);
        let pointer_end = pos2(
            center.x + value_angle.cos() * (radius - 10.0 * scale),
            center.y + value_angle.sin() * (radius - 10.0 * scale),
        );
        painter.line_segment([center, pointer_end], Stroke::new(2.5 * scale, accent));

        painter.text(
            pos2(rect.center().x, rect.top()),
            egui::Align2::CENTER_BOTTOM,
            self.label,
            egui::FontId::proportional(12.0 * scale),
            TEXT,
        );
        painter.text(
            pos2(rect.center().x, rect.bottom()),
            egui::Align2::CENTER_BOTTOM,
            self.param.normalized_value_to_string(normalized, true),
            egui::FontId::proportional(11.0 * scale),
            TEXT_DIM,
        );
    }
}

/// A latching on/off button for the freeze parameter.
pub struct ToggleButton<'a> {
    param: &'a BoolParam,
    setter: &'a ParamSetter<'a>,
    label: &'a str,
}

impl<'a> ToggleButton<'a> {
    pub fn for_param(param: &'a BoolParam, setter: &'a ParamSetter<'a>) -> Self {
        Self {
            param,
            setter,
            label: param.name(),
        }
    }

    /// Returns the new state when the button was clicked this frame.
    pub fn show(self, ui: &mut Ui, rect: Rect) -> (Response, Option<bool>) {
        let mut response = ui.allocate_rect(rect, Sense::click());
        let mut toggled = None;

        if response.clicked() {
            toggled = Some(toggle(self.param, self.setter));
            response.mark_changed();
        }

        if ui.is_rect_visible(rect) {
            let on = toggled.unwrap_or_else(|| self.param.unmodulated_plain_value());
            let scale = rect.height() / 32.0;
            let (fill, text) = match (on, response.hovered()) {
                (true, _) => (ACCENT, BODY),
                (false, true) => (TRACK, TEXT),
                (false, false) => (BODY, TEXT_DIM),
            };

            let painter = ui.painter();
            painter.rect_filled(rect, 4.0 * scale, fill);
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.label,
                egui::FontId::proportional(12.0 * scale),
                text,
            );
        }

        (response, toggled)
    }
}

/// Double-click: jump back to the default as one complete gesture.
fn reset_to_default(param: &FloatParam, setter: &ParamSetter) -> GestureEvents {
    let default = param.default_normalized_value();
    setter.begin_set_parameter(param);
    setter.set_parameter_normalized(param, default);
    setter.end_set_parameter(param);

    GestureEvents {
        began: true,
        ended: Some(param.preview_plain(default)),
    }
}

fn begin_drag(param: &FloatParam, setter: &ParamSetter) -> GestureEvents {
    setter.begin_set_parameter(param);
    GestureEvents {
        began: true,
        ended: None,
    }
}

/// Close the drag. `last` is the last normalized value the dial sent.
fn end_drag(param: &FloatParam, setter: &ParamSetter, last: f32) -> GestureEvents {
    setter.end_set_parameter(param);
    GestureEvents {
        began: false,
        ended: Some(param.preview_plain(last)),
    }
}

/// Where a dial at `current` (normalized) lands after the pointer moved
/// `delta_y` pixels. Up is positive.
fn drag_target(current: f32, delta_y: f32, fine: bool) -> f32 {
    let sensitivity = if fine {
        DRAG_SENSITIVITY * FINE_FACTOR
    } else {
        DRAG_SENSITIVITY
    };
    (current - delta_y * sensitivity).clamp(0.0, 1.0)
}

/// Flip a switch as one complete gesture and return its new state.
fn toggle(param: &BoolParam, setter: &ParamSetter) -> bool {
    let next = !param.unmodulated_plain_value();
    setter.begin_set_parameter(param);
    setter.set_parameter(param, next);
    setter.end_set_parameter(param);
    next
}

/// Draw an arc as a polyline.
fn draw_arc(
    painter: &egui::Painter,
    center: Pos2,
    radius: f32,
    start_angle: f32,
    end_angle: f32,
    color: Color32,
    stroke_width: f32,
) {
    const SEGMENTS: usize = 48;
    let sweep = end_angle - start_angle;

    let points: Vec<Pos2> = (0..=SEGMENTS)
        .map(|i| {
            let angle = start_angle + sweep * i as f32 / SEGMENTS as f32;
            pos2(center.x + angle.cos() * radius, center.y + angle.sin() * radius)
        })
        .collect();

    painter.add(egui::Shape::line(points, Stroke::new(stroke_width, color)));
}
