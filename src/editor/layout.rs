//! Fixed editor layout, scaled uniformly with the window.
//!
//! Coordinates are in logical pixels for the default 566 × 242 window:
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────────┐
//!  │                                                          │
//!  │   ( size )  ( damp )   [freeze]   ( width )  ( mix )     │
//!  │                                                          │
//!  └──────────────────────────────────────────────────────────┘
//!     x=46      x=144      x=249      x=342      x=440
//! ```

use nih_plug_egui::egui::{vec2, Pos2, Rect};

pub const DEFAULT_WIDTH: u32 = 566;
pub const DEFAULT_HEIGHT: u32 = 242;

pub const MIN_SCALE: f32 = 1.0;
pub const MAX_SCALE: f32 = 2.0;

const DIAL_Y: f32 = 73.0;
const DIAL_SIZE: [f32; 2] = [80.0, 96.0];
/// Left edges of the size, damp, width and mix dials.
const DIAL_X: [f32; 4] = [46.0, 144.0, 342.0, 440.0];

const FREEZE_POS: [f32; 2] = [249.0, 110.0];
const FREEZE_SIZE: [f32; 2] = [68.0, 32.0];

/// Scale factor for a window of the given size. Whichever side was
/// stretched further wins, so dragging the corner along either axis grows
/// the content.
pub fn scale_for_size(width: f32, height: f32) -> f32 {
    let scale = (width / DEFAULT_WIDTH as f32).max(height / DEFAULT_HEIGHT as f32);
    if !scale.is_finite() {
        return MIN_SCALE;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// The closest allowed window size to `(width, height)`: the default
/// aspect ratio, between 1× and 2× the default size.
pub fn fit_window_size((width, height): (u32, u32)) -> (u32, u32) {
    let scale = scale_for_size(width as f32, height as f32);
    (
        (DEFAULT_WIDTH as f32 * scale).round() as u32,
        (DEFAULT_HEIGHT as f32 * scale).round() as u32,
    )
}

/// Dial rectangles in display order (size, damp, width, mix), relative to
/// `origin`.
pub fn dial_rects(origin: Pos2, scale: f32) -> [Rect; 4] {
    DIAL_X.map(|x| {
        Rect::from_min_size(
            origin + vec2(x, DIAL_Y) * scale,
            vec2(DIAL_SIZE[0], DIAL_SIZE[1]) * scale,
        )
    })
}

pub fn freeze_rect(origin: Pos2, scale: f32) -> Rect {
    Rect::from_min_size(
        origin + vec2(FREEZE_POS[0], FREEZE_POS[1]) * scale,
        vec2(FREEZE_SIZE[0], FREEZE_SIZE[1]) * scale,
    )
}
