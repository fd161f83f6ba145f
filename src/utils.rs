use egui::{Pos2, Rect};

pub struct AppUtils;

impl AppUtils {
    /// Translates a pointer position from screen space to canvas-local
    /// space. The canvas rect is the one captured for this event, so panel
    /// and window movement between events is tolerated.
    pub fn to_canvas(pos: Pos2, canvas: Rect) -> Pos2 {
        pos - canvas.min.to_vec2()
    }

    /// Translates a canvas-local point back to screen space for painting.
    pub fn to_screen(pos: Pos2, canvas: Rect) -> Pos2 {
        pos + canvas.min.to_vec2()
    }
}
