use egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};
use serde::{Deserialize, Serialize};

use crate::utils::AppUtils;

/// Swatch colors offered by the toolbar, in display order.
pub const PALETTE: [&str; 20] = [
    "#F73D2B", "#F4015D", "#9D02B0", "#4F2393", "#3C49B6", "#44AF51", "#009687", "#01BBD4",
    "#00A3F3", "#0F91F2", "#86C64B", "#CCDE37", "#FDED32", "#FEC224", "#FF951B", "#000000",
    "#5F7C8C", "#9D9D9D", "#795546", "#F9560B",
];

/// Brush width options, as the raw values the picker reports.
pub const BRUSH_SIZES: [&str; 4] = ["1", "2", "4", "8"];

/// Fallback color when the picker reports an empty value.
pub const FALLBACK_COLOR: Color32 = Color32::BLACK;

/// Fallback width when the picker reports an empty value.
pub const FALLBACK_WIDTH: f32 = 1.0;

/// How segment endpoints are finished off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineCap {
    #[default]
    Round,
    Butt,
    Square,
}

/// The style applied to every segment drawn from now on. Already-drawn
/// segments keep the style they were drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color32,
    pub width: f32,
    pub cap: LineCap,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: FALLBACK_COLOR,
            width: BRUSH_SIZES[0].parse().unwrap_or(FALLBACK_WIDTH),
            cap: LineCap::default(),
        }
    }
}

/// One rendered line between two consecutive move points of a gesture.
/// Endpoints are canvas-local.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Pos2,
    pub to: Pos2,
    pub style: StrokeStyle,
}

pub trait Draw {
    fn draw(&self, painter: &Painter, canvas: Rect);
}

impl Draw for Segment {
    fn draw(&self, painter: &Painter, canvas: Rect) {
        let from = AppUtils::to_screen(self.from, canvas);
        let to = AppUtils::to_screen(self.to, canvas);

        painter.line_segment([from, to], Stroke::new(self.style.width, self.style.color));

        // egui line segments have no cap notion, so caps are painted as
        // endpoint decorations.
        match self.style.cap {
            LineCap::Butt => {}
            LineCap::Round => {
                let radius = self.style.width / 2.0;
                painter.circle_filled(from, radius, self.style.color);
                painter.circle_filled(to, radius, self.style.color);
            }
            LineCap::Square => {
                let size = Vec2::splat(self.style.width);
                painter.rect_filled(Rect::from_center_size(from, size), 0.0, self.style.color);
                painter.rect_filled(Rect::from_center_size(to, size), 0.0, self.style.color);
            }
        }
    }
}

/// The drawable area: the active stroke style plus everything drawn so far.
///
/// egui repaints from scratch each frame, so the segment list replayed by
/// the canvas panel stands in for the pixels a retained canvas would keep.
/// It is not a document model: segments are never edited or serialized, and
/// each one carries its own style snapshot.
pub struct Surface {
    pub style: StrokeStyle,
    segments: Vec<Segment>,
}

impl Surface {
    pub fn new(style: StrokeStyle) -> Self {
        Self {
            style,
            segments: Vec::new(),
        }
    }

    /// Sets the stroke color from a raw picker value. An empty value falls
    /// back to black; a malformed one keeps the current color, like a 2D
    /// context ignoring an invalid `strokeStyle` assignment.
    pub fn set_color(&mut self, value: &str) {
        if value.is_empty() {
            self.style.color = FALLBACK_COLOR;
            return;
        }
        match Color32::from_hex(value) {
            Ok(color) => self.style.color = color,
            Err(_) => log::warn!("ignoring unparseable color {value:?}"),
        }
    }

    /// Sets the brush width from a raw picker value. An empty value falls
    /// back to 1; anything that is not a positive number keeps the current
    /// width.
    pub fn set_brush(&mut self, value: &str) {
        if value.is_empty() {
            self.style.width = FALLBACK_WIDTH;
            return;
        }
        match value.parse::<f32>() {
            Ok(width) if width > 0.0 => self.style.width = width,
            _ => log::warn!("ignoring unusable brush width {value:?}"),
        }
    }

    /// Records a segment stamped with the active style.
    pub fn add_segment(&mut self, from: Pos2, to: Pos2) {
        self.segments.push(Segment {
            from,
            to,
            style: self.style,
        });
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// Gesture state machine: a press switches to `Dragging`, release or the
/// pointer leaving the canvas switches back to `Idle`, tearing the gesture
/// down. While dragging, consecutive distinct move positions are paired up;
/// the first move after a press has no predecessor and yields nothing, so
/// the segment from the press point to the first move point is never drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging { prev: Option<Pos2> },
}

impl Gesture {
    pub fn press(&mut self) {
        *self = Self::Dragging { prev: None };
    }

    pub fn release(&mut self) {
        *self = Self::Idle;
    }

    pub fn leave(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// Feeds one move event (canvas-local). Returns the `(previous,
    /// current)` pair to draw once two distinct positions have been seen
    /// within the active gesture. A repeat of the previous position is
    /// coalesced into it.
    pub fn pointer_moved(&mut self, pos: Pos2) -> Option<(Pos2, Pos2)> {
        match self {
            Self::Idle => None,
            Self::Dragging { prev } => {
                let pair = match *prev {
                    Some(p) if p == pos => return None,
                    Some(p) => Some((p, pos)),
                    None => None,
                };
                *prev = Some(pos);
                pair
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pos(x: f32, y: f32) -> Pos2 {
        Pos2::new(x, y)
    }

    #[test]
    fn press_alone_draws_nothing() {
        let mut gesture = Gesture::default();
        gesture.press();
        gesture.release();
        assert_eq!(gesture, Gesture::Idle);
    }

    #[test]
    fn first_move_after_press_yields_no_pair() {
        let mut gesture = Gesture::default();
        gesture.press();
        assert_eq!(gesture.pointer_moved(pos(10.0, 10.0)), None);
    }

    #[test]
    fn second_move_pairs_with_first() {
        let mut gesture = Gesture::default();
        gesture.press();
        assert_eq!(gesture.pointer_moved(pos(10.0, 10.0)), None);
        assert_eq!(
            gesture.pointer_moved(pos(14.0, 12.0)),
            Some((pos(10.0, 10.0), pos(14.0, 12.0)))
        );
        assert_eq!(
            gesture.pointer_moved(pos(20.0, 20.0)),
            Some((pos(14.0, 12.0), pos(20.0, 20.0)))
        );
    }

    #[test]
    fn stationary_move_is_coalesced() {
        let mut gesture = Gesture::default();
        gesture.press();
        assert_eq!(gesture.pointer_moved(pos(5.0, 5.0)), None);
        assert_eq!(gesture.pointer_moved(pos(5.0, 5.0)), None);
        assert_eq!(
            gesture.pointer_moved(pos(6.0, 5.0)),
            Some((pos(5.0, 5.0), pos(6.0, 5.0)))
        );
    }

    #[test]
    fn leave_tears_down_the_gesture() {
        let mut gesture = Gesture::default();
        gesture.press();
        assert_eq!(gesture.pointer_moved(pos(1.0, 1.0)), None);
        gesture.leave();
        assert!(!gesture.is_dragging());
        // Moves before the next press are ignored.
        assert_eq!(gesture.pointer_moved(pos(2.0, 2.0)), None);
        assert_eq!(gesture.pointer_moved(pos(3.0, 3.0)), None);
    }

    #[test]
    fn moves_after_release_are_ignored() {
        let mut gesture = Gesture::default();
        gesture.press();
        gesture.release();
        assert_eq!(gesture.pointer_moved(pos(2.0, 2.0)), None);
    }

    #[test]
    fn a_new_press_starts_pairing_from_scratch() {
        let mut gesture = Gesture::default();
        gesture.press();
        assert_eq!(gesture.pointer_moved(pos(1.0, 1.0)), None);
        gesture.release();
        gesture.press();
        // The previous gesture's points do not leak into this one.
        assert_eq!(gesture.pointer_moved(pos(9.0, 9.0)), None);
    }

    #[test]
    fn default_style_is_black_round_width_one() {
        let style = StrokeStyle::default();
        assert_eq!(style.color, Color32::BLACK);
        assert_eq!(style.width, 1.0);
        assert_eq!(style.cap, LineCap::Round);
    }

    #[test]
    fn set_color_empty_falls_back_to_black() {
        let mut surface = Surface::new(StrokeStyle {
            color: Color32::RED,
            ..StrokeStyle::default()
        });
        surface.set_color("");
        assert_eq!(surface.style.color, Color32::BLACK);
    }

    #[test]
    fn set_color_applies_exact_hex() {
        let mut surface = Surface::new(StrokeStyle::default());
        surface.set_color("#F73D2B");
        assert_eq!(surface.style.color, Color32::from_rgb(0xF7, 0x3D, 0x2B));
    }

    #[test]
    fn set_color_keeps_current_on_garbage() {
        let mut surface = Surface::new(StrokeStyle::default());
        surface.set_color("#44AF51");
        surface.set_color("not-a-color");
        assert_eq!(surface.style.color, Color32::from_rgb(0x44, 0xAF, 0x51));
    }

    #[test]
    fn every_palette_entry_parses() {
        for value in PALETTE {
            assert!(Color32::from_hex(value).is_ok(), "bad palette entry {value}");
        }
    }

    #[test]
    fn set_brush_empty_falls_back_to_one() {
        let mut surface = Surface::new(StrokeStyle {
            width: 8.0,
            ..StrokeStyle::default()
        });
        surface.set_brush("");
        assert_eq!(surface.style.width, 1.0);
    }

    #[test]
    fn set_brush_parses_numeric_value() {
        let mut surface = Surface::new(StrokeStyle::default());
        surface.set_brush("8");
        assert_eq!(surface.style.width, 8.0);
    }

    #[test]
    fn set_brush_keeps_current_on_garbage_or_nonpositive() {
        let mut surface = Surface::new(StrokeStyle::default());
        surface.set_brush("4");
        surface.set_brush("wide");
        assert_eq!(surface.style.width, 4.0);
        surface.set_brush("0");
        assert_eq!(surface.style.width, 4.0);
        surface.set_brush("-2");
        assert_eq!(surface.style.width, 4.0);
    }

    #[test]
    fn segments_keep_the_style_they_were_drawn_with() {
        let mut surface = Surface::new(StrokeStyle::default());
        surface.set_color("#F73D2B");
        surface.add_segment(pos(0.0, 0.0), pos(4.0, 4.0));
        surface.set_color("#009687");
        surface.set_brush("8");
        surface.add_segment(pos(4.0, 4.0), pos(8.0, 0.0));

        let segments = surface.segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].style.color, Color32::from_rgb(0xF7, 0x3D, 0x2B));
        assert_eq!(segments[0].style.width, 1.0);
        assert_eq!(segments[1].style.color, Color32::from_rgb(0x00, 0x96, 0x87));
        assert_eq!(segments[1].style.width, 8.0);
    }
}
