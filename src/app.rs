use egui::{Align2, Color32, Sense, Stroke, Vec2};

use crate::state::{BRUSH_SIZES, Draw as _, FALLBACK_COLOR, Gesture, PALETTE, StrokeStyle, Surface};
use crate::utils::AppUtils;

/// The surface is cleared to this every frame before the drawn segments are
/// replayed.
const CANVAS_BACKGROUND: Color32 = Color32::WHITE;

pub struct App {
    surface: Surface,
    gesture: Gesture,
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Restore the style picked last run (if any). Drawings themselves
        // are not persisted.
        let style = cc
            .storage
            .and_then(|storage| eframe::get_value::<StrokeStyle>(storage, eframe::APP_KEY))
            .unwrap_or_default();

        Self {
            surface: Surface::new(style),
            gesture: Gesture::default(),
        }
    }
}

impl eframe::App for App {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.surface.style);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Toolbar window
        let content_rect = ctx.available_rect();
        let margin = 20.0;

        egui::Window::new("Tools")
            .resizable(false)
            .pivot(Align2::CENTER_BOTTOM)
            .default_pos([content_rect.center().x, content_rect.max.y - margin])
            .show(ctx, |ui| {
                self.render_toolbar(ui);
            });

        // Main canvas area
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_canvas(ui);
        });
    }
}

impl App {
    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        // Color swatches. Each one reports its raw hex value, exactly like
        // a color input would.
        ui.horizontal(|ui| {
            for value in PALETTE {
                let color = Color32::from_hex(value).unwrap_or(FALLBACK_COLOR);
                let stroke = if self.surface.style.color == color {
                    Stroke::new(2.0, ui.visuals().strong_text_color())
                } else {
                    Stroke::new(1.0, ui.visuals().widgets.inactive.bg_stroke.color)
                };
                let swatch = egui::Button::new("")
                    .fill(color)
                    .stroke(stroke)
                    .min_size(Vec2::splat(20.0));
                if ui.add(swatch).clicked() {
                    self.surface.set_color(value);
                }
            }
        });

        ui.separator();

        ui.horizontal(|ui| {
            ui.label("Brush:");
            for value in BRUSH_SIZES {
                let selected = value
                    .parse::<f32>()
                    .is_ok_and(|width| width == self.surface.style.width);
                if ui.selectable_label(selected, value).clicked() {
                    self.surface.set_brush(value);
                }
            }

            ui.separator();

            if ui.button("Undo").clicked() {
                self.on_undo();
            }
            if ui.button("Redo").clicked() {
                self.on_redo();
            }
        });
    }

    fn render_canvas(&mut self, ui: &mut egui::Ui) {
        let (canvas, response) = ui.allocate_exact_size(ui.available_size(), Sense::drag());

        let painter = ui.painter();

        // Clear to the paper color
        painter.rect_filled(canvas, 0.0, CANVAS_BACKGROUND);

        // Replay everything drawn so far
        for segment in self.surface.segments() {
            segment.draw(painter, canvas);
        }

        // Pointer input drives the gesture state machine. The press itself
        // contributes no point: pairing starts with the first move.
        if response.drag_started() {
            self.gesture.press();
        } else if self.gesture.is_dragging() {
            if let Some(pos) = response.interact_pointer_pos() {
                if !canvas.contains(pos) {
                    self.gesture.leave();
                } else if ui.input(|i| i.pointer.delta() != Vec2::ZERO) {
                    let local = AppUtils::to_canvas(pos, canvas);
                    if let Some((prev, current)) = self.gesture.pointer_moved(local) {
                        self.surface.add_segment(prev, current);
                    }
                }
            }
        }
        if response.drag_stopped() {
            self.gesture.release();
        }
    }

    fn on_undo(&mut self) {
        // TODO: implement
    }

    fn on_redo(&mut self) {
        // TODO: implement
    }
}
