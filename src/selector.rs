use std::path::PathBuf;

use eframe::egui;

use crate::config::AnalyzerConfig;
use crate::session::{Flow, SelectionEvent, Session};
use crate::window;

/// Asks for the fundus image to annotate.
pub fn pick_image(config: &AnalyzerConfig) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(&config.dialog_title)
        .add_filter("Image files", &["jpg", "jpeg", "png", "bmp"])
        .add_filter("All files", &["*"])
        .pick_file()
}

/// Position relative to the image's top-left, if `pos` lies on one of its
/// pixels. The right and bottom edges belong to the next pixel over.
fn image_local(image_rect: egui::Rect, pos: egui::Pos2) -> Option<egui::Pos2> {
    let inside = pos.x >= image_rect.min.x
        && pos.y >= image_rect.min.y
        && pos.x < image_rect.max.x
        && pos.y < image_rect.max.y;
    inside.then(|| (pos - image_rect.min).to_pos2())
}

// ── Selection window ────────────────────────────────────────────────────────

/// Window that shows the display image and feeds clicks into the session it
/// borrows until two points exist or the user quits.
pub struct SelectorApp<'a> {
    session: &'a mut Session,
    config: &'a AnalyzerConfig,
    texture: Option<egui::TextureHandle>,
}

impl<'a> SelectorApp<'a> {
    pub fn new(session: &'a mut Session, config: &'a AnalyzerConfig) -> Self {
        Self {
            session,
            config,
            texture: None,
        }
    }

    /// Translates this frame's raw input into selection events.
    fn collect_events(&self, ctx: &egui::Context, image_rect: egui::Rect) -> Vec<SelectionEvent> {
        ctx.input(|i| {
            let mut events = Vec::new();
            for event in &i.events {
                match event {
                    egui::Event::PointerButton {
                        pos,
                        button: egui::PointerButton::Primary,
                        pressed: true,
                        ..
                    } => {
                        if let Some(local) = image_local(image_rect, *pos) {
                            events.push(SelectionEvent::Click(local));
                        }
                    }
                    egui::Event::Key {
                        key, pressed: true, ..
                    } if *key == self.config.quit_key => {
                        events.push(SelectionEvent::Quit);
                    }
                    _ => {}
                }
            }
            if i.viewport().close_requested() {
                events.push(SelectionEvent::Quit);
            }
            events
        })
    }

    fn draw_points(&self, painter: &egui::Painter, origin: egui::Pos2) {
        let color = self.config.marker_color32();
        let scale = self.session.scale();
        let offset = egui::vec2(self.config.label_offset.0, self.config.label_offset.1);

        let screen: Vec<egui::Pos2> = self
            .session
            .points()
            .iter()
            .map(|p| origin + scale.to_display(*p).to_vec2())
            .collect();

        for (i, pos) in screen.iter().enumerate() {
            painter.circle_filled(*pos, self.config.marker_radius, color);
            painter.text(
                *pos + offset,
                egui::Align2::LEFT_BOTTOM,
                format!("Point {}", i + 1),
                egui::FontId::proportional(self.config.label_font_size),
                color,
            );
        }

        if let [a, b] = screen.as_slice() {
            painter.line_segment([*a, *b], egui::Stroke::new(self.config.line_thickness, color));
        }
    }
}

impl eframe::App for SelectorApp<'_> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let origin = ui.max_rect().min;
                let texture = window::ensure_texture(&mut self.texture, ctx, "fundus", self.session.display());
                let image_rect = window::paint_image(ui.painter(), origin, texture);

                for event in self.collect_events(ctx, image_rect) {
                    if self.session.handle(event) == Flow::Done {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        break;
                    }
                }

                self.draw_points(ui.painter(), origin);
            });
    }
}
