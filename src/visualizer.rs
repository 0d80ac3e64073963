use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use eframe::egui;
use image::RgbImage;

use crate::config::AnalyzerConfig;
use crate::geometry::Measurement;
use crate::render;
use crate::session::{Session, POINTS_NEEDED};
use crate::window;

/// Annotated result of one visualization, already written to disk.
pub struct Analysis {
    pub measurement: Measurement,
    pub image: RgbImage,
    pub path: PathBuf,
}

/// Renders the circle for the session's two points and saves it into `dir`.
///
/// Returns `None` without touching the filesystem when fewer than two points
/// were collected.
pub fn analyze_and_save(
    session: &Session,
    ratio: f64,
    config: &AnalyzerConfig,
    dir: &Path,
) -> Result<Option<Analysis>> {
    let [center, reference] = match session.points() {
        [a, b] => [*a, *b],
        points => {
            log::debug!("{} of {POINTS_NEEDED} points collected", points.len());
            return Ok(None);
        }
    };

    let measurement = Measurement::from_points(center, reference, ratio);
    log::info!(
        "distance {:.1} px, radius {:.1} px (ratio {ratio})",
        measurement.distance,
        measurement.radius
    );

    let image = render::render_measurement(session.display(), session.scale(), &measurement, config)
        .context("rendering result failed")?;
    let path = render::save_png(&image, dir, &config.output_prefix)?;

    Ok(Some(Analysis {
        measurement,
        image,
        path,
    }))
}

// ── Result window ───────────────────────────────────────────────────────────

/// Shows the annotated image until any key is pressed.
pub struct ResultApp {
    image: RgbImage,
    texture: Option<egui::TextureHandle>,
}

impl ResultApp {
    pub fn new(image: RgbImage) -> Self {
        Self {
            image,
            texture: None,
        }
    }
}

impl eframe::App for ResultApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let texture = window::ensure_texture(&mut self.texture, ctx, "result", &self.image);
                window::paint_image(ui.painter(), ui.max_rect().min, texture);
            });

        if window::any_key_pressed(ctx) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}
