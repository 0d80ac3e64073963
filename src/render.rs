use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use eframe::egui;
use image::{ImageFormat, Rgba, RgbImage, RgbaImage};
use imageproc::drawing::draw_text_mut;
use tiny_skia::{Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::config::AnalyzerConfig;
use crate::geometry::{DisplayScale, Measurement};

/// Draws the calibration circle and its labels onto a copy of the display image.
pub fn render_measurement(
    display: &RgbImage,
    scale: DisplayScale,
    measurement: &Measurement,
    config: &AnalyzerConfig,
) -> Result<RgbImage> {
    let (width, height) = display.dimensions();
    let mut pixmap =
        Pixmap::new(width, height).ok_or_else(|| anyhow!("cannot allocate pixmap"))?;
    copy_image_to_pixmap(display, &mut pixmap)?;

    let center = scale.to_display(measurement.center);
    let radius = scale.length_to_display(measurement.radius) as f32;
    stroke_circle(&mut pixmap, center, radius, config);

    let mut output = RgbaImage::from_raw(width, height, pixmap.data().to_vec())
        .ok_or_else(|| anyhow!("cannot construct output image"))?;
    draw_labels(&mut output, &measurement.labels(), config);

    Ok(image::DynamicImage::ImageRgba8(output).to_rgb8())
}

fn copy_image_to_pixmap(image: &RgbImage, pixmap: &mut Pixmap) -> Result<()> {
    let data = pixmap.data_mut();
    if data.len() != image.as_raw().len() / 3 * 4 {
        return Err(anyhow!("source image and pixmap size mismatch"));
    }
    for (dst, src) in data.chunks_exact_mut(4).zip(image.pixels()) {
        dst.copy_from_slice(&[src[0], src[1], src[2], 255]);
    }
    Ok(())
}

fn stroke_circle(pixmap: &mut Pixmap, center: egui::Pos2, radius: f32, config: &AnalyzerConfig) {
    // zero-length reference segment: nothing to outline
    if radius.is_nan() || radius <= 0.0 {
        log::debug!("skipping circle with radius {radius}");
        return;
    }
    let Some(path) = PathBuilder::from_circle(center.x, center.y, radius) else {
        log::warn!("cannot build circle path at {center:?} r={radius}");
        return;
    };
    let [r, g, b] = config.circle_color;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, 255);
    paint.anti_alias = true;
    let stroke = Stroke {
        width: config.circle_thickness,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

fn draw_labels(image: &mut RgbaImage, labels: &[String], config: &AnalyzerConfig) {
    let Some(font) = load_font() else {
        log::warn!("no usable font found, result image will carry no labels");
        return;
    };
    let [r, g, b] = config.text_color;
    let (x, mut y) = config.text_origin;
    for label in labels {
        draw_text_mut(image, Rgba([r, g, b, 255]), x, y, config.text_font_size, &font, label);
        y += config.text_line_step;
    }
}

/// Proportional face shipped with egui's default fonts.
fn bundled_font() -> Option<FontArc> {
    egui::FontDefinitions::default()
        .font_data
        .get("Ubuntu-Light")
        .and_then(|data| FontArc::try_from_vec(data.font.to_vec()).ok())
}

/// Prefers the bundled face, then common system fonts.
fn load_font() -> Option<FontArc> {
    if let Some(font) = bundled_font() {
        return Some(font);
    }

    let candidates = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
    for path in candidates {
        if let Ok(bytes) = std::fs::read(path) {
            if let Ok(font) = FontArc::try_from_vec(bytes) {
                return Some(font);
            }
        }
    }
    None
}

// ── Output file ─────────────────────────────────────────────────────────────

pub fn output_file_name(prefix: &str, at: DateTime<Local>) -> String {
    format!("{prefix}{}.png", at.format("%Y%m%d_%H%M%S"))
}

/// Writes `image` as PNG into `dir`, named after the current local time.
pub fn save_png(image: &RgbImage, dir: &Path, prefix: &str) -> Result<PathBuf> {
    let path = dir.join(output_file_name(prefix, Local::now()));
    image
        .save_with_format(&path, ImageFormat::Png)
        .with_context(|| format!("cannot save png to {}", path.display()))?;
    Ok(path)
}
