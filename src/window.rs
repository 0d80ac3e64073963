use anyhow::{anyhow, Result};
use eframe::egui;
use image::RgbImage;

use crate::config::FALLBACK_SCREEN;

/// Opens one native window running `app` and blocks until it closes.
///
/// The window, its GL context and every texture the app uploaded are gone
/// once this returns, whichever way the app finished.
pub fn run_window<'a>(title: &str, size: (u32, u32), app: impl eframe::App + 'a) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([size.0 as f32, size.1 as f32])
            .with_resizable(true)
            .with_title(title),
        ..Default::default()
    };

    log::debug!("opening window {title:?} at {}x{}", size.0, size.1);
    eframe::run_native(title, options, Box::new(move |_cc| Ok(Box::new(app))))
        .map_err(|err| anyhow!("window {title:?} failed: {err}"))
}

/// Size of the primary display, or a Full HD guess when none is reported.
pub fn primary_screen_size() -> (u32, u32) {
    match display_info::DisplayInfo::all() {
        Ok(displays) => {
            let primary = displays
                .iter()
                .find(|d| d.is_primary)
                .or_else(|| displays.first());
            if let Some(d) = primary {
                return logical_size(d.width, d.height, d.scale_factor);
            }
            log::warn!("no display reported, assuming {}x{}", FALLBACK_SCREEN.0, FALLBACK_SCREEN.1);
        }
        Err(err) => {
            log::warn!(
                "cannot query displays ({err}), assuming {}x{}",
                FALLBACK_SCREEN.0,
                FALLBACK_SCREEN.1
            );
        }
    }
    FALLBACK_SCREEN
}

/// Converts a display's physical pixel size into egui points.
fn logical_size(width: u32, height: u32, scale_factor: f32) -> (u32, u32) {
    let factor = if scale_factor.is_finite() && scale_factor > 0.0 {
        f64::from(scale_factor)
    } else {
        1.0
    };
    let w = (f64::from(width) / factor).round().max(1.0);
    let h = (f64::from(height) / factor).round().max(1.0);
    (w as u32, h as u32)
}

/// Uploads `image` on first use and returns the cached handle afterwards.
pub fn ensure_texture<'t>(
    slot: &'t mut Option<egui::TextureHandle>,
    ctx: &egui::Context,
    name: &str,
    image: &RgbImage,
) -> &'t egui::TextureHandle {
    slot.get_or_insert_with(|| {
        let size = [image.width() as usize, image.height() as usize];
        let color_image = egui::ColorImage::from_rgb(size, image.as_raw());
        ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR)
    })
}

/// Paints the texture at its pixel size, anchored at the panel's top-left.
pub fn paint_image(painter: &egui::Painter, origin: egui::Pos2, texture: &egui::TextureHandle) -> egui::Rect {
    let rect = egui::Rect::from_min_size(origin, texture.size_vec2());
    painter.image(
        texture.id(),
        rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
    rect
}

/// True when any key went down during this frame.
pub fn any_key_pressed(ctx: &egui::Context) -> bool {
    ctx.input(|i| {
        i.events
            .iter()
            .any(|e| matches!(e, egui::Event::Key { pressed: true, repeat: false, .. }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_display_reports_points() {
        assert_eq!(logical_size(1920, 1080, 1.5), (1280, 720));
        assert_eq!(logical_size(2880, 1800, 2.0), (1440, 900));
    }

    #[test]
    fn unscaled_or_bogus_factor_keeps_pixels() {
        assert_eq!(logical_size(1920, 1080, 1.0), (1920, 1080));
        assert_eq!(logical_size(1920, 1080, 0.0), (1920, 1080));
        assert_eq!(logical_size(1920, 1080, f32::NAN), (1920, 1080));
    }

    #[test]
    fn fitted_image_stays_inside_scaled_screen() {
        let (w, h) = logical_size(1920, 1080, 1.5);
        let scale = crate::geometry::DisplayScale::fit((4000, 3000), (w, h), 0.8);
        let (dw, dh) = scale.display_size((4000, 3000));
        // back in physical pixels
        assert!(f64::from(dw) * 1.5 <= 0.8 * 1920.0 + 1.0);
        assert!(f64::from(dh) * 1.5 <= 0.8 * 1080.0 + 1.0);
    }
}
