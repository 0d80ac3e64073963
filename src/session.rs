use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui;
use image::{imageops::FilterType, DynamicImage, RgbImage};

use crate::geometry::{DisplayScale, Point};

/// Points collected per session.
pub const POINTS_NEEDED: usize = 2;

// ── Input events ────────────────────────────────────────────────────────────

/// Discrete input read from the selection window once per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SelectionEvent {
    /// Left-button press at a display-space position.
    Click(egui::Pos2),
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Done,
}

// ── Session ─────────────────────────────────────────────────────────────────

/// State of one selection run: the decoded image, its display copy and the
/// points clicked so far.
pub struct Session {
    original: RgbImage,
    display: RgbImage,
    scale: DisplayScale,
    points: Vec<Point>,
    quit: bool,
}

pub fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).with_context(|| format!("cannot load image {}", path.display()))
}

impl Session {
    pub fn from_image(image: DynamicImage, screen: (u32, u32), fraction: f64) -> Self {
        let original = image.to_rgb8();
        let size = original.dimensions();
        let scale = DisplayScale::fit(size, screen, fraction);
        let (w, h) = scale.display_size(size);
        // Triangle widens its support by the shrink factor, averaging the source area
        let display = image::imageops::resize(&original, w, h, FilterType::Triangle);
        log::debug!(
            "image {}x{} shown at {}x{} (scale {:.4})",
            size.0,
            size.1,
            w,
            h,
            scale.factor()
        );
        Self {
            original,
            display,
            scale,
            points: Vec::with_capacity(POINTS_NEEDED),
            quit: false,
        }
    }

    pub fn original(&self) -> &RgbImage {
        &self.original
    }

    pub fn display(&self) -> &RgbImage {
        &self.display
    }

    pub fn scale(&self) -> DisplayScale {
        self.scale
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn handle(&mut self, event: SelectionEvent) -> Flow {
        if self.is_finished() {
            return Flow::Done;
        }
        match event {
            SelectionEvent::Click(pos) => {
                let p = self.scale.to_original(pos);
                log::info!("point {} at ({}, {})", self.points.len() + 1, p.x, p.y);
                self.points.push(p);
            }
            SelectionEvent::Quit => {
                log::info!("selection aborted");
                self.quit = true;
            }
        }
        if self.is_finished() {
            Flow::Done
        } else {
            Flow::Continue
        }
    }

    pub fn is_finished(&self) -> bool {
        self.quit || self.points.len() >= POINTS_NEEDED
    }

    /// Points to hand back to the caller: all of them, or none when the
    /// selection was left incomplete.
    pub fn selected(&self) -> Vec<Point> {
        if self.points.len() == POINTS_NEEDED {
            self.points.clone()
        } else {
            Vec::new()
        }
    }

    #[cfg(test)]
    pub(crate) fn with_points(mut self, points: &[Point]) -> Self {
        self.points = points.to_vec();
        self
    }
}
