use std::path::Path;

use crate::config::AnalyzerConfig;
use crate::geometry::Point;
use crate::selector::{self, SelectorApp};
use crate::session::{self, Session};
use crate::visualizer::{self, Analysis, ResultApp};
use crate::window;

/// Owns the state of one annotation run: pick two points, then draw the
/// calibration circle for them.
pub struct MacularHoleAnalyzer {
    config: AnalyzerConfig,
    session: Option<Session>,
}

impl MacularHoleAnalyzer {
    pub fn new() -> Self {
        Self {
            config: AnalyzerConfig::default(),
            session: None,
        }
    }

    /// Prompts for an image and collects two reference points on it.
    ///
    /// Returns either both points, in click order, or nothing when the user
    /// cancelled, quit early, or the image could not be loaded.
    pub fn select_points(&mut self) -> Vec<Point> {
        let path = selector::pick_image(&self.config);
        self.select_points_in(path.as_deref())
    }

    fn select_points_in(&mut self, path: Option<&Path>) -> Vec<Point> {
        // points from an earlier run must not survive a cancelled or failed one
        self.session = None;

        let Some(path) = path else {
            log::warn!("no image selected");
            return Vec::new();
        };

        let image = match session::load_image(path) {
            Ok(image) => image,
            Err(err) => {
                log::error!("{err:#}");
                return Vec::new();
            }
        };
        let screen = window::primary_screen_size();
        let mut session = Session::from_image(image, screen, self.config.screen_fraction);
        log::info!(
            "loaded {} ({}x{})",
            path.display(),
            session.original().width(),
            session.original().height()
        );

        let size = session.display().dimensions();
        let app = SelectorApp::new(&mut session, &self.config);
        if let Err(err) = window::run_window(&self.config.selection_title, size, app) {
            log::error!("{err:#}");
            return Vec::new();
        }

        let points = session.selected();
        self.session = Some(session);
        points
    }

    /// Draws the circle for the selected points, saves it in the working
    /// directory and shows it until a key is pressed.
    pub fn visualize(&mut self, ratio: f64) {
        let Some(analysis) = self.visualize_into(ratio, Path::new(".")) else {
            return;
        };
        log::debug!("{}", analysis.measurement.labels().join(", "));
        println!("Analysis saved to {}", analysis.path.display());

        let size = analysis.image.dimensions();
        let app = ResultApp::new(analysis.image);
        if let Err(err) = window::run_window(&self.config.result_title, size, app) {
            log::error!("{err:#}");
        }
    }

    fn visualize_into(&self, ratio: f64, dir: &Path) -> Option<Analysis> {
        let analysis = match &self.session {
            Some(session) => visualizer::analyze_and_save(session, ratio, &self.config, dir),
            None => Ok(None),
        };
        match analysis {
            Ok(Some(analysis)) => Some(analysis),
            Ok(None) => {
                log::warn!("select two points first");
                None
            }
            Err(err) => {
                log::error!("{err:#}");
                None
            }
        }
    }
}

impl Default for MacularHoleAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, NaiveDateTime};
    use image::{DynamicImage, RgbImage};
    use regex::Regex;

    fn analyzer_with(points: &[Point]) -> MacularHoleAnalyzer {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(400, 300, image::Rgb([10, 60, 20])));
        let session = Session::from_image(img, (500, 375), 0.8).with_points(points);
        MacularHoleAnalyzer {
            config: AnalyzerConfig::default(),
            session: Some(session),
        }
    }

    #[test]
    fn visualize_without_selection_does_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = MacularHoleAnalyzer::new();
        assert!(analyzer.visualize_into(0.5, dir.path()).is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn visualize_with_one_point_does_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = analyzer_with(&[Point::new(50, 50)]);
        assert!(analyzer.visualize_into(0.5, dir.path()).is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn cancelled_selection_drops_previous_points() {
        let dir = tempfile::tempdir().unwrap();
        let mut analyzer = analyzer_with(&[Point::new(100, 100), Point::new(250, 180)]);

        assert!(analyzer.select_points_in(None).is_empty());
        assert!(analyzer.visualize_into(0.5, dir.path()).is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn undecodable_image_drops_previous_points() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.jpg");
        std::fs::write(&broken, b"\xff\xd8 truncated").unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        let mut analyzer = analyzer_with(&[Point::new(100, 100), Point::new(250, 180)]);

        assert!(analyzer.select_points_in(Some(&broken)).is_empty());
        assert!(analyzer.visualize_into(0.5, &out).is_none());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn output_is_named_after_save_time() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = analyzer_with(&[Point::new(100, 100), Point::new(250, 180)]);

        let before = Local::now().naive_local().and_utc().timestamp();
        let analysis = analyzer.visualize_into(0.5, dir.path()).unwrap();
        let after = Local::now().naive_local().and_utc().timestamp();

        let name = analysis.path.file_name().unwrap().to_str().unwrap().to_owned();
        let pattern = Regex::new(r"^macular_hole_analysis_(\d{8}_\d{6})\.png$").unwrap();
        let stamp = &pattern.captures(&name).expect("unexpected file name")[1];
        let saved_at = NaiveDateTime::parse_from_str(stamp, "%Y%m%d_%H%M%S")
            .unwrap()
            .and_utc()
            .timestamp();
        assert!(before <= saved_at && saved_at <= after, "{name}");
        assert!(dir.path().join(&name).exists());
    }
}
