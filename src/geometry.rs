use eframe::egui;

/// Pixel position in the original (unscaled) image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }
}

// ── Display scale ───────────────────────────────────────────────────────────

/// Uniform factor between display pixels and original pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayScale(f64);

impl DisplayScale {
    /// Largest uniform factor that fits the image inside `fraction` of the screen.
    pub fn fit(image: (u32, u32), screen: (u32, u32), fraction: f64) -> Self {
        let sx = fraction * f64::from(screen.0) / f64::from(image.0.max(1));
        let sy = fraction * f64::from(screen.1) / f64::from(image.1.max(1));
        Self(sx.min(sy))
    }

    pub fn factor(self) -> f64 {
        self.0
    }

    pub fn display_size(self, image: (u32, u32)) -> (u32, u32) {
        let w = (f64::from(image.0) * self.0).round().max(1.0);
        let h = (f64::from(image.1) * self.0).round().max(1.0);
        (w as u32, h as u32)
    }

    /// Display coordinate of an original-space point, truncated to whole pixels.
    pub fn to_display(self, p: Point) -> egui::Pos2 {
        egui::pos2(
            (f64::from(p.x) * self.0).trunc() as f32,
            (f64::from(p.y) * self.0).trunc() as f32,
        )
    }

    pub fn to_original(self, display: egui::Pos2) -> Point {
        Point::new(
            (f64::from(display.x) / self.0).floor() as i32,
            (f64::from(display.y) / self.0).floor() as i32,
        )
    }

    pub fn length_to_display(self, len: f64) -> f64 {
        len * self.0
    }
}

// ── Measurement ─────────────────────────────────────────────────────────────

/// Circle derived from the two reference points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    pub center: Point,
    pub ratio: f64,
    pub distance: f64,
    pub radius: f64,
}

impl Measurement {
    pub fn from_points(center: Point, reference: Point, ratio: f64) -> Self {
        let distance = center.distance_to(reference);
        Self {
            center,
            ratio,
            distance,
            radius: ratio * distance,
        }
    }

    pub fn labels(&self) -> [String; 3] {
        [
            format!("Ratio: {:.4}", self.ratio),
            format!("Distance: {:.1} pixels", self.distance),
            format!("Radius: {:.1} pixels", self.radius),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_is_ratio_times_distance() {
        let a = Point::new(12, -7);
        let b = Point::new(305, 411);
        for ratio in [0.0, 0.25, 0.5, 1.0, 3.75] {
            let m = Measurement::from_points(a, b, ratio);
            assert!((m.radius - ratio * a.distance_to(b)).abs() < 1e-9);
        }
    }

    #[test]
    fn horizontal_pair_labels() {
        let m = Measurement::from_points(Point::new(100, 100), Point::new(400, 100), 0.5);
        assert_eq!(m.distance, 300.0);
        assert_eq!(m.radius, 150.0);
        assert_eq!(
            m.labels(),
            [
                "Ratio: 0.5000".to_owned(),
                "Distance: 300.0 pixels".to_owned(),
                "Radius: 150.0 pixels".to_owned(),
            ]
        );
    }

    #[test]
    fn fit_landscape_image_on_full_hd() {
        let scale = DisplayScale::fit((4000, 3000), (1920, 1080), 0.8);
        assert!((scale.factor() - 0.288).abs() < 1e-12);
        assert_eq!(scale.display_size((4000, 3000)), (1152, 864));
    }

    #[test]
    fn fit_upscales_small_images() {
        let scale = DisplayScale::fit((200, 100), (1000, 1000), 0.8);
        assert!((scale.factor() - 4.0).abs() < 1e-12);
        assert_eq!(scale.display_size((200, 100)), (800, 400));
    }

    #[test]
    fn click_maps_back_with_floor() {
        let scale = DisplayScale::fit((4000, 3000), (1920, 1080), 0.8);
        let p = scale.to_original(egui::pos2(100.0, 57.0));
        assert_eq!(p, Point::new(347, 197));
    }

    #[test]
    fn display_position_truncates() {
        let scale = DisplayScale(0.5);
        assert_eq!(scale.to_display(Point::new(3, 9)), egui::pos2(1.0, 4.0));
    }
}
