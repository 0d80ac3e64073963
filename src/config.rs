use eframe::egui;

/// Ratio applied when the caller does not pick one.
pub const DEFAULT_RATIO: f64 = 0.5;

/// Screen size assumed when no display can be queried.
pub const FALLBACK_SCREEN: (u32, u32) = (1920, 1080);

// ── Tunables ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct AnalyzerConfig {
    /// Share of the screen the display image may occupy on each axis.
    pub screen_fraction: f64,

    // selection overlay
    pub marker_radius: f32,
    pub marker_color: [u8; 3],
    pub label_offset: (f32, f32),
    pub label_font_size: f32,
    pub line_thickness: f32,
    pub quit_key: egui::Key,

    // result overlay
    pub circle_color: [u8; 3],
    pub circle_thickness: f32,
    pub text_color: [u8; 3],
    pub text_font_size: f32,
    pub text_origin: (i32, i32),
    pub text_line_step: i32,

    pub output_prefix: String,
    pub dialog_title: String,
    pub selection_title: String,
    pub result_title: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            screen_fraction: 0.8,
            marker_radius: 5.0,
            marker_color: [0, 255, 0],
            label_offset: (10.0, 10.0),
            label_font_size: 14.0,
            line_thickness: 2.0,
            quit_key: egui::Key::Q,
            circle_color: [0, 0, 255],
            circle_thickness: 2.0,
            text_color: [255, 0, 0],
            text_font_size: 22.0,
            // baselines sit at y = 30, 60, 90; draw_text_mut takes the top edge
            text_origin: (10, 12),
            text_line_step: 30,
            output_prefix: "macular_hole_analysis_".to_owned(),
            dialog_title: "Select ultra-wide-field fundus image".to_owned(),
            selection_title: "Ultra-wide-field fundus image".to_owned(),
            result_title: "Macular hole analysis result".to_owned(),
        }
    }
}

impl AnalyzerConfig {
    pub fn marker_color32(&self) -> egui::Color32 {
        let [r, g, b] = self.marker_color;
        egui::Color32::from_rgb(r, g, b)
    }
}
