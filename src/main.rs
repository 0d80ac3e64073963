mod analyzer;
mod config;
mod geometry;
mod render;
mod selector;
mod session;
mod visualizer;
mod window;

use analyzer::MacularHoleAnalyzer;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut analyzer = MacularHoleAnalyzer::new();

    let points = analyzer.select_points();
    if points.is_empty() {
        return;
    }

    analyzer.visualize(config::DEFAULT_RATIO);
}
