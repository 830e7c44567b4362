mod app;
mod color;
mod state;
mod ui;

use anyhow::{anyhow, Context};
use app::NetflixExplorerApp;
use eframe::egui;
use netflix_explorer::settings::Settings;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = Settings::load().context("loading settings")?;
    settings
        .validate()
        .map_err(|e| anyhow!("invalid settings: {e}"))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window.width, settings.window.height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Netflix Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(NetflixExplorerApp::new(settings)))),
    )
    .map_err(|e| anyhow!("running UI: {e}"))
}
