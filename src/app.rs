use eframe::egui;

use netflix_explorer::settings::Settings;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct NetflixExplorerApp {
    pub state: AppState,
}

impl NetflixExplorerApp {
    /// Build the app and open the configured dataset, if any.
    pub fn new(settings: Settings) -> Self {
        let mut state = AppState::new(settings.filters.clone(), settings.pipeline_options());

        if let Some(source) = settings.dataset.to_source() {
            if let Err(e) = state.open(&source) {
                log::error!("Failed to load {source}: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }

        Self { state }
    }
}

impl eframe::App for NetflixExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: navigation + filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::tab_view(ui, &self.state);
        });
    }
}
