use eframe::egui::{self, Color32, RichText, Ui};

use netflix_explorer::data::filter::TypeSelection;
use netflix_explorer::data::source::Source;

use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – navigation and filter widgets
// ---------------------------------------------------------------------------

/// Render the left navigation / filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Navigate");
    for tab in Tab::ALL {
        ui.radio_value(&mut state.tab, tab, tab.label());
    }
    ui.separator();

    ui.heading("Filter Dataset");

    let Some((lo_bound, hi_bound)) = state.year_bounds() else {
        ui.label("No dataset loaded.");
        return;
    };

    // ---- Content type ----
    ui.strong("Type");
    let mut types = state.criteria.types;
    for option in TypeSelection::ALL {
        ui.radio_value(&mut types, option, option.to_string());
    }
    state.set_types(types);

    ui.add_space(6.0);

    // ---- Release year range ----
    ui.strong("Release years");
    let mut lo = state.criteria.years.min();
    let mut hi = state.criteria.years.max();
    let lo_changed = ui
        .add(egui::Slider::new(&mut lo, lo_bound..=hi_bound).text("from"))
        .changed();
    let hi_changed = ui
        .add(egui::Slider::new(&mut hi, lo_bound..=hi_bound).text("to"))
        .changed();
    // Dragging one handle past the other pushes it along.
    if lo_changed && lo > hi {
        hi = lo;
    }
    if hi_changed && hi < lo {
        lo = hi;
    }
    state.set_years(lo, hi);

    ui.add_space(6.0);
    if ui.button("Show everything").clicked() {
        state.reset_filters();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            ui.horizontal(|ui: &mut Ui| {
                let field = ui.add(
                    egui::TextEdit::singleline(&mut state.url_input)
                        .hint_text("https://… or a file path")
                        .desired_width(260.0),
                );
                let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let has_input = !state.url_input.trim().is_empty();
                let clicked = ui
                    .add_enabled(has_input, egui::Button::new("Open URL"))
                    .clicked();
                if has_input && (clicked || submitted) {
                    let result = state.open_url_input();
                    report_load(state, result);
                    ui.close_menu();
                }
            });
            let can_export = state.dataset.is_some();
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                let result = state.reload();
                report_load(state, result);
                ui.close_menu();
            }
            if ui
                .add_enabled(can_export, egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(name) = state.source_name() {
            ui.label(RichText::new(name).strong());
        }

        if let Some(summary) = &state.summary {
            ui.label(format!(
                "{} titles loaded, {} visible ({}–{})",
                summary.total_rows,
                summary.row_count,
                summary.criteria.years.min(),
                summary.criteria.years.max()
            ));

            ui.separator();

            if ui
                .selectable_label(state.show_view_summary, "Summarize this view")
                .clicked()
            {
                state.show_view_summary = !state.show_view_summary;
            }
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open Netflix titles")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        let result = state.open(&Source::File(path));
        report_load(state, result);
    }
}

fn report_load<E: std::fmt::Display>(state: &mut AppState, result: Result<(), E>) {
    if let Err(e) = result {
        log::error!("Failed to load dataset: {e}");
        state.status_message = Some(format!("Error: {e}"));
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered titles")
        .set_file_name("netflix_filtered.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match state.export_filtered(&path) {
            Ok(_) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
