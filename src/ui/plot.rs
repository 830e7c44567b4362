use std::ops::RangeInclusive;

use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, Points};

use netflix_explorer::data::aggregate::YearCount;
use netflix_explorer::data::model::{ContentType, TitleTable};
use netflix_explorer::data::pipeline::DashboardSummary;

use crate::color::ColorMap;
use crate::state::{AppState, Tab};

const INSIGHT_COLOR: Color32 = Color32::from_rgb(0x8f, 0xd1, 0x9e);
const NETFLIX_RED: Color32 = Color32::from_rgb(0xe5, 0x09, 0x14);

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the active tab in the central panel.
pub fn tab_view(ui: &mut Ui, state: &AppState) {
    let (Some(dataset), Some(summary)) = (&state.dataset, &state.summary) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to explore the catalogue  (File → Open…)");
        });
        return;
    };

    ui.heading(RichText::new(state.tab.label()).color(NETFLIX_RED));
    ui.label(format!(
        "Filtered dataset: {} titles, release years {} to {}",
        summary.row_count,
        summary.criteria.years.min(),
        summary.criteria.years.max()
    ));
    if state.show_view_summary {
        if let Some(text) = &summary.insights.view {
            ui.label(RichText::new(text).italics());
        }
    }
    ui.separator();

    if let Some(warning) = &summary.warning {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new(warning.to_string()).color(Color32::YELLOW));
        });
        return;
    }

    match state.tab {
        Tab::Overview => overview(ui, summary),
        Tab::TitlesOverTime => titles_over_time(ui, summary),
        Tab::Ratings => ratings(ui, summary),
        Tab::Durations => durations(ui, summary),
        Tab::Trends => trends(ui, summary),
        Tab::Data => data_table(ui, dataset, &state.visible_indices),
    }
}

fn insight(ui: &mut Ui, text: Option<&String>) {
    if let Some(text) = text {
        ui.label(RichText::new(format!("Insight: {text}")).color(INSIGHT_COLOR));
    }
}

fn type_colors() -> ColorMap {
    ColorMap::new(ContentType::ALL.map(ContentType::label))
}

/// Plot sized to leave room for the insight line below it.
fn chart(id: &str, ui: &Ui) -> Plot<'static> {
    Plot::new(id.to_owned())
        .legend(Legend::default())
        .height((ui.available_height() - 32.0).max(120.0))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
}

/// Format x-axis grid marks that land on a bar index as its label.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

fn year_points(points: &[YearCount]) -> Vec<[f64; 2]> {
    points
        .iter()
        .map(|p| [f64::from(p.year), p.count as f64])
        .collect()
}

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

fn overview(ui: &mut Ui, summary: &DashboardSummary) {
    let colors = type_colors();
    let labels: Vec<String> = summary
        .type_distribution
        .iter()
        .map(|t| t.kind.to_string())
        .collect();
    let bars: Vec<Bar> = summary
        .type_distribution
        .iter()
        .enumerate()
        .map(|(i, t)| {
            Bar::new(i as f64, t.count as f64)
                .name(t.kind.label())
                .fill(colors.color_for(t.kind.label()))
        })
        .collect();

    chart("type_distribution", ui)
        .x_axis_formatter(category_axis(labels))
        .y_axis_label("Titles")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .width(0.6)
                    .name("Distribution of Movies vs TV Shows"),
            );
        });
    insight(ui, summary.insights.overview.as_ref());
}

fn titles_over_time(ui: &mut Ui, summary: &DashboardSummary) {
    let bars: Vec<Bar> = summary
        .titles_over_time
        .iter()
        .map(|p| Bar::new(f64::from(p.year), p.count as f64).name(p.year.to_string()))
        .collect();

    chart("titles_over_time", ui)
        .x_axis_label("Year added")
        .y_axis_label("Titles")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .width(0.8)
                    .color(Color32::from_rgb(0x4a, 0x90, 0xe2))
                    .name("Titles added"),
            );
        });
    insight(ui, summary.insights.titles_over_time.as_ref());
}

fn ratings(ui: &mut Ui, summary: &DashboardSummary) {
    let colors = type_colors();
    let labels: Vec<String> = summary.ratings.iter().map(|r| r.rating.clone()).collect();

    let grouped = |kind: ContentType, offset: f64| -> BarChart {
        let bars = summary
            .ratings
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let count = match kind {
                    ContentType::Movie => r.movies,
                    ContentType::TvShow => r.tv_shows,
                };
                Bar::new(i as f64 + offset, count as f64).name(&r.rating)
            })
            .collect();
        BarChart::new(bars)
            .width(0.4)
            .color(colors.color_for(kind.label()))
            .name(kind.label())
    };

    chart("ratings", ui)
        .x_axis_formatter(category_axis(labels))
        .y_axis_label("Titles")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(grouped(ContentType::Movie, -0.2));
            plot_ui.bar_chart(grouped(ContentType::TvShow, 0.2));
        });
    insight(ui, summary.insights.ratings.as_ref());
}

fn durations(ui: &mut Ui, summary: &DashboardSummary) {
    let colors = ColorMap::new(summary.durations.iter().map(|d| d.country.clone()));
    let labels: Vec<String> = summary.durations.iter().map(|d| d.country.clone()).collect();
    let bars: Vec<Bar> = summary
        .durations
        .iter()
        .enumerate()
        .map(|(i, d)| {
            Bar::new(i as f64, d.mean_minutes)
                .name(format!("{} ({} movies)", d.country, d.titles))
                .fill(colors.color_for(&d.country))
        })
        .collect();

    chart("durations", ui)
        .x_axis_formatter(category_axis(labels))
        .y_axis_label("Average minutes")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .width(0.6)
                    .name("Average movie duration"),
            );
        });
    insight(ui, summary.insights.durations.as_ref());
}

fn trends(ui: &mut Ui, summary: &DashboardSummary) {
    let colors = type_colors();

    chart("trends", ui)
        .x_axis_label("Year added")
        .y_axis_label("Titles")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(year_points(&summary.growth))
                    .name("All titles (cumulative)")
                    .color(NETFLIX_RED)
                    .width(2.0),
            );
            for series in &summary.yearly_by_type {
                let color = colors.color_for(series.kind.label());
                plot_ui.line(
                    Line::new(year_points(&series.points))
                        .name(series.kind.label())
                        .color(color)
                        .width(1.5),
                );
                plot_ui.points(
                    Points::new(year_points(&series.points))
                        .name(series.kind.label())
                        .color(color)
                        .radius(3.0),
                );
            }
        });
    insight(ui, summary.insights.trends.as_ref());
}

fn data_table(ui: &mut Ui, dataset: &TitleTable, visible: &[usize]) {
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder().at_least(160.0))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .header(20.0, |mut header| {
            for name in ["ID", "Type", "Title", "Country", "Year", "Rating", "Duration"] {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, visible.len(), |mut row| {
                let rec = &dataset.records[visible[row.index()]];
                row.col(|ui| {
                    ui.label(&rec.id);
                });
                row.col(|ui| {
                    ui.label(rec.kind.label());
                });
                row.col(|ui| {
                    ui.label(&rec.title);
                });
                row.col(|ui| {
                    ui.label(rec.primary_country().unwrap_or("-"));
                });
                row.col(|ui| {
                    ui.label(rec.release_year.to_string());
                });
                row.col(|ui| {
                    ui.label(rec.rating.as_deref().unwrap_or("-"));
                });
                row.col(|ui| {
                    ui.label(rec.duration.map(|d| d.to_string()).unwrap_or_default());
                });
            });
        });
}
