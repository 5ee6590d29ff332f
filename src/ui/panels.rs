use eframe::egui::{self, Color32, RichText, Ui};

use crate::engine::request::ChartRequest;
use crate::engine::selection::{Dimension, HistogramTarget, Statistic};
use crate::state::{AppState, PanelSlot};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar. `route_input` backs the route text box.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, route_input: &mut String) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        match &state.dataset {
            Some(ds) => ui.label(format!("{} rate observations", ds.len())),
            None => ui.label("No dataset loaded"),
        };

        ui.separator();

        if ui
            .selectable_label(state.log_scale_rate, "Log-scale rate counts")
            .clicked()
        {
            state.log_scale_rate = !state.log_scale_rate;
        }

        let mut bins = state.options.rate_bins;
        ui.label("Bins");
        if ui
            .add(egui::DragValue::new(&mut bins).range(1..=500))
            .changed()
        {
            state.set_rate_bins(bins);
        }

        ui.separator();

        let response = ui.add(
            egui::TextEdit::singleline(route_input)
                .hint_text("#map/median")
                .desired_width(120.0),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Go").clicked() || submitted {
            state.navigate(route_input.trim());
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open insurance rate data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

// ---------------------------------------------------------------------------
// Per-panel selectors
// ---------------------------------------------------------------------------

/// Render the selector of `slot`; a changed choice is handed to
/// [`AppState::select`].
pub fn selector(ui: &mut Ui, state: &mut AppState, slot: PanelSlot) {
    let current = state.panel(slot).request;
    let chosen = match slot {
        PanelSlot::Histogram => histogram_dropdown(ui, current),
        PanelSlot::BoxPlot => boxplot_dropdown(ui, current),
        PanelSlot::Lines => tabs(
            ui,
            "Line: Choose variable to plot",
            current,
            Dimension::ALL.map(|d| (ChartRequest::Lines(d), d.title())),
        ),
        PanelSlot::Map => tabs(
            ui,
            "Map: Choose aggregate statistic",
            current,
            Statistic::ALL.map(|s| (ChartRequest::Map(s), s.title())),
        ),
    };

    if let Some(request) = chosen.filter(|r| *r != current) {
        state.select(slot, request);
    }
}

fn histogram_dropdown(ui: &mut Ui, current: ChartRequest) -> Option<ChartRequest> {
    let choices = HistogramTarget::ALL.map(|t| (ChartRequest::Histogram(t), t.title()));
    dropdown(ui, "hist_choice", "Histogram: Choose variable to plot", current, choices)
}

fn boxplot_dropdown(ui: &mut Ui, current: ChartRequest) -> Option<ChartRequest> {
    let choices = [
        (ChartRequest::BoxPlot(None), "None"),
        (ChartRequest::BoxPlot(Some(Dimension::Age)), "Age"),
        (
            ChartRequest::BoxPlot(Some(Dimension::State)),
            "State (ordered by median)",
        ),
        (ChartRequest::BoxPlot(Some(Dimension::Year)), "Year"),
    ];
    dropdown(ui, "box_choice", "Boxplot: Choose variable for x-axis", current, choices)
}

fn dropdown<const N: usize>(
    ui: &mut Ui,
    id: &str,
    label: &str,
    current: ChartRequest,
    choices: [(ChartRequest, &str); N],
) -> Option<ChartRequest> {
    let mut chosen = current;
    let selected_text = choices
        .iter()
        .find(|(r, _)| *r == current)
        .map_or("", |(_, text)| *text);

    ui.horizontal(|ui: &mut Ui| {
        ui.strong(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(selected_text)
            .show_ui(ui, |ui: &mut Ui| {
                for (request, text) in choices {
                    ui.selectable_value(&mut chosen, request, text);
                }
            });
    });
    Some(chosen)
}

/// Tab-style row of selectable labels, one per route.
fn tabs<const N: usize>(
    ui: &mut Ui,
    label: &str,
    current: ChartRequest,
    choices: [(ChartRequest, &str); N],
) -> Option<ChartRequest> {
    let mut chosen = None;
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(label);
        for (request, text) in choices {
            if ui
                .selectable_label(request == current, text)
                .on_hover_text(request.route())
                .clicked()
            {
                chosen = Some(request);
            }
        }
    });
    chosen
}
