use eframe::egui::{self, Ui};

use crate::state::{AppState, PanelSlot};
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RateExplorerApp {
    pub state: AppState,
    /// Contents of the route box in the top bar.
    route_input: String,
}

impl RateExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            route_input: String::new(),
        }
    }
}

impl eframe::App for RateExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, &mut self.route_input);
        });

        // ---- Central panel: 2 × 2 grid of charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let chart_height = (ui.available_height() / 2.0 - 70.0).max(160.0);
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.columns(2, |cols: &mut [Ui]| {
                        for slot in [PanelSlot::Histogram, PanelSlot::Lines] {
                            panel(&mut cols[0], &mut self.state, slot, chart_height);
                        }
                        for slot in [PanelSlot::BoxPlot, PanelSlot::Map] {
                            panel(&mut cols[1], &mut self.state, slot, chart_height);
                        }
                    });
                });
        });
    }
}

fn panel(ui: &mut Ui, state: &mut AppState, slot: PanelSlot, height: f32) {
    ui.group(|ui: &mut Ui| {
        ui.set_width(ui.available_width());
        panels::selector(ui, state, slot);
        ui.separator();
        plot::panel_chart(ui, state.panel(slot), height, state.log_scale_rate);
    });
    ui.add_space(8.0);
}
