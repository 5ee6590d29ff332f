use std::path::Path;

use crate::config::{Config, InitialViews};
use crate::data::loader::load_file;
use crate::data::model::RateDataset;
use crate::engine::request::{render, ChartData, ChartRequest, ViewOptions};

// ---------------------------------------------------------------------------
// Panels
// ---------------------------------------------------------------------------

/// The four dashboard panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelSlot {
    Histogram,
    BoxPlot,
    Lines,
    Map,
}

impl PanelSlot {
    pub const ALL: [PanelSlot; 4] = [
        PanelSlot::Histogram,
        PanelSlot::BoxPlot,
        PanelSlot::Lines,
        PanelSlot::Map,
    ];

    /// Whether `request` is a view this panel can show.
    pub fn accepts(self, request: &ChartRequest) -> bool {
        matches!(
            (self, request),
            (PanelSlot::Histogram, ChartRequest::Histogram(_))
                | (PanelSlot::BoxPlot, ChartRequest::BoxPlot(_))
                | (PanelSlot::Lines, ChartRequest::Lines(_))
                | (PanelSlot::Map, ChartRequest::Map(_))
        )
    }
}

/// Current selection of one panel and the data computed for it.
#[derive(Debug, Clone)]
pub struct Panel {
    pub request: ChartRequest,
    /// `None` until a dataset is loaded.
    pub data: Option<ChartData>,
}

impl Panel {
    fn new(request: ChartRequest) -> Self {
        Self {
            request,
            data: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<RateDataset>,

    pub options: ViewOptions,

    /// Plot the rate histogram on a log10 axis.
    pub log_scale_rate: bool,

    pub histogram: Panel,
    pub boxplot: Panel,
    pub lines: Panel,
    pub map: Panel,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(views: InitialViews, options: ViewOptions, log_scale_rate: bool) -> Self {
        Self {
            dataset: None,
            options,
            log_scale_rate,
            histogram: Panel::new(views.histogram),
            boxplot: Panel::new(views.boxplot),
            lines: Panel::new(views.lines),
            map: Panel::new(views.map),
            status_message: None,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            config.view.initial_views()?,
            config.view.options(),
            config.view.log_scale_rate,
        ))
    }

    pub fn panel(&self, slot: PanelSlot) -> &Panel {
        match slot {
            PanelSlot::Histogram => &self.histogram,
            PanelSlot::BoxPlot => &self.boxplot,
            PanelSlot::Lines => &self.lines,
            PanelSlot::Map => &self.map,
        }
    }

    fn panel_mut(&mut self, slot: PanelSlot) -> &mut Panel {
        match slot {
            PanelSlot::Histogram => &mut self.histogram,
            PanelSlot::BoxPlot => &mut self.boxplot,
            PanelSlot::Lines => &mut self.lines,
            PanelSlot::Map => &mut self.map,
        }
    }

    /// Ingest a newly loaded dataset and recompute every panel.
    pub fn set_dataset(&mut self, dataset: RateDataset) {
        self.dataset = Some(dataset);
        for slot in PanelSlot::ALL {
            self.refresh(slot);
        }
        self.status_message = None;
    }

    /// Load `path`, keeping the current dataset if loading fails.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Handle a selection event: switch the panel's view and recompute it.
    pub fn select(&mut self, slot: PanelSlot, request: ChartRequest) {
        if !slot.accepts(&request) {
            log::warn!("Ignoring {request} for {slot:?} panel");
            return;
        }
        log::debug!("Selected {request}");
        self.panel_mut(slot).request = request;
        self.refresh(slot);
    }

    /// Handle a route typed or linked in the UI (e.g. `#line/state`).
    pub fn navigate(&mut self, route: &str) {
        match ChartRequest::from_route(route) {
            Ok(request) => {
                match PanelSlot::ALL.into_iter().find(|slot| slot.accepts(&request)) {
                    Some(slot) => self.select(slot, request),
                    None => log::warn!("No panel shows {request}"),
                }
                self.status_message = None;
            }
            Err(e) => {
                log::error!("{e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Rebuild the rate histogram after the bin count changed.
    pub fn set_rate_bins(&mut self, bins: usize) {
        self.options.rate_bins = bins.max(1);
        self.refresh(PanelSlot::Histogram);
    }

    fn refresh(&mut self, slot: PanelSlot) {
        let options = self.options;
        let Some(dataset) = self.dataset.clone() else {
            return;
        };
        let panel = self.panel_mut(slot);
        panel.data = Some(render(&dataset, &panel.request, &options));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewConfig;
    use crate::data::clean::clean;
    use crate::data::model::RawRateRow;
    use crate::engine::selection::{Dimension, Statistic};

    fn state() -> AppState {
        let views = ViewConfig::default().initial_views().unwrap();
        AppState::new(views, ViewOptions::default(), true)
    }

    fn dataset() -> RateDataset {
        clean(&[
            RawRateRow::new("2014", "CA", "0-20", "100"),
            RawRateRow::new("2015", "NY", "30", "200"),
        ])
        .unwrap()
    }

    #[test]
    fn test_panels_empty_until_dataset_loaded() {
        let mut s = state();
        assert!(PanelSlot::ALL.iter().all(|&slot| s.panel(slot).data.is_none()));
        s.select(PanelSlot::Lines, ChartRequest::Lines(Dimension::State));
        assert!(s.lines.data.is_none());

        s.set_dataset(dataset());
        assert!(PanelSlot::ALL.iter().all(|&slot| s.panel(slot).data.is_some()));
        match &s.lines.data {
            Some(ChartData::Lines(summary)) => assert_eq!(summary.dimension, Dimension::State),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_select_recomputes_panel() {
        let mut s = state();
        s.set_dataset(dataset());
        s.select(PanelSlot::Map, ChartRequest::Map(Statistic::Max));
        match &s.map.data {
            Some(ChartData::Map { statistic, .. }) => assert_eq!(*statistic, Statistic::Max),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_select_rejects_wrong_panel() {
        let mut s = state();
        s.select(PanelSlot::Map, ChartRequest::Lines(Dimension::Year));
        assert_eq!(s.map.request, ChartRequest::Map(Statistic::Median));
    }

    #[test]
    fn test_navigate_routes_to_panel() {
        let mut s = state();
        s.set_dataset(dataset());
        s.navigate("#line/year");
        assert_eq!(s.lines.request, ChartRequest::Lines(Dimension::Year));
        s.navigate("#box/state");
        assert_eq!(s.boxplot.request, ChartRequest::BoxPlot(Some(Dimension::State)));
        assert!(s.status_message.is_none());
    }

    #[test]
    fn test_navigate_bogus_route_shows_error() {
        let mut s = state();
        s.navigate("#map/bogus");
        assert_eq!(s.map.request, ChartRequest::Map(Statistic::Median));
        assert!(s.status_message.unwrap().contains("unknown statistic 'bogus'"));
    }

    #[test]
    fn test_failed_load_keeps_dataset() {
        let mut s = state();
        s.set_dataset(dataset());
        s.load_path(Path::new("does-not-exist.csv"));
        assert_eq!(s.dataset.as_ref().map(RateDataset::len), Some(2));
        assert!(s.status_message.is_some());
    }

    #[test]
    fn test_rate_bins_change() {
        let mut s = state();
        s.set_dataset(dataset());
        s.set_rate_bins(3);
        match &s.histogram.data {
            Some(ChartData::RateHistogram { bins }) => assert_eq!(bins.len(), 3),
            other => panic!("unexpected {other:?}"),
        }
    }
}
