use std::ops::RangeInclusive;

use eframe::egui::{Color32, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoints, Points,
};

use crate::color::generate_palette;
use crate::engine::request::ChartData;
use crate::engine::summary::{
    DistributionSummary, HistogramBin, Label, MeanMedian, Partition, Summary,
};
use crate::state::Panel;

use super::map;

// ---------------------------------------------------------------------------
// Panel body
// ---------------------------------------------------------------------------

/// Render the chart of one panel at `height` pixels.
pub fn panel_chart(ui: &mut Ui, panel: &Panel, height: f32, log_scale_rate: bool) {
    ui.label(panel.request.title());

    let Some(data) = &panel.data else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to explore rates  (File → Open…)");
        });
        return;
    };

    // Salt the plot id with the route so axes reset when the view changes.
    let id = panel.request.route();
    match data {
        ChartData::RateHistogram { bins } => {
            rate_histogram(ui, &id, bins, height, log_scale_rate)
        }
        ChartData::Counts(summary) => count_histogram(ui, &id, summary, height),
        ChartData::Distribution(dist) => box_plot(ui, &id, dist, height),
        ChartData::Lines(summary) => mean_median_lines(ui, &id, summary, height),
        ChartData::Map { summary, .. } => map::state_map(ui, summary, height),
    }
}

// ---------------------------------------------------------------------------
// Categorical axes
// ---------------------------------------------------------------------------

/// Place labels at x = 0, 1, 2, … unless they are numbers (ages, years),
/// which keep their own value as x.
fn x_positions<'a>(labels: impl Iterator<Item = &'a Label>) -> (Vec<f64>, Vec<String>) {
    labels
        .enumerate()
        .map(|(i, label)| (label.as_f64().unwrap_or(i as f64), label.to_string()))
        .unzip()
}

/// Axis formatter showing `names[i]` at integer positions `i`.
fn category_formatter(
    names: Vec<String>,
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String + 'static {
    move |mark, _range| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
            return String::new();
        }
        names.get(idx as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

fn rate_histogram(ui: &mut Ui, id: &str, bins: &[HistogramBin], height: f32, log_scale: bool) {
    let bars: Vec<Bar> = bins
        .iter()
        .filter(|b| b.count > 0)
        .map(|b| {
            let count = b.count as f64;
            let value = if log_scale { count.log10() } else { count };
            Bar::new(b.center(), value)
                .width(b.width())
                .name(format!("{:.0}–{:.0}: {}", b.start, b.end, b.count))
        })
        .collect();

    let mut plot = Plot::new(id.to_string())
        .height(height)
        .allow_scroll(false)
        .x_axis_label("rate")
        .y_axis_label(if log_scale { "count (log)" } else { "count" });
    if log_scale {
        plot = plot.y_axis_formatter(|mark, _range| format!("{:.0}", 10f64.powf(mark.value)));
    }

    plot.show(ui, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE));
    });
}

fn count_histogram(ui: &mut Ui, id: &str, summary: &Summary<usize>, height: f32) {
    let (xs, names) = x_positions(summary.labels());
    let numeric = summary.entries.iter().all(|e| e.label.as_f64().is_some());

    let bars: Vec<Bar> = summary
        .entries
        .iter()
        .zip(&xs)
        .map(|(entry, &x)| {
            Bar::new(x, entry.value as f64)
                .width(0.8)
                .name(entry.label.to_string())
        })
        .collect();

    let mut plot = Plot::new(id.to_string())
        .height(height)
        .allow_scroll(false)
        .x_axis_label(summary.dimension.as_str())
        .y_axis_label("count");
    if !numeric {
        plot = plot.x_axis_formatter(category_formatter(names));
    }
    plot.show(ui, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE));
    });
}

// ---------------------------------------------------------------------------
// Box plot
// ---------------------------------------------------------------------------

fn box_plot(ui: &mut Ui, id: &str, dist: &DistributionSummary, height: f32) {
    let numeric = dist.dimension.is_some() && dist.labels.iter().all(|l| l.as_f64().is_some());
    let (xs, names) = x_positions(dist.labels.iter());
    let xs = if dist.labels.is_empty() { vec![0.0] } else { xs };
    let width = if numeric { box_width(&xs) } else { 0.6 };

    let mut boxes = Vec::new();
    let mut outliers = Vec::new();
    for (partition, &x) in dist.partitions.iter().zip(&xs) {
        let Some(stats) = &partition.stats else {
            continue;
        };
        let spread = BoxSpread::new(
            stats.lower_whisker,
            stats.q1,
            stats.median,
            stats.q3,
            stats.upper_whisker,
        );
        boxes.push(
            BoxElem::new(x, spread)
                .name(partition_name(partition))
                .box_width(width),
        );
        outliers.extend(stats.outliers.iter().map(|&y| [x, y]));
    }

    let x_label = dist.dimension.map_or("", |d| d.as_str());
    let mut plot = Plot::new(id.to_string())
        .height(height)
        .allow_scroll(false)
        .x_axis_label(x_label)
        .y_axis_label("rate");
    if !numeric {
        plot = plot.x_axis_formatter(category_formatter(names));
    }
    plot.show(ui, |plot_ui| {
        plot_ui.box_plot(BoxPlot::new(boxes).color(Color32::LIGHT_BLUE));
        plot_ui.points(
            Points::new(PlotPoints::from(outliers))
                .radius(1.5)
                .color(Color32::LIGHT_BLUE),
        );
    });
}

fn partition_name(partition: &Partition) -> String {
    match &partition.label {
        Some(label) => format!("{label} ({} plans)", partition.rates.len()),
        None => format!("all ({} plans)", partition.rates.len()),
    }
}

/// 60% of the smallest gap between neighbouring numeric positions.
fn box_width(xs: &[f64]) -> f64 {
    xs.windows(2)
        .map(|w| w[1] - w[0])
        .fold(f64::INFINITY, f64::min)
        .min(1.0)
        * 0.6
}

// ---------------------------------------------------------------------------
// Mean / median lines
// ---------------------------------------------------------------------------

fn mean_median_lines(ui: &mut Ui, id: &str, summary: &Summary<MeanMedian>, height: f32) {
    let (xs, names) = x_positions(summary.labels());
    let numeric = summary.entries.iter().all(|e| e.label.as_f64().is_some());
    let colors = generate_palette(2);

    let series = |pick: fn(&MeanMedian) -> f64| -> Vec<[f64; 2]> {
        summary
            .entries
            .iter()
            .zip(&xs)
            .map(|(entry, &x)| [x, pick(&entry.value)])
            .collect()
    };
    let median = series(|v| v.median);
    let mean = series(|v| v.mean);

    let mut plot = Plot::new(id.to_string())
        .height(height)
        .allow_scroll(false)
        .legend(Legend::default())
        .x_axis_label(summary.dimension.as_str())
        .y_axis_label("rate");
    if !numeric {
        plot = plot.x_axis_formatter(category_formatter(names));
    }
    plot.show(ui, |plot_ui| {
        plot_ui.line(
            Line::new(PlotPoints::from(median))
                .name("median")
                .color(colors[0])
                .width(1.5),
        );
        plot_ui.line(
            Line::new(PlotPoints::from(mean))
                .name("mean")
                .color(colors[1])
                .width(1.5),
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_positions_text_and_numbers() {
        let labels = [Label::Text("NY".into()), Label::Text("CA".into())];
        let (xs, names) = x_positions(labels.iter());
        assert_eq!(xs, vec![0.0, 1.0]);
        assert_eq!(names, vec!["NY", "CA"]);

        let labels = [Label::Number(2014), Label::Number(2016)];
        let (xs, _) = x_positions(labels.iter());
        assert_eq!(xs, vec![2014.0, 2016.0]);
    }

    #[test]
    fn test_box_width() {
        assert!((box_width(&[20.0, 21.0, 30.0]) - 0.6).abs() < 1e-12);
        assert!((box_width(&[2014.0]) - 0.6).abs() < 1e-12);
    }
}
