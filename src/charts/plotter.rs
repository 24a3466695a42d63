//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

/// Color palette for series, assigned by category index so legend colors
/// stay stable across filter changes.
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(255, 87, 34),   // Deep Orange
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

const CHART_HEIGHT: f32 = 280.0;

/// A named sequence of (x, y) points for one chart series.
#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

/// Creates dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get the stable color for a category index.
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Draw one or more line series over years with point markers.
    pub fn draw_line_chart(ui: &mut egui::Ui, id: &str, y_label: &str, series: &[Series]) {
        Plot::new(id.to_string())
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label(y_label)
            .legend(Legend::default())
            .x_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
            .show(ui, |plot_ui| {
                for (i, s) in series.iter().enumerate() {
                    let color = Self::series_color(i);

                    let line_points: PlotPoints = s.points.iter().copied().collect();
                    plot_ui.line(Line::new(line_points).color(color).width(2.0).name(&s.name));

                    let marker_points: PlotPoints = s.points.iter().copied().collect();
                    plot_ui.points(Points::new(marker_points).radius(3.0).color(color));
                }
            });
    }

    /// Draw series as stacked bars, one stack per x value.
    ///
    /// Bars accumulate a base offset per x position, so series are stacked
    /// in the order given.
    pub fn draw_stacked_bar_chart(ui: &mut egui::Ui, id: &str, y_label: &str, series: &[Series]) {
        Plot::new(id.to_string())
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label(y_label)
            .legend(Legend::default())
            .x_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
            .show(ui, |plot_ui| {
                let mut base: std::collections::HashMap<i64, f64> =
                    std::collections::HashMap::new();

                for (i, s) in series.iter().enumerate() {
                    let color = Self::series_color(i);
                    let bars: Vec<Bar> = s
                        .points
                        .iter()
                        .map(|&[x, y]| {
                            let offset = base.entry(x.round() as i64).or_insert(0.0);
                            let bar = Bar::new(x, y)
                                .width(0.6)
                                .base_offset(*offset)
                                .fill(color);
                            *offset += y;
                            bar
                        })
                        .collect();

                    plot_ui.bar_chart(BarChart::new(bars).color(color).name(&s.name));
                }
            });
    }

    /// Draw series as side-by-side bars around each x value.
    pub fn draw_grouped_bar_chart(ui: &mut egui::Ui, id: &str, y_label: &str, series: &[Series]) {
        let group_count = series.len().max(1) as f64;
        let slot_width = 0.8 / group_count;

        Plot::new(id.to_string())
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label(y_label)
            .legend(Legend::default())
            .x_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
            .show(ui, |plot_ui| {
                for (i, s) in series.iter().enumerate() {
                    let color = Self::series_color(i);
                    let x_offset = (i as f64 - (group_count - 1.0) / 2.0) * slot_width;

                    let bars: Vec<Bar> = s
                        .points
                        .iter()
                        .map(|&[x, y]| Bar::new(x + x_offset, y).width(slot_width * 0.9).fill(color))
                        .collect();

                    plot_ui.bar_chart(BarChart::new(bars).color(color).name(&s.name));
                }
            });
    }
}
