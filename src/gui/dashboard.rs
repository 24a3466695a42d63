//! Dashboard Widget
//! Central panel with KPI metric cards and the enrollment charts.

use crate::charts::{ChartPlotter, Series};
use crate::data::schema::{
    COL_ADMITTED, COL_APPLICATIONS, COL_DEPARTMENT, COL_ENROLLED, COL_RETENTION,
    COL_SATISFACTION, COL_TERM, COL_YEAR,
};
use crate::data::DashboardFrames;
use crate::stats::{format_count, format_percent};
use egui::{Color32, RichText, ScrollArea};
use polars::prelude::*;

/// Scrollable dashboard area fed by the latest pipeline output.
pub struct Dashboard {
    pub frames: Option<DashboardFrames>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self { frames: None }
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.frames = None;
    }

    pub fn set_frames(&mut self, frames: DashboardFrames) {
        self.frames = Some(frames);
    }

    /// Draw the dashboard
    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(frames) = &self.frames else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(5.0);
                ui.label(
                    RichText::new("University Enrollment Dashboard")
                        .size(20.0)
                        .strong(),
                );
                ui.add_space(10.0);

                // ===== KPI metric cards =====
                let kpis = &frames.kpis;
                ui.horizontal_wrapped(|ui| {
                    Self::metric_card(ui, "Total Applications", &format_count(kpis.total_applications));
                    Self::metric_card(ui, "Total Admitted", &format_count(kpis.total_admitted));
                    Self::metric_card(ui, "Total Enrolled", &format_count(kpis.total_enrolled));
                    Self::metric_card(ui, "Avg. Retention Rate", &format_percent(kpis.avg_retention));
                    Self::metric_card(ui, "Avg. Satisfaction", &format_percent(kpis.avg_satisfaction));
                });

                if !kpis.has_data() {
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("No rows match the current filters")
                            .size(12.0)
                            .color(Color32::GRAY),
                    );
                }

                ui.add_space(15.0);
                ui.separator();
                ui.add_space(10.0);

                // ===== Trend charts =====
                let funnel = [COL_APPLICATIONS, COL_ADMITTED, COL_ENROLLED]
                    .iter()
                    .filter_map(|name| Self::numeric_series(&frames.trends, name).ok())
                    .collect::<Vec<_>>();
                Self::chart_header(ui, "Applications, Admissions and Enrollments Over Time");
                ChartPlotter::draw_line_chart(ui, "funnel_trend", "Count", &funnel);

                ui.add_space(15.0);

                let rates = [COL_RETENTION, COL_SATISFACTION]
                    .iter()
                    .filter_map(|name| Self::numeric_series(&frames.trends, name).ok())
                    .collect::<Vec<_>>();
                Self::chart_header(ui, "Retention Rate and Satisfaction Trends");
                ChartPlotter::draw_line_chart(ui, "rate_trend", "Percentage", &rates);

                ui.add_space(15.0);

                // ===== Department charts =====
                let departments =
                    Self::category_series(&frames.departments, COL_DEPARTMENT, COL_ENROLLED)
                        .unwrap_or_default();
                Self::chart_header(ui, "Enrollment Breakdown by Department");
                ChartPlotter::draw_stacked_bar_chart(ui, "dept_stack", "Enrolled", &departments);

                ui.add_space(15.0);

                Self::chart_header(ui, "Department Enrollment Trends Over Time");
                ChartPlotter::draw_line_chart(ui, "dept_trend", "Enrolled", &departments);

                ui.add_space(15.0);

                // ===== Term comparison =====
                let terms = Self::category_series(&frames.term_breakdown, COL_TERM, COL_ENROLLED)
                    .unwrap_or_default();
                Self::chart_header(ui, "Spring vs. Fall Enrollment");
                ChartPlotter::draw_grouped_bar_chart(ui, "term_compare", "Enrolled", &terms);

                ui.add_space(20.0);
            });
    }

    fn chart_header(ui: &mut egui::Ui, title: &str) {
        ui.label(RichText::new(title).size(14.0).strong());
        ui.add_space(5.0);
    }

    fn metric_card(ui: &mut egui::Ui, label: &str, value: &str) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new(label).size(11.0).color(Color32::GRAY));
                    ui.label(RichText::new(value).size(20.0).strong());
                });
            });
        ui.add_space(8.0);
    }

    /// One series of (year, value) points from a numeric column.
    fn numeric_series(df: &DataFrame, value_col: &str) -> PolarsResult<Series> {
        let x_col = df.column(COL_YEAR)?.cast(&DataType::Float64)?;
        let x_ca = x_col.f64()?;
        let y_col = df.column(value_col)?.cast(&DataType::Float64)?;
        let y_ca = y_col.f64()?;

        let mut points = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            if let (Some(x), Some(y)) = (x_ca.get(i), y_ca.get(i)) {
                points.push([x, y]);
            }
        }

        Ok(Series {
            name: value_col.to_string(),
            points,
        })
    }

    /// One series per category, in first-appearance order so reshaped
    /// tables keep their fixed category sequence (and thus colors).
    fn category_series(
        df: &DataFrame,
        category_col: &str,
        value_col: &str,
    ) -> PolarsResult<Vec<Series>> {
        let cat_col = df.column(category_col)?.cast(&DataType::String)?;
        let cat_ca = cat_col.str()?;
        let x_col = df.column(COL_YEAR)?.cast(&DataType::Float64)?;
        let x_ca = x_col.f64()?;
        let y_col = df.column(value_col)?.cast(&DataType::Float64)?;
        let y_ca = y_col.f64()?;

        let mut series: Vec<Series> = Vec::new();
        for i in 0..df.height() {
            let (Some(name), Some(x), Some(y)) = (cat_ca.get(i), x_ca.get(i), y_ca.get(i)) else {
                continue;
            };

            let label = name.strip_suffix(" Enrolled").unwrap_or(name);
            match series.iter_mut().find(|s| s.name == label) {
                Some(s) => s.points.push([x, y]),
                None => series.push(Series {
                    name: label.to_string(),
                    points: vec![[x, y]],
                }),
            }
        }

        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_series_keeps_first_appearance_order() {
        let df = df!(
            COL_YEAR => [2015i64, 2015, 2016, 2016],
            COL_DEPARTMENT => ["Engineering Enrolled", "Business Enrolled", "Engineering Enrolled", "Business Enrolled"],
            COL_ENROLLED => [20.0f64, 15.0, 25.0, 18.0],
        )
        .unwrap();

        let series = Dashboard::category_series(&df, COL_DEPARTMENT, COL_ENROLLED).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "Engineering");
        assert_eq!(series[1].name, "Business");
        assert_eq!(series[0].points, vec![[2015.0, 20.0], [2016.0, 25.0]]);
    }

    #[test]
    fn test_numeric_series_skips_nulls() {
        let df = df!(
            COL_YEAR => [2015i64, 2016],
            COL_ENROLLED => [Some(50i64), None],
        )
        .unwrap();

        let series = Dashboard::numeric_series(&df, COL_ENROLLED).unwrap();
        assert_eq!(series.points, vec![[2015.0, 50.0]]);
    }
}
