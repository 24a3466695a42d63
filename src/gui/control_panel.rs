//! Control Panel Widget
//! Left side panel with the data source, filter controls and settings.

use crate::data::schema::Term;
use crate::data::{FilterSelection, TermPolicy};
use egui::{Color32, ComboBox, RichText, ScrollArea};
use std::path::PathBuf;

/// Left side control panel with file selection and filter controls.
pub struct ControlPanel {
    pub csv_path: Option<PathBuf>,
    /// Years available in the loaded data, sorted ascending.
    pub years: Vec<i64>,
    /// Checkbox state parallel to `years`.
    pub selected_years: Vec<bool>,
    pub term: Term,
    pub policy: TermPolicy,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            csv_path: None,
            years: Vec::new(),
            selected_years: Vec::new(),
            term: Term::default(),
            policy: TermPolicy::default(),
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update available years after CSV load; all selected by default.
    pub fn update_years(&mut self, years: Vec<i64>) {
        self.selected_years = vec![true; years.len()];
        self.years = years;
    }

    /// Build the ephemeral filter selection for this render pass.
    pub fn selection(&self) -> FilterSelection {
        FilterSelection {
            years: self
                .years
                .iter()
                .zip(self.selected_years.iter())
                .filter(|(_, &selected)| selected)
                .map(|(&year, _)| year)
                .collect(),
            term: self.term,
        }
    }

    /// Set the status line.
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🎓 UniDash")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Enrollment Analytics")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Year Filter Section =====
        ui.label(RichText::new("🗓 Years").size(14.0).strong());
        ui.add_space(5.0);

        if self.years.is_empty() {
            ui.label(RichText::new("Load a CSV to filter").size(11.0).color(Color32::GRAY));
        } else {
            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(5.0)
                .show(ui, |ui| {
                    ScrollArea::vertical().max_height(140.0).show(ui, |ui| {
                        for (i, year) in self.years.iter().enumerate() {
                            if i < self.selected_years.len()
                                && ui
                                    .checkbox(&mut self.selected_years[i], year.to_string())
                                    .changed()
                            {
                                action = ControlPanelAction::SelectionChanged;
                            }
                        }
                    });
                });

            ui.add_space(5.0);
            ui.horizontal(|ui| {
                if ui.small_button("Select All").clicked() {
                    self.selected_years.iter_mut().for_each(|v| *v = true);
                    action = ControlPanelAction::SelectionChanged;
                }
                if ui.small_button("Clear All").clicked() {
                    self.selected_years.iter_mut().for_each(|v| *v = false);
                    action = ControlPanelAction::SelectionChanged;
                }
            });
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Term Section =====
        ui.label(RichText::new("🌤 Term").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([70.0, 20.0], egui::Label::new("Term:"));
            ComboBox::from_id_salt("term_select")
                .width(150.0)
                .selected_text(self.term.as_str())
                .show_ui(ui, |ui| {
                    for term in Term::ALL {
                        if ui
                            .selectable_label(self.term == term, term.as_str())
                            .clicked()
                            && self.term != term
                        {
                            self.term = term;
                            action = ControlPanelAction::SelectionChanged;
                        }
                    }
                });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Aggregation Section =====
        ui.label(RichText::new("⚙️ Term Aggregation").size(14.0).strong());
        ui.add_space(5.0);

        for policy in [TermPolicy::SingleTermDedup, TermPolicy::BothTermsDistinct] {
            if ui
                .radio_value(&mut self.policy, policy, policy.label())
                .changed()
            {
                action = ControlPanelAction::SelectionChanged;
            }
        }
        ui.label(
            RichText::new("Single term avoids double-counting years whose Spring and Fall rows duplicate the same totals.")
                .size(10.0)
                .color(Color32::GRAY),
        );

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("💾 Export Summary").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportSummary;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    SelectionChanged,
    ExportSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_reflects_checkboxes() {
        let mut panel = ControlPanel::new();
        panel.update_years(vec![2015, 2016, 2017]);
        panel.selected_years[1] = false;

        let selection = panel.selection();
        assert!(selection.years.contains(&2015));
        assert!(!selection.years.contains(&2016));
        assert!(selection.years.contains(&2017));
    }

    #[test]
    fn test_update_years_selects_all_by_default() {
        let mut panel = ControlPanel::new();
        panel.update_years(vec![2015, 2016]);
        assert_eq!(panel.selection().years.len(), 2);
    }
}
