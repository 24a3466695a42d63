//! UniDash Main Application
//! Main window wiring the control panel, aggregation pipeline and dashboard.

use crate::data::{check_department_totals, load_enrollment_csv, run_pipeline, DataLoader};
use crate::gui::{ControlPanel, ControlPanelAction, Dashboard};
use anyhow::Context;
use egui::SidePanel;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// CSV loading result from background thread
enum LoadResult {
    Complete { df: DataFrame, path: PathBuf },
    Error(String),
}

/// Main application window.
pub struct UniDashApp {
    loader: DataLoader,
    control_panel: ControlPanel,
    dashboard: Dashboard,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl UniDashApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            loader: DataLoader::new(),
            control_panel: ControlPanel::new(),
            dashboard: Dashboard::new(),
            load_rx: None,
            is_loading: false,
        }
    }

    /// Handle CSV file selection; loads and validates off the UI thread.
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return; // Already loading
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.dashboard.clear();
            self.control_panel.csv_path = Some(path.clone());
            self.control_panel.set_status("Loading CSV file...");
            self.control_panel.export_enabled = false;
            self.is_loading = true;

            let (tx, rx) = channel();
            self.load_rx = Some(rx);

            let path_str = path.to_string_lossy().to_string();

            // Load and validate in background thread
            thread::spawn(move || match load_enrollment_csv(&path_str) {
                Ok(df) => {
                    let _ = tx.send(LoadResult::Complete { df, path });
                }
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            });
        }
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Complete { df, path } => {
                        match check_department_totals(&df) {
                            Ok(0) => {}
                            Ok(n) => log::warn!(
                                "{n} rows have department totals that do not match Enrolled"
                            ),
                            Err(e) => log::warn!("department consistency check failed: {e}"),
                        }

                        self.loader.set_dataframe(df, Some(path));
                        let rows = self.loader.get_row_count();
                        let years = self.loader.get_years();
                        log::info!("loaded {rows} rows covering {} years", years.len());

                        self.control_panel.update_years(years);
                        self.control_panel
                            .set_status(&format!("Loaded {rows} rows"));
                        self.is_loading = false;
                        should_keep_receiver = false;
                        self.recompute();
                    }
                    LoadResult::Error(error) => {
                        self.control_panel.set_status(&format!("Error: {error}"));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            // Put receiver back if still needed
            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// One full, blocking pipeline pass over the base table.
    fn recompute(&mut self) {
        let Some(df) = self.loader.get_dataframe() else {
            return;
        };

        let selection = self.control_panel.selection();
        match run_pipeline(df, &selection, self.control_panel.policy) {
            Ok(frames) => {
                self.dashboard.set_frames(frames);
                self.control_panel.export_enabled = true;
            }
            Err(e) => {
                self.dashboard.clear();
                self.control_panel.export_enabled = false;
                self.control_panel.set_status(&format!("Error: {e}"));
            }
        }
    }

    /// Handle summary export - serialize current KPIs and selection to JSON
    fn handle_export_summary(&mut self) {
        if self.dashboard.frames.is_none() {
            return;
        }

        let output_path = match rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("enrollment_summary.json")
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        match self.write_summary(&output_path) {
            Ok(()) => self
                .control_panel
                .set_status(&format!("Summary saved to {}", output_path.display())),
            Err(e) => self.control_panel.set_status(&format!("Error: {e:#}")),
        }
    }

    fn write_summary(&self, path: &Path) -> anyhow::Result<()> {
        let frames = self
            .dashboard
            .frames
            .as_ref()
            .context("no dashboard data")?;
        let selection = self.control_panel.selection();

        let summary = serde_json::json!({
            "source": self.loader.get_file_path().map(|p| p.display().to_string()),
            "years": selection.years.iter().collect::<Vec<_>>(),
            "term": selection.term.as_str(),
            "term_policy": self.control_panel.policy.label(),
            "kpis": frames.kpis,
        });

        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, &summary).context("writing summary JSON")?;
        Ok(())
    }
}

impl eframe::App for UniDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::SelectionChanged => self.recompute(),
                        ControlPanelAction::ExportSummary => self.handle_export_summary(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard.show(ui);
        });
    }
}
