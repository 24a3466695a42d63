//! Data module - CSV loading, filtering and the aggregation pipeline

mod filter;
mod loader;
mod pipeline;
pub mod schema;

pub use filter::{filter_by_term, filter_by_year, FilterSelection, TermPolicy};
pub use loader::{check_department_totals, load_enrollment_csv, DataLoadError, DataLoader};
pub use pipeline::{
    melt, reshape_departments, run_pipeline, term_breakdown, DashboardFrames, PipelineError,
};
