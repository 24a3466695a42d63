//! Stats module - KPI computation

mod kpis;

pub use kpis::{compute_kpis, format_count, format_percent, Kpis};
