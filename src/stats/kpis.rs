//! KPI Calculator Module
//! Scalar summary statistics over a filtered enrollment table.

use polars::prelude::*;
use serde::Serialize;

use crate::data::schema::{
    COL_ADMITTED, COL_APPLICATIONS, COL_ENROLLED, COL_RETENTION, COL_SATISFACTION,
};

/// The five dashboard scalars plus the row count they were computed from.
///
/// Sums over an empty table are 0. Means over an empty table are `NaN` --
/// a deliberate "no data" sentinel, since 0 would be a misleading mean.
#[derive(Debug, Clone, Serialize)]
pub struct Kpis {
    pub total_applications: i64,
    pub total_admitted: i64,
    pub total_enrolled: i64,
    pub avg_retention: f64,
    pub avg_satisfaction: f64,
    pub row_count: usize,
}

impl Default for Kpis {
    fn default() -> Self {
        Self {
            total_applications: 0,
            total_admitted: 0,
            total_enrolled: 0,
            avg_retention: f64::NAN,
            avg_satisfaction: f64::NAN,
            row_count: 0,
        }
    }
}

impl Kpis {
    pub fn has_data(&self) -> bool {
        self.row_count > 0
    }
}

fn sum_i64(df: &DataFrame, name: &str) -> PolarsResult<i64> {
    let col = df.column(name)?.cast(&DataType::Int64)?;
    Ok(col.i64()?.sum().unwrap_or(0))
}

fn mean_f64(df: &DataFrame, name: &str) -> PolarsResult<f64> {
    let col = df.column(name)?.cast(&DataType::Float64)?;
    Ok(col.f64()?.mean().unwrap_or(f64::NAN))
}

/// Compute the KPI scalars for an already-filtered table.
pub fn compute_kpis(df: &DataFrame) -> PolarsResult<Kpis> {
    Ok(Kpis {
        total_applications: sum_i64(df, COL_APPLICATIONS)?,
        total_admitted: sum_i64(df, COL_ADMITTED)?,
        total_enrolled: sum_i64(df, COL_ENROLLED)?,
        avg_retention: mean_f64(df, COL_RETENTION)?,
        avg_satisfaction: mean_f64(df, COL_SATISFACTION)?,
        row_count: df.height(),
    })
}

/// Format a percentage mean for display, rendering the NaN sentinel as
/// "no data" instead of a number.
pub fn format_percent(value: f64) -> String {
    if value.is_nan() {
        "no data".to_string()
    } else {
        format!("{value:.2}%")
    }
}

/// Format a count with thousands separators.
pub fn format_count(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> DataFrame {
        df!(
            COL_APPLICATIONS => [100i64, 150, 120],
            COL_ADMITTED => [60i64, 90, 70],
            COL_ENROLLED => [50i64, 80, 60],
            COL_RETENTION => [84.0f64, 86.0, 88.0],
            COL_SATISFACTION => [78.0f64, 80.0, 82.0],
        )
        .unwrap()
    }

    #[test]
    fn test_compute_kpis() {
        let kpis = compute_kpis(&sample_table()).unwrap();
        assert_eq!(kpis.total_applications, 370);
        assert_eq!(kpis.total_admitted, 220);
        assert_eq!(kpis.total_enrolled, 190);
        assert!((kpis.avg_retention - 86.0).abs() < 1e-9);
        assert!((kpis.avg_satisfaction - 80.0).abs() < 1e-9);
        assert_eq!(kpis.row_count, 3);
        assert!(kpis.has_data());
    }

    #[test]
    fn test_empty_table_sums_zero_means_nan() {
        let df = sample_table();
        let empty = df.head(Some(0));

        let kpis = compute_kpis(&empty).unwrap();
        assert_eq!(kpis.total_applications, 0);
        assert_eq!(kpis.total_admitted, 0);
        assert_eq!(kpis.total_enrolled, 0);
        assert!(kpis.avg_retention.is_nan());
        assert!(kpis.avg_satisfaction.is_nan());
        assert!(!kpis.has_data());
    }

    #[test]
    fn test_format_percent_sentinel() {
        assert_eq!(format_percent(86.125), "86.13%");
        assert_eq!(format_percent(f64::NAN), "no data");
    }

    #[test]
    fn test_format_count_groups_digits() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(950), "950");
        assert_eq!(format_count(59400), "59,400");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
