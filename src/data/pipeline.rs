//! Aggregation Pipeline Module
//! One pure pass from the base table to everything the dashboard renders.

use polars::prelude::*;
use thiserror::Error;

use super::filter::{filter_by_term, filter_by_year, FilterSelection, TermPolicy};
use super::schema::{COL_DEPARTMENT, COL_ENROLLED, COL_TERM, COL_YEAR, DEPARTMENT_COLS};
use crate::stats::{compute_kpis, Kpis};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Everything one render pass consumes. Recomputed from scratch on every
/// filter change; owned by the rendering step.
#[derive(Debug, Clone)]
pub struct DashboardFrames {
    /// Scalar summary statistics for the metric cards.
    pub kpis: Kpis,
    /// Year-sorted rows of the selected term, for the trend lines.
    pub trends: DataFrame,
    /// Long-format department table: group keys + Department + Enrolled.
    pub departments: DataFrame,
    /// (Year, Term, Enrolled) rows for the Spring-vs-Fall comparison.
    pub term_breakdown: DataFrame,
}

/// Generic wide-to-long reshape.
///
/// Unrolls each source row into one output row per value column, carrying
/// the id columns along unchanged. Output order is source-row-major,
/// value-column-minor, so consumers that assign colors by category see a
/// stable category sequence.
pub fn melt(
    df: &DataFrame,
    id_vars: &[&str],
    value_vars: &[&str],
    var_name: &str,
    value_name: &str,
) -> PolarsResult<DataFrame> {
    let height = df.height();
    let k = value_vars.len();

    // Replicate each source row once per value column; take() keeps the
    // id columns' native dtypes.
    let indices: Vec<IdxSize> = (0..height)
        .flat_map(|i| std::iter::repeat(i as IdxSize).take(k))
        .collect();
    let indices = IdxCa::from_vec("idx".into(), indices);
    let mut out = df.select(id_vars.iter().copied())?.take(&indices)?;

    let mut value_cols = Vec::with_capacity(k);
    for name in value_vars {
        value_cols.push((*name, df.column(name)?.cast(&DataType::Float64)?));
    }

    let mut names: Vec<String> = Vec::with_capacity(height * k);
    let mut values: Vec<f64> = Vec::with_capacity(height * k);
    for i in 0..height {
        for (name, col) in &value_cols {
            names.push((*name).to_string());
            values.push(col.f64()?.get(i).unwrap_or(f64::NAN));
        }
    }

    out.with_column(Column::new(var_name.into(), names))?;
    out.with_column(Column::new(value_name.into(), values))?;
    Ok(out)
}

/// Pivot the four department columns into long format.
///
/// Group keys depend on the term policy: a term-deduplicated table is keyed
/// by year alone, a both-terms table by (year, term). Rows come out
/// year-major with departments cycling in their fixed order.
pub fn reshape_departments(df: &DataFrame, policy: TermPolicy) -> PolarsResult<DataFrame> {
    let id_vars: &[&str] = match policy {
        TermPolicy::SingleTermDedup => &[COL_YEAR],
        TermPolicy::BothTermsDistinct => &[COL_YEAR, COL_TERM],
    };

    let sorted = df.sort(id_vars.to_vec(), SortMultipleOptions::default())?;
    melt(&sorted, id_vars, &DEPARTMENT_COLS, COL_DEPARTMENT, COL_ENROLLED)
}

/// Per-term enrollment rows for the grouped-bar comparison.
///
/// The source already carries one enrolled value per year and term, so this
/// is a pass-through selection, not an aggregation.
pub fn term_breakdown(df: &DataFrame) -> PolarsResult<DataFrame> {
    df.select([COL_YEAR, COL_TERM, COL_ENROLLED])?
        .sort([COL_YEAR], SortMultipleOptions::default())
}

/// Run the whole pipeline for one filter selection.
///
/// Single-threaded and synchronous: each call recomputes every output from
/// the base table with no caching of intermediates.
pub fn run_pipeline(
    df: &DataFrame,
    selection: &FilterSelection,
    policy: TermPolicy,
) -> Result<DashboardFrames, PipelineError> {
    let by_year = filter_by_year(df, &selection.years)?;
    let term_rows = filter_by_term(&by_year, selection.term)?;

    let kpi_input = match policy {
        TermPolicy::SingleTermDedup => &term_rows,
        TermPolicy::BothTermsDistinct => &by_year,
    };

    let kpis = compute_kpis(kpi_input)?;
    let departments = reshape_departments(kpi_input, policy)?;
    let breakdown = term_breakdown(&by_year)?;
    let trends = term_rows.sort([COL_YEAR], SortMultipleOptions::default())?;

    Ok(DashboardFrames {
        kpis,
        trends,
        departments,
        term_breakdown: breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::Term;
    use std::collections::BTreeSet;

    /// Two years, two terms each, aggregates duplicated across terms the
    /// way the canonical dataset duplicates them.
    fn sample_table() -> DataFrame {
        df!(
            COL_YEAR => [2015i64, 2015, 2016, 2016],
            COL_TERM => ["Spring", "Fall", "Spring", "Fall"],
            "Applications" => [100i64, 150, 120, 130],
            "Admitted" => [60i64, 90, 70, 80],
            COL_ENROLLED => [50i64, 80, 60, 70],
            "Retention Rate (%)" => [85.0f64, 85.0, 87.0, 87.0],
            "Student Satisfaction (%)" => [78.0f64, 78.0, 80.0, 80.0],
            "Engineering Enrolled" => [20i64, 30, 25, 28],
            "Business Enrolled" => [15i64, 25, 18, 20],
            "Arts Enrolled" => [10i64, 15, 10, 12],
            "Science Enrolled" => [5i64, 10, 7, 10],
        )
        .unwrap()
    }

    fn selection(years: &[i64], term: Term) -> FilterSelection {
        FilterSelection {
            years: years.iter().copied().collect(),
            term,
        }
    }

    fn strings(df: &DataFrame, col: &str) -> Vec<String> {
        let column = df.column(col).unwrap().cast(&DataType::String).unwrap();
        let ca = column.str().unwrap();
        ca.into_iter().map(|v| v.unwrap().to_string()).collect()
    }

    fn floats(df: &DataFrame, col: &str) -> Vec<f64> {
        let column = df.column(col).unwrap().cast(&DataType::Float64).unwrap();
        let ca = column.f64().unwrap();
        ca.into_iter().map(|v| v.unwrap()).collect()
    }

    #[test]
    fn test_melt_row_count_and_order() {
        let df = sample_table();
        let long = melt(
            &df,
            &[COL_YEAR],
            &DEPARTMENT_COLS,
            COL_DEPARTMENT,
            COL_ENROLLED,
        )
        .unwrap();

        // 4 rows x 4 departments
        assert_eq!(long.height(), 16);

        // Departments cycle in fixed order within each source row
        let depts = strings(&long, COL_DEPARTMENT);
        for (i, dept) in depts.iter().enumerate() {
            assert_eq!(dept, DEPARTMENT_COLS[i % 4]);
        }
    }

    #[test]
    fn test_melt_single_row_values() {
        let df = df!(
            COL_YEAR => [2020i64],
            "Engineering Enrolled" => [50i64],
            "Business Enrolled" => [30i64],
            "Arts Enrolled" => [20i64],
            "Science Enrolled" => [10i64],
        )
        .unwrap();

        let long = melt(
            &df,
            &[COL_YEAR],
            &DEPARTMENT_COLS,
            COL_DEPARTMENT,
            COL_ENROLLED,
        )
        .unwrap();

        assert_eq!(long.height(), 4);
        assert_eq!(floats(&long, COL_ENROLLED), vec![50.0, 30.0, 20.0, 10.0]);
    }

    #[test]
    fn test_reshape_preserves_per_year_totals() {
        let df = sample_table();
        let long = reshape_departments(&df, TermPolicy::BothTermsDistinct).unwrap();

        let year_col = long.column(COL_YEAR).unwrap();
        let years = year_col.i64().unwrap();
        let enrolled = floats(&long, COL_ENROLLED);

        let mut total_2015 = 0.0;
        for (year, value) in years.into_iter().zip(enrolled) {
            if year == Some(2015) {
                total_2015 += value;
            }
        }
        // 20+15+10+5 (Spring) + 30+25+15+10 (Fall)
        assert_eq!(total_2015, 130.0);
    }

    #[test]
    fn test_kpis_single_term_dedup() {
        let df = sample_table();
        let frames = run_pipeline(
            &df,
            &selection(&[2015, 2016], Term::Spring),
            TermPolicy::SingleTermDedup,
        )
        .unwrap();

        // Only Spring rows of each year are summed
        assert_eq!(frames.kpis.total_applications, 220);
        assert_eq!(frames.kpis.total_enrolled, 110);
        assert!((frames.kpis.avg_retention - 86.0).abs() < 1e-9);
    }

    #[test]
    fn test_kpis_both_terms_distinct() {
        let df = sample_table();
        let frames = run_pipeline(
            &df,
            &selection(&[2015, 2016], Term::Spring),
            TermPolicy::BothTermsDistinct,
        )
        .unwrap();

        assert_eq!(frames.kpis.total_applications, 500);
        assert_eq!(frames.kpis.total_enrolled, 260);
    }

    #[test]
    fn test_kpi_sums_are_linear_over_disjoint_years() {
        let df = sample_table();
        let policy = TermPolicy::BothTermsDistinct;

        let both = run_pipeline(&df, &selection(&[2015, 2016], Term::Spring), policy).unwrap();
        let first = run_pipeline(&df, &selection(&[2015], Term::Spring), policy).unwrap();
        let second = run_pipeline(&df, &selection(&[2016], Term::Spring), policy).unwrap();

        assert_eq!(
            both.kpis.total_applications,
            first.kpis.total_applications + second.kpis.total_applications
        );
        assert_eq!(
            both.kpis.total_admitted,
            first.kpis.total_admitted + second.kpis.total_admitted
        );
        assert_eq!(
            both.kpis.total_enrolled,
            first.kpis.total_enrolled + second.kpis.total_enrolled
        );
    }

    #[test]
    fn test_empty_selection_yields_zero_sums_and_nan_means() {
        let df = sample_table();
        let empty = FilterSelection {
            years: BTreeSet::new(),
            term: Term::Spring,
        };
        let frames = run_pipeline(&df, &empty, TermPolicy::SingleTermDedup).unwrap();

        assert_eq!(frames.kpis.total_applications, 0);
        assert_eq!(frames.kpis.total_admitted, 0);
        assert_eq!(frames.kpis.total_enrolled, 0);
        assert!(frames.kpis.avg_retention.is_nan());
        assert!(frames.kpis.avg_satisfaction.is_nan());
        assert_eq!(frames.departments.height(), 0);
        assert_eq!(frames.term_breakdown.height(), 0);
    }

    #[test]
    fn test_term_breakdown_is_pass_through() {
        let df = sample_table();
        let breakdown = term_breakdown(&df).unwrap();

        assert_eq!(breakdown.height(), df.height());
        assert_eq!(breakdown.width(), 3);

        let terms = strings(&breakdown, COL_TERM);
        assert_eq!(terms.iter().filter(|t| *t == "Spring").count(), 2);
        assert_eq!(terms.iter().filter(|t| *t == "Fall").count(), 2);
    }

    #[test]
    fn test_departments_keyed_by_policy() {
        let df = sample_table();

        let single = run_pipeline(
            &df,
            &selection(&[2015, 2016], Term::Spring),
            TermPolicy::SingleTermDedup,
        )
        .unwrap();
        // Term-filtered first: 2 rows x 4 departments, keyed by year alone
        assert_eq!(single.departments.height(), 8);
        assert!(single.departments.column(COL_TERM).is_err());

        let both = run_pipeline(
            &df,
            &selection(&[2015, 2016], Term::Spring),
            TermPolicy::BothTermsDistinct,
        )
        .unwrap();
        // All 4 rows x 4 departments, keyed by (year, term)
        assert_eq!(both.departments.height(), 16);
        assert!(both.departments.column(COL_TERM).is_ok());
    }

    #[test]
    fn test_trends_sorted_by_year() {
        let df = df!(
            COL_YEAR => [2017i64, 2015, 2016],
            COL_TERM => ["Spring", "Spring", "Spring"],
            "Applications" => [1i64, 2, 3],
            "Admitted" => [1i64, 1, 1],
            COL_ENROLLED => [1i64, 1, 1],
            "Retention Rate (%)" => [1.0f64, 1.0, 1.0],
            "Student Satisfaction (%)" => [1.0f64, 1.0, 1.0],
            "Engineering Enrolled" => [1i64, 1, 1],
            "Business Enrolled" => [0i64, 0, 0],
            "Arts Enrolled" => [0i64, 0, 0],
            "Science Enrolled" => [0i64, 0, 0],
        )
        .unwrap();

        let frames = run_pipeline(
            &df,
            &selection(&[2015, 2016, 2017], Term::Spring),
            TermPolicy::SingleTermDedup,
        )
        .unwrap();

        let years_col = frames.trends.column(COL_YEAR).unwrap();
        let years: Vec<i64> = years_col.i64().unwrap().into_iter().flatten().collect();
        assert_eq!(years, vec![2015, 2016, 2017]);
    }
}
