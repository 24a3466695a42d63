//! Row Filtering Module
//! Year and term filters plus the per-render filter selection.

use polars::prelude::*;
use std::collections::BTreeSet;

use super::schema::{Term, COL_TERM, COL_YEAR};

/// How KPI scalars treat the two term rows of each year.
///
/// Some datasets duplicate the aggregate values across Spring and Fall,
/// others carry genuinely distinct per-term values. The two readings
/// produce materially different totals, so the choice is a user-visible
/// setting rather than an implicit default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermPolicy {
    /// Restrict KPI input to the selected term so duplicated per-term
    /// aggregates are not double-counted.
    SingleTermDedup,
    /// Aggregate across both terms; appropriate when term rows differ.
    BothTermsDistinct,
}

impl Default for TermPolicy {
    fn default() -> Self {
        TermPolicy::SingleTermDedup
    }
}

impl TermPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            TermPolicy::SingleTermDedup => "Single term (dedup)",
            TermPolicy::BothTermsDistinct => "Both terms (distinct)",
        }
    }
}

/// The user's current filter choices. Rebuilt on every render pass,
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    /// Selected academic years. Empty set selects nothing.
    pub years: BTreeSet<i64>,
    /// The single selected term.
    pub term: Term,
}

/// Keep only rows whose year is in the selected set.
///
/// An empty selection yields an empty table, not an error; downstream
/// reductions define their own empty-input values.
pub fn filter_by_year(df: &DataFrame, years: &BTreeSet<i64>) -> PolarsResult<DataFrame> {
    let year_col = df.column(COL_YEAR)?.cast(&DataType::Int64)?;
    let year_ca = year_col.i64()?;

    let mask: BooleanChunked = year_ca
        .into_iter()
        .map(|y| y.is_some_and(|y| years.contains(&y)))
        .collect();

    df.filter(&mask)
}

/// Keep only rows matching exactly the given term.
pub fn filter_by_term(df: &DataFrame, term: Term) -> PolarsResult<DataFrame> {
    df.clone()
        .lazy()
        .filter(col(COL_TERM).eq(lit(term.as_str())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> DataFrame {
        df!(
            COL_YEAR => [2015i64, 2015, 2016, 2016, 2017],
            COL_TERM => ["Spring", "Fall", "Spring", "Fall", "Spring"],
            "Enrolled" => [50i64, 50, 60, 60, 70],
        )
        .unwrap()
    }

    fn years(values: &[i64]) -> BTreeSet<i64> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_filter_by_year_membership() {
        let df = sample_table();
        let filtered = filter_by_year(&df, &years(&[2015])).unwrap();
        assert_eq!(filtered.height(), 2);

        let year_col = filtered.column(COL_YEAR).unwrap().clone();
        let ca = year_col.i64().unwrap();
        assert!(ca.into_iter().all(|y| y == Some(2015)));
    }

    #[test]
    fn test_filter_by_year_full_set_is_identity() {
        let df = sample_table();
        let filtered = filter_by_year(&df, &years(&[2015, 2016, 2017])).unwrap();
        assert_eq!(filtered, df);
    }

    #[test]
    fn test_filter_by_year_empty_selection_yields_empty_table() {
        let df = sample_table();
        let filtered = filter_by_year(&df, &BTreeSet::new()).unwrap();
        assert_eq!(filtered.height(), 0);
        // Schema survives so downstream reductions stay well-defined
        assert_eq!(filtered.width(), df.width());
    }

    #[test]
    fn test_filter_by_year_unknown_year_matches_nothing() {
        let df = sample_table();
        let filtered = filter_by_year(&df, &years(&[1999])).unwrap();
        assert_eq!(filtered.height(), 0);
    }

    #[test]
    fn test_filter_by_term() {
        let df = sample_table();
        let spring = filter_by_term(&df, Term::Spring).unwrap();
        assert_eq!(spring.height(), 3);
        let fall = filter_by_term(&df, Term::Fall).unwrap();
        assert_eq!(fall.height(), 2);
    }

    #[test]
    fn test_selection_with_all_years_keeps_every_row() {
        let selection = FilterSelection {
            years: years(&[2015, 2016, 2017]),
            term: Term::default(),
        };
        assert_eq!(selection.term, Term::Spring);

        let df = sample_table();
        let filtered = filter_by_year(&df, &selection.years).unwrap();
        assert_eq!(filtered.height(), df.height());
    }
}
