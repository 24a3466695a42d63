//! CSV Data Loader Module
//! Handles enrollment CSV loading and schema validation using Polars.

use polars::prelude::*;
use std::path::PathBuf;
use thiserror::Error;

use super::schema::{COL_ENROLLED, COL_TERM, COL_YEAR, DEPARTMENT_COLS, REQUIRED_COLUMNS};

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Missing required columns: {0}")]
    MissingColumns(String),
    #[error("No data loaded")]
    NoData,
}

/// Load an enrollment CSV and validate it against the required schema.
pub fn load_enrollment_csv(file_path: &str) -> Result<DataFrame, DataLoadError> {
    // Use lazy evaluation for memory efficiency, then collect
    let df = LazyCsvReader::new(file_path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    validate_schema(&df)?;
    Ok(df)
}

/// Check that all required columns are present. Extra columns are fine.
pub fn validate_schema(df: &DataFrame) -> Result<(), DataLoadError> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|required| !names.iter().any(|n| n == required))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DataLoadError::MissingColumns(missing.join(", ")))
    }
}

/// Warn about rows whose department columns do not sum to `Enrolled`.
///
/// The data is expected to satisfy this but nothing enforces it, so
/// mismatches are logged and counted, never rejected.
pub fn check_department_totals(df: &DataFrame) -> Result<usize, DataLoadError> {
    let enrolled_col = df.column(COL_ENROLLED)?.cast(&DataType::Int64)?;
    let enrolled = enrolled_col.i64()?;
    let year_col = df.column(COL_YEAR)?.cast(&DataType::Int64)?;
    let years = year_col.i64()?;
    let term_col = df.column(COL_TERM)?.cast(&DataType::String)?;
    let terms = term_col.str()?;

    let mut dept_cols = Vec::with_capacity(DEPARTMENT_COLS.len());
    for name in DEPARTMENT_COLS {
        dept_cols.push(df.column(name)?.cast(&DataType::Int64)?);
    }

    let mut mismatches = 0;
    for i in 0..df.height() {
        let Some(expected) = enrolled.get(i) else {
            continue;
        };

        let mut total = 0i64;
        for col in &dept_cols {
            total += col.i64()?.get(i).unwrap_or(0);
        }

        if total != expected {
            mismatches += 1;
            log::warn!(
                "department totals for year {} term {} sum to {} but Enrolled is {}",
                years.get(i).unwrap_or(0),
                terms.get(i).unwrap_or("?"),
                total,
                expected
            );
        }
    }

    Ok(mismatches)
}

/// Holds the loaded enrollment table and its source path.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a CSV file from disk.
    pub fn load_csv(&mut self, file_path: &str) -> Result<&DataFrame, DataLoadError> {
        self.file_path = Some(PathBuf::from(file_path));
        let df = load_enrollment_csv(file_path)?;
        self.df = Some(df);
        self.df.as_ref().ok_or(DataLoadError::NoData)
    }

    /// Sorted unique academic years present in the data.
    pub fn get_years(&self) -> Vec<i64> {
        let Some(df) = &self.df else {
            return Vec::new();
        };

        let Ok(col) = df.column(COL_YEAR) else {
            return Vec::new();
        };
        let Ok(casted) = col.cast(&DataType::Int64) else {
            return Vec::new();
        };
        let Ok(ca) = casted.i64() else {
            return Vec::new();
        };

        let mut years: Vec<i64> = ca.into_iter().flatten().collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Set DataFrame directly (used for async loading)
    pub fn set_dataframe(&mut self, df: DataFrame, file_path: Option<PathBuf>) {
        self.df = Some(df);
        self.file_path = file_path;
    }
}
