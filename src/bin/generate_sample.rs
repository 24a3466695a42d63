//! Sample Data Generator
//! Writes a demo enrollment CSV so the dashboard is usable out of the box.

use anyhow::{Context, Result};
use polars::prelude::*;
use std::fs::File;

const OUTPUT: &str = "university_enrollment.csv";

fn main() -> Result<()> {
    let span = 2015..=2024i64;

    let mut years: Vec<i64> = Vec::new();
    let mut terms: Vec<&str> = Vec::new();
    let mut applications: Vec<i64> = Vec::new();
    let mut admitted: Vec<i64> = Vec::new();
    let mut enrolled: Vec<i64> = Vec::new();
    let mut retention: Vec<f64> = Vec::new();
    let mut satisfaction: Vec<f64> = Vec::new();
    let mut engineering: Vec<i64> = Vec::new();
    let mut business: Vec<i64> = Vec::new();
    let mut arts: Vec<i64> = Vec::new();
    let mut science: Vec<i64> = Vec::new();

    for (i, year) in span.enumerate() {
        let i = i as i64;

        // Aggregate values are duplicated across Spring and Fall, the shape
        // the single-term-dedup policy exists for.
        let apps = 2500 + 90 * i;
        let adm = apps * 62 / 100;
        let enr = adm * 55 / 100;
        let eng = enr * 35 / 100;
        let bus = enr * 28 / 100;
        let art = enr * 17 / 100;
        let sci = enr - eng - bus - art;

        for term in ["Spring", "Fall"] {
            years.push(year);
            terms.push(term);
            applications.push(apps);
            admitted.push(adm);
            enrolled.push(enr);
            retention.push(84.0 + 0.5 * i as f64);
            satisfaction.push(77.0 + 0.6 * i as f64);
            engineering.push(eng);
            business.push(bus);
            arts.push(art);
            science.push(sci);
        }
    }

    let mut df = df!(
        "Year" => years,
        "Term" => terms,
        "Applications" => applications,
        "Admitted" => admitted,
        "Enrolled" => enrolled,
        "Retention Rate (%)" => retention,
        "Student Satisfaction (%)" => satisfaction,
        "Engineering Enrolled" => engineering,
        "Business Enrolled" => business,
        "Arts Enrolled" => arts,
        "Science Enrolled" => science,
    )?;

    let mut file = File::create(OUTPUT).with_context(|| format!("creating {OUTPUT}"))?;
    CsvWriter::new(&mut file)
        .finish(&mut df)
        .context("writing sample CSV")?;

    println!("Wrote {} rows to {OUTPUT}", df.height());
    Ok(())
}
