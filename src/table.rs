use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// One row of the balance sheet: every category balance observed on a date.
///
/// Missing cells are filled with zero at load time, so `balances` always
/// carries an entry for every column in the table header. Lookups for
/// categories the table never had still resolve to zero via [`value`].
///
/// [`value`]: BalanceRecord::value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub date: NaiveDate,
    pub balances: HashMap<String, f64>,
}

impl BalanceRecord {
    /// Balance for a category; zero when the column does not exist.
    pub fn value(&self, category: &str) -> f64 {
        self.balances.get(category).copied().unwrap_or(0.0)
    }
}

/// The loaded balance sheet, immutable after [`BalanceTable::load`].
///
/// Records are kept in file order. First/last derived metrics assume file
/// order equals chronological order, which is how the source file is written.
/// Dates are the table key and must be unique; duplicates fail the load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceTable {
    /// Column names in header order, date column excluded.
    pub columns: Vec<String>,
    pub records: Vec<BalanceRecord>,
}

impl BalanceTable {
    /// Load a balance sheet from a delimited file.
    ///
    /// The first column is the date index (`YYYY-MM-DD`); every other column
    /// is a numeric balance. Empty cells become `0.0`. Any malformed row
    /// (wrong field count, unparseable date, non-numeric cell, duplicate
    /// date) fails the whole load; there is no row-skipping recovery.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("failed to open balance file {}", path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("failed to read header of {}", path.display()))?
            .clone();

        if headers.len() < 2 {
            bail!(
                "balance file {} needs a date column plus at least one balance column",
                path.display()
            );
        }

        let columns: Vec<String> = headers.iter().skip(1).map(|h| h.trim().to_string()).collect();

        let mut records = Vec::new();
        let mut seen_dates: HashSet<NaiveDate> = HashSet::new();

        for (idx, row) in reader.records().enumerate() {
            // Header is line 1, first data row is line 2.
            let line = idx + 2;
            let row = row.with_context(|| format!("failed to read line {}", line))?;

            let date_raw = row.get(0).unwrap_or("").trim();
            let date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d")
                .with_context(|| format!("line {}: invalid date {:?}", line, date_raw))?;

            if !seen_dates.insert(date) {
                bail!("line {}: duplicate date {}", line, date);
            }

            let mut balances = HashMap::with_capacity(columns.len());
            for (column, cell) in columns.iter().zip(row.iter().skip(1)) {
                let cell = cell.trim();
                let value = if cell.is_empty() {
                    0.0
                } else {
                    cell.parse::<f64>().with_context(|| {
                        format!("line {}: column {:?} has non-numeric value {:?}", line, column, cell)
                    })?
                };
                balances.insert(column.clone(), value);
            }

            records.push(BalanceRecord { date, balances });
        }

        Ok(BalanceTable { columns, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Exact-date lookup against the row index. Not a range query.
    pub fn record(&self, date: NaiveDate) -> Option<&BalanceRecord> {
        self.records.iter().find(|r| r.date == date)
    }

    pub fn first_record(&self) -> Option<&BalanceRecord> {
        self.records.first()
    }

    pub fn last_record(&self) -> Option<&BalanceRecord> {
        self.records.last()
    }

    /// Time series of one column, in table order. Absent columns yield zeros,
    /// matching the zero-default of [`BalanceRecord::value`].
    pub fn column_series(&self, column: &str) -> Vec<(NaiveDate, f64)> {
        self.records
            .iter()
            .map(|r| (r.date, r.value(column)))
            .collect()
    }
}
