use crate::groups::{
    CategoryGroup, FIXED_INCOME_COLUMN, TOTAL_COLUMN, VARIABLE_BREAKDOWN, VARIABLE_INCOME_COLUMN,
};
use crate::table::{BalanceRecord, BalanceTable};
use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Point-in-time breakdown of one record into the three category groups.
///
/// Drives the distribution pie and the group legends. The three group sums
/// cover the seven known categories and nothing else, so they only add up to
/// the record's TOTAL column when TOTAL itself is the sum of those seven.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub fixed_income: f64,
    pub accounts_balance: f64,
    pub variable_income: f64,
}

/// Metric-card payload: endpoint totals plus the three growth percentages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub first_total: f64,
    pub last_total: f64,
    /// `None` when growth is undefined (first value was zero).
    pub total_growth_pct: Option<f64>,
    pub fixed_income_growth_pct: Option<f64>,
    pub variable_income_growth_pct: Option<f64>,
}

/// Sum of a record's balances over one category group. Categories absent
/// from the table count as zero.
pub fn group_total(record: &BalanceRecord, group: CategoryGroup) -> f64 {
    group.categories().iter().map(|c| record.value(c)).sum()
}

/// Break one record into the three group sums.
///
/// `date` selects the record by exact match against the row index; `None`
/// defaults to the most recent record in table order.
pub fn snapshot(table: &BalanceTable, date: Option<NaiveDate>) -> Result<Snapshot> {
    let record = match date {
        Some(d) => table
            .record(d)
            .ok_or_else(|| anyhow!("no balance record for date {}", d))?,
        None => table
            .last_record()
            .ok_or_else(|| anyhow!("balance table is empty"))?,
    };

    Ok(Snapshot {
        date: record.date,
        fixed_income: group_total(record, CategoryGroup::FixedIncome),
        accounts_balance: group_total(record, CategoryGroup::Accounts),
        variable_income: group_total(record, CategoryGroup::VariableIncome),
    })
}

/// Percentage change between the first and last value of a column:
/// `(last / first - 1) * 100`.
///
/// Growth from a zero starting value is undefined; that case returns
/// `Ok(None)` rather than an error or an infinity, and views render it as
/// "n/d". Requesting a column the table does not have is an error.
pub fn endpoint_growth(table: &BalanceTable, column: &str) -> Result<Option<f64>> {
    if !table.has_column(column) {
        bail!("unknown column {:?}", column);
    }

    let first = table
        .first_record()
        .ok_or_else(|| anyhow!("balance table is empty"))?
        .value(column);
    let last = table
        .last_record()
        .ok_or_else(|| anyhow!("balance table is empty"))?
        .value(column);

    if first == 0.0 {
        return Ok(None);
    }

    Ok(Some((last / first - 1.0) * 100.0))
}

/// Most recent value of each requested column, in request order. Used to
/// build chart legends ("Renda Fixa: R$ ...").
pub fn latest_values(table: &BalanceTable, columns: &[&str]) -> Result<Vec<(String, f64)>> {
    let last = table
        .last_record()
        .ok_or_else(|| anyhow!("balance table is empty"))?;

    Ok(columns
        .iter()
        .map(|c| (c.to_string(), last.value(c)))
        .collect())
}

/// Label/value pairs for the renda-variável pie, in chart order.
pub fn variable_breakdown(record: &BalanceRecord) -> Vec<(&'static str, f64)> {
    VARIABLE_BREAKDOWN
        .iter()
        .map(|(label, column)| (*label, record.value(column)))
        .collect()
}

/// Compute the five metric-card values in one pass.
///
/// Needs the TOTAL, renda_fixa and renda_variavel columns; a file without
/// them cannot produce the cards and fails here rather than mid-render.
pub fn summary(table: &BalanceTable) -> Result<DashboardSummary> {
    let first = table
        .first_record()
        .ok_or_else(|| anyhow!("balance table is empty"))?;
    let last = table
        .last_record()
        .ok_or_else(|| anyhow!("balance table is empty"))?;

    Ok(DashboardSummary {
        first_date: first.date,
        last_date: last.date,
        first_total: first.value(TOTAL_COLUMN),
        last_total: last.value(TOTAL_COLUMN),
        total_growth_pct: endpoint_growth(table, TOTAL_COLUMN)?,
        fixed_income_growth_pct: endpoint_growth(table, FIXED_INCOME_COLUMN)?,
        variable_income_growth_pct: endpoint_growth(table, VARIABLE_INCOME_COLUMN)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Build an in-memory table from (date, [(column, value)]) rows. Columns
    /// are taken from the first row, mirroring a CSV header.
    fn make_table(rows: &[(&str, &[(&str, f64)])]) -> BalanceTable {
        let columns: Vec<String> = rows
            .first()
            .map(|(_, cells)| cells.iter().map(|(c, _)| c.to_string()).collect())
            .unwrap_or_default();

        let records = rows
            .iter()
            .map(|(date, cells)| {
                let mut balances = HashMap::new();
                for (column, value) in cells.iter() {
                    balances.insert(column.to_string(), *value);
                }
                BalanceRecord {
                    date: date.parse().unwrap(),
                    balances,
                }
            })
            .collect();

        BalanceTable { columns, records }
    }

    fn full_row() -> &'static [(&'static str, f64)] {
        &[
            ("CDB/LCI/LCA", 1000.0),
            ("TESOURO DIRETO", 500.0),
            ("CASHBACK", 50.0),
            ("CONTAS PF", 200.0),
            ("EXTERIOR", 300.0),
            ("FIIS", 400.0),
            ("AÇÕES", 600.0),
            ("TOTAL", 3050.0),
            ("renda_fixa", 1550.0),
            ("renda_variavel", 1300.0),
        ]
    }

    #[test]
    fn test_snapshot_groups_sum_to_total_when_total_covers_all_categories() {
        let table = make_table(&[("2023-01-15", full_row())]);
        let snap = snapshot(&table, None).unwrap();

        assert_eq!(snap.fixed_income, 1550.0);
        assert_eq!(snap.accounts_balance, 200.0);
        assert_eq!(snap.variable_income, 1300.0);

        // TOTAL in this fixture is exactly the sum of the seven categories,
        // so the three groups reconstruct it. A TOTAL tracking extra columns
        // would not be reconstructed - the groups cover only the seven.
        let total = table.last_record().unwrap().value("TOTAL");
        assert_eq!(snap.fixed_income + snap.accounts_balance + snap.variable_income, total);
    }

    #[test]
    fn test_snapshot_defaults_to_last_record() {
        let table = make_table(&[
            ("2023-01-15", &[("CONTAS PF", 100.0)]),
            ("2023-02-15", &[("CONTAS PF", 250.0)]),
        ]);

        let snap = snapshot(&table, None).unwrap();
        assert_eq!(snap.date, "2023-02-15".parse().unwrap());
        assert_eq!(snap.accounts_balance, 250.0);

        // Explicitly asking for the last date gives the same snapshot.
        let explicit = snapshot(&table, Some("2023-02-15".parse().unwrap())).unwrap();
        assert_eq!(explicit, snap);
    }

    #[test]
    fn test_snapshot_exact_date_match() {
        let table = make_table(&[
            ("2023-01-15", &[("CONTAS PF", 100.0)]),
            ("2023-02-15", &[("CONTAS PF", 250.0)]),
        ]);

        let snap = snapshot(&table, Some("2023-01-15".parse().unwrap())).unwrap();
        assert_eq!(snap.accounts_balance, 100.0);

        // A date between records is not a range query: it is an error.
        let missing = snapshot(&table, Some("2023-01-20".parse().unwrap()));
        assert!(missing.unwrap_err().to_string().contains("no balance record"));
    }

    #[test]
    fn test_snapshot_missing_fiis_column_counts_as_zero() {
        let table = make_table(&[(
            "2023-01-15",
            &[("EXTERIOR", 300.0), ("AÇÕES", 600.0)],
        )]);

        let snap = snapshot(&table, None).unwrap();
        assert_eq!(snap.variable_income, 900.0);
    }

    #[test]
    fn test_snapshot_single_row_table_returns_row_sums_unchanged() {
        let table = make_table(&[("2023-01-15", full_row())]);
        let snap = snapshot(&table, Some("2023-01-15".parse().unwrap())).unwrap();

        assert_eq!(snap.fixed_income, 1000.0 + 500.0 + 50.0);
        assert_eq!(snap.accounts_balance, 200.0);
        assert_eq!(snap.variable_income, 300.0 + 400.0 + 600.0);
    }

    #[test]
    fn test_snapshot_empty_table_fails() {
        let table = BalanceTable {
            columns: vec![],
            records: vec![],
        };
        assert!(snapshot(&table, None).is_err());
    }

    #[test]
    fn test_endpoint_growth_basic() {
        let table = make_table(&[
            ("2023-01-15", &[("TOTAL", 100.0)]),
            ("2023-02-15", &[("TOTAL", 150.0)]),
        ]);

        let growth = endpoint_growth(&table, "TOTAL").unwrap().unwrap();
        assert!((growth - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_endpoint_growth_is_idempotent() {
        let table = make_table(&[
            ("2023-01-15", &[("TOTAL", 121350.0)]),
            ("2023-02-15", &[("TOTAL", 156980.0)]),
        ]);

        let a = endpoint_growth(&table, "TOTAL").unwrap();
        let b = endpoint_growth(&table, "TOTAL").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_endpoint_growth_zero_first_value_is_undefined_not_a_panic() {
        let table = make_table(&[
            ("2023-01-15", &[("TOTAL", 0.0)]),
            ("2023-02-15", &[("TOTAL", 150.0)]),
        ]);

        // Growth from zero returns None, never an infinity or a runtime failure.
        assert_eq!(endpoint_growth(&table, "TOTAL").unwrap(), None);
    }

    #[test]
    fn test_endpoint_growth_single_row_is_zero() {
        let table = make_table(&[("2023-01-15", &[("TOTAL", 100.0)])]);
        let growth = endpoint_growth(&table, "TOTAL").unwrap().unwrap();
        assert_eq!(growth, 0.0);
    }

    #[test]
    fn test_endpoint_growth_unknown_column_fails() {
        let table = make_table(&[("2023-01-15", &[("TOTAL", 100.0)])]);
        assert!(endpoint_growth(&table, "renda_fixa").is_err());
    }

    #[test]
    fn test_endpoint_growth_negative_growth() {
        let table = make_table(&[
            ("2023-01-15", &[("TOTAL", 200.0)]),
            ("2023-02-15", &[("TOTAL", 150.0)]),
        ]);

        let growth = endpoint_growth(&table, "TOTAL").unwrap().unwrap();
        assert!((growth - (-25.0)).abs() < 1e-9);
    }

    #[test]
    fn test_latest_values_in_request_order() {
        let table = make_table(&[
            ("2023-01-15", &[("renda_fixa", 100.0), ("renda_variavel", 50.0)]),
            ("2023-02-15", &[("renda_fixa", 120.0), ("renda_variavel", 80.0)]),
        ]);

        let values = latest_values(&table, &["renda_variavel", "renda_fixa"]).unwrap();
        assert_eq!(values[0], ("renda_variavel".to_string(), 80.0));
        assert_eq!(values[1], ("renda_fixa".to_string(), 120.0));
    }

    #[test]
    fn test_variable_breakdown_order_and_zero_defaults() {
        let table = make_table(&[(
            "2023-01-15",
            &[("AÇÕES", 600.0), ("EXTERIOR", 300.0)],
        )]);

        let breakdown = variable_breakdown(table.last_record().unwrap());
        assert_eq!(breakdown[0], ("Ações", 600.0));
        assert_eq!(breakdown[1], ("FIIs", 0.0));
        assert_eq!(breakdown[2], ("Exterior", 300.0));
    }

    #[test]
    fn test_summary_metric_cards() {
        let table = make_table(&[
            (
                "2023-01-15",
                &[("TOTAL", 100.0), ("renda_fixa", 60.0), ("renda_variavel", 40.0)],
            ),
            (
                "2024-04-15",
                &[("TOTAL", 180.0), ("renda_fixa", 90.0), ("renda_variavel", 90.0)],
            ),
        ]);

        let s = summary(&table).unwrap();
        assert_eq!(s.first_total, 100.0);
        assert_eq!(s.last_total, 180.0);
        assert!((s.total_growth_pct.unwrap() - 80.0).abs() < 1e-9);
        assert!((s.fixed_income_growth_pct.unwrap() - 50.0).abs() < 1e-9);
        assert!((s.variable_income_growth_pct.unwrap() - 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_serializes_for_the_api() {
        let table = make_table(&[("2023-01-15", full_row())]);
        let snap = snapshot(&table, None).unwrap();

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["date"], "2023-01-15");
        assert_eq!(json["fixed_income"], 1550.0);
        assert_eq!(json["accounts_balance"], 200.0);
        assert_eq!(json["variable_income"], 1300.0);
    }

    #[test]
    fn test_summary_requires_derived_columns() {
        let table = make_table(&[("2023-01-15", &[("CONTAS PF", 100.0)])]);
        assert!(summary(&table).is_err());
    }
}
