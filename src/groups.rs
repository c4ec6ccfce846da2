use serde::{Deserialize, Serialize};

/// Column holding the precomputed overall total.
pub const TOTAL_COLUMN: &str = "TOTAL";

/// Precomputed group columns carried by the source file, used for the
/// growth metric cards and the evolution line charts.
pub const FIXED_INCOME_COLUMN: &str = "renda_fixa";
pub const VARIABLE_INCOME_COLUMN: &str = "renda_variavel";

/// Display labels and source columns for the renda-variável breakdown,
/// in chart order.
pub const VARIABLE_BREAKDOWN: &[(&str, &str)] = &[
    ("Ações", "AÇÕES"),
    ("FIIs", "FIIS"),
    ("Exterior", "EXTERIOR"),
];

/// The authoritative category-to-group mapping.
///
/// Every aggregate computation and every view goes through this enum, so the
/// pie-chart "Renda Fixa" set and the metric-card growth column can never
/// drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryGroup {
    FixedIncome,
    Accounts,
    VariableIncome,
}

impl CategoryGroup {
    pub fn all() -> [CategoryGroup; 3] {
        [
            CategoryGroup::FixedIncome,
            CategoryGroup::Accounts,
            CategoryGroup::VariableIncome,
        ]
    }

    /// Source-file category columns belonging to this group.
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            CategoryGroup::FixedIncome => &["CDB/LCI/LCA", "TESOURO DIRETO", "CASHBACK"],
            CategoryGroup::Accounts => &["CONTAS PF"],
            CategoryGroup::VariableIncome => &["EXTERIOR", "FIIS", "AÇÕES"],
        }
    }

    /// Human-readable label for legends and cards.
    pub fn label(&self) -> &'static str {
        match self {
            CategoryGroup::FixedIncome => "Renda Fixa",
            CategoryGroup::Accounts => "Saldo",
            CategoryGroup::VariableIncome => "Renda Variável",
        }
    }

    /// Precomputed source column for this group's time series, when the
    /// file carries one. Account balance has no precomputed column.
    pub fn series_column(&self) -> Option<&'static str> {
        match self {
            CategoryGroup::FixedIncome => Some(FIXED_INCOME_COLUMN),
            CategoryGroup::Accounts => None,
            CategoryGroup::VariableIncome => Some(VARIABLE_INCOME_COLUMN),
        }
    }
}
