// Saldo Dashboard - Core Library
// Exposes all modules for use in the CLI, API server, and tests

pub mod aggregate;
pub mod format;
pub mod groups;
pub mod table;

// Re-export commonly used types
pub use aggregate::{
    endpoint_growth, group_total, latest_values, snapshot, summary, variable_breakdown,
    DashboardSummary, Snapshot,
};
pub use format::{currency_brl, growth_label, legend_label, percent};
pub use groups::{
    CategoryGroup, FIXED_INCOME_COLUMN, TOTAL_COLUMN, VARIABLE_BREAKDOWN, VARIABLE_INCOME_COLUMN,
};
pub use table::{BalanceRecord, BalanceTable};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
