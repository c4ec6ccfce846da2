// Only compile the UI module when the TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use std::env;
use std::path::PathBuf;

use saldo_dashboard::{
    currency_brl, growth_label, legend_label, snapshot, summary, variable_breakdown, BalanceTable,
    CategoryGroup,
};

const DEFAULT_CSV: &str = "saldo_contas.csv";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "summary" {
        // Console summary mode
        run_summary(csv_path(&args, 2))?;
    } else {
        // Dashboard mode (default)
        run_ui_mode(csv_path(&args, 1))?;
    }

    Ok(())
}

fn csv_path(args: &[String], index: usize) -> PathBuf {
    args.get(index)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV))
}

fn load_table(path: &PathBuf) -> Result<BalanceTable> {
    println!("📂 Loading balance sheet from {}...", path.display());
    let table = BalanceTable::load(path)?;
    println!("✓ Loaded {} balance rows", table.len());
    Ok(table)
}

fn run_summary(path: PathBuf) -> Result<()> {
    println!("📊 DASHBOARD INVESTIMENTOS");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let table = load_table(&path)?;
    let cards = summary(&table)?;

    println!();
    println!(
        "Saldo em {}:            {}",
        cards.first_date.format("%m/%Y"),
        currency_brl(cards.first_total)
    );
    println!(
        "Saldo atual ({}):       {}",
        cards.last_date.format("%m/%Y"),
        currency_brl(cards.last_total)
    );
    println!("Crescimento total:          {}", growth_label(cards.total_growth_pct));
    println!(
        "Crescimento renda fixa:     {}",
        growth_label(cards.fixed_income_growth_pct)
    );
    println!(
        "Crescimento renda variável: {}",
        growth_label(cards.variable_income_growth_pct)
    );

    // Distribution of the most recent record
    let snap = snapshot(&table, None)?;
    println!("\nDistribuição em {}:", snap.date);
    println!(
        "  {}",
        legend_label(CategoryGroup::FixedIncome.label(), snap.fixed_income)
    );
    println!(
        "  {}",
        legend_label(CategoryGroup::Accounts.label(), snap.accounts_balance)
    );
    println!(
        "  {}",
        legend_label(CategoryGroup::VariableIncome.label(), snap.variable_income)
    );

    if let Some(record) = table.last_record() {
        println!("\nRenda variável:");
        for (label, value) in variable_breakdown(record) {
            println!("  {}", legend_label(label, value));
        }
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(path: PathBuf) -> Result<()> {
    if !path.exists() {
        eprintln!("❌ Balance file not found: {}", path.display());
        eprintln!("   Pass the CSV path as the first argument, e.g.:");
        eprintln!("   saldo-dashboard data/saldo_contas.csv");
        std::process::exit(1);
    }

    let table = load_table(&path)?;
    println!("Starting dashboard... (Press 'q' to quit)\n");

    let mut app = ui::App::new(table)?;
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(path: PathBuf) -> Result<()> {
    let _ = path;
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the console summary: saldo-dashboard summary");
    std::process::exit(1);
}
