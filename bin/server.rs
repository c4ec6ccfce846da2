// Saldo Dashboard - Web Server
// JSON API over the loaded balance sheet, plus a small static page

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use saldo_dashboard::{
    currency_brl, growth_label, snapshot, summary, variable_breakdown, BalanceTable, CategoryGroup,
};

/// Shared application state. The table is loaded once at startup and read-only
/// afterwards, so plain `Arc` sharing is enough.
#[derive(Clone)]
struct AppState {
    table: Arc<BalanceTable>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

fn api_error(status: StatusCode, message: String) -> axum::response::Response {
    #[derive(Serialize)]
    struct ApiError {
        success: bool,
        error: String,
    }

    (
        status,
        Json(ApiError {
            success: false,
            error: message,
        }),
    )
        .into_response()
}

/// Metric-card response
#[derive(Serialize)]
struct SummaryResponse {
    first_date: NaiveDate,
    last_date: NaiveDate,
    first_total: f64,
    last_total: f64,
    first_total_brl: String,
    last_total_brl: String,
    total_growth: String,
    fixed_income_growth: String,
    variable_income_growth: String,
}

/// One slice of a distribution breakdown
#[derive(Serialize)]
struct SliceResponse {
    label: String,
    value: f64,
    value_brl: String,
    share_pct: f64,
}

/// Snapshot response: group breakdown plus renda-variável detail
#[derive(Serialize)]
struct SnapshotResponse {
    date: NaiveDate,
    groups: Vec<SliceResponse>,
    variable_income: Vec<SliceResponse>,
}

#[derive(Serialize)]
struct SeriesPoint {
    date: NaiveDate,
    value: f64,
}

#[derive(Serialize)]
struct TableResponse {
    columns: Vec<String>,
    rows: Vec<TableRow>,
}

#[derive(Serialize)]
struct TableRow {
    date: NaiveDate,
    values: Vec<f64>,
}

fn slices(pairs: Vec<(String, f64)>) -> Vec<SliceResponse> {
    let total: f64 = pairs.iter().map(|(_, v)| v).sum();
    pairs
        .into_iter()
        .map(|(label, value)| SliceResponse {
            value_brl: currency_brl(value),
            share_pct: if total > 0.0 { value / total * 100.0 } else { 0.0 },
            label,
            value,
        })
        .collect()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/summary - Metric cards
async fn get_summary(State(state): State<AppState>) -> impl IntoResponse {
    match summary(&state.table) {
        Ok(s) => {
            let response = SummaryResponse {
                first_date: s.first_date,
                last_date: s.last_date,
                first_total: s.first_total,
                last_total: s.last_total,
                first_total_brl: currency_brl(s.first_total),
                last_total_brl: currency_brl(s.last_total),
                total_growth: growth_label(s.total_growth_pct),
                fixed_income_growth: growth_label(s.fixed_income_growth_pct),
                variable_income_growth: growth_label(s.variable_income_growth_pct),
            };
            (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
        }
        Err(e) => {
            eprintln!("Error computing summary: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

#[derive(Deserialize)]
struct SnapshotParams {
    date: Option<NaiveDate>,
}

/// GET /api/snapshot?date=YYYY-MM-DD - Distribution at a date (default: latest)
async fn get_snapshot(
    State(state): State<AppState>,
    Query(params): Query<SnapshotParams>,
) -> impl IntoResponse {
    let snap = match snapshot(&state.table, params.date) {
        Ok(snap) => snap,
        Err(e) => return api_error(StatusCode::NOT_FOUND, e.to_string()),
    };

    // The record is known to exist once the snapshot resolved.
    let record = match state.table.record(snap.date) {
        Some(record) => record,
        None => return api_error(StatusCode::NOT_FOUND, format!("no record for {}", snap.date)),
    };

    let groups = slices(vec![
        (CategoryGroup::FixedIncome.label().to_string(), snap.fixed_income),
        (CategoryGroup::Accounts.label().to_string(), snap.accounts_balance),
        (
            CategoryGroup::VariableIncome.label().to_string(),
            snap.variable_income,
        ),
    ]);

    let variable_income = slices(
        variable_breakdown(record)
            .into_iter()
            .map(|(label, value)| (label.to_string(), value))
            .collect(),
    );

    let response = SnapshotResponse {
        date: snap.date,
        groups,
        variable_income,
    };

    (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
}

/// GET /api/series/:column - Time series for line charts
async fn get_series(
    State(state): State<AppState>,
    Path(column): Path<String>,
) -> impl IntoResponse {
    // Decode URL-encoded column names ("AÇÕES" arrives percent-encoded)
    let column = urlencoding::decode(&column)
        .unwrap_or_else(|_| column.clone().into())
        .into_owned();

    if !state.table.has_column(&column) {
        return api_error(StatusCode::NOT_FOUND, format!("unknown column {:?}", column));
    }

    let points: Vec<SeriesPoint> = state
        .table
        .column_series(&column)
        .into_iter()
        .map(|(date, value)| SeriesPoint { date, value })
        .collect();

    (StatusCode::OK, Json(ApiResponse::ok(points))).into_response()
}

/// GET /api/table - Full balance sheet for the TABELA view
async fn get_table(State(state): State<AppState>) -> impl IntoResponse {
    let rows = state
        .table
        .records
        .iter()
        .map(|record| TableRow {
            date: record.date,
            values: state
                .table
                .columns
                .iter()
                .map(|column| record.value(column))
                .collect(),
        })
        .collect();

    let response = TableResponse {
        columns: state.table.columns.clone(),
        rows,
    };

    (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
}

/// GET / - Serve the dashboard page
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🌐 Saldo Dashboard - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let csv_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "saldo_contas.csv".to_string());
    let csv_path = std::path::Path::new(&csv_path);

    if !csv_path.exists() {
        eprintln!("❌ Balance file not found: {}", csv_path.display());
        eprintln!("   Pass the CSV path as the first argument:");
        eprintln!("   saldo-server data/saldo_contas.csv");
        std::process::exit(1);
    }

    let table = match BalanceTable::load(csv_path) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("❌ Failed to load {}: {:#}", csv_path.display(), e);
            std::process::exit(1);
        }
    };
    println!("✓ Loaded {} balance rows from {}", table.len(), csv_path.display());

    // Create shared state
    let state = AppState {
        table: Arc::new(table),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/summary", get(get_summary))
        .route("/snapshot", get(get_snapshot))
        .route("/series/:column", get(get_series))
        .route("/table", get(get_table))
        .with_state(state.clone());

    // Build main router
    let app = Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new("web"))
        .layer(CorsLayer::permissive());

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   API: http://localhost:3000/api/summary");
    println!("   UI:  http://localhost:3000");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
