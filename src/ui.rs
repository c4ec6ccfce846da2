use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, BarChart, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table,
        TableState,
    },
    Frame, Terminal,
};
use std::io;

use saldo_dashboard::{
    currency_brl, growth_label, latest_values, legend_label, snapshot, summary,
    variable_breakdown, BalanceTable, CategoryGroup, DashboardSummary, Snapshot,
    FIXED_INCOME_COLUMN, TOTAL_COLUMN, VARIABLE_INCOME_COLUMN,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Tabela,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Dashboard => Page::Tabela,
            Page::Tabela => Page::Dashboard,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Dashboard => "DASHBOARD",
            Page::Tabela => "TABELA",
        }
    }
}

pub struct App {
    pub table: BalanceTable,
    pub cards: DashboardSummary,
    pub snap: Snapshot,
    pub current_page: Page,
    pub table_state: TableState,
    // Precomputed chart series (x = days since the first record)
    total_points: Vec<(f64, f64)>,
    fixed_points: Vec<(f64, f64)>,
    variable_points: Vec<(f64, f64)>,
    // Current value per series column, for the chart legends
    legend_latest: Vec<(String, f64)>,
    x_bounds: [f64; 2],
    x_labels: (String, String),
}

impl App {
    pub fn new(table: BalanceTable) -> Result<Self> {
        let cards = summary(&table)?;
        let snap = snapshot(&table, None)?;

        let origin = cards.first_date;
        let total_points = chart_points(&table.column_series(TOTAL_COLUMN), origin);
        let fixed_points = chart_points(&table.column_series(FIXED_INCOME_COLUMN), origin);
        let variable_points = chart_points(&table.column_series(VARIABLE_INCOME_COLUMN), origin);
        let legend_latest =
            latest_values(&table, &[FIXED_INCOME_COLUMN, VARIABLE_INCOME_COLUMN])?;

        let x_max = total_points.last().map(|(x, _)| *x).unwrap_or(0.0);
        let x_bounds = [0.0, x_max.max(1.0)];
        let x_labels = (
            cards.first_date.format("%Y-%m").to_string(),
            cards.last_date.format("%Y-%m").to_string(),
        );

        let mut table_state = TableState::default();
        if !table.is_empty() {
            table_state.select(Some(0));
        }

        Ok(Self {
            table,
            cards,
            snap,
            current_page: Page::Dashboard,
            table_state,
            total_points,
            fixed_points,
            variable_points,
            legend_latest,
            x_bounds,
            x_labels,
        })
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn next_row(&mut self) {
        let len = self.table.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.table.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.table.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => (i + 20).min(len - 1),
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let i = match self.table_state.selected() {
            Some(i) => i.saturating_sub(20),
            None => 0,
        };
        self.table_state.select(Some(i));
    }
}

fn chart_points(series: &[(NaiveDate, f64)], origin: NaiveDate) -> Vec<(f64, f64)> {
    series
        .iter()
        .map(|(date, value)| ((*date - origin).num_days() as f64, *value))
        .collect()
}

/// Y-axis bounds with headroom, over one or more datasets.
fn y_bounds(series: &[&[(f64, f64)]]) -> [f64; 2] {
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    for points in series {
        for (_, y) in points.iter() {
            min = min.min(*y);
            max = max.max(*y);
        }
    }
    if min > max {
        return [0.0, 1.0];
    }
    let range = (max - min).max(1.0);
    [min - 0.1 * range, max + 0.2 * range]
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab | KeyCode::BackTab => app.next_page(),
                KeyCode::Down | KeyCode::Char('j') => app.next_row(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_row(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.table_state.select(Some(0)),
                KeyCode::End => {
                    if !app.table.is_empty() {
                        app.table_state.select(Some(app.table.len() - 1));
                    }
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Dashboard => render_dashboard(f, chunks[1], app),
        Page::Tabela => render_tabela(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Dashboard, Page::Tabela];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        "DASHBOARD INVESTIMENTOS",
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("{} registros até {}", app.table.len(), app.cards.last_date),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),      // Metric cards
            Constraint::Percentage(50), // TOTAL evolution + distribution
            Constraint::Min(0),         // Group evolution + renda variável
        ])
        .split(area);

    render_metric_cards(f, rows[0], app);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);

    render_total_chart(f, top[0], app);
    render_distribution(f, top[1], app);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[2]);

    render_group_evolution_chart(f, bottom[0], app);
    render_variable_breakdown(f, bottom[1], app);
}

fn metric_card(title: &str, value: String, color: Color) -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", title)),
    )
}

fn render_metric_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = &app.cards;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ])
        .split(area);

    let growth_color = |growth: Option<f64>| match growth {
        Some(g) if g < 0.0 => Color::Red,
        Some(_) => Color::Green,
        None => Color::DarkGray,
    };

    let first_title = format!("Saldo em {}", cards.first_date.format("%m/%Y"));
    f.render_widget(
        metric_card(&first_title, currency_brl(cards.first_total), Color::White),
        columns[0],
    );
    f.render_widget(
        metric_card("Saldo atual", currency_brl(cards.last_total), Color::White),
        columns[1],
    );
    f.render_widget(
        metric_card(
            "Crescimento total",
            growth_label(cards.total_growth_pct),
            growth_color(cards.total_growth_pct),
        ),
        columns[2],
    );
    f.render_widget(
        metric_card(
            "Cresc. renda fixa",
            growth_label(cards.fixed_income_growth_pct),
            growth_color(cards.fixed_income_growth_pct),
        ),
        columns[3],
    );
    f.render_widget(
        metric_card(
            "Cresc. renda variável",
            growth_label(cards.variable_income_growth_pct),
            growth_color(cards.variable_income_growth_pct),
        ),
        columns[4],
    );
}

fn render_total_chart(f: &mut Frame, area: Rect, app: &App) {
    let datasets = vec![Dataset::default()
        .name(legend_label("Total", app.cards.last_total))
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&app.total_points)];

    let bounds = y_bounds(&[&app.total_points]);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Evolução dos Investimentos "),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(app.x_bounds)
                .labels(vec![
                    Span::raw(app.x_labels.0.clone()),
                    Span::raw(app.x_labels.1.clone()),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(bounds)
                .labels(vec![
                    Span::raw(currency_brl(bounds[0])),
                    Span::raw(currency_brl((bounds[0] + bounds[1]) / 2.0)),
                    Span::raw(currency_brl(bounds[1])),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_group_evolution_chart(f: &mut Frame, area: Rect, app: &App) {
    let latest = |column: &str| {
        app.legend_latest
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| *v)
            .unwrap_or(0.0)
    };

    let datasets = vec![
        Dataset::default()
            .name(legend_label(
                CategoryGroup::FixedIncome.label(),
                latest(FIXED_INCOME_COLUMN),
            ))
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&app.fixed_points),
        Dataset::default()
            .name(legend_label(
                CategoryGroup::VariableIncome.label(),
                latest(VARIABLE_INCOME_COLUMN),
            ))
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Magenta))
            .data(&app.variable_points),
    ];

    let bounds = y_bounds(&[&app.fixed_points, &app.variable_points]);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Renda Fixa × Renda Variável "),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(app.x_bounds)
                .labels(vec![
                    Span::raw(app.x_labels.0.clone()),
                    Span::raw(app.x_labels.1.clone()),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(bounds)
                .labels(vec![
                    Span::raw(currency_brl(bounds[0])),
                    Span::raw(currency_brl(bounds[1])),
                ]),
        );

    f.render_widget(chart, area);
}

/// Pie-equivalent: bar chart plus legend with values and shares.
fn render_distribution(f: &mut Frame, area: Rect, app: &App) {
    let snap = &app.snap;
    let slices = [
        (CategoryGroup::FixedIncome.label(), snap.fixed_income),
        (CategoryGroup::Accounts.label(), snap.accounts_balance),
        (CategoryGroup::VariableIncome.label(), snap.variable_income),
    ];
    render_slices(f, area, " Distribuição dos investimentos ", &slices);
}

fn render_variable_breakdown(f: &mut Frame, area: Rect, app: &App) {
    let slices: Vec<(&str, f64)> = app
        .table
        .last_record()
        .map(variable_breakdown)
        .unwrap_or_default();
    render_slices(f, area, " Renda variável ", &slices);
}

fn render_slices(f: &mut Frame, area: Rect, title: &str, slices: &[(&str, f64)]) {
    let total: f64 = slices.iter().map(|(_, v)| v).sum();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2 + slices.len() as u16), Constraint::Min(0)])
        .split(area);

    // Legend with values and shares (the pie's autopct + legend)
    let legend_lines: Vec<Line> = slices
        .iter()
        .map(|(label, value)| {
            let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
            Line::from(format!("{}  ({:.1}%)", legend_label(label, *value), share))
        })
        .collect();

    let legend = Paragraph::new(legend_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string()),
    );
    f.render_widget(legend, chunks[0]);

    let data: Vec<(&str, u64)> = slices
        .iter()
        .map(|(label, value)| (*label, value.max(0.0).round() as u64))
        .collect();

    let bars = BarChart::default()
        .block(Block::default().borders(Borders::ALL))
        .data(&data)
        .bar_width(12)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));

    f.render_widget(bars, chunks[1]);
}

fn render_tabela(f: &mut Frame, area: Rect, app: &mut App) {
    let mut header_cells = vec![Cell::from("Data").style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )];
    for column in &app.table.columns {
        header_cells.push(Cell::from(column.as_str()).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.table.records.iter().map(|record| {
        let mut cells = vec![Cell::from(record.date.to_string())];
        for column in &app.table.columns {
            cells.push(Cell::from(currency_brl(record.value(column))));
        }
        Row::new(cells).height(1)
    });

    let mut widths = vec![Constraint::Length(12)];
    widths.extend(std::iter::repeat(Constraint::Length(16)).take(app.table.columns.len()));

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(" Saldo das contas "))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let hints = match app.current_page {
        Page::Dashboard => "Tab: alternar página │ q: sair",
        Page::Tabela => "Tab: alternar página │ ↑/↓ PgUp/PgDn: navegar │ q: sair",
    };

    let status = Paragraph::new(hints)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(status, area);
}
