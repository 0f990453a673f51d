use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};

use segunda_rankings::metrics::{DiagramKind, diagram_label, diagram_metrics};
use segunda_rankings::rank_grid::{
    GRID_SLOTS, RankColumn, RankTier, SlotFill, build_rank_column, scan_anomalies,
};
use segunda_rankings::state::{AppState, Screen};
use segunda_rankings::trend::build_trend;
use segunda_rankings::{db, export, persist, sample_data};

const EXPORT_FILE: &str = "segunda_rankings_export.xlsx";
const METRIC_COL_WIDTH: u16 = 9;

struct App {
    state: AppState,
    should_quit: bool,
    db_path: PathBuf,
}

impl App {
    fn new() -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            db_path: db::db_path_from_env(),
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.screen = Screen::Rankings,
            KeyCode::Char('2') => self.state.screen = Screen::Trend,
            KeyCode::Char('t') | KeyCode::Tab => {
                self.state.toggle_diagram();
                self.state
                    .push_log(format!("[INFO] Diagram: {}", diagram_label(self.state.diagram)));
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next_team(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev_team(),
            KeyCode::Char('h') | KeyCode::Left => self.state.metric_cursor_left(),
            KeyCode::Char('l') | KeyCode::Right => self.state.metric_cursor_right(),
            KeyCode::Char('[') => self.state.position_cursor_up(),
            KeyCode::Char(']') => self.state.position_cursor_down(),
            KeyCode::Char('m') => self.state.trend_metric_next(),
            KeyCode::Char('M') => self.state.trend_metric_prev(),
            KeyCode::Char('r') => self.reload_from_db(),
            KeyCode::Char('d') => self.load_demo(),
            KeyCode::Char('e') => self.export_snapshot(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    /// One synchronous load per request; failures end up in the console and
    /// the dataset stays renderable (possibly empty).
    fn reload_from_db(&mut self) {
        let conn = match db::open_db(&self.db_path) {
            Ok(conn) => conn,
            Err(err) => {
                self.state.push_log(format!("[WARN] Database open failed: {err:#}"));
                self.state
                    .replace_dataset(Default::default(), &self.db_path.display().to_string());
                return;
            }
        };

        let report = db::load_dataset(&conn);
        for warning in &report.warnings {
            self.state.push_log(warning.clone());
        }
        let teams = report.dataset.rankings.len();
        let source = self.db_path.display().to_string();
        self.state.replace_dataset(report.dataset, &source);
        self.state
            .push_log(format!("[INFO] Loaded {teams} teams from {source}"));
        self.log_anomalies();
    }

    fn load_demo(&mut self) {
        self.state.replace_dataset(sample_data::demo_dataset(), "demo data");
        self.state.push_log("[INFO] Demo season generated");
        self.log_anomalies();
    }

    fn export_snapshot(&mut self) {
        if self.state.dataset.is_empty() {
            self.state.push_log("[INFO] Nothing to export");
            return;
        }
        match export::export_rankings(std::path::Path::new(EXPORT_FILE), &self.state.dataset) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} teams across {} sheets to {EXPORT_FILE}",
                report.teams, report.sheets
            )),
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }

    fn log_anomalies(&mut self) {
        for kind in [DiagramKind::Style, DiagramKind::Performance] {
            for anomaly in scan_anomalies(&self.state.dataset.rankings, diagram_metrics(kind)) {
                self.state.push_log(format!("[WARN] {anomaly}"));
            }
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let mut app = App::new();
    if std::env::var("RANKINGS_DEMO").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true")) {
        app.load_demo();
    } else {
        app.reload_from_db();
    }
    persist::load_into_state(&mut app.state);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    persist::save_from_state(&app.state);

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Rankings => render_rankings(frame, chunks[1], &app.state),
        Screen::Trend => render_trend(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let team = state
        .selected_team_name()
        .unwrap_or_else(|| "-".to_string());
    let source = if state.data_source.is_empty() {
        "no source".to_string()
    } else {
        state.data_source.clone()
    };
    format!(
        "SEGUNDA RANKINGS | {} | Team: {team} | Source: {source}",
        diagram_label(state.diagram)
    )
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Rankings => {
            "1 Rankings | 2 Trend | t Diagram | j/k Team | h/l Metric | [/] Position | r Reload | d Demo | e Export | ? Help | q Quit"
                .to_string()
        }
        Screen::Trend => {
            "1 Rankings | 2 Trend | t Diagram | j/k Team | m/M Metric | r Reload | ? Help | q Quit"
                .to_string()
        }
    }
}

fn render_rankings(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(30)])
        .split(area);

    render_team_panel(frame, columns[0], state);

    let Some(team) = state.selected_team_name() else {
        let empty = Paragraph::new("Select a team (no ranking data loaded)")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, columns[1]);
        return;
    };

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(GRID_SLOTS as u16),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(columns[1]);

    let metrics = state.active_metrics();
    let mut constraints = vec![Constraint::Length(5)];
    constraints.extend(std::iter::repeat(Constraint::Length(METRIC_COL_WIDTH)).take(metrics.len()));

    let header_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints.clone())
        .split(sections[0]);
    render_cell_text(
        frame,
        header_cols[0],
        "Pos",
        Style::default().add_modifier(Modifier::BOLD),
    );
    for (idx, metric) in metrics.iter().enumerate() {
        let style = if idx == state.metric_cursor {
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        render_cell_text(frame, header_cols[idx + 1], &metric.label, style);
    }

    let grid_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(sections[1]);

    render_position_gutter(frame, grid_cols[0]);

    let mut inspector_line = String::new();
    for (idx, metric) in metrics.iter().enumerate() {
        let column = build_rank_column(&state.dataset.rankings, metric, &team);
        render_rank_column(
            frame,
            grid_cols[idx + 1],
            &column,
            idx == state.metric_cursor,
            state.position_cursor,
        );
        if idx == state.metric_cursor {
            if let Some(slot) = column.slots.get(state.position_cursor) {
                inspector_line = format!("{}: {}", metric.label, slot.tooltip);
            }
        }
    }

    render_legend(frame, sections[2]);

    let inspector = Paragraph::new(inspector_line).style(Style::default().fg(Color::Cyan));
    frame.render_widget(inspector, sections[3]);
}

fn render_team_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Teams").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let names = state.team_names();
    if names.is_empty() {
        let empty =
            Paragraph::new("No teams loaded").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let visible = inner.height as usize;
    let (start, end) = visible_range(state.selected_team, names.len(), visible);
    let mut lines = Vec::new();
    for idx in start..end {
        let prefix = if idx == state.selected_team { "> " } else { "  " };
        lines.push(format!("{prefix}{}", names[idx]));
    }
    let list = Paragraph::new(lines.join("\n"));
    frame.render_widget(list, inner);
}

fn render_position_gutter(frame: &mut Frame, area: Rect) {
    for row in 0..(area.height.min(GRID_SLOTS as u16)) {
        let cell = Rect {
            x: area.x,
            y: area.y + row,
            width: area.width,
            height: 1,
        };
        let label = format!("{:>3}", row + 1);
        let paragraph = Paragraph::new(label).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, cell);
    }
}

fn render_rank_column(
    frame: &mut Frame,
    area: Rect,
    column: &RankColumn,
    cursor_metric: bool,
    cursor_position: usize,
) {
    for (row, slot) in column.slots.iter().enumerate() {
        if row as u16 >= area.height {
            break;
        }
        let cell = Rect {
            x: area.x,
            y: area.y + row as u16,
            width: area.width.saturating_sub(1),
            height: 1,
        };

        let mut style = Style::default().bg(fill_color(slot.fill));
        if slot.marker {
            style = style.fg(Color::Black).add_modifier(Modifier::BOLD);
        }
        if cursor_metric && row == cursor_position {
            style = style.add_modifier(Modifier::REVERSED);
        }

        let content = if slot.marker { "   •" } else { "" };
        let paragraph = Paragraph::new(content).style(style);
        frame.render_widget(paragraph, cell);
    }
}

fn fill_color(fill: SlotFill) -> Color {
    match fill {
        SlotFill::Tier(tier) => tier_color(tier),
        SlotFill::Unfilled => Color::Rgb(232, 232, 232),
        SlotFill::Unavailable => Color::Rgb(74, 74, 74),
    }
}

fn tier_color(tier: RankTier) -> Color {
    match tier {
        RankTier::Top => Color::Rgb(0, 176, 80),
        RankTier::Mid => Color::Rgb(255, 215, 0),
        RankTier::Bottom => Color::Rgb(255, 0, 0),
    }
}

fn render_legend(frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled("■ 1-6  ", Style::default().fg(Color::Rgb(0, 176, 80))),
        Span::styled("■ 7-16  ", Style::default().fg(Color::Rgb(255, 215, 0))),
        Span::styled("■ 17-22", Style::default().fg(Color::Rgb(255, 0, 0))),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_trend(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(team) = state.selected_team_name() else {
        let empty = Paragraph::new("Select a team (no ranking data loaded)")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };
    let Some(metric) = state.current_trend_metric() else {
        let empty = Paragraph::new("No metrics available")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(area);

    let source = state.trend_source(metric);
    let Some(series) = build_trend(source, &team, &metric.column) else {
        let title = Paragraph::new(format!("{} | {team}", metric.label));
        frame.render_widget(title, sections[0]);
        let empty = Paragraph::new("No data available for this metric")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, sections[1]);
        return;
    };

    let title = Paragraph::new(format!(
        "{} | {team} | Average: {:.2} over {} matches (opponents in date order)",
        metric.label,
        series.average,
        series.points.len()
    ));
    frame.render_widget(title, sections[0]);

    let max = series
        .points
        .iter()
        .map(|p| (p.value * 10.0).round() as u64)
        .max()
        .unwrap_or(1)
        .max(1);

    let bars: Vec<Bar> = series
        .points
        .iter()
        .map(|p| {
            Bar::default()
                .value((p.value.max(0.0) * 10.0).round() as u64)
                .text_value(format!("{:.1}", p.value))
                .label(Line::from(opponent_abbr(&p.opponent)))
                .style(Style::default().fg(trend_accent(state.diagram)))
        })
        .collect();

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(6)
        .bar_gap(1)
        .max(max);
    frame.render_widget(chart, sections[1]);
}

fn trend_accent(diagram: DiagramKind) -> Color {
    match diagram {
        DiagramKind::Style => Color::Rgb(255, 215, 0),
        DiagramKind::Performance => Color::Rgb(0, 176, 80),
    }
}

fn opponent_abbr(name: &str) -> String {
    let abbr: String = name
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(3)
        .collect();
    if abbr.is_empty() {
        "???".to_string()
    } else {
        abbr.to_uppercase()
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Segunda Rankings - Help",
        "",
        "Global:",
        "  1            Rankings grid",
        "  2            Per-match trend",
        "  t / Tab      Toggle Style/Performance",
        "  j/k or ↑/↓   Select team",
        "  r            Reload from database",
        "  d            Load demo season",
        "  e            Export snapshot to xlsx",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Rankings:",
        "  h/l or ←/→   Move metric cursor",
        "  [ / ]        Move position cursor",
        "",
        "Trend:",
        "  m / M        Cycle metric",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
