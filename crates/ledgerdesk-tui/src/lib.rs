// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ledgerdesk_app::screens;
use ledgerdesk_app::{
    AppCommand, AppEvent, AppMode, AppState, BadgeColor, Cell as ValueCell, FallbackPolicy,
    FetchError, LoadState, Provenance, RenderedRow, RowAction, ScreenKind, ScreenRows, ScreenView,
    SortDirection, SortSpec, format_kpi,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

const SCREEN_COUNT: usize = ScreenKind::ALL.len();
const SAMPLE_MARK: &str = "sample data";

/// Where list data comes from. `spawn_fetch` may hand the work to another
/// thread; the default runs it inline and reports over `tx`.
pub trait ViewRuntime {
    fn fetch_screen(&mut self, screen: ScreenKind) -> Result<ScreenRows, FetchError>;

    fn spawn_fetch(
        &mut self,
        request_id: u64,
        screen: ScreenKind,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let outcome = self.fetch_screen(screen);
        tx.send(InternalEvent::Fetched {
            request_id,
            screen,
            outcome,
        })
        .map_err(|_| anyhow!("fetch event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    Fetched {
        request_id: u64,
        screen: ScreenKind,
        outcome: Result<ScreenRows, FetchError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    request_id: u64,
    screen: ScreenKind,
}

struct ViewData {
    screens: [Box<dyn ScreenView>; SCREEN_COUNT],
    policy: FallbackPolicy,
    in_flight: Option<InFlight>,
    next_request_id: u64,
    selected_row: usize,
    selected_col: usize,
    status_token: u64,
}

impl ViewData {
    fn new(policy: FallbackPolicy) -> Self {
        Self {
            screens: ScreenKind::ALL.map(screens::open),
            policy,
            in_flight: None,
            next_request_id: 0,
            selected_row: 0,
            selected_col: 0,
            status_token: 0,
        }
    }

    fn view(&self, screen: ScreenKind) -> &dyn ScreenView {
        self.screens[screen as usize].as_ref()
    }

    fn view_mut(&mut self, screen: ScreenKind) -> &mut dyn ScreenView {
        self.screens[screen as usize].as_mut()
    }
}

pub fn run_app<R: ViewRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    policy: FallbackPolicy,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(policy);
    let (internal_tx, internal_rx) = mpsc::channel();
    request_load(state, runtime, &mut view_data, &internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn request_load<R: ViewRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let screen = state.active_screen;
    view_data.next_request_id = view_data.next_request_id.saturating_add(1);
    let request_id = view_data.next_request_id;
    view_data.view_mut(screen).begin_load();
    view_data.in_flight = Some(InFlight { request_id, screen });
    debug!(screen = screen.as_str(), request_id, "fetch requested");

    if let Err(error) = runtime.spawn_fetch(request_id, screen, internal_tx.clone()) {
        view_data.in_flight = None;
        warn!(screen = screen.as_str(), %error, "could not start fetch");
        emit_status(state, view_data, internal_tx, format!("load failed: {error}"));
    }
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Fetched {
                request_id,
                screen,
                outcome,
            } => handle_fetched(state, view_data, tx, InFlight { request_id, screen }, outcome),
        }
    }
}

fn handle_fetched(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    delivered: InFlight,
    outcome: Result<ScreenRows, FetchError>,
) {
    if view_data.in_flight != Some(delivered) {
        debug!(
            screen = delivered.screen.as_str(),
            request_id = delivered.request_id,
            "discarding stale fetch result"
        );
        return;
    }
    view_data.in_flight = None;

    let policy = view_data.policy;
    let view = view_data.view_mut(delivered.screen);
    view.apply_outcome(outcome, policy);
    let message = match view.load_state() {
        LoadState::Loaded(Provenance::Fallback) => {
            Some("practice API unavailable: showing sample data".to_owned())
        }
        LoadState::Failed(error) => Some(format!("load failed: {error}; press r to retry")),
        LoadState::Loaded(Provenance::Live) | LoadState::Loading => None,
    };
    clamp_selection(view_data, delivered.screen);
    if let Some(message) = message {
        emit_status(state, view_data, tx, message);
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event<R: ViewRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'));
    }

    if state.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            state.dispatch(AppCommand::ToggleHelp);
        }
        return false;
    }

    match state.mode {
        AppMode::Search => {
            handle_search_key(state, view_data, key);
            false
        }
        AppMode::Nav => handle_nav_key(state, runtime, view_data, internal_tx, key),
    }
}

fn handle_search_key(state: &mut AppState, view_data: &mut ViewData, key: KeyEvent) {
    let screen = state.active_screen;
    let mut query = view_data.view(screen).filter_state().query.clone();
    match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            state.dispatch(AppCommand::ExitSearch);
            return;
        }
        KeyCode::Backspace => {
            query.pop();
        }
        KeyCode::Char(ch) => query.push(ch),
        _ => return,
    }
    view_data.view_mut(screen).set_query(&query);
    view_data.selected_row = 0;
}

fn handle_nav_key<R: ViewRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let screen = state.active_screen;
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Tab => {
            switch_screen(state, runtime, view_data, internal_tx, AppCommand::NextScreen);
        }
        KeyCode::BackTab => {
            switch_screen(state, runtime, view_data, internal_tx, AppCommand::PrevScreen);
        }
        KeyCode::Char('j') | KeyCode::Down => move_row(view_data, screen, 1),
        KeyCode::Char('k') | KeyCode::Up => move_row(view_data, screen, -1),
        KeyCode::Char('h') | KeyCode::Left => move_column(view_data, screen, -1),
        KeyCode::Char('l') | KeyCode::Right => move_column(view_data, screen, 1),
        KeyCode::Char('/') => {
            state.dispatch(AppCommand::EnterSearch);
        }
        KeyCode::Char(digit @ '1'..='3') => {
            let index = digit as usize - '1' as usize;
            cycle_facet(state, view_data, internal_tx, index);
        }
        KeyCode::Char('c') => {
            view_data.view_mut(screen).clear_filters();
            view_data.selected_row = 0;
            emit_status(state, view_data, internal_tx, "filters cleared");
        }
        KeyCode::Char('s') => cycle_sort(state, view_data, internal_tx),
        KeyCode::Char('r') => {
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("reloading {}", screen.label()),
            );
            request_load(state, runtime, view_data, internal_tx);
        }
        KeyCode::Char('?') => {
            state.dispatch(AppCommand::ToggleHelp);
        }
        KeyCode::Char(other) => {
            if let Some(action) = RowAction::for_key(other) {
                trigger_action(state, view_data, internal_tx, action);
            }
        }
        _ => {}
    }
    false
}

fn switch_screen<R: ViewRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    if !events
        .iter()
        .any(|event| matches!(event, AppEvent::ScreenChanged(_)))
    {
        return;
    }
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);

    // A result still in flight belongs to the screen just left.
    if let Some(in_flight) = view_data.in_flight.take() {
        debug!(
            screen = in_flight.screen.as_str(),
            request_id = in_flight.request_id,
            "left screen with fetch in flight"
        );
    }
    view_data.selected_row = 0;
    view_data.selected_col = 0;
    if view_data.view(state.active_screen).load_state().is_loading() {
        request_load(state, runtime, view_data, internal_tx);
    }
}

fn clamp_selection(view_data: &mut ViewData, screen: ScreenKind) {
    let view = view_data.view(screen);
    let rows = view.rows().len();
    let columns = view.column_labels().len();
    view_data.selected_row = view_data.selected_row.min(rows.saturating_sub(1));
    view_data.selected_col = view_data.selected_col.min(columns.saturating_sub(1));
}

fn move_row(view_data: &mut ViewData, screen: ScreenKind, delta: isize) {
    let rows = view_data.view(screen).rows().len();
    if rows == 0 {
        view_data.selected_row = 0;
        return;
    }
    view_data.selected_row = view_data
        .selected_row
        .saturating_add_signed(delta)
        .min(rows - 1);
}

fn move_column(view_data: &mut ViewData, screen: ScreenKind, delta: isize) {
    let columns = view_data.view(screen).column_labels().len();
    if columns == 0 {
        view_data.selected_col = 0;
        return;
    }
    view_data.selected_col = view_data
        .selected_col
        .saturating_add_signed(delta)
        .min(columns - 1);
}

fn cycle_facet(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    index: usize,
) {
    let screen = state.active_screen;
    let Some(summary) = view_data.view_mut(screen).cycle_facet(index) else {
        emit_status(
            state,
            view_data,
            internal_tx,
            format!("no facet {} on {}", index + 1, screen.label()),
        );
        return;
    };
    view_data.selected_row = 0;
    emit_status(
        state,
        view_data,
        internal_tx,
        format!("{}: {}", summary.label, summary.choice.as_str()),
    );
}

fn cycle_sort(state: &mut AppState, view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>) {
    let screen = state.active_screen;
    let column = view_data.selected_col;
    let label = view_data
        .view(screen)
        .column_labels()
        .get(column)
        .copied()
        .unwrap_or("column");
    let message = match view_data.view_mut(screen).cycle_sort(column) {
        Some(sort) => format!("sorted by {label} {}", direction_arrow(sort.direction)),
        None => "sort cleared".to_owned(),
    };
    emit_status(state, view_data, internal_tx, message);
}

fn trigger_action(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    action: RowAction,
) {
    let rows = view_data.view(state.active_screen).rows();
    let message = match rows.get(view_data.selected_row) {
        None => "no row selected".to_owned(),
        Some(row) if row.allows(action) => format!("{} requested for #{}", action.label(), row.key),
        Some(row) => format!("{} not available while {}", action.label(), row.badge.label),
    };
    emit_status(state, view_data, internal_tx, message);
}

const fn direction_arrow(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => "↑",
        SortDirection::Desc => "↓",
    }
}

const fn badge_color(color: BadgeColor) -> Color {
    match color {
        BadgeColor::Green => Color::Green,
        BadgeColor::Amber => Color::Yellow,
        BadgeColor::Red => Color::Red,
        BadgeColor::Blue => Color::Blue,
        BadgeColor::Purple => Color::Magenta,
        BadgeColor::Gray => Color::DarkGray,
    }
}

fn tab_title(screen: ScreenKind, view_data: &ViewData) -> String {
    match view_data.view(screen).load_state().provenance() {
        Some(Provenance::Fallback) => format!(" {}* ", screen.label()),
        Some(Provenance::Live) | None => format!(" {} ", screen.label()),
    }
}

fn table_title(view: &dyn ScreenView) -> String {
    let mut title = format!(
        "{} ({} of {})",
        view.screen().title(),
        view.rows().len(),
        view.loaded_len()
    );
    match view.load_state() {
        LoadState::Loading => title.push_str(" · loading…"),
        LoadState::Loaded(Provenance::Fallback) => {
            title.push_str(" · ");
            title.push_str(SAMPLE_MARK);
        }
        LoadState::Loaded(Provenance::Live) => {}
        LoadState::Failed(_) => title.push_str(" · load failed"),
    }
    title
}

fn kpi_strip_text(view: &dyn ScreenView) -> String {
    if view.load_state().is_loading() && view.loaded_len() == 0 {
        return "loading…".to_owned();
    }
    view.kpis()
        .iter()
        .map(format_kpi)
        .collect::<Vec<_>>()
        .join("  |  ")
}

fn filter_line_text(view: &dyn ScreenView, mode: AppMode) -> String {
    let query = &view.filter_state().query;
    let query_text = match mode {
        AppMode::Search => format!("/{query}▏"),
        AppMode::Nav if query.is_empty() => "/ search".to_owned(),
        AppMode::Nav => format!("/{query}"),
    };
    let facets = view
        .facet_summaries()
        .iter()
        .enumerate()
        .map(|(index, facet)| format!("{} {}: {}", index + 1, facet.label, facet.choice.as_str()))
        .collect::<Vec<_>>()
        .join("  ");
    format!("{query_text}  |  {facets}")
}

fn header_label(label: &str, column: usize, sort: Option<SortSpec>) -> String {
    match sort {
        Some(sort) if sort.column == column => {
            format!("{label} {}", direction_arrow(sort.direction))
        }
        _ => label.to_owned(),
    }
}

fn actions_text(row: &RenderedRow) -> String {
    row.actions
        .iter()
        .map(|action| format!("{} {}", action.key(), action.label()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn cell_line(row: &RenderedRow, column: usize, cell: &ValueCell) -> Line<'static> {
    if let ValueCell::Badge(badge) = cell {
        return Line::from(Span::styled(
            badge.label,
            Style::default()
                .fg(badge_color(badge.color))
                .add_modifier(Modifier::BOLD),
        ));
    }

    let text = cell.display();
    let Some(highlight) = row.highlight.as_ref().filter(|h| h.column == column) else {
        return Line::from(text);
    };
    let (start, end) = (highlight.span.start, highlight.span.end);
    match (text.get(..start), text.get(start..end), text.get(end..)) {
        (Some(before), Some(matched), Some(after)) => Line::from(vec![
            Span::raw(before.to_owned()),
            Span::styled(
                matched.to_owned(),
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ),
            Span::raw(after.to_owned()),
        ]),
        _ => Line::from(text),
    }
}

fn status_text(state: &AppState) -> String {
    let (mode, hints) = match state.mode {
        AppMode::Nav => (
            "NAV",
            "tab screens | j/k/h/l | / search | 1-3 facets | c clear | s sort | r reload | ? help | q quit",
        ),
        AppMode::Search => ("SEARCH", "type to filter | enter/esc done"),
    };
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {hints}"),
        None => format!("{mode} | {hints}"),
    }
}

fn help_overlay_text() -> &'static str {
    "global: q or ctrl+q quit | ? help\n\
screens: tab next | shift+tab previous | r reload\n\
table: j/k rows | h/l columns | s sort selected column (asc, desc, off)\n\
filter: / search (enter/esc done) | 1-3 cycle facets | c clear\n\
rows: v view | e edit | a approve | x reject | E escalate | m remind | z archive\n\
a * after a screen name marks sample data shown because the API was unreachable"
}

/// Plain-text rendering of one screen, for non-interactive output.
pub fn dump_screen_text(view: &dyn ScreenView) -> String {
    let mut lines = vec![table_title(view), kpi_strip_text(view)];
    let mut header = view
        .column_labels()
        .iter()
        .map(|label| (*label).to_owned())
        .collect::<Vec<_>>();
    header.push("actions".to_owned());
    lines.push(header.join("\t"));
    for row in view.rows() {
        let mut cells = row.cells.iter().map(ValueCell::display).collect::<Vec<_>>();
        cells.push(actions_text(&row));
        lines.push(cells.join("\t"));
    }
    if let LoadState::Failed(error) = view.load_state() {
        lines.push(format!("error: {error}"));
    }
    lines.join("\n")
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let selected = ScreenKind::ALL
        .iter()
        .position(|screen| *screen == state.active_screen)
        .unwrap_or(0);
    let titles = ScreenKind::ALL
        .iter()
        .map(|screen| tab_title(*screen, view_data))
        .collect::<Vec<String>>();
    let tabs = Tabs::new(titles)
        .block(Block::default().title("ledgerdesk").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    let view = view_data.view(state.active_screen);
    let kpis = Paragraph::new(kpi_strip_text(view))
        .block(Block::default().borders(Borders::ALL).title("kpis"));
    frame.render_widget(kpis, layout[1]);

    let filter_line =
        Paragraph::new(filter_line_text(view, state.mode)).style(Style::default().fg(Color::Gray));
    frame.render_widget(filter_line, layout[2]);

    render_table(frame, layout[3], view, view_data);

    let status = Paragraph::new(status_text(state))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[4]);

    if state.show_help {
        let area = centered_rect(80, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    view: &dyn ScreenView,
    view_data: &ViewData,
) {
    let block = Block::default()
        .title(table_title(view))
        .borders(Borders::ALL);

    if let LoadState::Failed(error) = view.load_state() {
        let body = Paragraph::new(format!(
            "could not load {}: {error}\n\npress r to retry",
            view.screen().title()
        ))
        .style(Style::default().fg(Color::Red))
        .block(block);
        frame.render_widget(body, area);
        return;
    }

    let labels = view.column_labels();
    let sort = view.sort();
    let header_style = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let header = Row::new(
        labels
            .iter()
            .enumerate()
            .map(|(column, label)| {
                Cell::from(header_label(label, column, sort)).style(header_style)
            })
            .chain(std::iter::once(Cell::from("actions").style(header_style))),
    );

    let rows = view.rows();
    let table_rows = rows.iter().enumerate().map(|(row_index, row)| {
        let selected_row = row_index == view_data.selected_row;
        let mut cells = row
            .cells
            .iter()
            .enumerate()
            .map(|(column, cell)| {
                let mut style = Style::default();
                if selected_row {
                    style = style.bg(Color::DarkGray);
                }
                if selected_row && column == view_data.selected_col {
                    style = Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD);
                }
                Cell::from(cell_line(row, column, cell)).style(style)
            })
            .collect::<Vec<_>>();
        let actions_style = if selected_row {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        cells.push(Cell::from(actions_text(row)).style(actions_style));
        Row::new(cells)
    });

    let widths = vec![Constraint::Min(6); labels.len() + 1];
    let table = Table::new(table_rows, widths)
        .header(header)
        .column_spacing(1)
        .block(block);
    frame.render_widget(table, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
